mod report;
mod runner;

use self::report::{
    report_diffusion, report_energy_study, report_equipartition, report_msd, report_noise_check,
    report_parameters, RunReport,
};
use self::runner::{
    build_ensemble, run_diffusion, run_energy, run_energy_study, run_noise_check, run_sweep,
    summarize_msd,
};
use crate::config::{Args, Config};
use crate::io::{setup_output, write_report};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use std::fs;
use tracing::info;

pub struct BrownianApplication {
    args: Args,
    config: Config,
}

impl BrownianApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let config = load_config(&args)?;
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref());
        info!("Configuration loaded:\n{:?}", self.config);

        let params = self.config.parameters(&self.args);
        params.validate().wrap_err("Invalid simulation parameters")?;
        report_parameters(&params, self.config.n_runs(&self.args));

        let ensemble = build_ensemble(&self.args, &self.config, &params)?;
        let msd = ensemble.msd();
        let msd_summary = summarize_msd(&msd, &params);
        report_msd(&msd_summary);

        let diffusion = run_diffusion(&msd, &params, &self.args, &self.config)?;
        if let Some(summary) = &diffusion {
            report_diffusion(summary);
        }

        let equipartition = run_energy(&ensemble, &params, &self.config)?;
        if let Some(summary) = &equipartition {
            report_equipartition(summary);
        }

        let (energy_points, energy_by_temperature) =
            run_energy_study(&params, &self.args, &self.config)?;
        report_energy_study(&energy_points);

        let sweep = run_sweep(&params, &self.args, &self.config)?;

        let (noise_checks, noise_check) = run_noise_check(&params, &self.config)?;
        report_noise_check(&noise_checks);

        if let Some(path) = &self.args.report {
            let report = RunReport {
                parameters: params,
                ensemble: ensemble.name().to_string(),
                n_runs: ensemble.n_runs(),
                msd: msd_summary,
                diffusion,
                equipartition,
                energy_by_temperature,
                sweep,
                noise_check,
            };
            write_report(path, &report)?;
        }

        info!("\nDone.");
        Ok(())
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config_content = fs::read_to_string(&args.config_file)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", args.config_file))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}
