use super::report::{
    DiffusionSummary, EquipartitionSummary, MsdSummary, NoiseSummary, TemperatureSummary,
};
use crate::config::{Args, Config};
use crate::io::load_trajectories;
use brownian::analysis::study::{self, DiffusionPoint, EnergyStudyPoint, NoiseCheck, ParameterSweep};
use brownian::analysis::theory;
use brownian::{
    DiffusionEstimator, EnergyAnalyzer, FitMethod, MsdCurve, SimulationParameters,
    TrajectoryEnsemble,
};
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::{info, warn};

/// Integrate a fresh ensemble, or adopt the external tables when given.
pub fn build_ensemble(
    args: &Args,
    config: &Config,
    params: &SimulationParameters,
) -> Result<TrajectoryEnsemble> {
    if !args.external.is_empty() {
        info!("\nLoading {} external trajectories...", args.external.len());
        let trajectories = load_trajectories(&args.external)?;
        let ensemble = TrajectoryEnsemble::new("external", trajectories)
            .wrap_err("External trajectories do not form an ensemble")?;
        if ensemble.time_step() != params.time_step {
            warn!(
                "external time step {} differs from configured {}",
                ensemble.time_step(),
                params.time_step
            );
        }
        return Ok(ensemble);
    }

    info!("\nIntegrating the Langevin ensemble...");
    let ensemble =
        TrajectoryEnsemble::generate("langevin", params, config.n_runs(args), config.noise())?;
    Ok(ensemble)
}

pub fn summarize_msd(msd: &MsdCurve, params: &SimulationParameters) -> MsdSummary {
    let t_final = msd.times.last().copied().unwrap_or(0.0);
    MsdSummary {
        t_final,
        simulated: msd.values.last().copied().unwrap_or(0.0),
        theory: theory::theoretical_msd(
            t_final,
            params.temperature,
            params.mass,
            params.friction,
            params.k_boltzmann,
        ),
    }
}

pub fn run_diffusion(
    msd: &MsdCurve,
    params: &SimulationParameters,
    args: &Args,
    config: &Config,
) -> Result<Option<DiffusionSummary>> {
    let section = config.diffusion.clone().unwrap_or_default().with_defaults();
    if !section.enabled.unwrap_or(true) {
        return Ok(None);
    }

    let method = match args.fit_method.as_deref() {
        Some(name) => name.parse::<FitMethod>().map_err(|e| eyre!(e))?,
        None => section.method.unwrap_or_default(),
    };
    let fit = DiffusionEstimator::new(method)
        .fit_curve(msd, section.window())
        .wrap_err("Diffusion fit failed")?;
    let d_theory =
        theory::diffusion_coefficient(params.temperature, params.k_boltzmann, params.friction);

    Ok(Some(DiffusionSummary {
        d_theory,
        relative_error: fit.relative_error(d_theory),
        fit,
    }))
}

pub fn run_energy(
    ensemble: &TrajectoryEnsemble,
    params: &SimulationParameters,
    config: &Config,
) -> Result<Option<EquipartitionSummary>> {
    let section = config.energy.clone().unwrap_or_default().with_defaults();
    if !section.enabled.unwrap_or(true) {
        return Ok(None);
    }

    let start_index = section.start_index.unwrap_or(0);
    let energies = EnergyAnalyzer::energies(ensemble, params.mass, start_index)?;
    let summary = EnergyAnalyzer::summary(&energies, section.bins.unwrap_or(30))?;
    Ok(Some(EquipartitionSummary {
        mean_energy: summary.mean,
        expected: theory::mean_kinetic_energy(params.temperature, params.k_boltzmann),
        variance: summary.variance,
        n_samples: summary.n_samples,
    }))
}

pub fn run_energy_study(
    params: &SimulationParameters,
    args: &Args,
    config: &Config,
) -> Result<(Vec<EnergyStudyPoint>, Vec<TemperatureSummary>)> {
    let section = config.energy.clone().unwrap_or_default().with_defaults();
    let temperatures = section.temperatures.unwrap_or_default();
    if !section.enabled.unwrap_or(true) || temperatures.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    info!("\nSampling energy distributions at {} temperatures...", temperatures.len());
    let points = study::energy_by_temperature(
        params,
        &temperatures,
        config.n_runs(args),
        config.noise(),
        section.start_index.unwrap_or(0),
        section.bins.unwrap_or(30),
    )?;
    let summaries = points
        .iter()
        .map(|p| TemperatureSummary {
            temperature: p.temperature,
            mean_energy: p.summary.mean,
            expected: theory::mean_kinetic_energy(p.temperature, params.k_boltzmann),
        })
        .collect();
    Ok((points, summaries))
}

pub fn run_sweep(
    params: &SimulationParameters,
    args: &Args,
    config: &Config,
) -> Result<Vec<DiffusionPoint>> {
    let section = config.sweep.clone().unwrap_or_default().with_defaults();
    if !section.enabled.unwrap_or(false) {
        return Ok(Vec::new());
    }
    let diffusion = config.diffusion.clone().unwrap_or_default().with_defaults();
    let sweep = ParameterSweep::new(
        section.parameter.unwrap_or(study::SweptParameter::Temperature),
        section.values.unwrap_or_default(),
    );

    info!("\nSweeping {:?} over {:?}...", sweep.parameter, sweep.values);
    let points = study::diffusion_sweep(
        params,
        &sweep,
        config.n_runs(args),
        config.noise(),
        DiffusionEstimator::new(diffusion.method.unwrap_or_default()),
        diffusion.window(),
    )?;
    Ok(points)
}

pub fn run_noise_check(
    params: &SimulationParameters,
    config: &Config,
) -> Result<(Vec<NoiseCheck>, Vec<NoiseSummary>)> {
    let section = config.noise_check.clone().unwrap_or_default().with_defaults();
    if !section.enabled.unwrap_or(false) {
        return Ok((Vec::new(), Vec::new()));
    }
    let checks = study::noise_check(
        config.noise(),
        params.seed,
        &section.sample_sizes.unwrap_or_default(),
        section.bins.unwrap_or(20),
    )?;
    let summaries = checks.iter().map(NoiseSummary::from).collect();
    Ok((checks, summaries))
}
