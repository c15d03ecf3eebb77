//! Command-line argument parsing for Brownian motion runs

use clap::Parser;

/// Langevin Brownian motion ensembles with YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the scalar results as YAML to this file
    #[arg(long)]
    pub report: Option<String>,

    /// Override bath temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Override particle mass
    #[arg(long)]
    pub mass: Option<f64>,

    /// Override friction coefficient gamma
    #[arg(long)]
    pub friction: Option<f64>,

    /// Override integration time step
    #[arg(long)]
    pub time_step: Option<f64>,

    /// Override number of integration steps
    #[arg(long)]
    pub n_steps: Option<usize>,

    /// Override number of ensemble members
    #[arg(long)]
    pub n_runs: Option<usize>,

    /// Override base random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Diffusion fit (ratio_mean or linear_regression)
    #[arg(long)]
    pub fit_method: Option<String>,

    /// Analyse trajectory tables written by an external simulator instead of integrating
    #[arg(long, num_args = 1..)]
    pub external: Vec<String>,
}
