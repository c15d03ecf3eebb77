use brownian::analysis::study::{DiffusionPoint, EnergyStudyPoint, NoiseCheck};
use brownian::{FitResult, SimulationParameters};
use serde::Serialize;
use tracing::info;

/// Scalar results of one invocation, written with `--report`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub parameters: SimulationParameters,
    pub ensemble: String,
    pub n_runs: usize,
    pub msd: MsdSummary,
    pub diffusion: Option<DiffusionSummary>,
    pub equipartition: Option<EquipartitionSummary>,
    pub energy_by_temperature: Vec<TemperatureSummary>,
    pub sweep: Vec<DiffusionPoint>,
    pub noise_check: Vec<NoiseSummary>,
}

#[derive(Debug, Serialize)]
pub struct MsdSummary {
    pub t_final: f64,
    pub simulated: f64,
    pub theory: f64,
}

#[derive(Debug, Serialize)]
pub struct DiffusionSummary {
    pub d_theory: f64,
    pub fit: FitResult,
    pub relative_error: f64,
}

#[derive(Debug, Serialize)]
pub struct EquipartitionSummary {
    pub mean_energy: f64,
    pub expected: f64,
    pub variance: f64,
    pub n_samples: usize,
}

#[derive(Debug, Serialize)]
pub struct TemperatureSummary {
    pub temperature: f64,
    pub mean_energy: f64,
    pub expected: f64,
}

#[derive(Debug, Serialize)]
pub struct NoiseSummary {
    pub n_samples: usize,
    pub mean: f64,
    pub variance: f64,
}

impl From<&NoiseCheck> for NoiseSummary {
    fn from(check: &NoiseCheck) -> Self {
        NoiseSummary {
            n_samples: check.n_samples,
            mean: check.mean,
            variance: check.variance,
        }
    }
}

pub fn report_parameters(params: &SimulationParameters, n_runs: usize) {
    info!("\nSimulation parameters:");
    info!("  Temperature T:      {}", params.temperature);
    info!("  Mass m:             {}", params.mass);
    info!("  Friction gamma:     {}", params.friction);
    info!("  k_B:                {}", params.k_boltzmann);
    info!("  Time step dt:       {}", params.time_step);
    info!("  Steps:              {}", params.n_steps);
    info!("  Duration:           {}", params.duration());
    info!("  Ensemble size:      {}", n_runs);
    info!("  Relaxation time:    {:.6}", params.relaxation_time());
    info!("  gamma*dt/m:         {:.4}", params.stability_ratio());
    match params.seed {
        Some(seed) => info!("  Seed:               {}", seed),
        None => info!("  Seed:               OS entropy"),
    }
}

pub fn report_msd(summary: &MsdSummary) {
    info!("\nMean squared displacement at t = {:.4}:", summary.t_final);
    info!("  Simulated: {:.6}", summary.simulated);
    info!("  Theory:    {:.6}", summary.theory);
}

pub fn report_diffusion(summary: &DiffusionSummary) {
    let fit = &summary.fit;
    info!("\nDiffusion coefficient ({:?}):", fit.method);
    info!(
        "  Window: [{:.4}, {:.4}] with {} points",
        fit.window_start, fit.window_end, fit.n_points
    );
    if let Some(intercept) = fit.intercept {
        info!("  Intercept: {:.6}", intercept);
    }
    info!("  D (theory, k_B T / gamma): {:.6}", summary.d_theory);
    info!("  D (fit):                   {:.6}", fit.d_estimate);
    info!("  Relative error:            {:.2}%", 100.0 * summary.relative_error);
}

pub fn report_equipartition(summary: &EquipartitionSummary) {
    info!("\nKinetic energy:");
    info!(
        "  <E> = {:.6} over {} samples (k_B T = {:.6})",
        summary.mean_energy, summary.n_samples, summary.expected
    );
    info!("  Var(E) = {:.6}", summary.variance);
}

pub fn report_energy_study(points: &[EnergyStudyPoint]) {
    for point in points {
        info!("\nEnergy distribution at T = {:.2}:", point.temperature);
        info!("  {:>12} {:>12} {:>12}", "E", "simulated", "Boltzmann");
        for row in &point.comparison {
            info!(
                "  {:>12.6} {:>12.6} {:>12.6}",
                row.center, row.empirical, row.theory
            );
        }
    }
}

pub fn report_noise_check(checks: &[NoiseCheck]) {
    for check in checks {
        info!(
            "\nNoise check, n = {}: mean = {:+.6}, variance = {:.6}",
            check.n_samples, check.mean, check.variance
        );
        info!("  {:>10} {:>10} {:>10}", "x", "simulated", "N(0,1)");
        for row in &check.comparison {
            info!(
                "  {:>10.4} {:>10.6} {:>10.6}",
                row.center, row.empirical, row.theory
            );
        }
    }
}
