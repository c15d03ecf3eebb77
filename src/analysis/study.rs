//! Parameter-dependence studies: one parameter is swept while the others
//! stay fixed, and each value gets its own ensemble.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::diffusion::{DiffusionEstimator, FitWindow};
use super::energy::{EnergyAnalyzer, EnergySummary};
use super::ensemble::{MsdCurve, TrajectoryEnsemble};
use super::histogram::{mean_and_variance, DensityPoint, Histogram};
use super::theory;
use crate::error::{Result, SimulationError};
use crate::langevin::{noise, NoiseKind};
use crate::params::SimulationParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweptParameter {
    Temperature,
    Mass,
    Friction,
}

impl SweptParameter {
    pub fn apply(self, base: &SimulationParameters, value: f64) -> SimulationParameters {
        let mut params = *base;
        match self {
            SweptParameter::Temperature => params.temperature = value,
            SweptParameter::Mass => params.mass = value,
            SweptParameter::Friction => params.friction = value,
        }
        params
    }

    pub fn symbol(self) -> &'static str {
        match self {
            SweptParameter::Temperature => "T",
            SweptParameter::Mass => "m",
            SweptParameter::Friction => "gamma",
        }
    }
}

impl FromStr for SweptParameter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "t" | "temperature" => Ok(SweptParameter::Temperature),
            "m" | "mass" => Ok(SweptParameter::Mass),
            "gamma" | "friction" => Ok(SweptParameter::Friction),
            other => Err(format!("unknown parameter: {other}")),
        }
    }
}

type SweepEntry = (f64, SimulationParameters, TrajectoryEnsemble);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSweep {
    pub parameter: SweptParameter,
    pub values: Vec<f64>,
}

impl ParameterSweep {
    pub fn new(parameter: SweptParameter, values: Vec<f64>) -> Self {
        Self { parameter, values }
    }

    fn ensembles<'a>(
        &'a self,
        base: &'a SimulationParameters,
        n_runs: usize,
        noise: NoiseKind,
    ) -> Result<impl Iterator<Item = Result<SweepEntry>> + 'a> {
        if self.values.is_empty() {
            return Err(SimulationError::InsufficientSamples { needed: 1, found: 0 });
        }
        let parameter = self.parameter;
        Ok(self.values.iter().map(move |&value| {
            let params = parameter.apply(base, value);
            let name = format!("{}={}", parameter.symbol(), value);
            let ensemble = TrajectoryEnsemble::generate(name, &params, n_runs, noise)?;
            Ok((value, params, ensemble))
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffusionPoint {
    pub value: f64,
    pub d_theory: f64,
    pub d_fit: f64,
    pub relative_error: f64,
}

/// Fitted D against the Einstein relation for each swept value.
pub fn diffusion_sweep(
    base: &SimulationParameters,
    sweep: &ParameterSweep,
    n_runs: usize,
    noise: NoiseKind,
    estimator: DiffusionEstimator,
    window: FitWindow,
) -> Result<Vec<DiffusionPoint>> {
    let mut points = Vec::with_capacity(sweep.values.len());
    for entry in sweep.ensembles(base, n_runs, noise)? {
        let (value, params, ensemble) = entry?;
        let fit = estimator.fit_curve(&ensemble.msd(), window)?;
        let d_theory =
            theory::diffusion_coefficient(params.temperature, params.k_boltzmann, params.friction);
        let point = DiffusionPoint {
            value,
            d_theory,
            d_fit: fit.d_estimate,
            relative_error: fit.relative_error(d_theory),
        };
        info!(
            "{}={:.2}: D_theory={:.6}, D_fit={:.6}, error={:.2}%",
            sweep.parameter.symbol(),
            value,
            point.d_theory,
            point.d_fit,
            100.0 * point.relative_error
        );
        points.push(point);
    }
    Ok(points)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsdStudyPoint {
    pub value: f64,
    pub msd: MsdCurve,
    pub per_trajectory: Vec<Vec<f64>>,
    pub theory: Vec<f64>,
    pub diffusive: Vec<f64>,
}

/// Simulated MSD next to the exact and long-time curves for each swept value.
pub fn msd_sweep(
    base: &SimulationParameters,
    sweep: &ParameterSweep,
    n_runs: usize,
    noise: NoiseKind,
) -> Result<Vec<MsdStudyPoint>> {
    let mut points = Vec::with_capacity(sweep.values.len());
    for entry in sweep.ensembles(base, n_runs, noise)? {
        let (value, params, ensemble) = entry?;
        let msd = ensemble.msd();
        let theory = theory::theoretical_msd_curve(
            &msd.times,
            params.temperature,
            params.mass,
            params.friction,
            params.k_boltzmann,
        );
        let d =
            theory::diffusion_coefficient(params.temperature, params.k_boltzmann, params.friction);
        let diffusive = msd.times.iter().map(|&t| theory::diffusive_msd(t, d)).collect();
        points.push(MsdStudyPoint {
            value,
            per_trajectory: ensemble.per_trajectory_squared_displacement(),
            msd,
            theory,
            diffusive,
        });
    }
    Ok(points)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyStudyPoint {
    pub temperature: f64,
    pub summary: EnergySummary,
    pub comparison: Vec<DensityPoint>,
}

/// Kinetic-energy distribution at each temperature against the Boltzmann density.
pub fn energy_by_temperature(
    base: &SimulationParameters,
    temperatures: &[f64],
    n_runs: usize,
    noise: NoiseKind,
    start_index: usize,
    bins: usize,
) -> Result<Vec<EnergyStudyPoint>> {
    let sweep = ParameterSweep::new(SweptParameter::Temperature, temperatures.to_vec());
    let mut points = Vec::with_capacity(temperatures.len());
    for entry in sweep.ensembles(base, n_runs, noise)? {
        let (temperature, params, ensemble) = entry?;
        let energies = EnergyAnalyzer::energies(&ensemble, params.mass, start_index)?;
        let summary = EnergyAnalyzer::summary(&energies, bins)?;
        let comparison = summary.compare_boltzmann(temperature, params.k_boltzmann);
        info!(
            "T={:.2}: <E>={:.6} (k_B T = {:.6}) over {} samples",
            temperature,
            summary.mean,
            theory::mean_kinetic_energy(temperature, params.k_boltzmann),
            summary.n_samples
        );
        points.push(EnergyStudyPoint {
            temperature,
            summary,
            comparison,
        });
    }
    Ok(points)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseCheck {
    pub n_samples: usize,
    pub mean: f64,
    pub variance: f64,
    pub histogram: Histogram,
    pub comparison: Vec<DensityPoint>,
}

/// Histogram `n` draws of the chosen generator for each sample size and set
/// them against the N(0, 1) density.
pub fn noise_check(
    kind: NoiseKind,
    seed: Option<u64>,
    sample_sizes: &[usize],
    bins: usize,
) -> Result<Vec<NoiseCheck>> {
    let mut source = kind.build(seed);
    sample_sizes
        .iter()
        .map(|&n| {
            let draws = noise::draw(&mut source, n);
            let (mean, variance) = mean_and_variance(&draws)
                .ok_or(SimulationError::InsufficientSamples { needed: 1, found: 0 })?;
            let histogram = Histogram::new(&draws, bins)?;
            let comparison = histogram.compare_with(theory::standard_normal_density);
            Ok(NoiseCheck {
                n_samples: n,
                mean,
                variance,
                histogram,
                comparison,
            })
        })
        .collect()
}
