//! Configuration management for Brownian motion runs
//!
//! Every section and field is optional in the YAML file; `with_defaults`
//! completes whatever was left out.

mod args;

pub use args::Args;

use brownian::analysis::energy::DEFAULT_ENERGY_BINS;
use brownian::analysis::{FitMethod, FitWindow, SweptParameter};
use brownian::{NoiseKind, SimulationParameters};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub ensemble: EnsembleSection,
    pub diffusion: Option<DiffusionSection>,
    pub energy: Option<EnergySection>,
    pub sweep: Option<SweepSection>,
    pub noise_check: Option<NoiseCheckSection>,
}

/// Physical and numerical parameters of one run
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimulationSection {
    pub temperature: Option<f64>,
    pub mass: Option<f64>,
    pub friction: Option<f64>,
    pub k_boltzmann: Option<f64>,
    pub time_step: Option<f64>,
    pub n_steps: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for SimulationSection {
    fn default() -> Self {
        SimulationSection {
            temperature: Some(1.0),
            mass: Some(1.0),
            friction: Some(1.0),
            k_boltzmann: Some(1.0),
            time_step: Some(0.01),
            n_steps: Some(1000),
            seed: Some(42),
        }
    }
}

impl SimulationSection {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.temperature.is_none() {
            self.temperature = defaults.temperature;
        }
        if self.mass.is_none() {
            self.mass = defaults.mass;
        }
        if self.friction.is_none() {
            self.friction = defaults.friction;
        }
        if self.k_boltzmann.is_none() {
            self.k_boltzmann = defaults.k_boltzmann;
        }
        if self.time_step.is_none() {
            self.time_step = defaults.time_step;
        }
        if self.n_steps.is_none() {
            self.n_steps = defaults.n_steps;
        }
        if self.seed.is_none() {
            self.seed = defaults.seed;
        }
        self
    }
}

/// Ensemble size and noise generator
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EnsembleSection {
    pub n_runs: Option<usize>,
    pub noise: Option<NoiseKind>,
}

impl Default for EnsembleSection {
    fn default() -> Self {
        EnsembleSection {
            n_runs: Some(5),
            noise: Some(NoiseKind::Gaussian),
        }
    }
}

impl EnsembleSection {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.n_runs.is_none() {
            self.n_runs = defaults.n_runs;
        }
        if self.noise.is_none() {
            self.noise = defaults.noise;
        }
        self
    }
}

/// Diffusion coefficient fit
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DiffusionSection {
    pub enabled: Option<bool>,
    pub method: Option<FitMethod>,
    pub window_start: Option<f64>,
    pub window_end: Option<f64>,
}

impl Default for DiffusionSection {
    fn default() -> Self {
        DiffusionSection {
            enabled: Some(true),
            method: Some(FitMethod::RatioMean),
            window_start: None,
            window_end: None,
        }
    }
}

impl DiffusionSection {
    /// Apply default values to any missing parameters. The window bounds stay
    /// open and resolve against the time grid.
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.method.is_none() {
            self.method = defaults.method;
        }
        self
    }

    pub fn window(&self) -> FitWindow {
        FitWindow {
            start: self.window_start,
            end: self.window_end,
        }
    }
}

/// Kinetic energy distribution and equipartition check
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EnergySection {
    pub enabled: Option<bool>,
    pub bins: Option<usize>,
    pub start_index: Option<usize>,
    pub temperatures: Option<Vec<f64>>,
}

impl Default for EnergySection {
    fn default() -> Self {
        EnergySection {
            enabled: Some(true),
            bins: Some(DEFAULT_ENERGY_BINS),
            start_index: Some(0),
            temperatures: Some(vec![0.5, 1.0, 2.0]),
        }
    }
}

impl EnergySection {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.bins.is_none() {
            self.bins = defaults.bins;
        }
        if self.start_index.is_none() {
            self.start_index = defaults.start_index;
        }
        if self.temperatures.is_none() {
            self.temperatures = defaults.temperatures;
        }
        self
    }
}

/// Parameter-dependence study of D
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SweepSection {
    pub enabled: Option<bool>,
    pub parameter: Option<SweptParameter>,
    pub values: Option<Vec<f64>>,
}

impl Default for SweepSection {
    fn default() -> Self {
        SweepSection {
            enabled: Some(false),
            parameter: Some(SweptParameter::Temperature),
            values: Some(vec![0.5, 1.0, 2.0, 5.0]),
        }
    }
}

impl SweepSection {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.parameter.is_none() {
            self.parameter = defaults.parameter;
        }
        if self.values.is_none() {
            self.values = defaults.values;
        }
        self
    }
}

/// Histogram check of the noise generator
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NoiseCheckSection {
    pub enabled: Option<bool>,
    pub sample_sizes: Option<Vec<usize>>,
    pub bins: Option<usize>,
}

impl Default for NoiseCheckSection {
    fn default() -> Self {
        NoiseCheckSection {
            enabled: Some(false),
            sample_sizes: Some(vec![50, 100, 1000]),
            bins: Some(20),
        }
    }
}

impl NoiseCheckSection {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.sample_sizes.is_none() {
            self.sample_sizes = defaults.sample_sizes;
        }
        if self.bins.is_none() {
            self.bins = defaults.bins;
        }
        self
    }
}

impl Config {
    /// Apply defaults to all configuration sections
    pub fn with_defaults(mut self) -> Self {
        self.simulation = self.simulation.with_defaults();
        self.ensemble = self.ensemble.with_defaults();
        self.diffusion = Some(self.diffusion.take().unwrap_or_default().with_defaults());
        self.energy = Some(self.energy.take().unwrap_or_default().with_defaults());
        self.sweep = Some(self.sweep.take().unwrap_or_default().with_defaults());
        self.noise_check = Some(self.noise_check.take().unwrap_or_default().with_defaults());
        self
    }

    /// Simulation parameters with command-line overrides applied
    pub fn parameters(&self, args: &Args) -> SimulationParameters {
        let sim = self.simulation.clone().with_defaults();
        let defaults = SimulationParameters::default();
        SimulationParameters {
            temperature: args.temperature.or(sim.temperature).unwrap_or(defaults.temperature),
            mass: args.mass.or(sim.mass).unwrap_or(defaults.mass),
            friction: args.friction.or(sim.friction).unwrap_or(defaults.friction),
            k_boltzmann: sim.k_boltzmann.unwrap_or(defaults.k_boltzmann),
            time_step: args.time_step.or(sim.time_step).unwrap_or(defaults.time_step),
            n_steps: args.n_steps.or(sim.n_steps).unwrap_or(defaults.n_steps),
            seed: args.seed.or(sim.seed),
        }
    }

    pub fn n_runs(&self, args: &Args) -> usize {
        args.n_runs.or(self.ensemble.n_runs).unwrap_or(5)
    }

    pub fn noise(&self) -> NoiseKind {
        self.ensemble.noise.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_partial_yaml_is_completed() {
        let yaml = "simulation:\n  temperature: 2.0\n\
                    sweep:\n  enabled: true\n  parameter: friction\n";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        assert_eq!(config.simulation.temperature, Some(2.0));
        assert_eq!(config.simulation.time_step, Some(0.01));
        assert_eq!(config.ensemble.n_runs, Some(5));

        let sweep = config.sweep.as_ref().unwrap();
        assert_eq!(sweep.enabled, Some(true));
        assert_eq!(sweep.parameter, Some(SweptParameter::Friction));
        assert_eq!(sweep.values, Some(vec![0.5, 1.0, 2.0, 5.0]));

        let diffusion = config.diffusion.as_ref().unwrap();
        assert_eq!(diffusion.method, Some(FitMethod::RatioMean));
        assert_eq!(diffusion.window(), FitWindow::default());
    }

    #[test]
    fn test_command_line_overrides_file() {
        let yaml = "simulation:\n  mass: 3.0\n  seed: 9\n\
                    ensemble:\n  n_runs: 12\n  noise: box_muller\n";
        let config = serde_yml::from_str::<Config>(yaml).unwrap().with_defaults();
        let args = Args::parse_from(["brownian", "--mass", "0.5", "--n-runs", "4"]);

        let params = config.parameters(&args);
        assert_eq!(params.mass, 0.5);
        assert_eq!(params.seed, Some(9));
        assert_eq!(params.temperature, 1.0);
        assert_eq!(config.n_runs(&args), 4);
        assert_eq!(config.noise(), NoiseKind::BoxMuller);
    }
}
