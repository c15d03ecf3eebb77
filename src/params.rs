use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SimulationError};

/// Above this value of `γ·dt/m` the explicit drag update is no longer small
/// compared to the velocity it acts on.
pub const STABILITY_WARN_RATIO: f64 = 0.1;

/// Physical and numerical parameters of one Langevin run.
///
/// Units are reduced (`k_B = 1` by default). The temperature may be zero,
/// which switches the thermal noise off; every other quantity must be
/// strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Bath temperature T
    pub temperature: f64,
    /// Particle mass m
    pub mass: f64,
    /// Friction coefficient γ
    pub friction: f64,
    /// Boltzmann constant k_B
    pub k_boltzmann: f64,
    /// Time step dt
    pub time_step: f64,
    /// Number of integration steps; a trajectory holds `n_steps + 1` samples
    pub n_steps: usize,
    /// Seed for the noise source, `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        SimulationParameters {
            temperature: 1.0,
            mass: 1.0,
            friction: 1.0,
            k_boltzmann: 1.0,
            time_step: 0.01,
            n_steps: 1000,
            seed: None,
        }
    }
}

impl SimulationParameters {
    pub fn new(temperature: f64, mass: f64, friction: f64, time_step: f64, n_steps: usize) -> Self {
        SimulationParameters {
            temperature,
            mass,
            friction,
            time_step,
            n_steps,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_k_boltzmann(mut self, k_boltzmann: f64) -> Self {
        self.k_boltzmann = k_boltzmann;
        self
    }

    /// Fail fast on any parameter outside its domain.
    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "temperature",
                value: self.temperature,
            });
        }
        for (name, value) in [
            ("mass", self.mass),
            ("friction", self.friction),
            ("k_boltzmann", self.k_boltzmann),
            ("time_step", self.time_step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }
        if self.n_steps < 1 {
            return Err(SimulationError::InvalidParameter {
                name: "n_steps",
                value: self.n_steps as f64,
            });
        }
        Ok(())
    }

    /// Drag rate c1 = γ/m
    pub fn drag_rate(&self) -> f64 {
        self.friction / self.mass
    }

    /// Noise amplitude c2 = sqrt(2γ k_B T / m)
    pub fn noise_amplitude(&self) -> f64 {
        (2.0 * self.friction * self.k_boltzmann * self.temperature / self.mass).sqrt()
    }

    /// Velocity relaxation time τ = m/γ
    pub fn relaxation_time(&self) -> f64 {
        self.mass / self.friction
    }

    /// Total simulated time `n_steps · dt`
    pub fn duration(&self) -> f64 {
        self.n_steps as f64 * self.time_step
    }

    /// `dt/τ`; the explicit scheme assumes this is small.
    pub fn stability_ratio(&self) -> f64 {
        self.drag_rate() * self.time_step
    }

    /// Emit a warning when `dt ≪ m/γ` does not hold. Returns whether the
    /// ratio is inside the comfortable range.
    pub fn check_stability(&self) -> bool {
        let ratio = self.stability_ratio();
        if ratio > STABILITY_WARN_RATIO {
            warn!(
                "dt/tau = {:.3} exceeds {}: explicit drag update may overshoot (dt = {}, tau = {})",
                ratio,
                STABILITY_WARN_RATIO,
                self.time_step,
                self.relaxation_time()
            );
            return false;
        }
        true
    }
}
