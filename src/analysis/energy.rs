use serde::{Deserialize, Serialize};

use super::ensemble::TrajectoryEnsemble;
use super::histogram::{mean_and_variance, DensityPoint, Histogram};
use super::theory::boltzmann_energy_density;
use crate::error::{Result, SimulationError};

pub const DEFAULT_ENERGY_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySummary {
    pub mean: f64,
    pub variance: f64,
    pub n_samples: usize,
    pub histogram: Histogram,
}

impl EnergySummary {
    /// Empirical density next to `exp(-E/k_B T)/(k_B T)` at each bin centre.
    pub fn compare_boltzmann(&self, temperature: f64, k_b: f64) -> Vec<DensityPoint> {
        self.histogram
            .compare_with(|e| boltzmann_energy_density(e, temperature, k_b))
    }
}

/// Kinetic-energy statistics pooled over members and time.
pub struct EnergyAnalyzer;

impl EnergyAnalyzer {
    /// `½ m (vx² + vy²)` for every member and every time index from
    /// `start_index` on. Pooling over time assumes the samples lie past the
    /// relaxation time; pass a non-zero `start_index` to drop the warm-up.
    pub fn energies(
        ensemble: &TrajectoryEnsemble,
        mass: f64,
        start_index: usize,
    ) -> Result<Vec<f64>> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "mass",
                value: mass,
            });
        }
        let n_samples = ensemble.n_samples();
        if start_index >= n_samples {
            return Err(SimulationError::InsufficientSamples {
                needed: start_index + 1,
                found: n_samples,
            });
        }

        Ok(ensemble
            .trajectories()
            .iter()
            .flat_map(|traj| {
                traj.samples()[start_index..]
                    .iter()
                    .map(|s| s.kinetic_energy(mass))
            })
            .collect())
    }

    pub fn summary(samples: &[f64], bins: usize) -> Result<EnergySummary> {
        let (mean, variance) = mean_and_variance(samples)
            .ok_or(SimulationError::InsufficientSamples { needed: 1, found: 0 })?;
        let histogram = Histogram::new(samples, bins)?;
        Ok(EnergySummary {
            mean,
            variance,
            n_samples: samples.len(),
            histogram,
        })
    }
}
