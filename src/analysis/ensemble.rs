use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, SimulationError};
use crate::langevin::{integrate_with, NoiseKind, Trajectory};
use crate::params::SimulationParameters;

/// Ensemble-averaged squared displacement on the shared time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsdCurve {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
}

impl MsdCurve {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Named set of trajectories sharing one `(dt, n_steps)` grid.
#[derive(Debug, Clone)]
pub struct TrajectoryEnsemble {
    name: String,
    trajectories: Vec<Trajectory>,
}

impl TrajectoryEnsemble {
    pub fn new(name: impl Into<String>, trajectories: Vec<Trajectory>) -> Result<Self> {
        let first = trajectories
            .first()
            .ok_or_else(|| SimulationError::InconsistentGrid {
                reason: "an ensemble needs at least one trajectory".to_string(),
            })?;

        for (index, traj) in trajectories.iter().enumerate().skip(1) {
            if traj.len() != first.len() {
                return Err(SimulationError::InconsistentGrid {
                    reason: format!(
                        "member {} has {} samples, member 0 has {}",
                        index,
                        traj.len(),
                        first.len()
                    ),
                });
            }
            if traj.time_step() != first.time_step() {
                return Err(SimulationError::InconsistentGrid {
                    reason: format!(
                        "member {} has dt = {}, member 0 has dt = {}",
                        index,
                        traj.time_step(),
                        first.time_step()
                    ),
                });
            }
            let same_times = traj
                .samples()
                .iter()
                .zip(first.samples())
                .all(|(a, b)| a.t == b.t);
            if !same_times {
                return Err(SimulationError::InconsistentGrid {
                    reason: format!("member {} has a different time array", index),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            trajectories,
        })
    }

    /// Run `n_runs` independent trajectories in parallel. Run `i` owns a
    /// noise source seeded with `seed + i`, or OS entropy when unseeded.
    pub fn generate(
        name: impl Into<String>,
        params: &SimulationParameters,
        n_runs: usize,
        noise: NoiseKind,
    ) -> Result<Self> {
        if n_runs < 1 {
            return Err(SimulationError::InvalidParameter {
                name: "n_runs",
                value: n_runs as f64,
            });
        }
        params.validate()?;
        params.check_stability();

        let name = name.into();
        info!(
            "Generating ensemble '{}': {} runs x {} steps (dt = {}, T = {}, m = {}, gamma = {})",
            name,
            n_runs,
            params.n_steps,
            params.time_step,
            params.temperature,
            params.mass,
            params.friction
        );

        let trajectories = (0..n_runs)
            .into_par_iter()
            .map(|run| {
                let seed = params.seed.map(|s| s.wrapping_add(run as u64));
                integrate_with(params, noise.build(seed))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(name, trajectories)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    pub fn n_runs(&self) -> usize {
        self.trajectories.len()
    }

    /// Samples per member (`n_steps + 1`).
    pub fn n_samples(&self) -> usize {
        self.trajectories[0].len()
    }

    pub fn time_step(&self) -> f64 {
        self.trajectories[0].time_step()
    }

    pub fn times(&self) -> Vec<f64> {
        self.trajectories[0].times()
    }

    /// Mean of `x² + y²` over members at every time index.
    pub fn msd(&self) -> MsdCurve {
        let n_runs = self.n_runs() as f64;
        let values = (0..self.n_samples())
            .into_par_iter()
            .map(|i| {
                // fixed member order keeps the sum reproducible
                let sum: f64 = self
                    .trajectories
                    .iter()
                    .map(|traj| traj.samples()[i].squared_displacement())
                    .sum();
                sum / n_runs
            })
            .collect();

        MsdCurve {
            times: self.times(),
            values,
        }
    }

    /// `x² + y²` for each member, unaveraged.
    pub fn per_trajectory_squared_displacement(&self) -> Vec<Vec<f64>> {
        self.trajectories
            .par_iter()
            .map(Trajectory::squared_displacement)
            .collect()
    }
}
