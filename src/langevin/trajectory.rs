use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Relative tolerance used when checking an external time column against `i·dt`.
const GRID_TOLERANCE: f64 = 1e-6;

/// One recorded state `(t, x, y, vx, vy)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Sample {
    pub fn is_finite(&self) -> bool {
        self.t.is_finite()
            && self.x.is_finite()
            && self.y.is_finite()
            && self.vx.is_finite()
            && self.vy.is_finite()
    }

    /// x² + y²
    #[inline]
    pub fn squared_displacement(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// ½ m (vx² + vy²)
    #[inline]
    pub fn kinetic_energy(&self, mass: f64) -> f64 {
        0.5 * mass * (self.vx * self.vx + self.vy * self.vy)
    }
}

/// Time-ordered samples of one run on the grid `t_i = i·dt`, starting at rest
/// at the origin. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrajectory")]
pub struct Trajectory {
    time_step: f64,
    samples: Vec<Sample>,
}

/// Unchecked serde shape of a `Trajectory`.
#[derive(Deserialize)]
struct RawTrajectory {
    time_step: f64,
    samples: Vec<Sample>,
}

impl TryFrom<RawTrajectory> for Trajectory {
    type Error = SimulationError;

    fn try_from(raw: RawTrajectory) -> Result<Self> {
        Trajectory::from_samples(raw.time_step, raw.samples)
    }
}

impl Trajectory {
    /// Used by the integrator, which constructs the grid itself.
    pub(crate) fn from_parts(time_step: f64, samples: Vec<Sample>) -> Self {
        Trajectory { time_step, samples }
    }

    /// Accept samples produced elsewhere (e.g. a native simulator), checking
    /// the same invariants the integrator guarantees.
    pub fn from_samples(time_step: f64, samples: Vec<Sample>) -> Result<Self> {
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(SimulationError::InvalidParameter {
                name: "time_step",
                value: time_step,
            });
        }
        if samples.len() < 2 {
            return Err(SimulationError::InsufficientSamples {
                needed: 2,
                found: samples.len(),
            });
        }

        let first = samples[0];
        if first != Sample::default() {
            return Err(SimulationError::MalformedTrajectory {
                line: 0,
                reason: format!("initial state must be zero at t = 0, got {:?}", first),
            });
        }

        for (i, sample) in samples.iter().enumerate() {
            if !sample.is_finite() {
                return Err(SimulationError::NumericalInstability {
                    step: i,
                    time: sample.t,
                });
            }
            let expected = i as f64 * time_step;
            if (sample.t - expected).abs() > GRID_TOLERANCE * expected.max(time_step) {
                return Err(SimulationError::MalformedTrajectory {
                    line: i,
                    reason: format!("time {} is off the grid (expected {})", sample.t, expected),
                });
            }
        }

        // snap onto the exact grid so ensembles can compare time arrays bitwise
        let samples = samples
            .into_iter()
            .enumerate()
            .map(|(i, s)| Sample {
                t: i as f64 * time_step,
                ..s
            })
            .collect();

        Ok(Trajectory { time_step, samples })
    }

    /// Parse the whitespace table `t x y vx vy` written by the native
    /// simulator. Lines starting with `#` and blank lines are skipped; the
    /// time step is inferred from the second sample.
    pub fn parse_table(text: &str) -> Result<Self> {
        let mut samples = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let values = line
                .split_whitespace()
                .map(|field| field.parse::<f64>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| SimulationError::MalformedTrajectory {
                    line: line_no + 1,
                    reason: e.to_string(),
                })?;
            if values.len() != 5 {
                return Err(SimulationError::MalformedTrajectory {
                    line: line_no + 1,
                    reason: format!("expected 5 columns, found {}", values.len()),
                });
            }
            samples.push(Sample {
                t: values[0],
                x: values[1],
                y: values[2],
                vx: values[3],
                vy: values[4],
            });
        }

        if samples.len() < 2 {
            return Err(SimulationError::InsufficientSamples {
                needed: 2,
                found: samples.len(),
            });
        }
        let time_step = samples[1].t - samples[0].t;
        Self::from_samples(time_step, samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Number of integration steps (one less than the number of samples).
    pub fn n_steps(&self) -> usize {
        self.samples.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    pub fn squared_displacement(&self) -> Vec<f64> {
        self.samples.iter().map(Sample::squared_displacement).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(Sample::is_finite)
    }
}
