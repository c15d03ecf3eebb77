//! Error type shared by the integrator and the ensemble statistics.

use std::fmt;

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A physical or numerical parameter is outside its domain.
    InvalidParameter { name: &'static str, value: f64 },
    /// Ensemble members do not share one `(dt, n_steps)` time grid.
    InconsistentGrid { reason: String },
    /// A window or aggregation selected fewer points than required.
    InsufficientSamples { needed: usize, found: usize },
    /// The ratio-mean fit window contains `t = 0`.
    DivisionByZero { index: usize },
    /// A non-finite sample was produced by the explicit scheme.
    NumericalInstability { step: usize, time: f64 },
    /// An externally produced trajectory table could not be accepted.
    MalformedTrajectory { line: usize, reason: String },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidParameter { name, value } => {
                write!(f, "invalid parameter `{name}` = {value}")
            }
            SimulationError::InconsistentGrid { reason } => {
                write!(f, "ensemble members do not share a time grid: {reason}")
            }
            SimulationError::InsufficientSamples { needed, found } => write!(
                f,
                "insufficient samples: needed at least {needed}, found {found}"
            ),
            SimulationError::DivisionByZero { index } => write!(
                f,
                "fit window includes t = 0 at index {index}; MSD/(4t) is undefined there"
            ),
            SimulationError::NumericalInstability { step, time } => write!(
                f,
                "non-finite state at step {step} (t = {time}); reduce dt relative to m/gamma"
            ),
            SimulationError::MalformedTrajectory { line, reason } => {
                write!(f, "malformed trajectory at line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for SimulationError {}
