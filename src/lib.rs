//! Brownian motion from the 2D Langevin equation and the ensemble statistics
//! used to check it against the Einstein relation, the Boltzmann energy
//! distribution and equipartition.

pub mod analysis;
pub mod error;
pub mod langevin;
pub mod params;

pub use analysis::{
    DiffusionEstimator, EnergyAnalyzer, FitMethod, FitResult, FitWindow, MsdCurve,
    TrajectoryEnsemble,
};
pub use error::{Result, SimulationError};
pub use langevin::{integrate, integrate_with, NoiseKind, NoiseSource, Trajectory};
pub use params::SimulationParameters;
