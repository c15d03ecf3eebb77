pub mod diffusion;
pub mod energy;
pub mod ensemble;
pub mod histogram;
pub mod study;
pub mod theory;

pub use diffusion::{DiffusionEstimator, FitMethod, FitResult, FitWindow};
pub use energy::{EnergyAnalyzer, EnergySummary};
pub use ensemble::{MsdCurve, TrajectoryEnsemble};
pub use histogram::{DensityPoint, Histogram};
pub use study::{ParameterSweep, SweptParameter};

#[cfg(test)]
mod tests;
