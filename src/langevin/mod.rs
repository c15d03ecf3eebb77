//! Stochastic integration of the 2D Langevin equation
//! `m dv/dt = -γ v + ξ(t)`, `dr/dt = v`, with white noise ξ.

pub mod integrator;
pub mod noise;
pub mod trajectory;

pub use integrator::{integrate, integrate_with, EulerMaruyama, Integrator};
pub use noise::{BoxMullerNoise, GaussianNoise, NoiseKind, NoiseSource};
pub use trajectory::{Sample, Trajectory};
