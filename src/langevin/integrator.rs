use nalgebra::Vector2;
use tracing::debug;

use super::noise::{GaussianNoise, NoiseSource};
use super::trajectory::{Sample, Trajectory};
use crate::error::{Result, SimulationError};
use crate::params::SimulationParameters;

pub trait Integrator {
    /// Advance the system by dt
    fn step(&mut self, dt: f64);

    /// Compute the instantaneous temperature
    fn temperature(&self) -> f64;
}

/// Explicit Euler-Maruyama scheme for a free Brownian particle in 2D:
///
/// ```text
/// v <- v - (γ/m) v dt + sqrt(2γ k_B T / m) sqrt(dt) η
/// r <- r + v dt
/// ```
///
/// The position update uses the freshly updated velocity.
pub struct EulerMaruyama<N: NoiseSource> {
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    pub mass: f64,
    pub steps: usize,
    drag_rate: f64,
    noise_amplitude: f64,
    k_b: f64,
    noise: N,
}

impl<N: NoiseSource> EulerMaruyama<N> {
    /// Particle at rest at the origin.
    pub fn new(params: &SimulationParameters, noise: N) -> Self {
        EulerMaruyama {
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
            mass: params.mass,
            steps: 0,
            drag_rate: params.drag_rate(),
            noise_amplitude: params.noise_amplitude(),
            k_b: params.k_boltzmann,
            noise,
        }
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.dot(&self.velocity)
    }

    pub fn sample(&self, t: f64) -> Sample {
        Sample {
            t,
            x: self.position.x,
            y: self.position.y,
            vx: self.velocity.x,
            vy: self.velocity.y,
        }
    }
}

impl<N: NoiseSource> Integrator for EulerMaruyama<N> {
    fn step(&mut self, dt: f64) {
        let (eta_x, eta_y) = self.noise.sample_pair();
        let kick = Vector2::new(eta_x, eta_y) * (self.noise_amplitude * dt.sqrt());

        self.velocity = self.velocity - self.velocity * self.drag_rate * dt + kick;
        self.position += self.velocity * dt;
        self.steps += 1;
    }

    fn temperature(&self) -> f64 {
        // two translational degrees of freedom
        self.kinetic_energy() / self.k_b
    }
}

/// Integrate one run with a `GaussianNoise` source built from `params.seed`.
pub fn integrate(params: &SimulationParameters) -> Result<Trajectory> {
    params.validate()?;
    params.check_stability();
    integrate_with(params, GaussianNoise::new(params.seed))
}

/// Integrate one run drawing kicks from `noise`.
///
/// Either a complete, finite trajectory of `n_steps + 1` samples is returned
/// or an error; no partial result escapes.
pub fn integrate_with<N: NoiseSource>(
    params: &SimulationParameters,
    noise: N,
) -> Result<Trajectory> {
    params.validate()?;

    let dt = params.time_step;
    let mut integrator = EulerMaruyama::new(params, noise);
    let mut samples = Vec::with_capacity(params.n_steps + 1);
    samples.push(integrator.sample(0.0));

    for n in 0..params.n_steps {
        integrator.step(dt);
        let t = (n + 1) as f64 * dt;
        let sample = integrator.sample(t);
        if !sample.is_finite() {
            return Err(SimulationError::NumericalInstability { step: n + 1, time: t });
        }
        samples.push(sample);
    }

    debug!(
        "run finished: {} steps, r^2 = {:.6}, T_kin = {:.6}",
        params.n_steps,
        integrator.position.norm_squared(),
        integrator.temperature()
    );

    Ok(Trajectory::from_parts(dt, samples))
}
