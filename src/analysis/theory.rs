//! Closed-form references for a free Brownian particle in 2D.
//!
//! These are only used to judge simulated data, never to generate it.

use std::f64::consts::PI;

/// Velocity relaxation time τ = m/γ
pub fn relaxation_time(mass: f64, friction: f64) -> f64 {
    mass / friction
}

/// Einstein relation D = k_B T / γ (independent of mass)
pub fn diffusion_coefficient(temperature: f64, k_b: f64, friction: f64) -> f64 {
    k_b * temperature / friction
}

/// Exact MSD of the Langevin equation started at rest from the origin,
///
/// ⟨r²(t)⟩ = (4 k_B T / γ) (t − τ (1 − e^{−t/τ}))
///
/// Ballistic (~t²) for t ≪ τ, diffusive (4Dt) for t ≫ τ.
pub fn theoretical_msd(t: f64, temperature: f64, mass: f64, friction: f64, k_b: f64) -> f64 {
    let tau = relaxation_time(mass, friction);
    // -expm1 keeps precision when t/τ is tiny
    (4.0 * k_b * temperature / friction) * (t - tau * (-(-t / tau).exp_m1()))
}

/// Long-time limit 4 D t
pub fn diffusive_msd(t: f64, diffusion: f64) -> f64 {
    4.0 * diffusion * t
}

/// Evaluate `theoretical_msd` on a time grid.
pub fn theoretical_msd_curve(
    times: &[f64],
    temperature: f64,
    mass: f64,
    friction: f64,
    k_b: f64,
) -> Vec<f64> {
    times
        .iter()
        .map(|&t| theoretical_msd(t, temperature, mass, friction, k_b))
        .collect()
}

/// Density of the 2D kinetic energy in equilibrium,
/// P(E) = exp(−E / k_B T) / (k_B T) for E ≥ 0 and zero below.
pub fn boltzmann_energy_density(energy: f64, temperature: f64, k_b: f64) -> f64 {
    if energy < 0.0 {
        return 0.0;
    }
    let kt = k_b * temperature;
    (-energy / kt).exp() / kt
}

/// Equipartition: two quadratic degrees of freedom give ⟨E⟩ = k_B T
pub fn mean_kinetic_energy(temperature: f64, k_b: f64) -> f64 {
    k_b * temperature
}

/// N(0, 1) density, used to check the noise sources.
pub fn standard_normal_density(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}
