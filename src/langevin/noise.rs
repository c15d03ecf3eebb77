use std::f64::consts::PI;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Source of independent standard-normal variates.
///
/// A seeded source replays the same sequence when called in the same order.
/// The integrator draws the x and y kicks as two consecutive calls.
pub trait NoiseSource {
    fn sample(&mut self) -> f64;

    fn sample_pair(&mut self) -> (f64, f64) {
        let x = self.sample();
        let y = self.sample();
        (x, y)
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn sample(&mut self) -> f64 {
        (**self).sample()
    }
}

/// Normal variates from `rand_distr::StandardNormal` (ziggurat) on a ChaCha `StdRng`.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: StdRng,
}

impl GaussianNoise {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl NoiseSource for GaussianNoise {
    #[inline]
    fn sample(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

/// Box-Muller transform, `sqrt(-2 ln u1) cos(2π u2)` with `u1, u2` uniform on (0, 1).
///
/// Only the cosine branch is used, so every variate costs two uniforms.
#[derive(Debug, Clone)]
pub struct BoxMullerNoise {
    rng: StdRng,
}

impl BoxMullerNoise {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    #[inline]
    fn open_unit(&mut self) -> f64 {
        // gen::<f64>() is in [0, 1); flip it to (0, 1] and reject the 1.0 endpoint
        loop {
            let u = 1.0 - self.rng.gen::<f64>();
            if u < 1.0 {
                return u;
            }
        }
    }
}

impl NoiseSource for BoxMullerNoise {
    fn sample(&mut self) -> f64 {
        let u1 = self.open_unit();
        let u2 = self.open_unit();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }
}

/// Which generator an ensemble builds for each of its runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    #[default]
    Gaussian,
    BoxMuller,
}

impl NoiseKind {
    pub fn build(self, seed: Option<u64>) -> Box<dyn NoiseSource + Send> {
        match self {
            NoiseKind::Gaussian => Box::new(GaussianNoise::new(seed)),
            NoiseKind::BoxMuller => Box::new(BoxMullerNoise::new(seed)),
        }
    }
}

impl FromStr for NoiseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gaussian" | "normal" => Ok(NoiseKind::Gaussian),
            "box_muller" | "box-muller" | "boxmuller" => Ok(NoiseKind::BoxMuller),
            other => Err(format!("unknown noise kind: {other}")),
        }
    }
}

/// Draw `n` variates from `source`.
pub fn draw<N: NoiseSource>(source: &mut N, n: usize) -> Vec<f64> {
    (0..n).map(|_| source.sample()).collect()
}
