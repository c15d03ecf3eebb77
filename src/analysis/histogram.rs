use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Equal-width histogram over `[min, max]` of the data, normalised so the
/// bars integrate to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub density: Vec<f64>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "bins",
                value: 0.0,
            });
        }
        if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(SimulationError::InvalidParameter {
                name: "histogram value",
                value: bad,
            });
        }

        let (mut lo, mut hi) = match values.iter().copied().minmax() {
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::NoElements => {
                return Err(SimulationError::InsufficientSamples { needed: 1, found: 0 })
            }
        };
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();

        let mut counts = vec![0usize; bins];
        for &v in values {
            // the last bin is closed on the right
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let norm = values.len() as f64 * width;
        let density = counts.iter().map(|&c| c as f64 / norm).collect();

        Ok(Histogram {
            edges,
            counts,
            density,
        })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Pair every bin centre with its empirical density and `reference(centre)`.
    pub fn compare_with<F: Fn(f64) -> f64>(&self, reference: F) -> Vec<DensityPoint> {
        self.centers()
            .into_iter()
            .zip(&self.density)
            .map(|(center, &empirical)| DensityPoint {
                center,
                empirical,
                theory: reference(center),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub center: f64,
    pub empirical: f64,
    pub theory: f64,
}

/// Mean and population variance.
pub fn mean_and_variance(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance))
}
