use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ensemble::MsdCurve;
use crate::error::{Result, SimulationError};

/// How D is extracted from `MSD ≈ 4 D t` inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMethod {
    /// D = mean(MSD_i / 4 t_i)
    #[default]
    RatioMean,
    /// Least squares MSD = a t + b with free intercept, D = a / 4
    LinearRegression,
}

impl FromStr for FitMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ratio" | "ratio_mean" | "ratio-mean" => Ok(FitMethod::RatioMean),
            "regression" | "linear_regression" | "linear-regression" | "lstsq" => {
                Ok(FitMethod::LinearRegression)
            }
            other => Err(format!("unknown fit method: {other}")),
        }
    }
}

/// Inclusive time bounds of the fit. A missing start defaults to
/// `t[len / 2]`, a missing end to the last time, so the default window is
/// the second half of the run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FitWindow {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

impl FitWindow {
    pub fn new(start: f64, end: f64) -> Self {
        FitWindow {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn from_start(start: f64) -> Self {
        FitWindow {
            start: Some(start),
            end: None,
        }
    }

    /// Resolve against a concrete time array.
    pub fn bounds(&self, times: &[f64]) -> Result<(f64, f64)> {
        if times.is_empty() {
            return Err(SimulationError::InsufficientSamples { needed: 1, found: 0 });
        }
        let start = self.start.unwrap_or(times[times.len() / 2]);
        let end = self.end.unwrap_or(times[times.len() - 1]);
        for (name, value) in [("window_start", start), ("window_end", end)] {
            if value.is_nan() {
                return Err(SimulationError::InvalidParameter { name, value });
            }
        }
        Ok((start, end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub d_estimate: f64,
    pub window_start: f64,
    pub window_end: f64,
    pub method: FitMethod,
    /// Points inside the window that entered the fit
    pub n_points: usize,
    /// Fitted intercept (regression only)
    pub intercept: Option<f64>,
}

impl FitResult {
    pub fn relative_error(&self, reference: f64) -> f64 {
        (self.d_estimate - reference).abs() / reference.abs()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiffusionEstimator {
    pub method: FitMethod,
}

impl DiffusionEstimator {
    pub fn new(method: FitMethod) -> Self {
        Self { method }
    }

    pub fn fit_curve(&self, curve: &MsdCurve, window: FitWindow) -> Result<FitResult> {
        self.fit(&curve.values, &curve.times, window)
    }

    pub fn fit(&self, msd: &[f64], times: &[f64], window: FitWindow) -> Result<FitResult> {
        if msd.len() != times.len() {
            return Err(SimulationError::InconsistentGrid {
                reason: format!(
                    "MSD has {} points but the time array has {}",
                    msd.len(),
                    times.len()
                ),
            });
        }
        let (window_start, window_end) = window.bounds(times)?;

        let selected: Vec<usize> = times
            .iter()
            .enumerate()
            .filter(|&(_, &t)| t >= window_start && t <= window_end)
            .map(|(i, _)| i)
            .collect();

        // points at t = 0 carry no diffusive information
        let positive = selected.iter().filter(|&&i| times[i] > 0.0).count();
        if positive == 0 {
            return Err(SimulationError::InsufficientSamples {
                needed: 1,
                found: 0,
            });
        }

        let (d_estimate, intercept) = match self.method {
            FitMethod::RatioMean => (ratio_mean(msd, times, &selected)?, None),
            FitMethod::LinearRegression => {
                let (slope, intercept) = least_squares(msd, times, &selected)?;
                (slope / 4.0, Some(intercept))
            }
        };

        Ok(FitResult {
            d_estimate,
            window_start,
            window_end,
            method: self.method,
            n_points: selected.len(),
            intercept,
        })
    }
}

fn ratio_mean(msd: &[f64], times: &[f64], selected: &[usize]) -> Result<f64> {
    let mut sum = 0.0;
    for &i in selected {
        if times[i] == 0.0 {
            return Err(SimulationError::DivisionByZero { index: i });
        }
        sum += msd[i] / (4.0 * times[i]);
    }
    Ok(sum / selected.len() as f64)
}

/// Ordinary least squares `y = a t + b`, returns `(a, b)`.
fn least_squares(msd: &[f64], times: &[f64], selected: &[usize]) -> Result<(f64, f64)> {
    let n = selected.len();
    if n < 2 {
        return Err(SimulationError::InsufficientSamples { needed: 2, found: n });
    }
    let n_f = n as f64;
    let mean_t = selected.iter().map(|&i| times[i]).sum::<f64>() / n_f;
    let mean_y = selected.iter().map(|&i| msd[i]).sum::<f64>() / n_f;

    let (s_ty, s_tt) = selected.iter().fold((0.0, 0.0), |(s_ty, s_tt), &i| {
        let dt = times[i] - mean_t;
        (s_ty + dt * (msd[i] - mean_y), s_tt + dt * dt)
    });
    if s_tt == 0.0 {
        return Err(SimulationError::InsufficientSamples { needed: 2, found: 1 });
    }

    let slope = s_ty / s_tt;
    Ok((slope, mean_y - slope * mean_t))
}
