//! The additive trend + seasonality model behind the forecast adapter.

use crate::Result;
use anyhow::bail;
use chrono::{Datelike, NaiveDate};

/// Observations per weekday required before the weekly component is fitted.
/// Below this the seasonal terms are noise and the model stays trend-only.
const MIN_SEASONAL_OBSERVATIONS: usize = 14;

/// Z-score for the 95% confidence band.
const Z_95: f64 = 1.96;

/// An additive model: least-squares linear trend plus a centered day-of-week
/// seasonal component, with confidence bands derived from the in-sample
/// residuals.
///
/// The model is deliberately small. It exists to give the dashboard a point
/// estimate with an uncertainty band, not to compete with a full statistical
/// package.
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    origin: NaiveDate,
    intercept: f64,
    slope: f64,
    /// Centered seasonal offsets indexed by `weekday().num_days_from_monday()`.
    weekday: [f64; 7],
    residual_std: f64,
}

/// A single prediction: point estimate plus a lower/upper band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

impl AdditiveModel {
    /// Fits the model on a (date, value) series in ascending date order.
    ///
    /// Requires at least two distinct dates; callers must screen shorter
    /// input before fitting (the adapter returns a placeholder instead).
    pub fn fit(observations: &[(NaiveDate, f64)]) -> Result<Self> {
        let n = observations.len();
        if n < 2 || observations.first().map(|o| o.0) == observations.last().map(|o| o.0) {
            bail!("the model requires at least two distinct observed dates, got {n} observations");
        }

        let origin = observations[0].0;
        let xs: Vec<f64> = observations
            .iter()
            .map(|(d, _)| (*d - origin).num_days() as f64)
            .collect();
        let ys: Vec<f64> = observations.iter().map(|(_, y)| *y).collect();

        let (intercept, slope) = least_squares(&xs, &ys);

        // Detrend, then average the remainder by weekday if there is enough
        // data for the weekly shape to mean anything.
        let detrended: Vec<f64> = xs
            .iter()
            .zip(ys.iter())
            .map(|(x, y)| y - (intercept + slope * x))
            .collect();

        let mut weekday = [0.0f64; 7];
        if n >= MIN_SEASONAL_OBSERVATIONS {
            let mut sums = [0.0f64; 7];
            let mut counts = [0usize; 7];
            for ((d, _), r) in observations.iter().zip(detrended.iter()) {
                let wd = d.weekday().num_days_from_monday() as usize;
                sums[wd] += r;
                counts[wd] += 1;
            }
            for wd in 0..7 {
                if counts[wd] > 0 {
                    weekday[wd] = sums[wd] / counts[wd] as f64;
                }
            }
            // Center the component so it carries no net trend offset.
            let mean: f64 = weekday.iter().sum::<f64>() / 7.0;
            for w in weekday.iter_mut() {
                *w -= mean;
            }
        }

        // Residuals against the full fit drive the confidence band width.
        let residuals: Vec<f64> = observations
            .iter()
            .zip(xs.iter())
            .map(|((d, y), x)| {
                let wd = d.weekday().num_days_from_monday() as usize;
                y - (intercept + slope * x + weekday[wd])
            })
            .collect();
        let residual_std = std_dev(&residuals);

        Ok(Self {
            origin,
            intercept,
            slope,
            weekday,
            residual_std,
        })
    }

    /// Predicts the value for `date` with a 95% band.
    ///
    /// `future_step` is zero for in-sample dates and counts up for dates past
    /// the last observation; the band widens with the square root of the
    /// step, mirroring how forecast uncertainty grows with the horizon.
    pub fn predict(&self, date: NaiveDate, future_step: u32) -> Prediction {
        let x = (date - self.origin).num_days() as f64;
        let wd = date.weekday().num_days_from_monday() as usize;
        let predicted = self.intercept + self.slope * x + self.weekday[wd];

        let se = if future_step == 0 {
            self.residual_std
        } else {
            self.residual_std * (future_step as f64).sqrt()
        };
        Prediction {
            predicted,
            lower: predicted - Z_95 * se,
            upper: predicted + Z_95 * se,
        }
    }
}

/// Ordinary least squares for y = intercept + slope * x.
fn least_squares(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        sxx += (x - x_mean) * (x - x_mean);
        sxy += (x - x_mean) * (y - y_mean);
    }
    // sxx is only zero when all dates coincide, which `fit` rejects.
    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    (y_mean - slope * x_mean, slope)
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
