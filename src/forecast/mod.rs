//! The forecast adapter: reshapes a daily aggregate into the model's
//! two-column (date, value) input and reshapes its predictions into a
//! plottable series.

mod model;

use crate::aggregate::DailyAggregate;
use chrono::{Days, NaiveDate};
pub use model::AdditiveModel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One forecasted date: the point estimate plus its uncertainty band.
///
/// The three values render as three separate chart series; `lower <=
/// predicted <= upper` holds for every point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Fits the model on the daily aggregate and predicts every observed date
/// plus `horizon_days` consecutive days past the last observation.
///
/// A daily aggregate with fewer than two distinct dates under-determines the
/// model, so the fit is skipped entirely and an empty series is returned; the
/// chart layer shows a title-only placeholder for it.
pub fn forecast(daily: &DailyAggregate, horizon_days: u32) -> Vec<ForecastPoint> {
    if daily.len() < 2 {
        debug!(
            observed = daily.len(),
            "daily aggregate under-determines the model, skipping fit"
        );
        return Vec::new();
    }

    // Reshape into the model's (date, value) contract.
    let observations: Vec<(NaiveDate, f64)> =
        daily.points().map(|(d, u)| (d, u as f64)).collect();

    let model = match AdditiveModel::fit(&observations) {
        Ok(model) => model,
        Err(e) => {
            // Unreachable given the length screen above, but an unforecastable
            // aggregate must degrade to the placeholder, never to a panic.
            debug!("model fit failed: {e}");
            return Vec::new();
        }
    };

    let last_observed = observations[observations.len() - 1].0;
    let mut points: Vec<ForecastPoint> = Vec::with_capacity(observations.len() + horizon_days as usize);

    // In-sample predictions for each observed date, then the future frame.
    for (d, _) in &observations {
        points.push(to_point(&model, *d, 0));
    }
    for step in 1..=horizon_days {
        let date = last_observed + Days::new(step as u64);
        points.push(to_point(&model, date, step));
    }
    points
}

fn to_point(model: &AdditiveModel, date: NaiveDate, future_step: u32) -> ForecastPoint {
    let p = model.predict(date, future_step);
    ForecastPoint {
        date,
        predicted: p.predicted,
        lower: p.lower,
        upper: p.upper,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DailyAggregate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_aggregate_yields_placeholder() {
        assert!(forecast(&DailyAggregate::default(), 90).is_empty());
    }

    #[test]
    fn test_single_date_yields_placeholder() {
        let daily = DailyAggregate::from_points([(date("2020-01-01"), 5)]);
        assert!(forecast(&daily, 90).is_empty());
    }

    #[test]
    fn test_two_dates_horizon_ninety() {
        let daily =
            DailyAggregate::from_points([(date("2020-01-01"), 5), (date("2020-01-02"), 7)]);
        let points = forecast(&daily, 90);

        // Two observed dates plus ninety future ones.
        assert_eq!(points.len(), 92);

        // The first two approximate the in-sample fit.
        assert!((points[0].predicted - 5.0).abs() < 1e-6);
        assert!((points[1].predicted - 7.0).abs() < 1e-6);

        // The rest are future-dated past the last observation.
        assert!(points[2..].iter().all(|p| p.date > date("2020-01-02")));
        assert_eq!(points.last().unwrap().date, date("2020-04-01"));
    }

    #[test]
    fn test_dates_strictly_increasing_and_bands_ordered() {
        let daily = DailyAggregate::from_points(
            (0..30).map(|i| (date("2020-01-01") + Days::new(i), 40 + (i as i64 % 5) * 3)),
        );
        let points = forecast(&daily, 30);
        assert_eq!(points.len(), 60);

        for pair in points.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for p in &points {
            assert!(p.lower <= p.predicted && p.predicted <= p.upper);
        }
    }

    #[test]
    fn test_gapped_observations_keep_observed_dates_only() {
        // Observed dates need not be consecutive; the in-sample frame keeps
        // only the dates that were actually observed.
        let daily = DailyAggregate::from_points([
            (date("2020-01-01"), 5),
            (date("2020-01-04"), 9),
            (date("2020-01-09"), 11),
        ]);
        let points = forecast(&daily, 10);
        assert_eq!(points.len(), 13);
        assert_eq!(points[1].date, date("2020-01-04"));
        assert_eq!(points[3].date, date("2020-01-10"));
    }
}
