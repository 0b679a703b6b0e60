//! Aggregation over a filtered view: the daily units series, the per-product
//! sales breakdown, and the three scalar KPIs.

use crate::filter::FilteredView;
use crate::model::Money;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Units sold per calendar date, ordered by date.
///
/// This is the direct input to both the trend chart and the forecast adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAggregate(BTreeMap<NaiveDate, i64>);

impl DailyAggregate {
    /// Sums units sold per invoice date over the view.
    pub fn from_view(view: &FilteredView<'_>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for row in view.rows() {
            *by_date.entry(row.invoice_date).or_insert(0) += row.units_sold;
        }
        Self(by_date)
    }

    #[cfg(test)]
    pub(crate) fn from_points(points: impl IntoIterator<Item = (NaiveDate, i64)>) -> Self {
        Self(points.into_iter().collect())
    }

    /// The (date, units) points in ascending date order.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, i64)> + '_ {
        self.0.iter().map(|(d, u)| (*d, *u))
    }

    /// The number of distinct observed dates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sum over all dates; equals the units-sold KPI for the same view.
    pub fn total_units(&self) -> i64 {
        self.0.values().sum()
    }

    /// The last observed date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.0.keys().next_back().copied()
    }
}

/// One slice of the per-product sales breakdown (the pie chart's input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductShare {
    pub product: String,
    pub total_sales: Money,
}

/// Sums total sales per product over the view, largest share first.
pub fn product_breakdown(view: &FilteredView<'_>) -> Vec<ProductShare> {
    let mut by_product: BTreeMap<&str, Decimal> = BTreeMap::new();
    for row in view.rows() {
        *by_product.entry(row.product.as_str()).or_default() += row.total_sales.value();
    }
    let mut shares: Vec<ProductShare> = by_product
        .into_iter()
        .map(|(product, total)| ProductShare {
            product: product.to_string(),
            total_sales: Money::new(total),
        })
        .collect();
    // BTreeMap gives name order; present the largest slice first instead.
    shares.sort_by(|a, b| b.total_sales.cmp(&a.total_sales));
    shares
}

/// The three scalar KPIs over a filtered view.
///
/// An empty view is a defined state, not an error: every accessor renders the
/// exact zero placeholders instead of an undefined mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Kpis {
    pub total_sales: Money,
    pub units_sold: i64,
    pub avg_price: Money,
    row_count: usize,
}

impl Kpis {
    /// Computes the KPIs in a single pass over the view.
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let row_count = view.len();
        if row_count == 0 {
            return Self::default();
        }
        let mut total_sales = Decimal::ZERO;
        let mut units_sold = 0i64;
        let mut price_sum = Decimal::ZERO;
        for row in view.rows() {
            total_sales += row.total_sales.value();
            units_sold += row.units_sold;
            price_sum += row.price_per_unit.value();
        }
        Self {
            total_sales: Money::new(total_sales),
            units_sold,
            avg_price: Money::new(price_sum / Decimal::from(row_count as u64)),
            row_count,
        }
    }

    /// True when the KPIs were computed from an empty view.
    pub fn is_placeholder(&self) -> bool {
        self.row_count == 0
    }

    /// "Total Sales: $1,234,567" or the "$0" placeholder.
    pub fn total_sales_text(&self) -> String {
        if self.is_placeholder() {
            return "Total Sales: $0".to_string();
        }
        format!(
            "Total Sales: ${}",
            format_num::format_num!(",.0", self.total_sales.to_f64())
        )
    }

    /// "Units Sold: 1,234" or the "0" placeholder.
    pub fn units_sold_text(&self) -> String {
        if self.is_placeholder() {
            return "Units Sold: 0".to_string();
        }
        format!(
            "Units Sold: {}",
            format_num::format_num!(",.0", self.units_sold as f64)
        )
    }

    /// "Avg Price: $45.22" or the "$0" placeholder.
    pub fn avg_price_text(&self) -> String {
        if self.is_placeholder() {
            return "Avg Price: $0".to_string();
        }
        format!(
            "Avg Price: ${}",
            format_num::format_num!(".2", self.avg_price.to_f64())
        )
    }
}
