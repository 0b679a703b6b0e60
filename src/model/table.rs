//! The in-memory sales table: the process-wide, read-only dataset.

use crate::model::Transaction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The cleaned transaction collection, loaded once at startup.
///
/// The table is owned by the application's top-level context and passed by
/// reference into every filter/aggregate/forecast call; it is never mutated
/// after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SalesTable {
    rows: Vec<Transaction>,
}

impl SalesTable {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The distinct region names, sorted. Seeds the region selector.
    pub fn regions(&self) -> Vec<String> {
        self.distinct(|t| &t.region)
    }

    /// The distinct product names, sorted. Seeds the product selector.
    pub fn products(&self) -> Vec<String> {
        self.distinct(|t| &t.product)
    }

    /// The earliest and latest invoice dates, or `None` for an empty table.
    /// Seeds the date-range selector's defaults.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|t| t.invoice_date).min()?;
        let max = self.rows.iter().map(|t| t.invoice_date).max()?;
        Some((min, max))
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&Transaction) -> &String,
    {
        let set: BTreeSet<&String> = self.rows.iter().map(field).collect();
        set.into_iter().cloned().collect()
    }
}
