//! The user's current filter selection and the audit panel actions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A filter selection: an inclusive date interval plus optional region and
/// product restrictions.
///
/// Selections are transient. One is rebuilt from the control surface on every
/// interaction and has no identity beyond "current". Empty `regions` or
/// `products` means no restriction on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterSelection {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub regions: Vec<String>,
    pub products: Vec<String>,
}

impl FilterSelection {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            regions: Vec::new(),
            products: Vec::new(),
        }
    }

    pub fn with_regions<S: Into<String>>(mut self, regions: impl IntoIterator<Item = S>) -> Self {
        self.regions = regions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_products<S: Into<String>>(mut self, products: impl IntoIterator<Item = S>) -> Self {
        self.products = products.into_iter().map(Into::into).collect();
        self
    }
}

/// An audit panel action, carrying no payload of its own; the current
/// `FilterSelection` travels alongside it to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditAction {
    /// Append the current selection to the audit log and show the full list.
    Save,
    /// Show every saved selection.
    ViewPast,
    /// Remove every saved selection.
    DeleteAll,
}

serde_plain::derive_display_from_serialize!(AuditAction);
serde_plain::derive_fromstr_from_deserialize!(AuditAction);
