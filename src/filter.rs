//! The filter engine: selects the subset of the table matching a selection.

use crate::model::{FilterSelection, SalesTable, Transaction};

/// The subset of the table matching one filter selection.
///
/// A view borrows from the table and is recomputed for every interaction,
/// never mutated in place. An empty view is a normal value; the KPI and
/// forecast layers define placeholder behavior for it.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    rows: Vec<&'a Transaction>,
}

impl<'a> FilteredView<'a> {
    pub fn rows(&self) -> &[&'a Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Returns the rows whose invoice date falls within the selection's inclusive
/// interval and whose region/product pass the membership tests. An empty
/// region or product list places no restriction on that dimension.
pub fn filter<'a>(table: &'a SalesTable, selection: &FilterSelection) -> FilteredView<'a> {
    let rows = table
        .rows()
        .iter()
        .filter(|t| t.invoice_date >= selection.start && t.invoice_date <= selection.end)
        .filter(|t| selection.regions.is_empty() || selection.regions.contains(&t.region))
        .filter(|t| selection.products.is_empty() || selection.products.contains(&t.product))
        .collect();
    FilteredView { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::transaction;
    use crate::model::SalesTable;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn table() -> SalesTable {
        SalesTable::new(vec![
            transaction("2020-01-01", "West", "Shoes", 10, "100", "10"),
            transaction("2020-01-02", "West", "Apparel", 7, "70", "10"),
            transaction("2020-01-03", "East", "Shoes", 5, "50", "10"),
            transaction("2020-01-05", "East", "Apparel", 3, "30", "10"),
        ])
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let t = table();
        let sel = FilterSelection::new(date("2020-01-02"), date("2020-01-03"));
        let view = filter(&t, &sel);
        assert_eq!(view.len(), 2);
        assert!(view
            .rows()
            .iter()
            .all(|r| r.invoice_date >= sel.start && r.invoice_date <= sel.end));
    }

    #[test]
    fn test_empty_sets_mean_no_restriction() {
        let t = table();
        let sel = FilterSelection::new(date("2020-01-01"), date("2020-01-31"));
        assert_eq!(filter(&t, &sel).len(), 4);
    }

    #[test]
    fn test_region_and_product_membership() {
        let t = table();
        let sel = FilterSelection::new(date("2020-01-01"), date("2020-01-31"))
            .with_regions(["West"])
            .with_products(["Shoes"]);
        let view = filter(&t, &sel);
        assert_eq!(view.len(), 1);
        assert_eq!(view.rows()[0].invoice_date, date("2020-01-01"));
    }

    #[test]
    fn test_no_match_yields_empty_view() {
        let t = table();
        let sel =
            FilterSelection::new(date("2020-01-01"), date("2020-01-31")).with_regions(["South"]);
        let view = filter(&t, &sel);
        assert!(view.is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let t = table();
        let sel = FilterSelection::new(date("2020-01-01"), date("2020-01-03"))
            .with_regions(["West", "East"]);
        let once = filter(&t, &sel);

        // Re-applying the same selection to a table built from the first
        // pass's rows selects exactly the same rows.
        let rebuilt = SalesTable::new(once.rows().iter().map(|r| (*r).clone()).collect());
        let twice = filter(&rebuilt, &sel);
        assert_eq!(
            once.rows().iter().map(|r| *r).collect::<Vec<_>>(),
            twice.rows().iter().map(|r| *r).collect::<Vec<_>>()
        );
    }
}
