//! Types that represent the core data model, such as `Transaction` and `SalesTable`.
mod money;
mod selection;
mod table;
mod transaction;

pub use money::{Money, MoneyError};
pub use selection::{AuditAction, FilterSelection};
pub use table::SalesTable;
pub use transaction::{SalesColumn, Transaction};

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Money, Transaction};
    use chrono::NaiveDate;
    use std::str::FromStr;

    /// Builds a minimal transaction for tests; `date` is ISO formatted and the
    /// money fields are plain decimal strings.
    pub(crate) fn transaction(
        date: &str,
        region: &str,
        product: &str,
        units: i64,
        total: &str,
        price: &str,
    ) -> Transaction {
        Transaction {
            retailer: "Foot Locker".to_string(),
            retailer_id: "1185732".to_string(),
            invoice_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            region: region.to_string(),
            state: "New York".to_string(),
            city: "New York".to_string(),
            product: product.to_string(),
            price_per_unit: Money::from_str(price).unwrap(),
            units_sold: units,
            total_sales: Money::from_str(total).unwrap(),
            operating_profit: Money::default(),
            operating_margin: 0.0,
            sales_method: "In-store".to_string(),
        }
    }
}
