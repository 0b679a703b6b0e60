//! The `Transaction` record and the fixed column schema of the sales sheet.

use crate::model::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A single cleaned row from the sales sheet.
///
/// Instances are created once at load time and are immutable thereafter. The
/// loader guarantees that `units_sold`, `total_sales` and `price_per_unit` are
/// strictly positive and that `invoice_date` is a valid calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub retailer: String,
    pub retailer_id: String,
    pub invoice_date: NaiveDate,
    pub region: String,
    pub state: String,
    pub city: String,
    pub product: String,
    pub price_per_unit: Money,
    pub units_sold: i64,
    pub total_sales: Money,
    pub operating_profit: Money,
    pub operating_margin: f64,
    pub sales_method: String,
}

impl Transaction {
    /// Builds a `Transaction` from one data row whose cells are ordered per
    /// [`SalesColumn::HEADERS`].
    ///
    /// Returns `None` when the row must be dropped: a missing or unparseable
    /// invoice date, units sold, total sales or price per unit, or any of
    /// those three numeric fields being non-positive. Optional fields
    /// (operating profit/margin) fall back to zero when unparseable.
    pub fn from_row<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        let cell = |col: SalesColumn| -> &str {
            cells
                .get(col as usize)
                .map(|s| s.as_ref().trim())
                .unwrap_or_default()
        };

        let invoice_date = parse_date(cell(SalesColumn::InvoiceDate))?;
        let units_sold = parse_units(cell(SalesColumn::UnitsSold))?;
        let total_sales = parse_required_money(cell(SalesColumn::TotalSales))?;
        let price_per_unit = parse_required_money(cell(SalesColumn::PricePerUnit))?;
        if units_sold <= 0 || !total_sales.is_positive() || !price_per_unit.is_positive() {
            return None;
        }

        Some(Self {
            retailer: cell(SalesColumn::Retailer).to_string(),
            retailer_id: cell(SalesColumn::RetailerId).to_string(),
            invoice_date,
            region: cell(SalesColumn::Region).to_string(),
            state: cell(SalesColumn::State).to_string(),
            city: cell(SalesColumn::City).to_string(),
            product: cell(SalesColumn::Product).to_string(),
            price_per_unit,
            units_sold,
            total_sales,
            operating_profit: Money::from_str(cell(SalesColumn::OperatingProfit))
                .unwrap_or_default(),
            operating_margin: parse_margin(cell(SalesColumn::OperatingMargin)),
            sales_method: cell(SalesColumn::SalesMethod).to_string(),
        })
    }
}

/// Parses an invoice date. The xlsx path normalizes date cells to ISO format,
/// but raw string cells sometimes carry US-style dates.
fn parse_date(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

/// Parses a required money cell. An empty cell is a missing value, not zero.
fn parse_required_money(s: &str) -> Option<Money> {
    if s.is_empty() {
        return None;
    }
    Money::from_str(s).ok()
}

/// Parses a units-sold cell. Spreadsheet numerics may render as "200" or
/// "200.0" and may carry thousands separators.
fn parse_units(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    let cleaned = s.replace(',', "");
    if let Ok(n) = cleaned.parse::<i64>() {
        return Some(n);
    }
    let f = cleaned.parse::<f64>().ok()?;
    if !f.is_finite() {
        return None;
    }
    Some(f.round() as i64)
}

/// Parses an operating margin cell, which may be a ratio ("0.35") or a
/// percentage ("35%"). Unparseable values fall back to zero.
fn parse_margin(s: &str) -> f64 {
    if let Some(pct) = s.strip_suffix('%') {
        return pct.trim().parse::<f64>().map(|p| p / 100.0).unwrap_or(0.0);
    }
    s.parse().unwrap_or(0.0)
}

/// Represents the known data columns of the sales sheet, in sheet order.
///
/// The sheet also carries a leading row-index column which the loader drops
/// before rows reach this schema.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesColumn {
    Retailer,
    RetailerId,
    InvoiceDate,
    Region,
    State,
    City,
    Product,
    PricePerUnit,
    UnitsSold,
    TotalSales,
    OperatingProfit,
    OperatingMargin,
    SalesMethod,
}

serde_plain::derive_display_from_serialize!(SalesColumn);
serde_plain::derive_fromstr_from_deserialize!(SalesColumn);

impl SalesColumn {
    /// The header names, in sheet order. This is the hard schema contract: the
    /// loader fails fatally when the sheet's header row does not match.
    pub const HEADERS: [&'static str; 13] = [
        RETAILER_STR,
        RETAILER_ID_STR,
        INVOICE_DATE_STR,
        REGION_STR,
        STATE_STR,
        CITY_STR,
        PRODUCT_STR,
        PRICE_PER_UNIT_STR,
        UNITS_SOLD_STR,
        TOTAL_SALES_STR,
        OPERATING_PROFIT_STR,
        OPERATING_MARGIN_STR,
        SALES_METHOD_STR,
    ];

    pub fn header_str(&self) -> &'static str {
        Self::HEADERS[*self as usize]
    }
}

pub(crate) const RETAILER_STR: &str = "Retailer";
pub(crate) const RETAILER_ID_STR: &str = "Retailer ID";
pub(crate) const INVOICE_DATE_STR: &str = "Invoice Date";
pub(crate) const REGION_STR: &str = "Region";
pub(crate) const STATE_STR: &str = "State";
pub(crate) const CITY_STR: &str = "City";
pub(crate) const PRODUCT_STR: &str = "Product";
pub(crate) const PRICE_PER_UNIT_STR: &str = "Price per Unit";
pub(crate) const UNITS_SOLD_STR: &str = "Units Sold";
pub(crate) const TOTAL_SALES_STR: &str = "Total Sales";
pub(crate) const OPERATING_PROFIT_STR: &str = "Operating Profit";
pub(crate) const OPERATING_MARGIN_STR: &str = "Operating Margin";
pub(crate) const SALES_METHOD_STR: &str = "Sales Method";

#[cfg(test)]
mod tests {
    use super::*;

    fn good_row() -> Vec<String> {
        vec![
            "Foot Locker".to_string(),
            "1185732".to_string(),
            "2020-01-01".to_string(),
            "Northeast".to_string(),
            "New York".to_string(),
            "New York".to_string(),
            "Men's Street Footwear".to_string(),
            "$50.00".to_string(),
            "1200".to_string(),
            "$600,000".to_string(),
            "$300,000".to_string(),
            "0.5".to_string(),
            "In-store".to_string(),
        ]
    }

    #[test]
    fn test_from_row_parses_all_fields() {
        let t = Transaction::from_row(&good_row()).unwrap();
        assert_eq!(t.retailer, "Foot Locker");
        assert_eq!(t.invoice_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(t.units_sold, 1200);
        assert_eq!(t.total_sales.to_string(), "$600,000.00");
        assert_eq!(t.operating_margin, 0.5);
    }

    #[test]
    fn test_from_row_drops_missing_date() {
        let mut row = good_row();
        row[SalesColumn::InvoiceDate as usize] = "not-a-date".to_string();
        assert!(Transaction::from_row(&row).is_none());
        row[SalesColumn::InvoiceDate as usize] = String::new();
        assert!(Transaction::from_row(&row).is_none());
    }

    #[test]
    fn test_from_row_drops_missing_required_numerics() {
        for col in [
            SalesColumn::UnitsSold,
            SalesColumn::TotalSales,
            SalesColumn::PricePerUnit,
        ] {
            let mut row = good_row();
            row[col as usize] = String::new();
            assert!(Transaction::from_row(&row).is_none(), "{col} missing");
        }
    }

    #[test]
    fn test_from_row_drops_non_positive_values() {
        for col in [
            SalesColumn::UnitsSold,
            SalesColumn::TotalSales,
            SalesColumn::PricePerUnit,
        ] {
            let mut row = good_row();
            row[col as usize] = "0".to_string();
            assert!(Transaction::from_row(&row).is_none(), "{col} zero");
            row[col as usize] = "-5".to_string();
            assert!(Transaction::from_row(&row).is_none(), "{col} negative");
        }
    }

    #[test]
    fn test_from_row_tolerates_missing_optional_fields() {
        let mut row = good_row();
        row[SalesColumn::OperatingProfit as usize] = String::new();
        row[SalesColumn::OperatingMargin as usize] = String::new();
        let t = Transaction::from_row(&row).unwrap();
        assert!(t.operating_profit.is_zero());
        assert_eq!(t.operating_margin, 0.0);
    }

    #[test]
    fn test_us_style_date_and_percent_margin() {
        let mut row = good_row();
        row[SalesColumn::InvoiceDate as usize] = "1/15/2020".to_string();
        row[SalesColumn::OperatingMargin as usize] = "35%".to_string();
        let t = Transaction::from_row(&row).unwrap();
        assert_eq!(
            t.invoice_date,
            NaiveDate::from_ymd_opt(2020, 1, 15).unwrap()
        );
        assert_eq!(t.operating_margin, 0.35);
    }

    #[test]
    fn test_header_str_round_trip() {
        assert_eq!(SalesColumn::PricePerUnit.header_str(), "Price per Unit");
        assert_eq!(SalesColumn::HEADERS.len(), 13);
    }
}
