//! The dashboard facade: one pure update from (table, selection) to charts
//! and KPIs, plus the audit panel's action dispatch.

use crate::aggregate::{product_breakdown, DailyAggregate, Kpis, ProductShare};
use crate::db::{HistoryStore, SavedView};
use crate::filter::filter;
use crate::forecast::{forecast, ForecastPoint};
use crate::model::{AuditAction, FilterSelection, SalesTable};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::debug;

/// One point of the sales trend chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub units: i64,
}

/// Everything one interaction renders: three chart series and three KPI
/// texts, all derived from the same filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardView {
    pub trend: Vec<TrendPoint>,
    pub products: Vec<ProductShare>,
    pub forecast: Vec<ForecastPoint>,
    pub kpis: Kpis,
    pub total_sales_text: String,
    pub units_sold_text: String,
    pub avg_price_text: String,
}

/// The top-level context: owns the immutable table and the forecast horizon.
///
/// `update` is a pure function of the selection; nothing here caches or
/// mutates, so two calls with the same selection return the same view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: SalesTable,
    horizon_days: u32,
}

impl Dashboard {
    pub fn new(table: SalesTable, horizon_days: u32) -> Self {
        Self {
            table,
            horizon_days,
        }
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    /// Recomputes every output for `selection`.
    ///
    /// All four outputs come from a single filtered subset, so KPIs and
    /// charts can never reflect different filter snapshots. An empty subset
    /// produces empty series and the placeholder KPI texts.
    pub fn update(&self, selection: &FilterSelection) -> DashboardView {
        let view = filter(&self.table, selection);
        debug!(
            matched = view.len(),
            total = self.table.len(),
            "filter applied"
        );

        let daily = DailyAggregate::from_view(&view);
        let kpis = Kpis::compute(&view);
        DashboardView {
            trend: daily
                .points()
                .map(|(date, units)| TrendPoint { date, units })
                .collect(),
            products: product_breakdown(&view),
            forecast: forecast(&daily, self.horizon_days),
            total_sales_text: kpis.total_sales_text(),
            units_sold_text: kpis.units_sold_text(),
            avg_price_text: kpis.avg_price_text(),
            kpis,
        }
    }
}

/// Dispatches an audit panel action against the store and returns the text
/// the panel displays afterward.
///
/// Save and view both end by re-listing the full log; delete ends with the
/// explicit empty-log text, which is distinguishable from the panel's initial
/// blank state (which never calls this function).
pub async fn handle_action(
    store: &HistoryStore,
    action: AuditAction,
    selection: &FilterSelection,
) -> Result<String> {
    match action {
        AuditAction::Save => {
            let id = store.save(selection).await?;
            debug!(id, "saved filter selection");
            let views = store.list_all().await?;
            Ok(format!("Saved view #{id}.\n{}", render_views(&views)))
        }
        AuditAction::ViewPast => {
            let views = store.list_all().await?;
            Ok(render_views(&views))
        }
        AuditAction::DeleteAll => {
            let deleted = store.delete_all().await?;
            Ok(format!("Deleted {deleted} saved view(s).\nNo saved views."))
        }
    }
}

/// Renders the audit log for the panel, one line per saved view.
fn render_views(views: &[SavedView]) -> String {
    if views.is_empty() {
        return "No saved views.".to_string();
    }
    let mut out = String::new();
    for v in views {
        let _ = writeln!(
            out,
            "#{}: {} to {} | regions: {} | products: {}",
            v.id,
            v.start_date,
            v.end_date,
            render_set(&v.regions),
            render_set(&v.products),
        );
    }
    out.trim_end().to_string()
}

fn render_set(names: &[String]) -> String {
    if names.is_empty() {
        "(all)".to_string()
    } else {
        names.join(", ")
    }
}
