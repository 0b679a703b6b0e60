use crate::args::ShowArgs;
use crate::commands::{resolve_selection, Out};
use crate::dashboard::{Dashboard, DashboardView};
use crate::{dataset, Config, Result};

/// Loads the dataset, applies the current filter selection, and renders the
/// KPIs and chart series.
pub async fn show(config: Config, args: ShowArgs) -> Result<Out<DashboardView>> {
    let table = dataset::load(config.dataset_path(), config.sheet_name())?;
    let horizon = args.horizon().unwrap_or_else(|| config.horizon_days());
    let selection = resolve_selection(&table, args.filter())?;

    let dashboard = Dashboard::new(table, horizon);
    let view = dashboard.update(&selection);

    let message = format!(
        "{}\n{}\n{}\nTrend points: {} | Product shares: {} | Forecast points: {}",
        view.total_sales_text,
        view.units_sold_text,
        view.avg_price_text,
        view.trend.len(),
        view.products.len(),
        view.forecast.len(),
    );
    Ok(Out::new(message, view))
}
