use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json`.
///
/// # Arguments
/// - `home` - The directory that will be the root of the data directory,
///   e.g. `$HOME/salesdash`
/// - `dataset` - The sales spreadsheet; must already exist.
/// - `sheet` - The worksheet name, defaulting to the fixture's sheet.
/// - `horizon` - The forecast horizon in days, defaulting to 90.
pub async fn init(
    home: &Path,
    dataset: &Path,
    sheet: Option<String>,
    horizon: Option<u32>,
) -> Result<Out<()>> {
    let config = Config::create(home, dataset, sheet, horizon)
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the salesdash directory at '{}'",
        config.root().display()
    )
    .into())
}
