//! Configuration file handling for salesdash.
//!
//! The configuration file is stored at `$SALESDASH_HOME/config.json` and
//! records where the sales spreadsheet lives, which worksheet to read, and
//! the forecast horizon. The audit log SQLite file sits next to it.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "salesdash";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const HISTORY_SQLITE: &str = "sales_history.sqlite";

/// The worksheet the fixture dataset keeps its rows on.
pub const DEFAULT_SHEET_NAME: &str = "Data Sales Adidas";

/// Days past the last observed date the forecast extends by default.
pub const DEFAULT_HORIZON_DAYS: u32 = 90;

/// The `Config` object represents the configuration of the app. You
/// instantiate it by providing the path to `$SALESDASH_HOME` and from there it
/// loads `$SALESDASH_HOME/config.json`. It provides the paths and settings
/// the commands need.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    sqlite_path: PathBuf,
}

impl Config {
    /// Creates the data directory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory,
    ///   e.g. `$HOME/salesdash`
    /// - `dataset_path` - The sales spreadsheet (`.xlsx` or `.csv`); must
    ///   exist, since the dataset is a fixture the process cannot run without.
    /// - `sheet_name` - The worksheet to read; ignored for CSV files.
    /// - `horizon_days` - The forecast horizon.
    pub async fn create(
        dir: impl Into<PathBuf>,
        dataset_path: &Path,
        sheet_name: Option<String>,
        horizon_days: Option<u32>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the salesdash home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        if !dataset_path.is_file() {
            bail!(
                "The dataset file does not exist at '{}'",
                dataset_path.display()
            );
        }
        let dataset_path = utils::canonicalize(dataset_path).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            dataset_path,
            sheet_name: sheet_name.unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string()),
            forecast_horizon_days: horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS),
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            sqlite_path: root.join(HISTORY_SQLITE),
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `home` exists and that the config file exists
    /// - load the config file
    /// - validate that the configured dataset file still exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Salesdash home is missing, run 'salesdash init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        if !config_file.dataset_path.is_file() {
            bail!(
                "The configured dataset file is missing '{}'",
                config_file.dataset_path.display()
            )
        }

        Ok(Self {
            sqlite_path: root.join(HISTORY_SQLITE),
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn dataset_path(&self) -> &Path {
        &self.config_file.dataset_path
    }

    pub fn sheet_name(&self) -> &str {
        &self.config_file.sheet_name
    }

    pub fn horizon_days(&self) -> u32 {
        self.config_file.forecast_horizon_days
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }
}

/// Represents the serialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "salesdash",
///   "config_version": 1,
///   "dataset_path": "/data/AdidasUSSalesDatasets.xlsx",
///   "sheet_name": "Data Sales Adidas",
///   "forecast_horizon_days": 90
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "salesdash"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the sales spreadsheet
    dataset_path: PathBuf,

    /// Worksheet holding the transaction rows (ignored for CSV datasets)
    sheet_name: String,

    /// Days past the last observed date the forecast extends
    forecast_horizon_days: u32,
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path.as_ref(), data).await
    }
}
