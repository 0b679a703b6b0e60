//! These structs provide the CLI interface for the salesdash CLI.

use crate::model::AuditAction;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// salesdash: a sales analytics tool for a fixed retail transactions dataset.
///
/// The program loads a spreadsheet of historical retail transactions, filters
/// it by date range, region and product, renders summary KPIs and chart
/// series, and produces a short-term demand forecast. Filter selections can
/// be saved to, listed from, and cleared out of a local audit log.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command to run. Point it at the sales spreadsheet
    /// (an .xlsx workbook or a .csv rendition of the same table); the path is
    /// recorded in the configuration and the file must remain in place.
    Init(InitArgs),
    /// Filter the dataset and print the KPIs, trend, breakdown and forecast.
    Show(ShowArgs),
    /// Save, list, or clear the audit log of filter selections.
    History(HistoryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where salesdash data and configuration is held.
    /// Defaults to ~/salesdash
    #[arg(long, env = "SALESDASH_HOME", default_value_t = default_salesdash_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `salesdash init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The path to the sales spreadsheet (.xlsx or .csv).
    #[arg(long)]
    dataset: PathBuf,

    /// The worksheet holding the transaction rows. Ignored for CSV datasets.
    #[arg(long)]
    sheet: Option<String>,

    /// Days past the last observed date the forecast extends.
    #[arg(long)]
    horizon: Option<u32>,
}

impl InitArgs {
    pub fn dataset(&self) -> &Path {
        &self.dataset
    }

    pub fn sheet(&self) -> Option<String> {
        self.sheet.clone()
    }

    pub fn horizon(&self) -> Option<u32> {
        self.horizon
    }
}

/// The filter controls: a date interval plus region and product selections.
#[derive(Debug, Parser, Clone, Default)]
pub struct FilterArgs {
    /// Start of the date range (inclusive, YYYY-MM-DD). Defaults to the
    /// earliest invoice date in the dataset.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End of the date range (inclusive, YYYY-MM-DD). Defaults to the latest
    /// invoice date in the dataset.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Restrict to a region; repeat for several. No flag means all regions.
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Restrict to a product; repeat for several. No flag means all products.
    #[arg(long = "product")]
    products: Vec<String>,
}

impl FilterArgs {
    pub fn new(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        regions: Vec<String>,
        products: Vec<String>,
    ) -> Self {
        Self {
            start,
            end,
            regions,
            products,
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }
}

/// Args for the `salesdash show` command.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    #[clap(flatten)]
    filter: FilterArgs,

    /// Override the configured forecast horizon for this call.
    #[arg(long)]
    horizon: Option<u32>,
}

impl ShowArgs {
    pub fn filter(&self) -> &FilterArgs {
        &self.filter
    }

    pub fn horizon(&self) -> Option<u32> {
        self.horizon
    }
}

/// Args for the `salesdash history` command.
#[derive(Debug, Parser, Clone)]
pub struct HistoryArgs {
    #[command(subcommand)]
    action: HistorySubcommand,
}

impl HistoryArgs {
    pub fn action(&self) -> &HistorySubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistorySubcommand {
    /// Append the current filter selection to the audit log.
    Save(FilterArgs),
    /// List every saved selection.
    View,
    /// Remove every saved selection.
    Clear,
}

impl HistorySubcommand {
    /// The tagged action this subcommand dispatches, plus the filter
    /// selection it carries (empty for view/clear).
    pub fn to_action(&self) -> (AuditAction, FilterArgs) {
        match self {
            HistorySubcommand::Save(filter) => (AuditAction::Save, filter.clone()),
            HistorySubcommand::View => (AuditAction::ViewPast, FilterArgs::default()),
            HistorySubcommand::Clear => (AuditAction::DeleteAll, FilterArgs::default()),
        }
    }
}

fn default_salesdash_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("salesdash"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SALESDASH_HOME instead of relying on the default \
                salesdash home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("salesdash")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
