//! Command handlers for the salesdash CLI.

mod history;
mod init;
mod show;

use crate::args::FilterArgs;
use crate::model::{FilterSelection, SalesTable};
use crate::Result;
use anyhow::bail;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use history::history;
pub use init::init;
pub use show::show;

/// The output type for a command: a printable message and, optionally, the
/// structured data behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the
    /// command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as
    /// JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Builds the current filter selection from the CLI arguments, defaulting an
/// omitted date bound to the table's observed range (the same defaults the
/// original date picker starts with).
pub(crate) fn resolve_selection(table: &SalesTable, args: &FilterArgs) -> Result<FilterSelection> {
    let (start, end) = match (args.start(), args.end()) {
        (Some(start), Some(end)) => (start, end),
        (start, end) => {
            let Some((min, max)) = table.date_range() else {
                bail!("The dataset contains no usable rows, cannot default the date range");
            };
            (start.unwrap_or(min), end.unwrap_or(max))
        }
    };
    if start > end {
        bail!("The start date {start} is after the end date {end}");
    }
    Ok(FilterSelection {
        start,
        end,
        regions: args.regions().to_vec(),
        products: args.products().to_vec(),
    })
}
