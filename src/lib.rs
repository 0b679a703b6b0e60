pub mod aggregate;
pub mod args;
pub mod commands;
mod config;
pub mod dashboard;
pub mod dataset;
mod db;
mod error;
pub mod filter;
pub mod forecast;
pub mod model;
mod utils;

pub use config::{Config, DEFAULT_HORIZON_DAYS, DEFAULT_SHEET_NAME};
pub use db::{HistoryStore, SavedView};
pub use error::Error;
pub use error::Result;
