//! Configuration for the page wiring.
//!
//! Every element id, class name and tuning constant the controllers rely on is
//! centralized here. Configuration arrives as TOML text (grouped into tables)
//! and any missing or invalid entries fall back to defaults that match the
//! stock page markup.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{load_config, parse_config, serialize_config};
pub use models::{LogLevel, PageConfig, UnmatchedSectionPolicy};
