//! Configuration module for pixelsummon runs
//!
//! Provides types and parsing for `settings.json` / `pxs.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_settings, merge_cli_overrides, CliOverrides, ConfigError, LoadedSettings};
pub use schema::*;
