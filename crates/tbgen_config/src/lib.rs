//! Parsing and validation of `tbgen.toml` configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`TbgenConfig`]: testbench layout settings and parameter overrides. A
//! missing file means every default applies.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{
    default_config_text, find_config, load_config, load_config_from_str, resolve_config,
    CONFIG_FILE_NAME,
};
pub use types::*;
