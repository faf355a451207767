//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `tbgen.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// `[parameters]` overrides a parameter the DUT does not declare.
    #[error("unknown parameter '{name}' in [parameters]: module '{module}' does not declare it")]
    UnknownParameter {
        /// The override key.
        name: String,
        /// The DUT module name.
        module: String,
    },
}
