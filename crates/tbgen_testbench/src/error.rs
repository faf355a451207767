//! Error types for testbench generation.

/// Errors that prevent a testbench from being generated.
#[derive(Debug, thiserror::Error)]
pub enum TestbenchError {
    /// A parameter has no default in the DUT and no override in `[parameters]`.
    #[error("parameter '{name}' has no default value; set it under [parameters] in tbgen.toml")]
    MissingParameterValue {
        /// The parameter name.
        name: String,
    },

    /// An override targets a `localparam`, which cannot be overridden.
    #[error("parameter '{name}' is a localparam and cannot be overridden")]
    LocalParameterOverride {
        /// The parameter name.
        name: String,
    },

    /// A DUT name collides with a name the testbench declares itself.
    #[error("DUT {kind} '{name}' collides with a name declared by the testbench")]
    NameClash {
        /// `port` or `parameter`.
        kind: &'static str,
        /// The clashing name.
        name: String,
    },

    /// Writing to the output buffer failed.
    #[error("failed to format testbench: {0}")]
    Format(#[from] std::fmt::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_parameter_value() {
        let err = TestbenchError::MissingParameterValue {
            name: "UNUSED".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parameter 'UNUSED' has no default value; set it under [parameters] in tbgen.toml"
        );
    }

    #[test]
    fn display_name_clash() {
        let err = TestbenchError::NameClash {
            kind: "port",
            name: "CLK_PERIOD".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "DUT port 'CLK_PERIOD' collides with a name declared by the testbench"
        );
    }
}
