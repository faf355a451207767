//! Configuration file discovery, loading and validation.

use crate::error::ConfigError;
use crate::types::TbgenConfig;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "tbgen.toml";

const DEFAULT_CONFIG: &str = r#"# tbgen configuration

[testbench]
timescale = "1ns / 1ps"
clock_period = 10
reset_cycles = 5
run_cycles = 100
instance_name = "dut"
suffix = "_tb"
clock_names = ["clk", "clk_i", "clock", "aclk"]
reset_names = ["rst", "rst_i", "rst_n", "rst_ni", "reset", "reset_n", "aresetn"]
# reset_active_low = true   # inferred from the reset port name when unset

[parameters]
# WIDTH = 16
"#;

/// The text `tbgen init` writes: every setting at its default.
pub fn default_config_text() -> &'static str {
    DEFAULT_CONFIG
}

/// Loads and validates the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<TbgenConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    load_config_from_str(&content)
}

/// Parses and validates a `tbgen.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TbgenConfig, ConfigError> {
    let config: TbgenConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Walks up from `start_dir` looking for `tbgen.toml`.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Loads `explicit` if given, else the nearest `tbgen.toml` above `start_dir`,
/// else the defaults. Returns the path that was loaded, if any.
pub fn resolve_config(
    explicit: Option<&Path>,
    start_dir: &Path,
) -> Result<(TbgenConfig, Option<PathBuf>), ConfigError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(start_dir),
    };
    match path {
        Some(path) => Ok((load_config(&path)?, Some(path))),
        None => {
            tracing::debug!(dir = %start_dir.display(), "no {CONFIG_FILE_NAME} found, using defaults");
            Ok((TbgenConfig::default(), None))
        }
    }
}

/// Validates value ranges and names.
fn validate_config(config: &TbgenConfig) -> Result<(), ConfigError> {
    let tb = &config.testbench;
    if tb.clock_period == 0 {
        return Err(invalid("testbench.clock_period must be greater than 0"));
    }
    if tb.run_cycles == 0 {
        return Err(invalid("testbench.run_cycles must be greater than 0"));
    }
    if !is_identifier(&tb.instance_name) {
        return Err(invalid(format!(
            "testbench.instance_name '{}' is not a legal identifier",
            tb.instance_name
        )));
    }
    if tb.suffix.is_empty() || !tb.suffix.bytes().all(is_ident_byte) {
        return Err(invalid(format!(
            "testbench.suffix '{}' must be non-empty and contain only letters, digits, '_' or '$'",
            tb.suffix
        )));
    }
    validate_timescale(&tb.timescale)?;
    for (name, value) in &config.parameters {
        if !is_identifier(name) {
            return Err(invalid(format!(
                "parameters.{name} is not a legal parameter name"
            )));
        }
        if value.trim().is_empty() {
            return Err(invalid(format!("parameters.{name} has an empty value")));
        }
    }
    Ok(())
}

/// Accepts `<1|10|100><unit> / <1|10|100><unit>` with the precision no coarser
/// than the unit.
fn validate_timescale(text: &str) -> Result<(), ConfigError> {
    let bad = || invalid(format!("testbench.timescale '{text}' is not of the form '1ns / 1ps'"));
    let (unit, precision) = text.split_once('/').ok_or_else(bad)?;
    let unit = time_in_fs(unit.trim()).ok_or_else(bad)?;
    let precision = time_in_fs(precision.trim()).ok_or_else(bad)?;
    if precision > unit {
        return Err(invalid(format!(
            "testbench.timescale '{text}': precision must not be coarser than the unit"
        )));
    }
    Ok(())
}

fn time_in_fs(text: &str) -> Option<u128> {
    let split = text.find(|c: char| !c.is_ascii_digit())?;
    let (magnitude, unit) = (&text[..split], text[split..].trim());
    let magnitude: u128 = match magnitude {
        "1" => 1,
        "10" => 10,
        "100" => 100,
        _ => return None,
    };
    let scale: u128 = match unit {
        "s" => 1_000_000_000_000_000,
        "ms" => 1_000_000_000_000,
        "us" => 1_000_000_000,
        "ns" => 1_000_000,
        "ps" => 1_000,
        "fs" => 1,
        _ => return None,
    };
    Some(magnitude * scale)
}

fn is_identifier(text: &str) -> bool {
    let mut bytes = text.bytes();
    matches!(bytes.next(), Some(b) if b.is_ascii_alphabetic() || b == b'_') && bytes.all(is_ident_byte)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TestbenchConfig;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.testbench, TestbenchConfig::default());
        assert!(config.parameters.is_empty());
    }

    #[test]
    fn default_text_matches_defaults() {
        let config = load_config_from_str(default_config_text()).unwrap();
        assert_eq!(config.testbench, TestbenchConfig::default());
        assert!(config.parameters.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[testbench]
timescale = "10ns / 100ps"
clock_period = 20
reset_cycles = 2
run_cycles = 500
instance_name = "u_dut"
suffix = "_test"
clock_names = ["sys_clk"]
reset_names = ["sys_rst"]
reset_active_low = false

[parameters]
WIDTH = 16
NAME = "\"core\""
SCALE = 1.5
ENABLE = true
"#;
        let config = load_config_from_str(toml).unwrap();
        let tb = &config.testbench;
        assert_eq!(tb.timescale, "10ns / 100ps");
        assert_eq!(tb.clock_period, 20);
        assert_eq!(tb.run_cycles, 500);
        assert_eq!(tb.instance_name, "u_dut");
        assert_eq!(tb.clock_names, ["sys_clk"]);
        assert_eq!(tb.reset_active_low, Some(false));
        assert_eq!(config.parameters["WIDTH"], "16");
        assert_eq!(config.parameters["NAME"], "\"core\"");
        assert_eq!(config.parameters["SCALE"], "1.5");
        assert_eq!(config.parameters["ENABLE"], "1");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = load_config_from_str("[testbench]\nrun_cycles = 7\n").unwrap();
        assert_eq!(config.testbench.run_cycles, 7);
        assert_eq!(config.testbench.clock_period, 10);
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn wrong_value_type_errors() {
        let err = load_config_from_str("[testbench]\nclock_period = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        let err = load_config_from_str("[parameters]\nWIDTH = [1, 2]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn zero_clock_period_errors() {
        let err = load_config_from_str("[testbench]\nclock_period = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_run_cycles_errors() {
        let err = load_config_from_str("[testbench]\nrun_cycles = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn bad_instance_name_errors() {
        let err = load_config_from_str("[testbench]\ninstance_name = \"1dut\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m) if m.contains("instance_name")));
    }

    #[test]
    fn empty_suffix_errors() {
        let err = load_config_from_str("[testbench]\nsuffix = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m) if m.contains("suffix")));
    }

    #[test]
    fn timescale_validation() {
        assert!(validate_timescale("1ns/1ps").is_ok());
        assert!(validate_timescale("100 us / 1 ns").is_ok());
        assert!(validate_timescale("1ns").is_err());
        assert!(validate_timescale("2ns / 1ps").is_err());
        assert!(validate_timescale("1ps / 1ns").is_err());
        assert!(validate_timescale("1ns / 1xs").is_err());
    }

    #[test]
    fn find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("rtl").join("core");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        assert_eq!(find_config(&nested), Some(dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn resolve_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, path) = resolve_config(None, dir.path()).unwrap();
        assert!(path.is_none());
        assert_eq!(config.testbench, TestbenchConfig::default());
    }

    #[test]
    fn resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[testbench]\nclock_period = 4\n").unwrap();
        let (config, loaded) = resolve_config(Some(&path), dir.path()).unwrap();
        assert_eq!(loaded.as_deref(), Some(path.as_path()));
        assert_eq!(config.testbench.clock_period, 4);
    }

    #[test]
    fn resolve_missing_explicit_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_config(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
