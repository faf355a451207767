//! Configuration types deserialized from `tbgen.toml`.

use crate::error::ConfigError;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// The top-level configuration parsed from `tbgen.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TbgenConfig {
    /// Testbench layout settings.
    #[serde(default)]
    pub testbench: TestbenchConfig,
    /// Parameter name to override value text.
    ///
    /// Values may be written as TOML strings, integers, floats or booleans;
    /// all are kept as the text placed in the testbench `localparam`.
    #[serde(default, deserialize_with = "deserialize_overrides")]
    pub parameters: BTreeMap<String, String>,
}

impl TbgenConfig {
    /// Fails on the first override that names none of `declared`.
    pub fn check_overrides<'a>(
        &self,
        module: &str,
        declared: impl IntoIterator<Item = &'a str> + Clone,
    ) -> Result<(), ConfigError> {
        for name in self.parameters.keys() {
            if !declared.clone().into_iter().any(|d| d == name) {
                return Err(ConfigError::UnknownParameter {
                    name: name.clone(),
                    module: module.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Settings for the generated testbench.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TestbenchConfig {
    /// Argument of the `` `timescale`` directive, e.g. `"1ns / 1ps"`.
    pub timescale: String,
    /// Clock period in timescale units.
    pub clock_period: u64,
    /// Clock cycles the reset is held asserted.
    pub reset_cycles: u64,
    /// Clock cycles to run after reset before `$finish`.
    pub run_cycles: u64,
    /// Instance name of the DUT inside the testbench.
    pub instance_name: String,
    /// Appended to the DUT name to form the testbench module and file name.
    pub suffix: String,
    /// Port names recognized as the clock, compared case-insensitively.
    pub clock_names: Vec<String>,
    /// Port names recognized as the reset, compared case-insensitively.
    pub reset_names: Vec<String>,
    /// Reset polarity. Inferred from the reset port name when unset.
    pub reset_active_low: Option<bool>,
}

impl Default for TestbenchConfig {
    fn default() -> Self {
        Self {
            timescale: "1ns / 1ps".to_string(),
            clock_period: 10,
            reset_cycles: 5,
            run_cycles: 100,
            instance_name: "dut".to_string(),
            suffix: "_tb".to_string(),
            clock_names: ["clk", "clk_i", "clock", "aclk"]
                .map(String::from)
                .to_vec(),
            reset_names: [
                "rst", "rst_i", "rst_n", "rst_ni", "reset", "reset_n", "aresetn",
            ]
            .map(String::from)
            .to_vec(),
            reset_active_low: None,
        }
    }
}

impl TestbenchConfig {
    /// True if `port` is one of the configured clock names.
    pub fn is_clock(&self, port: &str) -> bool {
        self.clock_names.iter().any(|c| c.eq_ignore_ascii_case(port))
    }

    /// True if `port` is one of the configured reset names.
    pub fn is_reset(&self, port: &str) -> bool {
        self.reset_names.iter().any(|r| r.eq_ignore_ascii_case(port))
    }

    /// Whether the reset port `name` is asserted low.
    ///
    /// An explicit `reset_active_low` wins. Otherwise names ending in `_n`,
    /// `_ni`, `rstn` or `resetn` (e.g. `aresetn`) are active low.
    pub fn reset_active_low_for(&self, name: &str) -> bool {
        if let Some(low) = self.reset_active_low {
            return low;
        }
        let name = name.to_ascii_lowercase();
        ["_n", "_ni", "rstn", "resetn"]
            .iter()
            .any(|suffix| name.ends_with(suffix))
    }
}

/// Accepts `WIDTH = 16`, `WIDTH = "16"`, `SCALE = 1.5` and `EN = true`.
fn deserialize_overrides<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OverrideText(String);

    impl<'de> Deserialize<'de> for OverrideText {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            struct TextVisitor;

            impl Visitor<'_> for TextVisitor {
                type Value = OverrideText;

                fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                    formatter.write_str("a string, integer, float or boolean")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                    Ok(OverrideText(v.to_string()))
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                    Ok(OverrideText(v.to_string()))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                    Ok(OverrideText(v.to_string()))
                }

                fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                    Ok(OverrideText(v.to_string()))
                }

                fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                    Ok(OverrideText(if v { "1" } else { "0" }.to_string()))
                }
            }

            deserializer.deserialize_any(TextVisitor)
        }
    }

    struct MapVisitor;

    impl<'de> Visitor<'de> for MapVisitor {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a table of parameter overrides")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = BTreeMap::new();
            while let Some((name, value)) = map.next_entry::<String, OverrideText>()? {
                out.insert(name, value.0);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(MapVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let tb = TestbenchConfig::default();
        assert_eq!(tb.timescale, "1ns / 1ps");
        assert_eq!(tb.clock_period, 10);
        assert_eq!(tb.instance_name, "dut");
        assert!(tb.is_clock("clk_i"));
        assert!(tb.is_clock("CLK"));
        assert!(tb.is_reset("rst_ni"));
        assert!(!tb.is_reset("sel_i"));
    }

    #[test]
    fn reset_polarity_inferred_from_name() {
        let tb = TestbenchConfig::default();
        assert!(tb.reset_active_low_for("rst_ni"));
        assert!(tb.reset_active_low_for("rst_n"));
        assert!(tb.reset_active_low_for("aresetn"));
        assert!(!tb.reset_active_low_for("rst"));
        assert!(!tb.reset_active_low_for("rst_i"));
    }

    #[test]
    fn reset_polarity_override() {
        let tb = TestbenchConfig {
            reset_active_low: Some(false),
            ..TestbenchConfig::default()
        };
        assert!(!tb.reset_active_low_for("rst_ni"));
    }

    #[test]
    fn check_overrides() {
        let mut config = TbgenConfig::default();
        config.parameters.insert("WIDTH".into(), "16".into());
        assert!(config.check_overrides("dut", ["WIDTH", "DEPTH"]).is_ok());
        let err = config.check_overrides("dut", ["DEPTH"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownParameter { ref name, .. } if name == "WIDTH"));
    }
}
