//! Owned description of a DUT, detached from the interner and source spans.
//!
//! This is what the CLI prints and what the testbench generator consumes.

use crate::ast::{render_dimensions, Direction, ModuleHeader, PortType};
use serde::{Deserialize, Serialize};
use std::fmt;
use tbgen_common::Interner;
use tbgen_source::SourceFile;

/// A parsed Design Under Test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dut {
    /// Module name.
    pub name: String,
    /// Path of the file the module was read from.
    pub source: String,
    /// Hex content hash of that file.
    pub source_hash: String,
    /// Header parameters, in declaration order.
    pub parameters: Vec<Parameter>,
    /// Ports, in declaration order.
    pub ports: Vec<Port>,
}

/// A header parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Default value text, whitespace collapsed.
    pub value: Option<String>,
    /// Declared type, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Declared with `localparam`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub local: bool,
}

/// A port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port name.
    pub name: String,
    /// Port direction.
    pub direction: Direction,
    /// Base type, serialized as `type`.
    #[serde(rename = "type")]
    pub port_type: PortType,
    /// Packed dimensions as written, e.g. `[3:0][7:0]`.
    pub dimension: Option<String>,
    /// Total width when every bound is a literal.
    pub bits: Option<u64>,
    /// Declared `signed`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub signed: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Dut {
    /// Builds the owned model of `header`, which was parsed from `file`.
    pub fn from_header(header: &ModuleHeader, interner: &Interner, file: &SourceFile) -> Self {
        let parameters = header
            .params
            .iter()
            .map(|p| Parameter {
                name: interner.resolve(p.name).to_string(),
                value: p.value.as_ref().map(|v| v.text.clone()),
                data_type: p.data_type.clone(),
                local: p.local,
            })
            .collect();
        let ports = header
            .ports
            .iter()
            .map(|p| Port {
                name: interner.resolve(p.name).to_string(),
                direction: p.direction,
                port_type: p.port_type,
                dimension: render_dimensions(&p.dims),
                bits: p.bits(),
                signed: p.signed,
            })
            .collect();
        Self {
            name: interner.resolve(header.name).to_string(),
            source: file.path.display().to_string(),
            source_hash: file.content_hash.to_string(),
            parameters,
            ports,
        }
    }

    /// Looks up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Looks up a port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Input ports, in order.
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.with_direction(Direction::Input)
    }

    /// Output ports, in order.
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.with_direction(Direction::Output)
    }

    /// Bidirectional ports, in order.
    pub fn inouts(&self) -> impl Iterator<Item = &Port> {
        self.with_direction(Direction::Inout)
    }

    fn with_direction(&self, direction: Direction) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(move |p| p.direction == direction)
    }
}

/// One dict-style line per parameter and port, after a `module <name>` line.
impl fmt::Display for Dut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {}", self.name)?;
        for p in &self.parameters {
            writeln!(
                f,
                "{{'name': {}, 'value': {}}}",
                quoted(Some(&p.name)),
                quoted(p.value.as_deref())
            )?;
        }
        for p in &self.ports {
            writeln!(
                f,
                "{{'name': {}, 'direction': {}, 'type': {}, 'dimension': {}}}",
                quoted(Some(&p.name)),
                quoted(Some(p.direction.as_str())),
                quoted(Some(p.port_type.as_str())),
                quoted(p.dimension.as_deref())
            )?;
        }
        Ok(())
    }
}

fn quoted(value: Option<&str>) -> String {
    match value {
        Some(text) => format!("'{text}'"),
        None => "None".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer, HeaderParser};
    use tbgen_diagnostics::DiagnosticSink;
    use tbgen_source::SourceDb;

    fn dut(source: &str) -> Dut {
        let mut db = SourceDb::new();
        let file = db.add_source("dut.sv", source.to_string());
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let tokens = lexer::lex(source, file, &sink);
        let ast = HeaderParser::new(tokens, source, file, &interner, &sink).parse_header_file();
        assert!(!sink.has_errors());
        Dut::from_header(&ast.modules[0], &interner, db.get_file(file))
    }

    const SOURCE: &str = "module dut #(parameter WIDTH = 8, UNUSED) (
        input logic clk_i,
        input logic [3:0] [7:0] data_i,
        output logic [WIDTH-1:0] q_o,
        inout tri sda_io
    ); endmodule";

    #[test]
    fn from_header() {
        let dut = dut(SOURCE);
        assert_eq!(dut.name, "dut");
        assert_eq!(dut.source, "dut.sv");
        assert_eq!(dut.source_hash.len(), 32);
        assert_eq!(dut.parameter("WIDTH").unwrap().value.as_deref(), Some("8"));
        assert_eq!(dut.parameter("UNUSED").unwrap().value, None);
        let data = dut.port("data_i").unwrap();
        assert_eq!(data.dimension.as_deref(), Some("[3:0][7:0]"));
        assert_eq!(data.bits, Some(32));
        assert_eq!(dut.port("clk_i").unwrap().bits, Some(1));
        assert_eq!(dut.port("q_o").unwrap().bits, None);
        assert!(dut.port("missing").is_none());
    }

    #[test]
    fn direction_filters() {
        let dut = dut(SOURCE);
        assert_eq!(dut.inputs().count(), 2);
        assert_eq!(dut.outputs().map(|p| p.name.as_str()).collect::<Vec<_>>(), ["q_o"]);
        assert_eq!(dut.inouts().next().unwrap().port_type, PortType::Tri);
    }

    #[test]
    fn json_keys() {
        let dut = dut(SOURCE);
        let json = serde_json::to_value(&dut).unwrap();
        assert_eq!(
            json["parameters"][1],
            serde_json::json!({ "name": "UNUSED", "value": null })
        );
        assert_eq!(
            json["ports"][0],
            serde_json::json!({
                "name": "clk_i",
                "direction": "input",
                "type": "logic",
                "dimension": null,
                "bits": 1
            })
        );
        let back: Dut = serde_json::from_value(json).unwrap();
        assert_eq!(back, dut);
    }

    #[test]
    fn text_lines() {
        let text = dut(SOURCE).to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "module dut");
        assert_eq!(lines[1], "{'name': 'WIDTH', 'value': '8'}");
        assert_eq!(lines[2], "{'name': 'UNUSED', 'value': None}");
        assert_eq!(
            lines[4],
            "{'name': 'data_i', 'direction': 'input', 'type': 'logic', 'dimension': '[3:0][7:0]'}"
        );
    }
}
