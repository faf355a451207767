//! AST node types for SystemVerilog module headers.
//!
//! Only the header of each module is represented: name, parameter port list
//! and ANSI port list. Bodies are skipped by the parser. Every node carries a
//! `Span` back into the source.

use serde::{Deserialize, Serialize};
use std::fmt;
use tbgen_common::Ident;
use tbgen_source::Span;

// ============================================================================
// Top-level
// ============================================================================

/// Every module header found in one source file, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderFile {
    /// The module headers.
    pub modules: Vec<ModuleHeader>,
    /// The span covering the entire file.
    pub span: Span,
}

impl HeaderFile {
    /// Finds a module by name.
    pub fn find_module(&self, name: Ident) -> Option<&ModuleHeader> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// The first module in the file, used as the DUT when no top is named.
    pub fn top(&self) -> Option<&ModuleHeader> {
        self.modules.first()
    }
}

/// A module declaration header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleHeader {
    /// The module name.
    pub name: Ident,
    /// Span of the name token.
    pub name_span: Span,
    /// Parameter port list (`#(...)`), in declaration order.
    pub params: Vec<ParameterDecl>,
    /// Shape of the port list.
    pub port_style: PortStyle,
    /// One entry per port name, in declaration order.
    pub ports: Vec<PortDecl>,
    /// Optional end label (`endmodule : name`).
    pub end_label: Option<Ident>,
    /// From `module` to `endmodule` (or its label).
    pub span: Span,
}

/// Whether a module has a port list at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortStyle {
    /// ANSI port declarations: `module m(input logic a);`
    Ansi,
    /// Empty parentheses: `module m();`
    Empty,
    /// No parentheses: `module m;`
    Absent,
}

// ============================================================================
// Parameters
// ============================================================================

/// One entry of a parameter port list, e.g. `parameter int WIDTH = 8`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDecl {
    /// `localparam` rather than `parameter`.
    pub local: bool,
    /// Declared type keyword or type name (`int`, `logic`, `type`, ...).
    pub data_type: Option<String>,
    /// Declared `signed`.
    pub signed: bool,
    /// Packed range before the name.
    pub dims: Vec<Dimension>,
    /// Parameter name.
    pub name: Ident,
    /// Span of the name token.
    pub name_span: Span,
    /// Default value, if any.
    pub value: Option<ValueText>,
    /// Source span of the whole entry.
    pub span: Span,
}

/// Source text of an expression with whitespace runs collapsed to one space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueText {
    /// Normalized text.
    pub text: String,
    /// Span of the expression.
    pub span: Span,
}

// ============================================================================
// Ports
// ============================================================================

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

impl Direction {
    /// All directions, in keyword order.
    pub const ALL: [Direction; 3] = [Direction::Input, Direction::Output, Direction::Inout];

    /// The keyword spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Inout => "inout",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The base types accepted on a DUT port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    /// `logic`
    Logic,
    /// `wire`
    Wire,
    /// `tri`
    Tri,
}

impl PortType {
    /// The keyword spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            PortType::Logic => "logic",
            PortType::Wire => "wire",
            PortType::Tri => "tri",
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A packed range `[msb:lsb]`. Bounds are source text with whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Left bound.
    pub msb: String,
    /// Right bound.
    pub lsb: String,
    /// From `[` to `]`.
    pub span: Span,
}

impl Dimension {
    /// Number of bits in the range when both bounds are decimal literals.
    pub fn width(&self) -> Option<u64> {
        let msb = parse_decimal(&self.msb)?;
        let lsb = parse_decimal(&self.lsb)?;
        Some(msb.abs_diff(lsb) + 1)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.msb, self.lsb)
    }
}

fn parse_decimal(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit() || b == b'_') {
        return None;
    }
    text.replace('_', "").parse().ok()
}

/// Renders a dimension list as `[3:0][7:0]`, or `None` when it is empty.
pub fn render_dimensions(dims: &[Dimension]) -> Option<String> {
    if dims.is_empty() {
        return None;
    }
    Some(dims.iter().map(Dimension::to_string).collect())
}

/// One ANSI port. `input logic a, b` yields two of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortDecl {
    /// Port direction.
    pub direction: Direction,
    /// Span of the direction keyword shared by the declaration.
    pub direction_span: Span,
    /// Base type.
    pub port_type: PortType,
    /// Declared `signed`.
    pub signed: bool,
    /// Packed dimensions, outermost first.
    pub dims: Vec<Dimension>,
    /// Port name.
    pub name: Ident,
    /// Span of the name token.
    pub name_span: Span,
    /// From the direction keyword to the name.
    pub span: Span,
}

impl PortDecl {
    /// Total bit count: 1 for a scalar, `None` if any bound is not a literal.
    pub fn bits(&self) -> Option<u64> {
        self.dims
            .iter()
            .try_fold(1u64, |acc, d| acc.checked_mul(d.width()?))
    }
}
