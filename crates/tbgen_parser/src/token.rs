//! Token kinds produced by the lexer.
//!
//! Only the keywords that matter to a module header get their own kind; every
//! other word lexes as [`SvToken::Identifier`], which is harmless because
//! module bodies are skipped token by token.

use serde::{Deserialize, Serialize};
use tbgen_source::Span;

/// A token kind. Keywords are case-sensitive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SvToken {
    // === Design units ===
    /// `module`
    Module,
    /// `macromodule`
    Macromodule,
    /// `endmodule`
    Endmodule,

    // === Parameters ===
    /// `parameter`
    Parameter,
    /// `localparam`
    Localparam,
    /// `type`
    Type,

    // === Port directions ===
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,

    // === Net kinds ===
    /// `wire`
    Wire,
    /// `tri`
    Tri,
    /// `tri0`
    Tri0,
    /// `tri1`
    Tri1,
    /// `triand`
    Triand,
    /// `trior`
    Trior,
    /// `wand`
    Wand,
    /// `wor`
    Wor,
    /// `uwire`
    Uwire,
    /// `supply0`
    Supply0,
    /// `supply1`
    Supply1,

    // === Data types ===
    /// `logic`
    Logic,
    /// `reg`
    Reg,
    /// `bit`
    Bit,
    /// `byte`
    Byte,
    /// `shortint`
    Shortint,
    /// `int`
    Int,
    /// `longint`
    Longint,
    /// `integer`
    Integer,
    /// `time`
    Time,
    /// `real`
    Real,
    /// `string`
    String,
    /// `var`
    Var,
    /// `signed`
    Signed,
    /// `unsigned`
    Unsigned,

    // === Literals ===
    /// Unsized decimal literal, e.g. `16`
    IntLiteral,
    /// Sized or based literal, e.g. `2'b01`, `'hFF`, `'0`
    SizedLiteral,
    /// Real literal, e.g. `2.5`
    RealLiteral,
    /// String literal
    StringLiteral,

    // === Punctuation ===
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `#`
    Hash,
    /// `@`
    At,
    /// `=`
    Equals,
    /// `'` not starting a literal, e.g. in `'{...}`
    Tick,
    /// Any other operator (`+`, `-`, `::`, `==`, `<=`, ...)
    Operator,

    // === Identifiers and special ===
    /// A plain identifier
    Identifier,
    /// An escaped identifier, e.g. `\bus[0] `
    EscapedIdentifier,
    /// A system identifier, e.g. `$clog2`
    SystemIdentifier,
    /// End of input
    Eof,
    /// Something the lexer could not make sense of
    Error,
}

impl SvToken {
    /// `input`, `output` or `inout`.
    pub fn is_direction(self) -> bool {
        matches!(self, SvToken::Input | SvToken::Output | SvToken::Inout)
    }

    /// A net kind keyword (`wire`, `tri`, `wand`, ...).
    pub fn is_net_kind(self) -> bool {
        matches!(
            self,
            SvToken::Wire
                | SvToken::Tri
                | SvToken::Tri0
                | SvToken::Tri1
                | SvToken::Triand
                | SvToken::Trior
                | SvToken::Wand
                | SvToken::Wor
                | SvToken::Uwire
                | SvToken::Supply0
                | SvToken::Supply1
        )
    }

    /// A data type keyword (`logic`, `bit`, `int`, ...).
    pub fn is_data_type(self) -> bool {
        matches!(
            self,
            SvToken::Logic
                | SvToken::Reg
                | SvToken::Bit
                | SvToken::Byte
                | SvToken::Shortint
                | SvToken::Int
                | SvToken::Longint
                | SvToken::Integer
                | SvToken::Time
                | SvToken::Real
                | SvToken::String
                | SvToken::Var
        )
    }

    /// Anything that can start the type part of a declaration.
    pub fn is_type_keyword(self) -> bool {
        self.is_net_kind() || self.is_data_type()
    }

    /// `(`, `[` or `{`.
    pub fn opens_group(self) -> bool {
        matches!(
            self,
            SvToken::LeftParen | SvToken::LeftBracket | SvToken::LeftBrace
        )
    }

    /// `)`, `]` or `}`.
    pub fn closes_group(self) -> bool {
        matches!(
            self,
            SvToken::RightParen | SvToken::RightBracket | SvToken::RightBrace
        )
    }
}

/// A token kind with its location. The text lives in the source.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The kind.
    pub kind: SvToken,
    /// Where it is.
    pub span: Span,
}

/// Maps a word to its keyword kind.
pub fn lookup_keyword(s: &str) -> Option<SvToken> {
    let kind = match s {
        "module" => SvToken::Module,
        "macromodule" => SvToken::Macromodule,
        "endmodule" => SvToken::Endmodule,
        "parameter" => SvToken::Parameter,
        "localparam" => SvToken::Localparam,
        "type" => SvToken::Type,
        "input" => SvToken::Input,
        "output" => SvToken::Output,
        "inout" => SvToken::Inout,
        "wire" => SvToken::Wire,
        "tri" => SvToken::Tri,
        "tri0" => SvToken::Tri0,
        "tri1" => SvToken::Tri1,
        "triand" => SvToken::Triand,
        "trior" => SvToken::Trior,
        "wand" => SvToken::Wand,
        "wor" => SvToken::Wor,
        "uwire" => SvToken::Uwire,
        "supply0" => SvToken::Supply0,
        "supply1" => SvToken::Supply1,
        "logic" => SvToken::Logic,
        "reg" => SvToken::Reg,
        "bit" => SvToken::Bit,
        "byte" => SvToken::Byte,
        "shortint" => SvToken::Shortint,
        "int" => SvToken::Int,
        "longint" => SvToken::Longint,
        "integer" => SvToken::Integer,
        "time" => SvToken::Time,
        "real" => SvToken::Real,
        "string" => SvToken::String,
        "var" => SvToken::Var,
        "signed" => SvToken::Signed,
        "unsigned" => SvToken::Unsigned,
        _ => return None,
    };
    Some(kind)
}
