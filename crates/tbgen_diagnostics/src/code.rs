//! Stable diagnostic codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which family a code belongs to; decides its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Malformed input, prefixed with `E`.
    Error,
    /// Suspicious input, prefixed with `W`.
    Warning,
    /// Legal but discouraged at a DUT boundary, prefixed with `C`.
    Convention,
}

impl Category {
    /// Returns the prefix letter.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Convention => 'C',
        }
    }
}

/// A category plus number, displayed as e.g. `E110`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The family.
    pub category: Category,
    /// Number within the family.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// Lexical error.
    pub const LEX: Self = Self::new(Category::Error, 100);
    /// Syntax error.
    pub const SYNTAX: Self = Self::new(Category::Error, 101);
    /// Unknown port direction keyword.
    pub const UNKNOWN_DIRECTION: Self = Self::new(Category::Error, 110);
    /// Port declared without a direction (non-ANSI style).
    pub const MISSING_DIRECTION: Self = Self::new(Category::Error, 111);
    /// Port type other than `logic`, `wire` or `tri`.
    pub const UNSUPPORTED_PORT_TYPE: Self = Self::new(Category::Error, 112);
    /// Port declared without a type.
    pub const MISSING_PORT_TYPE: Self = Self::new(Category::Error, 113);
    /// Net kind followed by a data type.
    pub const NET_KIND_WITH_DATA_TYPE: Self = Self::new(Category::Error, 114);
    /// Unpacked dimensions after a port name.
    pub const UNPACKED_PORT: Self = Self::new(Category::Error, 115);
    /// Two ports with the same name.
    pub const DUPLICATE_PORT: Self = Self::new(Category::Error, 116);
    /// Two parameters with the same name.
    pub const DUPLICATE_PARAMETER: Self = Self::new(Category::Error, 117);
    /// No module in the file.
    pub const NO_MODULE: Self = Self::new(Category::Error, 120);
    /// Requested top module missing.
    pub const UNKNOWN_TOP: Self = Self::new(Category::Error, 121);
    /// Parameter without a default value.
    pub const PARAMETER_WITHOUT_DEFAULT: Self = Self::new(Category::Warning, 201);
    /// Module with no ports.
    pub const EMPTY_PORT_LIST: Self = Self::new(Category::Warning, 202);
    /// Port with more than one packed dimension.
    pub const MULTIDIMENSIONAL_PORT: Self = Self::new(Category::Convention, 301);
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
