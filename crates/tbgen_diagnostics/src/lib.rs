//! Diagnostics for malformed DUT headers.
//!
//! A [`Diagnostic`] carries a severity, a stable [`DiagnosticCode`] (`E110`,
//! `W201`, ...), a primary span, labels, notes, help and an optional
//! [`SuggestedFix`]. Parsers emit into a thread-safe [`DiagnosticSink`];
//! the CLI renders the result with a [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;
pub mod suggested_fix;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, JsonRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
pub use suggested_fix::{apply_fixes, Replacement, SuggestedFix};
