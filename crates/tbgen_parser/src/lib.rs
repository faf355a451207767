//! Hand-rolled parser for the headers of SystemVerilog DUT modules.
//!
//! The main entry point is [`parse_file`], which takes a source file and
//! returns a [`HeaderFile`] holding every module header in it. [`check_file`]
//! runs the semantic checks, [`select_top`] picks the DUT, and
//! [`Dut::from_header`] detaches it into an owned model.
//!
//! # Architecture
//!
//! - **Lexer** ([`lexer`]): source text to tokens. Whitespace layout is
//!   insignificant; directives are reported and skipped.
//! - **Parser** ([`parser`]): recursive descent over the header with error
//!   recovery to the next list entry. Module bodies are skipped.
//! - **Checks** ([`check`]): duplicate names, missing defaults, empty port
//!   lists, multidimensional ports.
//! - **Model** ([`model`]): the owned [`Dut`] printed by the CLI and fed to the
//!   testbench generator.
//!
//! # Accepted ports
//!
//! ANSI declarations of the form `direction type [dims]* name {, name}` where
//! the direction is `input`, `output` or `inout` and the type is `logic`,
//! `wire` or `tri`. Anything else is diagnosed.

#![warn(missing_docs)]

/// AST node types for module headers.
pub mod ast;
/// Semantic checks over parsed headers.
pub mod check;
/// Lexical analyzer for SystemVerilog source text.
pub mod lexer;
/// Owned DUT model.
pub mod model;
/// Recursive descent header parser with error recovery.
pub mod parser;
mod suggest;
/// Token types for the lexer.
pub mod token;

pub use ast::{Direction, HeaderFile, ModuleHeader, PortType};
pub use check::check_module;
pub use model::{Dut, Parameter, Port};
pub use parser::HeaderParser;
pub use suggest::suggest_direction;
pub use token::{SvToken, Token};

use tbgen_common::Interner;
use tbgen_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use tbgen_source::{FileId, SourceDb, Span};

/// Parses every module header in a source file.
///
/// Errors are reported to the diagnostic sink; the returned AST holds whatever
/// could be recovered.
pub fn parse_file(
    file_id: FileId,
    source_db: &SourceDb,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> HeaderFile {
    let file = source_db.get_file(file_id);
    let source = &file.content;
    let tokens = lexer::lex(source, file_id, sink);
    let mut parser = HeaderParser::new(tokens, source, file_id, interner, sink);
    let ast = parser.parse_header_file();
    tracing::debug!(
        file = %file.path.display(),
        modules = ast.modules.len(),
        "parsed headers"
    );
    ast
}

/// Runs [`check_module`] over every module in the file.
pub fn check_file(file: &HeaderFile, interner: &Interner, sink: &DiagnosticSink) {
    for module in &file.modules {
        check_module(module, interner, sink);
    }
}

/// Picks the DUT: the module named `top`, or the first module.
///
/// Reports `E121` when `top` names no module in the file.
pub fn select_top<'a>(
    file: &'a HeaderFile,
    top: Option<&str>,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Option<&'a ModuleHeader> {
    let Some(name) = top else {
        return file.top();
    };
    let found = interner.get(name).and_then(|ident| file.find_module(ident));
    if found.is_none() {
        let available: Vec<_> = file
            .modules
            .iter()
            .map(|m| format!("`{}`", interner.resolve(m.name)))
            .collect();
        let mut diag = Diagnostic::error(
            DiagnosticCode::UNKNOWN_TOP,
            format!("top module `{name}` not found"),
            Span::point(file.span.file, 0),
        );
        if !available.is_empty() {
            diag = diag.with_note(format!("modules in this file: {}", available.join(", ")));
        }
        sink.emit(diag);
    }
    found
}

/// Parses and checks a file, then builds the [`Dut`] for the selected top.
///
/// Returns `None` when no module could be selected. A `Some` result may still
/// come with errors in the sink.
pub fn analyze(
    file_id: FileId,
    source_db: &SourceDb,
    top: Option<&str>,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Option<Dut> {
    let ast = parse_file(file_id, source_db, interner, sink);
    check_file(&ast, interner, sink);
    let module = select_top(&ast, top, interner, sink)?;
    Some(Dut::from_header(module, interner, source_db.get_file(file_id)))
}
