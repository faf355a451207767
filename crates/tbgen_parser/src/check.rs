//! Semantic checks over a parsed module header.

use crate::ast::{render_dimensions, ModuleHeader, PortStyle};
use std::collections::HashMap;
use tbgen_common::{Ident, Interner};
use tbgen_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use tbgen_source::Span;

/// Reports duplicate names, parameters without defaults, empty port lists and
/// multidimensional packed ports.
pub fn check_module(module: &ModuleHeader, interner: &Interner, sink: &DiagnosticSink) {
    check_duplicates(
        module.params.iter().map(|p| (p.name, p.name_span)),
        DiagnosticCode::DUPLICATE_PARAMETER,
        "parameter",
        interner,
        sink,
    );
    check_duplicates(
        module.ports.iter().map(|p| (p.name, p.name_span)),
        DiagnosticCode::DUPLICATE_PORT,
        "port",
        interner,
        sink,
    );

    for param in module.params.iter().filter(|p| p.value.is_none()) {
        let name = interner.resolve(param.name);
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::PARAMETER_WITHOUT_DEFAULT,
                format!("parameter `{name}` has no default value"),
                param.name_span,
            )
            .with_help(format!(
                "give it a default (`{name} = ...`) or set it under `[parameters]` in tbgen.toml"
            )),
        );
    }

    if module.port_style != PortStyle::Ansi {
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::EMPTY_PORT_LIST,
                format!("module `{}` has no ports", interner.resolve(module.name)),
                module.name_span,
            )
            .with_note("the generated testbench will only instantiate it"),
        );
    }

    for port in module.ports.iter().filter(|p| p.dims.len() > 1) {
        let dims = render_dimensions(&port.dims).unwrap_or_default();
        sink.emit(
            Diagnostic::warning(
                DiagnosticCode::MULTIDIMENSIONAL_PORT,
                format!(
                    "port `{}` has a multidimensional packed type `{dims}`",
                    interner.resolve(port.name)
                ),
                port.name_span,
            )
            .with_help("prefer a one-dimensional vector at the DUT boundary"),
        );
    }
}

fn check_duplicates(
    names: impl Iterator<Item = (Ident, Span)>,
    code: DiagnosticCode,
    what: &str,
    interner: &Interner,
    sink: &DiagnosticSink,
) {
    let mut seen: HashMap<Ident, Span> = HashMap::new();
    for (name, span) in names {
        if let Some(&first) = seen.get(&name) {
            sink.emit(
                Diagnostic::error(
                    code,
                    format!("duplicate {what} `{}`", interner.resolve(name)),
                    span,
                )
                .with_label(Label::primary(span, "redeclared here"))
                .with_label(Label::secondary(first, "first declared here")),
            );
        } else {
            seen.insert(name, span);
        }
    }
}
