//! Human-readable and machine-readable diagnostic output.

use crate::diagnostic::Diagnostic;
use crate::label::LabelStyle;
use tbgen_source::{SourceDb, Span};

/// Formats one diagnostic.
pub trait DiagnosticRenderer {
    /// Renders `diag`, looking up source text in `source_db`.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;
}

/// rustc-style terminal output.
///
/// ```text
/// error[E110]: unknown port direction `outputt`
///  --> test/dut_with_direction_error.sv:9:3
///   |
/// 9 |   outputt logic [1:0] result_o,
///   |   ^^^^^^^ not a port direction
///   |
///   = help: did you mean `output`?
/// ```
pub struct TerminalRenderer {
    /// Wrap the severity header in ANSI color codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[1;{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();

        let header = format!("{}[{}]", diag.severity, diag.code);
        out.push_str(&format!(
            "{}: {}\n",
            self.paint(diag.severity.ansi_color(), &header),
            diag.message
        ));

        // Annotated source lines: primary span first, then secondary labels in the same file.
        let mut annotations: Vec<(Span, char, &str)> = Vec::new();
        if source_db.file(diag.primary_span.file).is_some() {
            annotations.push((
                diag.primary_span,
                LabelStyle::Primary.marker(),
                diag.primary_label().unwrap_or(""),
            ));
            annotations.extend(
                diag.labels
                    .iter()
                    .filter(|l| !l.is_primary() && l.span.file == diag.primary_span.file)
                    .map(|l| (l.span, l.style.marker(), l.message.as_str())),
            );
        }

        let gutter = annotations
            .iter()
            .map(|(span, _, _)| source_db.resolve_span(*span).start_line.to_string().len())
            .max()
            .unwrap_or(0);
        let pad = " ".repeat(gutter);

        if let Some((primary, _, _)) = annotations.first() {
            out.push_str(&format!("{pad}--> {}\n", source_db.resolve_span(*primary)));
        }

        for (span, marker, message) in &annotations {
            let file = source_db.get_file(span.file);
            let (line, col) = file.line_col(span.start);
            let text = file.line_text(line).unwrap_or("");
            // Underline stops at the end of the line for multi-line spans.
            let line_rest = text.len().saturating_sub(col as usize - 1).max(1);
            let width = span.range().len().clamp(1, line_rest);
            let indent: String = text
                .chars()
                .take(col as usize - 1)
                .map(|c| if c == '\t' { '\t' } else { ' ' })
                .collect();
            let underline = marker.to_string().repeat(width);
            let suffix = if message.is_empty() {
                String::new()
            } else {
                format!(" {message}")
            };

            out.push_str(&format!("{pad} |\n"));
            out.push_str(&format!("{line:>gutter$} | {text}\n"));
            out.push_str(&format!("{pad} | {indent}{underline}{suffix}\n"));
        }

        if !annotations.is_empty() && (!diag.notes.is_empty() || !diag.help.is_empty()) {
            out.push_str(&format!("{pad} |\n"));
        }
        for note in &diag.notes {
            out.push_str(&format!("{pad} = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("{pad} = help: {help}\n"));
        }

        out
    }
}

/// One JSON object per diagnostic with the location already resolved.
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let location = source_db.file(diag.primary_span.file).map(|_| {
            let resolved = source_db.resolve_span(diag.primary_span);
            serde_json::json!({
                "file": resolved.file_path.display().to_string(),
                "line": resolved.start_line,
                "column": resolved.start_col,
                "end_line": resolved.end_line,
                "end_column": resolved.end_col,
            })
        });
        let labels: Vec<_> = diag
            .labels
            .iter()
            .filter(|l| source_db.file(l.span.file).is_some())
            .map(|l| {
                let resolved = source_db.resolve_span(l.span);
                serde_json::json!({
                    "style": l.style,
                    "message": l.message,
                    "line": resolved.start_line,
                    "column": resolved.start_col,
                })
            })
            .collect();
        let fix = diag.fix.as_ref().map(|fix| {
            serde_json::json!({
                "message": fix.message,
                "replacements": fix.replacements.iter().map(|r| serde_json::json!({
                    "start": r.span.start,
                    "end": r.span.end,
                    "text": r.new_text,
                })).collect::<Vec<_>>(),
            })
        });
        serde_json::json!({
            "severity": diag.severity,
            "code": diag.code.to_string(),
            "message": diag.message,
            "location": location,
            "labels": labels,
            "notes": diag.notes,
            "help": diag.help,
            "fix": fix,
        })
        .to_string()
    }
}
