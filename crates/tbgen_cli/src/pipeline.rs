//! Shared pipeline helpers for CLI commands.
//!
//! Input discovery, loading into the source DB, the parallel parse-and-check
//! step and diagnostic rendering.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tbgen_common::Interner;
use tbgen_diagnostics::{
    DiagnosticRenderer, DiagnosticSink, JsonRenderer, Severity, TerminalRenderer,
};
use tbgen_parser::Dut;
use tbgen_source::{FileId, SourceDb};

use crate::{GlobalArgs, OutputFormat};

/// Returns true for files with a recognized HDL extension (`.sv`, `.v`).
pub fn is_hdl_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("sv" | "v")
    )
}

/// Expands the command-line inputs into a list of files.
///
/// Files are taken as given whatever their extension. Directories are searched
/// recursively for HDL files, which are added in path order.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            walk_dir(input, &mut found)?;
            found.sort();
            if found.is_empty() {
                tracing::warn!(dir = %input.display(), "no .sv or .v files found");
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Recursively walks a directory collecting HDL source files.
fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if is_hdl_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Loads every file into `source_db`, in order.
pub fn load_files(
    paths: &[PathBuf],
    source_db: &mut SourceDb,
) -> Result<Vec<FileId>, Box<dyn std::error::Error>> {
    paths
        .iter()
        .map(|path| {
            source_db.load_file(path).map_err(|e| -> Box<dyn std::error::Error> {
                format!("cannot read {}: {e}", path.display()).into()
            })
        })
        .collect()
}

/// Parses and checks every loaded file in parallel.
///
/// Results come back in the order of `files`; `None` marks a file with no
/// usable top module.
pub fn analyze_all(
    files: &[FileId],
    source_db: &SourceDb,
    top: Option<&str>,
    interner: &Interner,
    sink: &DiagnosticSink,
) -> Vec<Option<Dut>> {
    tracing::debug!(files = files.len(), "analyzing");
    files
        .par_iter()
        .map(|&file| tbgen_parser::analyze(file, source_db, top, interner, sink))
        .collect()
}

/// Renders the sink's diagnostics to stderr in source order, one JSON object
/// per line for [`OutputFormat::Json`].
///
/// Warnings are suppressed in quiet mode. Returns the error and warning counts.
pub fn render_diagnostics(
    sink: &DiagnosticSink,
    source_db: &SourceDb,
    global: &GlobalArgs,
    format: OutputFormat,
) -> (usize, usize) {
    let diagnostics = sink.sorted();
    let renderer: Box<dyn DiagnosticRenderer> = match format {
        OutputFormat::Text => Box::new(TerminalRenderer::new(global.color)),
        OutputFormat::Json => Box::new(JsonRenderer),
    };
    let mut errors = 0;
    let mut warnings = 0;
    for diag in &diagnostics {
        match diag.severity {
            Severity::Error => errors += 1,
            Severity::Warning => warnings += 1,
            Severity::Note | Severity::Help => {}
        }
        if global.quiet && !diag.severity.is_error() {
            continue;
        }
        let rendered = renderer.render(diag, source_db);
        match format {
            OutputFormat::Text => eprintln!("{rendered}"),
            OutputFormat::Json => eprintln!("{}", rendered.trim_end()),
        }
    }
    (errors, warnings)
}

/// Prints the trailing `Result:` line unless quiet.
pub fn print_summary(global: &GlobalArgs, errors: usize, warnings: usize) {
    if !global.quiet {
        eprintln!("   Result: {errors} error(s), {warnings} warning(s)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn hdl_extensions() {
        assert!(is_hdl_file(Path::new("dut.sv")));
        assert!(is_hdl_file(Path::new("rtl/dut.v")));
        assert!(!is_hdl_file(Path::new("dut.svh.bak")));
        assert!(!is_hdl_file(Path::new("dut.vhd")));
        assert!(!is_hdl_file(Path::new("Makefile")));
    }

    #[test]
    fn expand_inputs_walks_directories() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(tmp.path().join("b.sv"), "module b; endmodule").unwrap();
        fs::write(sub.join("a.v"), "module a; endmodule").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let files = expand_inputs(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| is_hdl_file(f)));
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn expand_inputs_keeps_explicit_files() {
        let files = expand_inputs(&[PathBuf::from("dut.txt")]).unwrap();
        assert_eq!(files, vec![PathBuf::from("dut.txt")]);
    }

    #[test]
    fn load_files_reports_missing_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.sv");
        let mut db = SourceDb::new();
        let err = load_files(&[missing], &mut db).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn analyze_all_preserves_order() {
        let mut db = SourceDb::new();
        let ids = vec![
            db.add_source("a.sv", "module a (input logic x); endmodule".to_string()),
            db.add_source("b.sv", "module b (input logic y); endmodule".to_string()),
            db.add_source("c.sv", "// empty".to_string()),
        ];
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let duts = analyze_all(&ids, &db, None, &interner, &sink);
        assert_eq!(duts.len(), 3);
        assert_eq!(duts[0].as_ref().unwrap().name, "a");
        assert_eq!(duts[1].as_ref().unwrap().name, "b");
        assert!(duts[2].is_none());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn render_counts_errors_and_warnings() {
        let mut db = SourceDb::new();
        let ids = vec![db.add_source(
            "m.sv",
            "module m #(parameter W) (inputt logic a); endmodule".to_string(),
        )];
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        analyze_all(&ids, &db, None, &interner, &sink);
        let global = GlobalArgs {
            quiet: true,
            color: false,
            config: None,
        };
        let (errors, warnings) = render_diagnostics(&sink, &db, &global, OutputFormat::Json);
        assert_eq!(errors, 1);
        assert_eq!(warnings, 1);
    }
}
