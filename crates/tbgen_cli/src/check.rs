//! `tbgen check`: report problems in DUT headers, optionally fixing them.

use std::collections::HashMap;
use std::path::PathBuf;

use tbgen_common::Interner;
use tbgen_diagnostics::{apply_fixes, DiagnosticSink, SuggestedFix};
use tbgen_source::{FileId, SourceDb};

use crate::pipeline;
use crate::{CheckArgs, GlobalArgs, OutputFormat};

/// Runs the `tbgen check` command.
///
/// With `--fix`, suggested fixes are written back to the files and the files
/// are checked again, so the report only lists what is left. Exits 1 if any
/// errors remain.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let paths = pipeline::expand_inputs(&args.files)?;

    if args.fix {
        let fixed = fix_files(&paths)?;
        if !global.quiet {
            for (path, count) in &fixed {
                eprintln!("    Fixed {} ({count} fix(es))", path.display());
            }
        }
    }

    let mut source_db = SourceDb::new();
    let files = pipeline::load_files(&paths, &mut source_db)?;
    let interner = Interner::new();
    let sink = DiagnosticSink::new();
    pipeline::analyze_all(&files, &source_db, None, &interner, &sink);

    let (errors, warnings) = pipeline::render_diagnostics(&sink, &source_db, global, args.format);
    if args.format == OutputFormat::Text {
        pipeline::print_summary(global, errors, warnings);
    }

    Ok(if errors > 0 { 1 } else { 0 })
}

/// Applies every suggested fix and rewrites the files that changed.
///
/// Returns each rewritten path with the number of fixes applied to it.
fn fix_files(paths: &[PathBuf]) -> Result<Vec<(PathBuf, usize)>, Box<dyn std::error::Error>> {
    let mut source_db = SourceDb::new();
    let files = pipeline::load_files(paths, &mut source_db)?;
    let interner = Interner::new();
    let sink = DiagnosticSink::new();
    pipeline::analyze_all(&files, &source_db, None, &interner, &sink);

    let mut by_file: HashMap<FileId, Vec<SuggestedFix>> = HashMap::new();
    for diag in sink.sorted() {
        if let Some(fix) = diag.fix {
            by_file.entry(diag.primary_span.file).or_default().push(fix);
        }
    }

    let mut fixed = Vec::new();
    for (file, fixes) in by_file {
        let source = source_db.get_file(file);
        let (text, applied) = apply_fixes(&source.content, &fixes);
        if applied == 0 {
            continue;
        }
        std::fs::write(&source.path, text)?;
        tracing::debug!(path = %source.path.display(), applied, "applied fixes");
        fixed.push((source.path.clone(), applied));
    }
    fixed.sort();
    Ok(fixed)
}
