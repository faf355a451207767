//! `tbgen generate`: write a testbench for a DUT.

use std::fs;
use std::path::Path;

use tbgen_common::Interner;
use tbgen_diagnostics::DiagnosticSink;
use tbgen_source::SourceDb;

use crate::pipeline;
use crate::{GenerateArgs, GlobalArgs, OutputFormat};

/// Runs the `tbgen generate` command.
///
/// Nothing is written when the DUT header has errors. An existing testbench
/// whose recorded source hash matches the DUT is left alone, and a file tbgen
/// did not write is never overwritten, unless `--force` is given.
pub fn run(args: &GenerateArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut source_db = SourceDb::new();
    let files = pipeline::load_files(std::slice::from_ref(&args.file), &mut source_db)?;

    let interner = Interner::new();
    let sink = DiagnosticSink::new();
    let dut = pipeline::analyze_all(&files, &source_db, args.top.as_deref(), &interner, &sink)
        .into_iter()
        .next()
        .flatten();

    let (errors, warnings) = pipeline::render_diagnostics(&sink, &source_db, global, OutputFormat::Text);
    let dut = match dut {
        Some(dut) if errors == 0 => dut,
        _ => {
            pipeline::print_summary(global, errors, warnings);
            eprintln!(
                "error: {} has errors; no testbench generated",
                args.file.display()
            );
            return Ok(1);
        }
    };

    let dut_dir = parent_dir(&args.file);
    let (config, config_path) = tbgen_config::resolve_config(global.config.as_deref(), dut_dir)?;
    if let Some(path) = &config_path {
        tracing::debug!(path = %path.display(), "using configuration");
    }
    config.check_overrides(&dut.name, dut.parameters.iter().map(|p| p.name.as_str()))?;

    let testbench = tbgen_testbench::generate(&dut, &config.testbench, &config.parameters)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| dut_dir.join(testbench.file_name()));

    if !args.force {
        if let Ok(existing) = fs::read_to_string(&output) {
            if tbgen_testbench::is_up_to_date(&existing, &dut) {
                if !global.quiet {
                    eprintln!("   Up to date {}", output.display());
                }
                return Ok(0);
            }
            if tbgen_testbench::recorded_hash(&existing).is_none() {
                return Err(format!(
                    "{} was not generated by tbgen; use --force to overwrite it",
                    output.display()
                )
                .into());
            }
        }
    }

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(&output, &testbench.text)?;
    tracing::info!(
        dut = %dut.name,
        clock = testbench.clock.as_deref().unwrap_or("-"),
        reset = testbench.reset.as_deref().unwrap_or("-"),
        "generated testbench"
    );
    if !global.quiet {
        eprintln!("    Generated {}", output.display());
    }
    pipeline::print_summary(global, errors, warnings);
    Ok(0)
}

/// Directory containing `file`, or `.` for a bare file name.
fn parent_dir(file: &Path) -> &Path {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
