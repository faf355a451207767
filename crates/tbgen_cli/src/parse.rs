//! `tbgen parse`: print the parameters and ports of each DUT.

use tbgen_common::Interner;
use tbgen_diagnostics::DiagnosticSink;
use tbgen_parser::Dut;
use tbgen_source::SourceDb;

use crate::pipeline;
use crate::{GlobalArgs, OutputFormat, ParseArgs};

/// Runs the `tbgen parse` command.
///
/// DUTs go to stdout, diagnostics to stderr, both in the requested format. Exits 1 if any file had errors.
pub fn run(args: &ParseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let paths = pipeline::expand_inputs(&args.files)?;
    let mut source_db = SourceDb::new();
    let files = pipeline::load_files(&paths, &mut source_db)?;

    let interner = Interner::new();
    let sink = DiagnosticSink::new();
    let duts: Vec<Dut> =
        pipeline::analyze_all(&files, &source_db, args.top.as_deref(), &interner, &sink)
            .into_iter()
            .flatten()
            .collect();

    let (errors, warnings) = pipeline::render_diagnostics(&sink, &source_db, global, args.format);
    print!("{}", render_duts(&duts, args.format)?);
    if args.format == OutputFormat::Text {
        pipeline::print_summary(global, errors, warnings);
    }

    Ok(if errors > 0 { 1 } else { 0 })
}

/// Formats the parsed DUTs for stdout.
fn render_duts(duts: &[Dut], format: OutputFormat) -> Result<String, serde_json::Error> {
    Ok(match format {
        OutputFormat::Text => duts.iter().map(|dut| dut.to_string()).collect(),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(duts)?),
    })
}
