//! Conformance test helpers for tbgen.
//!
//! Provides the DUT fixtures and shared pipeline functions that run source
//! text through parse → check → model (and optionally testbench generation),
//! returning structured results for assertion in integration tests.

#![warn(missing_docs)]

use tbgen_common::Interner;
use tbgen_config::{ConfigError, TbgenConfig};
use tbgen_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use tbgen_parser::Dut;
use tbgen_source::SourceDb;
use tbgen_testbench::{Testbench, TestbenchError};

/// A DUT with a parameter list and the shared port list.
pub const DUT_WITH_PARAMETERS: &str = include_str!("../fixtures/dut_with_parameters.sv");
/// The shared port list without parameters.
pub const DUT_WITHOUT_PARAMETERS: &str = include_str!("../fixtures/dut_without_parameters.sv");
/// The shared port list with `outputt` in place of `output`.
pub const DUT_WITH_DIRECTION_ERROR: &str =
    include_str!("../fixtures/dut_with_direction_error.sv");

/// Result of running parse → check → model over one file.
pub struct PipelineResult {
    /// The selected top module, if one was found.
    pub dut: Option<Dut>,
    /// All diagnostics, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// Each diagnostic rendered without color.
    pub rendered: Vec<String>,
    /// Number of error-severity diagnostics.
    pub error_count: usize,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// The diagnostic codes in source order, e.g. `["E110", "C301"]`.
    pub fn codes(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.code.to_string()).collect()
    }

    /// Whether any errors were emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Runs the pipeline on `source`, registered under `file_name`.
pub fn run_pipeline(file_name: &str, source: &str, top: Option<&str>) -> PipelineResult {
    let mut source_db = SourceDb::new();
    let file_id = source_db.add_source(file_name, source.to_string());
    let interner = Interner::new();
    let sink = DiagnosticSink::new();

    let dut = tbgen_parser::analyze(file_id, &source_db, top, &interner, &sink);

    let error_count = sink.error_count();
    let warning_count = sink.warning_count();
    let diagnostics = sink.sorted();
    let renderer = TerminalRenderer::new(false);
    let rendered = diagnostics
        .iter()
        .map(|d| renderer.render(d, &source_db))
        .collect();

    PipelineResult {
        dut,
        diagnostics,
        rendered,
        error_count,
        warning_count,
    }
}

/// Why a testbench could not be generated.
#[derive(Debug)]
pub enum GenerateFailure {
    /// The configuration was invalid or named unknown parameters.
    Config(ConfigError),
    /// The generator refused the DUT.
    Testbench(TestbenchError),
}

/// Generates a testbench for `dut` using `tbgen.toml` text.
pub fn generate_with_config(dut: &Dut, config_toml: &str) -> Result<Testbench, GenerateFailure> {
    let config: TbgenConfig =
        tbgen_config::load_config_from_str(config_toml).map_err(GenerateFailure::Config)?;
    config
        .check_overrides(&dut.name, dut.parameters.iter().map(|p| p.name.as_str()))
        .map_err(GenerateFailure::Config)?;
    tbgen_testbench::generate(dut, &config.testbench, &config.parameters)
        .map_err(GenerateFailure::Testbench)
}
