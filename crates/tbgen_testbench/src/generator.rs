//! Testbench text generation.

use crate::error::TestbenchError;
use crate::provenance::header_line;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write;
use tbgen_config::TestbenchConfig;
use tbgen_parser::{Direction, Dut, Port, PortType};

const INDENT: &str = "    ";

/// Names the testbench declares besides the DUT signals.
const TESTBENCH_PARAMS: [&str; 3] = ["CLK_PERIOD", "RESET_CYCLES", "RUN_CYCLES"];

/// A generated testbench.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testbench {
    /// Name of the testbench module, `<dut><suffix>`.
    pub module_name: String,
    /// Full SystemVerilog text.
    pub text: String,
    /// The port driven as the clock, if one was recognized.
    pub clock: Option<String>,
    /// The port driven as the reset, if one was recognized.
    pub reset: Option<String>,
}

impl Testbench {
    /// File name the testbench is written to by default.
    pub fn file_name(&self) -> String {
        format!("{}.sv", self.module_name)
    }
}

/// A DUT parameter with the value the testbench passes to it.
struct ResolvedParam<'a> {
    name: &'a str,
    value: &'a str,
    is_type: bool,
}

/// Generates the testbench for `dut`.
///
/// `overrides` maps parameter names to value text and wins over the DUT's
/// defaults. Clock and reset are the first scalar inputs whose names appear in
/// the configured name lists.
pub fn generate(
    dut: &Dut,
    config: &TestbenchConfig,
    overrides: &BTreeMap<String, String>,
) -> Result<Testbench, TestbenchError> {
    let params = resolve_parameters(dut, overrides)?;
    check_names(dut, config)?;

    let clock = dut
        .inputs()
        .find(|p| p.dimension.is_none() && config.is_clock(&p.name));
    let reset = dut
        .inputs()
        .find(|p| p.dimension.is_none() && config.is_reset(&p.name));
    let module_name = format!("{}{}", dut.name, config.suffix);
    tracing::debug!(
        dut = %dut.name,
        clock = ?clock.map(|p| &p.name),
        reset = ?reset.map(|p| &p.name),
        "generating testbench"
    );

    let mut out = String::new();
    writeln!(out, "{}", header_line(dut))?;
    writeln!(out, "`timescale {}", config.timescale)?;
    writeln!(out)?;
    writeln!(out, "module {};", sv_name(&module_name))?;
    write_parameters(&mut out, &params, config)?;
    write_signals(&mut out, dut)?;
    if let Some(clk) = clock {
        write_clock(&mut out, clk)?;
    }
    if let Some(rst) = reset {
        write_reset(&mut out, rst, clock, config)?;
    }
    write_instance(&mut out, dut, &params, config)?;
    write_stimulus(&mut out, dut, clock, reset, config)?;
    writeln!(out)?;
    writeln!(out, "endmodule : {}", sv_name(&module_name))?;

    Ok(Testbench {
        module_name,
        text: out,
        clock: clock.map(|p| p.name.clone()),
        reset: reset.map(|p| p.name.clone()),
    })
}

fn resolve_parameters<'a>(
    dut: &'a Dut,
    overrides: &'a BTreeMap<String, String>,
) -> Result<Vec<ResolvedParam<'a>>, TestbenchError> {
    if let Some(local) = overrides
        .keys()
        .find(|name| dut.parameter(name).is_some_and(|p| p.local))
    {
        return Err(TestbenchError::LocalParameterOverride {
            name: local.clone(),
        });
    }
    dut.parameters
        .iter()
        .filter(|p| !p.local)
        .map(|p| {
            let value = overrides
                .get(&p.name)
                .or(p.value.as_ref())
                .ok_or_else(|| TestbenchError::MissingParameterValue {
                    name: p.name.clone(),
                })?;
            Ok(ResolvedParam {
                name: &p.name,
                value,
                is_type: p.data_type.as_deref() == Some("type"),
            })
        })
        .collect()
}

fn check_names(dut: &Dut, config: &TestbenchConfig) -> Result<(), TestbenchError> {
    let clashes = |name: &str| TESTBENCH_PARAMS.contains(&name) || name == config.instance_name;
    if let Some(port) = dut.ports.iter().find(|p| clashes(&p.name)) {
        return Err(TestbenchError::NameClash {
            kind: "port",
            name: port.name.clone(),
        });
    }
    if let Some(param) = dut.parameters.iter().find(|p| !p.local && clashes(&p.name)) {
        return Err(TestbenchError::NameClash {
            kind: "parameter",
            name: param.name.clone(),
        });
    }
    Ok(())
}

fn write_parameters(
    out: &mut String,
    params: &[ResolvedParam<'_>],
    config: &TestbenchConfig,
) -> Result<(), TestbenchError> {
    writeln!(out)?;
    if !params.is_empty() {
        writeln!(out, "{INDENT}// DUT parameters")?;
        let names: Vec<_> = params.iter().map(|p| sv_name(p.name)).collect();
        let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
        for (p, name) in params.iter().zip(&names) {
            let keyword = if p.is_type { "localparam type" } else { "localparam" };
            writeln!(out, "{INDENT}{keyword} {name:<width$} = {};", p.value)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{INDENT}localparam CLK_PERIOD   = {};", config.clock_period)?;
    writeln!(out, "{INDENT}localparam RESET_CYCLES = {};", config.reset_cycles)?;
    writeln!(out, "{INDENT}localparam RUN_CYCLES   = {};", config.run_cycles)?;
    Ok(())
}

/// `logic` for inputs and outputs; inouts keep a net type so they can be
/// resolved against the DUT's drivers.
fn signal_type(port: &Port) -> String {
    let base = match (port.direction, port.port_type) {
        (Direction::Inout, PortType::Tri) => "tri",
        (Direction::Inout, _) => "wire",
        _ => "logic",
    };
    let mut ty = base.to_string();
    if port.signed {
        ty.push_str(" signed");
    }
    if let Some(dim) = &port.dimension {
        ty.push(' ');
        ty.push_str(dim);
    }
    ty
}

fn write_signals(out: &mut String, dut: &Dut) -> Result<(), TestbenchError> {
    if dut.ports.is_empty() {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "{INDENT}// DUT signals")?;
    let decls: Vec<(String, Cow<'_, str>)> = dut
        .ports
        .iter()
        .map(|p| (signal_type(p), sv_name(&p.name)))
        .collect();
    let width = decls.iter().map(|(ty, _)| ty.len()).max().unwrap_or(0);
    for (ty, name) in &decls {
        writeln!(out, "{INDENT}{ty:<width$} {name};")?;
    }
    Ok(())
}

fn write_clock(out: &mut String, clk: &Port) -> Result<(), TestbenchError> {
    let clk = sv_name(&clk.name);
    writeln!(out)?;
    writeln!(out, "{INDENT}// Clock")?;
    writeln!(out, "{INDENT}initial begin")?;
    writeln!(out, "{INDENT}{INDENT}{clk} = 1'b0;")?;
    writeln!(out, "{INDENT}{INDENT}forever #(CLK_PERIOD / 2.0) {clk} = ~{clk};")?;
    writeln!(out, "{INDENT}end")?;
    Ok(())
}

/// An identifier as it must appear in source. Escaped identifiers end at
/// whitespace, so they get a trailing space before any following token.
fn sv_name(name: &str) -> Cow<'_, str> {
    if name.starts_with('\\') {
        Cow::Owned(format!("{name} "))
    } else {
        Cow::Borrowed(name)
    }
}

/// `(asserted, deasserted)` literals for a reset.
fn reset_levels(active_low: bool) -> (&'static str, &'static str) {
    if active_low {
        ("1'b0", "1'b1")
    } else {
        ("1'b1", "1'b0")
    }
}

fn write_wait(out: &mut String, cycles: &str, clock: Option<&Port>) -> Result<(), TestbenchError> {
    match clock {
        Some(clk) => writeln!(out, "{INDENT}{INDENT}repeat ({cycles}) @(posedge {});", sv_name(&clk.name))?,
        None => writeln!(out, "{INDENT}{INDENT}#(CLK_PERIOD * {cycles});")?,
    }
    Ok(())
}

fn write_reset(
    out: &mut String,
    rst: &Port,
    clock: Option<&Port>,
    config: &TestbenchConfig,
) -> Result<(), TestbenchError> {
    let (asserted, deasserted) = reset_levels(config.reset_active_low_for(&rst.name));
    let name = sv_name(&rst.name);
    writeln!(out)?;
    writeln!(out, "{INDENT}// Reset")?;
    writeln!(out, "{INDENT}initial begin")?;
    writeln!(out, "{INDENT}{INDENT}{name} = {asserted};")?;
    write_wait(out, "RESET_CYCLES", clock)?;
    writeln!(out, "{INDENT}{INDENT}{name} = {deasserted};")?;
    writeln!(out, "{INDENT}end")?;
    Ok(())
}

/// Writes `.name (name)` lines with the parentheses aligned.
fn write_connections<'a>(
    out: &mut String,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), TestbenchError> {
    let names: Vec<_> = names.map(sv_name).collect();
    let width = names.iter().map(|n| n.len()).max().unwrap_or(0);
    let last = names.len().saturating_sub(1);
    for (i, name) in names.iter().enumerate() {
        let sep = if i == last { "" } else { "," };
        writeln!(out, "{INDENT}{INDENT}.{name:<width$} ({name}){sep}")?;
    }
    Ok(())
}

fn write_instance(
    out: &mut String,
    dut: &Dut,
    params: &[ResolvedParam<'_>],
    config: &TestbenchConfig,
) -> Result<(), TestbenchError> {
    writeln!(out)?;
    writeln!(out, "{INDENT}// DUT")?;
    if params.is_empty() {
        write!(out, "{INDENT}{} {} (", sv_name(&dut.name), config.instance_name)?;
    } else {
        writeln!(out, "{INDENT}{} #(", sv_name(&dut.name))?;
        write_connections(out, params.iter().map(|p| p.name))?;
        write!(out, "{INDENT}) {} (", config.instance_name)?;
    }
    if dut.ports.is_empty() {
        writeln!(out, ");")?;
    } else {
        writeln!(out)?;
        write_connections(out, dut.ports.iter().map(|p| p.name.as_str()))?;
        writeln!(out, "{INDENT});")?;
    }
    Ok(())
}

fn write_stimulus(
    out: &mut String,
    dut: &Dut,
    clock: Option<&Port>,
    reset: Option<&Port>,
    config: &TestbenchConfig,
) -> Result<(), TestbenchError> {
    let is_driven_elsewhere = |p: &Port| {
        clock.is_some_and(|c| c.name == p.name) || reset.is_some_and(|r| r.name == p.name)
    };
    writeln!(out)?;
    writeln!(out, "{INDENT}// Stimulus")?;
    writeln!(out, "{INDENT}initial begin")?;
    for input in dut.inputs().filter(|p| !is_driven_elsewhere(p)) {
        writeln!(out, "{INDENT}{INDENT}{} = '0;", sv_name(&input.name))?;
    }
    let inouts: Vec<&str> = dut.inouts().map(|p| p.name.as_str()).collect();
    if !inouts.is_empty() {
        writeln!(
            out,
            "{INDENT}{INDENT}// inout ports are not driven: {}",
            inouts.join(", ")
        )?;
    }
    if let Some(rst) = reset {
        let (_, deasserted) = reset_levels(config.reset_active_low_for(&rst.name));
        writeln!(out, "{INDENT}{INDENT}wait ({} === {deasserted});", sv_name(&rst.name))?;
    }
    write_wait(out, "RUN_CYCLES", clock)?;
    writeln!(out, "{INDENT}{INDENT}$finish;")?;
    writeln!(out, "{INDENT}end")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tbgen_parser::Parameter;

    const HASH: &str = "0123456789abcdef0123456789abcdef";

    fn param(name: &str, value: Option<&str>) -> Parameter {
        Parameter {
            name: name.to_string(),
            value: value.map(String::from),
            data_type: None,
            local: false,
        }
    }

    fn port(name: &str, direction: Direction, port_type: PortType, dim: Option<&str>) -> Port {
        Port {
            name: name.to_string(),
            direction,
            port_type,
            dimension: dim.map(String::from),
            bits: None,
            signed: false,
        }
    }

    fn fifo() -> Dut {
        Dut {
            name: "fifo".to_string(),
            source: "rtl/fifo.sv".to_string(),
            source_hash: HASH.to_string(),
            parameters: vec![param("WIDTH", Some("8")), param("DEPTH", Some("4"))],
            ports: vec![
                port("clk", Direction::Input, PortType::Logic, None),
                port("rst_n", Direction::Input, PortType::Logic, None),
                port("din", Direction::Input, PortType::Logic, Some("[WIDTH-1:0]")),
                port("dout", Direction::Output, PortType::Logic, Some("[WIDTH-1:0]")),
                port("sda", Direction::Inout, PortType::Tri, None),
            ],
        }
    }

    fn gen(dut: &Dut) -> Testbench {
        generate(dut, &TestbenchConfig::default(), &BTreeMap::new()).unwrap()
    }

    #[test]
    fn full_testbench() {
        let tb = gen(&fifo());
        let expected = "\
// Generated by tbgen from fifo; source-hash: 0123456789abcdef0123456789abcdef
`timescale 1ns / 1ps

module fifo_tb;

    // DUT parameters
    localparam WIDTH = 8;
    localparam DEPTH = 4;

    localparam CLK_PERIOD   = 10;
    localparam RESET_CYCLES = 5;
    localparam RUN_CYCLES   = 100;

    // DUT signals
    logic             clk;
    logic             rst_n;
    logic [WIDTH-1:0] din;
    logic [WIDTH-1:0] dout;
    tri               sda;

    // Clock
    initial begin
        clk = 1'b0;
        forever #(CLK_PERIOD / 2.0) clk = ~clk;
    end

    // Reset
    initial begin
        rst_n = 1'b0;
        repeat (RESET_CYCLES) @(posedge clk);
        rst_n = 1'b1;
    end

    // DUT
    fifo #(
        .WIDTH (WIDTH),
        .DEPTH (DEPTH)
    ) dut (
        .clk   (clk),
        .rst_n (rst_n),
        .din   (din),
        .dout  (dout),
        .sda   (sda)
    );

    // Stimulus
    initial begin
        din = '0;
        // inout ports are not driven: sda
        wait (rst_n === 1'b1);
        repeat (RUN_CYCLES) @(posedge clk);
        $finish;
    end

endmodule : fifo_tb
";
        assert_eq!(tb.text, expected);
        assert_eq!(tb.module_name, "fifo_tb");
        assert_eq!(tb.file_name(), "fifo_tb.sv");
        assert_eq!(tb.clock.as_deref(), Some("clk"));
        assert_eq!(tb.reset.as_deref(), Some("rst_n"));
    }

    #[test]
    fn override_beats_default() {
        let overrides = BTreeMap::from([("WIDTH".to_string(), "32".to_string())]);
        let tb = generate(&fifo(), &TestbenchConfig::default(), &overrides).unwrap();
        assert!(tb.text.contains("    localparam WIDTH = 32;\n"));
        assert!(tb.text.contains("    localparam DEPTH = 4;\n"));
    }

    #[test]
    fn missing_parameter_value() {
        let mut dut = fifo();
        dut.parameters.push(param("UNUSED", None));
        let err = generate(&dut, &TestbenchConfig::default(), &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, TestbenchError::MissingParameterValue { ref name } if name == "UNUSED"));

        let overrides = BTreeMap::from([("UNUSED".to_string(), "0".to_string())]);
        let tb = generate(&dut, &TestbenchConfig::default(), &overrides).unwrap();
        assert!(tb.text.contains("        .UNUSED (UNUSED)\n"));
    }

    #[test]
    fn localparams_are_not_passed() {
        let mut dut = fifo();
        dut.parameters.push(Parameter {
            local: true,
            ..param("MASK", Some("4'hF"))
        });
        let tb = gen(&dut);
        assert!(!tb.text.contains("MASK"));

        let overrides = BTreeMap::from([("MASK".to_string(), "0".to_string())]);
        let err = generate(&dut, &TestbenchConfig::default(), &overrides).unwrap_err();
        assert!(matches!(err, TestbenchError::LocalParameterOverride { .. }));
    }

    #[test]
    fn type_parameter() {
        let mut dut = fifo();
        dut.parameters = vec![Parameter {
            data_type: Some("type".to_string()),
            ..param("T", Some("logic"))
        }];
        assert!(gen(&dut).text.contains("    localparam type T = logic;\n"));
    }

    #[test]
    fn active_high_reset() {
        let mut dut = fifo();
        dut.ports[1].name = "rst".to_string();
        let tb = gen(&dut);
        assert!(tb.text.contains("        rst = 1'b1;\n        repeat (RESET_CYCLES)"));
        assert!(tb.text.contains("wait (rst === 1'b0);"));
    }

    #[test]
    fn configured_polarity_wins() {
        let config = TestbenchConfig {
            reset_active_low: Some(false),
            ..TestbenchConfig::default()
        };
        let tb = generate(&fifo(), &config, &BTreeMap::new()).unwrap();
        assert!(tb.text.contains("wait (rst_n === 1'b0);"));
    }

    #[test]
    fn no_clock_uses_delays() {
        let mut dut = fifo();
        dut.ports.remove(0);
        let tb = gen(&dut);
        assert_eq!(tb.clock, None);
        assert!(!tb.text.contains("// Clock"));
        assert!(tb.text.contains("        #(CLK_PERIOD * RESET_CYCLES);\n"));
        assert!(tb.text.contains("        #(CLK_PERIOD * RUN_CYCLES);\n"));
    }

    #[test]
    fn vector_named_like_clock_is_not_a_clock() {
        let mut dut = fifo();
        dut.ports[0].dimension = Some("[1:0]".to_string());
        let tb = gen(&dut);
        assert_eq!(tb.clock, None);
        assert!(tb.text.contains("        clk = '0;\n"));
    }

    #[test]
    fn no_parameters_no_ports() {
        let dut = Dut {
            parameters: Vec::new(),
            ports: Vec::new(),
            ..fifo()
        };
        let tb = gen(&dut);
        assert!(!tb.text.contains("// DUT parameters"));
        assert!(!tb.text.contains("// DUT signals"));
        assert!(tb.text.contains("    fifo dut ();\n"));
        assert!(tb.text.contains("        #(CLK_PERIOD * RUN_CYCLES);\n        $finish;\n"));
    }

    #[test]
    fn inout_wire_and_signed_types() {
        let mut dut = fifo();
        dut.ports.push(port("scl", Direction::Inout, PortType::Wire, None));
        dut.ports.push(Port {
            signed: true,
            ..port("acc", Direction::Output, PortType::Logic, Some("[15:0]"))
        });
        let tb = gen(&dut);
        assert!(tb.text.contains("    wire                scl;\n"));
        assert!(tb.text.contains("    logic signed [15:0] acc;\n"));
        assert!(tb.text.contains("// inout ports are not driven: sda, scl"));
    }

    #[test]
    fn custom_names_and_timescale() {
        let config = TestbenchConfig {
            timescale: "1ps / 1ps".to_string(),
            instance_name: "u_fifo".to_string(),
            suffix: "_test".to_string(),
            run_cycles: 7,
            ..TestbenchConfig::default()
        };
        let tb = generate(&fifo(), &config, &BTreeMap::new()).unwrap();
        assert_eq!(tb.module_name, "fifo_test");
        assert!(tb.text.contains("`timescale 1ps / 1ps\n"));
        assert!(tb.text.contains("    ) u_fifo (\n"));
        assert!(tb.text.contains("localparam RUN_CYCLES   = 7;"));
    }

    #[test]
    fn name_clash() {
        let mut dut = fifo();
        dut.ports.push(port("dut", Direction::Output, PortType::Logic, None));
        let err = gen_err(&dut);
        assert!(matches!(err, TestbenchError::NameClash { kind: "port", .. }));

        let mut dut = fifo();
        dut.parameters.push(param("CLK_PERIOD", Some("5")));
        let err = gen_err(&dut);
        assert!(matches!(err, TestbenchError::NameClash { kind: "parameter", .. }));
    }

    #[test]
    fn escaped_identifiers_end_with_a_space() {
        let mut dut = fifo();
        dut.parameters.push(param("\\W$", Some("2")));
        dut.ports.push(port("\\bus[0]", Direction::Input, PortType::Logic, None));
        let tb = gen(&dut);
        assert!(tb.text.contains("    localparam \\W$   = 2;\n"));
        assert!(tb.text.contains("    logic             \\bus[0] ;\n"));
        assert!(tb.text.contains("        .\\W$   (\\W$ )\n"));
        assert!(tb.text.contains("        .clk      (clk),\n"));
        assert!(tb.text.contains("        .\\bus[0]  (\\bus[0] )\n"));
        assert!(tb.text.contains("        \\bus[0]  = '0;\n"));
    }

    #[test]
    fn escaped_clock_and_reset() {
        let mut dut = fifo();
        dut.ports[0].name = "\\clk".to_string();
        dut.ports[1].name = "\\rst_n".to_string();
        let config = TestbenchConfig {
            clock_names: vec!["\\clk".to_string()],
            reset_names: vec!["\\rst_n".to_string()],
            ..TestbenchConfig::default()
        };
        let tb = generate(&dut, &config, &BTreeMap::new()).unwrap();
        assert!(tb.text.contains("forever #(CLK_PERIOD / 2.0) \\clk  = ~\\clk ;\n"));
        assert!(tb.text.contains("        \\rst_n  = 1'b0;\n"));
        assert!(tb.text.contains("repeat (RESET_CYCLES) @(posedge \\clk );\n"));
        assert!(tb.text.contains("wait (\\rst_n  === 1'b1);\n"));
    }

    fn gen_err(dut: &Dut) -> TestbenchError {
        generate(dut, &TestbenchConfig::default(), &BTreeMap::new()).unwrap_err()
    }
}
