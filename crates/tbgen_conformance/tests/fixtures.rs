//! Parse → check → model over the shipped DUT fixtures.

use tbgen_conformance::{
    run_pipeline, DUT_WITHOUT_PARAMETERS, DUT_WITH_DIRECTION_ERROR, DUT_WITH_PARAMETERS,
};
use tbgen_parser::{Direction, PortType};

/// `(name, direction, type, dimension)` for the port list shared by all fixtures.
const SHARED_PORTS: [(&str, Direction, PortType, Option<&str>); 8] = [
    ("clk_i", Direction::Input, PortType::Logic, None),
    ("rst_ni", Direction::Input, PortType::Logic, None),
    ("sel_i", Direction::Input, PortType::Logic, Some("[1:0]")),
    ("data_i", Direction::Input, PortType::Logic, Some("[3:0][7:0]")),
    (
        "array_i",
        Direction::Input,
        PortType::Logic,
        Some("[WIDTH-1:0][DEPTH-1:0]"),
    ),
    ("result_o", Direction::Output, PortType::Logic, Some("[1:0]")),
    ("sda_io", Direction::Inout, PortType::Tri, None),
    ("scl_io", Direction::Inout, PortType::Wire, None),
];

fn assert_shared_ports(dut: &tbgen_parser::Dut) {
    assert_eq!(dut.ports.len(), SHARED_PORTS.len());
    for (port, (name, direction, port_type, dimension)) in dut.ports.iter().zip(SHARED_PORTS) {
        assert_eq!(port.name, name);
        assert_eq!(port.direction, direction, "direction of {name}");
        assert_eq!(port.port_type, port_type, "type of {name}");
        assert_eq!(port.dimension.as_deref(), dimension, "dimension of {name}");
    }
}

#[test]
fn dut_with_parameters_model() {
    let result = run_pipeline("dut_with_parameters.sv", DUT_WITH_PARAMETERS, None);
    assert!(!result.has_errors(), "{:#?}", result.rendered);

    let dut = result.dut.expect("top module");
    assert_eq!(dut.name, "dut_with_parameters");
    let params: Vec<(&str, Option<&str>)> = dut
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.value.as_deref()))
        .collect();
    assert_eq!(
        params,
        [("WIDTH", Some("8")), ("DEPTH", Some("16")), ("UNUSED", None)]
    );
    assert!(dut.parameters.iter().all(|p| !p.local));
    assert_shared_ports(&dut);
}

#[test]
fn dut_with_parameters_warnings() {
    let result = run_pipeline("dut_with_parameters.sv", DUT_WITH_PARAMETERS, None);
    assert_eq!(result.codes(), ["W201", "C301", "C301"]);
    assert_eq!(result.error_count, 0);
    assert_eq!(result.warning_count, 3);
    assert_eq!(
        result.diagnostics[0].message,
        "parameter `UNUSED` has no default value"
    );
    assert!(result.diagnostics[2].message.contains("`array_i`"));
}

#[test]
fn dut_without_parameters_model() {
    let result = run_pipeline("dut_without_parameters.sv", DUT_WITHOUT_PARAMETERS, None);
    assert!(!result.has_errors(), "{:#?}", result.rendered);
    assert_eq!(result.codes(), ["C301", "C301"]);

    let dut = result.dut.expect("top module");
    assert_eq!(dut.name, "dut_without_parameters");
    assert!(dut.parameters.is_empty());
    assert_shared_ports(&dut);
}

#[test]
fn port_widths() {
    let dut = run_pipeline("dut_with_parameters.sv", DUT_WITH_PARAMETERS, None)
        .dut
        .expect("top module");
    let bits: Vec<Option<u64>> = dut.ports.iter().map(|p| p.bits).collect();
    assert_eq!(
        bits,
        [
            Some(1),
            Some(1),
            Some(2),
            Some(32),
            None,
            Some(2),
            Some(1),
            Some(1)
        ]
    );
}

#[test]
fn direction_error_still_yields_model() {
    let result = run_pipeline("dut_with_direction_error.sv", DUT_WITH_DIRECTION_ERROR, None);
    assert!(result.has_errors());
    assert_eq!(result.codes(), ["C301", "C301", "E110"]);

    // The suggested direction is used so the rest of the list still parses.
    let dut = result.dut.expect("top module");
    assert_shared_ports(&dut);
}

#[test]
fn text_listing_matches_dict_format() {
    let dut = run_pipeline("dut_with_parameters.sv", DUT_WITH_PARAMETERS, None)
        .dut
        .expect("top module");
    let expected = "\
module dut_with_parameters
{'name': 'WIDTH', 'value': '8'}
{'name': 'DEPTH', 'value': '16'}
{'name': 'UNUSED', 'value': None}
{'name': 'clk_i', 'direction': 'input', 'type': 'logic', 'dimension': None}
{'name': 'rst_ni', 'direction': 'input', 'type': 'logic', 'dimension': None}
{'name': 'sel_i', 'direction': 'input', 'type': 'logic', 'dimension': '[1:0]'}
{'name': 'data_i', 'direction': 'input', 'type': 'logic', 'dimension': '[3:0][7:0]'}
{'name': 'array_i', 'direction': 'input', 'type': 'logic', 'dimension': '[WIDTH-1:0][DEPTH-1:0]'}
{'name': 'result_o', 'direction': 'output', 'type': 'logic', 'dimension': '[1:0]'}
{'name': 'sda_io', 'direction': 'inout', 'type': 'tri', 'dimension': None}
{'name': 'scl_io', 'direction': 'inout', 'type': 'wire', 'dimension': None}
";
    assert_eq!(dut.to_string(), expected);
}

#[test]
fn json_uses_dict_keys() {
    let dut = run_pipeline("dut_with_parameters.sv", DUT_WITH_PARAMETERS, None)
        .dut
        .expect("top module");
    let json: serde_json::Value = serde_json::to_value(&dut).unwrap();
    assert_eq!(json["name"], "dut_with_parameters");
    assert_eq!(json["parameters"][2]["name"], "UNUSED");
    assert!(json["parameters"][2]["value"].is_null());
    assert_eq!(json["ports"][3]["type"], "logic");
    assert_eq!(json["ports"][3]["dimension"], "[3:0][7:0]");
    assert_eq!(json["ports"][3]["bits"], 32);
    assert!(json["ports"][4]["bits"].is_null());
    assert_eq!(json["source_hash"].as_str().map(str::len), Some(32));
}

#[test]
fn hash_tracks_source_text() {
    let a = run_pipeline("a.sv", DUT_WITHOUT_PARAMETERS, None).dut.unwrap();
    let b = run_pipeline("b.sv", DUT_WITHOUT_PARAMETERS, None).dut.unwrap();
    let edited = DUT_WITHOUT_PARAMETERS.replace("assign", "// assign");
    let c = run_pipeline("a.sv", &edited, None).dut.unwrap();
    assert_eq!(a.source_hash, b.source_hash);
    assert_ne!(a.source_hash, c.source_hash);
}
