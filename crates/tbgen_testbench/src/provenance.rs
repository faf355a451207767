//! The provenance line at the top of every generated testbench.

use tbgen_common::ContentHash;
use tbgen_parser::Dut;

const MARKER: &str = "source-hash: ";

/// The first line of a generated testbench.
pub(crate) fn header_line(dut: &Dut) -> String {
    format!(
        "// Generated by tbgen from {}; {MARKER}{}",
        dut.name, dut.source_hash
    )
}

/// Reads the DUT hash recorded in a previously generated testbench.
///
/// Only the first line is considered, so a hash quoted elsewhere in a
/// hand-edited file is ignored.
pub fn recorded_hash(text: &str) -> Option<ContentHash> {
    let first = text.lines().next()?;
    if !first.starts_with("// Generated by tbgen from ") {
        return None;
    }
    let (_, hash) = first.split_once(MARKER)?;
    hash.trim().parse().ok()
}

/// True if `existing` was generated from the current contents of `dut`'s file.
pub fn is_up_to_date(existing: &str, dut: &Dut) -> bool {
    recorded_hash(existing).is_some_and(|hash| hash.to_string() == dut.source_hash)
}
