//! SystemVerilog testbench generation for a parsed DUT.
//!
//! [`generate`] turns a [`Dut`](tbgen_parser::Dut) and the `[testbench]`
//! settings into a self-contained testbench module: signal declarations, a
//! clock, a reset sequence, the DUT instance and a stimulus block that ends
//! the run with `$finish`. The first line records the DUT's content hash so
//! [`is_up_to_date`] can tell whether regeneration is needed.

#![warn(missing_docs)]

pub mod error;
pub mod generator;
pub mod provenance;

pub use error::TestbenchError;
pub use generator::{generate, Testbench};
pub use provenance::{is_up_to_date, recorded_hash};
