//! Foundational types shared by every tbgen crate.
//!
//! Interned identifiers for module, parameter and port names, and the content
//! hash recorded in generated testbenches.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;

pub use hash::{ContentHash, ParseHashError};
pub use ident::{Ident, Interner};
