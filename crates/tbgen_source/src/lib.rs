//! Source text ownership and location tracking.
//!
//! [`SourceDb`] owns every DUT file loaded in a run. Tokens, AST nodes and
//! diagnostics refer back into it through [`Span`]s, which [`SourceDb::resolve_span`]
//! turns into the 1-indexed `file:line:col` form shown to users.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
