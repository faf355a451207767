//! Identifier for a file inside a [`SourceDb`](crate::SourceDb).

use serde::{Deserialize, Serialize};

/// Index of a file in the [`SourceDb`](crate::SourceDb) that loaded it.
///
/// Ids are issued in load order, so ordering by id orders by input file.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(u32);

impl FileId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Position in the database's file list.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
