//! A loaded file plus the line index used to resolve byte offsets.

use crate::file_id::FileId;
use tbgen_common::ContentHash;
use std::path::PathBuf;

/// One source file owned by the [`SourceDb`](crate::SourceDb).
pub struct SourceFile {
    /// This file's id.
    pub id: FileId,
    /// Path on disk, or a synthetic name for in-memory sources.
    pub path: PathBuf,
    /// Full text.
    pub content: String,
    /// Byte offset of every line start; the first entry is always 0.
    line_starts: Vec<u32>,
    /// Hash of `content`, recorded in generated testbenches.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Wraps `content`, indexing line starts and hashing it.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_bytes(content.as_bytes());
        Self {
            id,
            path,
            content,
            line_starts,
            content_hash,
        }
    }

    /// Converts a byte offset to 1-indexed `(line, column)`.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns the text of the given 1-indexed line without its terminator.
    ///
    /// A trailing `\r` from CRLF files is stripped too.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.content.len(), |&next| next as usize - 1);
        let text = &self.content[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    /// Number of lines (an empty file has one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    starts.extend(
        content
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| (i + 1) as u32),
    );
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new(
            FileId::from_raw(0),
            PathBuf::from("dut.sv"),
            content.to_string(),
        )
    }

    #[test]
    fn line_starts_computation() {
        let f = make_file("module m(\n  input logic a\n);");
        assert_eq!(f.line_starts, vec![0, 10, 26]);
        assert_eq!(f.line_count(), 3);
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(4), (2, 1));
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn line_text_strips_terminators() {
        let f = make_file("module m(\r\n\toutputt logic q\r\n);");
        assert_eq!(f.line_text(1), Some("module m("));
        assert_eq!(f.line_text(2), Some("\toutputt logic q"));
        assert_eq!(f.line_text(3), Some(");"));
        assert_eq!(f.line_text(4), None);
        assert_eq!(f.line_text(0), None);
    }

    #[test]
    fn empty_file() {
        let f = make_file("");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_text(1), Some(""));
    }

    #[test]
    fn content_hash_matches_bytes() {
        let f = make_file("endmodule");
        assert_eq!(f.content_hash, ContentHash::from_bytes(b"endmodule"));
    }
}
