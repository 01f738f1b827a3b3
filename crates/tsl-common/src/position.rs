//! Line/column positions for reporting.
//!
//! Diagnostics carry byte offsets; reporters convert them through a
//! [`LineMap`] built once per file.

use serde::{Deserialize, Serialize};

/// Zero-based line and byte column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

/// Start offsets of every line in a source text.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn build(text: &str) -> Self {
        let mut line_starts = vec![0];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push((i + 1) as u32);
                }
                b'\n' => line_starts.push((i + 1) as u32),
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Offsets past the end clamp to the last line.
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position {
            line: line as u32,
            character: offset - self.line_starts[line],
        }
    }
}
