//! Source location tracking.
//!
//! Every token and every AST node carries a [`Span`] that ties it back to a
//! byte range in the original source file. Spans of composite nodes are the
//! union of their leaves' spans.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A region of a source file.
///
/// Holds the byte offset the region begins at, the 1-based line and column of
/// its first character, its length in bytes, and the file it came from. The
/// path is shared, so cloning a span is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    position: usize,
    line: usize,
    column: usize,
    length: usize,
    path: Arc<PathBuf>,
}

impl Span {
    /// Create a new span.
    pub fn new(position: usize, line: usize, column: usize, length: usize, path: Arc<PathBuf>) -> Self {
        Span {
            position,
            line,
            column,
            length,
            path,
        }
    }

    /// Byte offset of the first character.
    pub fn position(&self) -> usize {
        self.position
    }

    /// 1-based line of the first character.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the first character.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Length of the region in bytes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    /// The file this span points into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shared handle to the file path.
    pub fn path_arc(&self) -> Arc<PathBuf> {
        Arc::clone(&self.path)
    }

    /// Derive a span at the same location with a different length.
    pub fn with_length(&self, length: usize) -> Span {
        Span {
            position: self.position,
            line: self.line,
            column: self.column,
            length,
            path: Arc::clone(&self.path),
        }
    }

    /// The union of two spans: starts at the earlier one and covers through
    /// the end of the later one.
    pub fn merge(a: &Span, b: &Span) -> Span {
        let first = if a.position <= b.position { a } else { b };
        let start = a.position.min(b.position);
        let end = a.end().max(b.end());

        Span {
            position: start,
            line: first.line,
            column: first.column,
            length: end - start,
            path: Arc::clone(&first.path),
        }
    }
}
