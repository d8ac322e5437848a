//! Abstract syntax tree for the Cascade language.
//!
//! Four sibling families, each a closed sum: declarations, statements,
//! expressions, and type annotations. A [`Program`] is the ordered list of
//! declarations parsed from one source file.

pub mod declaration;
pub mod expression;
pub mod statement;
pub mod types;

pub use declaration::*;
pub use expression::*;
pub use statement::*;
pub use types::*;

use std::path::PathBuf;
use std::sync::Arc;

/// Everything parsed from a single source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The file the program came from.
    pub path: Arc<PathBuf>,
    /// Top-level declarations, in source order.
    pub declarations: Vec<Declaration>,
}

impl Program {
    /// Create a program.
    pub fn new(path: Arc<PathBuf>, declarations: Vec<Declaration>) -> Self {
        Program { path, declarations }
    }

    /// Whether the file contained no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}
