//! Cascade type checker.
//!
//! This crate provides:
//! - [`TypeRepr`], the checker's flattened type representation, with the
//!   promotion rule and the poison-equality discipline
//! - [`ScopeTree`], symbol and alias tables with parent links
//! - [`TypeChecker`], the two-pass checker over parsed programs

pub mod checker;
pub mod scope;
pub mod types;

pub use checker::TypeChecker;
pub use scope::{Scope, ScopeId, ScopeTree};
pub use types::{promote, TypeBase, TypeData, TypeModifier, TypeRepr};
