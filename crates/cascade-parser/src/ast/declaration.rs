//! Declaration AST nodes.

use crate::ast::expression::Expression;
use crate::ast::types::Type;
use crate::span::Span;

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `const name [: type] = init;`
    Const(ConstDecl),
    /// `static name [: type] = init;`
    Static(StaticDecl),
    /// `fn name(args) [type] { ... }`
    Fn(FnDecl),
    /// `module a::b;`
    Module(ModuleDecl),
    /// `import a::b [as alias];` or `from a::b import x, y;`
    Import(ImportDecl),
    /// `export <declaration>`
    Export(ExportDecl),
    /// `type Name = type;`
    TypeAlias(TypeAliasDecl),
    /// `struct Name { field: type, ... }`; parsed, never type checked.
    Struct(StructDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: Type,
    pub initializer: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticDecl {
    pub name: String,
    pub ty: Type,
    pub initializer: Expression,
    pub span: Span,
}

/// A single named, typed function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: String,
    pub args: Vec<Argument>,
    /// Defaults to void when the source leaves it off.
    pub return_type: Type,
    /// Always a block expression.
    pub body: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    /// The full `::`-joined module path.
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// The full `::`-joined path of the imported module.
    pub path: String,
    /// Items named in a `from ... import ...` form; empty otherwise.
    pub items: Vec<String>,
    /// The `as` alias, when one was given.
    pub alias: Option<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDecl {
    pub inner: Box<Declaration>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub name: String,
    pub aliased: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<StructField>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

impl Declaration {
    /// The source span this declaration covers.
    pub fn span(&self) -> &Span {
        match self {
            Declaration::Const(d) => &d.span,
            Declaration::Static(d) => &d.span,
            Declaration::Fn(d) => &d.span,
            Declaration::Module(d) => &d.span,
            Declaration::Import(d) => &d.span,
            Declaration::Export(d) => &d.span,
            Declaration::TypeAlias(d) => &d.span,
            Declaration::Struct(d) => &d.span,
        }
    }

    /// The declared name, for declarations that bind one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Const(d) => Some(&d.name),
            Declaration::Static(d) => Some(&d.name),
            Declaration::Fn(d) => Some(&d.name),
            Declaration::Module(d) => Some(&d.name),
            Declaration::TypeAlias(d) => Some(&d.name),
            Declaration::Struct(d) => Some(&d.name),
            Declaration::Export(d) => d.inner.name(),
            Declaration::Import(_) => None,
        }
    }
}
