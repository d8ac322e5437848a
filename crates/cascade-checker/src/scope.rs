//! Lexical scopes for the type checker.
//!
//! Scopes form a tree: each one maps symbol names and alias names to types
//! and links to its parent. Lookups walk the parent chain; inserts always hit
//! the leaf. A single current-scope cursor moves as the checker enters and
//! leaves functions and blocks (stack discipline).

use crate::types::TypeRepr;
use rustc_hash::FxHashMap;

/// Index of a scope within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

/// One lexical environment.
#[derive(Debug, Clone)]
pub struct Scope {
    parent: Option<ScopeId>,
    symbols: FxHashMap<String, TypeRepr>,
    aliases: FxHashMap<String, TypeRepr>,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Scope {
            parent,
            symbols: FxHashMap::default(),
            aliases: FxHashMap::default(),
        }
    }
}

/// The scope tree plus the cursor for the scope currently being checked.
pub struct ScopeTree {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl ScopeTree {
    /// Create a tree holding only the global scope.
    pub fn new() -> Self {
        ScopeTree {
            scopes: vec![Scope::new(None)],
            current: ScopeId(0),
        }
    }

    /// The current scope's id.
    pub fn current_scope_id(&self) -> ScopeId {
        self.current
    }

    /// Enter a new child of the current scope.
    pub fn push_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(Some(self.current)));
        self.current = id;
        id
    }

    /// Leave the current scope. Does nothing at the global scope.
    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current.0 as usize].parent {
            self.current = parent;
        }
    }

    /// Bind a symbol in the current scope. Rebinding the same name replaces
    /// the old entry (last wins).
    pub fn define(&mut self, name: impl Into<String>, ty: TypeRepr) {
        self.scopes[self.current.0 as usize]
            .symbols
            .insert(name.into(), ty);
    }

    /// Bind a type alias in the current scope.
    pub fn define_alias(&mut self, name: impl Into<String>, ty: TypeRepr) {
        self.scopes[self.current.0 as usize]
            .aliases
            .insert(name.into(), ty);
    }

    /// Resolve a symbol, walking from the current scope up the parent chain.
    pub fn resolve(&self, name: &str) -> Option<&TypeRepr> {
        let mut id = self.current;

        loop {
            let scope = &self.scopes[id.0 as usize];

            if let Some(ty) = scope.symbols.get(name) {
                return Some(ty);
            }

            id = scope.parent?;
        }
    }

    /// Resolve a type alias, walking from the current scope up the parent
    /// chain.
    pub fn resolve_alias(&self, name: &str) -> Option<&TypeRepr> {
        let mut id = self.current;

        loop {
            let scope = &self.scopes[id.0 as usize];

            if let Some(ty) = scope.aliases.get(name) {
                return Some(ty);
            }

            id = scope.parent?;
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_resolve() {
        let mut scopes = ScopeTree::new();
        scopes.define("x", TypeRepr::int(32));

        assert_eq!(scopes.resolve("x"), Some(&TypeRepr::int(32)));
        assert_eq!(scopes.resolve("y"), None);
    }

    #[test]
    fn test_resolve_walks_parents() {
        let mut scopes = ScopeTree::new();
        scopes.define("x", TypeRepr::int(32));
        scopes.push_scope();
        scopes.push_scope();

        assert_eq!(scopes.resolve("x"), Some(&TypeRepr::int(32)));
    }

    #[test]
    fn test_shadowing_in_nested_scope() {
        let mut scopes = ScopeTree::new();
        scopes.define("x", TypeRepr::int(32));
        scopes.push_scope();
        scopes.define("x", TypeRepr::boolean());

        assert_eq!(scopes.resolve("x"), Some(&TypeRepr::boolean()));

        scopes.pop_scope();
        assert_eq!(scopes.resolve("x"), Some(&TypeRepr::int(32)));
    }

    #[test]
    fn test_insert_hits_only_the_leaf() {
        let mut scopes = ScopeTree::new();
        scopes.push_scope();
        scopes.define("local", TypeRepr::int(8));
        scopes.pop_scope();

        assert_eq!(scopes.resolve("local"), None);
    }

    #[test]
    fn test_last_binding_wins() {
        let mut scopes = ScopeTree::new();
        scopes.define("x", TypeRepr::int(32));
        scopes.define("x", TypeRepr::int(64));

        assert_eq!(scopes.resolve("x"), Some(&TypeRepr::int(64)));
    }

    #[test]
    fn test_aliases_are_separate_from_symbols() {
        let mut scopes = ScopeTree::new();
        scopes.define_alias("word", TypeRepr::uint(16));

        assert_eq!(scopes.resolve("word"), None);
        assert_eq!(scopes.resolve_alias("word"), Some(&TypeRepr::uint(16)));
    }
}
