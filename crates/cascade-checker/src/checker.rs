//! The type checker.
//!
//! Each module is checked in two passes. The first walks top-level
//! declarations and records every `const`, `static`, and `fn` name against
//! its declared type, and every alias against its aliased type; implied
//! global types are then silently refined by a structural walk of their
//! initialisers so forward references resolve. The second pass visits every
//! declaration body bottom-up, computing a [`TypeRepr`] for each expression
//! and filling implied AST annotations in from the inferred types.
//!
//! A failed check yields the poison type, which compares equal to every
//! other type, so one root cause produces exactly one diagnostic.

use crate::scope::ScopeTree;
use crate::types::{promote, TypeBase, TypeData, TypeModifier, TypeRepr};
use cascade_parser::ast::{
    self, ArrayType, BlockExpr, Builtin, BuiltinType, Declaration, Expression, FnDecl,
    LiteralValue, LoopKind, PointerType, Program, ReferenceType, Statement, UnaryOp,
    UserDefinedType,
};
use cascade_parser::diag::{Diagnostic, DiagnosticSink, ErrorCode};
use cascade_parser::span::Span;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// The two-pass type checker. One instance can check any number of parsed
/// programs; per-module scopes are rebuilt for each file.
pub struct TypeChecker<'diag> {
    scopes: ScopeTree,
    sink: &'diag mut dyn DiagnosticSink,
    /// Name of the binding whose initialiser is being checked, for
    /// self-reference detection.
    current_init: Option<String>,
    /// Declared return type of the enclosing function.
    return_type: Option<TypeRepr>,
    /// Globals whose implied types are mid-inference, for cycle detection.
    inferring: FxHashSet<String>,
    inferring_current: Option<String>,
    emitted: usize,
}

impl<'diag> TypeChecker<'diag> {
    /// Create a checker that reports through `sink`.
    pub fn new(sink: &'diag mut dyn DiagnosticSink) -> Self {
        TypeChecker {
            scopes: ScopeTree::new(),
            sink,
            current_init: None,
            return_type: None,
            inferring: FxHashSet::default(),
            inferring_current: None,
            emitted: 0,
        }
    }

    /// Check every program. Returns whether no diagnostics were produced.
    /// Implied declaration types are filled in from the inferred types as a
    /// side effect.
    pub fn check(&mut self, programs: &mut [Program]) -> bool {
        self.emitted = 0;

        for program in programs.iter_mut() {
            self.check_program(program);
        }

        self.emitted == 0
    }

    fn check_program(&mut self, program: &mut Program) {
        self.scopes = ScopeTree::new();
        self.inferring.clear();
        self.inferring_current = None;
        self.current_init = None;
        self.return_type = None;

        // pass 1: register globals
        for declaration in &program.declarations {
            self.register_declaration(declaration);
        }

        // refine implied globals so forward references resolve
        for declaration in &program.declarations {
            self.infer_global(declaration, program);
        }

        // pass 2: check bodies
        for declaration in &mut program.declarations {
            self.check_declaration(declaration);
        }
    }

    // ── pass 1: symbol registration ─────────────────────────────────────

    fn register_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Const(d) => {
                let ty = self.lower_type(&d.ty);
                self.scopes.define(d.name.clone(), ty);
            }
            Declaration::Static(d) => {
                let ty = self.lower_type(&d.ty);
                self.scopes.define(d.name.clone(), ty);
            }
            Declaration::Fn(d) => {
                let ty = self.lower_type(&d.return_type);
                self.scopes.define(d.name.clone(), ty);
            }
            Declaration::TypeAlias(d) => {
                let ty = self.lower_type(&d.aliased);
                self.scopes.define_alias(d.name.clone(), ty);
            }
            Declaration::Export(d) => self.register_declaration(&d.inner),
            Declaration::Module(_) | Declaration::Import(_) | Declaration::Struct(_) => {}
        }
    }

    // ── implied-global inference ────────────────────────────────────────

    fn infer_global(&mut self, declaration: &Declaration, program: &Program) {
        match declaration {
            Declaration::Const(d) => self.infer_global_binding(&d.name, &d.ty, &d.initializer, program),
            Declaration::Static(d) => {
                self.infer_global_binding(&d.name, &d.ty, &d.initializer, program)
            }
            Declaration::Export(d) => self.infer_global(&d.inner, program),
            _ => {}
        }
    }

    fn infer_global_binding(
        &mut self,
        name: &str,
        ty: &ast::Type,
        initializer: &Expression,
        program: &Program,
    ) {
        if !ty.is_implied() {
            return;
        }

        if let Some(existing) = self.scopes.resolve(name) {
            if !existing.is_implied() {
                return;
            }
        }

        if self.inferring.contains(name) {
            return;
        }

        self.inferring.insert(name.to_string());
        let previous = self.inferring_current.replace(name.to_string());

        let mut locals = Vec::new();
        let inferred = self.infer_expr(initializer, program, &mut locals);

        self.inferring_current = previous;
        self.inferring.remove(name);

        if !inferred.is_implied() {
            self.scopes.define(name, inferred);
        }
    }

    /// A silent, read-only structural walk of an initialiser expression.
    /// Real diagnostics are left to the checking pass; the one exception is
    /// an indirect initialiser cycle, which is only visible here.
    fn infer_expr(
        &mut self,
        expr: &Expression,
        program: &Program,
        locals: &mut Vec<FxHashMap<String, TypeRepr>>,
    ) -> TypeRepr {
        match expr {
            Expression::Literal(l) => literal_type(&l.value),
            Expression::Identifier(id) => {
                for frame in locals.iter().rev() {
                    if let Some(ty) = frame.get(&id.name) {
                        return ty.clone();
                    }
                }

                if self.inferring.contains(&id.name) {
                    if self.inferring_current.as_deref() != Some(id.name.as_str()) {
                        self.report(ErrorCode::UsingVariableInInitializer, id.span.clone());
                    }
                    return TypeRepr::error();
                }

                match self.scopes.resolve(&id.name) {
                    Some(ty) if !ty.is_implied() => return ty.clone(),
                    Some(_) => {}
                    None => return TypeRepr::error(),
                }

                // the name resolves to a global still awaiting inference
                if let Some(declaration) = find_global(program, &id.name) {
                    self.infer_global(declaration, program);
                }

                match self.scopes.resolve(&id.name) {
                    Some(ty) if !ty.is_implied() => ty.clone(),
                    _ => TypeRepr::implied(),
                }
            }
            Expression::Binary(b) => {
                let lt = self.infer_expr(&b.lhs, program, locals);
                let rt = self.infer_expr(&b.rhs, program, locals);

                if b.op.is_comparison() {
                    TypeRepr::boolean()
                } else if lt.is_error() || rt.is_error() {
                    TypeRepr::error()
                } else if lt == rt {
                    lt
                } else {
                    promote(&lt, &rt)
                        .or_else(|| promote(&rt, &lt))
                        .unwrap_or_else(TypeRepr::error)
                }
            }
            Expression::Unary(u) => {
                let ty = self.infer_expr(&u.operand, program, locals);

                if ty.is_error() {
                    return ty;
                }

                match u.op {
                    UnaryOp::AddressOf => ty.with_leading(TypeModifier::MutPtr),
                    UnaryOp::Ref => {
                        if matches!(ty.leading(), Some(TypeModifier::Ref | TypeModifier::MutRef)) {
                            TypeRepr::error()
                        } else {
                            ty.with_leading(TypeModifier::MutRef)
                        }
                    }
                    UnaryOp::Deref => {
                        if matches!(ty.leading(), Some(TypeModifier::Ptr | TypeModifier::MutPtr)) {
                            ty.without_leading()
                        } else {
                            TypeRepr::error()
                        }
                    }
                    _ => ty,
                }
            }
            Expression::Call(c) => self.infer_expr(&c.callee, program, locals),
            Expression::FieldAccess(f) => {
                self.infer_expr(&f.base, program, locals);
                TypeRepr::error()
            }
            Expression::Index(i) => {
                let ty = self.infer_expr(&i.base, program, locals);

                if ty.leading() == Some(TypeModifier::Array) {
                    ty.without_leading()
                } else {
                    TypeRepr::error()
                }
            }
            Expression::IfElse(e) => self.infer_expr(&e.then_branch, program, locals),
            Expression::Block(b) => {
                locals.push(FxHashMap::default());

                for statement in &b.statements {
                    let (name, ty, initializer) = match statement {
                        Statement::Let(s) => (&s.name, &s.ty, &s.initializer),
                        Statement::Mut(s) => (&s.name, &s.ty, &s.initializer),
                        _ => continue,
                    };

                    let bound = if ty.is_implied() {
                        self.infer_expr(initializer, program, locals)
                    } else {
                        self.lower_type(ty)
                    };

                    if let Some(frame) = locals.last_mut() {
                        frame.insert(name.clone(), bound);
                    }
                }

                let ty = match &b.tail {
                    Some(tail) => self.infer_expr(tail, program, locals),
                    None => TypeRepr::void(),
                };

                locals.pop();
                ty
            }
            Expression::ArrayInit(a) => match a.elements.first() {
                Some(first) => self
                    .infer_expr(first, program, locals)
                    .with_leading(TypeModifier::Array),
                None => TypeRepr::implied(),
            },
            Expression::StructInit(s) => TypeRepr::user(s.name.clone()),
        }
    }

    // ── pass 2: declarations ────────────────────────────────────────────

    fn check_declaration(&mut self, declaration: &mut Declaration) -> TypeRepr {
        match declaration {
            Declaration::Const(d) => {
                let name = d.name.clone();
                self.check_binding(&name, &mut d.ty, &mut d.initializer)
            }
            Declaration::Static(d) => {
                let name = d.name.clone();
                self.check_binding(&name, &mut d.ty, &mut d.initializer)
            }
            Declaration::Fn(d) => self.check_fn(d),
            Declaration::Export(d) => self.check_declaration(&mut d.inner),
            Declaration::Module(_)
            | Declaration::Import(_)
            | Declaration::TypeAlias(_)
            | Declaration::Struct(_) => TypeRepr::void(),
        }
    }

    /// Shared rule for `const`, `static`, `let`, and `mut`: check the
    /// initialiser, then either fill an implied annotation from its type or
    /// require the annotation and the initialiser to agree.
    fn check_binding(
        &mut self,
        name: &str,
        ty: &mut ast::Type,
        initializer: &mut Expression,
    ) -> TypeRepr {
        let previous = self.current_init.replace(name.to_string());
        let init_ty = self.check_expression(initializer);
        self.current_init = previous;

        let declared = self.lower_type(ty);

        if declared.is_implied() {
            *ty = repr_to_type(&init_ty, ty.span().clone());
            self.scopes.define(name, init_ty.clone());
            return init_ty;
        }

        if declared != init_ty {
            let span = initializer.span().clone();
            self.mismatch(&declared, &init_ty, &span);
        }

        self.scopes.define(name, declared.clone());
        declared
    }

    fn check_fn(&mut self, d: &mut FnDecl) -> TypeRepr {
        let declared = self.lower_type(&d.return_type);

        self.scopes.push_scope();

        for arg in &d.args {
            let ty = self.lower_type(&arg.ty);
            self.scopes.define(arg.name.clone(), ty);
        }

        let previous = self.return_type.replace(declared.clone());
        let body_ty = self.check_expression(&mut d.body);
        self.return_type = previous;

        self.scopes.pop_scope();

        // a void body returns through `ret` statements, which are checked
        // against the declared type where they occur
        if !body_ty.is_void() && body_ty != declared && promote(&body_ty, &declared).is_none() {
            let span = d.body.span().clone();
            self.mismatch(&declared, &body_ty, &span);
        }

        declared
    }

    // ── pass 2: statements ──────────────────────────────────────────────

    fn check_statement(&mut self, statement: &mut Statement) -> TypeRepr {
        match statement {
            Statement::Expression(s) => {
                self.check_expression(&mut s.expression);
            }
            Statement::Let(s) => {
                let name = s.name.clone();
                self.check_binding(&name, &mut s.ty, &mut s.initializer);
            }
            Statement::Mut(s) => {
                let name = s.name.clone();
                self.check_binding(&name, &mut s.ty, &mut s.initializer);
            }
            Statement::Ret(s) => {
                let value_ty = match &mut s.value {
                    Some(value) => self.check_expression(value),
                    None => TypeRepr::void(),
                };

                let expected = self.return_type.clone().unwrap_or_else(TypeRepr::void);

                if value_ty != expected && promote(&value_ty, &expected).is_none() {
                    let span = s.span.clone();
                    self.mismatch(&expected, &value_ty, &span);
                }
            }
            Statement::Loop(s) => match &mut s.kind {
                LoopKind::Forever => {
                    self.check_expression(&mut s.body);
                }
                LoopKind::While(condition) => {
                    let ty = self.check_expression(condition);
                    let span = condition.span().clone();
                    self.expect_bool(&ty, &span);
                    self.check_expression(&mut s.body);
                }
                LoopKind::ForIn { binding, iterable } => {
                    let ty = self.check_expression(iterable);
                    let span = iterable.span().clone();

                    let element = if ty.is_error() {
                        ty
                    } else if ty.leading() == Some(TypeModifier::Array) {
                        ty.without_leading()
                    } else {
                        self.report_note(
                            ErrorCode::MismatchedTypes,
                            span,
                            format!("Expected an array type, got type '{ty}'"),
                        );
                        TypeRepr::error()
                    };

                    self.scopes.push_scope();
                    self.scopes.define(binding.clone(), element);
                    self.check_expression(&mut s.body);
                    self.scopes.pop_scope();
                }
            },
            Statement::Assert(s) => {
                let ty = self.check_expression(&mut s.condition);
                let span = s.condition.span().clone();
                self.expect_bool(&ty, &span);
            }
            Statement::Break(_) | Statement::Continue(_) => {}
        }

        TypeRepr::void()
    }

    // ── pass 2: expressions ─────────────────────────────────────────────

    fn check_expression(&mut self, expr: &mut Expression) -> TypeRepr {
        match expr {
            Expression::Literal(l) => literal_type(&l.value),
            Expression::Identifier(id) => {
                if self.current_init.as_deref() == Some(id.name.as_str()) {
                    self.report(ErrorCode::UsingVariableInInitializer, id.span.clone());
                    return TypeRepr::error();
                }

                // unresolvable names stay silent: imports are parsed but
                // never resolved, so unknown names are expected here
                match self.scopes.resolve(&id.name) {
                    Some(ty) => ty.clone(),
                    None => TypeRepr::error(),
                }
            }
            Expression::Call(c) => {
                let callee_ty = self.check_expression(&mut c.callee);

                for arg in &mut c.args {
                    self.check_expression(arg);
                }

                callee_ty
            }
            Expression::Binary(b) => {
                let lt = self.check_expression(&mut b.lhs);
                let rt = self.check_expression(&mut b.rhs);
                let span = b.span.clone();

                if lt.is_error() || rt.is_error() {
                    return if b.op.is_comparison() {
                        TypeRepr::boolean()
                    } else {
                        TypeRepr::error()
                    };
                }

                let combined = if lt == rt {
                    Some(lt.clone())
                } else {
                    promote(&lt, &rt).or_else(|| promote(&rt, &lt))
                };

                match combined {
                    Some(ty) => {
                        if b.op.is_comparison() {
                            TypeRepr::boolean()
                        } else {
                            ty
                        }
                    }
                    None => {
                        self.mismatch(&lt, &rt, &span);
                        TypeRepr::error()
                    }
                }
            }
            Expression::Unary(u) => {
                let ty = self.check_expression(&mut u.operand);
                let span = u.span.clone();

                if ty.is_error() {
                    return ty;
                }

                match u.op {
                    UnaryOp::AddressOf => ty.with_leading(TypeModifier::MutPtr),
                    UnaryOp::Ref => {
                        if matches!(ty.leading(), Some(TypeModifier::Ref | TypeModifier::MutRef)) {
                            self.report_note(
                                ErrorCode::MismatchedTypes,
                                span,
                                "A reference cannot refer to another reference.".to_string(),
                            );
                            TypeRepr::error()
                        } else {
                            ty.with_leading(TypeModifier::MutRef)
                        }
                    }
                    UnaryOp::Deref => {
                        if matches!(ty.leading(), Some(TypeModifier::Ptr | TypeModifier::MutPtr)) {
                            ty.without_leading()
                        } else {
                            self.report(ErrorCode::DereferenceRequiresPointerType, span);
                            TypeRepr::error()
                        }
                    }
                    UnaryOp::Neg
                    | UnaryOp::Pos
                    | UnaryOp::BitNot
                    | UnaryOp::Not
                    | UnaryOp::Clone => ty,
                }
            }
            Expression::FieldAccess(f) => {
                // struct layouts are not checked; poison keeps downstream quiet
                self.check_expression(&mut f.base);
                TypeRepr::error()
            }
            Expression::Index(i) => {
                let base_ty = self.check_expression(&mut i.base);
                let index_ty = self.check_expression(&mut i.index);

                if !index_ty.is_error() && !index_ty.is_integer() {
                    let span = i.index.span().clone();
                    self.report_note(
                        ErrorCode::MismatchedTypes,
                        span,
                        format!("Expected an integer index, got type '{index_ty}'"),
                    );
                }

                if base_ty.is_error() {
                    base_ty
                } else if base_ty.leading() == Some(TypeModifier::Array) {
                    base_ty.without_leading()
                } else {
                    let span = i.span.clone();
                    self.report_note(
                        ErrorCode::MismatchedTypes,
                        span,
                        format!("Expected an array type, got type '{base_ty}'"),
                    );
                    TypeRepr::error()
                }
            }
            Expression::IfElse(e) => {
                let cond_ty = self.check_expression(&mut e.condition);
                let cond_span = e.condition.span().clone();
                self.expect_bool(&cond_ty, &cond_span);

                let then_ty = self.check_expression(&mut e.then_branch);

                match &mut e.else_branch {
                    Some(else_branch) => {
                        let else_ty = self.check_expression(else_branch);

                        if then_ty == else_ty {
                            if then_ty.is_error() {
                                else_ty
                            } else {
                                then_ty
                            }
                        } else if let Some(ty) =
                            promote(&then_ty, &else_ty).or_else(|| promote(&else_ty, &then_ty))
                        {
                            ty
                        } else {
                            let span = e.span.clone();
                            self.mismatch(&then_ty, &else_ty, &span);
                            TypeRepr::error()
                        }
                    }
                    None => TypeRepr::void(),
                }
            }
            Expression::Block(b) => self.check_block(b),
            Expression::ArrayInit(a) => {
                let mut elements = a.elements.iter_mut();

                let Some(first) = elements.next() else {
                    return TypeRepr::implied().with_leading(TypeModifier::Array);
                };

                let mut element_ty = self.check_expression(first);

                for element in elements {
                    let ty = self.check_expression(element);

                    if ty == element_ty {
                        continue;
                    }

                    if let Some(widened) = promote(&ty, &element_ty) {
                        element_ty = widened;
                    } else if let Some(widened) = promote(&element_ty, &ty) {
                        element_ty = widened;
                    } else {
                        let span = element.span().clone();
                        self.mismatch(&element_ty, &ty, &span);
                        element_ty = TypeRepr::error();
                    }
                }

                element_ty.with_leading(TypeModifier::Array)
            }
            Expression::StructInit(s) => {
                for field in &mut s.fields {
                    self.check_expression(&mut field.value);
                }

                TypeRepr::user(s.name.clone())
            }
        }
    }

    fn check_block(&mut self, block: &mut BlockExpr) -> TypeRepr {
        self.scopes.push_scope();

        for statement in &mut block.statements {
            self.check_statement(statement);
        }

        let ty = match &mut block.tail {
            Some(tail) => self.check_expression(tail),
            None => TypeRepr::void(),
        };

        self.scopes.pop_scope();
        block.ty = repr_to_type(&ty, block.ty.span().clone());
        ty
    }

    // ── lowering ────────────────────────────────────────────────────────

    /// Flatten an AST type annotation into the checker's representation,
    /// resolving aliases through the scope chain.
    fn lower_type(&self, ty: &ast::Type) -> TypeRepr {
        let mut modifiers = VecDeque::new();
        let mut node = ty;

        loop {
            match node {
                ast::Type::Reference(r) => {
                    modifiers.push_back(if r.mutable {
                        TypeModifier::MutRef
                    } else {
                        TypeModifier::Ref
                    });
                    node = &r.referent;
                }
                ast::Type::Pointer(p) => {
                    modifiers.push_back(if p.mutable {
                        TypeModifier::MutPtr
                    } else {
                        TypeModifier::Ptr
                    });
                    node = &p.pointee;
                }
                ast::Type::Array(a) => {
                    modifiers.push_back(TypeModifier::Array);
                    node = &a.element;
                }
                _ => break,
            }
        }

        match node {
            ast::Type::Builtin(b) => {
                let (base, data) = builtin_parts(b.builtin);
                TypeRepr::with_parts(modifiers, base, data)
            }
            ast::Type::UserDefined(u) => match self.scopes.resolve_alias(&u.name) {
                Some(aliased) => {
                    let mut combined = modifiers;
                    combined.extend(aliased.modifiers().iter().copied());
                    TypeRepr::with_parts(combined, aliased.base(), aliased.data().clone())
                }
                None => TypeRepr::with_parts(
                    modifiers,
                    TypeBase::UserDefined,
                    TypeData::Name(u.name.clone()),
                ),
            },
            ast::Type::Implied(_) => {
                TypeRepr::with_parts(modifiers, TypeBase::Implied, TypeData::Precision(0))
            }
            ast::Type::Void(_) => {
                TypeRepr::with_parts(modifiers, TypeBase::Void, TypeData::Precision(0))
            }
            _ => TypeRepr::with_parts(modifiers, TypeBase::Error, TypeData::Precision(0)),
        }
    }

    // ── reporting ───────────────────────────────────────────────────────

    fn report(&mut self, code: ErrorCode, span: Span) {
        self.sink.report(Diagnostic::ty(code, span));
        self.emitted += 1;
    }

    fn report_note(&mut self, code: ErrorCode, span: Span, note: String) {
        self.sink.report(Diagnostic::ty(code, span).with_note(note));
        self.emitted += 1;
    }

    fn mismatch(&mut self, expected: &TypeRepr, got: &TypeRepr, span: &Span) {
        self.report_note(
            ErrorCode::MismatchedTypes,
            span.clone(),
            format!("Expected type '{expected}', got type '{got}'"),
        );
    }

    fn expect_bool(&mut self, ty: &TypeRepr, span: &Span) {
        if *ty != TypeRepr::boolean() {
            self.report_note(
                ErrorCode::MismatchedTypes,
                span.clone(),
                format!("Expected type 'bool', got type '{ty}'"),
            );
        }
    }
}

/// Fixed literal typings: char is `i8`, string is `[]i8`, int literals
/// default to `i32`, float literals to `f64`.
fn literal_type(value: &LiteralValue) -> TypeRepr {
    match value {
        LiteralValue::Char(_) => TypeRepr::int(8),
        LiteralValue::String(_) => TypeRepr::int(8).with_leading(TypeModifier::Array),
        LiteralValue::Int(_) => TypeRepr::int(32),
        LiteralValue::Float(_) => TypeRepr::float(64),
        LiteralValue::Bool(_) => TypeRepr::boolean(),
    }
}

fn builtin_parts(builtin: Builtin) -> (TypeBase, TypeData) {
    match builtin {
        Builtin::Bool => (TypeBase::Bool, TypeData::Precision(1)),
        Builtin::I8 => (TypeBase::Int, TypeData::Precision(8)),
        Builtin::I16 => (TypeBase::Int, TypeData::Precision(16)),
        Builtin::I32 => (TypeBase::Int, TypeData::Precision(32)),
        Builtin::I64 => (TypeBase::Int, TypeData::Precision(64)),
        Builtin::U8 => (TypeBase::Uint, TypeData::Precision(8)),
        Builtin::U16 => (TypeBase::Uint, TypeData::Precision(16)),
        Builtin::U32 => (TypeBase::Uint, TypeData::Precision(32)),
        Builtin::U64 => (TypeBase::Uint, TypeData::Precision(64)),
        Builtin::F32 => (TypeBase::Float, TypeData::Precision(32)),
        Builtin::F64 => (TypeBase::Float, TypeData::Precision(64)),
    }
}

fn scalar_builtin(base: TypeBase, precision: u32) -> Option<Builtin> {
    let builtin = match (base, precision) {
        (TypeBase::Bool, _) => Builtin::Bool,
        (TypeBase::Int, 8) => Builtin::I8,
        (TypeBase::Int, 16) => Builtin::I16,
        (TypeBase::Int, 32) => Builtin::I32,
        (TypeBase::Int, 64) => Builtin::I64,
        (TypeBase::Uint, 8) => Builtin::U8,
        (TypeBase::Uint, 16) => Builtin::U16,
        (TypeBase::Uint, 32) => Builtin::U32,
        (TypeBase::Uint, 64) => Builtin::U64,
        (TypeBase::Float, 32) => Builtin::F32,
        (TypeBase::Float, 64) => Builtin::F64,
        _ => return None,
    };

    Some(builtin)
}

/// Rebuild an AST annotation from an inferred representation, anchoring
/// every node at `span` (the place the annotation would have been written).
fn repr_to_type(repr: &TypeRepr, span: Span) -> ast::Type {
    let mut ty = match repr.base() {
        TypeBase::Bool | TypeBase::Int | TypeBase::Uint | TypeBase::Float => {
            match scalar_builtin(repr.base(), repr.precision()) {
                Some(builtin) => ast::Type::Builtin(BuiltinType {
                    builtin,
                    span: span.clone(),
                }),
                None => ast::Type::Error(span.clone()),
            }
        }
        TypeBase::UserDefined => ast::Type::UserDefined(UserDefinedType {
            name: repr.name().unwrap_or_default().to_string(),
            span: span.clone(),
        }),
        TypeBase::Implied => ast::Type::Implied(span.clone()),
        TypeBase::Void => ast::Type::Void(span.clone()),
        TypeBase::Error => ast::Type::Error(span.clone()),
    };

    for modifier in repr.modifiers().iter().rev() {
        ty = match modifier {
            TypeModifier::Ref | TypeModifier::MutRef => ast::Type::Reference(ReferenceType {
                mutable: *modifier == TypeModifier::MutRef,
                referent: Box::new(ty),
                span: span.clone(),
            }),
            TypeModifier::Ptr | TypeModifier::MutPtr => ast::Type::Pointer(PointerType {
                mutable: *modifier == TypeModifier::MutPtr,
                pointee: Box::new(ty),
                span: span.clone(),
            }),
            TypeModifier::Array => ast::Type::Array(ArrayType {
                element: Box::new(ty),
                length: None,
                span: span.clone(),
            }),
        };
    }

    ty
}

fn find_global<'a>(program: &'a Program, name: &str) -> Option<&'a Declaration> {
    program.declarations.iter().find_map(|declaration| {
        let inner = match declaration {
            Declaration::Export(e) => &*e.inner,
            other => other,
        };

        match inner {
            Declaration::Const(d) if d.name == name => Some(inner),
            Declaration::Static(d) if d.name == name => Some(inner),
            _ => None,
        }
    })
}
