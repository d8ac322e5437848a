//! Recursive-descent parser for the Cascade language.
//!
//! Transforms a lexed token list into a [`Program`]. Expression parsing is a
//! precedence-climbing ladder built from two templates (see
//! [`expr::parse_binary`] and [`expr::parse_unary_level`]); failed productions
//! report one diagnostic and raise an internal [`Recovery`] signal that is
//! caught at statement and declaration boundaries, where the parser
//! resynchronises and continues. The returned program is best-effort: it
//! contains every declaration that could be completed.

pub mod decl;
pub mod expr;
pub mod recovery;
pub mod stmt;
pub mod types;

use crate::ast::Program;
use crate::diag::{Diagnostic, DiagnosticSink, ErrorCode};
use crate::span::Span;
use crate::token::{Token, TokenKind};
use std::path::PathBuf;
use std::sync::Arc;

/// Internal signal that a production failed after reporting its diagnostic.
///
/// Never escapes the parser; the frame that can tolerate the failure converts
/// it into a call to [`recovery::synchronize`].
#[derive(Debug)]
pub(crate) struct Recovery;

pub(crate) type ParseResult<T> = Result<T, Recovery>;

/// Parser state for a single file.
pub struct Parser<'src, 'diag> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    path: Arc<PathBuf>,
    sink: &'diag mut dyn DiagnosticSink,
    seen_module: bool,
}

impl<'src, 'diag> Parser<'src, 'diag> {
    /// Create a parser over a lexed token list.
    pub fn new(
        tokens: Vec<Token<'src>>,
        path: Arc<PathBuf>,
        sink: &'diag mut dyn DiagnosticSink,
    ) -> Self {
        Parser {
            tokens,
            pos: 0,
            path,
            sink,
            seen_module: false,
        }
    }

    /// Parse the whole file.
    ///
    /// Diagnostics are delivered through the sink as they occur; the program
    /// contains every declaration the parser could complete.
    pub fn parse(mut self) -> Program {
        let mut declarations = Vec::new();

        while !self.at_end() {
            let before = self.pos;

            match decl::parse_declaration(&mut self) {
                Ok(Some(declaration)) => declarations.push(declaration),
                Ok(None) => {}
                Err(Recovery) => {
                    recovery::synchronize(&mut self);

                    // a recovery that stops in front of an anchor must still
                    // make progress, or the same token errors forever
                    if self.pos == before && !self.at_end() {
                        self.advance();
                    }
                }
            }
        }

        Program::new(self.path, declarations)
    }

    // ── token management ────────────────────────────────────────────────

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind())
    }

    pub(crate) fn peek_kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind())
    }

    /// The current token, or an `unexpected_end_of_input` diagnostic.
    pub(crate) fn current(&mut self) -> ParseResult<Token<'src>> {
        if self.pos < self.tokens.len() {
            Ok(self.tokens[self.pos].clone())
        } else {
            Err(self.end_of_input())
        }
    }

    /// Consume and return the current token. Callers check for end of input
    /// first.
    pub(crate) fn advance(&mut self) -> Token<'src> {
        let token = self.tokens[self.pos].clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Consume the current token if it matches.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume the current token, or report `code` at the current position.
    pub(crate) fn expect(&mut self, kind: TokenKind, code: ErrorCode) -> ParseResult<Token<'src>> {
        if self.check(kind) {
            Ok(self.advance())
        } else if self.at_end() {
            Err(self.end_of_input())
        } else {
            let span = self.span_here();
            Err(self.error(code, span))
        }
    }

    /// The span of the current token, or of the last token when input is
    /// exhausted.
    pub(crate) fn span_here(&self) -> Span {
        if let Some(token) = self.tokens.get(self.pos) {
            token.span().clone()
        } else {
            self.last_span()
        }
    }

    fn last_span(&self) -> Span {
        match self.tokens.last() {
            Some(token) => token.span().clone(),
            None => Span::new(0, 1, 1, 0, Arc::clone(&self.path)),
        }
    }

    // ── error reporting ─────────────────────────────────────────────────

    /// Report a diagnostic and produce the recovery signal.
    pub(crate) fn error(&mut self, code: ErrorCode, span: Span) -> Recovery {
        self.sink.report(Diagnostic::ast(code, span));
        Recovery
    }

    /// Report that the token stream ended while a production still needed
    /// input. The span points at the last token; the renderer nudges the
    /// caret past it.
    pub(crate) fn end_of_input(&mut self) -> Recovery {
        let span = self.last_span();
        self.error(ErrorCode::UnexpectedEndOfInput, span)
    }

    pub(crate) fn mark_module_seen(&mut self) -> bool {
        let seen = self.seen_module;
        self.seen_module = true;
        seen
    }
}
