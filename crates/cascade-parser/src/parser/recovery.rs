//! Panic-mode resynchronisation.
//!
//! After a production reports a diagnostic and raises [`super::Recovery`],
//! the catching frame calls [`synchronize`] to skip ahead to a point where
//! parsing can resume.

use super::Parser;
use crate::token::TokenKind;

/// Tokens the parser stops in front of when resynchronising.
const ANCHORS: &[TokenKind] = &[
    TokenKind::OpenBrace,
    TokenKind::CloseBrace,
    TokenKind::OpenBracket,
    TokenKind::CloseBracket,
    TokenKind::OpenParen,
    TokenKind::CloseParen,
    TokenKind::If,
    TokenKind::Else,
    TokenKind::Then,
    TokenKind::Fn,
    TokenKind::Let,
    TokenKind::Mut,
    TokenKind::Ret,
    TokenKind::Import,
    TokenKind::Export,
    TokenKind::Module,
    TokenKind::As,
    TokenKind::Pub,
    TokenKind::Assert,
];

/// Advance until a semicolon has been consumed or the parser sits in front
/// of a recovery anchor.
pub(crate) fn synchronize(parser: &mut Parser) {
    while let Some(kind) = parser.peek_kind() {
        if kind == TokenKind::Semicolon {
            parser.advance();
            return;
        }

        if ANCHORS.contains(&kind) {
            return;
        }

        parser.advance();
    }
}
