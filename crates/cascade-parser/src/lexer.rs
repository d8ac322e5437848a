//! Lexer for the Cascade language.
//!
//! Tokenisation is driven by a [`logos`]-derived raw token enum; a conversion
//! loop walks the raw matches, tracks line and column across skipped trivia,
//! and materialises [`Token`] values with full spans. Lexing is total: every
//! problem produces a diagnostic through the caller's sink and the scan moves
//! past at least one code unit.

use crate::diag::{Diagnostic, DiagnosticSink, ErrorCode};
use crate::span::Span;
use crate::token::{Token, TokenKind};
use logos::Logos;
use std::path::PathBuf;
use std::sync::Arc;

/// Raw matches produced by the generated scanner.
///
/// Keywords are not distinguished here; identifier-shaped lexemes are
/// classified against the keyword table after matching, and `true`/`false`
/// become the bool literal kind.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
    #[regex(r"[ \t\r\n]+", logos::skip)]
    Whitespace,

    // `--` runs to end of line
    #[regex(r"--[^\n]*", logos::skip)]
    LineComment,

    // `-*` ... `*-`, no nesting; payload records whether the close was found
    #[regex(r"-\*", scan_block_comment)]
    BlockComment(bool),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    // A digit run glued onto letters, e.g. `32i8`. Flagged, never a token.
    #[regex(r"[0-9][0-9.]*[A-Za-z_][A-Za-z0-9_.]*", priority = 10)]
    MalformedNumber,

    #[regex(r"[0-9]+\.[0-9.]*")]
    Float,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    #[regex(r"'([^'\\]|\\.)*'")]
    Char,

    // Three-character symbols
    #[token(">>=")]
    GreaterGreaterEqual,
    #[token("<<=")]
    LessLessEqual,

    // Two-character symbols
    #[token("::")]
    ColonColon,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token(">>")]
    GreaterGreater,
    #[token("<<")]
    LessLess,
    #[token("&=")]
    AmpEqual,
    #[token("|=")]
    PipeEqual,
    #[token("^=")]
    CaretEqual,
    #[token("%=")]
    PercentEqual,
    #[token("/=")]
    SlashEqual,
    #[token("*=")]
    StarEqual,
    #[token("-=")]
    MinusEqual,
    #[token("+=")]
    PlusEqual,

    // Single-character symbols
    #[token("=")]
    Equal,
    #[token(":")]
    Colon,
    #[token("*")]
    Star,
    #[token("&")]
    Amp,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("@")]
    At,
    #[token(".")]
    Dot,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token(";")]
    Semicolon,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token(",")]
    Comma,
    #[token("~")]
    Tilde,
}

/// Bump the scanner to just past the closing `*-`, or to the end of input.
/// Returns whether the close delimiter was found.
fn scan_block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    let rest = lex.remainder();

    match rest.find("*-") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(rest.len());
            false
        }
    }
}

fn classify(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Word => TokenKind::keyword(slice).unwrap_or(TokenKind::Identifier),
        RawToken::Int => TokenKind::IntLiteral,
        RawToken::Float => TokenKind::FloatLiteral,
        RawToken::Str => TokenKind::StringLiteral,
        RawToken::Char => TokenKind::CharLiteral,
        RawToken::GreaterGreaterEqual => TokenKind::GreaterGreaterEqual,
        RawToken::LessLessEqual => TokenKind::LessLessEqual,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::EqualEqual => TokenKind::EqualEqual,
        RawToken::BangEqual => TokenKind::BangEqual,
        RawToken::LessEqual => TokenKind::LessEqual,
        RawToken::GreaterEqual => TokenKind::GreaterEqual,
        RawToken::GreaterGreater => TokenKind::GreaterGreater,
        RawToken::LessLess => TokenKind::LessLess,
        RawToken::AmpEqual => TokenKind::AmpEqual,
        RawToken::PipeEqual => TokenKind::PipeEqual,
        RawToken::CaretEqual => TokenKind::CaretEqual,
        RawToken::PercentEqual => TokenKind::PercentEqual,
        RawToken::SlashEqual => TokenKind::SlashEqual,
        RawToken::StarEqual => TokenKind::StarEqual,
        RawToken::MinusEqual => TokenKind::MinusEqual,
        RawToken::PlusEqual => TokenKind::PlusEqual,
        RawToken::Equal => TokenKind::Equal,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Star => TokenKind::Star,
        RawToken::Amp => TokenKind::Amp,
        RawToken::OpenBracket => TokenKind::OpenBracket,
        RawToken::CloseBracket => TokenKind::CloseBracket,
        RawToken::At => TokenKind::At,
        RawToken::Dot => TokenKind::Dot,
        RawToken::OpenBrace => TokenKind::OpenBrace,
        RawToken::CloseBrace => TokenKind::CloseBrace,
        RawToken::OpenParen => TokenKind::OpenParen,
        RawToken::CloseParen => TokenKind::CloseParen,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Less => TokenKind::Less,
        RawToken::Greater => TokenKind::Greater,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Whitespace
        | RawToken::LineComment
        | RawToken::BlockComment(_)
        | RawToken::MalformedNumber => {
            unreachable!("trivia and malformed matches are handled before classification")
        }
    }
}

/// Walk `text`, updating the 1-based line and column counters.
fn advance_position(text: &str, line: &mut usize, column: &mut usize) {
    for c in text.chars() {
        if c == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}

/// The lexer. Borrows the source for one run and produces the full token
/// list eagerly.
pub struct Lexer<'src> {
    source: &'src str,
    path: Arc<PathBuf>,
}

impl<'src> Lexer<'src> {
    /// Create a lexer over `source`, which must already be CRLF-normalised.
    pub fn new(source: &'src str, path: impl Into<PathBuf>) -> Self {
        Lexer {
            source,
            path: Arc::new(path.into()),
        }
    }

    /// Lex the whole source. Problems are reported through `sink`; the
    /// returned list contains every token that could be formed.
    pub fn lex(self, sink: &mut dyn DiagnosticSink) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();
        let mut lexer = RawToken::lexer(self.source);

        let mut line = 1usize;
        let mut column = 1usize;
        let mut cursor = 0usize;

        while let Some(result) = lexer.next() {
            let range = lexer.span();

            // catch up over skipped whitespace and comments
            advance_position(&self.source[cursor..range.start], &mut line, &mut column);

            let starting_line = line;
            let starting_column = column;
            let span = |length: usize| {
                Span::new(
                    range.start,
                    starting_line,
                    starting_column,
                    length,
                    Arc::clone(&self.path),
                )
            };

            match result {
                Ok(RawToken::BlockComment(terminated)) => {
                    if !terminated {
                        sink.report(
                            Diagnostic::token(ErrorCode::UnterminatedBlockComment, span(2))
                                .with_note("Did you leave out '*-' to end the comment?"),
                        );
                    }
                }
                Ok(RawToken::MalformedNumber) => {
                    sink.report(
                        Diagnostic::token(ErrorCode::UnexpectedTok, span(range.len()))
                            .with_note("Did you leave out a space?"),
                    );
                }
                Ok(raw) => {
                    let slice = &self.source[range.clone()];
                    tokens.push(Token::new(classify(raw, slice), span(range.len()), slice));
                }
                Err(()) => {
                    let first = self.source[range.start..].chars().next().unwrap_or('\0');

                    if first == '"' || first == '\'' {
                        // An unterminated literal swallows the rest of the file.
                        let code = if first == '"' {
                            ErrorCode::UnterminatedStr
                        } else {
                            ErrorCode::UnterminatedChar
                        };

                        sink.report(Diagnostic::token(
                            code,
                            span(self.source.len() - range.start),
                        ));
                        break;
                    }

                    sink.report(Diagnostic::token(
                        ErrorCode::UnknownChar,
                        span(range.len().max(1)),
                    ));
                }
            }

            advance_position(&self.source[range.clone()], &mut line, &mut column);
            cursor = range.end;
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> (Vec<TokenKind>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let tokens = Lexer::new(source, "test.cas").lex(&mut diagnostics);
        (tokens.iter().map(|t| t.kind()).collect(), diagnostics)
    }

    #[test]
    fn test_empty_source() {
        let (kinds, diagnostics) = lex("");
        assert!(kinds.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_whitespace_and_comments_only() {
        let (kinds, diagnostics) = lex("  \n\t -- a comment\n -* block *- \n");
        assert!(kinds.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_three_char_operators_win() {
        let (kinds, _) = lex(">>= <<= >> <<");
        assert_eq!(
            kinds,
            vec![
                TokenKind::GreaterGreaterEqual,
                TokenKind::LessLessEqual,
                TokenKind::GreaterGreater,
                TokenKind::LessLess,
            ]
        );
    }

    #[test]
    fn test_number_glued_to_identifier() {
        let (kinds, diagnostics) = lex("32i8");
        assert!(kinds.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), ErrorCode::UnexpectedTok);
        assert_eq!(diagnostics[0].note(), Some("Did you leave out a space?"));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let (kinds, diagnostics) = lex("-* never closed");
        assert!(kinds.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), ErrorCode::UnterminatedBlockComment);
        assert_eq!(diagnostics[0].span().length(), 2);
    }

    #[test]
    fn test_unterminated_string_runs_to_eof() {
        let (kinds, diagnostics) = lex("const \"abc");
        assert_eq!(kinds, vec![TokenKind::Const]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), ErrorCode::UnterminatedStr);
        assert_eq!(diagnostics[0].span().position(), 6);
        assert_eq!(diagnostics[0].span().length(), 4);
    }

    #[test]
    fn test_unknown_char() {
        let (kinds, diagnostics) = lex("a $ b");
        assert_eq!(kinds, vec![TokenKind::Identifier, TokenKind::Identifier]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), ErrorCode::UnknownChar);
    }

    #[test]
    fn test_spans_track_lines() {
        let mut diagnostics = Vec::new();
        let tokens = Lexer::new("let x\n  = 1;", "test.cas").lex(&mut diagnostics);

        assert_eq!(tokens[0].span().line(), 1);
        assert_eq!(tokens[0].span().column(), 1);
        assert_eq!(tokens[1].span().column(), 5);
        assert_eq!(tokens[2].span().line(), 2);
        assert_eq!(tokens[2].span().column(), 3);
        assert_eq!(tokens[3].raw(), "1");
        assert_eq!(tokens[3].span().position(), 10);
    }
}
