//! Statement parsing.

use super::{expr, types, ParseResult, Parser};
use crate::ast::*;
use crate::diag::ErrorCode;
use crate::span::Span;
use crate::token::TokenKind;

/// Whether `kind` begins a statement that isn't a bare expression.
pub(crate) fn starts_statement(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Let
            | TokenKind::Mut
            | TokenKind::Ret
            | TokenKind::Loop
            | TokenKind::While
            | TokenKind::For
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Assert
    )
}

/// Parse one statement.
pub(crate) fn parse_statement<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
) -> ParseResult<Statement> {
    match parser.peek_kind() {
        Some(TokenKind::Let) => parse_binding(parser, false),
        Some(TokenKind::Mut) => parse_binding(parser, true),
        Some(TokenKind::Ret) => parse_ret(parser),
        Some(TokenKind::Loop) => parse_loop(parser),
        Some(TokenKind::While) => parse_while(parser),
        Some(TokenKind::For) => parse_for(parser),
        Some(TokenKind::Break) => {
            let kw = parser.advance();
            let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;
            Ok(Statement::Break(Span::merge(kw.span(), semi.span())))
        }
        Some(TokenKind::Continue) => {
            let kw = parser.advance();
            let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;
            Ok(Statement::Continue(Span::merge(kw.span(), semi.span())))
        }
        Some(TokenKind::Assert) => parse_assert(parser),
        Some(_) => {
            let expression = expr::parse_expression(parser)?;
            let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;
            let span = Span::merge(expression.span(), semi.span());
            Ok(Statement::Expression(ExpressionStatement { expression, span }))
        }
        None => Err(parser.end_of_input()),
    }
}

/// `let`/`mut` local binding: `let name [: type] = init;`
fn parse_binding<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
    mutable: bool,
) -> ParseResult<Statement> {
    let kw = parser.advance();
    let name = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;

    if is_reserved_type_name(name.raw()) {
        let span = name.span().clone();
        parser.error(ErrorCode::UnexpectedBuiltin, span);
    }

    let ty = if parser.eat(TokenKind::Colon).is_some() {
        types::parse_type(parser)?
    } else {
        Type::Implied(name.span().clone())
    };

    parser.expect(TokenKind::Equal, ErrorCode::UnexpectedTok)?;
    let initializer = expr::parse_expression(parser)?;
    let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;
    let span = Span::merge(kw.span(), semi.span());
    let name = name.raw().to_string();

    Ok(if mutable {
        Statement::Mut(MutStatement {
            name,
            ty,
            initializer,
            span,
        })
    } else {
        Statement::Let(LetStatement {
            name,
            ty,
            initializer,
            span,
        })
    })
}

fn parse_ret<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Statement> {
    let kw = parser.advance();

    let value = if parser.check(TokenKind::Semicolon) {
        None
    } else {
        Some(expr::parse_expression(parser)?)
    };

    let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;

    Ok(Statement::Ret(RetStatement {
        value,
        span: Span::merge(kw.span(), semi.span()),
    }))
}

fn parse_loop<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Statement> {
    let kw = parser.advance();
    let body = expr::parse_block(parser)?;
    let span = Span::merge(kw.span(), body.span());

    Ok(Statement::Loop(LoopStatement {
        kind: LoopKind::Forever,
        body,
        span,
    }))
}

fn parse_while<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Statement> {
    let kw = parser.advance();
    let condition = expr::parse_expression(parser)?;
    let body = expr::parse_block(parser)?;
    let span = Span::merge(kw.span(), body.span());

    Ok(Statement::Loop(LoopStatement {
        kind: LoopKind::While(condition),
        body,
        span,
    }))
}

fn parse_for<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Statement> {
    let kw = parser.advance();
    let binding = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
    parser.expect(TokenKind::In, ErrorCode::UnexpectedTok)?;
    let iterable = expr::parse_expression(parser)?;
    let body = expr::parse_block(parser)?;
    let span = Span::merge(kw.span(), body.span());

    Ok(Statement::Loop(LoopStatement {
        kind: LoopKind::ForIn {
            binding: binding.raw().to_string(),
            iterable,
        },
        body,
        span,
    }))
}

fn parse_assert<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Statement> {
    let kw = parser.advance();
    let condition = expr::parse_expression(parser)?;
    let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;

    Ok(Statement::Assert(AssertStatement {
        condition,
        span: Span::merge(kw.span(), semi.span()),
    }))
}
