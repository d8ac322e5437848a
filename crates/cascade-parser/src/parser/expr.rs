//! Expression parsing.
//!
//! The precedence ladder runs, lowest to highest binding: assignment →
//! if-then → logical or → logical xor → logical and → logical not →
//! equality → relational → bitwise or → bitwise xor → bitwise and →
//! bitshift → addition → multiplication → unary → call/index/field →
//! primary. Binary levels are left-associative; assignment, if-then, and the
//! unary levels are right-associative.

use super::{recovery, stmt, ParseResult, Parser, Recovery};
use crate::ast::*;
use crate::diag::ErrorCode;
use crate::span::Span;
use crate::token::{Token, TokenKind};

type Level<'src, 'diag> = fn(&mut Parser<'src, 'diag>) -> ParseResult<Expression>;

/// Parse one expression at the lowest precedence.
pub(crate) fn parse_expression<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
) -> ParseResult<Expression> {
    parse_assignment(parser)
}

fn binary_op(kind: TokenKind) -> BinaryOp {
    match BinaryOp::from_token(kind) {
        Some(op) => op,
        None => unreachable!("token {kind:?} is not a binary operator"),
    }
}

fn unary_op(kind: TokenKind) -> UnaryOp {
    match UnaryOp::from_token(kind) {
        Some(op) => op,
        None => unreachable!("token {kind:?} is not a unary operator"),
    }
}

fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Expression {
    let span = Span::merge(lhs.span(), rhs.span());

    Expression::Binary(BinaryExpr {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span,
    })
}

/// Template for a left-associative binary level: parse `higher`, then fold
/// while the current token is one of `kinds`.
fn parse_binary<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
    higher: Level<'src, 'diag>,
    kinds: &[TokenKind],
) -> ParseResult<Expression> {
    let mut lhs = higher(parser)?;

    while let Some(kind) = parser.peek_kind() {
        if !kinds.contains(&kind) {
            break;
        }

        parser.advance();
        let rhs = higher(parser)?;
        lhs = binary(binary_op(kind), lhs, rhs);
    }

    Ok(lhs)
}

/// Template for a right-associative unary level: if the current token is one
/// of `kinds`, consume it and recurse into `current`; otherwise delegate to
/// `higher`.
fn parse_unary_level<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
    current: Level<'src, 'diag>,
    higher: Level<'src, 'diag>,
    kinds: &[TokenKind],
) -> ParseResult<Expression> {
    if let Some(kind) = parser.peek_kind() {
        if kinds.contains(&kind) {
            let op_span = parser.advance().span().clone();
            let operand = current(parser)?;
            let span = Span::merge(&op_span, operand.span());

            return Ok(Expression::Unary(UnaryExpr {
                op: unary_op(kind),
                operand: Box::new(operand),
                span,
            }));
        }
    }

    higher(parser)
}

// ── the ladder ──────────────────────────────────────────────────────────

fn parse_assignment<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    let lhs = parse_if_then(parser)?;

    if let Some(kind) = parser.peek_kind() {
        if kind.is_assignment() {
            parser.advance();
            let rhs = parse_assignment(parser)?;
            return Ok(binary(binary_op(kind), lhs, rhs));
        }
    }

    Ok(lhs)
}

fn parse_if_then<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    if parser.check(TokenKind::If) {
        return parse_if(parser);
    }

    parse_logical_or(parser)
}

fn parse_logical_or<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(parser, parse_logical_xor, &[TokenKind::Or])
}

fn parse_logical_xor<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(parser, parse_logical_and, &[TokenKind::Xor])
}

fn parse_logical_and<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(parser, parse_logical_not, &[TokenKind::And])
}

fn parse_logical_not<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_unary_level(parser, parse_logical_not, parse_equality, &[TokenKind::Not])
}

fn parse_equality<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(
        parser,
        parse_relational,
        &[TokenKind::EqualEqual, TokenKind::BangEqual],
    )
}

fn parse_relational<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(
        parser,
        parse_bitwise_or,
        &[
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ],
    )
}

fn parse_bitwise_or<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(parser, parse_bitwise_xor, &[TokenKind::Pipe])
}

fn parse_bitwise_xor<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(parser, parse_bitwise_and, &[TokenKind::Caret])
}

fn parse_bitwise_and<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(parser, parse_bitshift, &[TokenKind::Amp])
}

fn parse_bitshift<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(
        parser,
        parse_addition,
        &[TokenKind::LessLess, TokenKind::GreaterGreater],
    )
}

fn parse_addition<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(
        parser,
        parse_multiplication,
        &[TokenKind::Plus, TokenKind::Minus],
    )
}

fn parse_multiplication<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_binary(
        parser,
        parse_unary,
        &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
    )
}

fn parse_unary<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    parse_unary_level(
        parser,
        parse_unary,
        parse_call,
        &[
            TokenKind::Tilde,
            TokenKind::Star,
            TokenKind::Amp,
            TokenKind::At,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Clone,
        ],
    )
}

/// The call/index/field suffix loop.
fn parse_call<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    let mut expr = parse_primary(parser)?;

    loop {
        match parser.peek_kind() {
            Some(TokenKind::OpenParen) => {
                parser.advance();
                let mut args = Vec::new();

                while !parser.check(TokenKind::CloseParen) {
                    args.push(parse_expression(parser)?);

                    if !parser.check(TokenKind::CloseParen) {
                        parser.expect(TokenKind::Comma, ErrorCode::ExpectedComma)?;
                    }
                }

                let close = parser.expect(TokenKind::CloseParen, ErrorCode::UnclosedParen)?;
                let span = Span::merge(expr.span(), close.span());

                expr = Expression::Call(CallExpr {
                    callee: Box::new(expr),
                    args,
                    span,
                });
            }
            Some(TokenKind::OpenBracket) => {
                parser.advance();
                let index = parse_expression(parser)?;
                let close =
                    parser.expect(TokenKind::CloseBracket, ErrorCode::ExpectedClosingBracket)?;
                let span = Span::merge(expr.span(), close.span());

                expr = Expression::Index(IndexExpr {
                    base: Box::new(expr),
                    index: Box::new(index),
                    span,
                });
            }
            Some(TokenKind::Dot) => {
                parser.advance();
                let field = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
                let span = Span::merge(expr.span(), field.span());

                expr = Expression::FieldAccess(FieldAccessExpr {
                    base: Box::new(expr),
                    field: field.raw().to_string(),
                    span,
                });
            }
            _ => break,
        }
    }

    Ok(expr)
}

// ── primaries ───────────────────────────────────────────────────────────

fn parse_primary<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    let token = parser.current()?;

    match token.kind() {
        TokenKind::IntLiteral => {
            parser.advance();
            Ok(int_literal(parser, &token))
        }
        TokenKind::FloatLiteral => {
            parser.advance();
            Ok(float_literal(parser, &token))
        }
        TokenKind::CharLiteral => {
            parser.advance();
            Ok(char_literal(parser, &token))
        }
        TokenKind::StringLiteral => {
            parser.advance();
            let contents = &token.raw()[1..token.raw().len() - 1];

            Ok(Expression::Literal(Literal {
                value: LiteralValue::String(unescape(contents)),
                span: token.span().clone(),
            }))
        }
        TokenKind::BoolLiteral => {
            parser.advance();

            Ok(Expression::Literal(Literal {
                value: LiteralValue::Bool(token.raw() == "true"),
                span: token.span().clone(),
            }))
        }
        TokenKind::Identifier => {
            if starts_struct_init(parser) {
                return parse_struct_init(parser);
            }

            parser.advance();

            Ok(Expression::Identifier(Identifier {
                name: token.raw().to_string(),
                span: token.span().clone(),
            }))
        }
        TokenKind::OpenParen => {
            parser.advance();
            let inner = parse_expression(parser)?;
            parser.expect(TokenKind::CloseParen, ErrorCode::UnclosedParen)?;
            Ok(inner)
        }
        TokenKind::OpenBrace => parse_block(parser),
        TokenKind::OpenBracket => parse_array_init(parser),
        _ => {
            let span = token.span().clone();
            Err(parser.error(ErrorCode::ExpectedExpression, span))
        }
    }
}

fn int_literal(parser: &mut Parser, token: &Token) -> Expression {
    let value = match token.raw().parse::<i32>() {
        Ok(value) => value,
        Err(_) => {
            parser.error(ErrorCode::NumberLiteralTooLarge, token.span().clone());
            0
        }
    };

    Expression::Literal(Literal {
        value: LiteralValue::Int(value),
        span: token.span().clone(),
    })
}

fn float_literal(parser: &mut Parser, token: &Token) -> Expression {
    // a lexeme like `1.2.3` parses up to the second dot
    let raw = token.raw();
    let mut seen_dot = false;
    let end = raw
        .find(|c: char| {
            if c == '.' {
                if seen_dot {
                    return true;
                }
                seen_dot = true;
            }
            false
        })
        .unwrap_or(raw.len());

    let wide = raw[..end].parse::<f64>().unwrap_or(f64::INFINITY);

    let value = if wide.is_infinite() || (wide as f32).is_infinite() {
        parser.error(ErrorCode::NumberLiteralTooLarge, token.span().clone());
        0.0
    } else {
        wide
    };

    Expression::Literal(Literal {
        value: LiteralValue::Float(value),
        span: token.span().clone(),
    })
}

fn char_literal(parser: &mut Parser, token: &Token) -> Expression {
    let contents = unescape(&token.raw()[1..token.raw().len() - 1]);
    let mut chars = contents.chars();
    let first = chars.next();

    let value = match (first, chars.next()) {
        (Some(c), None) => c,
        _ => {
            parser.error(ErrorCode::InvalidCharLiteral, token.span().clone());
            first.unwrap_or('\0')
        }
    };

    Expression::Literal(Literal {
        value: LiteralValue::Char(value),
        span: token.span().clone(),
    })
}

fn unescape(contents: &str) -> String {
    let mut out = String::with_capacity(contents.len());
    let mut chars = contents.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => break,
        }
    }

    out
}

/// `if c then a else b`, or the block form with optional `else` / `else if`.
pub(crate) fn parse_if<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    let if_span = parser
        .expect(TokenKind::If, ErrorCode::ExpectedExpression)?
        .span()
        .clone();
    let condition = parse_expression(parser)?;

    if parser.eat(TokenKind::Then).is_some() {
        let then_branch = parse_expression(parser)?;
        parser.expect(TokenKind::Else, ErrorCode::ExpectedElseAfterThen)?;
        let else_branch = parse_expression(parser)?;
        let span = Span::merge(&if_span, else_branch.span());

        return Ok(Expression::IfElse(IfElseExpr {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Some(Box::new(else_branch)),
            span,
        }));
    }

    let then_branch = parse_block(parser)?;

    let else_branch = if parser.eat(TokenKind::Else).is_some() {
        let branch = if parser.check(TokenKind::If) {
            parse_if(parser)?
        } else {
            parse_block(parser)?
        };

        Some(Box::new(branch))
    } else {
        None
    };

    let end_span = match &else_branch {
        Some(branch) => branch.span().clone(),
        None => then_branch.span().clone(),
    };
    let span = Span::merge(&if_span, &end_span);

    Ok(Expression::IfElse(IfElseExpr {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch,
        span,
    }))
}

/// A `{ ... }` block expression. The trailing expression without a semicolon
/// becomes the block's value; otherwise the block is void.
pub(crate) fn parse_block<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
) -> ParseResult<Expression> {
    let open_span = parser
        .expect(TokenKind::OpenBrace, ErrorCode::ExpectedOpeningBrace)?
        .span()
        .clone();

    let mut statements = Vec::new();
    let mut tail = None;

    let close_span = loop {
        let before = parser.pos;

        match parser.peek_kind() {
            None => return Err(parser.error(ErrorCode::UnmatchedBrace, open_span)),
            Some(TokenKind::CloseBrace) => break parser.advance().span().clone(),
            Some(kind) if stmt::starts_statement(kind) => {
                match stmt::parse_statement(parser) {
                    Ok(statement) => statements.push(statement),
                    Err(Recovery) => recovery::synchronize(parser),
                }
            }
            Some(_) => match parse_expression(parser) {
                Ok(expression) => {
                    if parser.check(TokenKind::Semicolon) {
                        let semi_span = parser.advance().span().clone();
                        let span = Span::merge(expression.span(), &semi_span);
                        statements.push(Statement::Expression(ExpressionStatement {
                            expression,
                            span,
                        }));
                    } else if parser.check(TokenKind::CloseBrace) {
                        tail = Some(Box::new(expression));
                    } else {
                        let span = parser.span_here();
                        parser.error(ErrorCode::ExpectedSemi, span);
                        recovery::synchronize(parser);
                    }
                }
                Err(Recovery) => recovery::synchronize(parser),
            },
        }

        if parser.pos == before && !parser.at_end() && !parser.check(TokenKind::CloseBrace) {
            parser.advance();
        }
    };

    let ty = if tail.is_some() {
        Type::Implied(close_span.clone())
    } else {
        Type::Void(close_span.clone())
    };
    let span = Span::merge(&open_span, &close_span);

    Ok(Expression::Block(BlockExpr {
        statements,
        tail,
        ty,
        span,
    }))
}

fn parse_array_init<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    let open_span = parser.advance().span().clone();
    let mut elements = Vec::new();

    while !parser.check(TokenKind::CloseBracket) {
        elements.push(parse_expression(parser)?);

        if !parser.check(TokenKind::CloseBracket) {
            parser.expect(TokenKind::Comma, ErrorCode::ExpectedComma)?;
        }
    }

    let close = parser.expect(TokenKind::CloseBracket, ErrorCode::ExpectedClosingBracket)?;
    let span = Span::merge(&open_span, close.span());

    Ok(Expression::ArrayInit(ArrayInitExpr { elements, span }))
}

/// A struct initialiser starts `Name { field :`. The full four-token
/// lookahead keeps `if x { ... }` and `while x { }` parsing as a condition
/// followed by a block.
fn starts_struct_init(parser: &Parser) -> bool {
    parser.peek_kind_at(1) == Some(TokenKind::OpenBrace)
        && parser.peek_kind_at(2) == Some(TokenKind::Identifier)
        && parser.peek_kind_at(3) == Some(TokenKind::Colon)
}

fn parse_struct_init<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Expression> {
    let name = parser.advance();
    parser.advance(); // {

    let mut fields = Vec::new();

    let close_span = loop {
        if let Some(close) = parser.eat(TokenKind::CloseBrace) {
            break close.span().clone();
        }

        let field = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
        parser.expect(TokenKind::Colon, ErrorCode::UnexpectedTok)?;
        let value = parse_expression(parser)?;
        let span = Span::merge(field.span(), value.span());

        fields.push(FieldInit {
            name: field.raw().to_string(),
            value,
            span,
        });

        if !parser.check(TokenKind::CloseBrace) {
            parser.expect(TokenKind::Comma, ErrorCode::ExpectedComma)?;
        }
    };

    let span = Span::merge(name.span(), &close_span);

    Ok(Expression::StructInit(StructInitExpr {
        name: name.raw().to_string(),
        fields,
        span,
    }))
}
