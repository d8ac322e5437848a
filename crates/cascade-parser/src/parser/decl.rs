//! Declaration parsing.
//!
//! Top-level constructs are dispatched on their leading keyword: `const`,
//! `static`, `fn`, `module`, `import`, `from`, `export`, `type`, `struct`.

use super::{expr, types, ParseResult, Parser};
use crate::ast::*;
use crate::diag::ErrorCode;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parse one top-level declaration. Returns `Ok(None)` when a construct was
/// consumed but produces no node, e.g. a duplicate module declaration.
pub(crate) fn parse_declaration<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
) -> ParseResult<Option<Declaration>> {
    match parser.peek_kind() {
        Some(TokenKind::Const) => Ok(Some(parse_const_static(parser, false)?)),
        Some(TokenKind::Static) => Ok(Some(parse_const_static(parser, true)?)),
        Some(TokenKind::Fn) => Ok(Some(parse_fn(parser)?)),
        Some(TokenKind::Module) => parse_module(parser),
        Some(TokenKind::Import) => Ok(Some(parse_import(parser)?)),
        Some(TokenKind::From) => Ok(Some(parse_from_import(parser)?)),
        Some(TokenKind::Export) => parse_export(parser),
        Some(TokenKind::Type) => Ok(Some(parse_type_alias(parser)?)),
        Some(TokenKind::Struct) => Ok(Some(parse_struct(parser)?)),
        Some(_) => {
            let span = parser.span_here();
            Err(parser.error(ErrorCode::ExpectedDeclaration, span))
        }
        None => Err(parser.end_of_input()),
    }
}

/// Consume a declaration name, flagging reserved builtin-type words.
fn expect_name<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Token<'src>> {
    let name = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;

    if is_reserved_type_name(name.raw()) {
        let span = name.span().clone();
        parser.error(ErrorCode::UnexpectedBuiltin, span);
    }

    Ok(name)
}

/// `const`/`static` declaration: `const name [: type] = init;`
fn parse_const_static<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
    is_static: bool,
) -> ParseResult<Declaration> {
    let kw = parser.advance();
    let name = expect_name(parser)?;

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

    Ok(if is_static {
        Declaration::Static(StaticDecl {
            name,
            ty,
            initializer,
            span,
        })
    } else {
        Declaration::Const(ConstDecl {
            name,
            ty,
            initializer,
            span,
        })
    })
}

/// `fn name(arg: type, ...) [[:] type] { ... }`
///
/// The return type may be introduced with a colon or written bare after the
/// parameter list; when absent it defaults to void.
fn parse_fn<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Declaration> {
    let kw = parser.advance();
    let name = expect_name(parser)?;
    parser.expect(TokenKind::OpenParen, ErrorCode::UnexpectedTok)?;

    let mut args = Vec::new();

    while !parser.check(TokenKind::CloseParen) {
        let arg_name = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
        parser.expect(TokenKind::Colon, ErrorCode::ExpectedType)?;
        let ty = types::parse_type(parser)?;
        let span = Span::merge(arg_name.span(), ty.span());

        args.push(Argument {
            name: arg_name.raw().to_string(),
            ty,
            span,
        });

        if !parser.check(TokenKind::CloseParen) {
            parser.expect(TokenKind::Comma, ErrorCode::ExpectedComma)?;
        }
    }

    let close = parser.expect(TokenKind::CloseParen, ErrorCode::UnclosedParen)?;

    parser.eat(TokenKind::Colon);
    let return_type = if parser.check(TokenKind::OpenBrace) {
        Type::Void(close.span().clone())
    } else {
        types::parse_type(parser)?
    };

    let body = expr::parse_block(parser)?;
    let span = Span::merge(kw.span(), body.span());

    Ok(Declaration::Fn(FnDecl {
        name: name.raw().to_string(),
        args,
        return_type,
        body,
        span,
    }))
}

/// `module a::b::c;`; only one is allowed per file.
fn parse_module<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
) -> ParseResult<Option<Declaration>> {
    let kw = parser.advance();
    let name = parse_path(parser)?;
    let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;
    let span = Span::merge(kw.span(), semi.span());

    if parser.mark_module_seen() {
        parser.error(ErrorCode::DuplicateModule, span);
        return Ok(None);
    }

    Ok(Some(Declaration::Module(ModuleDecl { name, span })))
}

/// `import a::b [as alias];`
fn parse_import<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Declaration> {
    let kw = parser.advance();
    let path = parse_path(parser)?;

    let alias = if parser.eat(TokenKind::As).is_some() {
        let alias = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
        Some(alias.raw().to_string())
    } else {
        None
    };

    let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;

    Ok(Declaration::Import(ImportDecl {
        path,
        items: Vec::new(),
        alias,
        span: Span::merge(kw.span(), semi.span()),
    }))
}

/// `from a::b import x, y, z;`
fn parse_from_import<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Declaration> {
    let kw = parser.advance();
    let path = parse_path(parser)?;
    parser.expect(TokenKind::Import, ErrorCode::UnexpectedTok)?;

    let mut items = Vec::new();
    let first = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
    items.push(first.raw().to_string());

    while parser.eat(TokenKind::Comma).is_some() {
        if parser.check(TokenKind::Semicolon) {
            break;
        }

        let item = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
        items.push(item.raw().to_string());
    }

    let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;

    Ok(Declaration::Import(ImportDecl {
        path,
        items,
        alias: None,
        span: Span::merge(kw.span(), semi.span()),
    }))
}

/// `export <declaration>`. A nested `export export` is rejected.
fn parse_export<'src, 'diag>(
    parser: &mut Parser<'src, 'diag>,
) -> ParseResult<Option<Declaration>> {
    let kw = parser.advance();

    if parser.check(TokenKind::Export) {
        let span = parser.span_here();
        return Err(parser.error(ErrorCode::CannotExportExport, span));
    }

    match parse_declaration(parser)? {
        Some(inner) => {
            let span = Span::merge(kw.span(), inner.span());

            Ok(Some(Declaration::Export(ExportDecl {
                inner: Box::new(inner),
                span,
            })))
        }
        None => Ok(None),
    }
}

/// `type Name = type;`
fn parse_type_alias<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Declaration> {
    let kw = parser.advance();
    let name = expect_name(parser)?;
    parser.expect(TokenKind::Equal, ErrorCode::UnexpectedTok)?;
    let aliased = types::parse_type(parser)?;
    let semi = parser.expect(TokenKind::Semicolon, ErrorCode::ExpectedSemi)?;

    Ok(Declaration::TypeAlias(TypeAliasDecl {
        name: name.raw().to_string(),
        aliased,
        span: Span::merge(kw.span(), semi.span()),
    }))
}

/// `struct Name { field: type, ... }`
fn parse_struct<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Declaration> {
    let kw = parser.advance();
    let name = expect_name(parser)?;
    parser.expect(TokenKind::OpenBrace, ErrorCode::ExpectedOpeningBrace)?;

    let mut fields = Vec::new();

    let close_span = loop {
        if let Some(close) = parser.eat(TokenKind::CloseBrace) {
            break close.span().clone();
        }

        let field = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
        parser.expect(TokenKind::Colon, ErrorCode::ExpectedType)?;
        let ty = types::parse_type(parser)?;
        let span = Span::merge(field.span(), ty.span());

        fields.push(StructField {
            name: field.raw().to_string(),
            ty,
            span,
        });

        if !parser.check(TokenKind::CloseBrace) {
            parser.expect(TokenKind::Comma, ErrorCode::ExpectedComma)?;
        }
    };

    parser.eat(TokenKind::Semicolon);
    let span = Span::merge(kw.span(), &close_span);

    Ok(Declaration::Struct(StructDecl {
        name: name.raw().to_string(),
        fields,
        span,
    }))
}

/// A `::`-separated identifier chain, joined into one name.
fn parse_path<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<String> {
    let first = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
    let mut name = first.raw().to_string();

    while parser.eat(TokenKind::ColonColon).is_some() {
        let part = parser.expect(TokenKind::Identifier, ErrorCode::ExpectedIdentifier)?;
        name.push_str("::");
        name.push_str(part.raw());
    }

    Ok(name)
}
