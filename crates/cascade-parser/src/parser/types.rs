//! Type annotation parsing.
//!
//! `type := [& | &mut] (* | *mut | "[" [int] "]")* base`. A reference may
//! only appear once, at the front; the base is a builtin word or a
//! user-defined name.

use super::{ParseResult, Parser};
use crate::ast::*;
use crate::diag::ErrorCode;
use crate::span::Span;
use crate::token::TokenKind;

/// Parse one type annotation.
pub(crate) fn parse_type<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Type> {
    if parser.check(TokenKind::Amp) {
        let amp = parser.advance();
        let mutable = parser.eat(TokenKind::Mut).is_some();
        let referent = parse_unreferenced(parser)?;
        let span = Span::merge(amp.span(), referent.span());

        return Ok(Type::Reference(ReferenceType {
            mutable,
            referent: Box::new(referent),
            span,
        }));
    }

    parse_unreferenced(parser)
}

/// Everything after the optional leading reference. A second `&` lands in
/// the failure arm, which is what forbids nested references.
fn parse_unreferenced<'src, 'diag>(parser: &mut Parser<'src, 'diag>) -> ParseResult<Type> {
    match parser.peek_kind() {
        Some(TokenKind::Star) => {
            let star = parser.advance();
            let mutable = parser.eat(TokenKind::Mut).is_some();
            let pointee = parse_unreferenced(parser)?;
            let span = Span::merge(star.span(), pointee.span());

            Ok(Type::Pointer(PointerType {
                mutable,
                pointee: Box::new(pointee),
                span,
            }))
        }
        Some(TokenKind::OpenBracket) => {
            let open = parser.advance();

            let length = match parser.eat(TokenKind::IntLiteral) {
                Some(token) => match token.raw().parse::<u32>() {
                    Ok(length) => Some(length),
                    Err(_) => {
                        let span = token.span().clone();
                        parser.error(ErrorCode::NumberLiteralTooLarge, span);
                        None
                    }
                },
                None => None,
            };

            parser.expect(TokenKind::CloseBracket, ErrorCode::ExpectedClosingBracket)?;
            let element = parse_unreferenced(parser)?;
            let span = Span::merge(open.span(), element.span());

            Ok(Type::Array(ArrayType {
                element: Box::new(element),
                length,
                span,
            }))
        }
        Some(TokenKind::Identifier) => {
            let token = parser.advance();
            let span = token.span().clone();

            match Builtin::from_name(token.raw()) {
                Some(builtin) => Ok(Type::Builtin(BuiltinType { builtin, span })),
                None => Ok(Type::UserDefined(UserDefinedType {
                    name: token.raw().to_string(),
                    span,
                })),
            }
        }
        Some(_) => {
            let span = parser.span_here();
            Err(parser.error(ErrorCode::ExpectedType, span))
        }
        None => Err(parser.end_of_input()),
    }
}
