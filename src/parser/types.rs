//! Type parsing.
//!
//! SMCL has no user-defined types, so a type annotation is exactly one of
//! the built-in type keywords.

use crate::{ast::types::SmclType, errors::errors::Error, lexer::tokens::TokenKind};

use super::parser::Parser;

pub fn parse_type(parser: &mut Parser) -> Result<SmclType, Error> {
    let ty = match parser.current_token_kind() {
        TokenKind::Int => SmclType::Int,
        TokenKind::Sint => SmclType::Sint,
        TokenKind::Bool => SmclType::Bool,
        TokenKind::Sbool => SmclType::Sbool,
        TokenKind::StringType => SmclType::String,
        TokenKind::Void => SmclType::Void,
        TokenKind::Client => SmclType::Client,
        TokenKind::Sclient => SmclType::Sclient,
        _ => return Err(parser.unexpected_detailed("expected a type")),
    };

    parser.advance();
    Ok(ty)
}
