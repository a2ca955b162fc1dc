use crate::{
    ast::{
        ast::Identifier,
        expressions::{BinaryOperator, Call, Expr, ExprKind, TunnelCall, TunnelMethod},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };

        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    let kind = match token.kind {
        TokenKind::Number => match token.value.parse() {
            Ok(value) => ExprKind::Int(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::String => ExprKind::String(token.value),
        TokenKind::True => ExprKind::Bool(true),
        TokenKind::False => ExprKind::Bool(false),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(Expr::new(kind, token.span))
}

fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Dash => Some(BinaryOperator::Subtract),
        TokenKind::Star => Some(BinaryOperator::Multiply),
        TokenKind::Slash => Some(BinaryOperator::Divide),
        TokenKind::Percent => Some(BinaryOperator::Modulo),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::Equals => Some(BinaryOperator::Equal),
        _ => None,
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let Some(operator) = binary_operator(parser.current_token_kind()) else {
        return Err(parser.unexpected());
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    let span = Span {
        start: left.span.start.clone(),
        end: right.span.end.clone(),
    };

    Ok(Expr::new(
        ExprKind::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    ))
}

pub fn parse_not_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = Span {
        start,
        end: operand.span.end.clone(),
    };
    Ok(Expr::new(ExprKind::Not(Box::new(operand)), span))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_read_int_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;
    parser.expect_detailed(TokenKind::CloseParen, "readInt takes no arguments")?;

    Ok(Expr::new(ExprKind::ReadInt, parser.span_from(start)))
}

/// `open(e | x, y)`
pub fn parse_open_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;

    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect_detailed(TokenKind::Pipe, "expected `|` before the variables to open")?;

    let mut ids = vec![parse_identifier(parser)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        ids.push(parse_identifier(parser)?);
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::new(
        ExprKind::Open {
            expr: Box::new(expr),
            ids,
        },
        parser.span_from(start),
    ))
}

pub fn parse_identifier(parser: &mut Parser) -> Result<Identifier, Error> {
    let token = parser.expect_detailed(TokenKind::Identifier, "expected an identifier")?;
    Ok(Identifier::new(&token.value, token.span))
}

fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect_detailed(TokenKind::Comma, "expected `,` between arguments")?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(arguments)
}

/// Identifier-led expressions.
///
/// - `x` is a symbol
/// - `f(args)` is a call
/// - `x.put(e)`, `x.get()`, `x.take()` are tunnel operations
/// - `x.f(args)` is a method invocation
/// - `c.t.op(args)` is a remote tunnel operation
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let first = parse_identifier(parser)?;
    let start = first.span.start.clone();

    match parser.current_token_kind() {
        TokenKind::OpenParen => {
            let arguments = parse_arguments(parser)?;
            let span = parser.span_from(start);
            Ok(Expr::new(
                ExprKind::Call(Call {
                    name: first,
                    arguments,
                    span: span.clone(),
                }),
                span,
            ))
        }
        TokenKind::Dot => {
            parser.advance();
            let second = parse_identifier(parser)?;

            if parser.current_token_kind() == TokenKind::Dot {
                parser.advance();
                let op = parse_identifier(parser)?;
                let tunnel_start = second.span.start.clone();
                let arguments = parse_arguments(parser)?;
                let Some(method) = tunnel_method(&op, arguments) else {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedTokenDetailed {
                            token: op.name,
                            message: String::from("a remote tunnel supports put(e), get() and take()"),
                        },
                        op.span.start,
                    ));
                };

                let call = TunnelCall {
                    tunnel: second,
                    method,
                    span: parser.span_from(tunnel_start),
                };
                return Ok(Expr::new(
                    ExprKind::RemoteTunnel { client: first, call },
                    parser.span_from(start),
                ));
            }

            let call_start = second.span.start.clone();
            let arguments = parse_arguments(parser)?;

            if TunnelMethod::is_method_name(&second.name) {
                let name = second.name.clone();
                let Some(method) = tunnel_method(&second, arguments) else {
                    return Err(Error::new(
                        ErrorImpl::UnexpectedTokenDetailed {
                            token: name,
                            message: String::from("put takes one argument, get and take none"),
                        },
                        second.span.start,
                    ));
                };

                let span = parser.span_from(start);
                return Ok(Expr::new(
                    ExprKind::Tunnel(TunnelCall {
                        tunnel: first,
                        method,
                        span: span.clone(),
                    }),
                    span,
                ));
            }

            let call = Call {
                name: second,
                arguments,
                span: parser.span_from(call_start),
            };
            Ok(Expr::new(
                ExprKind::MethodInvocation { target: first, call },
                parser.span_from(start),
            ))
        }
        _ => {
            let span = first.span.clone();
            Ok(Expr::new(ExprKind::Symbol(first.name), span))
        }
    }
}

fn tunnel_method(op: &Identifier, mut arguments: Vec<Expr>) -> Option<TunnelMethod> {
    match (op.name.as_str(), arguments.len()) {
        ("put", 1) => arguments.pop().map(|value| TunnelMethod::Put(Box::new(value))),
        ("get", 0) => Some(TunnelMethod::Get),
        ("take", 0) => Some(TunnelMethod::Take),
        _ => None,
    }
}
