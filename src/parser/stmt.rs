use crate::{
    ast::{
        ast::{Client, Function, Group, Server, Tunnel, Typed},
        expressions::Expr,
        statements::{Assignment, Stmt, StmtKind},
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::{parse_expr, parse_identifier}, lookups::BindingPower},
    Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(stmt_fn) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return stmt_fn(parser);
    }

    parse_expression_stmt(parser)
}

fn parse_expression_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Expression(expr), parser.span_from(start)))
}

/// `type name`
pub fn parse_typed(parser: &mut Parser) -> Result<Typed, Error> {
    let start = parser.get_position();
    let ty = parse_type(parser)?;
    let name = parse_identifier(parser)?;

    Ok(Typed {
        ty,
        name,
        span: parser.span_from(start),
    })
}

pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let typed = parse_typed(parser)?;

    let assignment = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;
        Some(Assignment {
            target: typed.name.clone(),
            span: Span {
                start: typed.name.span.start.clone(),
                end: value.span.end.clone(),
            },
            value,
        })
    } else {
        None
    };

    parser.expect_detailed(TokenKind::Semicolon, "expected `;` after the declaration")?;

    Ok(Stmt::new(
        StmtKind::Declaration { typed, assignment },
        parser.span_from(start),
    ))
}

/// `x = e;` or an expression statement starting with an identifier.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if parser.peek_kind(1) != TokenKind::Assignment {
        return parse_expression_stmt(parser);
    }

    let start = parser.get_position();
    let target = parse_identifier(parser)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect_detailed(TokenKind::Semicolon, "expected `;` after the assignment")?;

    let span = parser.span_from(start);
    Ok(Stmt::new(
        StmtKind::Assignment(Assignment {
            target,
            value,
            span: span.clone(),
        }),
        span,
    ))
}

pub fn parse_display_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Display(value), parser.span_from(start)))
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let then_body = parse_stmt(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If {
            condition,
            then_body: Box::new(then_body),
            else_body,
        },
        parser.span_from(start),
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let body = parse_stmt(parser)?;

    Ok(Stmt::new(
        StmtKind::While {
            condition,
            body: Box::new(body),
        },
        parser.span_from(start),
    ))
}

/// `for (client c in group) body`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::OpenParen)?;
    let variable = parse_typed(parser)?;
    parser.expect_detailed(TokenKind::In, "expected `in` after the loop variable")?;
    let group = parse_identifier(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_stmt(parser)?;

    Ok(Stmt::new(
        StmtKind::For {
            variable,
            group,
            body: Box::new(body),
        },
        parser.span_from(start),
    ))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(StmtKind::Return(value), parser.span_from(start)))
}

fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("unterminated block, expected `}`"));
        }
        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    Ok(statements)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let statements = parse_block(parser)?;

    Ok(Stmt::new(StmtKind::Block(statements), parser.span_from(start)))
}

/// `function type name(type a, type b) { ... }`
pub fn parse_function(parser: &mut Parser) -> Result<Function, Error> {
    let start = parser.expect(TokenKind::Function)?.span.start;

    let return_type = parse_type(parser)?;
    let name = parse_identifier(parser)?;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseParen {
        parameters.push(parse_typed(parser)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect_detailed(TokenKind::Comma, "expected `,` between parameters")?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(Function {
        return_type,
        name,
        parameters,
        body,
        span: parser.span_from(start),
    })
}

/// `tunnel of type name;`
fn parse_tunnel(parser: &mut Parser) -> Result<Tunnel, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::Of)?;
    let typed = parse_typed(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Tunnel {
        typed,
        span: parser.span_from(start),
    })
}

/// `group of Client alias;`
fn parse_group(parser: &mut Parser) -> Result<Group, Error> {
    let start = parser.advance().span.start.clone();

    parser.expect(TokenKind::Of)?;
    let client = parse_identifier(parser)?;
    let alias = parse_identifier(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Group {
        client,
        alias,
        span: parser.span_from(start),
    })
}

/// `declare client Name { tunnels and functions }`
pub fn parse_client(parser: &mut Parser) -> Result<Client, Error> {
    let start = parser.expect(TokenKind::Declare)?.span.start;
    parser.expect(TokenKind::Client)?;
    let name = parse_identifier(parser)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut tunnels = vec![];
    let mut functions = vec![];

    loop {
        match parser.current_token_kind() {
            TokenKind::Tunnel => tunnels.push(parse_tunnel(parser)?),
            TokenKind::Function => functions.push(parse_function(parser)?),
            TokenKind::CloseCurly => break,
            _ => return Err(parser.unexpected_detailed("a client declares only tunnels and functions")),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Client {
        name,
        tunnels,
        functions,
        span: parser.span_from(start),
    })
}

/// `declare server Name { groups and functions }`
pub fn parse_server(parser: &mut Parser) -> Result<Server, Error> {
    let start = parser.expect(TokenKind::Declare)?.span.start;
    parser.expect(TokenKind::Server)?;
    let name = parse_identifier(parser)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut groups = vec![];
    let mut functions = vec![];

    loop {
        match parser.current_token_kind() {
            TokenKind::Group => groups.push(parse_group(parser)?),
            TokenKind::Function => functions.push(parse_function(parser)?),
            TokenKind::CloseCurly => break,
            _ => return Err(parser.unexpected_detailed("a server declares only groups and functions")),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Server {
        name,
        groups,
        functions,
        span: parser.span_from(start),
    })
}
