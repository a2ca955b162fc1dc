//! The token cursor and the program entry point.
//!
//! Expressions are parsed with a Pratt parser: every token kind may have a
//! prefix (NUD) handler, an infix (LED) handler with a binding power, and a
//! statement handler. The tables are filled by [`create_token_lookups`].

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::{parse_client, parse_server},
};

/// Cursor over a token stream plus the Pratt tables.
///
/// The stream always ends with an EOF token and the cursor never moves
/// past it.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Used for positions when no token has been consumed yet.
    file: Rc<String>,
    stmt_lookup: StmtLookup,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span { start: end.clone(), end }
            ));
        }

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token `offset` places ahead, clamped to EOF.
    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        self.tokens[index].kind
    }

    /// Consumes the current token and returns it.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos;
        if index + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Consumes a token of kind `kind`, or fails with `error`.
    fn consume_or(&mut self, kind: TokenKind, error: impl FnOnce(&Self) -> Error) -> Result<Token, Error> {
        if self.current_token_kind() == kind {
            Ok(self.advance().clone())
        } else {
            Err(error(self))
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        self.consume_or(kind, Parser::unexpected)
    }

    /// Like [`Parser::expect`], with `message` saying what was wanted.
    pub fn expect_detailed(&mut self, kind: TokenKind, message: &str) -> Result<Token, Error> {
        self.consume_or(kind, |parser| parser.unexpected_detailed(message))
    }

    pub fn unexpected_detailed(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: String::from(message),
            },
            self.get_position(),
        )
    }

    pub fn unexpected(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current_token().value.clone(),
            },
            self.get_position(),
        )
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers an infix handler. Only infix operators carry a binding power.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, handler: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, handler);
    }

    pub fn nud(&mut self, kind: TokenKind, handler: NUDHandler) {
        self.nud_lookup.insert(kind, handler);
    }

    pub fn stmt(&mut self, kind: TokenKind, handler: StmtHandler) {
        self.stmt_lookup.insert(kind, handler);
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the end of the most recently consumed token.
    pub fn previous_end(&self) -> Position {
        match self.pos.checked_sub(1) {
            Some(index) => self.tokens[index].span.end.clone(),
            None => Position(0, Rc::clone(&self.file)),
        }
    }

    /// Span from `start` to the end of the most recently consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.previous_end(),
        }
    }
}

/// Parses a stream of tokens into a [`Program`].
///
/// A program is any number of client definitions followed by exactly one
/// server definition.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    let start = parser.get_position();
    let mut clients = vec![];

    while parser.current_token_kind() == TokenKind::Declare
        && parser.peek_kind(1) == TokenKind::Client
    {
        clients.push(parse_client(&mut parser)?);
    }

    if parser.current_token_kind() != TokenKind::Declare || parser.peek_kind(1) != TokenKind::Server {
        return Err(parser.unexpected_detailed("expected a client or the server declaration"));
    }
    let server = parse_server(&mut parser)?;

    if parser.has_tokens() {
        return Err(parser.unexpected_detailed("nothing may follow the server declaration"));
    }

    Ok(Program {
        clients,
        server,
        span: parser.span_from(start),
    })
}
