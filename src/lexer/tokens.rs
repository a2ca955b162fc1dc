use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("declare", TokenKind::Declare);
        map.insert("client", TokenKind::Client);
        map.insert("server", TokenKind::Server);
        map.insert("tunnel", TokenKind::Tunnel);
        map.insert("group", TokenKind::Group);
        map.insert("of", TokenKind::Of);
        map.insert("function", TokenKind::Function);
        map.insert("int", TokenKind::Int);
        map.insert("sint", TokenKind::Sint);
        map.insert("bool", TokenKind::Bool);
        map.insert("sbool", TokenKind::Sbool);
        map.insert("string", TokenKind::StringType);
        map.insert("void", TokenKind::Void);
        map.insert("sclient", TokenKind::Sclient);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("return", TokenKind::Return);
        map.insert("display", TokenKind::Display);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("open", TokenKind::Open);
        map.insert("readInt", TokenKind::ReadInt);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // not, !

    Less,
    Greater,

    Or,  // or, ||
    And, // and, &&

    Dot,
    Semicolon,
    Comma,
    Pipe,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Declare,
    Client,
    Server,
    Tunnel,
    Group,
    Of,
    Function,
    Int,
    Sint,
    Bool,
    Sbool,
    StringType,
    Void,
    Sclient,
    If,
    Else,
    While,
    For,
    In,
    Return,
    Display,
    True,
    False,
    Open,
    ReadInt,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// Whether this token names one of the built-in types.
    pub fn is_type(&self) -> bool {
        self.is_one_of_many(&[
            TokenKind::Int,
            TokenKind::Sint,
            TokenKind::Bool,
            TokenKind::Sbool,
            TokenKind::StringType,
            TokenKind::Void,
            TokenKind::Client,
            TokenKind::Sclient,
        ])
    }
}
