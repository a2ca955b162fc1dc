use crate::Span;

use super::{statements::Stmt, types::SmclType};

/// Identifier
///
/// A name together with the place it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: &str, span: Span) -> Self {
        Identifier {
            name: name.to_string(),
            span,
        }
    }
}

/// Typed name
///
/// `sint x`, as used by declarations, parameters, tunnels and for loops.
#[derive(Debug, Clone, PartialEq)]
pub struct Typed {
    pub ty: SmclType,
    pub name: Identifier,
    pub span: Span,
}

/// Program
///
/// The root of the tree: every client definition followed by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub clients: Vec<Client>,
    pub server: Server,
    pub span: Span,
}

/// Client definition
///
/// Clients own the tunnels through which they send values to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub name: Identifier,
    pub tunnels: Vec<Tunnel>,
    pub functions: Vec<Function>,
    pub span: Span,
}

/// Server definition
///
/// The server owns the groups of clients it talks to.
#[derive(Debug, Clone, PartialEq)]
pub struct Server {
    pub name: Identifier,
    pub groups: Vec<Group>,
    pub functions: Vec<Function>,
    pub span: Span,
}

/// `tunnel of sint votes;`
#[derive(Debug, Clone, PartialEq)]
pub struct Tunnel {
    pub typed: Typed,
    pub span: Span,
}

/// `group of Voter voters;`
///
/// Binds `alias` to the client definition named `client`.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub client: Identifier,
    pub alias: Identifier,
    pub span: Span,
}

/// Function definition
///
/// Functions are namespaced by the part (client or server) declaring them.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub return_type: SmclType,
    pub name: Identifier,
    pub parameters: Vec<Typed>,
    pub body: Vec<Stmt>,
    pub span: Span,
}
