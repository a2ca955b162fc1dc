use std::fmt::Display;

use crate::Span;

use super::ast::Identifier;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    Less,
    Greater,
    Equal,
}

impl BinaryOperator {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Less => "<",
            BinaryOperator::Greater => ">",
            BinaryOperator::Equal => "==",
        };
        write!(f, "{}", symbol)
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Expression kinds
///
/// Every pass over the tree matches on this exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Int(i64),
    Bool(bool),
    String(String),
    Symbol(String),
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    /// `f(a, b)`
    Call(Call),
    /// `c.f(a, b)`, a server calling a function on a client instance.
    MethodInvocation { target: Identifier, call: Call },
    /// `t.put(e)`, `t.get()`, `t.take()` inside a client.
    Tunnel(TunnelCall),
    /// `c.t.take()`, a server reading the tunnel of a client instance.
    RemoteTunnel { client: Identifier, call: TunnelCall },
    /// `open(e | x, y)`
    Open { expr: Box<Expr>, ids: Vec<Identifier> },
    ReadInt,
}

/// Call Expression
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: Identifier,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// Tunnel operations.
///
/// `Take` blocks until a value is available; `Get` returns immediately with
/// an empty value if nothing is queued. Both read the same type.
#[derive(Debug, Clone, PartialEq)]
pub enum TunnelMethod {
    Put(Box<Expr>),
    Get,
    Take,
}

impl TunnelMethod {
    pub fn name(&self) -> &'static str {
        match self {
            TunnelMethod::Put(_) => "put",
            TunnelMethod::Get => "get",
            TunnelMethod::Take => "take",
        }
    }

    /// Whether `x.name(...)` reads as a tunnel operation.
    pub fn is_method_name(name: &str) -> bool {
        matches!(name, "put" | "get" | "take")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TunnelCall {
    pub tunnel: Identifier,
    pub method: TunnelMethod,
    pub span: Span,
}
