use crate::Span;

use super::{
    ast::{Identifier, Typed},
    expressions::Expr,
};

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// `x = e;`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Expr,
    pub span: Span,
}

/// Statement kinds
///
/// Blocks only group statements; every name declared inside a function is
/// visible for the rest of that function.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `sint x;` or `sint x = e;`
    Declaration {
        typed: Typed,
        assignment: Option<Assignment>,
    },
    Assignment(Assignment),
    Expression(Expr),
    Display(Expr),
    If {
        condition: Expr,
        then_body: Box<Stmt>,
        else_body: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    /// `for (client c in group) body`
    For {
        variable: Typed,
        group: Identifier,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Block(Vec<Stmt>),
}
