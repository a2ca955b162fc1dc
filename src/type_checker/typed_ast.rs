//! Typed tree definitions.
//!
//! The analyzer produces these from the untyped tree. Every expression
//! carries its resolved type, names that refer to clients carry the client
//! definition they were resolved to, and nothing is mutated in place.
//!
//! This tree is consumed by the printer.

use crate::{
    ast::{expressions::BinaryOperator, types::SmclType},
    Span,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TypedProgram {
    pub clients: Vec<TypedClient>,
    pub server: TypedServer,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedClient {
    pub name: String,
    pub tunnels: Vec<TypedTunnel>,
    pub functions: Vec<TypedFunction>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedServer {
    pub name: String,
    pub groups: Vec<TypedGroup>,
    pub functions: Vec<TypedFunction>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedTunnel {
    pub name: String,
    /// The transported type, not `tunnel of ...`.
    pub ty: SmclType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedGroup {
    pub client: String,
    pub alias: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedParameter {
    pub name: String,
    pub ty: SmclType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedFunction {
    pub name: String,
    pub return_type: SmclType,
    pub parameters: Vec<TypedParameter>,
    pub body: Vec<TypedStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedStmt {
    pub kind: TypedStmtKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmtKind {
    Declaration {
        name: String,
        ty: SmclType,
        value: Option<TypedExpr>,
    },
    Assignment {
        target: String,
        value: TypedExpr,
    },
    Expression(TypedExpr),
    Display(TypedExpr),
    If {
        condition: TypedExpr,
        then_body: Box<TypedStmt>,
        else_body: Option<Box<TypedStmt>>,
    },
    While {
        condition: TypedExpr,
        body: Box<TypedStmt>,
    },
    For {
        variable: String,
        group: String,
        /// Name of the client definition the group refers to.
        client: String,
        body: Box<TypedStmt>,
    },
    Return {
        value: Option<TypedExpr>,
        ty: SmclType,
    },
    Block(Vec<TypedStmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: SmclType,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExprKind {
    Int(i64),
    Bool(bool),
    String(String),
    Symbol(String),
    Binary {
        operator: BinaryOperator,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
    },
    Not(Box<TypedExpr>),
    Call(TypedCall),
    MethodInvocation {
        target: String,
        client: String,
        call: TypedCall,
    },
    Tunnel(TypedTunnelCall),
    RemoteTunnel {
        target: String,
        client: String,
        call: TypedTunnelCall,
    },
    Open {
        expr: Box<TypedExpr>,
        ids: Vec<String>,
    },
    ReadInt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedCall {
    pub function: String,
    pub arguments: Vec<TypedExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedTunnelMethod {
    Put(Box<TypedExpr>),
    Get,
    Take,
}

impl TypedTunnelMethod {
    pub fn name(&self) -> &'static str {
        match self {
            TypedTunnelMethod::Put(_) => "put",
            TypedTunnelMethod::Get => "get",
            TypedTunnelMethod::Take => "take",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedTunnelCall {
    pub tunnel: String,
    pub method: TypedTunnelMethod,
}
