use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::SmclType, Position};

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Shorthand for the single error kind the analyzer raises.
    pub fn semantic(violation: Violation, position: Position) -> Self {
        Error::new(ErrorImpl::SemanticViolation { violation }, position)
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Returns the violated rule if this error came from the analyzer.
    pub fn get_violation(&self) -> Option<&Violation> {
        match &self.internal_error {
            ErrorImpl::SemanticViolation { violation } => Some(violation),
            _ => None,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::SemanticViolation { .. } => "SemanticViolation",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::SemanticViolation { violation } => {
                ErrorTip::Suggestion(violation.to_string())
            }
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("semantic violation: {violation}")]
    SemanticViolation { violation: Violation },
}

/// The rules the analyzer enforces.
///
/// Each variant renders as a message naming the rule that failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("there are two clients with the same name: {part}")]
    DuplicatePart { part: String },
    #[error("there are two functions with the same name in {part}: {function}")]
    DuplicateFunction { function: String, part: String },
    #[error("{function} is a tunnel operation and cannot name a function of client {part}")]
    ReservedFunctionName { function: String, part: String },
    #[error("there's another tunnel with the same name in {part}: {tunnel}")]
    DuplicateTunnel { tunnel: String, part: String },
    #[error("there's another group with the same name in {part}: {group}")]
    DuplicateGroup { group: String, part: String },
    #[error("variable {variable:?} already declared")]
    DuplicateVariable { variable: String },
    #[error("{variable:?} is already the name of a tunnel")]
    ShadowsTunnel { variable: String },
    #[error("{variable:?} is already the name of a group")]
    ShadowsGroup { variable: String },
    #[error("variable {variable:?} not declared")]
    UndefinedVariable { variable: String },
    #[error("{function}(...) isn't defined in {part}")]
    UndefinedFunction { function: String, part: String },
    #[error("{group} is not a declared group")]
    UndefinedGroup { group: String },
    #[error("the group refers to an undeclared client: {part}")]
    UndefinedPart { part: String },
    #[error("{tunnel} isn't defined as a tunnel in {part}")]
    UndefinedTunnel { tunnel: String, part: String },
    #[error("{variable} is not bound to a client by an enclosing for")]
    UnboundClient { variable: String },
    #[error("the {position} operand of `{operator}` must be {expected} but is {received}")]
    OperandType {
        operator: String,
        position: String,
        expected: SmclType,
        received: SmclType,
    },
    #[error("both operands of == must have the same type: {left} == {right}")]
    EqualityMismatch { left: SmclType, right: SmclType },
    #[error("the {construct} guard must be bool but is {received}")]
    ConditionType { construct: String, received: SmclType },
    #[error("wrong assignment to {variable}: {expected} = {received}, they must be the same type")]
    AssignmentMismatch {
        variable: String,
        expected: SmclType,
        received: SmclType,
    },
    #[error("return a {received} in a {expected} function {function}")]
    ReturnMismatch {
        function: String,
        expected: SmclType,
        received: SmclType,
    },
    #[error("the function {function}(...) has {expected} parameters, called with {received} arguments")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("argument {position} of {function}(...) is {received} but needs {expected}")]
    ArgumentMismatch {
        function: String,
        position: usize,
        expected: SmclType,
        received: SmclType,
    },
    #[error("the tunnel {tunnel} has type {expected} but is used with a {received} expression")]
    TunnelMismatch {
        tunnel: String,
        expected: SmclType,
        received: SmclType,
    },
    #[error("the tunnel {tunnel} cannot carry {received}, only int, sint, bool and sbool")]
    UnsupportedTunnelType { tunnel: String, received: SmclType },
    #[error("for each is only allowed over clients, not {received}")]
    LoopVariableType { received: SmclType },
    #[error("{construct} can be used only within the server")]
    OutsideServer { construct: String },
    #[error("{construct} can be used only within clients")]
    OutsideClient { construct: String },
    #[error("tunnels only flow from clients to the server, the server cannot put into {tunnel}")]
    IllegalTunnelDirection { tunnel: String },
    #[error("open only on secret variables, {variable} is {received}")]
    NotSecret { variable: String, received: SmclType },
    #[error("you can only display strings, not {received}")]
    DisplayType { received: SmclType },
}
