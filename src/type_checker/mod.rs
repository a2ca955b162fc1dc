//! Semantic analysis for SMCL programs.
//!
//! This module checks an untyped [`Program`] and produces a typed tree. It
//! enforces the rules of the language while:
//!
//! - Registering clients, their tunnels, the server and its groups
//! - Resolving identifiers, free calls and method invocations on clients
//! - Tracking which values are secret, and where `open` reveals them
//! - Restricting part-specific constructs to the part they belong in
//!
//! Analysis stops at the first violation.
//!
//! [`Program`]: crate::ast::ast::Program

pub mod environment;
pub mod type_checker;
pub mod typed_ast;

#[cfg(test)]
mod tests;
