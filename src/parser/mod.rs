//! Parser module for building the untyped SMCL tree.
//!
//! This module transforms a stream of tokens into a [`Program`]. It uses a
//! Pratt parser for expressions with NUD (null denotation) and LED (left
//! denotation) handlers and binding powers for precedence, and dispatches
//! statements through a lookup table keyed on their first token:
//!
//! - Part parsing (client and server definitions, tunnels, groups, functions)
//! - Statement parsing (declarations, assignments, control flow, display)
//! - Expression parsing (operators, calls, tunnel operations, `open`)
//! - Type parsing for the built-in type keywords
//!
//! [`Program`]: crate::ast::ast::Program

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;
