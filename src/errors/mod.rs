//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the front end.
//! It includes:
//!
//! - Error structures with source position information
//! - Token-level variants raised by the lexer and parser
//! - The single semantic violation kind raised by the analyzer, with one
//!   `Violation` per enforced rule
//! - Error formatting and display functionality

pub mod errors;
