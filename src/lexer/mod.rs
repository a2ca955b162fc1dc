//! Lexical analysis for SMCL sources.
//!
//! Converts source text into a stream of tokens using an ordered table of
//! anchored regex patterns. Keywords are recognised through a reserved word
//! lookup, whitespace and `//` comments are skipped, and every token carries
//! the span it was read from for error reporting.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
