//! Source printer for typed SMCL programs.
//!
//! Walks the typed tree and emits canonical SMCL source: four space
//! indentation, one statement per line and only the parentheses precedence
//! requires. The output parses back to an equivalent program.

pub mod printer;
