/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the untyped AST produced by the parser
///
/// Submodules:
/// - ast: Program structure (parts, tunnels, groups, functions)
/// - expressions: Definitions for various expression types
/// - statements: Definitions for various statement types
/// - types: The public/secret type lattice
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
