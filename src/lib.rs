#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{
        type_checker::{type_check, AnalyzerOptions},
        typed_ast::TypedProgram,
    },
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod printer;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// A span for nodes that were not read from source text.
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }
}

/// Lexes and parses `source` into an untyped program.
pub fn parse_source(source: &str, file: &str) -> Result<Program, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
    parse(tokens, Rc::new(file.to_string()))
}

/// Runs the whole front end: lexing, parsing and semantic analysis.
pub fn check_source(
    source: &str,
    file: &str,
    options: AnalyzerOptions,
) -> Result<TypedProgram, Error> {
    let program = parse_source(source, file)?;
    type_check(&program, options)
}

/// Finds the line containing byte offset `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` within that line.
pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // Position at the very end of the file points just past the last line.
    content
        .split_inclusive('\n')
        .last()
        .map(|line| (line_number - 1, line.to_string(), line.len()))
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let content = "Hello, world!\nThis is a test\n\nTesting { }\n";

        let (line_number, line, line_pos) = super::get_line_at_position(content, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(content, 38).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_past_end() {
        assert!(super::get_line_at_position("abc", 10).is_none());
        let (line_number, _, line_pos) = super::get_line_at_position("abc", 3).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line_pos, 3);
    }
}

/// Renders an error with the offending source line underneath.
pub fn display_error(error: &Error, content: &str, file: &str) -> String {
    /*
        Error: message
        -> voting.smcl
           |
        20 | sint x = y;
           | ---------^
    */

    let mut output = String::new();

    if let ErrorTip::None = error.get_tip() {
        output.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        output.push_str(&format!(
            "Error: {} ({})\n",
            error.get_error_name(),
            error.get_tip()
        ));
    }
    output.push_str(&format!("-> {}\n", file));

    let Some((line, line_text, line_pos)) =
        get_line_at_position(content, error.get_position().0)
    else {
        return output;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    output.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    output.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    output
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
