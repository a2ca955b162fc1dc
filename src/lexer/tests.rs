//! Unit tests for the lexer module.

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.smcl".to_string()))
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let tokens = kinds("declare client server tunnel group of function if else while for in return display open readInt");

    assert_eq!(
        tokens,
        vec![
            TokenKind::Declare,
            TokenKind::Client,
            TokenKind::Server,
            TokenKind::Tunnel,
            TokenKind::Group,
            TokenKind::Of,
            TokenKind::Function,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Return,
            TokenKind::Display,
            TokenKind::Open,
            TokenKind::ReadInt,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_type_keywords() {
    let tokens = tokenize("int sint bool sbool string void sclient".to_string(), None).unwrap();

    assert!(tokens[..7].iter().all(|token| token.is_type()));
    assert_eq!(tokens[4].kind, TokenKind::StringType);
    assert_eq!(tokens[7].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("votes Voter _tmp x1 readint".to_string(), None).unwrap();

    for (token, name) in tokens.iter().zip(["votes", "Voter", "_tmp", "x1", "readint"]) {
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.value, name);
    }
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 0 1000".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].value, "1000");
}

#[test]
fn test_tokenize_strings_with_escapes() {
    let tokens = tokenize(r#""hello" "a\"b" "line\n""#.to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "a\"b");
    assert_eq!(tokens[2].value, "line\n");
}

#[test]
fn test_string_span_covers_quotes() {
    let tokens = tokenize("x \"ab\"".to_string(), None).unwrap();

    assert_eq!(tokens[1].span.start.0, 2);
    assert_eq!(tokens[1].span.end.0, 6);
}

#[test]
fn test_tokenize_operators() {
    let tokens = kinds("== = < > || | && ! . ; , + - * / %");

    assert_eq!(
        tokens,
        vec![
            TokenKind::Equals,
            TokenKind::Assignment,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Or,
            TokenKind::Pipe,
            TokenKind::And,
            TokenKind::Not,
            TokenKind::Dot,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_word_and_symbol_logical_operators_match() {
    assert_eq!(kinds("a and b or not c"), kinds("a && b || ! c"));
}

#[test]
fn test_comments_are_skipped() {
    let tokens = kinds("x // trailing comment\n// whole line\ny");

    assert_eq!(tokens, vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::EOF]);
}

#[test]
fn test_token_spans() {
    let tokens = tokenize("sint total".to_string(), Some("test.smcl".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 4);
    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 10);
    assert_eq!(*tokens[1].span.start.1, "test.smcl");
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("int x = 3 @ 4;".to_string(), None).unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_empty_source_yields_eof() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
    assert_eq!(kinds("   \n\t"), vec![TokenKind::EOF]);
}
