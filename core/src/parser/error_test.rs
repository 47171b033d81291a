use pretty_assertions::assert_eq;

use crate::api::{CompilationOptions, Severity, Variables};
use crate::parser::{Cursor, ParseError, ParseErrorKind};
use crate::{Engine, compile};

fn parse_err(source: &str) -> ParseError {
    let mut vars = Variables::new();
    vars.define("x", 1.0);
    let engine = Engine::default();
    match engine.parse(source, &vars) {
        Ok(program) => panic!("{:?} compiled to {:?}", source, program),
        Err(err) => err,
    }
}

fn assert_error(source: &str, kind: ParseErrorKind, offset: usize) {
    assert_eq!(parse_err(source), ParseError::new(kind, offset), "source: {:?}", source);
}

#[test]
fn test_wrong_arity() {
    let cos = || ParseErrorKind::WrongArity {
        name: "cos".into(),
        expected: 1,
    };
    assert_error("cos()", cos(), 4);
    assert_error("cos(1, 2)", cos(), 5);
    assert_error(
        "atan2(12)",
        ParseErrorKind::WrongArity {
            name: "atan2".into(),
            expected: 2,
        },
        8,
    );
    assert_error(
        "random(1)",
        ParseErrorKind::WrongArity {
            name: "random".into(),
            expected: 0,
        },
        7,
    );
}

#[test]
fn test_unknown_names() {
    assert_error("1+z2*4", ParseErrorKind::UnknownVariable { name: "z2".into() }, 4);
    assert_error(
        "x + nope(1)",
        ParseErrorKind::UnknownFunction {
            name: "nope".into(),
        },
        8,
    );
    // A call needs `(` right after the name.
    assert_error("cos (1)", ParseErrorKind::UnknownVariable { name: "cos".into() }, 3);
}

#[test]
fn test_incomplete_input() {
    assert_error("1+2*", ParseErrorKind::UnexpectedEnd, 4);
    assert_error("", ParseErrorKind::UnexpectedEnd, 0);
    assert_error("  ; nothing but a comment", ParseErrorKind::UnexpectedEnd, 25);
    assert_error("1+(2*3", ParseErrorKind::UnclosedParen, 6);
    assert_error("pow(2, 3", ParseErrorKind::UnclosedParen, 8);
    assert_error("pow(2", ParseErrorKind::UnclosedParen, 5);
}

#[test]
fn test_misplaced_characters() {
    assert_error("1+2()", ParseErrorKind::TrailingCharacters, 3);
    assert_error("+1", ParseErrorKind::UnexpectedCharacter { found: '+' }, 0);
    assert_error("2 * é", ParseErrorKind::UnexpectedCharacter { found: 'é' }, 4);
    assert_error("(1 2)", ParseErrorKind::Expected { expected: ')', found: '2' }, 3);
    assert_error("pow(1 2)", ParseErrorKind::Expected { expected: ',', found: '2' }, 6);
    assert_error("1 + )", ParseErrorKind::UnmatchedCloseParen, 4);
    assert_error("(1 + 2))", ParseErrorKind::UnmatchedCloseParen, 7);
    assert_error("x x", ParseErrorKind::TrailingCharacters, 2);
}

#[test]
fn test_operator_lookup_prefers_two_characters() {
    let vars = Variables::new();
    assert_eq!(crate::parse("1<=2", &vars).unwrap().evaluate(), 1.0);
    assert_eq!(crate::parse("1<<2", &vars).unwrap().evaluate(), 4.0);
    assert_error("2 = 1", ParseErrorKind::TrailingCharacters, 2);
    assert_error("2 ! 1", ParseErrorKind::TrailingCharacters, 2);
}

#[test]
fn test_cursor_is_left_at_error_offset() {
    let vars = Variables::new();
    let source = "total = 1 + (2 * 3";
    let mut cursor = Cursor::at(source, 8);
    let err = compile(&mut cursor, &vars).unwrap_err();
    assert_eq!(err, ParseError::new(ParseErrorKind::UnclosedParen, 18));
    assert_eq!(cursor.offset(), 18);

    let mut cursor = Cursor::at("f = 2 * y", 4);
    let err = compile(&mut cursor, &vars).unwrap_err();
    assert_eq!(err.offset, 9);
    assert_eq!(err.span().start(), 8);
}

#[test]
fn test_deep_nesting_is_an_error() {
    let too_deep = ParseErrorKind::NestingTooDeep { limit: 100 };
    let source = format!("{}1{}", "(".repeat(20000), ")".repeat(20000));
    assert_error(&source, too_deep.clone(), 100);
    assert_error(&"-".repeat(20000), too_deep.clone(), 100);
    assert_error(&"sqrt(".repeat(20000), too_deep, 500);

    let source = format!("{}x{}", "(".repeat(99), ")".repeat(99));
    let vars: Variables = [("x", 2.5)].into_iter().collect();
    assert_eq!(crate::parse(&source, &vars).unwrap().evaluate(), 2.5);
}

#[test]
fn test_max_depth_is_configurable() {
    let vars = Variables::new();
    let options = CompilationOptions {
        max_depth: 3,
        ..CompilationOptions::default()
    };
    let engine = Engine::default();

    let mut cursor = Cursor::new("((1))");
    assert_eq!(engine.compile_with(&mut cursor, &vars, &options).unwrap().evaluate(), 1.0);

    let mut cursor = Cursor::new("1 + (((1)))");
    let err = engine.compile_with(&mut cursor, &vars, &options).unwrap_err();
    assert_eq!(err, ParseError::new(ParseErrorKind::NestingTooDeep { limit: 3 }, 7));
}

#[test]
fn test_non_ascii_start_offset() {
    let vars = Variables::new();
    let mut cursor = Cursor::at("é1", 1);
    let err = compile(&mut cursor, &vars).unwrap_err();
    assert_eq!(err, ParseError::new(ParseErrorKind::UnexpectedCharacter { found: 'é' }, 0));
    assert_eq!(err.span().end(), 2);
}

#[test]
fn test_diagnostic_codes() {
    let cases = [
        ("1+", "E001"),
        ("(1", "E002"),
        (")", "E003"),
        ("(1 2)", "E004"),
        ("q", "E006"),
        ("q(1)", "E007"),
        ("sqrt()", "E008"),
        ("#", "E009"),
        ("1 1", "E010"),
    ];
    for (source, code) in cases {
        let diagnostic = parse_err(source).to_diagnostic();
        assert_eq!(diagnostic.code.as_deref(), Some(code), "source: {:?}", source);
        assert_eq!(diagnostic.severity, Severity::Error);
    }

    let deep = format!("{}1", "(".repeat(200));
    let diagnostic = parse_err(&deep).to_diagnostic();
    assert_eq!(diagnostic.code.as_deref(), Some("E011"));
}
