#![allow(dead_code)]

use once_cell::sync::Lazy;
use xeval::{ParseError, ParseErrorKind, Program, Variables, parse, register_function};

/// Functions every test case can call.
static REGISTERED: Lazy<()> = Lazy::new(|| {
    register_function("sqr", |x: f64| x * x);
    register_function("len2", |a: f64, b: f64| (a * a + b * b).sqrt());
    register_function("zero", || 0.0);
});

/// Variables every test case can read.
pub fn variables() -> Variables {
    [("x0", 3.14), ("y0", 2.718), ("x1", 100.0), ("y1", 200.0)]
        .into_iter()
        .collect()
}

pub fn compile(input: &str, vars: &Variables) -> Result<Program, ParseError> {
    Lazy::force(&REGISTERED);
    parse(input, vars)
}

pub fn check_result(input: &str, vars: &Variables, expected: f64) {
    let program = compile(input, vars)
        .unwrap_or_else(|e| panic!("Expression compilation failed: {:?}\n{}", input, e));
    let actual = program.evaluate();
    assert!(
        actual == expected || (actual.is_nan() && expected.is_nan()),
        "{:?} evaluated to {}, expected {}",
        input,
        actual,
        expected
    );
}

pub fn check_error(input: &str, vars: &Variables, kind: ParseErrorKind, offset: usize) {
    match compile(input, vars) {
        Ok(program) => panic!("{:?} should not compile, got\n{}", input, program.disassemble()),
        Err(err) => pretty_assertions::assert_eq!(err, ParseError::new(kind, offset)),
    }
}

/// Declare one test: an input, optional extra variables, and either the
/// evaluated result or the expected error kind and offset.
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        $(vars: { $($var:literal => $value:expr),* $(,)? },)?
        $(result: $result:expr,)?
        $(error: { $kind:expr, at: $offset:expr },)?
    ) => {
        #[test]
        fn $name() {
            #[allow(unused_mut)]
            let mut vars = cases::variables();
            $($(vars.define($var, $value);)*)?
            $(cases::check_result($input, &vars, $result);)?
            $(cases::check_error($input, &vars, $kind, $offset);)?
        }
    };
}
