#[macro_use]
mod cases;

use std::thread;

use xeval::{Cursor, Variable, Variables, compile};

test_case! {
    name: bound_variable,
    input: "x1",
    result: 100.0,
}

test_case! {
    name: variables_in_arithmetic,
    input: "x1+y1*2",
    result: 500.0,
}

test_case! {
    name: extra_variables,
    input: "_tmp + v2",
    vars: { "_tmp" => 1.5, "v2" => 2.0 },
    result: 3.5,
}

test_case! {
    name: redefined_variable_keeps_last_value,
    input: "x1",
    vars: { "x1" => 7.0 },
    result: 7.0,
}

#[test]
fn updates_are_seen_without_recompiling() {
    let mut vars = Variables::new();
    let x = vars.define("x", 1.0);
    let program = cases::compile("x * 10", &vars).unwrap();

    for value in [1.0, -2.0, 0.5] {
        x.set(value);
        assert_eq!(program.evaluate(), value * 10.0);
    }

    // Redefining through the map updates the same cell.
    vars.define("x", 4.0);
    assert_eq!(program.evaluate(), 40.0);
}

#[test]
fn evaluation_is_deterministic() {
    let vars = cases::variables();
    let program = cases::compile("sin(x0) * exp(y0) / (x1 - y1) + pow(x0, 0.5)", &vars).unwrap();
    let first = program.evaluate();
    for _ in 0..10 {
        assert_eq!(program.evaluate().to_bits(), first.to_bits());
    }
}

#[test]
fn unrelated_results_do_not_change() {
    let mut vars = cases::variables();
    let u = vars.define("u", 1.0);
    let depends = cases::compile("(u + 1) * 2", &vars).unwrap();
    let independent = cases::compile("(x1 + 1) * 2", &vars).unwrap();

    let before = independent.evaluate();
    u.set(5.0);
    assert_eq!(depends.evaluate(), 12.0);
    assert_eq!(independent.evaluate(), before);
}

#[test]
fn replaced_binding_does_not_affect_compiled_programs() {
    let mut vars = Variables::new();
    let old = vars.define("x", 1.0);
    let program = cases::compile("x + 1", &vars).unwrap();

    let new = Variable::new(100.0);
    vars.insert("x", new.clone());
    old.set(2.0);
    new.set(200.0);
    assert_eq!(program.evaluate(), 3.0);
}

#[test]
fn clones_are_independent_but_share_variables() {
    let mut vars = Variables::new();
    let t = vars.define("t", 2.0);
    let original = cases::compile("sqr(t) + (t + 1) * (t - 1)", &vars).unwrap();
    let copy = original.clone();
    drop(original);

    assert_eq!(copy.evaluate(), 7.0);
    t.set(3.0);
    assert_eq!(copy.evaluate(), 17.0);
}

#[test]
fn programs_move_across_threads() {
    let mut vars = Variables::new();
    let a = vars.define("a", 3.0);
    let program = cases::compile("a * a", &vars).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let program = program.clone();
            thread::spawn(move || program.evaluate())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 9.0);
    }

    a.set(4.0);
    assert_eq!(thread::spawn(move || program.evaluate()).join().unwrap(), 16.0);
}

#[test]
fn partial_compile_walks_a_list() {
    let mut vars = Variables::new();
    vars.define("x", 2.0);
    let source = "x + 1 , x * 3 , -x";
    let mut cursor = Cursor::new(source);
    let mut results = Vec::new();

    loop {
        let program = compile(&mut cursor, &vars).unwrap();
        results.push(program.evaluate());
        if cursor.is_at_end() {
            break;
        }
        assert_eq!(cursor.rest().as_bytes()[0], b',');
        cursor = Cursor::at(source, cursor.offset() + 1);
    }

    pretty_assertions::assert_eq!(results, vec![3.0, 6.0, -2.0]);
}
