/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     tests/programs.rs
 * Purpose:  End-to-end tests for the evaluator.
 *
 * Whole programs run through muni::run_source and Interpreter, checking
 * values left behind and the error kinds raised.
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the MUNI programming language project.
 *
 * MUNI is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::fs;

use muni::interpreter::natives::native;
use muni::{ErrorKind, Interpreter, InterpreterConfig, MuniError, Value};
use pretty_assertions::assert_eq;

fn eval(source: &str) -> Value {
    muni::run_source(source).unwrap_or_else(|err| panic!("program failed: {}", err))
}

fn fails(source: &str) -> MuniError {
    match muni::run_source(source) {
        Ok(value) => panic!("expected an error, program produced {:?}", value),
        Err(err) => err,
    }
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::Int).collect())
}

fn string(text: &str) -> Value {
    Value::String(text.to_string())
}

/* ----------------------------- */
/* ARITHMETIC                    */
/* ----------------------------- */

#[test]
fn sum_of_declared_ints() {
    assert_eq!(eval("int a = 5; int b = 3; int sum = a + b; sum;"), Value::Int(8));
}

#[test]
fn int_division_promotes_to_float() {
    assert_eq!(eval("7 / 2;"), Value::Float(3.5));
    assert_eq!(eval("int a = 6; a / 3;"), Value::Float(2.0));
}

#[test]
fn division_by_zero_reports_the_line() {
    let err = fails("int a = 5;\nint b = 0;\nint div = a / b;\ndiv;");
    assert_eq!(err.kind, ErrorKind::DivisionByZero);
    assert_eq!(err.span.line, 3);
    assert!(err.to_string().starts_with("DivisionByZero at line 3"));
}

#[test]
fn modulus_is_floored_and_checks_zero() {
    assert_eq!(eval("-7 % 3;"), Value::Int(2));
    assert_eq!(fails("5 % 0;").kind, ErrorKind::ModulusByZero);
}

#[test]
fn complex_arithmetic() {
    assert_eq!(eval("(1 + 2j) * (3 - 1j);"), Value::Complex(5.0, 5.0));
}

#[test]
fn strings_concatenate_with_scalars() {
    assert_eq!(eval("\"n=\" + 5 + true;"), string("n=5true"));
}

#[test]
fn comparisons_and_equality() {
    assert_eq!(eval("1 < 2.5;"), Value::Boolean(true));
    assert_eq!(eval("\"a\" == 1;"), Value::Boolean(false));
    assert_eq!(eval("\"a\" != 1;"), Value::Boolean(true));
    assert_eq!(fails("true < 1;").kind, ErrorKind::UnsupportedOperand);
    assert_eq!(fails("true == 1;").kind, ErrorKind::UnsupportedOperand);
}

#[test]
fn logical_operators_evaluate_both_sides() {
    let source = r#"
        int n = 0;
        boolean touch() { n += 1; return true; }
        boolean r = false & touch();
        n;
    "#;
    assert_eq!(eval(source), Value::Int(1));
    assert_eq!(eval("true ^ true;"), Value::Boolean(false));
}

/* ----------------------------- */
/* TYPES & CASTS                 */
/* ----------------------------- */

#[test]
fn declared_types_are_enforced() {
    assert_eq!(fails("int x = \"hello\";").kind, ErrorKind::TypeError);
    assert_eq!(fails("int x = 1; x = \"s\";").kind, ErrorKind::TypeError);
    assert_eq!(eval("float f = 1; f;"), Value::Float(1.0));
    assert_eq!(fails("int x = 2.5;").kind, ErrorKind::TypeError);
    assert_eq!(eval("? anything = 1; anything = \"now a string\"; anything;"), string("now a string"));
}

#[test]
fn assignment_through_a_cast() {
    assert_eq!(eval("int x = 1; x = int -> 2.9; x;"), Value::Int(2));
    assert_eq!(eval("float -> (int -> 3.7);"), Value::Float(3.0));
}

#[test]
fn casts_from_strings() {
    assert_eq!(eval("int -> \"42\";"), Value::Int(42));
    assert_eq!(eval("boolean -> \"false\";"), Value::Boolean(false));
    assert_eq!(eval("string -> 3.0;"), string("3.0"));
    assert_eq!(fails("int -> \"forty\";").kind, ErrorKind::InvalidCast);
}

#[test]
fn implicit_zero_values() {
    assert_eq!(eval("int i; i;"), Value::Int(0));
    assert_eq!(eval("string s; s;"), string(""));
    assert_eq!(eval("list<int> xs; length(xs);"), Value::Int(0));
}

/* ----------------------------- */
/* CONTROL FLOW                  */
/* ----------------------------- */

#[test]
fn switch_runs_exactly_one_case() {
    let source = |subject: i64| {
        format!(
            "int hit = 0;
             switch ({}) {{
                 case 1: hit = 1; break;
                 case 2: hit = 2; break;
                 default: hit = 3; break;
             }}
             hit;",
            subject
        )
    };

    assert_eq!(eval(&source(2)), Value::Int(2));
    assert_eq!(eval(&source(1)), Value::Int(1));
    assert_eq!(eval(&source(9)), Value::Int(3));
}

#[test]
fn ranges() {
    assert_eq!(eval("0..5;"), ints(&[0, 1, 2, 3, 4]));
    assert_eq!(eval("0...5;"), ints(&[0, 1, 2, 3, 4, 5]));
    assert_eq!(eval("5..0:-1;"), ints(&[5, 4, 3, 2, 1]));
    assert_eq!(eval("0..10:3;"), ints(&[0, 3, 6, 9]));
    assert_eq!(fails("0..5:0;").kind, ErrorKind::RuntimeError);
}

#[test]
fn for_loops() {
    assert_eq!(
        eval("int total = 0; for (int i = 0; i < 5; i += 1) { total += i; } total;"),
        Value::Int(10)
    );
    assert_eq!(
        eval("int total = 0; for (int n in 1...4) { total += n; } total;"),
        Value::Int(10)
    );
    assert_eq!(
        eval("string out = \"\"; for (string c in \"abc\") { out = c + out; } out;"),
        string("cba")
    );
    assert_eq!(fails("for (int c in \"ab\") { }").kind, ErrorKind::TypeError);
}

#[test]
fn while_preroll_and_until() {
    assert_eq!(eval("int n = 0; while (false): 3 { n += 1; } n;"), Value::Int(3));
    assert_eq!(eval("int n = 0; while (n < 4) { n += 1; } n;"), Value::Int(4));
    assert_eq!(eval("int n = 0; until (n >= 4) { n += 1; } n;"), Value::Int(4));
}

#[test]
fn if_else_chain() {
    let source = r#"
        int x = 7;
        string size = "";
        if (x < 5) { size = "small"; } else if (x < 10) { size = "medium"; } else { size = "large"; }
        size;
    "#;
    assert_eq!(eval(source), string("medium"));
}

#[test]
fn top_level_return_ends_the_program() {
    assert_eq!(eval("return 5; 6;"), Value::Int(5));
}

/* ----------------------------- */
/* FUNCTIONS                     */
/* ----------------------------- */

#[test]
fn recursion() {
    let source = "int fact(int n) { if (n <= 1) { return 1; } return n * fact(n - 1); } fact(10);";
    assert_eq!(eval(source), Value::Int(3628800));
}

#[test]
fn redefinition_inside_a_call_does_not_leak() {
    let source = r#"
        int counter(int n) {
            int counter(int m) { return 100; }
            if (n == 0) { return 0; }
            return 1 + counter(n - 1);
        }
        int first = counter(3);
        int second = counter(3);
        second;
    "#;
    assert_eq!(eval(source), Value::Int(101));
}

#[test]
fn locals_are_popped_after_a_call() {
    assert_eq!(eval("int x = 1; void f() { int x = 2; } f(); x;"), Value::Int(1));
    assert_eq!(eval("int y = 1; void g() { y = 5; } g(); y;"), Value::Int(5));
}

#[test]
fn return_values_follow_the_declared_type() {
    assert_eq!(eval("float half(int n) { return n / 2; } half(3);"), Value::Float(1.5));
    assert_eq!(eval("void noop() { } noop();"), Value::Void);
    assert_eq!(fails("int bad() { return \"x\"; } bad();").kind, ErrorKind::TypeError);
}

#[test]
fn missing_arguments_are_ignored() {
    assert_eq!(eval("int first(int a, int b) { return a; } first(7);"), Value::Int(7));
}

#[test]
fn unknown_names() {
    assert_eq!(fails("missing;").kind, ErrorKind::NameError);
    assert_eq!(fails("nothing(1);").kind, ErrorKind::NameError);
}

#[test]
fn host_registered_natives() {
    let mut interpreter = Interpreter::new();
    interpreter.register_native(
        "triple",
        native(|ctx| {
            ctx.expect_args(1)?;
            Ok(Value::Int(ctx.int_arg(0)? * 3))
        }),
    );

    assert_eq!(interpreter.run_source("triple(14);").unwrap(), Value::Int(42));
}

#[test]
fn error_location_is_kept_in_the_context() {
    let mut interpreter = Interpreter::new();
    let err = interpreter.run_source("int a = 1;\n\nint b = a + \"x\" * 2;").unwrap_err();

    assert_eq!(err.kind, ErrorKind::UnsupportedOperand);
    assert_eq!(err.span.line, 3);
    assert_eq!(interpreter.context().current.line, 3);
}

#[test]
fn call_depth_is_limited() {
    let config = InterpreterConfig {
        max_call_depth: 20,
        ..InterpreterConfig::default()
    };
    let mut interpreter = Interpreter::with_config(config);

    let err = interpreter
        .run_source("int f(int n) { return f(n + 1); } f(0);")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RuntimeError);
    assert!(err.help.is_some());
}

/* ----------------------------- */
/* CONTAINERS                    */
/* ----------------------------- */

#[test]
fn list_indexing_and_assignment() {
    assert_eq!(eval("list xs = [1, 2, 3]; xs[-1];"), Value::Int(3));
    assert_eq!(eval("list xs = [1, 2, 3]; xs[0] = 9; xs;"), ints(&[9, 2, 3]));
    assert_eq!(eval("list xs = [1, 2]; xs[1] += 5; xs[1];"), Value::Int(7));
    assert_eq!(fails("list xs = [1, 2, 3]; xs[10];").kind, ErrorKind::IndexError);
    assert_eq!(fails("list<int> xs = [1]; xs[0] = \"a\";").kind, ErrorKind::TypeError);
}

#[test]
fn list_operators() {
    assert_eq!(eval("[1] + [2, 3];"), ints(&[1, 2, 3]));
    assert_eq!(eval("[1, 2] + 3;"), ints(&[1, 2, 3]));
    assert_eq!(eval("[1, 2, 1] - 1;"), ints(&[2, 1]));
    assert_eq!(eval("[1, 2, 3, 2] - [2, 3];"), ints(&[1, 2]));
}

#[test]
fn dictionaries() {
    assert_eq!(eval("dict d = {\"a\": 1}; d[\"a\"] = 2; d[\"a\"];"), Value::Int(2));
    assert_eq!(eval("dict d = {\"a\": 1}; d[\"zz\"];"), Value::Void);
    assert_eq!(eval("dict d = {\"b\": 2, \"a\": 1}; keys(d);"), Value::list(vec![string("b"), string("a")]));
}

#[test]
fn collection_natives() {
    assert_eq!(eval("list xs = [3, 1, 2]; append(xs, 0); length(xs);"), Value::Int(4));
    assert_eq!(eval("sort([3, 1, 2]);"), ints(&[1, 2, 3]));
    assert_eq!(eval("contains([1, 2], 2);"), Value::Boolean(true));
    assert_eq!(eval("type(1.5);"), string("float"));
    assert_eq!(eval("\"abc\"[1];"), string("b"));
}

#[test]
fn slices_copy_a_range() {
    assert_eq!(eval("slice([1, 2, 3, 4], 1, 3);"), ints(&[2, 3]));
    assert_eq!(eval("slice([1, 2, 3, 4], -2, 10);"), ints(&[3, 4]));
    assert_eq!(eval("slice([1, 2, 3], 2, 1);"), ints(&[]));
    assert_eq!(eval("slice(\"muni\", 1, -1);"), string("un"));
    assert_eq!(
        eval("list xs = [1, 2, 3]; list ys = slice(xs, 0, 2); ys[0] = 9; xs[0];"),
        Value::Int(1)
    );
    assert_eq!(fails("slice(5, 0, 1);").kind, ErrorKind::TypeError);
}

/* ----------------------------- */
/* ERRORS & HALTING              */
/* ----------------------------- */

#[test]
fn throw_carries_the_message() {
    let err = fails("throw \"boom\";");
    assert_eq!(err.kind, ErrorKind::UserThrown);
    assert_eq!(err.message, "boom");
}

#[test]
fn first_error_halts_the_interpreter() {
    let mut interpreter = Interpreter::new();

    let err = interpreter.run_source("int a = 1; a = b; a = 2;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::NameError);
    assert!(!interpreter.is_running());
    assert_eq!(interpreter.lookup("a").unwrap(), Value::Int(1));

    // Later statements are no-ops.
    interpreter.run_source("a = 3;").unwrap();
    assert_eq!(interpreter.lookup("a").unwrap(), Value::Int(1));
}

#[test]
fn syntax_errors_carry_a_location() {
    let err = fails("int x = 1;\nint y = ;");
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert_eq!(err.span.line, 2);
    assert!(err.span.column.is_some());
}

/* ----------------------------- */
/* IMPORTS                       */
/* ----------------------------- */

#[test]
fn library_imports() {
    assert_eq!(eval("import <math:lib>; sqrt(16.0);"), Value::Float(4.0));
    assert_eq!(eval("import <math:lib> as m; m_pow(2, 10);"), Value::Int(1024));
    assert_eq!(eval("import <text:lib> as t; t_upper(\"abc\");"), string("ABC"));
    assert_eq!(fails("import <nope:lib>;").kind, ErrorKind::ImportError);
}

#[test]
fn file_imports_register_functions_only() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("helper.mun"),
        "int double(int n) { return n * 2; }\nint unused = 1;\n",
    )
    .unwrap();

    let mut interpreter = Interpreter::new();
    interpreter.set_module_dir(dir.path());

    let value = interpreter
        .run_source("import <helper.mun> as h; h_double(21);")
        .unwrap();
    assert_eq!(value, Value::Int(42));
    assert!(interpreter.has_function("h_double"));
    assert_eq!(interpreter.lookup("unused").unwrap_err().kind, ErrorKind::NameError);
}

#[test]
fn aliased_module_functions_call_their_siblings() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("m.mun"),
        "int helper(int n) { return n * 2; }\n\
         int twice(int n) { return helper(helper(n)); }\n\
         int fact(int n) { if (n <= 1) { return 1; } return n * fact(n - 1); }\n",
    )
    .unwrap();

    let mut interpreter = Interpreter::new();
    interpreter.set_module_dir(dir.path());

    let value = interpreter
        .run_source("import <m.mun> as m; int a = m_twice(3); int b = m_fact(4); a + b;")
        .unwrap();
    assert_eq!(value, Value::Int(36));
    assert!(!interpreter.has_function("helper"));
    assert_eq!(
        interpreter.run_source("helper(1);").unwrap_err().kind,
        ErrorKind::NameError
    );
}

#[test]
fn missing_module_is_an_import_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut interpreter = Interpreter::new();
    interpreter.set_module_dir(dir.path());

    let err = interpreter.run_source("import <absent.mun>;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ImportError);
}
