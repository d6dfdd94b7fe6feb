/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     tests/reactive.rs
 * Purpose:  Tests for signal dispatch and variable watches.
 *
 * Signals, when-handlers and watches. Handlers run on their own threads,
 * so every test joins them with wait_for_handlers before looking at state.
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

use muni::{ErrorKind, Interpreter, Value};
use pretty_assertions::assert_eq;

/// Runs `source` to completion, including every handler it started.
fn settle(source: &str) -> Interpreter {
    let mut interpreter = Interpreter::new();
    interpreter
        .run_source(source)
        .unwrap_or_else(|err| panic!("program failed: {}", err));
    assert_eq!(interpreter.wait_for_handlers(), 0);
    interpreter
}

fn int(interpreter: &Interpreter, name: &str) -> i64 {
    match interpreter.lookup(name) {
        Ok(Value::Int(n)) => n,
        other => panic!("'{}' is not an int: {:?}", name, other),
    }
}

fn list_len(interpreter: &Interpreter, name: &str) -> usize {
    match interpreter.lookup(name) {
        Ok(Value::List(list)) => list.len(),
        other => panic!("'{}' is not a list: {:?}", name, other),
    }
}

/* ----------------------------- */
/* SIGNALS                       */
/* ----------------------------- */

#[test]
fn emit_runs_every_handler() {
    let interpreter = settle(
        r#"
        list log = [];
        signal done;
        when (done) { append(log, "a"); }
        when (done) { append(log, "b"); }
        when (done) { append(log, "c"); }
        emit done;
        "#,
    );

    assert_eq!(list_len(&interpreter, "log"), 3);
}

#[test]
fn each_emit_dispatches_again() {
    let interpreter = settle(
        r#"
        list log = [];
        signal tick;
        when (tick) { append(log, 1); }
        emit tick;
        emit tick;
        "#,
    );

    assert_eq!(list_len(&interpreter, "log"), 2);
}

#[test]
fn emit_without_handlers_is_a_no_op() {
    settle("signal quiet; emit quiet;");
}

#[test]
fn handlers_see_shared_state() {
    let interpreter = settle(
        r#"
        int seen = 0;
        int value = 42;
        signal go;
        when (go) { seen = value; }
        emit go;
        "#,
    );

    assert_eq!(int(&interpreter, "seen"), 42);
}

#[test]
fn undeclared_and_redeclared_signals() {
    let mut interpreter = Interpreter::new();
    let err = interpreter.run_source("emit nowhere;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::SignalError);

    let mut interpreter = Interpreter::new();
    let err = interpreter.run_source("signal s; signal s;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::SignalError);

    let mut interpreter = Interpreter::new();
    let err = interpreter.run_source("when (s) { }").unwrap_err();
    assert_eq!(err.kind, ErrorKind::SignalError);
}

#[test]
fn handler_errors_are_isolated() {
    let mut interpreter = Interpreter::new();
    let value = interpreter
        .run_source(
            r#"
            int after = 0;
            signal boom;
            when (boom) { throw "bad handler"; }
            emit boom;
            after = 1;
            after;
            "#,
        )
        .unwrap();
    interpreter.wait_for_handlers();

    assert_eq!(value, Value::Int(1));
    assert!(interpreter.is_running());

    let errors = interpreter.handler_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::UserThrown);
    assert_eq!(errors[0].message, "bad handler");
}

/* ----------------------------- */
/* WATCHES                       */
/* ----------------------------- */

#[test]
fn watch_fires_on_assignment() {
    let interpreter = settle(
        r#"
        int x = 0;
        int hits = 0;
        watch (x) { hits += 1; }
        x = 5;
        "#,
    );

    assert_eq!(int(&interpreter, "hits"), 1);
}

#[test]
fn watch_fires_on_compound_assignment() {
    let interpreter = settle(
        r#"
        int x = 0;
        list log = [];
        watch (x) { append(log, x); }
        x += 2;
        "#,
    );

    assert_eq!(list_len(&interpreter, "log"), 1);
}

#[test]
fn watch_ignores_a_shadowing_local() {
    let interpreter = settle(
        r#"
        int x = 0;
        int hits = 0;
        watch (x) { hits += 1; }
        void f() { int x = 1; x = 2; }
        f();
        "#,
    );

    assert_eq!(int(&interpreter, "hits"), 0);
}

#[test]
fn watch_inside_a_function_uses_that_depth() {
    let interpreter = settle(
        r#"
        int hits = 0;
        void f() {
            int local = 0;
            watch (local) { hits += 1; }
            local = 1;
        }
        f();
        "#,
    );

    assert_eq!(int(&interpreter, "hits"), 1);
}

#[test]
fn watch_fires_on_in_place_container_mutation() {
    let interpreter = settle(
        r#"
        list xs = [1, 2];
        list log = [];
        watch (xs) { append(log, 1); }
        xs[0] = 10;
        append(xs, 3);
        "#,
    );

    assert_eq!(list_len(&interpreter, "log"), 2);
}

#[test]
fn watch_on_dictionary_entries() {
    let interpreter = settle(
        r#"
        dict d = {"a": 1};
        int hits = 0;
        watch (d) { hits += 1; }
        d["b"] = 2;
        "#,
    );

    assert_eq!(int(&interpreter, "hits"), 1);
}

#[test]
fn watch_requires_a_declared_variable() {
    let mut interpreter = Interpreter::new();
    let err = interpreter.run_source("watch (ghost) { }").unwrap_err();
    assert_eq!(err.kind, ErrorKind::NameError);
}
