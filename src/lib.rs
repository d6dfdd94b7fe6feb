/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     lib.rs
 * Purpose:  Library root for the MUNI interpreter.
 *
 * Pipeline:
 *   Source -> Lexer -> Tokens -> Parser -> AST -> Interpreter
 *
 * The binary in main.rs is a thin shell over parse_source / Interpreter.
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

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod stdlib;
pub mod types;
pub mod value;

pub use config::InterpreterConfig;
pub use error::{ErrorKind, MuniError, MuniResult};
pub use interpreter::Interpreter;
pub use span::Span;
pub use types::TypeSpec;
pub use value::Value;

use crate::ast::Stmt;

/// Lexes and parses `source` into its top-level statements.
pub fn parse_source(source: &str) -> MuniResult<Vec<Stmt>> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(tokens)
}

/// Runs `source` in a fresh interpreter with default configuration and
/// waits for every signal or watch handler it started.
///
/// Returns the value of the last top-level statement.
pub fn run_source(source: &str) -> MuniResult<Value> {
    let mut interpreter = Interpreter::new();
    let result = interpreter.run_source(source);
    interpreter.wait_for_handlers();
    result
}
