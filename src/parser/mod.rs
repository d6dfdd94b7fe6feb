/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     parser/mod.rs
 * Purpose:  Root module for the MUNI recursive-descent parser.
 *
 * Wires the recursive-descent parser together:
 *   - parser.rs      the Parser cursor and the parse() entry point
 *   - statements.rs  statement grammar
 *   - expressions.rs expression grammar and operator precedence
 *   - helpers.rs     token matching and type specifiers
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

/// Core parser orchestration: owns the `Parser` struct and `parse(tokens)`.
#[allow(clippy::module_inception)]
pub mod parser;

/// Statement-level parsing: declarations, control flow, reactive blocks.
pub mod statements;

/// Expression-level parsing, loosest to tightest:
/// logical or/xor -> and -> equality -> comparison -> range -> term ->
/// factor -> unary/cast -> postfix index -> primary
pub mod expressions;

/// Shared parser helpers: token matching, consumption, type specifiers.
pub mod helpers;

pub use parser::{parse, Parser};
