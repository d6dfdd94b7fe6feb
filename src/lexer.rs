/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     lexer.rs
 * Purpose:  Lexical analysis
 *
 * The lexer turns MUNI source text into a flat token stream:
 *
 *     Source Code -> Lexer -> Token -> Parser -> AST
 *
 *  - lexer.rs    -> the character scanner
 *  - token.rs    -> token kinds and the Token struct
 *  - keywords.rs -> reserved word table *
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

pub mod keywords;
#[allow(clippy::module_inception)]
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

use crate::error::MuniResult;

/// Convenience wrapper: scan a whole source string.
pub fn tokenize(source: &str) -> MuniResult<Vec<Token>> {
    Lexer::new(source).scan_tokens()
}
