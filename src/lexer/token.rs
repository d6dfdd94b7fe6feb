/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
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

use std::fmt;

use crate::span::Span;

/// Represents the **category of a lexical token** in the MUNI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Integer or float literal: `42`, `3.14`, `1e-3`.
    Number,

    /// Imaginary literal; the lexeme excludes the trailing `j`.
    Imaginary,

    /// String literal; the lexeme holds the unescaped contents.
    String,

    /// A user-defined name.
    Identifier,

    /// A reserved word, see `keywords.rs`.
    Keyword,

    /// Operators and punctuation: `+=`, `->`, `...`, `{`, `;`.
    Symbol,

    /// The `<...>` target right after `import`, without the brackets.
    ImportPath,

    /// End-of-file marker, always the final token.
    Eof,
}

/// Represents a **single lexical token** produced by the MUNI lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,

    /// Source text, or the decoded value for strings.
    pub lexeme: String,

    /// Line and column of the first character.
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// True for a symbol or keyword with exactly this text.
    pub fn is(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Symbol | TokenKind::Keyword) && self.lexeme == text
    }
}

impl fmt::Display for Token {
    /// Prints what the user wrote, for error messages.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::String => write!(f, "\"{}\"", self.lexeme),
            TokenKind::ImportPath => write!(f, "<{}>", self.lexeme),
            TokenKind::Imaginary => write!(f, "{}j", self.lexeme),
            _ => write!(f, "{}", self.lexeme),
        }
    }
}
