/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     parser/helpers.rs
 * Purpose:  Shared helpers for the MUNI parser.
 *
 * Token cursor movement, lookahead, required-token consumption and
 * type specifier parsing shared by the statement and expression grammars.
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

use crate::error::{MuniError, MuniResult};
use crate::lexer::keywords::is_type_keyword;
use crate::lexer::token::{Token, TokenKind};
use crate::parser::parser::Parser;
use crate::types::TypeSpec;

impl Parser {
    /* ----------------------------- */
    /* CURSOR                        */
    /* ----------------------------- */

    /// Token under the cursor.
    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Looks `offset` tokens ahead, clamped to the trailing EOF.
    pub(crate) fn peek_at(&self, offset: usize) -> &Token {
        &self.tokens[(self.current + offset).min(self.tokens.len() - 1)]
    }

    /// Advances one token forward and returns the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /* ----------------------------- */
    /* MATCHING                      */
    /* ----------------------------- */

    /// Checks for a symbol or keyword without consuming it.
    pub(crate) fn check(&self, text: &str) -> bool {
        self.peek().is(text)
    }

    /// Consumes the symbol or keyword if present.
    pub(crate) fn match_text(&mut self, text: &str) -> bool {
        if self.check(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the first of `options` that matches, returning its token.
    pub(crate) fn match_any(&mut self, options: &[&str]) -> Option<Token> {
        if options.iter().any(|text| self.check(text)) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consumes a required symbol or keyword.
    pub(crate) fn consume(&mut self, text: &str, context: &str) -> MuniResult<Token> {
        if self.check(text) {
            Ok(self.advance())
        } else {
            Err(self.error_here(format!("expected '{}' {}", text, context)))
        }
    }

    /// Consumes and returns an identifier.
    pub(crate) fn consume_identifier(&mut self, context: &str) -> MuniResult<String> {
        if self.peek().kind == TokenKind::Identifier {
            Ok(self.advance().lexeme)
        } else {
            Err(self.error_here(format!("expected identifier {}", context)))
        }
    }

    /// `SyntaxError` pointing at the current token.
    pub(crate) fn error_here(&self, message: impl Into<String>) -> MuniError {
        let token = self.peek();
        MuniError::syntax_error(
            format!("{}, found {}", message.into(), token),
            token.span,
        )
    }

    /* ----------------------------- */
    /* TYPE SPECIFIERS               */
    /* ----------------------------- */

    /// True when the token `offset` ahead can start a type specifier.
    pub(crate) fn type_starts_at(&self, offset: usize) -> bool {
        let token = self.peek_at(offset);
        match token.kind {
            TokenKind::Keyword => is_type_keyword(&token.lexeme),
            TokenKind::Symbol => token.lexeme == "?",
            _ => false,
        }
    }

    /// Parses `int`, `?`, `list`, `list<T>`, `dict`, `dict<K, V>` and so on.
    pub(crate) fn type_spec(&mut self) -> MuniResult<TypeSpec> {
        if !self.type_starts_at(0) {
            return Err(self.error_here("expected type"));
        }

        let token = self.advance();
        let spec = match token.lexeme.as_str() {
            "list" if self.match_text("<") => {
                let elem = self.type_spec()?;
                self.consume(">", "to close list type")?;
                TypeSpec::List(Box::new(elem))
            }
            "dict" if self.match_text("<") => {
                let key = self.type_spec()?;
                self.consume(",", "between dict key and value types")?;
                let value = self.type_spec()?;
                self.consume(">", "to close dict type")?;
                TypeSpec::Dict(Box::new(key), Box::new(value))
            }
            other => TypeSpec::parse(other),
        };

        Ok(spec)
    }
}
