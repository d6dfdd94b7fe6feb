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

use crate::error::{MuniError, MuniResult};
use crate::lexer::keywords::is_keyword;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// Character scanner for MUNI source.
pub struct Lexer {
    chars: Vec<char>,
    current: usize,
    line: usize,
    /// Index of the first character of the current line.
    line_start: usize,
    /// Position of the first character of the token being scanned.
    token_start: usize,
    token_line: usize,
    token_column: usize,
    /// Set right after the `import` keyword, where `<` opens a path.
    expect_import_path: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    /// Creates a new MUNI lexer instance from raw source code.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            current: 0,
            line: 1,
            line_start: 0,
            token_start: 0,
            token_line: 1,
            token_column: 1,
            expect_import_path: false,
            tokens: Vec::new(),
        }
    }

    /// Performs complete lexical analysis over the entire source input.
    ///
    /// Whitespace and comments are skipped. The result always ends with a
    /// `TokenKind::Eof` marker.
    pub fn scan_tokens(mut self) -> MuniResult<Vec<Token>> {
        while !self.is_at_end() {
            self.token_start = self.current;
            self.token_line = self.line;
            self.token_column = self.current - self.line_start + 1;
            self.scan_token()?;
        }

        let eof_span = Span::new(self.line, self.current - self.line_start + 1);
        self.tokens.push(Token::new(TokenKind::Eof, "", eof_span));
        Ok(self.tokens)
    }

    /// Scans and emits a single token from the source stream.
    fn scan_token(&mut self) -> MuniResult<()> {
        let ch = self.advance();

        match ch {
            // Whitespace
            ' ' | '\r' | '\t' => {}
            '\n' => self.newline(),

            // Comments
            '#' => {
                while self.peek() != '\n' && !self.is_at_end() {
                    self.advance();
                }
            }
            '/' if self.peek() == '*' => {
                self.advance();
                self.block_comment()?;
            }

            // Import target: import <math:lib>;
            '<' if self.expect_import_path => self.import_path()?,

            // Ranges
            '.' => {
                if self.match_char('.') {
                    if self.match_char('.') {
                        self.push_symbol("...");
                    } else {
                        self.push_symbol("..");
                    }
                } else {
                    self.push_symbol(".");
                }
            }

            // Arrow and compound assignment
            '-' => {
                if self.match_char('>') {
                    self.push_symbol("->");
                } else {
                    self.symbol_or_assign(ch);
                }
            }
            '+' | '*' | '/' | '%' => self.symbol_or_assign(ch),

            // Comparison and equality
            '!' | '=' | '<' | '>' => self.symbol_or_assign(ch),

            // Strings
            '"' | '\'' => self.string_with_delimiter(ch)?,

            // Numbers
            '0'..='9' => self.number()?,

            // Identifiers / keywords
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            // Single-char symbols
            '&' | '|' | '^' | '?' | '(' | ')' | '{' | '}' | '[' | ']' | ',' | ';' | ':' => {
                self.push_symbol(&ch.to_string())
            }

            other => {
                return Err(MuniError::syntax_error(
                    format!("unexpected character '{}'", other),
                    self.token_span(),
                ))
            }
        }

        Ok(())
    }

    /// `op` or `op=`.
    fn symbol_or_assign(&mut self, ch: char) {
        let mut lexeme = ch.to_string();
        if self.match_char('=') {
            lexeme.push('=');
        }
        self.push_symbol(&lexeme);
    }

    fn string_with_delimiter(&mut self, delimiter: char) -> MuniResult<()> {
        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Err(MuniError::syntax_error(
                    "unterminated string",
                    self.token_span(),
                ));
            }

            let ch = self.advance();
            match ch {
                c if c == delimiter => break,
                '\n' => {
                    self.newline();
                    value.push('\n');
                }
                '\\' => {
                    let escaped = match self.advance_checked() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        Some('\'') => '\'',
                        Some(other) => {
                            return Err(MuniError::syntax_error(
                                format!("unknown escape sequence '\\{}'", other),
                                self.here(),
                            ))
                        }
                        None => {
                            return Err(MuniError::syntax_error(
                                "unterminated string",
                                self.token_span(),
                            ))
                        }
                    };
                    value.push(escaped);
                }
                other => value.push(other),
            }
        }

        self.push(TokenKind::String, value);
        Ok(())
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text: String = self.chars[self.token_start..self.current].iter().collect();
        let kind = if is_keyword(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        let opens_import = text == "import";
        self.push(kind, text);
        self.expect_import_path = opens_import;
    }

    /// Integers, floats with optional exponent, and imaginary literals.
    fn number(&mut self) -> MuniResult<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        if matches!(self.peek(), 'e' | 'E') {
            let sign = matches!(self.peek_next(), '+' | '-');
            let digit_at = if sign { self.current + 2 } else { self.current + 1 };
            if self.chars.get(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.current = digit_at;
                while self.peek().is_ascii_digit() {
                    self.advance();
                }
            }
        }

        let text: String = self.chars[self.token_start..self.current].iter().collect();

        if self.peek() == 'j' {
            self.advance();
            self.push(TokenKind::Imaginary, text);
        } else {
            self.push(TokenKind::Number, text);
        }

        if self.peek().is_alphabetic() || self.peek() == '_' {
            return Err(MuniError::syntax_error(
                format!("invalid number literal near '{}'", self.peek()),
                self.here(),
            ));
        }
        Ok(())
    }

    fn import_path(&mut self) -> MuniResult<()> {
        let mut path = String::new();
        loop {
            match self.advance_checked() {
                Some('>') => break,
                Some('\n') | None => {
                    return Err(MuniError::syntax_error(
                        "unterminated import path, expected '>'",
                        self.token_span(),
                    ))
                }
                Some(ch) => path.push(ch),
            }
        }
        self.push(TokenKind::ImportPath, path.trim());
        Ok(())
    }

    fn block_comment(&mut self) -> MuniResult<()> {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return Ok(());
            }
            if self.advance() == '\n' {
                self.newline();
            }
        }

        Err(MuniError::syntax_error(
            "unterminated block comment",
            self.token_span(),
        ))
    }

    /* ----------------------------- */
    /* CURSOR HELPERS                */
    /* ----------------------------- */

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>) {
        self.tokens.push(Token::new(kind, lexeme, self.token_span()));
        self.expect_import_path = false;
    }

    fn push_symbol(&mut self, lexeme: &str) {
        self.push(TokenKind::Symbol, lexeme);
    }

    fn token_span(&self) -> Span {
        Span::new(self.token_line, self.token_column)
    }

    /// Location of the character just consumed.
    fn here(&self) -> Span {
        Span::new(self.line, self.current.saturating_sub(self.line_start).max(1))
    }

    fn newline(&mut self) {
        self.line += 1;
        self.line_start = self.current;
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != expected || self.is_at_end() {
            return false;
        }
        self.current += 1;
        true
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.current += 1;
        ch
    }

    fn advance_checked(&mut self) -> Option<char> {
        if self.is_at_end() {
            None
        } else {
            Some(self.advance())
        }
    }

    fn peek(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lexemes(source: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.lexeme))
            .collect()
    }

    #[test]
    fn declaration_tokens() {
        let tokens = lexemes("int x = 5;");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "int".into()),
                (TokenKind::Identifier, "x".into()),
                (TokenKind::Symbol, "=".into()),
                (TokenKind::Number, "5".into()),
                (TokenKind::Symbol, ";".into()),
                (TokenKind::Eof, "".into()),
            ]
        );
    }

    #[test]
    fn ranges_do_not_swallow_dots() {
        let kinds: Vec<String> = lexemes("0..5 0...5 1.5").into_iter().map(|t| t.1).collect();
        assert_eq!(kinds, vec!["0", "..", "5", "0", "...", "5", "1.5", ""]);
    }

    #[test]
    fn numbers_exponents_and_imaginaries() {
        let tokens = lexemes("1e3 2.5e-1 3j 1.5j");
        assert_eq!(tokens[0], (TokenKind::Number, "1e3".into()));
        assert_eq!(tokens[1], (TokenKind::Number, "2.5e-1".into()));
        assert_eq!(tokens[2], (TokenKind::Imaginary, "3".into()));
        assert_eq!(tokens[3], (TokenKind::Imaginary, "1.5".into()));
    }

    #[test]
    fn import_paths() {
        let tokens = lexemes("import <math:lib> as m; x < y");
        assert_eq!(tokens[1], (TokenKind::ImportPath, "math:lib".into()));
        assert_eq!(tokens[2], (TokenKind::Keyword, "as".into()));
        assert_eq!(tokens[6], (TokenKind::Symbol, "<".into()));
    }

    #[test]
    fn comments_and_escapes() {
        let tokens = lexemes("# note\n\"a\\n\\\"b\" /* multi\nline */ x");
        assert_eq!(tokens[0], (TokenKind::String, "a\n\"b".into()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "x".into()));
    }

    #[test]
    fn compound_operators() {
        let kinds: Vec<String> = lexemes("+= -= *= /= %= == != <= >= ->")
            .into_iter()
            .map(|t| t.1)
            .collect();
        assert_eq!(
            kinds,
            vec!["+=", "-=", "*=", "/=", "%=", "==", "!=", "<=", ">=", "->", ""]
        );
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens = Lexer::new("int a;\n  a = 2;").scan_tokens().unwrap();
        assert_eq!(tokens[3].span, Span::new(2, 3));
        assert_eq!(tokens[5].span, Span::new(2, 7));
    }

    #[test]
    fn unterminated_string_is_a_syntax_error() {
        let err = Lexer::new("string s = \"oops").scan_tokens().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::SyntaxError);
        assert_eq!(err.span, Span::new(1, 12));
    }
}
