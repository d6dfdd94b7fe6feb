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

use thiserror::Error;

use crate::span::Span;

/// The closed set of failure categories a MUNI program can hit.
///
/// The name of each kind is what users see at the front of an error line,
/// e.g. `DivisionByZero at line 3: division by zero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Undeclared variable or function.
    NameError,
    /// Declared-type violation on declaration, assignment or insertion.
    TypeError,
    /// Explicit cast that cannot produce the requested type.
    InvalidCast,
    /// Operator applied to kinds it is not defined for.
    UnsupportedOperand,
    DivisionByZero,
    ModulusByZero,
    /// Container index out of range or of the wrong kind.
    IndexError,
    /// Module or library could not be resolved.
    ImportError,
    /// Signal redeclared, or used before declaration.
    SignalError,
    /// Syntax tree shape the evaluator does not understand.
    UnknownNode,
    /// Raised by a `throw` statement.
    UserThrown,
    /// Lexer or parser failure.
    SyntaxError,
    /// Everything else the runtime can hit (overflow, recursion limit, I/O).
    RuntimeError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NameError => "NameError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::InvalidCast => "InvalidCast",
            ErrorKind::UnsupportedOperand => "UnsupportedOperand",
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::ModulusByZero => "ModulusByZero",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::ImportError => "ImportError",
            ErrorKind::SignalError => "SignalError",
            ErrorKind::UnknownNode => "UnknownNode",
            ErrorKind::UserThrown => "UserThrown",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::RuntimeError => "RuntimeError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error type used by every stage of the interpreter.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", self.render())]
pub struct MuniError {
    /// Failure category.
    pub kind: ErrorKind,

    /// Human-readable error message.
    pub message: String,

    /// Where the failure happened, `Span::UNKNOWN` until the evaluator
    /// attaches the node being evaluated.
    pub span: Span,

    /// Optional note / help text.
    pub help: Option<String>,
}

/// Convenient alias for interpreter results.
pub type MuniResult<T> = Result<T, MuniError>;

impl MuniError {
    /// Generic constructor
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: Span::UNKNOWN,
            help: None,
        }
    }

    pub fn name_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn invalid_cast(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidCast, message)
    }

    /// Operator applied to two incompatible kinds.
    pub fn unsupported_operand(operator: &str, left: &str, right: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedOperand,
            format!(
                "unsupported operand type(s) for {}: '{}' and '{}'",
                operator, left, right
            ),
        )
    }

    /// Unary operator applied to a kind it is not defined for.
    pub fn unsupported_unary(operator: &str, operand: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedOperand,
            format!("unsupported operand type for unary {}: '{}'", operator, operand),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "division by zero")
    }

    pub fn modulus_by_zero() -> Self {
        Self::new(ErrorKind::ModulusByZero, "modulus by zero")
    }

    pub fn index_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IndexError, message)
    }

    pub fn import_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ImportError, message)
    }

    pub fn signal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SignalError, message)
    }

    pub fn unknown_node(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownNode, message)
    }

    pub fn user_thrown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UserThrown, message)
    }

    /// Front-end error; always carries a location.
    pub fn syntax_error(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::SyntaxError, message).with_span(span)
    }

    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RuntimeError, message)
    }

    /// Attach a help message to the error (builder-style).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Overwrite the location.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Attach `span` only if the error does not know where it happened yet.
    ///
    /// The innermost node an error passes through wins.
    pub fn or_at(mut self, span: Span) -> Self {
        if !self.span.is_known() {
            self.span = span;
        }
        self
    }

    /// `"<Kind> at line L[, column C]: <message>"`, location omitted when unknown.
    pub fn render(&self) -> String {
        if self.span.is_known() {
            format!("{} at {}: {}", self.kind, self.span, self.message)
        } else {
            format!("{}: {}", self.kind, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_line_and_column() {
        let err = MuniError::division_by_zero().with_span(Span::new(4, 12));
        assert_eq!(err.to_string(), "DivisionByZero at line 4, column 12: division by zero");
    }

    #[test]
    fn renders_line_only() {
        let err = MuniError::name_error("variable 'x' is not defined").with_span(Span::line(2));
        assert_eq!(err.to_string(), "NameError at line 2: variable 'x' is not defined");
    }

    #[test]
    fn innermost_location_wins() {
        let err = MuniError::type_error("boom")
            .or_at(Span::line(3))
            .or_at(Span::line(1));
        assert_eq!(err.span, Span::line(3));
    }
}
