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

/// A source location attached to tokens, syntax nodes and errors.
///
/// Lines are 1-based. A `line` of `0` means "unknown", which is what the
/// value model produces when it raises an error; the evaluator fills the
/// location in as the error passes back through the node being evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// 1-based line number, `0` when unknown.
    pub line: usize,

    /// 1-based column, when the front end recorded one.
    pub column: Option<usize>,
}

impl Span {
    /// A location with no line or column information.
    pub const UNKNOWN: Span = Span { line: 0, column: None };

    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }

    /// A location that only knows its line.
    pub const fn line(line: usize) -> Self {
        Self { line, column: None }
    }

    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.line)?;
        if let Some(column) = self.column {
            write!(f, ", column {}", column)?;
        }
        Ok(())
    }
}
