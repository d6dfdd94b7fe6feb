/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     diagnostics.rs
 * Purpose:  Human-friendly error diagnostics.
 *
 * Renders a MuniError the way the CLI shows it: the error line, the
 * offending source line, a caret under the column, and an optional help line.
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

use crate::error::MuniError;
use std::io::{self, Write};

/// Renders compiler-style diagnostics for MUNI errors.
///
/// ```text
/// DivisionByZero at line 3, column 11: division by zero
///   --> main.mun:3:11
///    |
///  3 | int y = x / 0;
///    |           ^
/// help: ...
/// ```
pub struct DiagnosticPrinter {
    /// Name of the source file, for display only.
    file_name: String,

    /// Full source text, so the offending line can be shown.
    source: String,
}

impl DiagnosticPrinter {
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
        }
    }

    /// Builds the full diagnostic text.
    pub fn render(&self, error: &MuniError) -> String {
        let mut out = format!("{}\n", error);
        let line = error.span.line;

        if let Some(src_line) = line
            .checked_sub(1)
            .and_then(|index| self.source.lines().nth(index))
        {
            let column = error.span.column.unwrap_or(1);
            out.push_str(&format!("  --> {}:{}:{}\n", self.file_name, line, column));
            out.push_str("   |\n");
            out.push_str(&format!("{:>3} | {}\n", line, src_line));

            if error.span.column.is_some() {
                // Tabs keep their width so the caret lines up.
                let pad: String = src_line
                    .chars()
                    .take(column.saturating_sub(1))
                    .map(|c| if c == '\t' { '\t' } else { ' ' })
                    .collect();
                out.push_str(&format!("   | {}^\n", pad));
            }
        } else {
            out.push_str(&format!("  --> {}\n", self.file_name));
        }

        if let Some(help) = &error.help {
            out.push_str(&format!("help: {}\n", help));
        }

        out
    }

    /// Prints the diagnostic to stderr.
    pub fn print(&self, error: &MuniError) {
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(self.render(error).as_bytes());
        let _ = stderr.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn caret_under_column() {
        let printer = DiagnosticPrinter::new("main.mun", "int x = 1;\nint y = x / 0;\n");
        let err = MuniError::division_by_zero().with_span(Span::new(2, 11));

        assert_eq!(
            printer.render(&err),
            "DivisionByZero at line 2, column 11: division by zero\n  \
             --> main.mun:2:11\n   |\n  2 | int y = x / 0;\n   |           ^\n"
        );
    }

    #[test]
    fn help_line_and_unknown_location() {
        let printer = DiagnosticPrinter::new("main.mun", "");
        let err = MuniError::import_error("module 'x.mun' not found").with_help("check module_paths");

        let text = printer.render(&err);
        assert!(text.starts_with("ImportError: module 'x.mun' not found\n  --> main.mun\n"));
        assert!(text.ends_with("help: check module_paths\n"));
    }
}
