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

/// Determines whether a given identifier is a **reserved keyword** in MUNI.
///
/// Type names are keywords too, which is how the parser tells a
/// declaration (`int x = 1;`) from an expression statement.
pub fn is_keyword(word: &str) -> bool {
    is_type_keyword(word)
        || matches!(
            word,
            "if" | "else"
                | "while"
                | "until"
                | "for"
                | "in"
                | "switch"
                | "case"
                | "default"
                | "break"
                | "return"
                | "throw"
                | "import"
                | "as"
                | "signal"
                | "emit"
                | "when"
                | "watch"
                | "true"
                | "false"
        )
}

/// Keywords that start a type specifier.
pub fn is_type_keyword(word: &str) -> bool {
    matches!(
        word,
        "int" | "float" | "complex" | "string" | "boolean" | "void" | "list" | "dict"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_are_keywords() {
        assert!(is_keyword("int"));
        assert!(is_keyword("dict"));
        assert!(is_keyword("watch"));
        assert!(!is_keyword("total"));
        assert!(!is_type_keyword("while"));
    }
}
