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

/// A declared type specifier, as written in declarations, parameters,
/// return types and casts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSpec {
    Int,
    Float,
    Complex,
    Boolean,
    String,
    Void,
    /// `?`, the "no declared type" marker. Accepts every value unchecked.
    Untyped,
    List(Box<TypeSpec>),
    Dict(Box<TypeSpec>, Box<TypeSpec>),
    /// A name the front end did not recognise. Kept so that casting to it
    /// fails at run time with `InvalidCast` instead of at parse time.
    Unknown(String),
}

impl TypeSpec {
    /// `list` with no element parameter.
    pub fn untyped_list() -> Self {
        TypeSpec::List(Box::new(TypeSpec::Untyped))
    }

    /// `dict` with no key/value parameters.
    pub fn untyped_dict() -> Self {
        TypeSpec::Dict(Box::new(TypeSpec::Untyped), Box::new(TypeSpec::Untyped))
    }

    /// Parses a textual specifier such as `int`, `list<float>` or
    /// `dict<string, list<int>>`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        if let Some(inner) = strip_generic(text, "list") {
            return TypeSpec::List(Box::new(TypeSpec::parse(inner)));
        }

        if let Some(inner) = strip_generic(text, "dict") {
            return match split_top_level(inner) {
                Some((key, value)) => TypeSpec::Dict(
                    Box::new(TypeSpec::parse(key)),
                    Box::new(TypeSpec::parse(value)),
                ),
                None => TypeSpec::Unknown(text.to_string()),
            };
        }

        match text {
            "int" => TypeSpec::Int,
            "float" => TypeSpec::Float,
            "complex" => TypeSpec::Complex,
            "boolean" => TypeSpec::Boolean,
            "string" => TypeSpec::String,
            "void" => TypeSpec::Void,
            "?" | "untyped" => TypeSpec::Untyped,
            "list" => TypeSpec::untyped_list(),
            "dict" => TypeSpec::untyped_dict(),
            other => TypeSpec::Unknown(other.to_string()),
        }
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, TypeSpec::Untyped)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeSpec::Int | TypeSpec::Float | TypeSpec::Complex)
    }

    /// Tag stored on containers: `"UNTYPED"` for `?`, the specifier text otherwise.
    pub fn tag_name(&self) -> String {
        match self {
            TypeSpec::Untyped => "UNTYPED".to_string(),
            other => other.to_string(),
        }
    }
}

/// `list<...>` / `dict<...>` body, if `text` has that shape.
fn strip_generic<'a>(text: &'a str, head: &str) -> Option<&'a str> {
    text.strip_prefix(head)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

/// Splits `K, V` at the first comma not nested inside `<>`.
fn split_top_level(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some((&text[..i], &text[i + 1..])),
            _ => {}
        }
    }
    None
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Int => write!(f, "int"),
            TypeSpec::Float => write!(f, "float"),
            TypeSpec::Complex => write!(f, "complex"),
            TypeSpec::Boolean => write!(f, "boolean"),
            TypeSpec::String => write!(f, "string"),
            TypeSpec::Void => write!(f, "void"),
            TypeSpec::Untyped => write!(f, "?"),
            TypeSpec::List(elem) if elem.is_untyped() => write!(f, "list"),
            TypeSpec::List(elem) => write!(f, "list<{}>", elem),
            TypeSpec::Dict(k, v) if k.is_untyped() && v.is_untyped() => write!(f, "dict"),
            TypeSpec::Dict(k, v) => write!(f, "dict<{}, {}>", k, v),
            TypeSpec::Unknown(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_scalars() {
        assert_eq!(TypeSpec::parse("int"), TypeSpec::Int);
        assert_eq!(TypeSpec::parse("?"), TypeSpec::Untyped);
        assert_eq!(TypeSpec::parse("number"), TypeSpec::Unknown("number".into()));
    }

    #[test]
    fn parses_nested_generics() {
        let spec = TypeSpec::parse("dict<string, list<int>>");
        assert_eq!(
            spec,
            TypeSpec::Dict(
                Box::new(TypeSpec::String),
                Box::new(TypeSpec::List(Box::new(TypeSpec::Int)))
            )
        );
        assert_eq!(spec.to_string(), "dict<string, list<int>>");
    }

    #[test]
    fn untyped_tag() {
        assert_eq!(TypeSpec::Untyped.tag_name(), "UNTYPED");
        assert_eq!(TypeSpec::untyped_list().to_string(), "list");
    }
}
