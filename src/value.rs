/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     value.rs
 * Purpose:  Runtime value representation
 *
 * This module defines the closed set of runtime values that flow through
 * the evaluator:
 *
 *  - Scalars: int, float, complex, boolean, string
 *  - Markers: void and `?` (untyped)
 *  - Containers: typed lists and dictionaries, shared by reference
 *
 * Arithmetic lives in `ops.rs`, casts and implicit conversion in
 * `cast.rs`, and the shared container handles in `container.rs`. *
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

pub mod cast;
pub mod container;
pub mod ops;

use std::fmt;

use crate::error::{MuniError, MuniResult};
use crate::types::TypeSpec;

pub use container::{DictRef, ListRef};

/// MUNI runtime value representation.
///
/// Scalars are plain data and copy on clone. Lists and dictionaries are
/// handles: cloning a `Value::List` yields another handle to the same
/// storage, which is what lets in-place mutation reach every variable
/// bound to the container.
#[derive(Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    /// Real and imaginary parts.
    Complex(f64, f64),
    Boolean(bool),
    String(String),
    Void,
    Untyped,
    List(ListRef),
    Dict(DictRef),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Float(n) => write!(f, "Float({:?})", n),
            Value::Complex(re, im) => write!(f, "Complex({:?}, {:?})", re, im),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Void => write!(f, "Void"),
            Value::Untyped => write!(f, "Untyped"),
            Value::List(list) => write!(f, "List<{}>{}", list.elem_type(), self),
            Value::Dict(_) => write!(f, "Dict{}", self),
        }
    }
}

impl Value {
    /// Returns a stable type name string (useful for errors).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex(..) => "complex",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
            Value::Void => "void",
            Value::Untyped => "?",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
        }
    }

    /// The type a plain assignment to a variable holding this value must
    /// convert to.
    pub fn runtime_type(&self) -> TypeSpec {
        match self {
            Value::Int(_) => TypeSpec::Int,
            Value::Float(_) => TypeSpec::Float,
            Value::Complex(..) => TypeSpec::Complex,
            Value::Boolean(_) => TypeSpec::Boolean,
            Value::String(_) => TypeSpec::String,
            Value::Void => TypeSpec::Void,
            Value::Untyped => TypeSpec::Untyped,
            Value::List(list) => TypeSpec::List(Box::new(list.elem_type())),
            Value::Dict(dict) => {
                let (key, value) = dict.tags();
                TypeSpec::Dict(Box::new(key), Box::new(value))
            }
        }
    }

    /// The value a declaration without an initializer starts with.
    pub fn zero_of(spec: &TypeSpec) -> MuniResult<Value> {
        Ok(match spec {
            TypeSpec::Int => Value::Int(0),
            TypeSpec::Float => Value::Float(0.0),
            TypeSpec::Complex => Value::Complex(0.0, 0.0),
            TypeSpec::Boolean => Value::Boolean(false),
            TypeSpec::String => Value::String(String::new()),
            TypeSpec::Void => Value::Void,
            TypeSpec::Untyped => Value::Untyped,
            TypeSpec::List(elem) => Value::List(ListRef::new(Vec::new(), (**elem).clone())),
            TypeSpec::Dict(key, value) => {
                Value::Dict(DictRef::new((**key).clone(), (**value).clone()))
            }
            TypeSpec::Unknown(name) => {
                return Err(MuniError::type_error(format!("unknown type '{}'", name)))
            }
        })
    }

    /// Builds an untyped list value.
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(ListRef::new(items, TypeSpec::Untyped))
    }

    /// MUNI truthiness: zeros, empty strings and containers, `void` and
    /// `?` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0 && !n.is_nan(),
            Value::Complex(re, im) => *re != 0.0 || *im != 0.0,
            Value::Boolean(b) => *b,
            Value::String(s) => !s.is_empty(),
            Value::Void | Value::Untyped => false,
            Value::List(list) => !list.is_empty(),
            Value::Dict(dict) => !dict.is_empty(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Complex(..))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Int or float widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Value equality that never fails: numerics compare by magnitude
    /// across kinds, containers element-wise, everything else by kind and
    /// content. Used for dictionary keys, `switch` matching and list search.
    pub fn same_value(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Complex(..), _) | (_, Value::Complex(..)) => {
                match (a.as_complex(), b.as_complex()) {
                    (Some(x), Some(y)) => x == y,
                    _ => false,
                }
            }
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                a.as_f64() == b.as_f64()
            }
            (Value::Boolean(x), Value::Boolean(y)) => x == y,
            (Value::String(x), Value::String(y)) => x == y,
            (Value::Void, Value::Void) | (Value::Untyped, Value::Untyped) => true,
            (Value::List(x), Value::List(y)) => {
                if x.ptr_eq(y) {
                    return true;
                }
                let (xs, ys) = (x.items(), y.items());
                xs.len() == ys.len() && xs.iter().zip(&ys).all(|(l, r)| Value::same_value(l, r))
            }
            (Value::Dict(x), Value::Dict(y)) => {
                if x.ptr_eq(y) {
                    return true;
                }
                let (xs, ys) = (x.entries(), y.entries());
                xs.len() == ys.len()
                    && xs.iter().all(|(key, value)| {
                        ys.iter()
                            .any(|(k, v)| Value::same_value(key, k) && Value::same_value(value, v))
                    })
            }
            _ => false,
        }
    }

    /// Numeric value lifted onto the complex plane.
    pub(crate) fn as_complex(&self) -> Option<(f64, f64)> {
        match self {
            Value::Int(n) => Some((*n as f64, 0.0)),
            Value::Float(n) => Some((*n, 0.0)),
            Value::Complex(re, im) => Some((*re, *im)),
            _ => None,
        }
    }

    /// String form used inside containers: strings are quoted.
    pub fn repr(&self) -> String {
        match self {
            Value::String(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}

/// Floats always show a fractional part (`2.0`), like the canonical MUNI form.
pub fn format_float(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", format_float(*n)),
            Value::Complex(re, im) => {
                if *im < 0.0 {
                    write!(f, "{} - {}j", format_float(*re), format_float(-im))
                } else {
                    write!(f, "{} + {}j", format_float(*re), format_float(*im))
                }
            }
            Value::Boolean(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{}", s),
            Value::Void => write!(f, "void"),
            Value::Untyped => write!(f, "?"),
            Value::List(list) => {
                let inner = list
                    .items()
                    .iter()
                    .map(Value::repr)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{}]", inner)
            }
            Value::Dict(dict) => {
                let inner = dict
                    .entries()
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.repr(), v.repr()))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{{{}}}", inner)
            }
        }
    }
}
