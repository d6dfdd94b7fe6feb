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

//! Conversions between value kinds.
//!
//! Two flavours exist:
//!
//!  - `cast_to` is the explicit `type -> expr` operator. It is total over the
//!    scalar kinds, parses strings, and fails only with `InvalidCast`.
//!  - `coerce_to` is the implicit conversion applied on declaration,
//!    assignment, parameter binding and container insertion. It only widens
//!    (`int -> float -> complex`) and fails with `TypeError`.

use crate::error::{MuniError, MuniResult};
use crate::types::TypeSpec;
use crate::value::{DictRef, ListRef, Value};

impl Value {
    /// Explicit cast to `target`.
    pub fn cast_to(&self, target: &TypeSpec) -> MuniResult<Value> {
        if let TypeSpec::Unknown(name) = target {
            return Err(MuniError::invalid_cast(format!(
                "cannot cast to unknown type '{}'",
                name
            )));
        }

        match (target, self) {
            (TypeSpec::Untyped, value) => Ok(value.clone()),
            (TypeSpec::Void, _) => Ok(Value::Void),
            (_, Value::Void | Value::Untyped) => Value::zero_of(target),

            (TypeSpec::String, value) => Ok(Value::String(value.to_string())),
            (TypeSpec::Boolean, value) => Ok(Value::Boolean(cast_boolean(value))),
            (TypeSpec::Int, value) => cast_int(value),
            (TypeSpec::Float, value) => cast_float(value).map(Value::Float),
            (TypeSpec::Complex, value) => {
                cast_complex(value).map(|(re, im)| Value::Complex(re, im))
            }

            (TypeSpec::List(elem), Value::List(list)) => {
                let items = list
                    .items()
                    .iter()
                    .map(|item| item.cast_to(elem))
                    .collect::<MuniResult<Vec<_>>>()?;
                Ok(Value::List(ListRef::new(items, (**elem).clone())))
            }
            (TypeSpec::List(elem), Value::String(s)) => {
                let items = s
                    .chars()
                    .map(|c| Value::String(c.to_string()).cast_to(elem))
                    .collect::<MuniResult<Vec<_>>>()?;
                Ok(Value::List(ListRef::new(items, (**elem).clone())))
            }
            (TypeSpec::List(elem), Value::Dict(dict)) => {
                let items = dict
                    .keys()
                    .iter()
                    .map(|key| key.cast_to(elem))
                    .collect::<MuniResult<Vec<_>>>()?;
                Ok(Value::List(ListRef::new(items, (**elem).clone())))
            }

            (TypeSpec::Dict(key_tag, value_tag), Value::Dict(dict)) => {
                let result = DictRef::new((**key_tag).clone(), (**value_tag).clone());
                for (key, value) in dict.entries() {
                    result.set(&key.cast_to(key_tag)?, &value.cast_to(value_tag)?)?;
                }
                Ok(Value::Dict(result))
            }

            (target, value) => Err(MuniError::invalid_cast(format!(
                "cannot cast {} to {}",
                value.type_name(),
                target
            ))),
        }
    }

    /// Implicit conversion to a declared type.
    pub fn coerce_to(&self, target: &TypeSpec) -> MuniResult<Value> {
        let mismatch = || {
            MuniError::type_error(format!(
                "expected {}, found {}",
                target,
                self.type_name()
            ))
        };

        match (target, self) {
            (TypeSpec::Untyped, value) => Ok(value.clone()),
            (TypeSpec::Unknown(name), _) => {
                Err(MuniError::type_error(format!("unknown type '{}'", name)))
            }
            (TypeSpec::Void, _) => Ok(Value::Void),
            (_, Value::Void | Value::Untyped) => Value::zero_of(target),

            (TypeSpec::Int, Value::Int(_))
            | (TypeSpec::Float, Value::Float(_))
            | (TypeSpec::Complex, Value::Complex(..))
            | (TypeSpec::Boolean, Value::Boolean(_))
            | (TypeSpec::String, Value::String(_)) => Ok(self.clone()),

            (TypeSpec::Float, Value::Int(n)) => Ok(Value::Float(*n as f64)),
            (TypeSpec::Complex, Value::Int(n)) => Ok(Value::Complex(*n as f64, 0.0)),
            (TypeSpec::Complex, Value::Float(n)) => Ok(Value::Complex(*n, 0.0)),

            (TypeSpec::List(elem), Value::List(list)) => {
                if elem.is_untyped() || **elem == list.elem_type() {
                    Ok(self.clone())
                } else {
                    ListRef::typed(list.items(), (**elem).clone()).map(Value::List)
                }
            }

            (TypeSpec::Dict(key, value), Value::Dict(dict)) => {
                let (have_key, have_value) = dict.tags();
                if (key.is_untyped() || **key == have_key)
                    && (value.is_untyped() || **value == have_value)
                {
                    Ok(self.clone())
                } else {
                    DictRef::typed(dict.entries(), (**key).clone(), (**value).clone())
                        .map(Value::Dict)
                }
            }

            _ => Err(mismatch()),
        }
    }
}

fn cast_boolean(value: &Value) -> bool {
    match value {
        Value::String(s) => match s.trim() {
            "true" => true,
            "false" => false,
            other => !other.is_empty(),
        },
        other => other.is_truthy(),
    }
}

fn float_to_int(n: f64) -> MuniResult<Value> {
    if !n.is_finite() || n < i64::MIN as f64 || n >= i64::MAX as f64 {
        return Err(MuniError::invalid_cast(format!(
            "float {} does not fit in an int",
            n
        )));
    }
    Ok(Value::Int(n.trunc() as i64))
}

fn cast_int(value: &Value) -> MuniResult<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(n) => float_to_int(*n),
        Value::Complex(re, _) => float_to_int(*re),
        Value::Boolean(b) => Ok(Value::Int(*b as i64)),
        Value::String(s) => {
            let text = s.trim();
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Int(n));
            }
            match text.parse::<f64>() {
                Ok(n) => float_to_int(n),
                Err(_) => Err(MuniError::invalid_cast(format!(
                    "invalid literal for int: '{}'",
                    s
                ))),
            }
        }
        other => Err(MuniError::invalid_cast(format!(
            "cannot cast {} to int",
            other.type_name()
        ))),
    }
}

fn cast_float(value: &Value) -> MuniResult<f64> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(n) => Ok(*n),
        Value::Complex(re, _) => Ok(*re),
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            MuniError::invalid_cast(format!("invalid literal for float: '{}'", s))
        }),
        other => Err(MuniError::invalid_cast(format!(
            "cannot cast {} to float",
            other.type_name()
        ))),
    }
}

fn cast_complex(value: &Value) -> MuniResult<(f64, f64)> {
    match value {
        Value::Complex(re, im) => Ok((*re, *im)),
        Value::String(s) => parse_complex(s).ok_or_else(|| {
            MuniError::invalid_cast(format!("invalid literal for complex: '{}'", s))
        }),
        other => cast_float(other).map(|re| (re, 0.0)),
    }
}

/// Parses `3`, `2j`, `-1.5j`, `1+2j` and the canonical `1.0 - 2.0j`.
pub fn parse_complex(text: &str) -> Option<(f64, f64)> {
    let compact: String = text
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let Some(body) = compact.strip_suffix('j') else {
        return compact.parse::<f64>().ok().map(|re| (re, 0.0));
    };

    // Split at the last sign that is not the leading sign or an exponent sign.
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

    let parse_imag = |part: &str| -> Option<f64> {
        match part {
            "" | "+" => Some(1.0),
            "-" => Some(-1.0),
            other => other.parse::<f64>().ok(),
        }
    };

    match split {
        Some(i) => Some((body[..i].parse::<f64>().ok()?, parse_imag(&body[i..])?)),
        None => Some((0.0, parse_imag(body)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn numeric_casts_never_fail() {
        let values = [Value::Int(-7), Value::Float(3.9), Value::Complex(2.5, 1.0)];
        let targets = [TypeSpec::Int, TypeSpec::Float, TypeSpec::Complex];
        for value in &values {
            for target in &targets {
                assert!(value.cast_to(target).is_ok(), "{:?} -> {}", value, target);
            }
        }
    }

    #[test]
    fn float_to_int_truncates_toward_zero() {
        assert_eq!(Value::Float(3.9).cast_to(&TypeSpec::Int).unwrap(), Value::Int(3));
        assert_eq!(Value::Float(-3.9).cast_to(&TypeSpec::Int).unwrap(), Value::Int(-3));
    }

    #[test]
    fn string_round_trip() {
        let values = [
            Value::Int(42),
            Value::Float(2.5),
            Value::Float(-1.0),
            Value::Complex(1.0, -2.0),
            Value::Boolean(false),
        ];
        for value in values {
            let text = value.cast_to(&TypeSpec::String).unwrap();
            let back = text.cast_to(&value.runtime_type()).unwrap();
            assert_eq!(back, value);
            assert_eq!(back.cast_to(&TypeSpec::String).unwrap(), text);
        }
    }

    #[test]
    fn void_casts_to_zero() {
        assert_eq!(Value::Void.cast_to(&TypeSpec::Int).unwrap(), Value::Int(0));
        assert_eq!(
            Value::Void.cast_to(&TypeSpec::untyped_list()).unwrap().to_string(),
            "[]"
        );
    }

    #[test]
    fn list_cast_recasts_items() {
        let list = Value::list(vec![Value::String("1".into()), Value::Float(2.7)]);
        let cast = list.cast_to(&TypeSpec::List(Box::new(TypeSpec::Int))).unwrap();
        assert_eq!(cast.to_string(), "[1, 2]");
        assert_eq!(cast.runtime_type().to_string(), "list<int>");
    }

    #[test]
    fn unknown_target_is_invalid_cast() {
        let err = Value::Int(1).cast_to(&TypeSpec::Unknown("pair".into())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCast);
        let err = Value::String("abc".into()).cast_to(&TypeSpec::Int).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCast);
    }

    #[test]
    fn coercion_only_widens() {
        assert_eq!(Value::Int(2).coerce_to(&TypeSpec::Float).unwrap(), Value::Float(2.0));
        let err = Value::Float(2.5).coerce_to(&TypeSpec::Int).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
        let err = Value::String("2".into()).coerce_to(&TypeSpec::Int).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn coercion_keeps_container_identity_when_tags_match() {
        let list = ListRef::new(vec![Value::Int(1)], TypeSpec::Int);
        let coerced = Value::List(list.clone())
            .coerce_to(&TypeSpec::List(Box::new(TypeSpec::Int)))
            .unwrap();
        match coerced {
            Value::List(other) => assert!(other.ptr_eq(&list)),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn parses_complex_forms() {
        assert_eq!(parse_complex("2j"), Some((0.0, 2.0)));
        assert_eq!(parse_complex("1.0 - 2.0j"), Some((1.0, -2.0)));
        assert_eq!(parse_complex("1e-3+4j"), Some((0.001, 4.0)));
        assert_eq!(parse_complex("5"), Some((5.0, 0.0)));
        assert_eq!(parse_complex("abc"), None);
    }
}
