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

//! `import <json:lib>;`: conversion between MUNI values and JSON text.
//!
//! `void` and `?` map to `null`. Complex numbers have no JSON form.
//! Dictionary keys are written with their canonical string form.

use std::fs;

use serde_json::{Map, Number};

use crate::error::{MuniError, MuniResult};
use crate::interpreter::natives::{native, NativeContext, NativeFn};
use crate::types::TypeSpec;
use crate::value::{DictRef, Value};

pub fn natives() -> Vec<(&'static str, NativeFn)> {
    vec![
        ("to_json", native(json_to_json)),
        ("from_json", native(json_from_json)),
        ("read_json", native(json_read)),
        ("write_json", native(json_write)),
    ]
}

pub fn to_json(value: &Value) -> MuniResult<serde_json::Value> {
    Ok(match value {
        Value::Int(n) => serde_json::Value::Number(Number::from(*n)),
        Value::Float(n) => Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .ok_or_else(|| MuniError::type_error(format!("{} is not representable in JSON", n)))?,
        Value::Complex(..) => {
            return Err(MuniError::type_error("complex values are not JSON serializable"))
        }
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Void | Value::Untyped => serde_json::Value::Null,
        Value::List(list) => serde_json::Value::Array(
            list.items().iter().map(to_json).collect::<MuniResult<Vec<_>>>()?,
        ),
        Value::Dict(dict) => {
            let mut map = Map::new();
            for (key, value) in dict.entries() {
                map.insert(key.to_string(), to_json(&value)?);
            }
            serde_json::Value::Object(map)
        }
    })
}

pub fn from_json(json: &serde_json::Value) -> MuniResult<Value> {
    Ok(match json {
        serde_json::Value::Null => Value::Void,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::list(items.iter().map(from_json).collect::<MuniResult<Vec<_>>>()?)
        }
        serde_json::Value::Object(map) => {
            let dict = DictRef::new(TypeSpec::String, TypeSpec::Untyped);
            for (key, value) in map {
                dict.set(&Value::String(key.clone()), &from_json(value)?)?;
            }
            Value::Dict(dict)
        }
    })
}

fn parse(text: &str) -> MuniResult<Value> {
    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| MuniError::runtime_error(format!("invalid JSON: {}", e)))?;
    from_json(&json)
}

pub fn json_to_json(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let json = to_json(ctx.arg(0)?)?;
    Ok(Value::String(json.to_string()))
}

pub fn json_from_json(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    parse(ctx.str_arg(0)?)
}

pub fn json_read(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let path = ctx.str_arg(0)?;
    let text = fs::read_to_string(path)
        .map_err(|e| MuniError::runtime_error(format!("cannot read '{}': {}", path, e)))?;
    parse(&text)
}

/// `write_json(path, value)`, pretty-printed.
pub fn json_write(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let path = ctx.str_arg(0)?;
    let json = to_json(ctx.arg(1)?)?;
    let text = serde_json::to_string_pretty(&json)
        .map_err(|e| MuniError::runtime_error(format!("cannot encode JSON: {}", e)))?;
    fs::write(path, text)
        .map_err(|e| MuniError::runtime_error(format!("cannot write '{}': {}", path, e)))?;
    Ok(Value::Void)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_values_survive_json() {
        let text = r#"{"name": "muni", "tags": [1, 2.5, true, null]}"#;
        let value = parse(text).unwrap();
        assert_eq!(value.to_string(), r#"{"name": "muni", "tags": [1, 2.5, true, void]}"#);

        let back = to_json(&value).unwrap();
        assert_eq!(back, serde_json::from_str::<serde_json::Value>(text).unwrap());
    }

    #[test]
    fn complex_is_rejected() {
        assert!(to_json(&Value::Complex(1.0, 1.0)).is_err());
    }
}
