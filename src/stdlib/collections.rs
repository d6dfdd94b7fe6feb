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

//! Container and introspection natives.
//!
//! `append` and `remove` mutate their container in place and wake any
//! watches subscribed to it.

use crate::error::{MuniError, MuniResult};
use crate::interpreter::natives::{native, NativeContext, NativeFn};
use crate::types::TypeSpec;
use crate::value::{DictRef, ListRef, Value};

pub fn natives() -> Vec<(&'static str, NativeFn)> {
    vec![
        ("type", native(collection_type)),
        ("length", native(collection_length)),
        ("append", native(collection_append)),
        ("remove", native(collection_remove)),
        ("contains", native(collection_contains)),
        ("keys", native(collection_keys)),
        ("values", native(collection_values)),
        ("sort", native(collection_sort)),
        ("slice", native(collection_slice)),
        ("local_scope", native(collection_local_scope)),
        ("global_scope", native(collection_global_scope)),
    ]
}

/// Type specifier of a value as a string: `int`, `list<float>`, ...
pub fn collection_type(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    Ok(Value::String(ctx.arg(0)?.runtime_type().to_string()))
}

pub fn collection_length(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let len = match ctx.arg(0)? {
        Value::String(s) => s.chars().count(),
        Value::List(list) => list.len(),
        Value::Dict(dict) => dict.len(),
        other => {
            return Err(MuniError::type_error(format!(
                "length() of {} is undefined",
                other.type_name()
            )))
        }
    };
    Ok(Value::Int(len as i64))
}

/// `append(list, item)` pushes in place, checking the element type.
pub fn collection_append(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let list = ctx.list_arg(0)?;
    list.push(ctx.arg(1)?)?;
    ctx.notify_mutation(&Value::List(list))?;
    Ok(Value::Void)
}

/// `remove(list, item)` drops the first equal item and answers whether one
/// was found. `remove(dict, key)` drops the entry and answers its value.
pub fn collection_remove(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let target = ctx.arg(0)?.clone();
    let needle = ctx.arg(1)?.clone();

    let result = match &target {
        Value::List(list) => Value::Boolean(list.remove_first(&needle)),
        Value::Dict(dict) => dict.remove(&needle).unwrap_or(Value::Void),
        other => {
            return Err(MuniError::type_error(format!(
                "remove() needs a list or dict, not {}",
                other.type_name()
            )))
        }
    };

    ctx.notify_mutation(&target)?;
    Ok(result)
}

/// Membership: list items, dictionary keys, or substrings.
pub fn collection_contains(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let needle = ctx.arg(1)?;
    let found = match ctx.arg(0)? {
        Value::List(list) => list.contains(needle),
        Value::Dict(dict) => dict.contains_key(needle),
        Value::String(haystack) => match needle {
            Value::String(part) => haystack.contains(part.as_str()),
            other => {
                return Err(MuniError::type_error(format!(
                    "contains() on a string needs a string, not {}",
                    other.type_name()
                )))
            }
        },
        other => {
            return Err(MuniError::type_error(format!(
                "contains() needs a container, not {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::Boolean(found))
}

pub fn collection_keys(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let dict = ctx.dict_arg(0)?;
    let (key_tag, _) = dict.tags();
    Ok(Value::List(ListRef::new(dict.keys(), key_tag)))
}

pub fn collection_values(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let dict = ctx.dict_arg(0)?;
    let (_, value_tag) = dict.tags();
    Ok(Value::List(ListRef::new(dict.values(), value_tag)))
}

/// A sorted copy; the argument is left untouched.
pub fn collection_sort(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let list = ctx.list_arg(0)?;
    let sorted = ListRef::new(list.items(), list.elem_type());
    sorted.sort()?;
    Ok(Value::List(sorted))
}

/// `slice(xs, start, end)` copies `xs[start..end]` from a list or string.
/// Negative bounds count from the end; out-of-range bounds are clamped.
pub fn collection_slice(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(3)?;
    let start = ctx.int_arg(1)?;
    let end = ctx.int_arg(2)?;

    match ctx.arg(0)? {
        Value::List(list) => {
            let items = list.items();
            let (from, to) = slice_bounds(items.len(), start, end);
            Ok(Value::List(ListRef::new(items[from..to].to_vec(), list.elem_type())))
        }
        Value::String(text) => {
            let chars: Vec<char> = text.chars().collect();
            let (from, to) = slice_bounds(chars.len(), start, end);
            Ok(Value::String(chars[from..to].iter().collect()))
        }
        other => Err(MuniError::type_error(format!(
            "slice() needs a list or string, not {}",
            other.type_name()
        ))),
    }
}

fn slice_bounds(len: usize, start: i64, end: i64) -> (usize, usize) {
    let clamp = |index: i64| -> usize {
        let index = if index < 0 { index + len as i64 } else { index };
        index.clamp(0, len as i64) as usize
    };
    let from = clamp(start);
    (from, clamp(end).max(from))
}

/// Innermost scope as a `dict<string, ?>`.
pub fn collection_local_scope(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    let pairs = ctx.interpreter.environment().current_scope();
    scope_to_dict(pairs)
}

pub fn collection_global_scope(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    let pairs = ctx.interpreter.environment().global_scope();
    scope_to_dict(pairs)
}

fn scope_to_dict(pairs: Vec<(String, Value)>) -> MuniResult<Value> {
    let dict = DictRef::new(TypeSpec::String, TypeSpec::Untyped);
    for (name, value) in pairs {
        dict.set(&Value::String(name), &value)?;
    }
    Ok(Value::Dict(dict))
}
