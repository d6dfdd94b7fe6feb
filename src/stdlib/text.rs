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

//! `import <text:lib>;`: string natives. Patterns use the `regex` crate
//! syntax.

use regex::Regex;

use crate::error::{MuniError, MuniResult};
use crate::interpreter::natives::{native, NativeContext, NativeFn};
use crate::types::TypeSpec;
use crate::value::{ListRef, Value};

pub fn natives() -> Vec<(&'static str, NativeFn)> {
    vec![
        ("matches", native(text_matches)),
        ("find_all", native(text_find_all)),
        ("replace", native(text_replace)),
        ("split", native(text_split)),
        ("join", native(text_join)),
        ("upper", native(text_upper)),
        ("lower", native(text_lower)),
        ("trim", native(text_trim)),
    ]
}

fn compile(pattern: &str) -> MuniResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| MuniError::runtime_error(format!("invalid pattern '{}': {}", pattern, e)))
}

fn strings(items: Vec<String>) -> Value {
    let items = items.into_iter().map(Value::String).collect();
    Value::List(ListRef::new(items, TypeSpec::String))
}

/// `matches(text, pattern)`: whether the pattern occurs anywhere in `text`.
pub fn text_matches(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let re = compile(ctx.str_arg(1)?)?;
    Ok(Value::Boolean(re.is_match(ctx.str_arg(0)?)))
}

/// Every non-overlapping match, as `list<string>`.
pub fn text_find_all(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let re = compile(ctx.str_arg(1)?)?;
    let found = re
        .find_iter(ctx.str_arg(0)?)
        .map(|m| m.as_str().to_string())
        .collect();
    Ok(strings(found))
}

/// `replace(text, pattern, replacement)`; `$1` refers to capture groups.
pub fn text_replace(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(3)?;
    let re = compile(ctx.str_arg(1)?)?;
    let replaced = re.replace_all(ctx.str_arg(0)?, ctx.str_arg(2)?);
    Ok(Value::String(replaced.into_owned()))
}

/// Splits on a literal separator, or on whitespace when none is given.
pub fn text_split(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    let text = ctx.str_arg(0)?;
    let parts = match ctx.args.get(1) {
        None => text.split_whitespace().map(str::to_string).collect(),
        Some(_) => {
            let separator = ctx.str_arg(1)?;
            if separator.is_empty() {
                return Err(MuniError::runtime_error("split() separator is empty"));
            }
            text.split(separator).map(str::to_string).collect()
        }
    };
    Ok(strings(parts))
}

/// `join(list, separator)` using each item's canonical string form.
pub fn text_join(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let list = ctx.list_arg(0)?;
    let separator = ctx.str_arg(1)?;
    let joined = list
        .items()
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(separator);
    Ok(Value::String(joined))
}

pub fn text_upper(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    Ok(Value::String(ctx.str_arg(0)?.to_uppercase()))
}

pub fn text_lower(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    Ok(Value::String(ctx.str_arg(0)?.to_lowercase()))
}

pub fn text_trim(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    Ok(Value::String(ctx.str_arg(0)?.trim().to_string()))
}
