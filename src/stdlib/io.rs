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

//! Console, file and process natives.

use std::fs;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use crate::error::{MuniError, MuniResult};
use crate::interpreter::natives::{native, NativeContext, NativeFn};
use crate::types::TypeSpec;
use crate::value::{ListRef, Value};

pub fn natives() -> Vec<(&'static str, NativeFn)> {
    vec![
        ("print", native(io_print)),
        ("input", native(io_input)),
        ("read", native(io_read)),
        ("write", native(io_write)),
        ("args", native(io_args)),
        ("sleep", native(io_sleep)),
    ]
}

/// Prints its arguments separated by spaces, followed by a newline.
///
/// ```muni
/// print("total:", 3 + 4);   # total: 7
/// ```
pub fn io_print(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    let line = ctx
        .args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", line)
        .and_then(|_| out.flush())
        .map_err(|e| MuniError::runtime_error(format!("print failed: {}", e)))?;

    Ok(Value::Void)
}

/// Reads one line from stdin, after printing an optional prompt.
pub fn io_input(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    if let Some(prompt) = ctx.args.first() {
        let mut out = io::stdout();
        write!(out, "{}", prompt)
            .and_then(|_| out.flush())
            .map_err(|e| MuniError::runtime_error(format!("input failed: {}", e)))?;
    }

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| MuniError::runtime_error(format!("input failed: {}", e)))?;

    let trimmed = line.trim_end_matches(['\n', '\r']).to_string();
    Ok(Value::String(trimmed))
}

/// Whole file contents as a string.
pub fn io_read(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let path = ctx.str_arg(0)?;
    fs::read_to_string(path)
        .map(Value::String)
        .map_err(|e| MuniError::runtime_error(format!("cannot read '{}': {}", path, e)))
}

/// `write(path, content)` replaces the file with the canonical string form
/// of `content`.
pub fn io_write(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let path = ctx.str_arg(0)?;
    let content = ctx.arg(1)?.to_string();
    fs::write(path, content)
        .map_err(|e| MuniError::runtime_error(format!("cannot write '{}': {}", path, e)))?;
    Ok(Value::Void)
}

/// Program arguments given after the script path, as `list<string>`.
pub fn io_args(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    let args = ctx
        .interpreter
        .program_args()
        .into_iter()
        .map(Value::String)
        .collect();
    Ok(Value::List(ListRef::new(args, TypeSpec::String)))
}

/// Blocks the calling thread for a number of seconds.
pub fn io_sleep(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let seconds = ctx.number_arg(0)?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(MuniError::runtime_error(format!(
            "sleep() needs a non-negative duration, got {}",
            seconds
        )));
    }
    let duration = Duration::try_from_secs_f64(seconds).map_err(|e| {
        MuniError::runtime_error(format!("sleep() duration {} is out of range: {}", seconds, e))
    })?;
    thread::sleep(duration);
    Ok(Value::Void)
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn sleep_rejects_durations_out_of_range() {
        let err = crate::run_source("sleep(1e300);").unwrap_err();
        assert_eq!(err.kind, ErrorKind::RuntimeError);
        assert!(err.message.contains("out of range"), "{}", err.message);
    }

    #[test]
    fn sleep_rejects_negative_durations() {
        let err = crate::run_source("sleep(-1);").unwrap_err();
        assert_eq!(err.kind, ErrorKind::RuntimeError);
    }

    #[test]
    fn zero_sleep_returns_void() {
        assert_eq!(crate::run_source("sleep(0);").unwrap(), crate::Value::Void);
    }
}
