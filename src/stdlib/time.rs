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

//! `import <time:lib>;`: wall-clock natives backed by chrono.

use chrono::{Local, Utc};

use crate::error::MuniResult;
use crate::interpreter::natives::{native, NativeContext, NativeFn};
use crate::value::Value;

pub fn natives() -> Vec<(&'static str, NativeFn)> {
    vec![
        ("now", native(time_now)),
        ("timestamp", native(time_timestamp)),
        ("elapsed", native(time_elapsed)),
    ]
}

/// Local date and time, `YYYY-MM-DD HH:MM:SS`.
pub fn time_now(_ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    Ok(Value::String(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()))
}

/// Seconds since the Unix epoch, with millisecond precision.
pub fn time_timestamp(_ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    Ok(Value::Float(epoch_seconds()))
}

/// Seconds elapsed since an earlier `timestamp()`.
///
/// ```muni
/// import <time:lib>;
/// float start = timestamp();
/// work();
/// print("took", elapsed(start));
/// ```
pub fn time_elapsed(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let since = ctx.number_arg(0)?;
    Ok(Value::Float(epoch_seconds() - since))
}

fn epoch_seconds() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}
