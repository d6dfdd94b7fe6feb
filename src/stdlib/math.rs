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

use rand::Rng;

use crate::error::{MuniError, MuniResult};
use crate::interpreter::natives::{native, NativeContext, NativeFn};
use crate::types::TypeSpec;
use crate::value::Value;

/// Natives of `import <math:lib>;`.
///
/// Rounding functions answer ints; `min`/`max` answer whichever argument
/// won, keeping its kind.
pub fn natives() -> Vec<(&'static str, NativeFn)> {
    vec![
        // ---------------------------------------------------------------------
        // Constants
        // ---------------------------------------------------------------------
        ("pi", native(math_pi)),
        // ---------------------------------------------------------------------
        // Powers & Roots
        // ---------------------------------------------------------------------
        ("sqrt", native(math_sqrt)),
        ("pow", native(math_pow)),
        // ---------------------------------------------------------------------
        // Magnitude & Rounding
        // ---------------------------------------------------------------------
        ("abs", native(math_abs)),
        ("floor", native(math_floor)),
        ("ceil", native(math_ceil)),
        ("round", native(math_round)),
        // ---------------------------------------------------------------------
        // Aggregates
        // ---------------------------------------------------------------------
        ("min", native(math_min)),
        ("max", native(math_max)),
        // ---------------------------------------------------------------------
        // Randomness
        // ---------------------------------------------------------------------
        ("random", native(math_random)),
        ("random_int", native(math_random_int)),
    ]
}

pub fn math_pi(_ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    Ok(Value::Float(std::f64::consts::PI))
}

/// Square root of a non-negative number.
///
/// ```muni
/// import <math:lib>;
/// float r = sqrt(16);   # 4.0
/// ```
pub fn math_sqrt(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    let x = ctx.number_arg(0)?;
    if x < 0.0 {
        return Err(MuniError::runtime_error(format!(
            "sqrt() of negative number {}",
            x
        )));
    }
    Ok(Value::Float(x.sqrt()))
}

/// `pow(base, exponent)`. Two ints with a non-negative exponent stay an int.
pub fn math_pow(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    match (ctx.arg(0)?, ctx.arg(1)?) {
        (Value::Int(base), Value::Int(exp)) if *exp >= 0 => u32::try_from(*exp)
            .ok()
            .and_then(|exp| base.checked_pow(exp))
            .map(Value::Int)
            .ok_or_else(|| MuniError::runtime_error("integer overflow in pow()")),
        _ => {
            let base = ctx.number_arg(0)?;
            let exp = ctx.number_arg(1)?;
            Ok(Value::Float(base.powf(exp)))
        }
    }
}

/// Absolute value; the magnitude for complex numbers.
pub fn math_abs(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    match ctx.arg(0)? {
        Value::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| MuniError::runtime_error("integer overflow in abs()")),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        Value::Complex(re, im) => Ok(Value::Float(re.hypot(*im))),
        other => Err(MuniError::type_error(format!(
            "abs() needs a number, not {}",
            other.type_name()
        ))),
    }
}

pub fn math_floor(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    round_with(ctx, f64::floor)
}

pub fn math_ceil(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    round_with(ctx, f64::ceil)
}

/// Rounds half away from zero.
pub fn math_round(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    round_with(ctx, f64::round)
}

fn round_with(ctx: &mut NativeContext<'_>, op: fn(f64) -> f64) -> MuniResult<Value> {
    ctx.expect_args(1)?;
    if let Value::Int(n) = ctx.arg(0)? {
        return Ok(Value::Int(*n));
    }
    let rounded = op(ctx.number_arg(0)?);
    Value::Float(rounded).cast_to(&TypeSpec::Int)
}

pub fn math_min(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    pick(ctx, |candidate, best| candidate < best)
}

pub fn math_max(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    pick(ctx, |candidate, best| candidate > best)
}

/// Shared body of `min`/`max`: several numbers, or a single list of them.
fn pick(ctx: &mut NativeContext<'_>, better: fn(f64, f64) -> bool) -> MuniResult<Value> {
    let values = match ctx.args.as_slice() {
        [Value::List(list)] => list.items(),
        args => args.to_vec(),
    };

    let mut best: Option<(f64, Value)> = None;
    for value in values {
        let n = value.as_f64().ok_or_else(|| {
            MuniError::type_error(format!(
                "{}() needs numbers, not {}",
                ctx.name,
                value.type_name()
            ))
        })?;
        match &best {
            Some((current, _)) if !better(n, *current) => {}
            _ => best = Some((n, value)),
        }
    }

    best.map(|(_, value)| value)
        .ok_or_else(|| MuniError::type_error(format!("{}() of an empty sequence", ctx.name)))
}

/// Uniform float in `[0, 1)`.
pub fn math_random(_ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    Ok(Value::Float(rand::thread_rng().gen::<f64>()))
}

/// Uniform int in `[low, high]`, both ends included.
pub fn math_random_int(ctx: &mut NativeContext<'_>) -> MuniResult<Value> {
    ctx.expect_args(2)?;
    let low = ctx.int_arg(0)?;
    let high = ctx.int_arg(1)?;
    if low > high {
        return Err(MuniError::runtime_error(format!(
            "random_int() range is empty: {} > {}",
            low, high
        )));
    }
    Ok(Value::Int(rand::thread_rng().gen_range(low..=high)))
}
