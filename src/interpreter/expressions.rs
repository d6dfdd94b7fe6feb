/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     interpreter/expressions.rs
 * Purpose:  Expression evaluation
 *
 * This module handles evaluation of all MUNI expressions:
 *
 *  - Literals and variable lookup
 *  - Arithmetic, comparison, logical and unary operators
 *  - Casts
 *  - Function calls (delegated to calls.rs)
 *  - Range, list and dictionary literals
 *  - Indexing
 *
 * Operands are always evaluated left to right and eagerly; the logical
 * operators do not short-circuit. *
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

use crate::ast::{Expr, ExprKind, Literal};
use crate::error::{MuniError, MuniResult};
use crate::interpreter::Interpreter;
use crate::types::TypeSpec;
use crate::value::{DictRef, Value};

impl Interpreter {
    /// Evaluates a MUNI expression into a runtime value.
    ///
    /// A no-op yielding `void` once the interpreter has halted.
    pub fn eval_expr(&mut self, expr: &Expr) -> MuniResult<Value> {
        if !self.is_running() {
            return Ok(Value::Void);
        }

        self.ctx.current = expr.span;
        self.eval_kind(&expr.kind).map_err(|err| err.or_at(expr.span))
    }

    fn eval_kind(&mut self, kind: &ExprKind) -> MuniResult<Value> {
        match kind {
            /* ------------------------------------------------------------------
             * Literals & Variables
             * ---------------------------------------------------------------- */
            ExprKind::Literal(literal) => Ok(match literal {
                Literal::Int(n) => Value::Int(*n),
                Literal::Float(n) => Value::Float(*n),
                Literal::Imaginary(n) => Value::Complex(0.0, *n),
                Literal::Boolean(b) => Value::Boolean(*b),
                Literal::Str(s) => Value::String(s.clone()),
            }),

            ExprKind::Variable(name) => self.runtime.env.lookup(name),

            /* ------------------------------------------------------------------
             * Operators
             * ---------------------------------------------------------------- */
            ExprKind::Binary { left, op, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                left.binary(*op, &right)
            }

            ExprKind::Logical { left, op, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                left.logical(*op, &right)
            }

            ExprKind::Comparison { left, op, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                left.compare(*op, &right)
            }

            ExprKind::Unary { op, operand } => self.eval_expr(operand)?.unary(*op),

            ExprKind::Cast { target, expression } => self.eval_expr(expression)?.cast_to(target),

            /* ------------------------------------------------------------------
             * Calls
             * ---------------------------------------------------------------- */
            ExprKind::Call { name, arguments } => self.call_function(name, arguments),

            /* ------------------------------------------------------------------
             * Containers
             * ---------------------------------------------------------------- */
            ExprKind::Range {
                start,
                end,
                step,
                inclusive,
            } => {
                let start = self.range_bound(start, "start")?;
                let end = self.range_bound(end, "end")?;
                let step = match step {
                    Some(step) => self.range_bound(step, "step")?,
                    None => 1,
                };
                build_range(start, end, step, *inclusive)
            }

            ExprKind::List(items) => {
                let items = items
                    .iter()
                    .map(|item| self.eval_expr(item))
                    .collect::<MuniResult<Vec<_>>>()?;
                Ok(Value::list(items))
            }

            ExprKind::Dict(pairs) => {
                let dict = DictRef::new(TypeSpec::Untyped, TypeSpec::Untyped);
                for (key, value) in pairs {
                    let key = self.eval_expr(key)?;
                    let value = self.eval_expr(value)?;
                    dict.set(&key, &value)?;
                }
                Ok(Value::Dict(dict))
            }

            ExprKind::Index { target, index } => {
                let target = self.eval_expr(target)?;
                let index = self.eval_expr(index)?;
                index_value(&target, &index)
            }
        }
    }

    fn range_bound(&mut self, expr: &Expr, which: &str) -> MuniResult<i64> {
        let value = self.eval_expr(expr)?;
        value.as_int().ok_or_else(|| {
            MuniError::type_error(format!(
                "range {} must be int, not {}",
                which,
                value.type_name()
            ))
        })
    }
}

/// Materialises `start..end:step` (or `...` when `inclusive`).
///
/// The inclusive form moves the bound one step outward, so `0...5` ends at
/// 5 and `5...0:-1` ends at 0.
pub fn build_range(start: i64, end: i64, step: i64, inclusive: bool) -> MuniResult<Value> {
    if step == 0 {
        return Err(MuniError::runtime_error("range step cannot be zero"));
    }

    let end = if inclusive {
        let adjusted = if step > 0 { end.checked_add(1) } else { end.checked_sub(1) };
        adjusted.ok_or_else(|| MuniError::runtime_error("range bound overflows int"))?
    } else {
        end
    };

    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < end) || (step < 0 && current > end) {
        items.push(Value::Int(current));
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }

    Ok(Value::list(items))
}

/// `target[index]` for lists, dictionaries and strings.
fn index_value(target: &Value, index: &Value) -> MuniResult<Value> {
    match target {
        Value::List(list) => list.get_item(index),
        Value::Dict(dict) => Ok(dict.get(index)),
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let raw = index.as_int().ok_or_else(|| {
                MuniError::index_error(format!(
                    "string indices must be int, not {}",
                    index.type_name()
                ))
            })?;
            let slot = if raw < 0 { raw + chars.len() as i64 } else { raw };
            if slot < 0 || slot >= chars.len() as i64 {
                return Err(MuniError::index_error(format!(
                    "string index {} out of range for length {}",
                    raw,
                    chars.len()
                )));
            }
            Ok(Value::String(chars[slot as usize].to_string()))
        }
        other => Err(MuniError::type_error(format!(
            "'{}' is not subscriptable",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn range(start: i64, end: i64, step: i64, inclusive: bool) -> String {
        build_range(start, end, step, inclusive).unwrap().to_string()
    }

    #[test]
    fn exclusive_and_inclusive_ranges() {
        assert_eq!(range(0, 5, 1, false), "[0, 1, 2, 3, 4]");
        assert_eq!(range(0, 5, 1, true), "[0, 1, 2, 3, 4, 5]");
        assert_eq!(range(5, 0, -1, false), "[5, 4, 3, 2, 1]");
        assert_eq!(range(5, 0, -1, true), "[5, 4, 3, 2, 1, 0]");
        assert_eq!(range(0, 10, 3, false), "[0, 3, 6, 9]");
    }

    #[test]
    fn empty_when_direction_disagrees() {
        assert_eq!(range(5, 0, 1, false), "[]");
        assert_eq!(range(0, 5, -1, true), "[]");
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(build_range(0, 5, 0, false).is_err());
    }

    #[test]
    fn string_indexing() {
        let s = Value::String("muni".into());
        assert_eq!(index_value(&s, &Value::Int(-1)).unwrap(), Value::String("i".into()));
        assert!(index_value(&s, &Value::Int(4)).is_err());
    }
}
