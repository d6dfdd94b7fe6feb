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

//! Arithmetic, comparison and logical operators over `Value`.
//!
//! Numeric operands climb the tower `int -> float -> complex`; the result
//! kind is the higher of the two operand kinds, except that `/` always
//! yields at least a float.

use crate::ast::{BinaryOp, CompareOp, LogicalOp, UnaryOp};
use crate::error::{MuniError, MuniResult};
use crate::value::{ListRef, Value};

/// A pair of numeric operands promoted to a common kind.
enum NumPair {
    Int(i64, i64),
    Float(f64, f64),
    Complex((f64, f64), (f64, f64)),
}

fn promote(left: &Value, right: &Value) -> Option<NumPair> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(NumPair::Int(*a, *b)),
        (Value::Complex(..), _) | (_, Value::Complex(..)) => {
            Some(NumPair::Complex(left.as_complex()?, right.as_complex()?))
        }
        _ => Some(NumPair::Float(left.as_f64()?, right.as_f64()?)),
    }
}

fn overflow(op: BinaryOp) -> MuniError {
    MuniError::runtime_error(format!("integer overflow in '{}'", op.symbol()))
}

/// Floored modulo: the result takes the sign of the divisor.
fn floored_mod_int(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

fn floored_mod_float(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
        r + b
    } else {
        r
    }
}

fn complex_mul((a, b): (f64, f64), (c, d): (f64, f64)) -> (f64, f64) {
    (a * c - b * d, a * d + b * c)
}

/// `(a·c̄) / |c|²`
fn complex_div(left: (f64, f64), right: (f64, f64)) -> MuniResult<(f64, f64)> {
    let norm = right.0 * right.0 + right.1 * right.1;
    if norm == 0.0 {
        return Err(MuniError::division_by_zero());
    }
    let (re, im) = complex_mul(left, (right.0, -right.1));
    Ok((re / norm, im / norm))
}

/// Stringify-and-concatenate is allowed with these kinds.
fn concatenates(value: &Value) -> bool {
    matches!(
        value,
        Value::String(_) | Value::Int(_) | Value::Float(_) | Value::Complex(..) | Value::Boolean(_)
    )
}

impl Value {
    /// Applies `+ - * / %`.
    pub fn binary(&self, op: BinaryOp, rhs: &Value) -> MuniResult<Value> {
        match (op, self, rhs) {
            (BinaryOp::Add, Value::String(_), other) | (BinaryOp::Add, other, Value::String(_))
                if concatenates(other) =>
            {
                Ok(Value::String(format!("{}{}", self, rhs)))
            }

            (BinaryOp::Add, Value::List(left), Value::List(right)) => {
                let elem = left.elem_type();
                let mut items = left.items();
                for item in right.items() {
                    items.push(item.coerce_to(&elem)?);
                }
                Ok(Value::List(ListRef::new(items, elem)))
            }

            (BinaryOp::Add, Value::List(left), item) => {
                let elem = left.elem_type();
                let mut items = left.items();
                items.push(item.coerce_to(&elem)?);
                Ok(Value::List(ListRef::new(items, elem)))
            }

            (BinaryOp::Sub, Value::List(left), Value::List(right)) => {
                let result = ListRef::new(left.items(), left.elem_type());
                for item in right.items() {
                    result.remove_first(&item);
                }
                Ok(Value::List(result))
            }

            (BinaryOp::Sub, Value::List(left), item) => {
                let result = ListRef::new(left.items(), left.elem_type());
                result.remove_first(item);
                Ok(Value::List(result))
            }

            _ => self.numeric(op, rhs),
        }
    }

    fn numeric(&self, op: BinaryOp, rhs: &Value) -> MuniResult<Value> {
        let pair = promote(self, rhs).ok_or_else(|| {
            MuniError::unsupported_operand(op.symbol(), self.type_name(), rhs.type_name())
        })?;

        match pair {
            NumPair::Int(a, b) => match op {
                BinaryOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(|| overflow(op)),
                BinaryOp::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(|| overflow(op)),
                BinaryOp::Mul => a.checked_mul(b).map(Value::Int).ok_or_else(|| overflow(op)),
                BinaryOp::Div => {
                    if b == 0 {
                        Err(MuniError::division_by_zero())
                    } else {
                        Ok(Value::Float(a as f64 / b as f64))
                    }
                }
                BinaryOp::Mod => {
                    if b == 0 {
                        Err(MuniError::modulus_by_zero())
                    } else {
                        floored_mod_int(a, b).map(Value::Int).ok_or_else(|| overflow(op))
                    }
                }
            },

            NumPair::Float(a, b) => match op {
                BinaryOp::Add => Ok(Value::Float(a + b)),
                BinaryOp::Sub => Ok(Value::Float(a - b)),
                BinaryOp::Mul => Ok(Value::Float(a * b)),
                BinaryOp::Div => {
                    if b == 0.0 {
                        Err(MuniError::division_by_zero())
                    } else {
                        Ok(Value::Float(a / b))
                    }
                }
                BinaryOp::Mod => {
                    if b == 0.0 {
                        Err(MuniError::modulus_by_zero())
                    } else {
                        Ok(Value::Float(floored_mod_float(a, b)))
                    }
                }
            },

            NumPair::Complex(a, b) => {
                let (re, im) = match op {
                    BinaryOp::Add => (a.0 + b.0, a.1 + b.1),
                    BinaryOp::Sub => (a.0 - b.0, a.1 - b.1),
                    BinaryOp::Mul => complex_mul(a, b),
                    BinaryOp::Div => complex_div(a, b)?,
                    BinaryOp::Mod => {
                        return Err(MuniError::unsupported_operand(
                            op.symbol(),
                            self.type_name(),
                            rhs.type_name(),
                        ))
                    }
                };
                Ok(Value::Complex(re, im))
            }
        }
    }

    /// Applies `< <= > >= == !=`.
    pub fn compare(&self, op: CompareOp, rhs: &Value) -> MuniResult<Value> {
        match op {
            CompareOp::Equal => self.equals(rhs).map(Value::Boolean),
            CompareOp::NotEqual => self.equals(rhs).map(|eq| Value::Boolean(!eq)),
            _ => {
                let unsupported = || {
                    MuniError::unsupported_operand(op.symbol(), self.type_name(), rhs.type_name())
                };
                let ordering = match (self, rhs) {
                    (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
                    (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                        let (a, b) = (self.as_f64(), rhs.as_f64());
                        a.partial_cmp(&b)
                    }
                    _ => return Err(unsupported()),
                };

                // NaN compares false every way.
                let Some(ordering) = ordering else {
                    return Ok(Value::Boolean(false));
                };

                let result = match op {
                    CompareOp::Less => ordering.is_lt(),
                    CompareOp::LessEqual => ordering.is_le(),
                    CompareOp::Greater => ordering.is_gt(),
                    CompareOp::GreaterEqual => ordering.is_ge(),
                    CompareOp::Equal => ordering.is_eq(),
                    CompareOp::NotEqual => ordering.is_ne(),
                };
                Ok(Value::Boolean(result))
            }
        }
    }

    /// `==`. Booleans only compare with booleans; other mismatches are
    /// simply unequal.
    pub fn equals(&self, rhs: &Value) -> MuniResult<bool> {
        match (self, rhs) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(a == b),
            (Value::Boolean(_), _) | (_, Value::Boolean(_)) => Err(
                MuniError::unsupported_operand("==", self.type_name(), rhs.type_name()),
            ),
            _ => Ok(Value::same_value(self, rhs)),
        }
    }

    /// Applies `& | ^`. Both operands must be booleans.
    pub fn logical(&self, op: LogicalOp, rhs: &Value) -> MuniResult<Value> {
        match (self, rhs) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(match op {
                LogicalOp::And => *a & *b,
                LogicalOp::Or => *a | *b,
                LogicalOp::Xor => *a ^ *b,
            })),
            _ => Err(MuniError::unsupported_operand(
                op.symbol(),
                self.type_name(),
                rhs.type_name(),
            )),
        }
    }

    pub fn unary(&self, op: UnaryOp) -> MuniResult<Value> {
        match (op, self) {
            (UnaryOp::Not, value) => Ok(Value::Boolean(!value.is_truthy())),
            (UnaryOp::Negate, Value::Int(n)) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| MuniError::runtime_error("integer overflow in unary '-'")),
            (UnaryOp::Negate, Value::Float(n)) => Ok(Value::Float(-n)),
            (UnaryOp::Negate, Value::Complex(re, im)) => Ok(Value::Complex(-re, -im)),
            (UnaryOp::Negate, other) => {
                Err(MuniError::unsupported_unary(op.symbol(), other.type_name()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::TypeSpec;
    use pretty_assertions::assert_eq;

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn int_division_promotes_to_float() {
        for (a, b) in [(7, 2), (-9, 4), (10, 5), (1, -3)] {
            let result = int(a).binary(BinaryOp::Div, &int(b)).unwrap();
            assert_eq!(result, Value::Float(a as f64 / b as f64));
        }
    }

    #[test]
    fn zero_divisors() {
        let err = int(1).binary(BinaryOp::Div, &int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        let err = Value::Float(1.0).binary(BinaryOp::Div, &int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        let err = int(1).binary(BinaryOp::Mod, &int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ModulusByZero);
    }

    #[test]
    fn modulo_is_floored() {
        assert_eq!(int(-7).binary(BinaryOp::Mod, &int(3)).unwrap(), int(2));
        assert_eq!(int(7).binary(BinaryOp::Mod, &int(-3)).unwrap(), int(-2));
        assert_eq!(
            Value::Float(-1.5).binary(BinaryOp::Mod, &Value::Float(1.0)).unwrap(),
            Value::Float(0.5)
        );
    }

    #[test]
    fn overflow_is_an_error() {
        let err = int(i64::MAX).binary(BinaryOp::Add, &int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RuntimeError);
    }

    #[test]
    fn complex_arithmetic() {
        let a = Value::Complex(1.0, 2.0);
        let b = Value::Complex(3.0, -1.0);
        assert_eq!(a.binary(BinaryOp::Mul, &b).unwrap(), Value::Complex(5.0, 5.0));
        assert_eq!(
            a.binary(BinaryOp::Div, &Value::Complex(0.0, 1.0)).unwrap(),
            Value::Complex(2.0, -1.0)
        );
        assert_eq!(int(1).binary(BinaryOp::Add, &a).unwrap(), Value::Complex(2.0, 2.0));
    }

    #[test]
    fn string_concatenation() {
        let s = Value::String("n = ".into());
        assert_eq!(
            s.binary(BinaryOp::Add, &int(3)).unwrap(),
            Value::String("n = 3".into())
        );
        assert_eq!(
            Value::Boolean(true).binary(BinaryOp::Add, &Value::String("!".into())).unwrap(),
            Value::String("true!".into())
        );
    }

    #[test]
    fn list_arithmetic() {
        let list = Value::list(vec![int(1), int(2), int(1)]);
        let appended = list.binary(BinaryOp::Add, &int(3)).unwrap();
        assert_eq!(appended.to_string(), "[1, 2, 1, 3]");
        assert_eq!(list.to_string(), "[1, 2, 1]");

        let removed = list.binary(BinaryOp::Sub, &int(1)).unwrap();
        assert_eq!(removed.to_string(), "[2, 1]");

        let diff = list
            .binary(BinaryOp::Sub, &Value::list(vec![int(1), int(1), int(9)]))
            .unwrap();
        assert_eq!(diff.to_string(), "[2]");
    }

    #[test]
    fn typed_list_concatenation_checks_items() {
        let ints = Value::List(ListRef::new(vec![int(1)], TypeSpec::Int));
        let err = ints
            .binary(BinaryOp::Add, &Value::list(vec![Value::String("x".into())]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn comparisons() {
        assert_eq!(int(1).compare(CompareOp::Less, &Value::Float(1.5)).unwrap(), Value::Boolean(true));
        let err = Value::Boolean(true).compare(CompareOp::Less, &int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperand);
        assert_eq!(
            int(1).compare(CompareOp::Equal, &Value::String("1".into())).unwrap(),
            Value::Boolean(false)
        );
        let err = Value::Boolean(true).compare(CompareOp::Equal, &int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperand);
    }

    #[test]
    fn logical_requires_booleans() {
        assert_eq!(
            Value::Boolean(true).logical(LogicalOp::Xor, &Value::Boolean(true)).unwrap(),
            Value::Boolean(false)
        );
        assert!(int(1).logical(LogicalOp::And, &Value::Boolean(true)).is_err());
    }
}
