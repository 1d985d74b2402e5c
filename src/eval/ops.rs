// Copyright 2025 Sqlweave Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Operator dispatch table
//!
//! Binary operators dispatch on the normalized kind of their operands: one
//! family per scalar kind, one for nil, and a generic fallback for mixed or
//! object operands. The right operand arrives as a thunk so that `&&` and
//! `||` can skip it.

use std::sync::Arc;

use crate::core::{Error, Kind, Result, Value};
use crate::parser::{BinaryOperator, UnaryOperator};

/// Lazily evaluated right operand
pub type Thunk<'a> = &'a mut dyn FnMut() -> Result<Value>;

/// Operator family selected from operand kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Signed,
    Unsigned,
    Float,
    String,
    Bool,
    Complex,
    Nil,
    Generic,
}

impl Family {
    /// Pick the family for a pair of operand kinds
    pub fn of(left: Kind, right: Kind) -> Family {
        if left == Kind::Invalid || right == Kind::Invalid {
            return Family::Nil;
        }
        if left != right {
            return Family::Generic;
        }
        match left {
            Kind::Int => Family::Signed,
            Kind::Uint => Family::Unsigned,
            Kind::Float => Family::Float,
            Kind::String => Family::String,
            Kind::Bool => Family::Bool,
            Kind::Complex => Family::Complex,
            _ => Family::Generic,
        }
    }
}

/// Apply a binary operator
///
/// `right` is invoked at most once, and not at all when `&&`/`||`
/// short-circuit or when the left operand of `&&`/`||` is not a bool.
pub fn binary(op: BinaryOperator, left: Value, right: Thunk<'_>) -> Result<Value> {
    match op {
        BinaryOperator::LogicalAnd | BinaryOperator::LogicalOr => logical(op, left, right),
        _ => {
            let right = right()?;
            match Family::of(left.kind(), right.kind()) {
                Family::Signed => match (&left, &right) {
                    (Value::Int(a), Value::Int(b)) => signed(op, *a, *b),
                    _ => Err(mismatched(&left, &right)),
                },
                Family::Unsigned => match (&left, &right) {
                    (Value::Uint(a), Value::Uint(b)) => unsigned(op, *a, *b),
                    _ => Err(mismatched(&left, &right)),
                },
                Family::Float => match (&left, &right) {
                    (Value::Float(a), Value::Float(b)) => float(op, *a, *b),
                    _ => Err(mismatched(&left, &right)),
                },
                Family::String => match (&left, &right) {
                    (Value::Str(a), Value::Str(b)) => string(op, a, b),
                    _ => Err(mismatched(&left, &right)),
                },
                Family::Bool => match (&left, &right) {
                    (Value::Bool(a), Value::Bool(b)) => boolean(op, *a, *b),
                    _ => Err(mismatched(&left, &right)),
                },
                Family::Complex => match (&left, &right) {
                    (Value::Complex(a), Value::Complex(b)) => complex(op, *a, *b),
                    _ => Err(mismatched(&left, &right)),
                },
                Family::Nil => nil(op, &left, &right),
                Family::Generic => generic(op, &left, &right),
            }
        }
    }
}

fn logical(op: BinaryOperator, left: Value, right: Thunk<'_>) -> Result<Value> {
    let l = match left {
        Value::Bool(b) => b,
        other => {
            return Err(Error::type_mismatch(format!(
                "invalid operation: operator {} not defined on {} ({})",
                op,
                other,
                other.type_name()
            )))
        }
    };
    match (op, l) {
        (BinaryOperator::LogicalAnd, false) => return Ok(Value::Bool(false)),
        (BinaryOperator::LogicalOr, true) => return Ok(Value::Bool(true)),
        _ => {}
    }
    match right()? {
        Value::Bool(r) => Ok(Value::Bool(r)),
        other => Err(mismatched(&Value::Bool(l), &other)),
    }
}

fn signed(op: BinaryOperator, a: i64, b: i64) -> Result<Value> {
    Ok(match op {
        BinaryOperator::Add => Value::Int(a.wrapping_add(b)),
        BinaryOperator::Sub => Value::Int(a.wrapping_sub(b)),
        BinaryOperator::Mul => Value::Int(a.wrapping_mul(b)),
        BinaryOperator::Quo => Value::Int(a.checked_div(b).ok_or_else(|| div_error(b))?),
        BinaryOperator::Rem => Value::Int(a.checked_rem(b).ok_or_else(|| div_error(b))?),
        BinaryOperator::And => Value::Int(a & b),
        BinaryOperator::Or => Value::Int(a | b),
        _ => return compare(op, a.cmp(&b), &Value::Int(a)),
    })
}

fn unsigned(op: BinaryOperator, a: u64, b: u64) -> Result<Value> {
    Ok(match op {
        BinaryOperator::Add => Value::Uint(a.wrapping_add(b)),
        BinaryOperator::Sub => Value::Uint(a.wrapping_sub(b)),
        BinaryOperator::Mul => Value::Uint(a.wrapping_mul(b)),
        BinaryOperator::Quo => Value::Uint(a.checked_div(b).ok_or(Error::DivisionByZero)?),
        BinaryOperator::Rem => Value::Uint(a.checked_rem(b).ok_or(Error::DivisionByZero)?),
        BinaryOperator::And => Value::Uint(a & b),
        BinaryOperator::Or => Value::Uint(a | b),
        _ => return compare(op, a.cmp(&b), &Value::Uint(a)),
    })
}

/// i64::MIN / -1 overflows rather than dividing by zero; it wraps like
/// the other signed operators
fn div_error(b: i64) -> Error {
    if b == 0 {
        Error::DivisionByZero
    } else {
        Error::type_mismatch("integer overflow in division")
    }
}

fn float(op: BinaryOperator, a: f64, b: f64) -> Result<Value> {
    match op {
        BinaryOperator::Add => Ok(Value::Float(a + b)),
        BinaryOperator::Sub => Ok(Value::Float(a - b)),
        BinaryOperator::Mul => Ok(Value::Float(a * b)),
        BinaryOperator::Quo => Ok(Value::Float(a / b)),
        BinaryOperator::Eq => Ok(Value::Bool(a == b)),
        BinaryOperator::Ne => Ok(Value::Bool(a != b)),
        BinaryOperator::Lt => Ok(Value::Bool(a < b)),
        BinaryOperator::Le => Ok(Value::Bool(a <= b)),
        BinaryOperator::Gt => Ok(Value::Bool(a > b)),
        BinaryOperator::Ge => Ok(Value::Bool(a >= b)),
        _ => Err(undefined(op, &Value::Float(a))),
    }
}

fn string(op: BinaryOperator, a: &Arc<str>, b: &Arc<str>) -> Result<Value> {
    match op {
        BinaryOperator::Add => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::Str(Arc::from(s)))
        }
        BinaryOperator::Eq
        | BinaryOperator::Ne
        | BinaryOperator::Lt
        | BinaryOperator::Le
        | BinaryOperator::Gt
        | BinaryOperator::Ge => compare(op, a.cmp(b), &Value::Str(a.clone())),
        _ => Err(undefined(op, &Value::Str(a.clone()))),
    }
}

fn boolean(op: BinaryOperator, a: bool, b: bool) -> Result<Value> {
    match op {
        BinaryOperator::Eq => Ok(Value::Bool(a == b)),
        BinaryOperator::Ne => Ok(Value::Bool(a != b)),
        _ => Err(undefined(op, &Value::Bool(a))),
    }
}

fn complex(op: BinaryOperator, a: crate::core::Complex, b: crate::core::Complex) -> Result<Value> {
    match op {
        BinaryOperator::Add => Ok(Value::Complex(a.add(b))),
        BinaryOperator::Sub => Ok(Value::Complex(a.sub(b))),
        BinaryOperator::Mul => Ok(Value::Complex(a.mul(b))),
        BinaryOperator::Quo => Ok(Value::Complex(a.div(b))),
        BinaryOperator::Eq => Ok(Value::Bool(a == b)),
        BinaryOperator::Ne => Ok(Value::Bool(a != b)),
        _ => Err(undefined(op, &Value::Complex(a))),
    }
}

/// At least one operand is the untyped nil
fn nil(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value> {
    let both = left.is_nil() && right.is_nil();
    match op {
        BinaryOperator::Eq => Ok(Value::Bool(both)),
        BinaryOperator::Ne => Ok(Value::Bool(!both)),
        _ if both => Err(undefined(op, left)),
        _ => Err(mismatched(left, right)),
    }
}

/// Mixed kinds or object operands
fn generic(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value> {
    match op {
        BinaryOperator::Eq => Ok(Value::Bool(left.loose_eq(right))),
        BinaryOperator::Ne => Ok(Value::Bool(!left.loose_eq(right))),
        _ if left.kind() == right.kind() => Err(undefined(op, left)),
        _ => Err(mismatched(left, right)),
    }
}

fn compare(op: BinaryOperator, ord: std::cmp::Ordering, left: &Value) -> Result<Value> {
    use std::cmp::Ordering;
    let result = match op {
        BinaryOperator::Eq => ord == Ordering::Equal,
        BinaryOperator::Ne => ord != Ordering::Equal,
        BinaryOperator::Lt => ord == Ordering::Less,
        BinaryOperator::Le => ord != Ordering::Greater,
        BinaryOperator::Gt => ord == Ordering::Greater,
        BinaryOperator::Ge => ord != Ordering::Less,
        _ => return Err(undefined(op, left)),
    };
    Ok(Value::Bool(result))
}

fn mismatched(left: &Value, right: &Value) -> Error {
    Error::type_mismatch(format!(
        "invalid operation: mismatched types {} and {}",
        left.type_name(),
        right.type_name()
    ))
}

fn undefined(op: BinaryOperator, operand: &Value) -> Error {
    Error::type_mismatch(format!(
        "invalid operation: operator {} not defined on {} ({})",
        op,
        operand,
        operand.type_name()
    ))
}

// ============================================================================
// Unary operators
// ============================================================================

/// Apply a unary operator
pub fn unary(op: UnaryOperator, operand: Value) -> Result<Value> {
    match op {
        UnaryOperator::Neg => match operand {
            Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
            Value::Float(v) => Ok(Value::Float(-v)),
            other => Err(unary_undefined(op, &other)),
        },
        UnaryOperator::Plus => match operand {
            Value::Int(_) | Value::Float(_) => Ok(operand),
            other => Err(unary_undefined(op, &other)),
        },
        UnaryOperator::Not => match operand {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => Err(unary_undefined(op, &other)),
        },
        // `&` is an alias of the bitwise complement
        UnaryOperator::BitNot | UnaryOperator::AddressOf => match operand {
            Value::Int(v) => Ok(Value::Int(!v)),
            Value::Uint(v) => Ok(Value::Uint(!v)),
            other => Err(unary_undefined(op, &other)),
        },
        UnaryOperator::Deref => Ok(deref(operand)),
    }
}

/// Unwrap one level of indirection
///
/// Pointers yield their target, opaque objects an address-like uint, and
/// everything else passes through.
pub fn deref(value: Value) -> Value {
    match &value {
        Value::Object(object) => {
            if let Some(target) = object.pointee() {
                return target;
            }
            if object.kind() == Kind::Opaque {
                return Value::Uint(Arc::as_ptr(object) as *const () as usize as u64);
            }
            value
        }
        _ => value,
    }
}

fn unary_undefined(op: UnaryOperator, operand: &Value) -> Error {
    Error::type_mismatch(format!(
        "invalid operation: operator {} not defined on {} ({})",
        op,
        operand,
        operand.type_name()
    ))
}
