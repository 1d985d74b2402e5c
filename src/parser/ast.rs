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

//! Expression tree types
//!
//! An [`Expr`] is built once per expression source and never mutated
//! afterwards, so a compiled tree can be shared by any number of concurrent
//! renders.

use std::fmt;

use crate::core::Value;

/// Literal constant
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Literal {
    /// Convert to a runtime value
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Str(s) => Value::str(s),
        }
    }

    /// Convert a runtime value back into a literal, if it has a literal form
    pub fn from_value(value: &Value) -> Option<Literal> {
        match value {
            Value::Bool(b) => Some(Literal::Bool(*b)),
            Value::Int(v) => Some(Literal::Int(*v)),
            Value::Float(v) => Some(Literal::Float(*v)),
            Value::Str(s) => Some(Literal::Str(s.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{:?}", v),
            Literal::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    /// Bitwise and (&)
    And,
    /// Bitwise or (|)
    Or,
    LogicalAnd,
    LogicalOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOperator {
    /// Map an operator token onto a binary operator
    pub fn from_token(op: &str) -> Option<Self> {
        let op = match op {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "*" => BinaryOperator::Mul,
            "/" => BinaryOperator::Quo,
            "%" => BinaryOperator::Rem,
            "&" => BinaryOperator::And,
            "|" => BinaryOperator::Or,
            "&&" => BinaryOperator::LogicalAnd,
            "||" => BinaryOperator::LogicalOr,
            "==" => BinaryOperator::Eq,
            "!=" => BinaryOperator::Ne,
            "<" => BinaryOperator::Lt,
            "<=" => BinaryOperator::Le,
            ">" => BinaryOperator::Gt,
            ">=" => BinaryOperator::Ge,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Quo => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::And => "&",
            BinaryOperator::Or => "|",
            BinaryOperator::LogicalAnd => "&&",
            BinaryOperator::LogicalOr => "||",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Eq
                | BinaryOperator::Ne
                | BinaryOperator::Lt
                | BinaryOperator::Le
                | BinaryOperator::Gt
                | BinaryOperator::Ge
        )
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOperator::Eq | BinaryOperator::Ne)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary (prefix) operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// -x
    Neg,
    /// +x
    Plus,
    /// !x
    Not,
    /// ^x or ~x
    BitNot,
    /// &x, evaluated as a bitwise complement like BitNot
    AddressOf,
    /// *x
    Deref,
}

impl UnaryOperator {
    pub fn from_token(op: &str) -> Option<Self> {
        let op = match op {
            "-" => UnaryOperator::Neg,
            "+" => UnaryOperator::Plus,
            "!" => UnaryOperator::Not,
            "^" | "~" => UnaryOperator::BitNot,
            "&" => UnaryOperator::AddressOf,
            "*" => UnaryOperator::Deref,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Neg => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitNot => "^",
            UnaryOperator::AddressOf => "&",
            UnaryOperator::Deref => "*",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant literal
    Literal(Literal),
    /// Parameter or builtin name
    Identifier(String),
    /// left op right
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// op operand
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    /// callee(args...), with `spread` set when the last argument ends in `...`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        spread: bool,
    },
    /// receiver.name
    Selector { receiver: Box<Expr>, name: String },
    /// receiver[index]
    Index {
        receiver: Box<Expr>,
        index: Box<Expr>,
    },
    /// receiver[low:high] or receiver[low:high:max]; bounds are integer literals
    Slice {
        receiver: Box<Expr>,
        low: Option<i64>,
        high: Option<i64>,
        max: Option<i64>,
    },
    /// (inner)
    Paren(Box<Expr>),
    /// An expression made only of comments; evaluates to true
    Comment(String),
}

impl Expr {
    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Literal(_))
    }

    /// Returns true if every leaf is a literal and every inner node is an
    /// operator or parenthesis
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Literal(_) => true,
            Expr::Binary { left, right, .. } => left.is_constant() && right.is_constant(),
            Expr::Unary { operand, .. } => operand.is_constant(),
            Expr::Paren(inner) => inner.is_constant(),
            _ => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{}", lit),
            Expr::Identifier(name) => f.write_str(name),
            Expr::Binary { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Expr::Unary { op, operand } => write!(f, "{}{}", op, operand),
            Expr::Call {
                callee,
                args,
                spread,
            } => {
                write!(f, "{}(", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                if *spread {
                    f.write_str("...")?;
                }
                f.write_str(")")
            }
            Expr::Selector { receiver, name } => write!(f, "{}.{}", receiver, name),
            Expr::Index { receiver, index } => write!(f, "{}[{}]", receiver, index),
            Expr::Slice {
                receiver,
                low,
                high,
                max,
            } => {
                write!(f, "{}[", receiver)?;
                if let Some(low) = low {
                    write!(f, "{}", low)?;
                }
                f.write_str(":")?;
                if let Some(high) = high {
                    write!(f, "{}", high)?;
                }
                if let Some(max) = max {
                    write!(f, ":{}", max)?;
                }
                f.write_str("]")
            }
            Expr::Paren(inner) => write!(f, "({})", inner),
            Expr::Comment(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_shape() {
        let expr = Expr::binary(
            BinaryOperator::LogicalAnd,
            Expr::binary(
                BinaryOperator::Gt,
                Expr::Identifier("age".into()),
                Expr::Literal(Literal::Int(18)),
            ),
            Expr::Paren(Box::new(Expr::unary(
                UnaryOperator::Not,
                Expr::Identifier("banned".into()),
            ))),
        );
        assert_eq!(expr.to_string(), "age > 18 && (!banned)");
    }

    #[test]
    fn test_is_constant() {
        let constant = Expr::binary(
            BinaryOperator::Add,
            Expr::Literal(Literal::Int(1)),
            Expr::Paren(Box::new(Expr::Literal(Literal::Int(2)))),
        );
        assert!(constant.is_constant());
        let dynamic = Expr::binary(
            BinaryOperator::Add,
            Expr::Literal(Literal::Int(1)),
            Expr::Identifier("x".into()),
        );
        assert!(!dynamic.is_constant());
        assert!(!Expr::Comment("// x".into()).is_constant());
    }

    #[test]
    fn test_literal_value_conversion() {
        assert_eq!(Literal::Str("a".into()).to_value(), Value::str("a"));
        assert_eq!(Literal::from_value(&Value::Int(3)), Some(Literal::Int(3)));
        assert_eq!(Literal::from_value(&Value::Uint(3)), None);
        assert_eq!(Literal::from_value(&Value::Nil), None);
    }

    #[test]
    fn test_operator_tokens() {
        assert_eq!(BinaryOperator::from_token("<="), Some(BinaryOperator::Le));
        assert_eq!(BinaryOperator::from_token("!"), None);
        assert_eq!(UnaryOperator::from_token("~"), Some(UnaryOperator::BitNot));
        assert_eq!(UnaryOperator::from_token("&"), Some(UnaryOperator::AddressOf));
    }
}
