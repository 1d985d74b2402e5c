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

//! Operator precedence levels for the Pratt parser

/// Precedence levels (higher number = higher precedence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Precedence {
    /// Lowest precedence
    #[default]
    Lowest = 1,
    /// Logical OR (||, or)
    LogicalOr = 2,
    /// Logical AND (&&, and)
    LogicalAnd = 3,
    /// Equality (==, !=)
    Equals = 4,
    /// Relational (<, <=, >, >=)
    LessGreater = 5,
    /// Additive (+, -, |)
    Sum = 6,
    /// Multiplicative (*, /, %, &)
    Product = 7,
    /// Prefix operators (-, +, !, ^, ~, &, *)
    Prefix = 8,
    /// Calls, selectors, index and slice expressions
    Postfix = 9,
}

impl Precedence {
    /// Get precedence for an infix operator or postfix punctuator
    pub fn for_operator(op: &str) -> Precedence {
        match op {
            "||" => Precedence::LogicalOr,
            "&&" => Precedence::LogicalAnd,
            "==" | "!=" => Precedence::Equals,
            "<" | "<=" | ">" | ">=" => Precedence::LessGreater,
            "+" | "-" | "|" => Precedence::Sum,
            "*" | "/" | "%" | "&" => Precedence::Product,
            "(" | "[" | "." => Precedence::Postfix,
            _ => Precedence::Lowest,
        }
    }
}
