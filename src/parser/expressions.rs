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

//! Expression parsing methods for the Parser

use super::ast::{BinaryOperator, Expr, Literal, UnaryOperator};
use super::error::ParseError;
use super::parser::Parser;
use super::precedence::Precedence;
use super::token::TokenType;

impl Parser {
    /// Parse an expression with the given precedence
    pub fn parse_expression(&mut self, precedence: Precedence) -> Result<Expr, ParseError> {
        let mut left = self.parse_prefix_expression()?;

        while !self.peek_token.is_eof() && precedence < self.peek_precedence() {
            self.next_token();
            left = self.parse_infix_expression(left)?;
        }

        Ok(left)
    }

    /// Parse a prefix expression (literals, identifiers, unary operators, parentheses)
    fn parse_prefix_expression(&mut self) -> Result<Expr, ParseError> {
        match self.cur_token.token_type {
            TokenType::Identifier => Ok(Expr::Identifier(self.cur_token.literal.clone())),
            TokenType::Keyword => Ok(Expr::Literal(Literal::Bool(
                self.cur_token.literal == "true",
            ))),
            TokenType::Integer => self.parse_integer_literal(),
            TokenType::Float => self.parse_float_literal(),
            TokenType::String | TokenType::Char => Ok(self.parse_string_literal()),
            TokenType::Operator => self.parse_unary_expression(),
            TokenType::Punctuator if self.cur_token.literal == "(" => {
                self.next_token();
                let inner = self.parse_expression(Precedence::Lowest)?;
                self.expect_peek_punctuator(")")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            _ => Err(self.unexpected(&self.cur_token)),
        }
    }

    /// Parse an integer literal (decimal, or 0x/0o/0b prefixed)
    fn parse_integer_literal(&self) -> Result<Expr, ParseError> {
        let literal = self.cur_token.literal.replace('_', "");
        let (digits, radix) = match literal.get(..2) {
            Some("0x") | Some("0X") => (&literal[2..], 16),
            Some("0o") | Some("0O") => (&literal[2..], 8),
            Some("0b") | Some("0B") => (&literal[2..], 2),
            _ => (literal.as_str(), 10),
        };
        i64::from_str_radix(digits, radix)
            .map(|v| Expr::Literal(Literal::Int(v)))
            .map_err(|e| {
                self.error_at(
                    &self.cur_token,
                    format!(
                        "could not parse {} as integer: {}",
                        self.cur_token.literal, e
                    ),
                )
            })
    }

    /// Parse a float literal
    fn parse_float_literal(&self) -> Result<Expr, ParseError> {
        self.cur_token
            .literal
            .replace('_', "")
            .parse::<f64>()
            .map(|v| Expr::Literal(Literal::Float(v)))
            .map_err(|e| {
                self.error_at(
                    &self.cur_token,
                    format!("could not parse {} as float: {}", self.cur_token.literal, e),
                )
            })
    }

    /// Parse a string or char literal, stripping the surrounding quotes verbatim
    fn parse_string_literal(&self) -> Expr {
        let literal = &self.cur_token.literal;
        let value = if literal.len() >= 2 {
            literal[1..literal.len() - 1].to_string()
        } else {
            String::new()
        };
        Expr::Literal(Literal::Str(value))
    }

    /// Parse a unary expression (-x, !x, ^x, &x, *x)
    fn parse_unary_expression(&mut self) -> Result<Expr, ParseError> {
        let op = UnaryOperator::from_token(&self.cur_token.literal)
            .ok_or_else(|| self.unexpected(&self.cur_token))?;
        self.next_token();
        let operand = self.parse_expression(Precedence::Prefix)?;
        Ok(Expr::unary(op, operand))
    }

    /// Parse an infix expression; the current token is the operator
    fn parse_infix_expression(&mut self, left: Expr) -> Result<Expr, ParseError> {
        if self.cur_token.token_type == TokenType::Punctuator {
            return match self.cur_token.literal.as_str() {
                "(" => self.parse_call_expression(left),
                "[" => self.parse_index_expression(left),
                "." => self.parse_selector_expression(left),
                _ => Err(self.unexpected(&self.cur_token)),
            };
        }

        let op = BinaryOperator::from_token(&self.cur_token.literal)
            .ok_or_else(|| self.unexpected(&self.cur_token))?;
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Ok(Expr::binary(op, left, right))
    }

    /// Parse a selector (receiver.name)
    fn parse_selector_expression(&mut self, receiver: Expr) -> Result<Expr, ParseError> {
        if self.peek_token.token_type != TokenType::Identifier {
            return Err(self.error_at(
                &self.peek_token,
                format!("expected selector name after '.', got '{}'", self.peek_token.literal),
            ));
        }
        self.next_token();
        Ok(Expr::Selector {
            receiver: Box::new(receiver),
            name: self.cur_token.literal.clone(),
        })
    }

    /// Parse call arguments; the current token is '('
    fn parse_call_expression(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        let mut spread = false;

        if self.peek_token_is_punctuator(")") {
            self.next_token();
        } else {
            loop {
                self.next_token();
                args.push(self.parse_expression(Precedence::Lowest)?);

                if self.peek_token_is_punctuator("...") {
                    self.next_token();
                    spread = true;
                    self.expect_peek_punctuator(")")?;
                    break;
                }
                if self.peek_token_is_punctuator(",") {
                    self.next_token();
                    if self.peek_token_is_punctuator(")") {
                        self.next_token();
                        break;
                    }
                    continue;
                }
                self.expect_peek_punctuator(")")?;
                break;
            }
        }

        Ok(Expr::Call {
            callee: Box::new(callee),
            args,
            spread,
        })
    }

    /// Parse an index or slice expression; the current token is '['
    fn parse_index_expression(&mut self, receiver: Expr) -> Result<Expr, ParseError> {
        let first = if self.peek_token_is_punctuator(":") {
            None
        } else {
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        };

        if let Some(index) = &first {
            if self.peek_token_is_punctuator("]") {
                self.next_token();
                return Ok(Expr::Index {
                    receiver: Box::new(receiver),
                    index: Box::new(index.clone()),
                });
            }
        }

        self.expect_peek_punctuator(":")?;
        let low = first.map(|e| self.slice_bound(e)).transpose()?;

        let high = if self.peek_token_is_punctuator("]") || self.peek_token_is_punctuator(":") {
            None
        } else {
            self.next_token();
            let bound = self.parse_expression(Precedence::Lowest)?;
            Some(self.slice_bound(bound)?)
        };

        let max = if self.peek_token_is_punctuator(":") {
            self.next_token();
            if high.is_none() {
                return Err(self.error_at(
                    &self.cur_token,
                    "middle index required in 3-index slice",
                ));
            }
            if self.peek_token_is_punctuator("]") {
                return Err(self.error_at(
                    &self.peek_token,
                    "final index required in 3-index slice",
                ));
            }
            self.next_token();
            let bound = self.parse_expression(Precedence::Lowest)?;
            Some(self.slice_bound(bound)?)
        } else {
            None
        };

        self.expect_peek_punctuator("]")?;

        Ok(Expr::Slice {
            receiver: Box::new(receiver),
            low,
            high,
            max,
        })
    }

    /// Slice bounds must be integer literals
    fn slice_bound(&self, expr: Expr) -> Result<i64, ParseError> {
        match expr {
            Expr::Literal(Literal::Int(v)) => Ok(v),
            other => Err(self.error_at(
                &self.cur_token,
                format!("slice bound must be an integer literal, got {}", other),
            )),
        }
    }
}
