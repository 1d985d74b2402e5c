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

//! Expression Parser - Parser struct and token handling

use super::ast::Expr;
use super::error::ParseError;
use super::lexer::Lexer;
use super::precedence::Precedence;
use super::token::{Token, TokenType};

/// Expression parser using the Pratt parsing algorithm
pub struct Parser {
    /// The lexer providing tokens
    lexer: Lexer,
    /// Current token being examined
    pub(crate) cur_token: Token,
    /// Next token (peek)
    pub(crate) peek_token: Token,
    /// Expression source, attached to errors for caret formatting
    source: String,
    /// Comments skipped so far
    comments: Vec<String>,
}

impl Parser {
    /// Create a new parser for the given input
    pub fn new(input: &str) -> Self {
        let mut parser = Parser {
            lexer: Lexer::new(input),
            cur_token: Token::eof(Default::default()),
            peek_token: Token::eof(Default::default()),
            source: input.to_string(),
            comments: Vec::new(),
        };
        parser.cur_token = parser.read_token();
        parser.peek_token = parser.read_token();
        parser
    }

    /// Parse the whole input as a single expression
    ///
    /// Comments are dropped. An input made only of comments parses to
    /// [`Expr::Comment`].
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        if self.cur_token.is_eof() {
            if self.comments.is_empty() {
                return Err(self.error_at(&self.cur_token, "empty expression"));
            }
            return Ok(Expr::Comment(self.comments.join("\n")));
        }

        let expr = self.parse_expression(Precedence::Lowest)?;

        if !self.peek_token.is_eof() {
            return Err(self.unexpected(&self.peek_token));
        }

        Ok(expr)
    }

    /// Pull the next non-comment token from the lexer
    fn read_token(&mut self) -> Token {
        loop {
            let token = self.lexer.next_token();
            if token.token_type == TokenType::Comment {
                self.comments.push(token.literal);
                continue;
            }
            return token;
        }
    }

    /// Advance to the next token
    pub(crate) fn next_token(&mut self) {
        let next = self.read_token();
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
    }

    /// Check if the peek token is a specific punctuator
    pub(crate) fn peek_token_is_punctuator(&self, punc: &str) -> bool {
        self.peek_token.is_punctuator(punc)
    }

    /// Expect the peek token to be a specific punctuator and advance
    pub(crate) fn expect_peek_punctuator(&mut self, punc: &str) -> Result<(), ParseError> {
        if self.peek_token_is_punctuator(punc) {
            self.next_token();
            Ok(())
        } else if self.peek_token.is_error() {
            Err(self.unexpected(&self.peek_token))
        } else {
            Err(self.error_at(
                &self.peek_token,
                format!("expected '{}', got {}", punc, describe(&self.peek_token)),
            ))
        }
    }

    /// Get the precedence of the peek token
    pub(crate) fn peek_precedence(&self) -> Precedence {
        match self.peek_token.token_type {
            TokenType::Operator | TokenType::Punctuator => {
                Precedence::for_operator(&self.peek_token.literal)
            }
            _ => Precedence::Lowest,
        }
    }

    /// Get the precedence of the current token
    pub(crate) fn cur_precedence(&self) -> Precedence {
        match self.cur_token.token_type {
            TokenType::Operator | TokenType::Punctuator => {
                Precedence::for_operator(&self.cur_token.literal)
            }
            _ => Precedence::Lowest,
        }
    }

    /// Build an error positioned at the given token
    pub(crate) fn error_at(&self, token: &Token, message: impl Into<String>) -> ParseError {
        ParseError::new(message, token.position).with_context(self.source.as_str())
    }

    /// Build an "unexpected token" error, surfacing lexer errors as-is
    pub(crate) fn unexpected(&self, token: &Token) -> ParseError {
        match token.token_type {
            TokenType::Error => self.error_at(
                token,
                token.error.clone().unwrap_or_else(|| "invalid token".to_string()),
            ),
            TokenType::Eof => self.error_at(token, "unexpected end of expression"),
            _ => self.error_at(token, format!("unexpected {}", describe(token))),
        }
    }
}

/// Short token description for error messages
fn describe(token: &Token) -> String {
    match token.token_type {
        TokenType::Eof => "end of expression".to_string(),
        _ => format!("'{}'", token.literal),
    }
}

/// Parse an expression source into a tree
pub fn parse_expr(input: &str) -> Result<Expr, ParseError> {
    Parser::new(input).parse()
}
