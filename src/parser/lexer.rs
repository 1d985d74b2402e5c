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

//! Expression Lexer (Tokenizer)
//!
//! Splits expression source into tokens. The reserved words `and`, `or` and
//! `not` are emitted as the `&&`, `||` and `!` operators; every other word is
//! an identifier or a boolean keyword.

use super::token::{
    is_keyword, is_operator, is_operator_char, is_punctuator, word_operator, Position, Token,
    TokenType,
};

/// Expression lexer
pub struct Lexer {
    /// Input string
    input: Vec<char>,
    /// Current position in input (points to current char)
    position: usize,
    /// Current reading position in input (after current char)
    read_position: usize,
    /// Current character under examination
    ch: char,
    /// Current position tracking
    pos: Position,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: '\0',
            pos: Position::new(0, 1, 1),
        };
        lexer.read_char();
        lexer
    }

    /// Read the next character
    fn read_char(&mut self) {
        if self.ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else if self.ch != '\0' {
            self.pos.column += 1;
        }

        if self.read_position >= self.input.len() {
            self.ch = '\0';
            self.position = self.input.len();
        } else {
            self.ch = self.input[self.read_position];
            self.position = self.read_position;
            self.read_position += 1;
        }

        self.pos.offset = self.position;
    }

    /// Peek at the next character without advancing
    fn peek_char(&self) -> char {
        self.peek_char_n(1)
    }

    /// Peek at a character N positions ahead without advancing
    fn peek_char_n(&self, n: usize) -> char {
        let pos = self.read_position + n - 1;
        if pos >= self.input.len() {
            '\0'
        } else {
            self.input[pos]
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let pos = self.pos;

        match self.ch {
            '\0' => Token::eof(pos),

            '"' | '`' => self.read_string(TokenType::String, pos),

            '\'' => self.read_string(TokenType::Char, pos),

            c if c.is_ascii_digit() => self.read_number(pos),

            '.' if self.peek_char().is_ascii_digit() => self.read_number(pos),

            '.' if self.peek_char() == '.' && self.peek_char_n(2) == '.' => {
                self.read_char();
                self.read_char();
                self.read_char();
                Token::new(TokenType::Punctuator, "...", pos)
            }

            '/' if self.peek_char() == '/' => {
                let literal = self.read_line_comment();
                Token::new(TokenType::Comment, literal, pos)
            }

            '/' if self.peek_char() == '*' => self.read_block_comment(pos),

            c if is_punctuator(c) => {
                self.read_char();
                Token::new(TokenType::Punctuator, c.to_string(), pos)
            }

            c if is_operator_char(c) => {
                let literal = self.read_operator();
                if is_operator(&literal) {
                    Token::new(TokenType::Operator, literal, pos)
                } else {
                    Token::error(format!("unknown operator {:?}", literal), literal, pos)
                }
            }

            c if c.is_alphabetic() || c == '_' => {
                let literal = self.read_identifier();
                if let Some(op) = word_operator(&literal) {
                    Token::new(TokenType::Operator, op, pos)
                } else if is_keyword(&literal) {
                    Token::new(TokenType::Keyword, literal, pos)
                } else {
                    Token::new(TokenType::Identifier, literal, pos)
                }
            }

            c => {
                self.read_char();
                Token::error(
                    format!("unrecognized character: {:?}", c),
                    c.to_string(),
                    pos,
                )
            }
        }
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while self.ch.is_whitespace() {
            self.read_char();
        }
    }

    /// Read an identifier
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while self.ch.is_alphanumeric() || self.ch == '_' {
            result.push(self.ch);
            self.read_char();
        }
        result
    }

    /// Read a number (integer or float, with optional base prefix)
    fn read_number(&mut self, pos: Position) -> Token {
        let mut result = String::new();

        if self.ch == '0' && matches!(self.peek_char(), 'x' | 'X' | 'o' | 'O' | 'b' | 'B') {
            result.push(self.ch);
            self.read_char();
            result.push(self.ch);
            self.read_char();
            while self.ch.is_ascii_hexdigit() || self.ch == '_' {
                result.push(self.ch);
                self.read_char();
            }
            return Token::new(TokenType::Integer, result, pos);
        }

        let mut is_float = false;
        while self.ch.is_ascii_digit() || self.ch == '_' {
            result.push(self.ch);
            self.read_char();
        }

        if self.ch == '.' && self.peek_char() != '.' {
            is_float = true;
            result.push(self.ch);
            self.read_char();
            while self.ch.is_ascii_digit() || self.ch == '_' {
                result.push(self.ch);
                self.read_char();
            }
        }

        if self.ch == 'e' || self.ch == 'E' {
            is_float = true;
            result.push(self.ch);
            self.read_char();

            if self.ch == '+' || self.ch == '-' {
                result.push(self.ch);
                self.read_char();
            }

            if !self.ch.is_ascii_digit() {
                return Token::error("exponent has no digits", result, pos);
            }

            while self.ch.is_ascii_digit() {
                result.push(self.ch);
                self.read_char();
            }
        }

        let token_type = if is_float {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        Token::new(token_type, result, pos)
    }

    /// Read a quoted literal, keeping the quotes
    ///
    /// Backslashes only keep an escaped quote from terminating the literal;
    /// the text itself is kept verbatim. Backtick strings are raw.
    fn read_string(&mut self, token_type: TokenType, pos: Position) -> Token {
        let quote = self.ch;
        let mut result = String::new();
        result.push(quote);
        self.read_char();

        loop {
            match self.ch {
                '\0' => {
                    return Token::error("unterminated literal", result, pos);
                }
                '\n' if quote != '`' => {
                    return Token::error("newline in literal", result, pos);
                }
                '\\' if quote != '`' => {
                    result.push(self.ch);
                    self.read_char();
                    if self.ch != '\0' {
                        result.push(self.ch);
                        self.read_char();
                    }
                }
                c if c == quote => {
                    result.push(c);
                    self.read_char();
                    return Token::new(token_type, result, pos);
                }
                c => {
                    result.push(c);
                    self.read_char();
                }
            }
        }
    }

    /// Read a line comment (// ...)
    fn read_line_comment(&mut self) -> String {
        let mut result = String::new();
        while self.ch != '\n' && self.ch != '\0' {
            result.push(self.ch);
            self.read_char();
        }
        result
    }

    /// Read a block comment (/* ... */)
    fn read_block_comment(&mut self, pos: Position) -> Token {
        let mut result = String::new();
        result.push(self.ch);
        self.read_char();
        result.push(self.ch);
        self.read_char();

        while !(self.ch == '*' && self.peek_char() == '/') {
            if self.ch == '\0' {
                return Token::error("unterminated block comment", result, pos);
            }
            result.push(self.ch);
            self.read_char();
        }

        result.push_str("*/");
        self.read_char();
        self.read_char();
        Token::new(TokenType::Comment, result, pos)
    }

    /// Read an operator (longest match of up to two characters)
    fn read_operator(&mut self) -> String {
        let mut result = String::new();
        let first_char = self.ch;
        result.push(first_char);
        self.read_char();

        if self.ch != '\0' {
            let two_chars: String = [first_char, self.ch].iter().collect();
            if is_operator(&two_chars) {
                result.push(self.ch);
                self.read_char();
            }
        }

        result
    }

    /// Tokenize the remaining input, ending with EOF or the first error
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof() || token.is_error();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}
