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

//! Token types for the expression lexer

use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::LazyLock;

/// Position represents a position in the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset, starting at 0
    pub offset: usize,
    /// Line number, starting at 1
    pub line: usize,
    /// Column number, starting at 1
    pub column: usize,
}

impl Position {
    /// Create a new position
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// TokenType represents the type of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Error token
    Error,
    /// End of input
    Eof,
    /// Identifier (parameter or function name)
    Identifier,
    /// Boolean keyword (true, false)
    Keyword,
    /// Double-quoted or raw (backtick) string literal
    String,
    /// Single-quoted character literal
    Char,
    /// Integer number (123, 0x7f)
    Integer,
    /// Floating point number (1.5, 2e10)
    Float,
    /// Operator (==, &&, +, ...)
    Operator,
    /// Punctuator (parentheses, brackets, comma, dot, colon, ellipsis)
    Punctuator,
    /// Comment (// or /* */)
    Comment,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Error => write!(f, "ERROR"),
            TokenType::Eof => write!(f, "EOF"),
            TokenType::Identifier => write!(f, "IDENTIFIER"),
            TokenType::Keyword => write!(f, "KEYWORD"),
            TokenType::String => write!(f, "STRING"),
            TokenType::Char => write!(f, "CHAR"),
            TokenType::Integer => write!(f, "INTEGER"),
            TokenType::Float => write!(f, "FLOAT"),
            TokenType::Operator => write!(f, "OPERATOR"),
            TokenType::Punctuator => write!(f, "PUNCTUATOR"),
            TokenType::Comment => write!(f, "COMMENT"),
        }
    }
}

/// Token represents a lexical token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type of the token
    pub token_type: TokenType,
    /// The literal string value
    pub literal: String,
    /// The position in the source
    pub position: Position,
    /// Error message (if token_type is Error)
    pub error: Option<String>,
}

impl Token {
    /// Create a new token
    pub fn new(token_type: TokenType, literal: impl Into<String>, position: Position) -> Self {
        Self {
            token_type,
            literal: literal.into(),
            position,
            error: None,
        }
    }

    /// Create an error token
    pub fn error(
        message: impl Into<String>,
        literal: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            token_type: TokenType::Error,
            literal: literal.into(),
            position,
            error: Some(message.into()),
        }
    }

    /// Create an EOF token
    pub fn eof(position: Position) -> Self {
        Self {
            token_type: TokenType::Eof,
            literal: String::new(),
            position,
            error: None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }

    /// Check if this is an operator with the given value
    pub fn is_operator(&self, op: &str) -> bool {
        self.token_type == TokenType::Operator && self.literal == op
    }

    /// Check if this is a punctuator with the given value
    pub fn is_punctuator(&self, punct: &str) -> bool {
        self.token_type == TokenType::Punctuator && self.literal == punct
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TokenType::Error => write!(
                f,
                "{}: {} at {}",
                self.token_type,
                self.error.as_deref().unwrap_or("unknown error"),
                self.position
            ),
            TokenType::Eof => write!(f, "{} at {}", self.token_type, self.position),
            _ => write!(
                f,
                "{}: '{}' at {}",
                self.token_type, self.literal, self.position
            ),
        }
    }
}

/// Boolean keywords
pub static KEYWORDS: &[&str] = &["true", "false"];

/// Reserved words that lex as logical operators
pub static WORD_OPERATORS: &[(&str, &str)] = &[("and", "&&"), ("or", "||"), ("not", "!")];

pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Map a reserved word onto its logical operator
pub fn word_operator(s: &str) -> Option<&'static str> {
    WORD_OPERATORS
        .iter()
        .find(|(word, _)| *word == s)
        .map(|(_, op)| *op)
}

/// Expression operators
pub static OPERATORS: &[&str] = &[
    "==", "!=", "<", "<=", ">", ">=", "&&", "||", "!", "&", "|", "^", "~", "+", "-", "*", "/",
    "%",
];

static OPERATOR_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| OPERATORS.iter().copied().collect());

/// Check if a string is an operator
pub fn is_operator(s: &str) -> bool {
    OPERATOR_SET.contains(s)
}

/// Single-character punctuators
pub static PUNCTUATORS: &[char] = &[',', '(', ')', '.', ':', '[', ']'];

pub fn is_punctuator(c: char) -> bool {
    PUNCTUATORS.contains(&c)
}

/// Characters that can start an operator
pub fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '=' | '<' | '>' | '!' | '+' | '-' | '*' | '/' | '%' | '|' | '&' | '^' | '~'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_display() {
        assert_eq!(TokenType::Identifier.to_string(), "IDENTIFIER");
        assert_eq!(TokenType::Char.to_string(), "CHAR");
        assert_eq!(TokenType::Eof.to_string(), "EOF");
    }

    #[test]
    fn test_token_creation() {
        let token = Token::new(TokenType::Operator, "&&", Position::new(0, 1, 1));
        assert!(token.is_operator("&&"));
        assert!(!token.is_operator("||"));
        assert!(!token.is_punctuator("&&"));
    }

    #[test]
    fn test_error_token() {
        let token = Token::error("unexpected character", "@", Position::new(5, 1, 6));
        assert!(token.is_error());
        assert_eq!(token.error, Some("unexpected character".to_string()));
        assert!(token.to_string().contains("ERROR: unexpected character"));
    }

    #[test]
    fn test_word_operators() {
        assert_eq!(word_operator("and"), Some("&&"));
        assert_eq!(word_operator("or"), Some("||"));
        assert_eq!(word_operator("not"), Some("!"));
        assert_eq!(word_operator("AND"), None);
        assert_eq!(word_operator("android"), None);
    }

    #[test]
    fn test_is_operator() {
        assert!(is_operator("=="));
        assert!(is_operator("&&"));
        assert!(is_operator("^"));
        assert!(!is_operator("="));
        assert!(!is_operator("==="));
    }

    #[test]
    fn test_is_keyword() {
        assert!(is_keyword("true"));
        assert!(!is_keyword("TRUE"));
        assert!(!is_keyword("nil"));
    }
}
