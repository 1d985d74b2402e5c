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

//! Expression parser
//!
//! This module turns expression source text into an [`Expr`] tree:
//!
//! - [`Lexer`] - Tokenizer for expression input
//! - [`Parser`] - Pratt parser that builds the tree from tokens
//! - [`ast`] - Expression tree types
//! - [`token`] - Token types
//! - [`error`] - Parser error types
//!
//! # Example
//!
//! ```
//! use sqlweave::parser::{parse_expr, Expr};
//!
//! let expr = parse_expr("user.Age >= 18 && !banned").unwrap();
//! assert!(matches!(expr, Expr::Binary { .. }));
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod precedence;
pub mod token;

// Expression parsing is implemented as an impl block on Parser
mod expressions;

pub use ast::{BinaryOperator, Expr, Literal, UnaryOperator};
pub use error::ParseError;
pub use lexer::Lexer;
pub use parser::{parse_expr, Parser};
pub use precedence::Precedence;
pub use token::{Position, Token, TokenType};
