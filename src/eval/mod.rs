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

//! Expression engine
//!
//! [`Expression::compile`] tokenizes, parses and constant-folds a source
//! string into an immutable tree; [`Expression::evaluate`] walks that tree
//! against a parameter source.
//!
//! # Example
//!
//! ```
//! use sqlweave::eval::Expression;
//! use sqlweave::params;
//! use sqlweave::Value;
//!
//! let expr = Expression::compile("age >= 18 and name != \"\"").unwrap();
//! let params = params! { age: 21, name: "ann" };
//! assert_eq!(expr.evaluate(&params).unwrap(), Value::Bool(true));
//! ```

pub mod cache;
pub mod evaluator;
pub mod ops;

pub use cache::{global_cache, ExpressionCache};
pub use evaluator::Evaluator;

use std::fmt;
use std::str::FromStr;

use crate::core::{Error, Result, Value};
use crate::optimizer::fold_constants;
use crate::params::Parameters;
use crate::parser::{parse_expr, Expr};

/// A compiled expression
///
/// Immutable after compilation and safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    /// Parse and constant-fold an expression
    pub fn compile(source: &str) -> Result<Expression> {
        let parsed = parse_expr(source).map_err(|e| Error::syntax(source, e))?;
        let root = fold_constants(parsed)?;
        Ok(Expression {
            source: source.to_string(),
            root,
        })
    }

    /// Evaluate against a parameter source
    pub fn evaluate(&self, params: &dyn Parameters) -> Result<Value> {
        Evaluator::new(params).eval(&self.root)
    }

    /// The source text this expression was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The folded tree
    pub fn root(&self) -> &Expr {
        &self.root
    }
}

impl FromStr for Expression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Expression::compile(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Compile and evaluate in one step
pub fn eval(source: &str, params: &dyn Parameters) -> Result<Value> {
    Expression::compile(source)?.evaluate(params)
}
