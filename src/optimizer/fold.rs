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

//! Constant folding
//!
//! A subtree is foldable when every leaf is a literal and every inner node
//! is a binary operator, unary operator or parenthesis. Foldable subtrees
//! are evaluated once against empty parameters and replaced by the literal
//! they produce. Folding runs top-down so `false && (1 / 0 == 1)` folds to
//! `false` without evaluating the division.
//!
//! Values with no literal form (uint, complex) leave the subtree as is.
//! Evaluation errors are returned unchanged: a constant subtree cannot
//! depend on runtime data, so its failure is a real failure.

use crate::core::Result;
use crate::eval::Evaluator;
use crate::params::EmptyParameters;
use crate::parser::ast::{Expr, Literal};

/// Folds constant subtrees into literals
#[derive(Debug, Default)]
pub struct ConstantFolder {
    /// Number of subtrees replaced in the last run
    folded: usize,
}

impl ConstantFolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of subtrees replaced by the last call to [`fold`](Self::fold)
    pub fn folded(&self) -> usize {
        self.folded
    }

    /// Fold every constant subtree of `expr`
    pub fn fold(&mut self, expr: Expr) -> Result<Expr> {
        self.folded = 0;
        self.fold_recursive(expr)
    }

    fn fold_recursive(&mut self, expr: Expr) -> Result<Expr> {
        if expr.is_constant() && !expr.is_literal() {
            let value = Evaluator::new(&EmptyParameters).eval(&expr)?;
            return Ok(match Literal::from_value(&value) {
                Some(lit) => {
                    self.folded += 1;
                    Expr::Literal(lit)
                }
                None => expr,
            });
        }

        Ok(match expr {
            Expr::Binary { op, left, right } => {
                let left = self.fold_recursive(*left)?;
                let right = self.fold_recursive(*right)?;
                Expr::binary(op, left, right)
            }
            Expr::Unary { op, operand } => Expr::unary(op, self.fold_recursive(*operand)?),
            Expr::Call {
                callee,
                args,
                spread,
            } => Expr::Call {
                callee: Box::new(self.fold_recursive(*callee)?),
                args: args
                    .into_iter()
                    .map(|arg| self.fold_recursive(arg))
                    .collect::<Result<Vec<_>>>()?,
                spread,
            },
            Expr::Selector { receiver, name } => Expr::Selector {
                receiver: Box::new(self.fold_recursive(*receiver)?),
                name,
            },
            Expr::Index { receiver, index } => Expr::Index {
                receiver: Box::new(self.fold_recursive(*receiver)?),
                index: Box::new(self.fold_recursive(*index)?),
            },
            Expr::Slice {
                receiver,
                low,
                high,
                max,
            } => Expr::Slice {
                receiver: Box::new(self.fold_recursive(*receiver)?),
                low,
                high,
                max,
            },
            Expr::Paren(inner) => Expr::Paren(Box::new(self.fold_recursive(*inner)?)),
            other => other,
        })
    }
}

/// Fold every constant subtree of `expr`
pub fn fold_constants(expr: Expr) -> Result<Expr> {
    ConstantFolder::new().fold(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::params::MapParameters;
    use crate::parser::parse_expr;

    fn fold(src: &str) -> Result<Expr> {
        fold_constants(parse_expr(src).unwrap())
    }

    #[test]
    fn test_folds_whole_constant_tree() {
        assert_eq!(fold("1 + 2 * 3").unwrap(), Expr::Literal(Literal::Int(7)));
        assert_eq!(
            fold("\"a\" + \"b\"").unwrap(),
            Expr::Literal(Literal::Str("ab".into()))
        );
        assert_eq!(fold("!(1 < 2)").unwrap(), Expr::Literal(Literal::Bool(false)));
    }

    #[test]
    fn test_folds_constant_children_of_dynamic_nodes() {
        let mut folder = ConstantFolder::new();
        let expr = folder.fold(parse_expr("x > 60 * 60").unwrap()).unwrap();
        assert_eq!(expr.to_string(), "x > 3600");
        assert_eq!(folder.folded(), 1);

        let expr = fold("f(1 + 1, y)").unwrap();
        assert_eq!(expr.to_string(), "f(2, y)");
    }

    #[test]
    fn test_short_circuit_respected() {
        assert_eq!(
            fold("false && (1 / 0 == 1)").unwrap(),
            Expr::Literal(Literal::Bool(false))
        );
    }

    #[test]
    fn test_fold_errors_propagate() {
        assert_eq!(fold("1 / 0"), Err(Error::DivisionByZero));
        assert!(matches!(fold("1 + \"a\""), Err(Error::TypeMismatch(_))));
    }

    #[test]
    fn test_dynamic_leaves_untouched() {
        assert_eq!(fold("x").unwrap(), Expr::Identifier("x".into()));
        assert!(matches!(fold("^true"), Err(Error::TypeMismatch(_))));
    }

    #[test]
    fn test_fold_preserves_meaning() {
        let params = MapParameters::new().with("x", 5);
        for src in ["x * (2 + 3)", "x > 1 + 1 && true", "-(3 - 10) + x"] {
            let expr = parse_expr(src).unwrap();
            let plain = Evaluator::new(&params).eval(&expr).unwrap();
            let folded = Evaluator::new(&params).eval(&fold_constants(expr).unwrap()).unwrap();
            assert_eq!(plain, folded, "{}", src);
        }
    }
}
