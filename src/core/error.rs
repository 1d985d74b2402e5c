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

//! Error types for sqlweave
//!
//! Every failure raised while compiling an expression, evaluating it, or
//! rendering a fragment tree is one of the variants below. Render failures
//! abort the whole render; nested failures are wrapped in [`Error::Render`]
//! so the original stays reachable through [`std::error::Error::source`].

use thiserror::Error;

use crate::parser::ParseError;

/// Result type alias for sqlweave operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for expression and template operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // =========================================================================
    // Compile errors
    // =========================================================================
    /// Expression source failed to parse
    #[error("syntax error in expression {expr:?}: {source}")]
    Syntax {
        expr: String,
        #[source]
        source: ParseError,
    },

    /// A grammar node that the evaluator cannot handle
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    // =========================================================================
    // Evaluation errors
    // =========================================================================
    /// Identifier is neither a builtin nor a resolvable parameter
    #[error("undefined identifier: {0}")]
    UndefinedIdentifier(String),

    /// Sequence index or slice bound outside the receiver
    #[error("index out of range [{index}] with length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Operand or argument kinds do not fit the operation
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Wrong number of call arguments
    #[error("wrong number of arguments in call to {name}: expected {expected}, got {got}")]
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },

    /// Integer division or remainder by zero
    #[error("integer divide by zero")]
    DivisionByZero,

    /// Selector target has no such field, tag or key
    #[error("{type_name} has no field or key {name:?}")]
    FieldNotFound { type_name: String, name: String },

    /// Host function reported a failure
    #[error("function {name}: {message}")]
    Function { name: String, message: String },

    // =========================================================================
    // Render errors
    // =========================================================================
    /// Bind scope has no variable by that name
    #[error("bind variable {0:?} not found")]
    BindVariableNotFound(String),

    /// Placeholder or substitution target is missing from the parameters
    #[error("parameter {0:?} not found")]
    ParameterNotFound(String),

    /// Foreach collection is neither a sequence nor a map
    #[error("collection {name:?} is not iterable: got {kind}")]
    CollectionNotIterable { name: String, kind: String },

    /// Foreach item or index name shadows an existing parameter
    #[error("foreach binding {0:?} conflicts with an existing parameter")]
    ItemNameConflict(String),

    /// Referenced fragment id is unknown to the lookup
    #[error("fragment {0:?} not found")]
    FragmentNotFound(String),

    /// Node was configured in a way that can never render
    #[error("invalid {node} node: {message}")]
    InvalidNode { node: &'static str, message: String },

    /// Failure inside a node, annotated with the node that was rendering
    #[error("{node}: {source}")]
    Render {
        node: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a new Syntax error
    pub fn syntax(expr: impl Into<String>, source: ParseError) -> Self {
        Error::Syntax {
            expr: expr.into(),
            source,
        }
    }

    /// Create a new TypeMismatch error
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Error::TypeMismatch(message.into())
    }

    /// Create a new ArityMismatch error
    pub fn arity_mismatch(name: impl Into<String>, expected: impl Into<String>, got: usize) -> Self {
        Error::ArityMismatch {
            name: name.into(),
            expected: expected.into(),
            got,
        }
    }

    /// Create a new FieldNotFound error
    pub fn field_not_found(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Error::FieldNotFound {
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Create a new Function error
    pub fn function(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Function {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new InvalidNode error
    pub fn invalid_node(node: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidNode {
            node,
            message: message.into(),
        }
    }

    /// Wrap this error with the node that was rendering when it occurred
    pub fn in_node(self, node: impl Into<String>) -> Self {
        Error::Render {
            node: node.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping every [`Error::Render`] wrapper
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Error::Render { source, .. } = current {
            current = source;
        }
        current
    }

    /// Check if this is a compile-time failure
    pub fn is_syntax(&self) -> bool {
        matches!(self.root_cause(), Error::Syntax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Position;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::UndefinedIdentifier("foo".into()).to_string(),
            "undefined identifier: foo"
        );
        assert_eq!(
            Error::IndexOutOfRange { index: 3, len: 3 }.to_string(),
            "index out of range [3] with length 3"
        );
        assert_eq!(
            Error::arity_mismatch("len", "1", 2).to_string(),
            "wrong number of arguments in call to len: expected 1, got 2"
        );
    }

    #[test]
    fn test_render_wrapping_keeps_cause() {
        let err = Error::ParameterNotFound("id".into())
            .in_node("text")
            .in_node("where");
        assert_eq!(err.root_cause(), &Error::ParameterNotFound("id".into()));
        let source = err.source().expect("wrapped error has a source");
        assert_eq!(source.to_string(), "text: parameter \"id\" not found");
    }

    #[test]
    fn test_syntax_error_source() {
        let err = Error::syntax("a +", ParseError::new("unexpected end", Position::new(3, 1, 4)));
        assert!(err.is_syntax());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("a +"));
    }
}
