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

//! # Sqlweave - Dynamic SQL templates
//!
//! Sqlweave renders parameterized SQL from a tree of template nodes whose
//! branches are decided by a small embedded expression language.
//!
//! ## Key Features
//!
//! - **Expression Engine** - Pratt-parsed expressions with constant folding,
//!   short-circuit logic, member/index/slice access and host function calls
//! - **Fragment Nodes** - if, choose, foreach, trim, where, set, include and bind
//! - **Dialect Translators** - `?`, `$n` and `:name` placeholders
//! - **Typed Errors** - every failure is an [`Error`] variant with its cause kept
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sqlweave::node::{ConditionNode, DollarNumbered, ForeachNode, Fragment, Node, TextNode, WhereNode};
//! use sqlweave::{params, Value};
//!
//! let fragment = Fragment::new("findUsers", vec![
//!     Arc::new(TextNode::new("SELECT * FROM users").unwrap()),
//!     Arc::new(WhereNode::new(vec![
//!         Arc::new(ConditionNode::new("minAge > 0", vec![
//!             Arc::new(TextNode::new("AND age >= #{minAge}").unwrap()),
//!         ]).unwrap()),
//!         Arc::new(ConditionNode::new("len(ids) > 0", vec![
//!             Arc::new(TextNode::new("AND id IN").unwrap()),
//!             Arc::new(ForeachNode::new("ids", "id", vec![
//!                 Arc::new(TextNode::new("#{id}").unwrap()),
//!             ]).unwrap().with_open("(").with_close(")").with_separator(", ")),
//!         ]).unwrap()),
//!     ])),
//! ]);
//!
//! let params = params! { minAge: 0, ids: vec![3, 5] };
//! let (sql, args) = fragment.render(&DollarNumbered::new(), &params).unwrap();
//! assert_eq!(sql, "SELECT * FROM users WHERE id IN ($1, $2)");
//! assert_eq!(args, vec![Value::Int(3), Value::Int(5)]);
//! ```
//!
//! ## Modules
//!
//! - [`core`] - Core types ([`Value`], [`Kind`], object capabilities, [`Error`])
//! - [`params`] - Parameter sources and the stacked [`Resolver`]
//! - [`parser`] - Expression lexer and Pratt parser
//! - [`optimizer`] - Constant folding
//! - [`eval`] - Compiled [`Expression`]s, evaluator and operator table
//! - [`functions`] - Builtin functions
//! - [`node`] - SQL fragment nodes
//! - [`common`] - Utilities ([`StringPool`])
//! - [`config`] - Resolver configuration

pub mod common;
pub mod config;
pub mod core;
pub mod eval;
pub mod functions;
pub mod node;
pub mod optimizer;
pub mod params;
pub mod parser;

// Re-export main types for convenience
pub use core::{
    Callable, Complex, Dict, Error, Function, Kind, List, MapLike, Object, Record, Ref, Result,
    SequenceLike, Signature, StructLike, StructSchema, StructSchemaBuilder, Value,
};

// Re-export common utilities
pub use common::StringPool;

// Re-export config types
pub use config::ResolverConfig;

// Re-export expression types
pub use eval::{Expression, ExpressionCache};

// Re-export parameter types
pub use params::{MapParameters, Parameters, Resolver};

// Re-export node types
pub use node::{Fragment, Node, NodeRef, Translator};
