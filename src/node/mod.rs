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

//! SQL fragment node tree
//!
//! A template is compiled once into a tree of nodes and rendered per
//! request into SQL text plus its ordered arguments:
//!
//! - [`TextNode`] - literal SQL with `#{}` bound and `${}` raw placeholders
//! - [`ConditionNode`] / [`ChooseNode`] - predicate-controlled branches
//! - [`ForeachNode`] - iteration over a sequence or map
//! - [`TrimNode`] / [`WhereNode`] / [`SetNode`] - clause cleanup
//! - [`IncludeNode`] - reference to another fragment through a [`NodeLookup`]
//! - [`BindNode`] - named expression exposed to sibling nodes
//! - [`NodeGroup`] / [`Fragment`] - ordered children and the render entry
//!
//! Nodes are immutable after construction and may be rendered from many
//! threads at once. Render-time state lives in the parameter layers the
//! render call creates.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sqlweave::node::{ConditionNode, Fragment, Node, QuestionMark, TextNode, WhereNode};
//! use sqlweave::{params, Value};
//!
//! let fragment = Fragment::new("findUsers", vec![
//!     Arc::new(TextNode::new("SELECT * FROM users").unwrap()),
//!     Arc::new(WhereNode::new(vec![
//!         Arc::new(ConditionNode::new("name != \"\"", vec![
//!             Arc::new(TextNode::new("AND name = #{name}").unwrap()),
//!         ]).unwrap()),
//!     ])),
//! ]);
//!
//! let (sql, args) = fragment.render(&QuestionMark, &params! { name: "ann" }).unwrap();
//! assert_eq!(sql, "SELECT * FROM users WHERE name = ?");
//! assert_eq!(args, vec![Value::str("ann")]);
//! ```

mod bind;
mod condition;
mod foreach;
mod group;
mod include;
mod text;
mod translator;
mod trim;

pub use bind::{BindNode, BindScope};
pub use condition::{ChooseNode, ConditionNode};
pub use foreach::ForeachNode;
pub use group::{Fragment, NodeGroup};
pub use include::{IncludeNode, MapLookup, NodeLookup};
pub use text::{Placeholder, PlaceholderKind, TextNode};
pub use translator::{ColonNamed, DollarNumbered, QuestionMark, Translator};
pub use trim::{SetNode, TrimNode, WhereNode};

use std::fmt;
use std::sync::Arc;

use crate::core::{Result, Value};
use crate::params::Parameters;

/// Rendered SQL text and its ordered arguments
pub type Rendered = (String, Vec<Value>);

/// Shared handle to a node
pub type NodeRef = Arc<dyn Node>;

/// A renderable piece of a SQL template
pub trait Node: fmt::Debug + Send + Sync {
    /// Render to SQL text and arguments
    ///
    /// Any failure aborts the render; there is no partial output.
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered>;

    /// Downcast used by [`NodeGroup`] to collect bind nodes
    fn as_bind(&self) -> Option<&BindNode> {
        None
    }
}
