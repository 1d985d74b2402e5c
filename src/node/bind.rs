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

//! Bind nodes and the per-render bind scope

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use super::{Node, Rendered, Translator};
use crate::core::{Error, Result, Value};
use crate::eval::{global_cache, Expression};
use crate::params::{lookup_path, split_path, walk, Parameters};

/// Names an expression so sibling nodes can use it as a parameter
///
/// Renders nothing itself. The enclosing [`NodeGroup`](super::NodeGroup)
/// exposes every bind among its children through a [`BindScope`].
pub struct BindNode {
    name: String,
    expr: Arc<Expression>,
}

impl BindNode {
    pub fn new(name: impl Into<String>, value: &str) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_node("bind", "missing name"));
        }
        Ok(Self {
            name,
            expr: global_cache().get_or_compile(value)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }
}

impl Node for BindNode {
    fn render(&self, _translator: &dyn Translator, _params: &dyn Parameters) -> Result<Rendered> {
        Ok((String::new(), Vec::new()))
    }

    fn as_bind(&self) -> Option<&BindNode> {
        Some(self)
    }
}

impl fmt::Debug for BindNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindNode")
            .field("name", &self.name)
            .field("value", &self.expr.source())
            .finish()
    }
}

/// Request-local view of a set of binds over the outer parameters
///
/// A bind is evaluated the first time it is referenced and memoized for
/// the rest of the render. Its expression sees the other binds of the
/// scope, so a later bind can build on an earlier one. While a bind is
/// being evaluated its own name resolves to the outer parameters, which
/// lets `name = "%" + name + "%"` refer to the outer `name`. Bind names
/// take priority over outer names; any other name falls through to the
/// outer parameters.
pub struct BindScope<'a> {
    binds: FxHashMap<&'a str, &'a BindNode>,
    outer: &'a dyn Parameters,
    values: RefCell<FxHashMap<&'a str, Value>>,
    /// Binds currently being evaluated
    active: RefCell<FxHashSet<&'a str>>,
    /// First evaluation failure; `get` cannot return it directly
    failure: RefCell<Option<Error>>,
}

impl<'a> BindScope<'a> {
    pub fn new(binds: impl IntoIterator<Item = &'a BindNode>, outer: &'a dyn Parameters) -> Self {
        Self {
            binds: binds.into_iter().map(|b| (b.name(), b)).collect(),
            outer,
            values: RefCell::new(FxHashMap::default()),
            active: RefCell::new(FxHashSet::default()),
            failure: RefCell::new(None),
        }
    }

    /// Value of a bind variable, evaluating it on first use
    pub fn lookup(&self, name: &str) -> Result<Value> {
        if let Some(value) = self.values.borrow().get(name) {
            return Ok(value.clone());
        }
        let (&key, bind) = self
            .binds
            .get_key_value(name)
            .ok_or_else(|| Error::BindVariableNotFound(name.to_string()))?;
        if !self.active.borrow_mut().insert(key) {
            return Err(Error::BindVariableNotFound(name.to_string()));
        }
        let value = bind.expr.evaluate(self);
        self.active.borrow_mut().remove(key);
        let value = value.map_err(|e| e.in_node(format!("bind {:?}", bind.name)))?;
        self.values.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// Take the first bind evaluation failure seen through `get`
    pub fn take_failure(&self) -> Option<Error> {
        self.failure.borrow_mut().take()
    }
}

impl Parameters for BindScope<'_> {
    fn get(&self, name: &str) -> Option<Value> {
        let (root, rest) = split_path(name);
        match self.lookup(root) {
            Ok(value) => match rest {
                Some(rest) => walk(value, rest),
                None => Some(value),
            },
            Err(Error::BindVariableNotFound(_)) => {
                tracing::debug!(name, "bind variable not found, falling through to parameters");
                lookup_path(self.outer, name)
            }
            Err(err) => {
                self.failure.borrow_mut().get_or_insert(err);
                None
            }
        }
    }
}
