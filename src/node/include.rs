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

//! Fragment includes and the node lookup collaborator

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::{Node, NodeRef, Rendered, Translator};
use crate::core::{Error, Result};
use crate::params::Parameters;

/// Resolves fragment ids to nodes
pub trait NodeLookup: Send + Sync {
    fn lookup(&self, id: &str) -> Result<NodeRef>;
}

/// In-memory [`NodeLookup`]
///
/// Fragments may be registered after the includes that reference them are
/// built; resolution happens on first render.
#[derive(Default)]
pub struct MapLookup {
    nodes: RwLock<FxHashMap<String, NodeRef>>,
}

impl MapLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node under an id, replacing any previous one
    pub fn insert(&self, id: impl Into<String>, node: NodeRef) {
        self.nodes.write().insert(id.into(), node);
    }

    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }
}

impl NodeLookup for MapLookup {
    fn lookup(&self, id: &str) -> Result<NodeRef> {
        self.nodes
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::FragmentNotFound(id.to_string()))
    }
}

impl fmt::Debug for MapLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self.nodes.read();
        let mut ids: Vec<_> = nodes.keys().collect();
        ids.sort();
        f.debug_struct("MapLookup").field("ids", &ids).finish()
    }
}

/// Renders another fragment in place
///
/// The referenced node is resolved on first render and reused by every
/// later render of this instance.
pub struct IncludeNode {
    refid: String,
    lookup: Arc<dyn NodeLookup>,
    resolved: OnceLock<NodeRef>,
}

impl IncludeNode {
    pub fn new(refid: impl Into<String>, lookup: Arc<dyn NodeLookup>) -> Self {
        Self {
            refid: refid.into(),
            lookup,
            resolved: OnceLock::new(),
        }
    }

    pub fn refid(&self) -> &str {
        &self.refid
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    fn target(&self) -> Result<&NodeRef> {
        if let Some(node) = self.resolved.get() {
            return Ok(node);
        }
        let node = self.lookup.lookup(&self.refid)?;
        tracing::trace!(refid = %self.refid, "resolved include");
        Ok(self.resolved.get_or_init(|| node))
    }
}

impl Node for IncludeNode {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        self.target()?
            .render(translator, params)
            .map_err(|e| e.in_node(format!("include refid={:?}", self.refid)))
    }
}

impl fmt::Debug for IncludeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncludeNode")
            .field("refid", &self.refid)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
