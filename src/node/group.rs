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

//! Node groups and top-level fragments

use std::fmt;

use super::bind::{BindNode, BindScope};
use super::{Node, NodeRef, Rendered, Translator};
use crate::common::string_pool;
use crate::config::ResolverConfig;
use crate::core::{Result, Value};
use crate::params::{Parameters, Resolver};

/// Ordered children rendered as one unit
///
/// Each child's output is trimmed; empty outputs are skipped and the rest
/// are joined with a single space. When any child is a [`BindNode`], the
/// children see the outer parameters through a [`BindScope`].
#[derive(Default)]
pub struct NodeGroup {
    nodes: Vec<NodeRef>,
    has_binds: bool,
}

impl NodeGroup {
    pub fn new(nodes: Vec<NodeRef>) -> Self {
        let has_binds = nodes.iter().any(|n| n.as_bind().is_some());
        Self { nodes, has_binds }
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn binds(&self) -> impl Iterator<Item = &BindNode> {
        self.nodes.iter().filter_map(|n| n.as_bind())
    }

    fn render_children(
        &self,
        translator: &dyn Translator,
        params: &dyn Parameters,
    ) -> Result<Rendered> {
        let mut out = string_pool().get();
        let mut args = Vec::new();
        for node in &self.nodes {
            let (query, node_args) = match node.render(translator, params) {
                Ok(rendered) => rendered,
                Err(err) => {
                    string_pool().put(out);
                    return Err(err);
                }
            };
            let query = query.trim();
            if query.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(query);
            args.extend(node_args);
        }
        let query = out.as_str().to_string();
        string_pool().put(out);
        Ok((query, args))
    }
}

impl Node for NodeGroup {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        if !self.has_binds {
            return self.render_children(translator, params);
        }
        let scope = BindScope::new(self.binds(), params);
        let rendered = self.render_children(translator, &scope);
        // a bind that failed inside a lookup surfaces here, ahead of the
        // follow-on error it caused
        if let Some(err) = scope.take_failure() {
            return Err(err);
        }
        rendered
    }
}

impl fmt::Debug for NodeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

impl From<Vec<NodeRef>> for NodeGroup {
    fn from(nodes: Vec<NodeRef>) -> Self {
        Self::new(nodes)
    }
}

/// A named top-level statement
///
/// This is the render entry point: `render(translator, params)` produces
/// the final SQL text and its ordered arguments.
#[derive(Debug)]
pub struct Fragment {
    id: String,
    body: NodeGroup,
}

impl Fragment {
    pub fn new(id: impl Into<String>, nodes: Vec<NodeRef>) -> Self {
        Self {
            id: id.into(),
            body: NodeGroup::new(nodes),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render against a single root value, wrapped in a fresh [`Resolver`]
    pub fn render_value(
        &self,
        translator: &dyn Translator,
        value: Value,
        config: ResolverConfig,
    ) -> Result<Rendered> {
        let resolver = Resolver::from_value(value, config);
        self.render(translator, &resolver)
    }
}

impl Node for Fragment {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        self.body.render(translator, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::node::{QuestionMark, TextNode};
    use crate::params;
    use std::sync::Arc;

    fn text(s: &str) -> NodeRef {
        Arc::new(TextNode::new(s).unwrap())
    }

    #[test]
    fn test_join_trims_and_skips_empty() {
        let group = NodeGroup::new(vec![text("  SELECT *  "), text("   "), text("\nFROM t\n")]);
        let (query, _) = group.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "SELECT * FROM t");
    }

    #[test]
    fn test_args_in_order() {
        let group = NodeGroup::new(vec![text("a = #{a}"), text("AND b = #{b}")]);
        let (query, args) = group.render(&QuestionMark, &params! { a: 1, b: 2 }).unwrap();
        assert_eq!(query, "a = ? AND b = ?");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_binds_visible_to_siblings() {
        let group = NodeGroup::new(vec![
            Arc::new(BindNode::new("pattern", "\"%\" + name + \"%\"").unwrap()),
            text("name LIKE #{pattern}"),
        ]);
        let (query, args) = group
            .render(&QuestionMark, &params! { name: "ann" })
            .unwrap();
        assert_eq!(query, "name LIKE ?");
        assert_eq!(args, vec![Value::str("%ann%")]);
    }

    #[test]
    fn test_bind_failure_surfaces() {
        let group = NodeGroup::new(vec![
            Arc::new(BindNode::new("x", "1 + missing").unwrap()),
            text("v = #{x}"),
        ]);
        let err = group.render(&QuestionMark, &params! {}).unwrap_err();
        assert_eq!(err.root_cause(), &Error::UndefinedIdentifier("missing".into()));
    }

    #[test]
    fn test_fragment_render_value() {
        let fragment = Fragment::new("byId", vec![text("SELECT * FROM t WHERE id = #{param}")]);
        assert_eq!(fragment.id(), "byId");
        let (query, args) = fragment
            .render_value(&QuestionMark, Value::Int(4), ResolverConfig::default())
            .unwrap();
        assert_eq!(query, "SELECT * FROM t WHERE id = ?");
        assert_eq!(args, vec![Value::Int(4)]);
    }
}
