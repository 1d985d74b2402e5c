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

//! Trim, where and set nodes

use super::group::NodeGroup;
use super::{Node, NodeRef, Rendered, Translator};
use crate::core::Result;
use crate::params::Parameters;

/// Case-insensitive prefix test that never splits a character
fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.get(s.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

/// Wraps the rendered children with a prefix and suffix
///
/// Children are rendered first; empty output renders nothing. Otherwise
/// the first matching prefix override is stripped from the start and the
/// first matching suffix override from the end (declared order, compared
/// case-insensitively), then `prefix` and `suffix` are added.
#[derive(Debug, Default)]
pub struct TrimNode {
    children: NodeGroup,
    prefix: String,
    prefix_overrides: Vec<String>,
    suffix: String,
    suffix_overrides: Vec<String>,
}

impl TrimNode {
    pub fn new(children: Vec<NodeRef>) -> Self {
        Self {
            children: NodeGroup::new(children),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_prefix_overrides<S: Into<String>>(mut self, overrides: impl IntoIterator<Item = S>) -> Self {
        self.prefix_overrides = overrides.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_suffix_overrides<S: Into<String>>(mut self, overrides: impl IntoIterator<Item = S>) -> Self {
        self.suffix_overrides = overrides.into_iter().map(Into::into).collect();
        self
    }

    /// Apply overrides, prefix and suffix to already rendered text
    pub fn apply(&self, query: &str) -> String {
        let mut body = query.trim();
        if body.is_empty() {
            return String::new();
        }
        if let Some(o) = self
            .prefix_overrides
            .iter()
            .find(|o| starts_with_ignore_case(body, o))
        {
            body = body[o.len()..].trim_start();
        }
        if let Some(o) = self
            .suffix_overrides
            .iter()
            .find(|o| ends_with_ignore_case(body, o))
        {
            body = body[..body.len() - o.len()].trim_end();
        }

        let mut out = String::with_capacity(self.prefix.len() + body.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(body);
        out.push_str(&self.suffix);
        out
    }
}

impl Node for TrimNode {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        let (query, args) = self.children.render(translator, params)?;
        if query.trim().is_empty() {
            return Ok((String::new(), Vec::new()));
        }
        Ok((self.apply(&query), args))
    }
}

/// `WHERE` clause: strips one leading `AND`/`OR` followed by whitespace
#[derive(Debug)]
pub struct WhereNode(TrimNode);

impl WhereNode {
    pub fn new(children: Vec<NodeRef>) -> Self {
        Self(
            TrimNode::new(children)
                .with_prefix("WHERE ")
                .with_prefix_overrides([
                    "AND ", "OR ", "AND\n", "OR\n", "AND\t", "OR\t", "AND\r", "OR\r",
                ]),
        )
    }
}

impl Node for WhereNode {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        self.0.render(translator, params)
    }
}

/// `SET` clause: strips one trailing comma
#[derive(Debug)]
pub struct SetNode(TrimNode);

impl SetNode {
    pub fn new(children: Vec<NodeRef>) -> Self {
        Self(
            TrimNode::new(children)
                .with_prefix("SET ")
                .with_suffix_overrides([","]),
        )
    }
}

impl Node for SetNode {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        self.0.render(translator, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::node::{ConditionNode, QuestionMark, TextNode};
    use crate::params;
    use std::sync::Arc;

    fn text(s: &str) -> NodeRef {
        Arc::new(TextNode::new(s).unwrap())
    }

    #[test]
    fn test_where_strips_leading_connective() {
        let node = WhereNode::new(vec![text("AND x = #{x}")]);
        let (query, args) = node.render(&QuestionMark, &params! { x: 1 }).unwrap();
        assert_eq!(query, "WHERE x = ?");
        assert_eq!(args, vec![Value::Int(1)]);

        let node = WhereNode::new(vec![text("or y = 2")]);
        let (query, _) = node.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "WHERE y = 2");
    }

    #[test]
    fn test_where_strips_connective_before_newline_or_tab() {
        let node = WhereNode::new(vec![text("AND\n  x = 1")]);
        let (query, _) = node.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "WHERE x = 1");

        let node = WhereNode::new(vec![text("or\ty = 2")]);
        let (query, _) = node.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "WHERE y = 2");
    }

    #[test]
    fn test_where_strips_only_once() {
        let node = WhereNode::new(vec![text("AND AND x")]);
        let (query, _) = node.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "WHERE AND x");
    }

    #[test]
    fn test_where_empty() {
        let node = WhereNode::new(vec![Arc::new(
            ConditionNode::new("false", vec![text("AND x = 1")]).unwrap(),
        )]);
        let (query, args) = node.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "");
        assert!(args.is_empty());
    }

    #[test]
    fn test_where_keeps_identifiers_starting_with_connective() {
        let node = WhereNode::new(vec![text("ORDER_ID = 1")]);
        let (query, _) = node.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "WHERE ORDER_ID = 1");
    }

    #[test]
    fn test_set_strips_trailing_comma() {
        let node = SetNode::new(vec![text("a = #{a},"), text("b = #{b}")]);
        let (query, args) = node.render(&QuestionMark, &params! { a: 1, b: 2 }).unwrap();
        assert_eq!(query, "SET a = ?, b = ?");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);

        let node = SetNode::new(vec![text("a = 1,"), text("b = 2,")]);
        let (query, _) = node.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "SET a = 1, b = 2");
    }

    #[test]
    fn test_trim_first_override_wins() {
        let node = TrimNode::new(vec![text("AND OR x")])
            .with_prefix("(")
            .with_suffix(")")
            .with_prefix_overrides(["and ", "AND OR "]);
        let (query, _) = node.render(&QuestionMark, &params! {}).unwrap();
        assert_eq!(query, "(OR x)");
    }

    #[test]
    fn test_apply_multibyte() {
        let node = TrimNode::new(Vec::new()).with_prefix_overrides(["é"]);
        assert_eq!(node.apply("ab"), "ab");
        assert_eq!(node.apply("éa"), "a");
    }
}
