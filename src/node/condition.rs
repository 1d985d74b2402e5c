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

//! Conditional nodes: `if`, `choose`/`when`/`otherwise`

use std::fmt;
use std::sync::Arc;

use super::group::NodeGroup;
use super::{Node, NodeRef, Rendered, Translator};
use crate::core::{Error, Result};
use crate::eval::{global_cache, Expression};
use crate::params::Parameters;

/// Renders its children when the test is not a zero value
///
/// false, 0, 0.0, "", nil and empty containers are zero. A node built
/// without a test expression fails to render rather than counting as false.
pub struct ConditionNode {
    test: Option<Arc<Expression>>,
    children: NodeGroup,
}

impl ConditionNode {
    pub fn new(test: &str, children: Vec<NodeRef>) -> Result<Self> {
        Ok(Self::with_expression(
            Some(global_cache().get_or_compile(test)?),
            children,
        ))
    }

    /// Build from an already compiled test, or none at all
    pub fn with_expression(test: Option<Arc<Expression>>, children: Vec<NodeRef>) -> Self {
        Self {
            test,
            children: NodeGroup::new(children),
        }
    }

    pub fn test(&self) -> Option<&Expression> {
        self.test.as_deref()
    }

    /// Evaluate the test; Ok(true) means the children should render
    pub fn matches(&self, params: &dyn Parameters) -> Result<bool> {
        let test = self
            .test
            .as_ref()
            .ok_or_else(|| Error::invalid_node("if", "missing test expression"))?;
        let value = test
            .evaluate(params)
            .map_err(|e| e.in_node(format!("if test={:?}", test.source())))?;
        Ok(!value.is_zero())
    }
}

impl Node for ConditionNode {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        if !self.matches(params)? {
            return Ok((String::new(), Vec::new()));
        }
        self.children.render(translator, params)
    }
}

impl fmt::Debug for ConditionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionNode")
            .field("test", &self.test.as_ref().map(|t| t.source()))
            .field("children", &self.children)
            .finish()
    }
}

/// First `when` that renders non-empty output wins; otherwise the default
#[derive(Debug)]
pub struct ChooseNode {
    whens: Vec<ConditionNode>,
    otherwise: Option<NodeGroup>,
}

impl ChooseNode {
    pub fn new(whens: Vec<ConditionNode>, otherwise: Option<Vec<NodeRef>>) -> Self {
        Self {
            whens,
            otherwise: otherwise.map(NodeGroup::new),
        }
    }
}

impl Node for ChooseNode {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        for when in &self.whens {
            let (query, args) = when.render(translator, params)?;
            if !query.is_empty() {
                return Ok((query, args));
            }
        }
        match &self.otherwise {
            Some(otherwise) => otherwise.render(translator, params),
            None => Ok((String::new(), Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::node::{QuestionMark, TextNode};
    use crate::params;

    fn text(s: &str) -> NodeRef {
        Arc::new(TextNode::new(s).unwrap())
    }

    fn render(node: &dyn Node, params: &dyn Parameters) -> Result<String> {
        node.render(&QuestionMark, params).map(|(q, _)| q)
    }

    #[test]
    fn test_condition_zero_values() {
        let node = ConditionNode::new("flag", vec![text("yes")]).unwrap();
        for (value, expected) in [
            (Value::Bool(true), "yes"),
            (Value::Bool(false), ""),
            (Value::Int(0), ""),
            (Value::Int(2), "yes"),
            (Value::Float(0.0), ""),
            (Value::str(""), ""),
            (Value::str("x"), "yes"),
            (Value::Nil, ""),
            (Value::list(Vec::<i64>::new()), ""),
            (Value::list([1]), "yes"),
        ] {
            let params = params! { flag: value.clone() };
            assert_eq!(render(&node, &params).unwrap(), expected, "{:?}", value);
        }
    }

    #[test]
    fn test_condition_errors() {
        let node = ConditionNode::new("missing > 1", vec![text("x")]).unwrap();
        let err = render(&node, &params! {}).unwrap_err();
        assert!(matches!(err, Error::Render { .. }));
        assert_eq!(err.root_cause(), &Error::UndefinedIdentifier("missing".into()));

        let node = ConditionNode::with_expression(None, vec![text("x")]);
        assert!(matches!(
            render(&node, &params! {}),
            Err(Error::InvalidNode { node: "if", .. })
        ));
    }

    #[test]
    fn test_choose_first_match_wins() {
        let node = ChooseNode::new(
            vec![
                ConditionNode::new("kind == 1", vec![text("one")]).unwrap(),
                ConditionNode::new("kind > 0", vec![text("positive")]).unwrap(),
            ],
            Some(vec![text("other")]),
        );
        assert_eq!(render(&node, &params! { kind: 1 }).unwrap(), "one");
        assert_eq!(render(&node, &params! { kind: 5 }).unwrap(), "positive");
        assert_eq!(render(&node, &params! { kind: -1 }).unwrap(), "other");
    }

    #[test]
    fn test_choose_skips_matching_but_empty_when() {
        let node = ChooseNode::new(
            vec![
                ConditionNode::new("true", vec![text("  ")]).unwrap(),
                ConditionNode::new("true", vec![text("second")]).unwrap(),
            ],
            None,
        );
        assert_eq!(render(&node, &params! {}).unwrap(), "second");
    }

    #[test]
    fn test_choose_without_default() {
        let node = ChooseNode::new(
            vec![ConditionNode::new("false", vec![text("x")]).unwrap()],
            None,
        );
        assert_eq!(render(&node, &params! {}).unwrap(), "");
    }
}
