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

//! Foreach node

use std::fmt;
use std::sync::Arc;

use super::group::NodeGroup;
use super::{Node, NodeRef, Rendered, Translator};
use crate::common::string_pool;
use crate::core::{Error, Result, Value};
use crate::eval::{global_cache, Expression};
use crate::params::{Parameters, ScopedParameters};

/// Renders its children once per element of a sequence or map
///
/// Each element is bound as `item` (and the position or key as `index`)
/// in a scratch layer above the outer parameters. Non-empty iteration
/// outputs are joined with `separator` and wrapped in `open`/`close`. An
/// empty collection renders nothing at all, not even `open`/`close`.
pub struct ForeachNode {
    collection: Arc<Expression>,
    item: String,
    index: Option<String>,
    open: String,
    close: String,
    separator: String,
    children: NodeGroup,
}

impl ForeachNode {
    pub fn new(collection: &str, item: impl Into<String>, children: Vec<NodeRef>) -> Result<Self> {
        let item = item.into();
        if item.is_empty() {
            return Err(Error::invalid_node("foreach", "missing item name"));
        }
        Ok(Self {
            collection: global_cache().get_or_compile(collection)?,
            item,
            index: None,
            open: String::new(),
            close: String::new(),
            separator: String::new(),
            children: NodeGroup::new(children),
        })
    }

    /// Bind the element position (sequences) or key (maps) under `name`
    pub fn with_index(mut self, name: impl Into<String>) -> Self {
        self.index = Some(name.into()).filter(|n| !n.is_empty());
        self
    }

    pub fn with_open(mut self, open: impl Into<String>) -> Self {
        self.open = open.into();
        self
    }

    pub fn with_close(mut self, close: impl Into<String>) -> Self {
        self.close = close.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// (index-or-key, element) pairs; maps iterate in key order
    fn entries(&self, params: &dyn Parameters) -> Result<Vec<(Value, Value)>> {
        let source = self.collection.source();
        let value = self
            .collection
            .evaluate(params)
            .map_err(|e| e.in_node(format!("foreach collection={:?}", source)))?;

        let mut target = value;
        while let Some(inner) = target.as_object().and_then(|o| o.pointee()) {
            target = inner;
        }

        let not_iterable = |v: &Value| Error::CollectionNotIterable {
            name: source.to_string(),
            kind: v.type_name(),
        };
        let object = target.as_object().ok_or_else(|| not_iterable(&target))?;
        if let Some(seq) = object.as_sequence() {
            return Ok((0..seq.len())
                .map(|i| (Value::Int(i as i64), seq.get(i).unwrap_or_default()))
                .collect());
        }
        if let Some(map) = object.as_map() {
            let mut entries = map.entries();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            return Ok(entries
                .into_iter()
                .map(|(k, v)| (Value::str(k), v))
                .collect());
        }
        Err(not_iterable(&target))
    }

    fn check_binding(&self, name: &str, params: &dyn Parameters) -> Result<()> {
        if params.get(name).is_some() {
            return Err(Error::ItemNameConflict(name.to_string()));
        }
        Ok(())
    }
}

impl Node for ForeachNode {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        self.check_binding(&self.item, params)?;
        if let Some(index) = &self.index {
            self.check_binding(index, params)?;
        }

        let entries = self.entries(params)?;
        if entries.is_empty() {
            return Ok((String::new(), Vec::new()));
        }

        let mut scope = ScopedParameters::new(params);
        let mut out = string_pool().get();
        let mut args = Vec::new();
        let mut first = true;
        for (key, item) in entries {
            scope.clear();
            scope.set(&self.item, item);
            if let Some(index) = &self.index {
                scope.set(index, key);
            }
            let (query, item_args) = match self.children.render(translator, &scope) {
                Ok(rendered) => rendered,
                Err(err) => {
                    string_pool().put(out);
                    return Err(err);
                }
            };
            if query.is_empty() {
                continue;
            }
            if !first {
                out.push_str(&self.separator);
            }
            first = false;
            out.push_str(&query);
            args.extend(item_args);
        }

        let mut query = String::with_capacity(self.open.len() + out.len() + self.close.len());
        query.push_str(&self.open);
        query.push_str(&out);
        query.push_str(&self.close);
        string_pool().put(out);
        Ok((query, args))
    }
}

impl fmt::Debug for ForeachNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeachNode")
            .field("collection", &self.collection.source())
            .field("item", &self.item)
            .field("index", &self.index)
            .field("open", &self.open)
            .field("close", &self.close)
            .field("separator", &self.separator)
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{DollarNumbered, QuestionMark, TextNode};
    use crate::params;

    fn text(s: &str) -> NodeRef {
        Arc::new(TextNode::new(s).unwrap())
    }

    fn in_list() -> ForeachNode {
        ForeachNode::new("ids", "v", vec![text("#{v}")])
            .unwrap()
            .with_open("(")
            .with_close(")")
            .with_separator(",")
    }

    #[test]
    fn test_sequence() {
        let (query, args) = in_list()
            .render(&QuestionMark, &params! { ids: vec![1, 2, 3] })
            .unwrap();
        assert_eq!(query, "(?,?,?)");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_empty_collection_renders_nothing() {
        let (query, args) = in_list()
            .render(&QuestionMark, &params! { ids: Vec::<i64>::new() })
            .unwrap();
        assert_eq!(query, "");
        assert!(args.is_empty());
    }

    #[test]
    fn test_map_with_key_index() {
        let node = ForeachNode::new("cols", "v", vec![text("${k} = #{v}")])
            .unwrap()
            .with_index("k")
            .with_separator(", ");
        let cols = Value::dict([("b", 2), ("a", 1)]);
        let (query, args) = node
            .render(&DollarNumbered::new(), &params! { cols: cols })
            .unwrap();
        assert_eq!(query, "a = $1, b = $2");
        assert_eq!(args, vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_item_name_conflict() {
        let err = in_list()
            .render(&QuestionMark, &params! { ids: vec![1], v: 0 })
            .unwrap_err();
        assert_eq!(err, Error::ItemNameConflict("v".into()));

        let node = in_list().with_index("i");
        let err = node
            .render(&QuestionMark, &params! { ids: vec![1], i: 0 })
            .unwrap_err();
        assert_eq!(err, Error::ItemNameConflict("i".into()));
    }

    #[test]
    fn test_not_iterable() {
        let err = in_list()
            .render(&QuestionMark, &params! { ids: 5 })
            .unwrap_err();
        assert_eq!(
            err,
            Error::CollectionNotIterable {
                name: "ids".into(),
                kind: "int".into()
            }
        );
    }

    #[test]
    fn test_item_does_not_leak_between_iterations() {
        let inner = ForeachNode::new("row.Tags", "t", vec![text("#{t}")])
            .unwrap()
            .with_separator("|");
        let node = ForeachNode::new("rows", "row", vec![Arc::new(inner)])
            .unwrap()
            .with_separator(";");
        let rows = Value::list([
            Value::dict([("Tags", Value::list(["a", "b"]))]),
            Value::dict([("Tags", Value::list(Vec::<String>::new()))]),
            Value::dict([("Tags", Value::list(["c"]))]),
        ]);
        let (query, args) = node.render(&QuestionMark, &params! { rows: rows }).unwrap();
        assert_eq!(query, "?|?;?");
        assert_eq!(args, vec![Value::str("a"), Value::str("b"), Value::str("c")]);
    }

    #[test]
    fn test_missing_item_name() {
        assert!(ForeachNode::new("ids", "", Vec::new()).is_err());
    }
}
