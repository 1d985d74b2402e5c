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

//! Stacked parameter resolver with path and field-index caches

use std::cell::RefCell;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::path::split_path;
use super::sources::{EmptyParameters, MapParameters, SequenceParameters, StructParameters};
use super::Parameters;
use crate::config::ResolverConfig;
use crate::core::{Object, StructSchema, Value};

type FieldIndexes = FxHashMap<String, Option<usize>>;

/// Resolves names and dotted paths against a stack of sources
///
/// The most recently pushed source is consulted first. Both caches live
/// as long as the resolver; call [`clear_cache`](Self::clear_cache) before
/// reusing it against changed sources. A resolver is not `Sync`: give each
/// concurrent render its own instance.
pub struct Resolver {
    config: ResolverConfig,
    sources: Vec<Box<dyn Parameters>>,
    /// Full dotted path -> resolved value
    paths: RefCell<FxHashMap<String, Value>>,
    /// Schema address -> segment -> field index; each entry holds the
    /// object so its schema cannot be freed and the address reused
    field_indexes: RefCell<FxHashMap<usize, (Arc<dyn Object>, FieldIndexes)>>,
}

impl Resolver {
    /// Create an empty resolver
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            paths: RefCell::new(FxHashMap::default()),
            field_indexes: RefCell::new(FxHashMap::default()),
        }
    }

    /// Build a resolver over a single root value, picking the source by
    /// capability
    ///
    /// Struct, map and sequence values expose their members directly.
    /// Pointers are followed first. Any other non-nil value is bound under
    /// the configured default parameter key.
    pub fn from_value(value: Value, config: ResolverConfig) -> Self {
        let mut root = value;
        while let Some(target) = root.as_object().and_then(|o| o.pointee()) {
            root = target;
        }

        let mut resolver = Self::new(config);
        let object = root.as_object().cloned();
        match object {
            Some(o) if o.as_struct().is_some() => {
                if let Ok(source) = StructParameters::new(root) {
                    resolver.push(source);
                }
            }
            Some(o) if o.as_map().is_some() => {
                if let Some(map) = o.as_map() {
                    resolver.push(MapParameters::from_map(map));
                }
            }
            Some(o) if o.as_sequence().is_some() => {
                if let Ok(source) = SequenceParameters::new(root) {
                    resolver.push(source);
                }
            }
            _ if root.is_nil() => resolver.push(EmptyParameters),
            _ => {
                let key = resolver.config.default_param_key.clone();
                resolver.push(MapParameters::new().with(key, root));
            }
        }
        resolver
    }

    /// Builder form of [`push`](Self::push)
    pub fn with_source(mut self, source: impl Parameters + 'static) -> Self {
        self.push(source);
        self
    }

    /// Stack a source above the existing ones
    pub fn push(&mut self, source: impl Parameters + 'static) {
        self.sources.push(Box::new(source));
        self.paths.get_mut().clear();
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Drop memoized paths and field indexes
    pub fn clear_cache(&self) {
        self.paths.borrow_mut().clear();
        self.field_indexes.borrow_mut().clear();
    }

    /// Number of memoized dotted paths
    pub fn cached_paths(&self) -> usize {
        self.paths.borrow().len()
    }

    fn lookup_root(&self, name: &str) -> Option<Value> {
        self.sources.iter().rev().find_map(|source| source.get(name))
    }

    /// Select one segment, caching struct field indexes per schema
    fn select(&self, value: &Value, segment: &str) -> Option<Value> {
        let object = value.as_object()?;
        if let Some(target) = object.pointee() {
            return self.select(&target, segment);
        }
        if let Some(s) = object.as_struct() {
            let schema = s.schema();
            let key = schema as *const StructSchema as usize;
            let cached = self
                .field_indexes
                .borrow()
                .get(&key)
                .and_then(|(_, fields)| fields.get(segment).copied());
            let index = match cached {
                Some(index) => index,
                None => {
                    let index = schema.lookup(segment);
                    self.field_indexes
                        .borrow_mut()
                        .entry(key)
                        .or_insert_with(|| (object.clone(), FxHashMap::default()))
                        .1
                        .insert(segment.to_string(), index);
                    index
                }
            };
            return s.field(index?);
        }
        super::path::select(value, segment)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl Parameters for Resolver {
    fn get(&self, name: &str) -> Option<Value> {
        if self.config.cache_paths {
            if let Some(value) = self.paths.borrow().get(name) {
                return Some(value.clone());
            }
        }

        let (root, rest) = split_path(name);
        let mut value = self.lookup_root(root)?;
        if let Some(rest) = rest {
            for segment in rest.split('.') {
                value = self.select(&value, segment)?;
            }
        }

        if self.config.cache_paths {
            self.paths
                .borrow_mut()
                .insert(name.to_string(), value.clone());
        }
        Some(value)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("sources", &self.sources.len())
            .field("cached_paths", &self.paths.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Record, Ref, StructSchemaBuilder};
    use crate::params;
    use std::sync::Arc;

    fn order() -> Value {
        let schema = Arc::new(
            StructSchemaBuilder::new("Order")
                .add("Id")
                .add_tagged("total", "amount")
                .build(),
        );
        Value::object(Record::new(schema, vec![Value::Int(9), Value::Float(3.5)]))
    }

    #[test]
    fn test_stacked_sources() {
        let resolver = Resolver::default()
            .with_source(params! { a: 1, b: 2 })
            .with_source(params! { b: 20 });
        assert_eq!(resolver.get("a"), Some(Value::Int(1)));
        assert_eq!(resolver.get("b"), Some(Value::Int(20)));
        assert_eq!(resolver.get("c"), None);
    }

    #[test]
    fn test_dotted_paths() {
        let resolver = Resolver::default().with_source(params! { order: order() });
        assert_eq!(resolver.get("order.Id"), Some(Value::Int(9)));
        assert_eq!(resolver.get("order.amount"), Some(Value::Float(3.5)));
        assert_eq!(resolver.get("order.total"), None);
        assert_eq!(resolver.get("order.Id.x"), None);
    }

    #[test]
    fn test_path_cache() {
        let resolver = Resolver::default().with_source(params! { order: order() });
        resolver.get("order.Id");
        resolver.get("order.Id");
        assert_eq!(resolver.cached_paths(), 1);
        resolver.clear_cache();
        assert_eq!(resolver.cached_paths(), 0);

        let uncached = Resolver::new(ResolverConfig::new().with_cache_paths(false))
            .with_source(params! { order: order() });
        uncached.get("order.Id");
        assert_eq!(uncached.cached_paths(), 0);
    }

    #[test]
    fn test_field_cache_distinguishes_same_named_schemas() {
        let ab = Arc::new(StructSchemaBuilder::new("Row").add("A").add("B").build());
        let ba = Arc::new(StructSchemaBuilder::new("Row").add("B").add("A").build());
        let x = Value::object(Record::new(ab, vec![Value::Int(1), Value::Int(2)]));
        let y = Value::object(Record::new(ba, vec![Value::Int(3), Value::Int(4)]));
        let resolver = Resolver::default().with_source(params! { x: x, y: y });
        assert_eq!(resolver.get("x.A"), Some(Value::Int(1)));
        assert_eq!(resolver.get("y.A"), Some(Value::Int(4)));
        assert_eq!(resolver.get("y.B"), Some(Value::Int(3)));
        assert_eq!(resolver.get("x.B"), Some(Value::Int(2)));
    }

    #[test]
    fn test_from_value_struct() {
        let resolver = Resolver::from_value(order(), ResolverConfig::default());
        assert_eq!(resolver.get("Id"), Some(Value::Int(9)));
    }

    #[test]
    fn test_from_value_follows_pointers() {
        let resolver = Resolver::from_value(Value::object(Ref::new(order())), Default::default());
        assert_eq!(resolver.get("amount"), Some(Value::Float(3.5)));
    }

    #[test]
    fn test_from_value_scalar_uses_default_key() {
        let resolver = Resolver::from_value(Value::Int(5), ResolverConfig::default());
        assert_eq!(resolver.get("param"), Some(Value::Int(5)));

        let config = ResolverConfig::new().with_default_param_key("id");
        let resolver = Resolver::from_value(Value::Int(5), config);
        assert_eq!(resolver.get("id"), Some(Value::Int(5)));
        assert_eq!(resolver.get("param"), None);
    }

    #[test]
    fn test_from_value_map_and_sequence() {
        let resolver = Resolver::from_value(Value::dict([("k", "v")]), Default::default());
        assert_eq!(resolver.get("k"), Some(Value::str("v")));

        let resolver = Resolver::from_value(Value::list([3, 4]), Default::default());
        assert_eq!(resolver.get("0"), Some(Value::Int(3)));
    }

    #[test]
    fn test_from_value_nil() {
        let resolver = Resolver::from_value(Value::Nil, Default::default());
        assert_eq!(resolver.get("param"), None);
    }
}
