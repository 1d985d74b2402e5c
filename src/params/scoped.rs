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

//! Loop-local parameter layer

use rustc_hash::FxHashMap;

use super::path::{lookup_path, split_path, walk};
use super::Parameters;
use crate::core::Value;

/// Scratch bindings stacked above an outer parameter source
///
/// Names bound here shadow the outer source, including as the root of a
/// dotted path (`item.Name`). The layer is owned by a single render call
/// and must be cleared between loop iterations.
pub struct ScopedParameters<'a> {
    outer: &'a dyn Parameters,
    scratch: FxHashMap<String, Value>,
}

impl<'a> ScopedParameters<'a> {
    pub fn new(outer: &'a dyn Parameters) -> Self {
        Self {
            outer,
            scratch: FxHashMap::default(),
        }
    }

    /// Bind a scratch name
    pub fn set(&mut self, name: &str, value: Value) {
        match self.scratch.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.scratch.insert(name.to_string(), value);
            }
        }
    }

    /// Drop every scratch binding
    pub fn clear(&mut self) {
        self.scratch.clear();
    }

    pub fn outer(&self) -> &'a dyn Parameters {
        self.outer
    }
}

impl Parameters for ScopedParameters<'_> {
    fn get(&self, name: &str) -> Option<Value> {
        let (root, rest) = split_path(name);
        match self.scratch.get(root) {
            Some(value) => match rest {
                Some(rest) => walk(value.clone(), rest),
                None => Some(value.clone()),
            },
            None => lookup_path(self.outer, name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn test_scratch_shadows_outer() {
        let outer = params! { a: 1, b: 2 };
        let mut scope = ScopedParameters::new(&outer);
        scope.set("a", Value::Int(10));
        assert_eq!(scope.get("a"), Some(Value::Int(10)));
        assert_eq!(scope.get("b"), Some(Value::Int(2)));
    }

    #[test]
    fn test_clear_removes_bindings() {
        let outer = params! {};
        let mut scope = ScopedParameters::new(&outer);
        scope.set("item", Value::Int(1));
        scope.clear();
        assert_eq!(scope.get("item"), None);
    }

    #[test]
    fn test_scratch_root_of_path() {
        let outer = params! { item: 0 };
        let mut scope = ScopedParameters::new(&outer);
        scope.set("item", Value::dict([("Name", "x")]));
        assert_eq!(scope.get("item.Name"), Some(Value::str("x")));
        assert_eq!(scope.get("item.Other"), None);
    }

    #[test]
    fn test_outer_path_through_flat_source() {
        let outer = params! { cfg: Value::dict([("k", 2)]) };
        let mut scope = ScopedParameters::new(&outer);
        scope.set("item", Value::Int(1));
        assert_eq!(scope.get("cfg.k"), Some(Value::Int(2)));
    }
}
