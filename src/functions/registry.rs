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

//! Builtin function registry
//!
//! Builtins shadow parameters of the same name: identifier lookup consults
//! this table before the parameter resolver.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use super::builtins;
use crate::core::Value;

/// Global builtin registry instance
static GLOBAL_REGISTRY: OnceLock<BuiltinRegistry> = OnceLock::new();

/// Get the global builtin registry
#[inline]
pub fn global_registry() -> &'static BuiltinRegistry {
    GLOBAL_REGISTRY.get_or_init(BuiltinRegistry::new)
}

/// Fixed table of builtin names
pub struct BuiltinRegistry {
    entries: FxHashMap<&'static str, Value>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinRegistry {
    /// Create a registry holding every builtin function and `nil`
    pub fn new() -> Self {
        let mut entries = FxHashMap::default();
        for (name, signature, func) in builtins::all() {
            entries.insert(name, Value::function(name, signature, func));
        }
        entries.insert("nil", Value::Nil);
        Self { entries }
    }

    /// Look up a builtin by name
    #[inline]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
