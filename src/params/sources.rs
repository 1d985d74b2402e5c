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

//! Stock parameter sources

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::Parameters;
use crate::core::{Error, MapLike, Object, Result, Value};

// ============================================================================
// MapParameters
// ============================================================================

/// Named values held in a hash map
#[derive(Debug, Clone, Default)]
pub struct MapParameters {
    values: FxHashMap<String, Value>,
}

impl MapParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the entries of a map-like object
    pub fn from_map(map: &dyn MapLike) -> Self {
        map.entries().into_iter().collect()
    }

    /// Bind a name, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Parameters for MapParameters {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }
}

// ============================================================================
// StructParameters
// ============================================================================

/// Fields of a struct-like object
///
/// Exported names resolve by field name, then tag; unexported names only
/// by tag.
#[derive(Debug, Clone)]
pub struct StructParameters {
    object: Arc<dyn Object>,
}

impl StructParameters {
    pub fn new(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) if object.as_struct().is_some() => Ok(Self { object }),
            other => Err(Error::type_mismatch(format!(
                "expected struct parameters, got {}",
                other.type_name()
            ))),
        }
    }
}

impl Parameters for StructParameters {
    fn get(&self, name: &str) -> Option<Value> {
        let s = self.object.as_struct()?;
        s.field(s.schema().lookup(name)?)
    }
}

// ============================================================================
// SequenceParameters
// ============================================================================

/// Elements of a sequence-like object, addressed by numeric-string index
#[derive(Debug, Clone)]
pub struct SequenceParameters {
    object: Arc<dyn Object>,
}

impl SequenceParameters {
    pub fn new(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) if object.as_sequence().is_some() => Ok(Self { object }),
            other => Err(Error::type_mismatch(format!(
                "expected sequence parameters, got {}",
                other.type_name()
            ))),
        }
    }
}

impl Parameters for SequenceParameters {
    fn get(&self, name: &str) -> Option<Value> {
        let index: usize = name.parse().ok()?;
        self.object.as_sequence()?.get(index)
    }
}

// ============================================================================
// EmptyParameters
// ============================================================================

/// A source with no bindings
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyParameters;

impl Parameters for EmptyParameters {
    fn get(&self, _name: &str) -> Option<Value> {
        None
    }
}
