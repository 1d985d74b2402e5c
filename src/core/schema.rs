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

//! Struct schemas - field and tag registration for struct-like host objects
//!
//! A [`StructSchema`] is built once per host type and shared by every value
//! of that type. Lookups follow the visibility rule for selectors: an
//! exported name (uppercase first character) matches a field name first and
//! a tag second; any other name matches tags only, so private fields are
//! reachable exclusively through their tag.

use std::fmt;

use rustc_hash::FxHashMap;

/// Returns true if the name is exported (starts with an uppercase character)
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// A single field of a struct schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field index (0-based, declaration order)
    pub id: usize,
    /// Field name as declared on the host type
    pub name: String,
    /// Optional tag annotation
    pub tag: Option<String>,
}

impl FieldDef {
    /// Returns true if the field itself is exported
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }
}

/// Field layout of a struct-like host type
#[derive(Debug, Clone)]
pub struct StructSchema {
    type_name: String,
    fields: Vec<FieldDef>,
    by_name: FxHashMap<String, usize>,
    by_tag: FxHashMap<String, usize>,
}

impl StructSchema {
    /// Type name of the host type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve a selector name to a field index
    pub fn lookup(&self, name: &str) -> Option<usize> {
        if is_exported(name) {
            if let Some(&id) = self.by_name.get(name) {
                return Some(id);
            }
        }
        self.by_tag.get(name).copied()
    }
}

impl fmt::Display for StructSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.type_name)?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {}", field.name)?;
            if let Some(tag) = &field.tag {
                write!(f, " `{}`", tag)?;
            }
        }
        write!(f, " }}")
    }
}

/// Builder for [`StructSchema`]
pub struct StructSchemaBuilder {
    type_name: String,
    fields: Vec<FieldDef>,
}

impl StructSchemaBuilder {
    /// Create a new schema builder
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add an untagged field
    pub fn add(self, name: impl Into<String>) -> Self {
        self.field(name, None)
    }

    /// Add a tagged field
    pub fn add_tagged(self, name: impl Into<String>, tag: impl Into<String>) -> Self {
        self.field(name, Some(tag.into()))
    }

    fn field(mut self, name: impl Into<String>, tag: Option<String>) -> Self {
        let id = self.fields.len();
        self.fields.push(FieldDef {
            id,
            name: name.into(),
            tag,
        });
        self
    }

    /// Build the schema and its lookup indexes
    pub fn build(self) -> StructSchema {
        let mut by_name = FxHashMap::default();
        let mut by_tag = FxHashMap::default();
        for field in &self.fields {
            by_name.entry(field.name.clone()).or_insert(field.id);
            if let Some(tag) = &field.tag {
                by_tag.entry(tag.clone()).or_insert(field.id);
            }
        }
        StructSchema {
            type_name: self.type_name,
            fields: self.fields,
            by_name,
            by_tag,
        }
    }
}
