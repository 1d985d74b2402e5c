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

//! Host object capabilities and the stock object types
//!
//! The evaluator never inspects host types directly. A host value is an
//! [`Object`] and tells the engine what it can do through the capability
//! accessors: struct-field access, string-keyed map access, indexed
//! sequence access, or invocation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::error::Result;
use super::schema::{is_exported, StructSchema};
use super::value::{Kind, Value};

/// A host object reachable from expressions
pub trait Object: fmt::Debug + Send + Sync {
    /// Type name used in error messages and field-index cache keys
    fn type_name(&self) -> &str;

    /// Normalized kind, derived from the capabilities by default
    fn kind(&self) -> Kind {
        if self.as_callable().is_some() {
            Kind::Function
        } else if self.as_sequence().is_some() {
            Kind::Sequence
        } else if self.as_map().is_some() {
            Kind::Map
        } else if self.as_struct().is_some() {
            Kind::Struct
        } else if self.pointee().is_some() {
            Kind::Pointer
        } else {
            Kind::Opaque
        }
    }

    fn as_struct(&self) -> Option<&dyn StructLike> {
        None
    }

    fn as_map(&self) -> Option<&dyn MapLike> {
        None
    }

    fn as_sequence(&self) -> Option<&dyn SequenceLike> {
        None
    }

    fn as_callable(&self) -> Option<&dyn Callable> {
        None
    }

    /// Invoke a zero-argument method by name
    ///
    /// Selectors consult this before struct fields, so a method shadows a
    /// field of the same name.
    fn method(&self, _name: &str) -> Option<Result<Value>> {
        None
    }

    /// Target of a pointer-like object
    fn pointee(&self) -> Option<Value> {
        None
    }
}

/// Struct-like objects: fields described by a shared schema
pub trait StructLike {
    fn schema(&self) -> &StructSchema;

    /// Field value by schema index
    fn field(&self, index: usize) -> Option<Value>;
}

/// String-keyed map objects
pub trait MapLike {
    /// Declared kind of the map's values, used for missing-key zero values
    fn value_kind(&self) -> Kind;

    fn get(&self, key: &str) -> Option<Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries, ordered by key
    fn entries(&self) -> Vec<(String, Value)>;
}

/// Indexable sequence objects
pub trait SequenceLike {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<Value>;

    /// Declared element kind
    fn elem_kind(&self) -> Kind {
        Kind::Any
    }
}

/// Parameter kinds of a callable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Fixed parameters
    pub params: Vec<Kind>,
    /// Element kind of the trailing variadic parameter, if any
    pub variadic: Option<Kind>,
}

impl Signature {
    /// Signature with a fixed number of parameters
    pub fn fixed(params: impl Into<Vec<Kind>>) -> Self {
        Self {
            params: params.into(),
            variadic: None,
        }
    }

    /// Signature with fixed parameters followed by a variadic tail
    pub fn variadic(params: impl Into<Vec<Kind>>, elem: Kind) -> Self {
        Self {
            params: params.into(),
            variadic: Some(elem),
        }
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic.is_some()
    }

    /// Human readable expected argument count
    pub fn arity(&self) -> String {
        if self.is_variadic() {
            format!("at least {}", self.params.len())
        } else {
            self.params.len().to_string()
        }
    }
}

/// Callable objects
///
/// Calls follow the value-or-error convention: a failed call returns the
/// error, which becomes the error of the call expression.
pub trait Callable {
    fn name(&self) -> &str;

    fn signature(&self) -> &Signature;

    /// Invoke with arguments already converted to the signature kinds
    fn call(&self, args: &[Value]) -> Result<Value>;
}

// ============================================================================
// List
// ============================================================================

/// Sequence of values
#[derive(Clone)]
pub struct List {
    elem_kind: Kind,
    items: Vec<Value>,
}

impl List {
    /// Create a list that accepts any element kind
    pub fn new(items: Vec<Value>) -> Self {
        Self::typed(Kind::Any, items)
    }

    /// Create a list with a declared element kind
    pub fn typed(elem_kind: Kind, items: Vec<Value>) -> Self {
        Self { elem_kind, items }
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl Object for List {
    fn type_name(&self) -> &str {
        "list"
    }

    fn as_sequence(&self) -> Option<&dyn SequenceLike> {
        Some(self)
    }
}

impl SequenceLike for List {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<Value> {
        self.items.get(index).cloned()
    }

    fn elem_kind(&self) -> Kind {
        self.elem_kind
    }
}

// ============================================================================
// Dict
// ============================================================================

/// String-keyed map with a declared value kind
#[derive(Clone)]
pub struct Dict {
    value_kind: Kind,
    entries: BTreeMap<String, Value>,
}

impl Dict {
    /// Create a map whose missing keys read as nil
    pub fn new(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self::typed(Kind::Any, entries)
    }

    /// Create a map with a declared value kind
    pub fn typed(value_kind: Kind, entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            value_kind,
            entries: entries.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl Object for Dict {
    fn type_name(&self) -> &str {
        "map"
    }

    fn as_map(&self) -> Option<&dyn MapLike> {
        Some(self)
    }
}

impl MapLike for Dict {
    fn value_kind(&self) -> Kind {
        self.value_kind
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entries(&self) -> Vec<(String, Value)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

// ============================================================================
// Record
// ============================================================================

type MethodFn = Arc<dyn Fn(&Record) -> Result<Value> + Send + Sync>;

/// Struct value laid out by a shared [`StructSchema`]
#[derive(Clone)]
pub struct Record {
    schema: Arc<StructSchema>,
    values: Vec<Value>,
    methods: FxHashMap<String, MethodFn>,
}

impl Record {
    /// Create a record; missing trailing fields are nil
    pub fn new(schema: Arc<StructSchema>, mut values: Vec<Value>) -> Self {
        values.resize(schema.len(), Value::Nil);
        Self {
            schema,
            values,
            methods: FxHashMap::default(),
        }
    }

    /// Attach a zero-argument method
    pub fn with_method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    /// Field value by declared field name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema
            .fields()
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| self.values.get(f.id))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.type_name());
        for field in self.schema.fields() {
            s.field(&field.name, &self.values[field.id]);
        }
        s.finish()
    }
}

impl Object for Record {
    fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    fn as_struct(&self) -> Option<&dyn StructLike> {
        Some(self)
    }

    fn method(&self, name: &str) -> Option<Result<Value>> {
        if !is_exported(name) {
            return None;
        }
        self.methods.get(name).map(|m| m(self))
    }
}

impl StructLike for Record {
    fn schema(&self) -> &StructSchema {
        &self.schema
    }

    fn field(&self, index: usize) -> Option<Value> {
        self.values.get(index).cloned()
    }
}

// ============================================================================
// Function
// ============================================================================

type NativeFn = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// Host function value
#[derive(Clone)]
pub struct Function {
    name: String,
    signature: Signature,
    func: NativeFn,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, signature: Signature, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            func: Arc::new(f),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "func {}", self.name)
    }
}

impl Object for Function {
    fn type_name(&self) -> &str {
        "function"
    }

    fn as_callable(&self) -> Option<&dyn Callable> {
        Some(self)
    }
}

impl Callable for Function {
    fn name(&self) -> &str {
        &self.name
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

// ============================================================================
// Ref
// ============================================================================

/// One level of indirection to another value
#[derive(Debug, Clone)]
pub struct Ref {
    target: Value,
}

impl Ref {
    pub fn new(target: impl Into<Value>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Object for Ref {
    fn type_name(&self) -> &str {
        "ref"
    }

    fn pointee(&self) -> Option<Value> {
        Some(self.target.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::StructSchemaBuilder;

    #[test]
    fn test_capability_kinds() {
        assert_eq!(List::new(vec![]).kind(), Kind::Sequence);
        assert_eq!(Dict::new(vec![]).kind(), Kind::Map);
        assert_eq!(Ref::new(1).kind(), Kind::Pointer);
        let f = Function::new("f", Signature::fixed(Vec::new()), |_| Ok(Value::Nil));
        assert_eq!(f.kind(), Kind::Function);
    }

    #[test]
    fn test_record_methods_need_exported_names() {
        let schema = Arc::new(StructSchemaBuilder::new("User").add("Name").build());
        let rec = Record::new(schema, vec![Value::str("ann")])
            .with_method("Upper", |r| {
                Ok(Value::str(r.get("Name").map(|v| v.to_string()).unwrap_or_default().to_uppercase()))
            })
            .with_method("hidden", |_| Ok(Value::Int(1)));
        assert_eq!(rec.method("Upper").unwrap().unwrap(), Value::str("ANN"));
        assert!(rec.method("hidden").is_none());
    }

    #[test]
    fn test_record_pads_missing_fields() {
        let schema = Arc::new(StructSchemaBuilder::new("P").add("A").add("B").build());
        let rec = Record::new(schema, vec![Value::Int(1)]);
        assert_eq!(rec.field(1), Some(Value::Nil));
    }

    #[test]
    fn test_signature_arity() {
        assert_eq!(Signature::fixed([Kind::Int, Kind::Int]).arity(), "2");
        assert_eq!(Signature::variadic([Kind::String], Kind::Any).arity(), "at least 1");
    }
}
