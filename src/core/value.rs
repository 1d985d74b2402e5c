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

//! Value type for sqlweave - dynamic runtime values with kind information
//!
//! A [`Value`] wraps exactly one scalar (bool, signed/unsigned integer,
//! float, string, complex), the untyped nil, or a shared handle to a host
//! object. Host objects expose what they can do through the capability
//! accessors on [`Object`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::error::{Error, Result};
use super::object::{Dict, Function, List, Object, Signature};

/// Normalized kind of a value
///
/// Operator dispatch and argument conversion work on kinds, never on the
/// concrete host type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The untyped nil
    Invalid,
    Bool,
    /// Signed integer family
    Int,
    /// Unsigned integer family
    Uint,
    /// Floating point family
    Float,
    String,
    Complex,
    Struct,
    Map,
    Sequence,
    Function,
    Pointer,
    /// Host object with no capabilities
    Opaque,
    /// Accepts any kind; only meaningful in function signatures
    Any,
}

impl Kind {
    /// Zero value of this kind (nil for kinds without a scalar zero)
    pub fn zero_value(self) -> Value {
        match self {
            Kind::Bool => Value::Bool(false),
            Kind::Int => Value::Int(0),
            Kind::Uint => Value::Uint(0),
            Kind::Float => Value::Float(0.0),
            Kind::String => Value::Str(Arc::from("")),
            Kind::Complex => Value::Complex(Complex::default()),
            _ => Value::Nil,
        }
    }

    /// Returns true for the integer, float and complex families
    pub fn is_numeric(self) -> bool {
        matches!(self, Kind::Int | Kind::Uint | Kind::Float | Kind::Complex)
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Kind::Int | Kind::Uint)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Invalid => "nil",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Complex => "complex",
            Kind::Struct => "struct",
            Kind::Map => "map",
            Kind::Sequence => "sequence",
            Kind::Function => "function",
            Kind::Pointer => "pointer",
            Kind::Opaque => "opaque",
            Kind::Any => "any",
        };
        f.write_str(name)
    }
}

/// Complex number with 64-bit float parts
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn add(self, other: Complex) -> Complex {
        Complex::new(self.re + other.re, self.im + other.im)
    }

    pub fn sub(self, other: Complex) -> Complex {
        Complex::new(self.re - other.re, self.im - other.im)
    }

    pub fn mul(self, other: Complex) -> Complex {
        Complex::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    pub fn div(self, other: Complex) -> Complex {
        let denom = other.re * other.re + other.im * other.im;
        Complex::new(
            (self.re * other.re + self.im * other.im) / denom,
            (self.im * other.re - self.re * other.im) / denom,
        )
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "({}{}i)", self.re, self.im)
        } else {
            write!(f, "({}+{}i)", self.re, self.im)
        }
    }
}

/// A dynamic runtime value
///
/// Strings use `Arc<str>` and objects `Arc<dyn Object>` so values clone
/// cheaply while being threaded through evaluation and argument lists.
#[derive(Clone, Default)]
pub enum Value {
    /// The untyped nil
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(Arc<str>),
    Complex(Complex),
    /// Shared handle to a host object
    Object(Arc<dyn Object>),
}

impl Value {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a string value
    pub fn str(value: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(value.as_ref()))
    }

    /// Wrap a host object
    pub fn object(object: impl Object + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Create an untyped sequence
    pub fn list(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::object(List::new(items.into_iter().map(Into::into).collect()))
    }

    /// Create a string-keyed map whose missing keys read as nil
    pub fn dict<K: Into<String>, V: Into<Value>>(entries: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::object(Dict::new(
            entries.into_iter().map(|(k, v)| (k.into(), v.into())),
        ))
    }

    /// Create a host function
    pub fn function<F>(name: impl Into<String>, signature: Signature, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Value::object(Function::new(name, signature, f))
    }

    // =========================================================================
    // Kind queries
    // =========================================================================

    /// Normalized kind of this value
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Invalid,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::String,
            Value::Complex(_) => Kind::Complex,
            Value::Object(o) => o.kind(),
        }
    }

    /// Type name used in error messages
    pub fn type_name(&self) -> String {
        match self {
            Value::Object(o) => o.type_name().to_string(),
            other => other.kind().to_string(),
        }
    }

    /// Returns true if this is the untyped nil
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Zero test used by conditional nodes
    ///
    /// false, 0, 0.0, "", nil and empty sequences/maps are zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(b) => !*b,
            Value::Int(v) => *v == 0,
            Value::Uint(v) => *v == 0,
            Value::Float(v) => *v == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Complex(c) => c.re == 0.0 && c.im == 0.0,
            Value::Object(o) => {
                if let Some(seq) = o.as_sequence() {
                    seq.len() == 0
                } else if let Some(map) = o.as_map() {
                    map.len() == 0
                } else {
                    false
                }
            }
        }
    }

    /// Returns true if the value can be invoked as a function
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Object(o) if o.as_callable().is_some())
    }

    // =========================================================================
    // Value extractors
    // =========================================================================

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract an integer of either integer family
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Uint(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<dyn Object>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Convert to the given kind for use as a call argument
    ///
    /// Values already of the target kind pass through; numeric kinds convert
    /// between each other; everything else is a type mismatch.
    pub fn convert(self, kind: Kind) -> Result<Value> {
        if kind == Kind::Any || self.kind() == kind {
            return Ok(self);
        }
        let converted = match (&self, kind) {
            (Value::Int(v), Kind::Uint) => Some(Value::Uint(*v as u64)),
            (Value::Int(v), Kind::Float) => Some(Value::Float(*v as f64)),
            (Value::Uint(v), Kind::Int) => Some(Value::Int(*v as i64)),
            (Value::Uint(v), Kind::Float) => Some(Value::Float(*v as f64)),
            (Value::Float(v), Kind::Int) => Some(Value::Int(*v as i64)),
            (Value::Float(v), Kind::Uint) => Some(Value::Uint(*v as u64)),
            (Value::Int(v), Kind::Complex) => Some(Value::Complex(Complex::new(*v as f64, 0.0))),
            (Value::Float(v), Kind::Complex) => Some(Value::Complex(Complex::new(*v, 0.0))),
            (Value::Nil, Kind::Sequence | Kind::Map | Kind::Pointer | Kind::Function) => {
                Some(Value::Nil)
            }
            _ => None,
        };
        converted.ok_or_else(|| {
            Error::type_mismatch(format!(
                "cannot use {} (type {}) as type {}",
                self,
                self.type_name(),
                kind
            ))
        })
    }

    /// Equality across kinds, used by the generic operator family
    ///
    /// Numeric kinds compare by value; other mixed kinds are unequal.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Uint(b)) | (Value::Uint(b), Value::Int(a)) => {
                *a >= 0 && *a as u64 == *b
            }
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Uint(a), Value::Float(b)) | (Value::Float(b), Value::Uint(a)) => {
                *a as f64 == *b
            }
            _ => self == other,
        }
    }
}

// =========================================================================
// Trait implementations
// =========================================================================

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Uint(v) => write!(f, "Uint({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Complex(c) => write!(f, "Complex{}", c),
            Value::Object(o) => write!(f, "Object({:?})", o),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
            Value::Complex(c) => write!(f, "{}", c),
            Value::Object(o) => {
                if let Some(seq) = o.as_sequence() {
                    f.write_str("[")?;
                    for i in 0..seq.len() {
                        if i > 0 {
                            f.write_str(" ")?;
                        }
                        write!(f, "{}", seq.get(i).unwrap_or_default())?;
                    }
                    f.write_str("]")
                } else {
                    write!(f, "{:?}", o)
                }
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                if Arc::ptr_eq(a, b) {
                    return true;
                }
                match (a.as_sequence(), b.as_sequence()) {
                    (Some(x), Some(y)) => {
                        x.len() == y.len() && (0..x.len()).all(|i| x.get(i) == y.get(i))
                    }
                    _ => match (a.as_map(), b.as_map()) {
                        (Some(x), Some(y)) => x.entries() == y.entries(),
                        _ => false,
                    },
                }
            }
            _ => false,
        }
    }
}

// =========================================================================
// Conversions from host types
// =========================================================================

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Arc::from(v.as_str()))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self {
        Value::Str(v)
    }
}

impl From<Complex> for Value {
    fn from(v: Complex) -> Self {
        Value::Complex(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Nil,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::list(v)
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(v: HashMap<String, T>) -> Self {
        Value::dict(v)
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Value::dict(v)
    }
}
