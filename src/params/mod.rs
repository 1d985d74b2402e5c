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

//! Parameter resolution
//!
//! A [`Parameters`] source maps a name to a [`Value`]. Sources compose:
//! a [`Resolver`] stacks several of them and walks dotted paths such as
//! `user.Address.City`, while [`ScopedParameters`] layers loop-local
//! bindings above an outer source.
//!
//! # Examples
//!
//! ```
//! use sqlweave::params;
//! use sqlweave::params::Parameters;
//! use sqlweave::Value;
//!
//! let params = params! { id: 7, name: "Alice" };
//! assert_eq!(params.get("id"), Some(Value::Int(7)));
//! ```

mod path;
mod resolver;
mod scoped;
mod sources;

pub use path::{lookup_path, select, split_path, walk};
pub use resolver::Resolver;
pub use scoped::ScopedParameters;
pub use sources::{EmptyParameters, MapParameters, SequenceParameters, StructParameters};

use crate::core::Value;

/// A source of named values
pub trait Parameters {
    /// Look up a name, returning None when it is not bound
    fn get(&self, name: &str) -> Option<Value>;
}

impl<P: Parameters + ?Sized> Parameters for &P {
    fn get(&self, name: &str) -> Option<Value> {
        (**self).get(name)
    }
}

impl<P: Parameters + ?Sized> Parameters for Box<P> {
    fn get(&self, name: &str) -> Option<Value> {
        (**self).get(name)
    }
}

/// Build a [`MapParameters`] from `name: value` pairs
///
/// # Examples
///
/// ```
/// use sqlweave::params;
/// use sqlweave::params::Parameters;
///
/// let params = params! { ids: vec![1, 2, 3], active: true };
/// assert!(params.get("ids").is_some());
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::params::MapParameters::new()
    };
    ($($name:ident : $value:expr),+ $(,)?) => {
        {
            let mut params = $crate::params::MapParameters::new();
            $(
                params.insert(stringify!($name), $value);
            )+
            params
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_macro() {
        let params = params! { id: 1, name: "Alice", score: 2.5 };
        assert_eq!(params.get("id"), Some(Value::Int(1)));
        assert_eq!(params.get("name"), Some(Value::str("Alice")));
        assert_eq!(params.get("score"), Some(Value::Float(2.5)));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_empty_macro() {
        let params = params! {};
        assert!(params.is_empty());
    }

    #[test]
    fn test_reference_forwarding() {
        let params = params! { a: 1 };
        let boxed: Box<dyn Parameters> = Box::new(params);
        let by_ref: &dyn Parameters = &boxed;
        assert_eq!(by_ref.get("a"), Some(Value::Int(1)));
    }
}
