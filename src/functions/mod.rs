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

//! Builtin functions
//!
//! - `len(v)` - byte length of a string, element count of a sequence or map
//! - `substr(s, start, end)` - byte range of a string
//! - `join(seq, sep)` - string forms of the elements joined by `sep`
//! - `contains(container, item)` - substring, element or key test
//! - `slice(v, start, end)` - sub-range of a string or sequence
//! - `nil` - the untyped nil

mod builtins;
pub mod registry;

pub use registry::{global_registry, BuiltinRegistry};

use crate::core::Value;

/// Look up a builtin by name
#[inline]
pub fn lookup(name: &str) -> Option<Value> {
    global_registry().get(name)
}
