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

//! Dotted-path walking over values

use super::Parameters;
use crate::core::Value;

/// Split `root.rest.of.path` into the root name and the remainder
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((root, rest)) => (root, Some(rest)),
        None => (path, None),
    }
}

/// Select one path segment from a value
///
/// Pointers are followed first. Struct-like values resolve the segment
/// through their schema (exported name, then tag), map-like values by key,
/// and sequence-like values by a numeric index. Returns None when the
/// segment does not exist.
pub fn select(value: &Value, segment: &str) -> Option<Value> {
    let object = value.as_object()?;
    if let Some(target) = object.pointee() {
        return select(&target, segment);
    }
    if let Some(s) = object.as_struct() {
        let index = s.schema().lookup(segment)?;
        return s.field(index);
    }
    if let Some(map) = object.as_map() {
        return map.get(segment);
    }
    if let Some(seq) = object.as_sequence() {
        let index: usize = segment.parse().ok()?;
        return seq.get(index);
    }
    None
}

/// Walk the remaining segments of a dotted path starting at `root`
pub fn walk(root: Value, rest: &str) -> Option<Value> {
    rest.split('.')
        .try_fold(root, |value, segment| select(&value, segment))
}

/// Resolve a name or dotted path against any parameter source
///
/// Sources that understand paths answer first. Otherwise the root name is
/// looked up on its own and the remaining segments are walked.
pub fn lookup_path(params: &dyn Parameters, name: &str) -> Option<Value> {
    if let Some(value) = params.get(name) {
        return Some(value);
    }
    match split_path(name) {
        (root, Some(rest)) => walk(params.get(root)?, rest),
        (_, None) => None,
    }
}
