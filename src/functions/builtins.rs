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

//! Builtin functions available to every expression
//!
//! Arguments arrive already converted to the kinds in each signature.

use crate::core::{Error, Kind, List, Result, Signature, Value};

/// Name, signature and body of every builtin
pub(crate) fn all() -> Vec<(&'static str, Signature, fn(&[Value]) -> Result<Value>)> {
    vec![
        ("len", Signature::fixed([Kind::Any]), len),
        (
            "substr",
            Signature::fixed([Kind::String, Kind::Int, Kind::Int]),
            substr,
        ),
        ("join", Signature::fixed([Kind::Sequence, Kind::String]), join),
        ("contains", Signature::fixed([Kind::Any, Kind::Any]), contains),
        ("slice", Signature::fixed([Kind::Any, Kind::Int, Kind::Int]), slice),
    ]
}

/// Check `0 <= start <= end <= len`, reporting the first offending bound
fn bounds(start: &Value, end: &Value, len: usize) -> Result<(usize, usize)> {
    let start = start.as_i64().unwrap_or(-1);
    let end = end.as_i64().unwrap_or(-1);
    if start < 0 || start as usize > len {
        return Err(Error::IndexOutOfRange { index: start, len });
    }
    if end < start || end as usize > len {
        return Err(Error::IndexOutOfRange { index: end, len });
    }
    Ok((start as usize, end as usize))
}

// ============================================================================
// len
// ============================================================================

/// Byte length of a string, or element count of a sequence or map
fn len(args: &[Value]) -> Result<Value> {
    let n = match &args[0] {
        Value::Nil => 0,
        Value::Str(s) => s.len(),
        Value::Object(o) => match (o.as_sequence(), o.as_map()) {
            (Some(seq), _) => seq.len(),
            (None, Some(map)) => map.len(),
            _ => return Err(invalid_argument("len", &args[0])),
        },
        other => return Err(invalid_argument("len", other)),
    };
    Ok(Value::Int(n as i64))
}

// ============================================================================
// substr
// ============================================================================

fn substr(args: &[Value]) -> Result<Value> {
    let s = args[0].as_str().unwrap_or_default();
    let (start, end) = bounds(&args[1], &args[2], s.len())?;
    s.get(start..end)
        .map(Value::str)
        .ok_or_else(|| Error::function("substr", "bounds split a UTF-8 character"))
}

// ============================================================================
// join
// ============================================================================

/// Concatenate the string forms of a sequence's elements
fn join(args: &[Value]) -> Result<Value> {
    let sep = args[1].as_str().unwrap_or_default();
    let seq = args[0]
        .as_object()
        .and_then(|o| o.as_sequence())
        .ok_or_else(|| invalid_argument("join", &args[0]))?;
    let mut out = String::new();
    for i in 0..seq.len() {
        if i > 0 {
            out.push_str(sep);
        }
        if let Some(item) = seq.get(i) {
            out.push_str(&item.to_string());
        }
    }
    Ok(Value::str(out))
}

// ============================================================================
// contains
// ============================================================================

/// Substring test for strings, element test for sequences, key test for maps
fn contains(args: &[Value]) -> Result<Value> {
    let (container, item) = (&args[0], &args[1]);
    let found = match container {
        Value::Str(s) => match item.as_str() {
            Some(needle) => s.contains(needle),
            None => return Err(invalid_argument("contains", item)),
        },
        Value::Object(o) => {
            if let Some(seq) = o.as_sequence() {
                (0..seq.len()).any(|i| seq.get(i).is_some_and(|v| v.loose_eq(item)))
            } else if let Some(map) = o.as_map() {
                match item.as_str() {
                    Some(key) => map.get(key).is_some(),
                    None => return Err(invalid_argument("contains", item)),
                }
            } else {
                return Err(invalid_argument("contains", container));
            }
        }
        other => return Err(invalid_argument("contains", other)),
    };
    Ok(Value::Bool(found))
}

// ============================================================================
// slice
// ============================================================================

/// `v[start:end]` for strings and sequences
fn slice(args: &[Value]) -> Result<Value> {
    match &args[0] {
        Value::Str(s) => {
            let (start, end) = bounds(&args[1], &args[2], s.len())?;
            s.get(start..end)
                .map(Value::str)
                .ok_or_else(|| Error::function("slice", "bounds split a UTF-8 character"))
        }
        Value::Object(o) => {
            let seq = o
                .as_sequence()
                .ok_or_else(|| invalid_argument("slice", &args[0]))?;
            let (start, end) = bounds(&args[1], &args[2], seq.len())?;
            let items = (start..end).filter_map(|i| seq.get(i)).collect();
            Ok(Value::object(List::typed(seq.elem_kind(), items)))
        }
        other => Err(invalid_argument("slice", other)),
    }
}

fn invalid_argument(name: &str, arg: &Value) -> Error {
    Error::type_mismatch(format!(
        "invalid argument {} (type {}) for {}",
        arg,
        arg.type_name(),
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len() {
        assert_eq!(len(&[Value::str("héllo")]), Ok(Value::Int(6)));
        assert_eq!(len(&[Value::list([1, 2, 3])]), Ok(Value::Int(3)));
        assert_eq!(len(&[Value::dict([("a", 1)])]), Ok(Value::Int(1)));
        assert_eq!(len(&[Value::Nil]), Ok(Value::Int(0)));
        assert!(len(&[Value::Int(3)]).is_err());
    }

    #[test]
    fn test_substr() {
        let args = [Value::str("abcdef"), Value::Int(1), Value::Int(3)];
        assert_eq!(substr(&args), Ok(Value::str("bc")));
        let args = [Value::str("abc"), Value::Int(1), Value::Int(9)];
        assert_eq!(substr(&args), Err(Error::IndexOutOfRange { index: 9, len: 3 }));
    }

    #[test]
    fn test_join() {
        let args = [Value::list(["a", "b", "c"]), Value::str(", ")];
        assert_eq!(join(&args), Ok(Value::str("a, b, c")));
        let args = [Value::list(Vec::<i64>::new()), Value::str(",")];
        assert_eq!(join(&args), Ok(Value::str("")));
    }

    #[test]
    fn test_contains() {
        assert_eq!(contains(&[Value::str("hello"), Value::str("ell")]), Ok(Value::Bool(true)));
        assert_eq!(contains(&[Value::list([1, 2]), Value::Int(2)]), Ok(Value::Bool(true)));
        assert_eq!(contains(&[Value::list([1, 2]), Value::Int(5)]), Ok(Value::Bool(false)));
        assert_eq!(contains(&[Value::dict([("k", 1)]), Value::str("k")]), Ok(Value::Bool(true)));
        assert!(contains(&[Value::Int(1), Value::Int(1)]).is_err());
    }

    #[test]
    fn test_slice() {
        let args = [Value::list([1, 2, 3, 4]), Value::Int(1), Value::Int(3)];
        assert_eq!(slice(&args), Ok(Value::list([2, 3])));
        let args = [Value::str("abcd"), Value::Int(2), Value::Int(4)];
        assert_eq!(slice(&args), Ok(Value::str("cd")));
        let args = [Value::list([1]), Value::Int(1), Value::Int(0)];
        assert!(matches!(slice(&args), Err(Error::IndexOutOfRange { .. })));
    }
}
