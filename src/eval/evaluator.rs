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

//! Tree-walking expression evaluator

use smallvec::SmallVec;

use super::ops;
use crate::core::{Error, List, Result, Value};
use crate::functions;
use crate::params::Parameters;
use crate::parser::Expr;

/// Call arguments; most calls take at most four
type Args = SmallVec<[Value; 4]>;

/// Evaluates expression trees against a parameter source
///
/// The evaluator holds no state besides the borrowed parameters, so one
/// compiled tree can be evaluated by many evaluators at once.
pub struct Evaluator<'a> {
    params: &'a dyn Parameters,
}

impl<'a> Evaluator<'a> {
    pub fn new(params: &'a dyn Parameters) -> Self {
        Self { params }
    }

    /// Evaluate a tree to a value
    pub fn eval(&self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(lit) => Ok(lit.to_value()),
            Expr::Identifier(name) => self.eval_identifier(name),
            Expr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                if left.is_callable() {
                    let arg = self.eval(right)?;
                    return call(&left, std::iter::once(arg).collect(), false);
                }
                ops::binary(*op, left, &mut || self.eval(right))
            }
            Expr::Unary { op, operand } => ops::unary(*op, self.eval(operand)?),
            Expr::Call {
                callee,
                args,
                spread,
            } => {
                let callee = self.eval(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Args>>()?;
                call(&callee, args, *spread)
            }
            Expr::Selector { receiver, name } => select(self.eval(receiver)?, name),
            Expr::Index { receiver, index } => {
                let receiver = self.eval(receiver)?;
                let index = self.eval(index)?;
                self::index(receiver, index)
            }
            Expr::Slice {
                receiver,
                low,
                high,
                max,
            } => slice(self.eval(receiver)?, *low, *high, *max),
            Expr::Paren(inner) => self.eval(inner),
            Expr::Comment(_) => Ok(Value::Bool(true)),
        }
    }

    /// Builtins first, then parameters
    fn eval_identifier(&self, name: &str) -> Result<Value> {
        if let Some(builtin) = functions::lookup(name) {
            return Ok(builtin);
        }
        self.params
            .get(name)
            .ok_or_else(|| Error::UndefinedIdentifier(name.to_string()))
    }
}

/// Invoke a callable value
///
/// Fixed parameters are converted to their declared kinds. For variadic
/// callees the extra arguments are converted to the element kind; with
/// `spread` the last argument must be a sequence that supplies the whole
/// variadic tail by itself.
pub fn call(callee: &Value, args: Args, spread: bool) -> Result<Value> {
    let function = callee
        .as_object()
        .and_then(|o| o.as_callable())
        .ok_or_else(|| {
            Error::type_mismatch(format!(
                "cannot call non-function {} (type {})",
                callee,
                callee.type_name()
            ))
        })?;
    let name = function.name();
    let signature = function.signature();
    let fixed = signature.params.len();

    let mut converted = Args::with_capacity(args.len());

    if spread {
        let elem = signature.variadic.ok_or_else(|| {
            Error::type_mismatch(format!("cannot use ... in call to non-variadic {}", name))
        })?;
        if args.len() != fixed + 1 {
            return Err(Error::arity_mismatch(name, (fixed + 1).to_string(), args.len()));
        }
        let mut args = args.into_iter();
        for kind in &signature.params {
            if let Some(arg) = args.next() {
                converted.push(arg.convert(*kind)?);
            }
        }
        let tail = args.next().unwrap_or_default();
        let seq = tail.as_object().and_then(|o| o.as_sequence()).ok_or_else(|| {
            Error::type_mismatch(format!(
                "cannot use {} (type {}) as spread argument to {}",
                tail,
                tail.type_name(),
                name
            ))
        })?;
        for i in 0..seq.len() {
            converted.push(seq.get(i).unwrap_or_default().convert(elem)?);
        }
    } else {
        let arity_ok = match signature.variadic {
            Some(_) => args.len() >= fixed,
            None => args.len() == fixed,
        };
        if !arity_ok {
            return Err(Error::arity_mismatch(name, signature.arity(), args.len()));
        }
        for (i, arg) in args.into_iter().enumerate() {
            let kind = match signature.params.get(i) {
                Some(kind) => *kind,
                None => signature.variadic.unwrap_or(crate::core::Kind::Any),
            };
            converted.push(arg.convert(kind)?);
        }
    }

    function.call(&converted)
}

/// Resolve `receiver.name`
///
/// An exported zero-argument method wins over fields. Struct fields
/// resolve by exported name, then tag; unexported names only by tag. Map
/// keys must exist.
pub fn select(receiver: Value, name: &str) -> Result<Value> {
    let object = match &receiver {
        Value::Object(o) => o.clone(),
        other => return Err(Error::field_not_found(other.type_name(), name)),
    };
    if let Some(result) = object.method(name) {
        return result;
    }
    if let Some(target) = object.pointee() {
        return select(target, name);
    }
    if let Some(s) = object.as_struct() {
        let index = s
            .schema()
            .lookup(name)
            .ok_or_else(|| Error::field_not_found(object.type_name(), name))?;
        return Ok(s.field(index).unwrap_or_default());
    }
    if let Some(map) = object.as_map() {
        return map
            .get(name)
            .ok_or_else(|| Error::field_not_found(object.type_name(), name));
    }
    Err(Error::field_not_found(object.type_name(), name))
}

/// Resolve `receiver[index]`
pub fn index(receiver: Value, index: Value) -> Result<Value> {
    match &receiver {
        Value::Str(s) => {
            let i = integer_index(&index, s.len())?;
            match usize::try_from(i).ok().and_then(|i| s.as_bytes().get(i)) {
                Some(byte) => Ok(Value::Uint(u64::from(*byte))),
                None => Err(Error::IndexOutOfRange {
                    index: i,
                    len: s.len(),
                }),
            }
        }
        Value::Object(object) => {
            if let Some(target) = object.pointee() {
                return self::index(target, index);
            }
            if let Some(seq) = object.as_sequence() {
                let len = seq.len();
                let i = integer_index(&index, len)?;
                return usize::try_from(i)
                    .ok()
                    .filter(|i| *i < len)
                    .and_then(|i| seq.get(i))
                    .ok_or(Error::IndexOutOfRange { index: i, len });
            }
            if let Some(map) = object.as_map() {
                let key = index.as_str().ok_or_else(|| {
                    Error::type_mismatch(format!(
                        "invalid map key {} (type {})",
                        index,
                        index.type_name()
                    ))
                })?;
                return Ok(map
                    .get(key)
                    .unwrap_or_else(|| map.value_kind().zero_value()));
            }
            Err(not_indexable(&receiver))
        }
        _ => Err(not_indexable(&receiver)),
    }
}

/// Integer value of an index operand; `len` is the receiver length
fn integer_index(index: &Value, len: usize) -> Result<i64> {
    match index {
        Value::Int(i) => Ok(*i),
        Value::Uint(i) => i64::try_from(*i).map_err(|_| Error::IndexOutOfRange {
            index: i64::MAX,
            len,
        }),
        other => Err(Error::type_mismatch(format!(
            "invalid index {} (type {}): must be integer",
            other,
            other.type_name()
        ))),
    }
}

fn not_indexable(receiver: &Value) -> Error {
    Error::type_mismatch(format!(
        "cannot index {} (type {})",
        receiver,
        receiver.type_name()
    ))
}

/// Resolve `receiver[low:high]` and `receiver[low:high:max]`
pub fn slice(receiver: Value, low: Option<i64>, high: Option<i64>, max: Option<i64>) -> Result<Value> {
    match &receiver {
        Value::Str(s) => {
            if max.is_some() {
                return Err(Error::UnsupportedExpression(
                    "3-index slice of string".to_string(),
                ));
            }
            let (lo, hi) = slice_bounds(low, high, None, s.len())?;
            s.get(lo..hi).map(Value::str).ok_or_else(|| {
                Error::type_mismatch("slice bounds split a UTF-8 character")
            })
        }
        Value::Object(object) => {
            if let Some(target) = object.pointee() {
                return slice(target, low, high, max);
            }
            let seq = object
                .as_sequence()
                .ok_or_else(|| cannot_slice(&receiver))?;
            let (lo, hi) = slice_bounds(low, high, max, seq.len())?;
            let items = (lo..hi).filter_map(|i| seq.get(i)).collect();
            Ok(Value::object(List::typed(seq.elem_kind(), items)))
        }
        _ => Err(cannot_slice(&receiver)),
    }
}

/// Require `0 <= low <= high <= max <= len`; omitted bounds default to
/// 0, len and len
fn slice_bounds(
    low: Option<i64>,
    high: Option<i64>,
    max: Option<i64>,
    len: usize,
) -> Result<(usize, usize)> {
    let cap = max.unwrap_or(len as i64);
    if cap < 0 || cap as usize > len {
        return Err(Error::IndexOutOfRange { index: cap, len });
    }
    let hi = high.unwrap_or(len as i64);
    if hi < 0 || hi > cap {
        return Err(Error::IndexOutOfRange { index: hi, len });
    }
    let lo = low.unwrap_or(0);
    if lo < 0 || lo > hi {
        return Err(Error::IndexOutOfRange { index: lo, len });
    }
    Ok((lo as usize, hi as usize))
}

fn cannot_slice(receiver: &Value) -> Error {
    Error::type_mismatch(format!(
        "cannot slice {} (type {})",
        receiver,
        receiver.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Dict, Kind, Record, Ref, Signature, StructSchemaBuilder};
    use crate::params::{EmptyParameters, MapParameters};
    use crate::parser::parse_expr;
    use std::sync::Arc;

    fn eval_with(src: &str, params: &dyn Parameters) -> Result<Value> {
        Evaluator::new(params).eval(&parse_expr(src).unwrap())
    }

    fn eval(src: &str) -> Result<Value> {
        eval_with(src, &EmptyParameters)
    }

    fn user() -> Value {
        let schema = Arc::new(
            StructSchemaBuilder::new("User")
                .add("Name")
                .add_tagged("age", "age")
                .add("Title")
                .build(),
        );
        Value::object(
            Record::new(
                schema,
                vec![Value::str("ann"), Value::Int(30), Value::str("field")],
            )
            .with_method("Title", |_| Ok(Value::str("method"))),
        )
    }

    #[test]
    fn test_literals_and_arithmetic() {
        assert_eq!(eval("1 + 2 * 3"), Ok(Value::Int(7)));
        assert_eq!(eval("(1 + 2) * 3"), Ok(Value::Int(9)));
        assert_eq!(eval("\"a\" + 'b'"), Ok(Value::str("ab")));
        assert_eq!(eval("1.5 * 2.0"), Ok(Value::Float(3.0)));
        assert_eq!(eval("7 % 4 == 3 and not false"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_identifiers() {
        let params = MapParameters::new().with("x", 4);
        assert_eq!(eval_with("x * x", &params), Ok(Value::Int(16)));
        assert_eq!(
            eval_with("y", &params),
            Err(Error::UndefinedIdentifier("y".into()))
        );
        assert_eq!(eval("nil == nil"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_builtins_shadow_parameters() {
        let params = MapParameters::new().with("len", 99);
        assert_eq!(eval_with("len(\"abc\")", &params), Ok(Value::Int(3)));
    }

    #[test]
    fn test_comment_is_true() {
        assert_eq!(eval("// always"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_callable_binary_shorthand() {
        let params = MapParameters::new().with(
            "double",
            Value::function("double", Signature::fixed([Kind::Int]), |args| {
                Ok(Value::Int(args[0].as_i64().unwrap_or(0) * 2))
            }),
        );
        assert_eq!(eval_with("double + 21", &params), Ok(Value::Int(42)));
    }

    #[test]
    fn test_variadic_calls() {
        let sum = Value::function(
            "sum",
            Signature::variadic([Kind::String], Kind::Int),
            |args| {
                let total: i64 = args[1..].iter().filter_map(Value::as_i64).sum();
                Ok(Value::str(format!("{}{}", args[0], total)))
            },
        );
        let params = MapParameters::new()
            .with("sum", sum)
            .with("nums", Value::list([1, 2, 3]));
        assert_eq!(eval_with("sum(\"n=\", 1, 2)", &params), Ok(Value::str("n=3")));
        assert_eq!(eval_with("sum(\"n=\")", &params), Ok(Value::str("n=0")));
        assert_eq!(eval_with("sum(\"n=\", nums...)", &params), Ok(Value::str("n=6")));
        assert!(matches!(
            eval_with("sum(\"n=\", 1, nums...)", &params),
            Err(Error::ArityMismatch { .. })
        ));
        assert!(matches!(
            eval_with("sum()", &params),
            Err(Error::ArityMismatch { .. })
        ));
        assert!(matches!(
            eval_with("sum(\"n=\", 5...)", &params),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_spread_on_fixed_function_rejected() {
        let params = MapParameters::new().with("xs", Value::list(["a"]));
        assert!(matches!(
            eval_with("len(xs...)", &params),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_argument_conversion_failure() {
        assert!(matches!(
            eval("substr(1, 0, 1)"),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(eval("len()"), Err(Error::ArityMismatch { .. })));
    }

    #[test]
    fn test_function_error_propagates() {
        let params = MapParameters::new().with(
            "fail",
            Value::function("fail", Signature::fixed(Vec::new()), |_| {
                Err(Error::function("fail", "boom"))
            }),
        );
        assert_eq!(
            eval_with("fail()", &params),
            Err(Error::function("fail", "boom"))
        );
    }

    #[test]
    fn test_selectors() {
        let params = MapParameters::new().with("u", user());
        assert_eq!(eval_with("u.Name", &params), Ok(Value::str("ann")));
        assert_eq!(eval_with("u.age", &params), Ok(Value::Int(30)));
        // the exported method shadows the field of the same name
        assert_eq!(eval_with("u.Title", &params), Ok(Value::str("method")));
        assert!(matches!(
            eval_with("u.Missing", &params),
            Err(Error::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_selector_through_pointer() {
        let params = MapParameters::new().with("p", Value::object(Ref::new(user())));
        assert_eq!(eval_with("p.Name", &params), Ok(Value::str("ann")));
        assert_eq!(eval_with("(*p).Name", &params), Ok(Value::str("ann")));
    }

    #[test]
    fn test_map_selector_missing_key_is_error() {
        let params = MapParameters::new().with("m", Value::dict([("a", 1)]));
        assert_eq!(eval_with("m.a", &params), Ok(Value::Int(1)));
        assert!(matches!(
            eval_with("m.b", &params),
            Err(Error::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_index() {
        let params = MapParameters::new()
            .with("xs", Value::list([10, 20, 30]))
            .with(
                "counts",
                Value::object(Dict::typed(Kind::Int, vec![("a".to_string(), Value::Int(1))])),
            )
            .with(
                "names",
                Value::object(Dict::typed(Kind::String, Vec::new())),
            );
        assert_eq!(eval_with("xs[1]", &params), Ok(Value::Int(20)));
        assert_eq!(
            eval_with("xs[3]", &params),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            eval_with("xs[-1]", &params),
            Err(Error::IndexOutOfRange { index: -1, len: 3 })
        );
        assert_eq!(eval_with("counts[\"a\"]", &params), Ok(Value::Int(1)));
        assert_eq!(eval_with("counts[\"zz\"]", &params), Ok(Value::Int(0)));
        assert_eq!(eval_with("names[\"zz\"]", &params), Ok(Value::str("")));
        assert_eq!(eval_with("\"abc\"[1]", &params), Ok(Value::Uint(98)));
        assert!(matches!(eval_with("xs[\"a\"]", &params), Err(Error::TypeMismatch(_))));
    }

    #[test]
    fn test_oversized_unsigned_index_reports_length() {
        let params = MapParameters::new()
            .with("xs", Value::list([10, 20, 30]))
            .with("big", u64::MAX);
        assert_eq!(
            eval_with("xs[big]", &params),
            Err(Error::IndexOutOfRange {
                index: i64::MAX,
                len: 3
            })
        );
        assert_eq!(
            eval_with("\"ab\"[big]", &params),
            Err(Error::IndexOutOfRange {
                index: i64::MAX,
                len: 2
            })
        );
    }

    #[test]
    fn test_slices() {
        let params = MapParameters::new()
            .with("xs", Value::list([1, 2, 3, 4]))
            .with("s", "hello");
        assert_eq!(eval_with("xs[1:3]", &params), Ok(Value::list([2, 3])));
        assert_eq!(eval_with("xs[:2]", &params), Ok(Value::list([1, 2])));
        assert_eq!(eval_with("xs[2:]", &params), Ok(Value::list([3, 4])));
        assert_eq!(eval_with("xs[0:2:3]", &params), Ok(Value::list([1, 2])));
        assert!(matches!(
            eval_with("xs[0:3:2]", &params),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            eval_with("xs[1:9]", &params),
            Err(Error::IndexOutOfRange { .. })
        ));
        assert_eq!(eval_with("s[1:3]", &params), Ok(Value::str("el")));
        assert!(matches!(
            eval_with("s[0:1:2]", &params),
            Err(Error::UnsupportedExpression(_))
        ));
    }

    #[test]
    fn test_short_circuit() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = calls.clone();
        let params = MapParameters::new().with(
            "touch",
            Value::function("touch", Signature::fixed(Vec::new()), move |_| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Ok(Value::Bool(true))
            }),
        );
        assert_eq!(eval_with("false && touch()", &params), Ok(Value::Bool(false)));
        assert_eq!(eval_with("true || touch()", &params), Ok(Value::Bool(true)));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(eval_with("true && touch()", &params), Ok(Value::Bool(true)));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
