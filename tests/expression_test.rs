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

//! Expression Tests
//!
//! End-to-end compile and evaluate through the public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sqlweave::core::Kind;
use sqlweave::eval::{eval, global_cache};
use sqlweave::parser::{Expr, Literal};
use sqlweave::{Dict, Error, Expression, MapParameters, Ref, Signature, Value};

fn run(source: &str) -> Result<Value, Error> {
    eval(source, &MapParameters::new())
}

// ============================================================================
// Constant folding
// ============================================================================

#[test]
fn test_folded_constant_matches_evaluation() {
    for source in ["1 + 2 * 3", "(4 - 6) * -3", "7 / 2 + 7 % 2", "12 & 10 | 1", "\"a\" + \"b\""] {
        let expr = Expression::compile(source).expect("compile");
        assert!(
            matches!(expr.root(), Expr::Literal(_)),
            "{} should fold to a literal",
            source
        );
        let params = MapParameters::new();
        assert_eq!(expr.evaluate(&params), run(source));
    }
}

#[test]
fn test_fold_keeps_parameter_references() {
    let expr = Expression::compile("x + 2 * 3").expect("compile");
    assert!(!matches!(expr.root(), Expr::Literal(_)));
    let params = MapParameters::new().with("x", 4);
    assert_eq!(expr.evaluate(&params), Ok(Value::Int(10)));
}

#[test]
fn test_fold_error_surfaces_at_compile() {
    let err = Expression::compile("1 / 0").unwrap_err();
    assert_eq!(err, Error::DivisionByZero);
}

#[test]
fn test_boolean_literal_fold() {
    let expr = Expression::compile("true && !false").expect("compile");
    assert_eq!(expr.root(), &Expr::Literal(Literal::Bool(true)));
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_short_circuit_skips_right_operand() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let params = MapParameters::new().with(
        "probe",
        Value::function("probe", Signature::fixed(Vec::new()), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Bool(true))
        }),
    );

    assert_eq!(eval("false && probe()", &params), Ok(Value::Bool(false)));
    assert_eq!(eval("true or probe()", &params), Ok(Value::Bool(true)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert_eq!(eval("false || probe()", &params), Ok(Value::Bool(true)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_logical_operand_must_be_bool() {
    assert!(matches!(run("1 && true"), Err(Error::TypeMismatch(_))));
}

#[test]
fn test_nil_comparisons() {
    assert_eq!(run("nil == nil"), Ok(Value::Bool(true)));
    assert_eq!(run("nil != nil"), Ok(Value::Bool(false)));
    assert!(matches!(run("1 < nil"), Err(Error::TypeMismatch(_))));
}

#[test]
fn test_mixed_integer_families_rejected() {
    let params = MapParameters::new().with("u", 3u32).with("i", 3i32);
    assert!(matches!(eval("u + i", &params), Err(Error::TypeMismatch(_))));
    assert_eq!(eval("u + u", &params), Ok(Value::Uint(6)));
}

#[test]
fn test_integer_division() {
    assert_eq!(run("-7 / 2"), Ok(Value::Int(-3)));
    assert_eq!(run("-7 % 2"), Ok(Value::Int(-1)));
    let params = MapParameters::new().with("zero", 0);
    assert_eq!(eval("1 % zero", &params), Err(Error::DivisionByZero));
}

#[test]
fn test_string_comparison() {
    assert_eq!(run("\"abc\" < \"abd\""), Ok(Value::Bool(true)));
    assert_eq!(run("'x' == \"x\""), Ok(Value::Bool(true)));
}

// ============================================================================
// Access
// ============================================================================

#[test]
fn test_index_out_of_range() {
    let params = MapParameters::new().with("items", vec![1, 2, 3]);
    assert_eq!(eval("items[2]", &params), Ok(Value::Int(3)));
    assert_eq!(
        eval("items[5]", &params),
        Err(Error::IndexOutOfRange { index: 5, len: 3 })
    );
}

#[test]
fn test_missing_map_key_yields_zero_value() {
    let scores = Dict::typed(Kind::Float, vec![("ann".to_string(), Value::Float(9.5))]);
    let params = MapParameters::new().with("scores", Value::object(scores));
    assert_eq!(eval("scores[\"ann\"]", &params), Ok(Value::Float(9.5)));
    assert_eq!(eval("scores[\"bob\"]", &params), Ok(Value::Float(0.0)));
}

#[test]
fn test_pointer_indirection() {
    let params = MapParameters::new().with("p", Value::object(Ref::new(vec![4, 5])));
    assert_eq!(eval("(*p)[1]", &params), Ok(Value::Int(5)));
    assert_eq!(eval("len(*p)", &params), Ok(Value::Int(2)));
}

#[test]
fn test_undefined_identifier() {
    assert_eq!(
        run("missing + 1"),
        Err(Error::UndefinedIdentifier("missing".to_string()))
    );
}

// ============================================================================
// Builtins
// ============================================================================

#[test]
fn test_builtin_functions() {
    let params = MapParameters::new()
        .with("tags", vec!["a", "b", "c"])
        .with("name", "sqlweave");
    assert_eq!(eval("len(tags)", &params), Ok(Value::Int(3)));
    assert_eq!(eval("join(tags, \",\")", &params), Ok(Value::str("a,b,c")));
    assert_eq!(eval("contains(name, \"weave\")", &params), Ok(Value::Bool(true)));
    assert_eq!(eval("substr(name, 0, 3)", &params), Ok(Value::str("sql")));
}

// ============================================================================
// Cache
// ============================================================================

#[test]
fn test_global_cache_reuses_compiled_expression() {
    let first = global_cache()
        .get_or_compile("len(expression_test_key) > 0")
        .expect("compile");
    let second = global_cache()
        .get_or_compile("len(expression_test_key) > 0")
        .expect("compile");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_syntax_errors_are_not_cached() {
    let source = "expression_test_bad +";
    assert!(global_cache().get_or_compile(source).unwrap_err().is_syntax());
    assert!(global_cache().get(source).is_none());
}
