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

//! Core types and definitions for sqlweave
//!
//! - [`Value`] - Dynamic runtime values with kind information
//! - [`Kind`] - Normalized value kinds used by operator dispatch
//! - [`Object`] - Capability interface for host objects
//! - [`StructSchema`] - Field and tag registration for struct-like objects
//! - [`Error`] - Error types for compile, evaluation and render failures

pub mod error;
pub mod object;
pub mod schema;
pub mod value;

pub use error::{Error, Result};
pub use object::{
    Callable, Dict, Function, List, MapLike, Object, Record, Ref, SequenceLike, Signature,
    StructLike,
};
pub use schema::{is_exported, FieldDef, StructSchema, StructSchemaBuilder};
pub use value::{Complex, Kind, Value};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_through_value() {
        let schema = Arc::new(
            StructSchemaBuilder::new("Order")
                .add("Id")
                .add_tagged("total", "total")
                .build(),
        );
        let value = Value::object(Record::new(schema, vec![Value::Int(7), Value::Float(9.5)]));
        assert_eq!(value.kind(), Kind::Struct);
        assert_eq!(value.type_name(), "Order");

        let object = value.as_object().unwrap();
        let st = object.as_struct().unwrap();
        let idx = st.schema().lookup("total").unwrap();
        assert_eq!(st.field(idx), Some(Value::Float(9.5)));
        assert!(!value.is_zero());
    }
}
