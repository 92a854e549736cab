// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Deriving schemas from Rust types.

use crate::schema::{LogicalKind, LogicalSchema, Schema, UnionSchema};
use std::collections::{BTreeMap, HashMap};

/// Trait for types that serve as an Avro data model.
///
/// ```
/// # use avro_codec::{AvroSchema, Schema};
/// let schema = <Vec<Option<i64>>>::get_schema();
/// assert_eq!(
///     schema.to_json_text(false).unwrap(),
///     r#"{"type":"array","items":["null","long"]}"#
/// );
/// ```
///
/// There is no implementation for [`BigDecimal`](bigdecimal::BigDecimal), a decimal schema
/// needs a precision and a scale. Use [`Schema::logical`] with [`LogicalKind::Decimal`].
pub trait AvroSchema {
    fn get_schema() -> Schema;
}

macro_rules! impl_schema (
    ($type:ty, $variant_constructor:expr) => (
        impl AvroSchema for $type {
            fn get_schema() -> Schema {
                $variant_constructor
            }
        }
    );
);

impl_schema!(bool, Schema::Boolean);
impl_schema!(i8, Schema::Int);
impl_schema!(i16, Schema::Int);
impl_schema!(i32, Schema::Int);
impl_schema!(i64, Schema::Long);
impl_schema!(u8, Schema::Int);
impl_schema!(u16, Schema::Int);
impl_schema!(u32, Schema::Long);
impl_schema!(f32, Schema::Float);
impl_schema!(f64, Schema::Double);
impl_schema!(String, Schema::String);
impl_schema!(str, Schema::String);
impl_schema!(char, Schema::String);
impl_schema!((), Schema::Null);

macro_rules! impl_passthrough_schema (
    ($type:ty where T: AvroSchema + ?Sized) => (
        impl<T: AvroSchema + ?Sized> AvroSchema for $type {
            fn get_schema() -> Schema {
                T::get_schema()
            }
        }
    );
);

impl_passthrough_schema!(&T where T: AvroSchema + ?Sized);
impl_passthrough_schema!(Box<T> where T: AvroSchema + ?Sized);

macro_rules! impl_array_schema (
    ($type:ty where T: AvroSchema) => (
        impl<T: AvroSchema> AvroSchema for $type {
            fn get_schema() -> Schema {
                Schema::array(T::get_schema()).build()
            }
        }
    );
);

impl_array_schema!([T] where T: AvroSchema);
impl_array_schema!(Vec<T> where T: AvroSchema);

macro_rules! impl_map_schema (
    ($type:ty where T: AvroSchema) => (
        impl<T: AvroSchema> AvroSchema for $type {
            fn get_schema() -> Schema {
                Schema::map(T::get_schema()).build()
            }
        }
    );
);

impl_map_schema!(HashMap<String, T> where T: AvroSchema);
impl_map_schema!(BTreeMap<String, T> where T: AvroSchema);

impl<T> AvroSchema for Option<T>
where
    T: AvroSchema,
{
    /// # Panics
    /// If the schema of `T` is `null` or a union, as unions cannot contain those.
    fn get_schema() -> Schema {
        let variants = vec![Schema::Null, T::get_schema()];

        Schema::Union(
            UnionSchema::new(variants).expect("Option<T> must produce a valid (non-nested) union"),
        )
    }
}

impl AvroSchema for uuid::Uuid {
    /// The schema is a `uuid` logical type annotating a string.
    fn get_schema() -> Schema {
        Schema::Logical(LogicalSchema {
            kind: LogicalKind::Uuid,
            underlying: Box::new(Schema::String),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn primitives() {
        assert_eq!(bool::get_schema(), Schema::Boolean);
        assert_eq!(i8::get_schema(), Schema::Int);
        assert_eq!(u16::get_schema(), Schema::Int);
        assert_eq!(u32::get_schema(), Schema::Long);
        assert_eq!(i64::get_schema(), Schema::Long);
        assert_eq!(f32::get_schema(), Schema::Float);
        assert_eq!(f64::get_schema(), Schema::Double);
        assert_eq!(str::get_schema(), Schema::String);
        assert_eq!(char::get_schema(), Schema::String);
        assert_eq!(<()>::get_schema(), Schema::Null);
        assert_eq!(<&String>::get_schema(), Schema::String);
        assert_eq!(<Box<i32>>::get_schema(), Schema::Int);
    }

    #[test]
    fn containers() -> TestResult {
        assert_eq!(
            <Vec<String>>::get_schema(),
            Schema::array(Schema::String).build()
        );
        assert_eq!(<[u8]>::get_schema(), Schema::array(Schema::Int).build());
        assert_eq!(
            <HashMap<String, f64>>::get_schema(),
            Schema::map(Schema::Double).build()
        );
        assert_eq!(
            <BTreeMap<String, Vec<i64>>>::get_schema(),
            Schema::map(Schema::array(Schema::Long).build()).build()
        );
        assert_eq!(
            <Option<String>>::get_schema(),
            Schema::union(vec![Schema::Null, Schema::String])?
        );
        Ok(())
    }

    #[test]
    fn uuid() -> TestResult {
        assert_eq!(
            uuid::Uuid::get_schema(),
            Schema::logical(LogicalKind::Uuid, Schema::String)?
        );
        assert_eq!(
            uuid::Uuid::get_schema().to_json_text(false)?,
            r#"{"type":"string","logicalType":"uuid"}"#
        );
        Ok(())
    }

    #[test]
    #[should_panic(expected = "Option<T> must produce a valid (non-nested) union")]
    fn nested_options_panic() {
        <Option<Option<i32>>>::get_schema();
    }
}
