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

//! Logic handling the intermediate representation of Avro values.
use bigdecimal::BigDecimal;
use std::collections::{BTreeMap, HashMap};
use strum_macros::EnumDiscriminants;
use uuid::Uuid;

/// Represents any valid Avro value
/// More information about Avro values can be found in the
/// [Avro Specification](https://avro.apache.org/docs/++version++/specification/#schema-declaration)
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(ValueKind))]
pub enum Value {
    /// A `null` Avro value.
    Null,
    /// A `boolean` Avro value.
    Boolean(bool),
    /// A `int` Avro value.
    Int(i32),
    /// A `long` Avro value.
    Long(i64),
    /// A `float` Avro value.
    Float(f32),
    /// A `double` Avro value.
    Double(f64),
    /// A `bytes` Avro value.
    Bytes(Vec<u8>),
    /// A `string` Avro value.
    String(String),
    /// An `array` Avro value.
    Array(Vec<Value>),
    /// A `map` Avro value.
    ///
    /// Entries are kept sorted by key, which is also the order they are encoded in.
    Map(BTreeMap<String, Value>),
    /// A `record` Avro value.
    ///
    /// The first element is the name of the record type, the second the fields as
    /// `(name, value)` pairs. The order of the pairs does not matter for encoding, the fields
    /// are written in the order of the schema.
    ///
    /// The name is not checked when encoding. Decoded records always carry the fullname of
    /// their schema, e.g. `people.Person`.
    Record(String, Vec<(String, Value)>),
    /// An `enum` Avro value.
    ///
    /// The first element is the name of the enum type, the second the symbol. Like records,
    /// decoded enums carry the fullname of their schema.
    Enum(String, String),
    /// A value that selects a union variant by its type name.
    ///
    /// The name is the fullname of a named variant, the `logicalType` of a logical variant
    /// or the `type` of any other variant, e.g. `"string"`.
    Tagged(String, Box<Value>),
    /// A calendar date, as the number of seconds since the unix epoch.
    ///
    /// It is encoded as the number of whole days, any time of day is dropped.
    Date(i64),
    /// A universally unique identifier.
    Uuid(Uuid),
    /// An arbitrary-precision decimal.
    Decimal(BigDecimal),
}

impl Value {
    /// Builds a `Value::Record` from a type name and `(field, value)` pairs.
    pub fn record<N, F, V>(name: N, fields: impl IntoIterator<Item = (F, V)>) -> Self
    where
        N: Into<String>,
        F: Into<String>,
        V: Into<Value>,
    {
        Value::Record(
            name.into(),
            fields
                .into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }

    /// Builds a `Value::Tagged` that selects the union variant called `branch`.
    pub fn tagged(branch: impl Into<String>, value: impl Into<Value>) -> Self {
        Value::Tagged(branch.into(), Box::new(value.into()))
    }

    /// The kind of this value, used in error messages.
    pub fn kind(&self) -> ValueKind {
        ValueKind::from(self)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

macro_rules! to_value(
    ($type:ty, $variant_constructor:expr) => (
        impl From<$type> for Value {
            fn from(value: $type) -> Self {
                $variant_constructor(value)
            }
        }
    );
);

to_value!(bool, Value::Boolean);
to_value!(i32, Value::Int);
to_value!(i64, Value::Long);
to_value!(f32, Value::Float);
to_value!(f64, Value::Double);
to_value!(String, Value::String);
to_value!(Vec<u8>, Value::Bytes);
to_value!(Uuid, Value::Uuid);
to_value!(BigDecimal, Value::Decimal);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_owned())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for Value
where
    K: Into<String>,
    V: Into<Self>,
{
    fn from(value: HashMap<K, V, S>) -> Self {
        Self::Map(
            value
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<K, V> From<BTreeMap<K, V>> for Value
where
    K: Into<String>,
    V: Into<Self>,
{
    fn from(value: BTreeMap<K, V>) -> Self {
        Self::Map(
            value
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
