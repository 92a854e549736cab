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

//! Logic for parsing and interacting with schemas in Avro format.

mod builders;
mod logical;
mod name;
mod parser;
mod record;
mod union;

pub use crate::schema::{
    logical::{LogicalKind, LogicalSchema},
    name::{Aliases, Name, Namespace, NamespaceRef},
    record::{
        RecordField, RecordFieldBuilder, RecordFieldOrder, RecordSchema, RecordSchemaBuilder,
    },
    union::UnionSchema,
};
pub(crate) use crate::schema::logical::{Precision, Scale};
use crate::{
    AvroResult,
    error::{Details, Error},
    schema::parser::Parser,
};
use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};
use serde_json::Value as JsonValue;
use std::borrow::Cow;
use strum::{Display, EnumDiscriminants};

/// Represents documentation for complex Avro schemas.
pub type Documentation = Option<String>;

/// Represents any valid Avro schema
/// More information about Avro schemas can be found in the
/// [Avro Specification](https://avro.apache.org/docs/++version++/specification/#schema-declaration)
#[derive(Clone, Debug, PartialEq, EnumDiscriminants, Display)]
#[strum_discriminants(name(SchemaKind), derive(Hash, Ord, PartialOrd))]
pub enum Schema {
    /// A `null` Avro schema.
    Null,
    /// A `boolean` Avro schema.
    Boolean,
    /// An `int` Avro schema.
    Int,
    /// A `long` Avro schema.
    Long,
    /// A `float` Avro schema.
    Float,
    /// A `double` Avro schema.
    Double,
    /// A `bytes` Avro schema.
    ///
    /// `Bytes` represents a sequence of 8-bit unsigned bytes.
    Bytes,
    /// A `string` Avro schema.
    ///
    /// `String` represents a unicode character sequence.
    String,
    /// An `array` Avro schema.
    ///
    /// All items will have the same schema.
    Array(ArraySchema),
    /// A `map` Avro schema.
    ///
    /// Keys are always a `Schema::String` and all values will have the same schema.
    Map(MapSchema),
    /// A `union` Avro schema.
    Union(UnionSchema),
    /// A `record` Avro schema.
    Record(RecordSchema),
    /// An `enum` Avro schema.
    Enum(EnumSchema),
    /// A logical type refining one of the primitive schemas.
    Logical(LogicalSchema),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapSchema {
    pub types: Box<Schema>,
}

/// A description of an Enum schema.
#[derive(bon::Builder, Debug, Clone, PartialEq)]
pub struct EnumSchema {
    /// The name of the schema
    pub name: Name,
    /// The aliases of the schema
    #[builder(default)]
    pub aliases: Aliases,
    /// The documentation of the schema
    #[builder(default)]
    pub doc: Documentation,
    /// The set of symbols of the schema, the position of a symbol is its wire value
    pub symbols: Vec<String>,
    /// An optional default symbol
    pub default: Option<String>,
}

impl EnumSchema {
    /// Returns the position of `symbol`, if it is one of the symbols of this enum.
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }
}

impl Schema {
    /// Create a `Schema` from a string representing a JSON Avro schema.
    pub fn parse_str(input: &str) -> AvroResult<Schema> {
        let value = serde_json::from_str(input).map_err(Details::ParseSchemaJson)?;
        Self::parse(&value)
    }

    /// Create a `Schema` from a `serde_json::Value` representing a JSON Avro schema.
    pub fn parse(value: &JsonValue) -> AvroResult<Schema> {
        Parser::default().parse(value, None)
    }

    /// Renders this schema as JSON text.
    pub fn to_json_text(&self, pretty: bool) -> AvroResult<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        text.map_err(|e| Details::SerializeSchema(e).into())
    }

    /// Returns the name of the schema if it has one.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Schema::Record(RecordSchema { name, .. }) | Schema::Enum(EnumSchema { name, .. }) => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Returns whether the schema represents a named type according to the avro specification
    pub fn is_named(&self) -> bool {
        self.name().is_some()
    }

    /// The name a union variant of this schema is referred to by.
    ///
    /// This is the fullname of named schemas, the `logicalType` of logical schemas and the
    /// `type` attribute of everything else.
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Schema::Null => Cow::Borrowed("null"),
            Schema::Boolean => Cow::Borrowed("boolean"),
            Schema::Int => Cow::Borrowed("int"),
            Schema::Long => Cow::Borrowed("long"),
            Schema::Float => Cow::Borrowed("float"),
            Schema::Double => Cow::Borrowed("double"),
            Schema::Bytes => Cow::Borrowed("bytes"),
            Schema::String => Cow::Borrowed("string"),
            Schema::Array(_) => Cow::Borrowed("array"),
            Schema::Map(_) => Cow::Borrowed("map"),
            Schema::Union(_) => Cow::Borrowed("union"),
            Schema::Record(RecordSchema { name, .. }) | Schema::Enum(EnumSchema { name, .. }) => {
                Cow::Borrowed(name.fullname())
            }
            Schema::Logical(logical) => Cow::Borrowed(logical.kind.type_name()),
        }
    }

    /// Whether this is the `null` schema.
    pub fn is_null(&self) -> bool {
        matches!(self, Schema::Null)
    }

    /// Whether values of this schema take no bytes on the wire.
    pub(crate) fn is_zero_sized(&self) -> bool {
        match self {
            Schema::Null => true,
            Schema::Record(RecordSchema { fields, .. }) => {
                fields.iter().all(|field| field.schema.is_zero_sized())
            }
            Schema::Logical(logical) => logical.underlying().is_zero_sized(),
            _ => false,
        }
    }
}

impl TryFrom<&str> for Schema {
    type Error = Error;

    fn try_from(value: &str) -> AvroResult<Self> {
        Schema::parse_str(value)
    }
}

impl Serialize for Schema {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self {
            Schema::Null
            | Schema::Boolean
            | Schema::Int
            | Schema::Long
            | Schema::Float
            | Schema::Double
            | Schema::Bytes
            | Schema::String => serializer.serialize_str(&self.type_name()),
            Schema::Array(ArraySchema { items }) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items)?;
                map.end()
            }
            Schema::Map(MapSchema { types }) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("values", types)?;
                map.end()
            }
            Schema::Union(inner) => {
                let variants = inner.variants();
                let mut seq = serializer.serialize_seq(Some(variants.len()))?;
                for v in variants {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Schema::Record(RecordSchema {
                name,
                aliases,
                doc,
                fields,
                lookup: _lookup,
            }) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "record")?;
                if let Some(n) = name.namespace() {
                    map.serialize_entry("namespace", n)?;
                }
                map.serialize_entry("name", name.name())?;
                if let Some(docstr) = doc {
                    map.serialize_entry("doc", docstr)?;
                }
                if let Some(aliases) = aliases {
                    map.serialize_entry("aliases", aliases)?;
                }
                map.serialize_entry("fields", fields)?;
                map.end()
            }
            Schema::Enum(EnumSchema {
                name,
                symbols,
                aliases,
                default,
                doc,
            }) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "enum")?;
                if let Some(n) = name.namespace() {
                    map.serialize_entry("namespace", n)?;
                }
                map.serialize_entry("name", name.name())?;
                map.serialize_entry("symbols", symbols)?;

                if let Some(aliases) = aliases {
                    map.serialize_entry("aliases", aliases)?;
                }
                if let Some(default) = default {
                    map.serialize_entry("default", default)?;
                }
                if let Some(doc) = doc {
                    map.serialize_entry("doc", doc)?;
                }
                map.end()
            }
            Schema::Logical(LogicalSchema { kind, underlying }) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", &underlying.type_name())?;
                map.serialize_entry("logicalType", kind.type_name())?;
                if let LogicalKind::Decimal { scale, precision } = kind {
                    map.serialize_entry("precision", precision)?;
                    map.serialize_entry("scale", scale)?;
                }
                map.end()
            }
        }
    }
}
