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

use crate::error::Details;
use crate::schema::{
    ArraySchema, EnumSchema, LogicalKind, LogicalSchema, MapSchema, Name, NamespaceRef,
    Precision, RecordField, RecordSchema, Scale, Schema, SchemaKind, UnionSchema,
};
use crate::util::MapHelper;
use crate::validator::validate_enum_symbol_name;
use crate::{AvroResult, Error};
use log::{debug, error, warn};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

#[derive(Default)]
pub(crate) struct Parser {
    /// The named schemas defined so far, used to report references to them
    defined_names: HashSet<Name>,
}

impl Parser {
    /// Create a `Schema` from a `serde_json::Value` representing a JSON Avro schema.
    pub(crate) fn parse(
        &mut self,
        value: &Value,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        match *value {
            Value::String(ref t) => self.parse_known_schema(t.as_str(), enclosing_namespace),
            Value::Object(ref data) => self.parse_complex(data, enclosing_namespace),
            Value::Array(ref data) => self.parse_union(data, enclosing_namespace),
            _ => Err(Details::ParseSchemaFromValidJson.into()),
        }
    }

    /// Parse a string as a primitive type.
    ///
    /// Named types can only be used where they are defined, a reference by name is an error.
    fn parse_known_schema(
        &mut self,
        name: &str,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        match name {
            "null" => Ok(Schema::Null),
            "boolean" => Ok(Schema::Boolean),
            "int" => Ok(Schema::Int),
            "long" => Ok(Schema::Long),
            "double" => Ok(Schema::Double),
            "float" => Ok(Schema::Float),
            "bytes" => Ok(Schema::Bytes),
            "string" => Ok(Schema::String),
            "fixed" => Err(Details::FixedNotSupported.into()),
            other => {
                let referenced = Name::new_with_enclosing_namespace(other, enclosing_namespace)
                    .is_ok_and(|name| self.defined_names.contains(&name));
                if referenced {
                    error!("Schema references by name are not supported: '{other}'");
                }
                Err(Details::ParsePrimitive(other.to_string()).into())
            }
        }
    }

    fn get_decimal_integer(
        &self,
        complex: &Map<String, Value>,
        key: &'static str,
    ) -> AvroResult<usize> {
        match complex.get(key) {
            Some(Value::Number(value)) => value
                .as_u64()
                .and_then(|num| usize::try_from(num).ok())
                .ok_or_else(|| Details::GetPrecisionOrScaleFromJson(value.clone()).into()),
            None => {
                if key == "scale" {
                    Ok(0)
                } else {
                    Err(Details::GetDecimalMetadataFromJson(key).into())
                }
            }
            Some(value) => Err(Details::GetDecimalMetadataValueFromJson {
                key: key.into(),
                value: value.clone(),
            }
            .into()),
        }
    }

    fn parse_precision_and_scale(
        &self,
        complex: &Map<String, Value>,
    ) -> AvroResult<(Precision, Scale)> {
        let precision = self.get_decimal_integer(complex, "precision")?;
        let scale = self.get_decimal_integer(complex, "scale")?;
        Ok((precision, scale))
    }

    /// Parse a `serde_json::Value` representing a complex Avro type into a `Schema`.
    ///
    /// Avro supports "recursive" definition of types.
    /// e.g: `{"type": {"type": "string"}}`
    pub(crate) fn parse_complex(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        match complex.get("logicalType") {
            Some(Value::String(t)) => {
                let native = self.parse_native_complex(complex, enclosing_namespace)?;
                return self.try_convert_to_logical_type(t, complex, native);
            }
            // Ignoring invalid logical types only applies to unknown names, a `logicalType`
            // that is not a string is an error.
            Some(value) => return Err(Details::GetLogicalTypeFieldType(value.clone()).into()),
            None => {}
        }
        self.parse_native_complex(complex, enclosing_namespace)
    }

    fn parse_native_complex(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        match complex.get("type") {
            Some(Value::String(t)) => match t.as_str() {
                "record" => self.parse_record(complex, enclosing_namespace),
                "enum" => self.parse_enum(complex, enclosing_namespace),
                "array" => self.parse_array(complex, enclosing_namespace),
                "map" => self.parse_map(complex, enclosing_namespace),
                other => self.parse_known_schema(other, enclosing_namespace),
            },
            Some(Value::Object(data)) => self.parse_complex(data, enclosing_namespace),
            Some(Value::Array(variants)) => self.parse_union(variants, enclosing_namespace),
            Some(unknown) => Err(Details::GetComplexType(unknown.clone()).into()),
            None => Err(Details::GetComplexTypeField.into()),
        }
    }

    /// Wraps `schema` in the logical type named `logical_type`.
    ///
    /// Unknown logical types, logical types on the wrong underlying type and decimals with
    /// invalid metadata are ignored and `schema` is returned as is.
    fn try_convert_to_logical_type(
        &self,
        logical_type: &str,
        complex: &Map<String, Value>,
        schema: Schema,
    ) -> AvroResult<Schema> {
        let kind = match logical_type {
            "date" => LogicalKind::Date,
            "time-millis" => LogicalKind::TimeMillis,
            "time-micros" => LogicalKind::TimeMicros,
            "timestamp-millis" => LogicalKind::TimestampMillis,
            "timestamp-micros" => LogicalKind::TimestampMicros,
            "uuid" => LogicalKind::Uuid,
            "decimal" => match self.parse_precision_and_scale(complex) {
                Ok((precision, scale)) => LogicalKind::Decimal { scale, precision },
                Err(err) => {
                    warn!("Ignoring invalid decimal logical type: {err}");
                    return Ok(schema);
                }
            },
            _ => {
                warn!("Ignoring unknown logical type '{logical_type}' for schema: {schema:?}");
                return Ok(schema);
            }
        };

        if kind.underlying_kind() != SchemaKind::from(&schema) {
            warn!(
                "Ignoring logical type '{logical_type}' for schema of type: {schema:?}! Expected a '{:?}' schema",
                kind.underlying_kind()
            );
            return Ok(schema);
        }

        match LogicalSchema::new(kind, schema.clone()) {
            Ok(logical) => Ok(Schema::Logical(logical)),
            Err(err) => {
                warn!("Ignoring invalid logical type '{logical_type}': {err}");
                Ok(schema)
            }
        }
    }

    /// Parse a `serde_json::Value` representing an Avro record type into a `Schema`.
    fn parse_record(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        let fully_qualified_name = Name::parse(complex, enclosing_namespace)?;

        debug!("Going to parse record schema: {:?}", &fully_qualified_name);

        let fields: Vec<RecordField> = complex
            .get("fields")
            .and_then(|fields| fields.as_array())
            .ok_or_else(|| Error::new(Details::GetRecordFieldsJson))
            .and_then(|fields| {
                fields
                    .iter()
                    .filter_map(|field| field.as_object())
                    .enumerate()
                    .map(|(position, field)| {
                        RecordField::parse(
                            field,
                            position,
                            self,
                            fully_qualified_name.namespace(),
                        )
                    })
                    .collect::<Result<_, _>>()
            })?;

        let mut lookup = BTreeMap::new();
        for field in &fields {
            if let Some(_old) = lookup.insert(field.name.clone(), field.position) {
                return Err(Details::FieldNameDuplicate(field.name.clone()).into());
            }
        }

        self.defined_names.insert(fully_qualified_name.clone());

        Ok(Schema::Record(RecordSchema {
            name: fully_qualified_name,
            aliases: complex.aliases(),
            doc: complex.doc(),
            fields,
            lookup,
        }))
    }

    /// Parse a `serde_json::Value` representing a Avro enum type into a `Schema`.
    fn parse_enum(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        let fully_qualified_name = Name::parse(complex, enclosing_namespace)?;

        let symbols: Vec<String> = complex
            .get("symbols")
            .and_then(|v| v.as_array())
            .ok_or_else(|| Error::from(Details::GetEnumSymbolsField))
            .and_then(|symbols| {
                symbols
                    .iter()
                    .map(|symbol| symbol.as_str().map(|s| s.to_string()))
                    .collect::<Option<_>>()
                    .ok_or_else(|| Error::from(Details::GetEnumSymbols))
            })?;

        let mut existing_symbols: HashSet<&String> = HashSet::with_capacity(symbols.len());
        for symbol in symbols.iter() {
            validate_enum_symbol_name(symbol)?;

            // Ensure there are no duplicate symbols
            if !existing_symbols.insert(symbol) {
                return Err(Details::EnumSymbolDuplicate(symbol.to_string()).into());
            }
        }

        let default = match complex.get("default") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(value) => return Err(Details::EnumDefaultWrongType(value.clone()).into()),
            None => None,
        };

        if let Some(ref symbol) = default {
            if !symbols.contains(symbol) {
                return Err(Details::GetEnumDefault {
                    symbol: symbol.to_string(),
                    symbols,
                }
                .into());
            }
        }

        self.defined_names.insert(fully_qualified_name.clone());

        Ok(Schema::Enum(EnumSchema {
            name: fully_qualified_name,
            aliases: complex.aliases(),
            doc: complex.doc(),
            symbols,
            default,
        }))
    }

    /// Parse a `serde_json::Value` representing a Avro array type into a `Schema`.
    fn parse_array(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        complex
            .get("items")
            .ok_or_else(|| Details::GetArrayItemsField.into())
            .and_then(|items| self.parse(items, enclosing_namespace))
            .map(|items| {
                Schema::Array(ArraySchema {
                    items: Box::new(items),
                })
            })
    }

    /// Parse a `serde_json::Value` representing a Avro map type into a `Schema`.
    fn parse_map(
        &mut self,
        complex: &Map<String, Value>,
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        complex
            .get("values")
            .ok_or_else(|| Details::GetMapValuesField.into())
            .and_then(|types| self.parse(types, enclosing_namespace))
            .map(|types| {
                Schema::Map(MapSchema {
                    types: Box::new(types),
                })
            })
    }

    /// Parse a `serde_json::Value` representing a Avro union type into a `Schema`.
    fn parse_union(
        &mut self,
        items: &[Value],
        enclosing_namespace: NamespaceRef,
    ) -> AvroResult<Schema> {
        items
            .iter()
            .map(|v| self.parse(v, enclosing_namespace))
            .collect::<Result<Vec<_>, _>>()
            .and_then(|schemas| {
                if schemas.is_empty() {
                    error!(
                        "Union schemas should have at least two members! \
                    Please enable debug logging to find out which Record schema \
                    declares the union with 'RUST_LOG=avro_codec::schema=debug'."
                    );
                } else if schemas.len() == 1 {
                    warn!(
                        "Union schema with just one member! Consider dropping the union! \
                    Please enable debug logging to find out which Record schema \
                    declares the union with 'RUST_LOG=avro_codec::schema=debug'."
                    );
                }
                Ok(Schema::Union(UnionSchema::new(schemas)?))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn enum_symbols_are_validated() {
        let err = Schema::parse(&json!({
            "type": "enum", "name": "Suit", "symbols": ["SPADES", "SPADES"]
        }))
        .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::EnumSymbolDuplicate(s)) if s == "SPADES"));

        let err = Schema::parse(&json!({
            "type": "enum", "name": "Suit", "symbols": ["1SPADES"]
        }))
        .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::EnumSymbolName(_))));

        let err = Schema::parse(&json!({"type": "enum", "name": "Suit"}))
            .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::GetEnumSymbolsField)));
    }

    #[test]
    fn enum_default_must_be_a_symbol() {
        let err = Schema::parse(&json!({
            "type": "enum", "name": "Suit", "symbols": ["SPADES"], "default": "HEARTS"
        }))
        .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::GetEnumDefault { symbol, .. }) if symbol == "HEARTS"));

        let err = Schema::parse(&json!({
            "type": "enum", "name": "Suit", "symbols": ["SPADES"], "default": 1
        }))
        .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::EnumDefaultWrongType(_))));
    }

    #[test]
    fn record_fields_are_validated() {
        let err = Schema::parse(&json!({
            "type": "record", "name": "Point",
            "fields": [{"name": "x", "type": "int"}, {"name": "x", "type": "int"}]
        }))
        .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::FieldNameDuplicate(name)) if name == "x"));

        let err = Schema::parse(&json!({"type": "record", "name": "Point"}))
            .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::GetRecordFieldsJson)));

        let err = Schema::parse(&json!({
            "type": "record", "name": "Point", "fields": [{"name": "x"}]
        }))
        .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::GetComplexTypeField)));
    }

    #[test]
    fn references_by_name_are_rejected() {
        let err = Schema::parse(&json!({
            "type": "record", "name": "Node", "namespace": "graph",
            "fields": [
                {"name": "kind", "type": {"type": "enum", "name": "Kind", "symbols": ["LEAF"]}},
                {"name": "other", "type": "Kind"}
            ]
        }))
        .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::ParsePrimitive(name)) if name == "Kind"));
    }

    #[test]
    fn explicit_namespace_wins_over_the_enclosing_one() -> TestResult {
        let schema = Schema::parse(&json!({
            "type": "record", "name": "Outer", "namespace": "a",
            "fields": [
                {"name": "inner", "type": {
                    "type": "record", "name": "Inner", "namespace": "b", "fields": []
                }},
                {"name": "dotted", "type": {
                    "type": "enum", "name": "c.Dotted", "symbols": ["X"]
                }}
            ]
        }))?;
        let Schema::Record(outer) = schema else {
            anyhow::bail!("Expected a record");
        };
        let names: Vec<_> = outer
            .fields
            .iter()
            .filter_map(|field| field.schema.name().map(|name| name.fullname().to_string()))
            .collect();
        assert_eq!(names, vec!["b.Inner", "c.Dotted"]);
        Ok(())
    }

    #[test]
    fn decimal_metadata() -> TestResult {
        let schema = Schema::parse(&json!({
            "type": "bytes", "logicalType": "decimal", "precision": 4
        }))?;
        assert_eq!(
            schema,
            Schema::logical(
                LogicalKind::Decimal {
                    scale: 0,
                    precision: 4
                },
                Schema::Bytes
            )?
        );

        // a missing precision or a non integer scale make the logical type invalid
        assert_eq!(
            Schema::parse(&json!({"type": "bytes", "logicalType": "decimal"}))?,
            Schema::Bytes
        );
        assert_eq!(
            Schema::parse(&json!({
                "type": "bytes", "logicalType": "decimal", "precision": 4, "scale": "2"
            }))?,
            Schema::Bytes
        );
        Ok(())
    }

    #[test]
    fn logical_type_must_be_a_string() {
        let err = Schema::parse(&json!({"type": "int", "logicalType": 1}))
            .map_err(Error::into_details);
        assert!(matches!(err, Err(Details::GetLogicalTypeFieldType(_))));
    }

    #[test]
    fn union_variants_are_validated() {
        let err = Schema::parse(&json!(["null", "string", "null"])).map_err(Error::into_details);
        assert!(matches!(err, Err(Details::GetUnionDuplicateNull)));

        let err = Schema::parse(&json!(["null", ["int", "long"]])).map_err(Error::into_details);
        assert!(matches!(err, Err(Details::GetNestedUnion)));
    }
}
