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

use crate::{
    AvroResult,
    error::Details,
    logical::encode_logical,
    schema::{EnumSchema, RecordSchema, Schema, SchemaKind, UnionSchema},
    sink::Sink,
    types::{Value, ValueKind},
};
use log::error;
use std::collections::BTreeMap;

/// Encode a `Value` into avro format.
///
/// The value is checked against the schema while it is written, the first mismatch aborts
/// the encoding. The returned error carries the location of the mismatch, see
/// [`Error::path`](crate::Error::path).
pub fn encode(schema: &Schema, value: &Value) -> AvroResult<Vec<u8>> {
    let mut sink = Sink::new();
    encode_into(schema, value, &mut sink)?;
    Ok(sink.into_inner())
}

/// Encode a `Value` into avro format, appending to `sink`.
///
/// On failure nothing is appended, `sink` is left as it was before the call.
pub fn encode_into(schema: &Schema, value: &Value, sink: &mut Sink) -> AvroResult<()> {
    let len = sink.len();
    let open_containers = sink.open_containers();
    encode_internal(value, schema, sink).inspect_err(|_| sink.truncate(len, open_containers))
}

fn mismatch(value: &Value, schema: &Schema) -> crate::Error {
    let kind = SchemaKind::from(schema);
    error!("invalid value for schema type {kind:?}: {value:?}");
    Details::EncodeValueWithSchema {
        value: value.clone(),
        schema: kind,
    }
    .into()
}

pub(crate) fn encode_internal(value: &Value, schema: &Schema, sink: &mut Sink) -> AvroResult<()> {
    match (schema, value) {
        (Schema::Union(union), value) => encode_union(value, union, sink),
        (Schema::Null, Value::Null) => Ok(()),
        (_, Value::Null) => Err(Details::EncodeValueAsSchemaError {
            value_kind: ValueKind::Null,
            supported_schema: vec![SchemaKind::Null, SchemaKind::Union],
        }
        .into()),
        (Schema::Boolean, &Value::Boolean(b)) => {
            sink.write_boolean(b);
            Ok(())
        }
        (Schema::Int, &Value::Int(i)) => {
            sink.write_int(i);
            Ok(())
        }
        (Schema::Int, &Value::Long(i)) => {
            let i = i32::try_from(i).map_err(|_| Details::IntegerOutOfRange(i))?;
            sink.write_int(i);
            Ok(())
        }
        (Schema::Long, &Value::Long(i)) => {
            sink.write_long(i);
            Ok(())
        }
        (Schema::Float, &Value::Float(x)) => {
            sink.write_float(x);
            Ok(())
        }
        (Schema::Double, &Value::Double(x)) => {
            sink.write_double(x);
            Ok(())
        }
        (Schema::Bytes, Value::Bytes(bytes)) => {
            sink.write_bytes(bytes);
            Ok(())
        }
        (Schema::String, Value::String(s)) => {
            sink.write_string(s);
            Ok(())
        }
        (Schema::Enum(enum_schema), Value::Enum(_, symbol) | Value::String(symbol)) => {
            encode_enum(symbol, enum_schema, sink)
        }
        (Schema::Array(array), Value::Array(items)) => encode_array(items, &array.items, sink),
        (Schema::Map(map), Value::Map(entries)) => encode_map(entries, &map.types, sink),
        (Schema::Record(record), Value::Record(_, fields)) => encode_record(fields, record, sink),
        (Schema::Logical(logical), value) => encode_logical(value, logical, sink),
        (schema, value) => Err(mismatch(value, schema)),
    }
}

fn encode_enum(symbol: &str, schema: &EnumSchema, sink: &mut Sink) -> AvroResult<()> {
    match schema.index_of(symbol) {
        Some(index) => {
            // symbols are indexed by an `int` on the wire
            sink.write_int(index as i32);
            Ok(())
        }
        None => {
            error!("Invalid symbol string {symbol:?}.");
            Err(Details::GetEnumSymbol(symbol.to_string()).into())
        }
    }
}

fn encode_union(value: &Value, union: &UnionSchema, sink: &mut Sink) -> AvroResult<()> {
    let Some((index, variant)) = union.find_branch(value) else {
        error!("no union variant of {:?} matches {value:?}", union.branch_names());
        return Err(Details::FindUnionVariant {
            value_kind: value.kind(),
            branches: union.branch_names(),
        }
        .into());
    };
    sink.write_long(index as i64);
    match value {
        Value::Tagged(_, inner) => encode_internal(inner, variant, sink),
        value => encode_internal(value, variant, sink),
    }
}

fn encode_array(items: &[Value], schema: &Schema, sink: &mut Sink) -> AvroResult<()> {
    let mut container = sink.begin_container();
    let result = items.iter().enumerate().try_for_each(|(index, item)| {
        sink.start_item(&mut container);
        encode_internal(item, schema, sink).map_err(|e| e.in_element(index))
    });
    sink.finish_container(&mut container);
    result
}

fn encode_map(entries: &BTreeMap<String, Value>, schema: &Schema, sink: &mut Sink) -> AvroResult<()> {
    let mut container = sink.begin_container();
    let result = entries.iter().try_for_each(|(key, value)| {
        sink.start_item(&mut container);
        sink.write_string(key);
        encode_internal(value, schema, sink).map_err(|e| e.in_entry(key))
    });
    sink.finish_container(&mut container);
    result
}

fn encode_record(
    value_fields: &[(String, Value)],
    schema: &RecordSchema,
    sink: &mut Sink,
) -> AvroResult<()> {
    if let Some((name, _)) = value_fields
        .iter()
        .find(|(name, _)| schema.field(name).is_none())
    {
        error!("Record {} has no field {name:?}", schema.name);
        return Err(Details::UnknownField(name.clone()).into());
    }

    for field in &schema.fields {
        let value = value_fields
            .iter()
            .find_map(|(name, value)| (*name == field.name).then_some(value))
            .ok_or_else(|| Details::GetField(field.name.clone()))?;
        encode_internal(value, &field.schema, sink).map_err(|e| e.in_field(&field.name))?;
    }
    Ok(())
}
