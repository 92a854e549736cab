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

//! Conversions between the domain values of logical types and their wire representation.

use crate::{
    AvroResult,
    cursor::Cursor,
    decimal::{decode_decimal, encode_decimal},
    error::Details,
    schema::{LogicalKind, LogicalSchema},
    sink::Sink,
    types::Value,
};
use log::error;
use uuid::Uuid;

const SECONDS_PER_DAY: i64 = 86_400;

/// Writes `value` as the underlying type of `schema`.
pub(crate) fn encode_logical(
    value: &Value,
    schema: &LogicalSchema,
    sink: &mut Sink,
) -> AvroResult<()> {
    let kind = schema.kind();
    match (kind, value) {
        (LogicalKind::Date, &Value::Date(secs)) => {
            let days = secs.div_euclid(SECONDS_PER_DAY);
            let days = i32::try_from(days).map_err(|_| Details::DateOutOfRange(secs))?;
            sink.write_int(days);
        }
        (LogicalKind::TimeMillis, &Value::Int(millis)) => sink.write_int(millis),
        (LogicalKind::TimeMillis, &Value::Long(millis)) => {
            let millis = i32::try_from(millis).map_err(|_| Details::IntegerOutOfRange(millis))?;
            sink.write_int(millis);
        }
        (LogicalKind::TimeMicros, &Value::Long(micros)) => sink.write_long(micros),
        (LogicalKind::TimeMicros, &Value::Int(micros)) => sink.write_long(i64::from(micros)),
        (LogicalKind::TimestampMillis | LogicalKind::TimestampMicros, Value::Long(_)) => {
            return Err(Details::LogicalTypeNotImplemented(kind.type_name()).into());
        }
        (LogicalKind::Uuid, Value::Uuid(uuid)) => {
            let mut buffer = Uuid::encode_buffer();
            sink.write_string(uuid.hyphenated().encode_upper(&mut buffer));
        }
        (LogicalKind::Uuid, Value::String(s)) => {
            Uuid::parse_str(s).map_err(Details::ConvertStrToUuid)?;
            sink.write_string(s);
        }
        (LogicalKind::Decimal { scale, precision }, Value::Decimal(decimal)) => {
            sink.write_bytes(&encode_decimal(decimal, precision, scale)?);
        }
        _ => {
            error!("invalid value for logical type {}: {value:?}", kind.type_name());
            return Err(Details::EncodeValueAsLogical {
                value_kind: value.kind(),
                logical: kind.type_name(),
            }
            .into());
        }
    }
    Ok(())
}

/// Reads the underlying type of `schema` and converts it to its domain value.
pub(crate) fn decode_logical(schema: &LogicalSchema, cursor: &mut Cursor) -> AvroResult<Value> {
    match schema.kind() {
        LogicalKind::Date => {
            let days = cursor.read_int()?;
            Ok(Value::Date(i64::from(days) * SECONDS_PER_DAY))
        }
        LogicalKind::TimeMillis => cursor.read_int().map(Value::Int),
        LogicalKind::TimeMicros => cursor.read_long().map(Value::Long),
        kind @ (LogicalKind::TimestampMillis | LogicalKind::TimestampMicros) => {
            Err(Details::LogicalTypeNotImplemented(kind.type_name()).into())
        }
        LogicalKind::Uuid => {
            let text = cursor.read_string()?;
            Uuid::parse_str(&text)
                .map(Value::Uuid)
                .map_err(|e| Details::ConvertStrToUuid(e).into())
        }
        LogicalKind::Decimal { scale, precision } => {
            let bytes = cursor.read_bytes()?;
            decode_decimal(bytes, precision, scale).map(Value::Decimal)
        }
    }
}
