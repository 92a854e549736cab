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
    schema::{Schema, SchemaKind},
    types::Value,
};

type DecimalMetadata = usize;
pub(crate) type Precision = DecimalMetadata;
pub(crate) type Scale = DecimalMetadata;

/// The semantic refinements of a primitive wire type supported by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalKind {
    /// The number of days since the unix epoch, stored as an `int`.
    Date,
    /// The time of day in milliseconds after midnight, stored as an `int`.
    TimeMillis,
    /// An instant in milliseconds after the unix epoch, stored as a `long`.
    TimestampMillis,
    /// The time of day in microseconds after midnight, stored as a `long`.
    TimeMicros,
    /// An instant in microseconds after the unix epoch, stored as a `long`.
    TimestampMicros,
    /// A universally unique identifier in its canonical string form.
    Uuid,
    /// An arbitrary-precision decimal stored as the two's-complement unscaled value.
    ///
    /// `scale` is an integer greater than or equal to 0 and `precision` is an
    /// integer greater than 0 and not less than `scale`.
    Decimal { scale: Scale, precision: Precision },
}

impl LogicalKind {
    /// The value of the `logicalType` JSON attribute.
    pub fn type_name(&self) -> &'static str {
        match self {
            LogicalKind::Date => "date",
            LogicalKind::TimeMillis => "time-millis",
            LogicalKind::TimestampMillis => "timestamp-millis",
            LogicalKind::TimeMicros => "time-micros",
            LogicalKind::TimestampMicros => "timestamp-micros",
            LogicalKind::Uuid => "uuid",
            LogicalKind::Decimal { .. } => "decimal",
        }
    }

    /// The wire type this kind annotates.
    pub fn underlying_kind(&self) -> SchemaKind {
        match self {
            LogicalKind::Date | LogicalKind::TimeMillis => SchemaKind::Int,
            LogicalKind::TimestampMillis
            | LogicalKind::TimeMicros
            | LogicalKind::TimestampMicros => SchemaKind::Long,
            LogicalKind::Uuid => SchemaKind::String,
            LogicalKind::Decimal { .. } => SchemaKind::Bytes,
        }
    }

    /// Whether a value may be encoded with this logical type.
    ///
    /// Time types also accept the integer variant of the other width, the conversion is
    /// checked when encoding.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (LogicalKind::Date, Value::Date(_))
                | (
                    LogicalKind::TimeMillis | LogicalKind::TimeMicros,
                    Value::Int(_) | Value::Long(_)
                )
                | (
                    LogicalKind::TimestampMillis | LogicalKind::TimestampMicros,
                    Value::Long(_)
                )
                | (LogicalKind::Uuid, Value::Uuid(_) | Value::String(_))
                | (LogicalKind::Decimal { .. }, Value::Decimal(_))
        )
    }
}

/// A logical type annotating an underlying schema.
#[derive(Clone, Debug, PartialEq)]
pub struct LogicalSchema {
    pub(crate) kind: LogicalKind,
    pub(crate) underlying: Box<Schema>,
}

impl LogicalSchema {
    /// Creates a new logical schema.
    ///
    /// # Errors
    /// Will return an error if `underlying` is not the wire type required by `kind`, or if a
    /// decimal has a precision of zero or smaller than its scale.
    pub fn new(kind: LogicalKind, underlying: Schema) -> AvroResult<Self> {
        let found = SchemaKind::from(&underlying);
        let expected = kind.underlying_kind();
        if found != expected {
            return Err(Details::InvalidLogicalUnderlying {
                logical: kind.type_name(),
                expected,
                found,
            }
            .into());
        }
        if let LogicalKind::Decimal { scale, precision } = kind {
            if precision < 1 {
                return Err(Details::DecimalPrecisionMustBePositive { precision }.into());
            }
            if precision < scale {
                return Err(Details::DecimalPrecisionLessThanScale { precision, scale }.into());
            }
        }
        Ok(Self {
            kind,
            underlying: Box::new(underlying),
        })
    }

    pub fn kind(&self) -> LogicalKind {
        self.kind
    }

    pub fn underlying(&self) -> &Schema {
        &self.underlying
    }
}
