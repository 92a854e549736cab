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
    schema::SchemaKind,
    types::{Value, ValueKind},
};
use std::{error::Error as _, fmt};

/// Errors encountered while building schemas or encoding and decoding Avro data.
///
/// To inspect the details of the error use [`details`](Self::details) or [`into_details`](Self::into_details)
/// to get a [`Details`] which contains more precise error information.
///
/// See [`Details`] for all possible errors.
#[derive(thiserror::Error, Debug)]
#[repr(transparent)]
#[error(transparent)]
pub struct Error {
    details: Box<Details>,
}

impl Error {
    pub fn new(details: Details) -> Self {
        Self {
            details: Box::new(details),
        }
    }

    /// The details of the error, looking through any location the error was wrapped with.
    pub fn details(&self) -> &Details {
        match self.details.as_ref() {
            Details::InPath { source, .. } => source.details(),
            details => details,
        }
    }

    pub fn into_details(self) -> Details {
        match *self.details {
            Details::InPath { source, .. } => source.into_details(),
            details => details,
        }
    }

    /// The location inside the value where the error happened, e.g. `address.zip` or `tags[2]`.
    ///
    /// Returns `None` when the error was raised at the top level.
    pub fn path(&self) -> Option<&str> {
        match self.details.as_ref() {
            Details::InPath { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Prefixes the location of this error with a record field name.
    pub(crate) fn in_field(self, field: &str) -> Self {
        self.prefix_path(field)
    }

    /// Prefixes the location of this error with an array index.
    pub(crate) fn in_element(self, index: usize) -> Self {
        self.prefix_path(&format!("[{index}]"))
    }

    /// Prefixes the location of this error with a map key.
    pub(crate) fn in_entry(self, key: &str) -> Self {
        self.prefix_path(&format!("[{key}]"))
    }

    fn prefix_path(self, segment: &str) -> Self {
        match *self.details {
            Details::InPath { path, source } => {
                let path = if path.starts_with('[') {
                    format!("{segment}{path}")
                } else {
                    format!("{segment}.{path}")
                };
                Details::InPath { path, source }.into()
            }
            details => Details::InPath {
                path: segment.to_string(),
                source: Error::new(details),
            }
            .into(),
        }
    }
}

impl From<Details> for Error {
    fn from(details: Details) -> Self {
        Self::new(details)
    }
}

#[derive(thiserror::Error)]
pub enum Details {
    #[error("Error at `{path}`: {source}")]
    InPath {
        path: String,
        #[source]
        source: Error,
    },

    #[error("Unexpected end of data: needed {needed} bytes but only {remaining} remain")]
    EndOfData { needed: usize, remaining: usize },

    #[error("Negative length: {0}")]
    NegativeLength(i64),

    #[error("Unable to allocate {desired} bytes (maximum allowed: {maximum})")]
    MemoryAllocation { desired: usize, maximum: usize },

    #[error("Integer overflow when decoding a variable-length integer")]
    IntegerOverflow,

    #[error("Failed to convert i64 to i32: {1}")]
    ZagI32(#[source] std::num::TryFromIntError, i64),

    #[error("Failed to convert u64 to usize: {1}")]
    ConvertU64ToUsize(#[source] std::num::TryFromIntError, u64),

    #[error("Invalid utf-8 string")]
    ConvertToUtf8(#[source] std::string::FromUtf8Error),

    #[error("Failed to convert &str to UUID: {0}")]
    ConvertStrToUuid(#[source] uuid::Error),

    #[error("Union index {index} out of bounds: {num_variants}")]
    GetUnionVariant { index: i64, num_variants: usize },

    #[error("Could not find a matching union branch for a value of kind {value_kind:?} in {branches:?}")]
    FindUnionVariant {
        value_kind: ValueKind,
        branches: Vec<String>,
    },

    #[error("Enum symbol index out of bounds: {index} (number of symbols: {nsymbols})")]
    GetEnumValue { index: i64, nsymbols: usize },

    #[error("Enum symbol not found {0}")]
    GetEnumSymbol(String),

    #[error("Field `{0}` is missing from the record value")]
    GetField(String),

    #[error("Field `{0}` is not declared by the record schema")]
    UnknownField(String),

    #[error("Record fields must be read in schema order: expected `{expected}`, requested `{requested}`")]
    FieldOutOfOrder { expected: String, requested: String },

    #[error("Record has no field left to read, requested `{0}`")]
    RecordExhausted(String),

    #[error(
        "Requested map key `{requested}` does not match the next map entry `{found}`. Out-of-order decoding is not supported"
    )]
    MapKeyOutOfOrder { requested: String, found: String },

    #[error("Map key {0:?} appears more than once")]
    MapKeyDuplicate(String),

    #[error("Tried to read an item from a container that has already reached its end")]
    ContainerExhausted,

    #[error("Integer {0} does not fit into the `int` schema")]
    IntegerOutOfRange(i64),

    #[error("Date {0} (seconds since the epoch) is out of range for the `date` logical type")]
    DateOutOfRange(i64),

    #[error("Decimal {value} does not fit precision {precision} and scale {scale}")]
    DecimalDoesNotFit {
        value: bigdecimal::BigDecimal,
        precision: usize,
        scale: usize,
    },

    #[error("Skipping a union is not implemented")]
    SkipUnion,

    #[error("The `{0}` logical type is not implemented")]
    LogicalTypeNotImplemented(&'static str),

    #[error("Value {value:?} cannot be encoded with schema {schema:?}")]
    EncodeValueWithSchema { value: Value, schema: SchemaKind },

    #[error("Value of kind {value_kind:?} can only be encoded as {supported_schema:?}")]
    EncodeValueAsSchemaError {
        value_kind: ValueKind,
        supported_schema: Vec<SchemaKind>,
    },

    #[error("Value of kind {value_kind:?} cannot be encoded as the `{logical}` logical type")]
    EncodeValueAsLogical {
        value_kind: ValueKind,
        logical: &'static str,
    },

    #[error("Unions may not directly contain a union")]
    GetNestedUnion,

    #[error("Unions cannot contain duplicate types, found at least two {0:?}")]
    GetUnionDuplicate(SchemaKind),

    #[error("Unions cannot contain more than one `null`")]
    GetUnionDuplicateNull,

    #[error("Unions cannot contain two named types called `{0}`")]
    GetUnionDuplicateName(String),

    #[error("The `{logical}` logical type requires a `{expected:?}` underlying schema, got {found:?}")]
    InvalidLogicalUnderlying {
        logical: &'static str,
        expected: SchemaKind,
        found: SchemaKind,
    },

    #[error("Decimal precision {precision} is less than scale {scale}")]
    DecimalPrecisionLessThanScale { precision: usize, scale: usize },

    #[error("The decimal precision ({precision}) must be a positive number")]
    DecimalPrecisionMustBePositive { precision: usize },

    #[error("Invalid JSON value for decimal precision/scale integer: {0}")]
    GetPrecisionOrScaleFromJson(serde_json::Number),

    #[error("Invalid JSON value for decimal `{key}`: {value}")]
    GetDecimalMetadataValueFromJson {
        key: String,
        value: serde_json::Value,
    },

    #[error("The decimal logical type requires a `{0}` attribute")]
    GetDecimalMetadataFromJson(&'static str),

    #[error("Enum symbols must be unique, found `{0}` twice")]
    EnumSymbolDuplicate(String),

    #[error("Invalid enum symbol name {0}")]
    EnumSymbolName(String),

    #[error("Enum default `{symbol}` is not among the symbols {symbols:?}")]
    GetEnumDefault {
        symbol: String,
        symbols: Vec<String>,
    },

    #[error("Invalid field name {0}")]
    FieldName(String),

    #[error("Duplicate field name {0}")]
    FieldNameDuplicate(String),

    #[error("Invalid schema name {0}. It must match the regex '{1}'")]
    InvalidSchemaName(String, &'static str),

    #[error("Invalid namespace {0}. It must match the regex '{1}'")]
    InvalidNamespace(String, &'static str),

    #[error("Failed to parse schema from JSON: {0}")]
    ParseSchemaJson(#[source] serde_json::Error),

    #[error("Must be a JSON string, object or array")]
    ParseSchemaFromValidJson,

    #[error("Unknown primitive type: {0}")]
    ParsePrimitive(String),

    #[error("No `type` in complex type")]
    GetComplexTypeField,

    #[error("Unknown complex type: {0}")]
    GetComplexType(serde_json::Value),

    #[error("`logicalType` must be a string, but is {0:?}")]
    GetLogicalTypeFieldType(serde_json::Value),

    #[error("No `name` field")]
    GetNameField,

    #[error("No `fields` in record")]
    GetRecordFieldsJson,

    #[error("No `items` in array")]
    GetArrayItemsField,

    #[error("No `values` in map")]
    GetMapValuesField,

    #[error("No `symbols` field in enum")]
    GetEnumSymbolsField,

    #[error("Unable to parse `symbols` in enum")]
    GetEnumSymbols,

    #[error("Enum default should be a string, got: {0}")]
    EnumDefaultWrongType(serde_json::Value),

    #[error("Fixed schemas are not supported")]
    FixedNotSupported,

    #[error("Failed to serialize the schema to JSON: {0}")]
    SerializeSchema(#[source] serde_json::Error),
}

impl fmt::Debug for Details {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut msg = self.to_string();
        if let Some(e) = self.source() {
            msg.extend([": ", &e.to_string()]);
        }
        write!(f, "{msg}")
    }
}
