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

use crate::schema::{
    ArraySchema, EnumSchema, LogicalKind, LogicalSchema, MapSchema, Name, RecordField,
    RecordSchema, UnionSchema,
};
use crate::{AvroResult, Schema};
use bon::bon;

#[bon]
impl Schema {
    /// Returns a `Schema::Map` with the given value type.
    #[builder(finish_fn = build)]
    pub fn map(#[builder(start_fn)] types: Schema) -> Self {
        Schema::Map(MapSchema {
            types: Box::new(types),
        })
    }

    /// Returns a `Schema::Array` with the given items.
    #[builder(finish_fn = build)]
    pub fn array(#[builder(start_fn)] items: Schema) -> Self {
        Schema::Array(ArraySchema {
            items: Box::new(items),
        })
    }

    /// Returns a `Schema::Enum` with the given name, symbols and optional
    /// aliases, doc and default.
    ///
    /// The symbols are not validated, use [`Schema::parse`] for untrusted input.
    #[builder(finish_fn = build)]
    pub fn r#enum(
        #[builder(start_fn)] name: Name,
        #[builder(start_fn)] symbols: Vec<impl Into<String>>,
        aliases: Option<Vec<String>>,
        doc: Option<String>,
        default: Option<String>,
    ) -> Self {
        let symbols = symbols.into_iter().map(Into::into).collect();
        Schema::Enum(EnumSchema {
            name,
            symbols,
            aliases,
            doc,
            default,
        })
    }

    /// Returns a `Schema::Record` with the given name and optional fields,
    /// aliases and doc.
    ///
    /// The `position` of each field is set to its index in `fields`.
    #[builder(finish_fn = build)]
    pub fn record(
        #[builder(start_fn)] name: Name,
        #[builder(default)] fields: Vec<RecordField>,
        aliases: Option<Vec<String>>,
        doc: Option<String>,
    ) -> Self {
        let fields = fields
            .into_iter()
            .enumerate()
            .map(|(position, field)| RecordField { position, ..field })
            .collect();
        let record_schema = RecordSchema::builder()
            .name(name)
            .fields(fields)
            .aliases(aliases)
            .doc(doc)
            .build();
        Schema::Record(record_schema)
    }

    /// Returns a [`Schema::Union`] with the given variants.
    ///
    /// # Errors
    /// Will return an error if `schemas` has duplicate unnamed schemas or if `schemas`
    /// contains a union.
    pub fn union(schemas: Vec<Schema>) -> AvroResult<Schema> {
        UnionSchema::new(schemas).map(Schema::Union)
    }

    /// Returns a [`Schema::Logical`] refining `underlying`.
    ///
    /// # Errors
    /// Will return an error if `underlying` is not the wire type `kind` requires.
    pub fn logical(kind: LogicalKind, underlying: Schema) -> AvroResult<Schema> {
        LogicalSchema::new(kind, underlying).map(Schema::Logical)
    }
}
