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

use crate::AvroResult;
use crate::error::Details;
use crate::schema::{Documentation, Parser, Schema};
use crate::util::MapHelper;
use crate::validator::validate_record_field_name;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::str::FromStr;
use strum_macros::{EnumString, IntoStaticStr};

/// Represents a `field` in a `record` Avro schema.
#[derive(bon::Builder, Clone, Debug, PartialEq)]
pub struct RecordField {
    /// Name of the field.
    #[builder(into)]
    pub name: String,
    /// Documentation of the field.
    #[builder(default)]
    pub doc: Documentation,
    /// Aliases of the field's name. They have no namespace.
    pub aliases: Option<Vec<String>>,
    /// Schema of the field.
    pub schema: Schema,
    /// Order of the field.
    ///
    /// **NOTE** This is only stored and rendered, it has no effect on encoding.
    #[builder(default = RecordFieldOrder::Ignore)]
    pub order: RecordFieldOrder,
    /// Position of the field in the list of `field` of its parent `Schema`
    #[builder(default)]
    pub position: usize,
}

/// Represents any valid order for a `field` in a `record` Avro schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab_case")]
pub enum RecordFieldOrder {
    Ascending,
    Descending,
    Ignore,
}

impl RecordField {
    /// Parse a `serde_json::Value` into a `RecordField`.
    pub(crate) fn parse(
        field: &Map<String, Value>,
        position: usize,
        parser: &mut Parser,
        enclosing_namespace: Option<&str>,
    ) -> AvroResult<Self> {
        let name = field.name().ok_or(Details::GetNameField)?;

        validate_record_field_name(&name)?;

        let schema = match field.get("type") {
            Some(Value::Object(complex)) => parser.parse_complex(complex, enclosing_namespace)?,
            Some(value) => parser.parse(value, enclosing_namespace)?,
            None => return Err(Details::GetComplexTypeField.into()),
        };

        let order = field
            .get("order")
            .and_then(|order| order.as_str())
            .and_then(|order| RecordFieldOrder::from_str(order).ok())
            .unwrap_or(RecordFieldOrder::Ignore);

        Ok(RecordField {
            name,
            doc: field.doc(),
            aliases: field.aliases(),
            schema,
            order,
            position,
        })
    }

    /// Returns true if this `RecordField` is nullable, meaning the schema is a `UnionSchema`
    /// with a `Null` variant.
    pub fn is_nullable(&self) -> bool {
        match self.schema {
            Schema::Union(ref inner) => inner.is_nullable(),
            _ => false,
        }
    }
}

impl Serialize for RecordField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;

        if let Some(ref doc) = self.doc {
            map.serialize_entry("doc", doc)?;
        }

        map.serialize_entry("type", &self.schema)?;

        if self.order != RecordFieldOrder::Ignore {
            let order: &'static str = self.order.into();
            map.serialize_entry("order", order)?;
        }

        if let Some(ref aliases) = self.aliases {
            map.serialize_entry("aliases", aliases)?;
        }

        map.end()
    }
}
