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
use crate::schema::{Schema, SchemaKind};
use crate::types::Value;
use std::collections::HashSet;

/// A description of a Union schema
#[derive(Debug, Clone)]
pub struct UnionSchema {
    /// The schemas that make up this union
    pub(crate) schemas: Vec<Schema>,
    /// Position of the `null` variant, if any
    null_index: Option<usize>,
}

impl UnionSchema {
    /// Creates a new UnionSchema from a vector of schemas.
    ///
    /// # Errors
    /// Will return an error if `schemas` has two variants that cannot be told apart (two unnamed
    /// schemas of the same type or two named schemas with the same fullname) or if `schemas`
    /// contains a union.
    pub fn new(schemas: Vec<Schema>) -> AvroResult<Self> {
        let mut seen = HashSet::with_capacity(schemas.len());
        let mut null_index = None;
        for (i, schema) in schemas.iter().enumerate() {
            if let Schema::Union(_) = schema {
                return Err(Details::GetNestedUnion.into());
            }
            if let Schema::Null = schema {
                if null_index.is_some() {
                    return Err(Details::GetUnionDuplicateNull.into());
                }
                null_index = Some(i);
            }
            if !seen.insert(schema.type_name()) {
                return Err(match schema.name() {
                    Some(name) => Details::GetUnionDuplicateName(name.fullname().to_string()),
                    None => Details::GetUnionDuplicate(SchemaKind::from(schema)),
                }
                .into());
            }
        }
        Ok(UnionSchema {
            schemas,
            null_index,
        })
    }

    /// Returns a slice to all variants of this schema.
    pub fn variants(&self) -> &[Schema] {
        &self.schemas
    }

    /// Returns true if the any of the variants of this `UnionSchema` is `Null`.
    pub fn is_nullable(&self) -> bool {
        self.null_index.is_some()
    }

    /// Returns the position of the `Null` variant, if any.
    pub fn null_index(&self) -> Option<usize> {
        self.null_index
    }

    /// Returns the variant selected by a decoded union index.
    ///
    /// # Errors
    /// Will return an error if `index` is negative or not smaller than the number of variants.
    pub fn variant(&self, index: i64) -> AvroResult<&Schema> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.schemas.get(i))
            .ok_or_else(|| {
                Details::GetUnionVariant {
                    index,
                    num_variants: self.schemas.len(),
                }
                .into()
            })
    }

    /// Finds the variant a value should be encoded with, as well as its position within this
    /// union.
    ///
    /// The first compatible variant in declaration order wins:
    /// - scalar values need a variant of exactly their own kind,
    /// - arrays and maps match any array or map variant,
    /// - records and enums match a variant with the same (full)name,
    /// - values of logical types match according to [`LogicalKind::accepts`](crate::schema::LogicalKind::accepts),
    /// - a [`Value::Tagged`] matches the variant with the given type name.
    pub fn find_branch(&self, value: &Value) -> Option<(usize, &Schema)> {
        self.schemas
            .iter()
            .enumerate()
            .find(|(_, schema)| is_compatible(value, schema))
    }

    /// The type names of all variants, used in error messages.
    pub(crate) fn branch_names(&self) -> Vec<String> {
        self.schemas
            .iter()
            .map(|schema| schema.type_name().into_owned())
            .collect()
    }
}

fn is_compatible(value: &Value, schema: &Schema) -> bool {
    match (value, schema) {
        (Value::Tagged(tag, _), schema) => match schema.name() {
            Some(name) => name.matches(tag),
            None => schema.type_name() == tag.as_str(),
        },
        (Value::Null, Schema::Null)
        | (Value::Boolean(_), Schema::Boolean)
        | (Value::Int(_), Schema::Int)
        | (Value::Long(_), Schema::Long)
        | (Value::Float(_), Schema::Float)
        | (Value::Double(_), Schema::Double)
        | (Value::Bytes(_), Schema::Bytes)
        | (Value::String(_), Schema::String)
        | (Value::Array(_), Schema::Array(_))
        | (Value::Map(_), Schema::Map(_)) => true,
        (Value::Record(name, _), Schema::Record(record)) => record.name.matches(name),
        (Value::Enum(name, _), Schema::Enum(enum_schema)) => enum_schema.name.matches(name),
        (value, Schema::Logical(logical)) => logical.kind.accepts(value),
        _ => false,
    }
}

// No need to compare null_index, it is derivative of schemas.
impl PartialEq for UnionSchema {
    fn eq(&self, other: &UnionSchema) -> bool {
        self.schemas.eq(&other.schemas)
    }
}
