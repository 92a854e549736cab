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
    cursor::Cursor,
    error::Details,
    logical::decode_logical,
    schema::{ArraySchema, EnumSchema, MapSchema, RecordField, RecordSchema, Schema},
    types::Value,
    util::safe_len,
};
use log::trace;
use std::collections::{BTreeMap, btree_map::Entry};

/// Decode a `Value` encoded in Avro format given its `Schema`.
///
/// Bytes following the value are ignored.
pub fn decode(schema: &Schema, bytes: &[u8]) -> AvroResult<Value> {
    decode_internal(schema, &mut Cursor::new(bytes))
}

pub(crate) fn decode_internal(schema: &Schema, cursor: &mut Cursor) -> AvroResult<Value> {
    match schema {
        Schema::Null => Ok(Value::Null),
        Schema::Boolean => cursor.read_boolean().map(Value::Boolean),
        Schema::Int => cursor.read_int().map(Value::Int),
        Schema::Long => cursor.read_long().map(Value::Long),
        Schema::Float => cursor.read_float().map(Value::Float),
        Schema::Double => cursor.read_double().map(Value::Double),
        Schema::Bytes => cursor.read_bytes().map(|bytes| Value::Bytes(bytes.to_vec())),
        Schema::String => cursor.read_string().map(Value::String),
        Schema::Enum(enum_schema) => decode_enum(enum_schema, cursor),
        Schema::Array(array) => ArrayDecoder::new(array, cursor).finish().map(Value::Array),
        Schema::Map(map) => MapDecoder::new(map, cursor).finish().map(Value::Map),
        Schema::Record(record) => RecordDecoder::new(record, cursor)
            .finish()
            .map(|fields| Value::Record(record.name.fullname().to_string(), fields)),
        Schema::Union(union) => {
            let index = cursor.read_long()?;
            decode_internal(union.variant(index)?, cursor)
        }
        Schema::Logical(logical) => decode_logical(logical, cursor),
    }
}

fn decode_enum(schema: &EnumSchema, cursor: &mut Cursor) -> AvroResult<Value> {
    let index = cursor.read_int()?;
    usize::try_from(index)
        .ok()
        .and_then(|i| schema.symbols.get(i))
        .map(|symbol| Value::Enum(schema.name.fullname().to_string(), symbol.clone()))
        .ok_or_else(|| {
            Details::GetEnumValue {
                index: i64::from(index),
                nsymbols: schema.symbols.len(),
            }
            .into()
        })
}

/// Decodes the fields of a record one at a time, in the order of the schema.
pub struct RecordDecoder<'s, 'c, 'a> {
    schema: &'s RecordSchema,
    cursor: &'c mut Cursor<'a>,
    /// Position of the next field to decode
    next: usize,
}

impl<'s, 'c, 'a> RecordDecoder<'s, 'c, 'a> {
    pub fn new(schema: &'s RecordSchema, cursor: &'c mut Cursor<'a>) -> Self {
        Self {
            schema,
            cursor,
            next: 0,
        }
    }

    /// The schema field decoded by the next call to [`decode_field`](Self::decode_field).
    pub fn next_field(&self) -> Option<&'s RecordField> {
        self.schema.fields.get(self.next)
    }

    /// Checks that `name` is the next field and returns it.
    fn expect_next(&self, name: &str) -> AvroResult<&'s RecordField> {
        if self.schema.field(name).is_none() {
            return Err(Details::UnknownField(name.to_string()).into());
        }
        match self.next_field() {
            Some(field) if field.name == name => Ok(field),
            Some(field) => Err(Details::FieldOutOfOrder {
                expected: field.name.clone(),
                requested: name.to_string(),
            }
            .into()),
            None => Err(Details::RecordExhausted(name.to_string()).into()),
        }
    }

    /// Decodes the field called `name`, which must be the next field of the record.
    pub fn decode_field(&mut self, name: &str) -> AvroResult<Value> {
        let field = self.expect_next(name)?;
        let value = decode_internal(&field.schema, self.cursor).map_err(|e| e.in_field(name))?;
        self.next += 1;
        Ok(value)
    }

    /// Whether the field called `name`, which must be the next field of the record, holds
    /// `null`, without decoding it.
    pub fn is_null(&mut self, name: &str) -> AvroResult<bool> {
        let field = self.expect_next(name)?;
        match &field.schema {
            Schema::Null => Ok(true),
            Schema::Union(union) => {
                let position = self.cursor.position();
                let index = self.cursor.read_long();
                self.cursor.seek(position)?;
                let variant = union.variant(index?).map_err(|e| e.in_field(name))?;
                Ok(variant.is_null())
            }
            _ => Ok(false),
        }
    }

    /// Decodes the remaining fields.
    pub fn finish(mut self) -> AvroResult<Vec<(String, Value)>> {
        let mut fields = Vec::with_capacity(self.schema.fields.len() - self.next);
        while let Some(field) = self.next_field() {
            let value = self.decode_field(&field.name)?;
            fields.push((field.name.clone(), value));
        }
        Ok(fields)
    }
}

/// Block bookkeeping shared by arrays and maps.
#[derive(Debug, Default, Clone, Copy)]
struct BlockState {
    remaining_in_block: usize,
    consumed: usize,
    at_end: bool,
    /// Whether the items take no bytes on the wire
    zero_sized_items: bool,
}

impl BlockState {
    fn new(zero_sized_items: bool) -> Self {
        Self {
            zero_sized_items,
            ..Self::default()
        }
    }

    /// Reads block headers until an item is available or the end marker was read.
    fn has_next(&mut self, cursor: &mut Cursor) -> AvroResult<bool> {
        while self.remaining_in_block == 0 && !self.at_end {
            match cursor.read_block_header()? {
                0 => self.at_end = true,
                count => self.remaining_in_block = self.check_count(count, cursor)?,
            }
        }
        Ok(!self.at_end)
    }

    /// Bounds a block count read from the input.
    ///
    /// Items of at least one byte cannot outnumber the bytes left in the input. Zero-sized
    /// items are limited in total by the allocation limit.
    fn check_count(&self, count: usize, cursor: &Cursor) -> AvroResult<usize> {
        let count = safe_len(count)?;
        if self.zero_sized_items {
            safe_len(self.consumed.saturating_add(count))?;
        } else if count > cursor.remaining() {
            return Err(Details::EndOfData {
                needed: count,
                remaining: cursor.remaining(),
            }
            .into());
        }
        Ok(count)
    }

    fn advance(&mut self) {
        self.remaining_in_block -= 1;
        self.consumed += 1;
    }
}

/// Decodes the items of an array one at a time.
pub struct ArrayDecoder<'s, 'c, 'a> {
    items: &'s Schema,
    cursor: &'c mut Cursor<'a>,
    state: BlockState,
}

impl<'s, 'c, 'a> ArrayDecoder<'s, 'c, 'a> {
    pub fn new(schema: &'s ArraySchema, cursor: &'c mut Cursor<'a>) -> Self {
        Self {
            items: &schema.items,
            cursor,
            state: BlockState::new(schema.items.is_zero_sized()),
        }
    }

    /// The number of items decoded so far.
    pub fn consumed(&self) -> usize {
        self.state.consumed
    }

    /// Decodes the next item, or returns `None` after the last one.
    pub fn next_item(&mut self) -> AvroResult<Option<Value>> {
        if !self.state.has_next(self.cursor)? {
            return Ok(None);
        }
        let index = self.state.consumed;
        let item = decode_internal(self.items, self.cursor).map_err(|e| e.in_element(index))?;
        self.state.advance();
        Ok(Some(item))
    }

    /// Decodes the next item.
    ///
    /// # Errors
    /// Fails with [`Details::ContainerExhausted`] after the last item.
    pub fn decode_item(&mut self) -> AvroResult<Value> {
        self.next_item()?
            .ok_or_else(|| Details::ContainerExhausted.into())
    }

    /// Decodes the remaining items.
    pub fn finish(mut self) -> AvroResult<Vec<Value>> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item()? {
            items.push(item);
        }
        Ok(items)
    }
}

impl Iterator for ArrayDecoder<'_, '_, '_> {
    type Item = AvroResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_item().transpose()
    }
}

/// Decodes the entries of a map one at a time, in the order they were written.
pub struct MapDecoder<'s, 'c, 'a> {
    types: &'s Schema,
    cursor: &'c mut Cursor<'a>,
    state: BlockState,
    /// Keys found by [`keys`](Self::keys) and the number of entries consumed at that time
    keys: Option<(usize, Vec<String>)>,
}

impl<'s, 'c, 'a> MapDecoder<'s, 'c, 'a> {
    pub fn new(schema: &'s MapSchema, cursor: &'c mut Cursor<'a>) -> Self {
        Self {
            types: &schema.types,
            cursor,
            // every entry starts with its key
            state: BlockState::new(false),
            keys: None,
        }
    }

    /// The number of entries decoded so far.
    pub fn consumed(&self) -> usize {
        self.state.consumed
    }

    /// The keys of the entries that are not decoded yet, in wire order.
    ///
    /// The keys are found by scanning ahead on a copy of the cursor, so the values must be
    /// skippable (see [`Cursor::skip`]).
    pub fn keys(&mut self) -> AvroResult<&[String]> {
        if self.keys.is_none() {
            let mut scan = self.cursor.clone();
            let mut state = self.state;
            let mut keys = Vec::new();
            while state.has_next(&mut scan)? {
                keys.push(scan.read_string()?);
                scan.skip(self.types)?;
                state.advance();
            }
            trace!("Found {} map keys ahead of the cursor", keys.len());
            self.keys = Some((self.state.consumed, keys));
        }
        match &self.keys {
            Some((consumed_before, keys)) => Ok(&keys[self.state.consumed - consumed_before..]),
            None => Ok(&[]),
        }
    }

    /// Decodes the value of the next entry, whose key must be `key`.
    pub fn decode_value(&mut self, key: &str) -> AvroResult<Value> {
        if !self.state.has_next(self.cursor)? {
            return Err(Details::ContainerExhausted.into());
        }
        let mut peek = self.cursor.clone();
        let found = peek.read_string()?;
        if found != key {
            return Err(Details::MapKeyOutOfOrder {
                requested: key.to_string(),
                found,
            }
            .into());
        }
        *self.cursor = peek;
        let value = decode_internal(self.types, self.cursor).map_err(|e| e.in_entry(key))?;
        self.state.advance();
        Ok(value)
    }

    /// Decodes the next entry, or returns `None` after the last one.
    pub fn next_entry(&mut self) -> AvroResult<Option<(String, Value)>> {
        if !self.state.has_next(self.cursor)? {
            return Ok(None);
        }
        let key = self.cursor.read_string()?;
        let value = decode_internal(self.types, self.cursor).map_err(|e| e.in_entry(&key))?;
        self.state.advance();
        Ok(Some((key, value)))
    }

    /// Decodes the remaining entries.
    pub fn finish(mut self) -> AvroResult<BTreeMap<String, Value>> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = self.next_entry()? {
            match entries.entry(key) {
                Entry::Occupied(entry) => {
                    return Err(Details::MapKeyDuplicate(entry.key().clone()).into());
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
        }
        Ok(entries)
    }
}
