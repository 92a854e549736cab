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

//! Reading values piece by piece with the streaming decoders.

use avro_codec::{
    ArrayDecoder, Cursor, MapDecoder, RecordDecoder, Schema,
    error::{Details, Error},
    schema::{ArraySchema, MapSchema, RecordSchema},
    types::Value,
};
use hex_literal::hex;
use pretty_assertions::assert_eq;

type TestResult = anyhow::Result<()>;

const FRUIT_MAP: [u8; 25] =
    hex!("06 0a 61 70 70 6c 65 02 0c 62 61 6e 61 6e 61 04 0c 63 68 65 72 72 79 06 00");

fn map_of_ints() -> MapSchema {
    MapSchema {
        types: Box::new(Schema::Int),
    }
}

fn nullable_user() -> anyhow::Result<RecordSchema> {
    let schema = Schema::parse_str(
        r#"
        {
            "type": "record",
            "name": "NullableUser",
            "fields": [
                {"name": "id", "type": "int"},
                {"name": "optionalName", "type": ["null", "string"]},
                {"name": "optionalEmail", "type": ["null", "string"]}
            ]
        }
        "#,
    )?;
    match schema {
        Schema::Record(record) => Ok(record),
        other => anyhow::bail!("Expected a record schema, got {other:?}"),
    }
}

#[test]
fn map_keys_can_be_listed_without_moving_the_cursor() -> TestResult {
    let schema = map_of_ints();
    let mut cursor = Cursor::new(&FRUIT_MAP);
    let mut map = MapDecoder::new(&schema, &mut cursor);

    assert_eq!(map.keys()?, ["apple", "banana", "cherry"]);
    assert_eq!(map.decode_value("apple")?, Value::Int(1));
    assert_eq!(map.keys()?, ["banana", "cherry"]);
    assert_eq!(map.consumed(), 1);

    assert_eq!(
        map.next_entry()?,
        Some(("banana".to_string(), Value::Int(2)))
    );
    assert_eq!(map.decode_value("cherry")?, Value::Int(3));
    assert_eq!(map.next_entry()?, None);
    assert!(map.keys()?.is_empty());

    assert!(cursor.is_empty());
    Ok(())
}

#[test]
fn map_values_must_be_requested_in_wire_order() -> TestResult {
    let schema = map_of_ints();
    let mut cursor = Cursor::new(&FRUIT_MAP);
    let mut map = MapDecoder::new(&schema, &mut cursor);

    let err = map
        .decode_value("cherry")
        .map_err(Error::into_details)
        .unwrap_err();
    match err {
        Details::MapKeyOutOfOrder { requested, found } => {
            assert_eq!(requested, "cherry");
            assert_eq!(found, "apple");
        }
        other => panic!("Expected Details::MapKeyOutOfOrder, got {other:?}"),
    }

    // A rejected lookup does not consume the entry
    assert_eq!(map.decode_value("apple")?, Value::Int(1));
    assert_eq!(map.finish()?.len(), 2);
    Ok(())
}

#[test]
fn map_read_past_its_end() -> TestResult {
    let schema = map_of_ints();
    let mut cursor = Cursor::new(&[0x00]);
    let mut map = MapDecoder::new(&schema, &mut cursor);

    assert!(map.keys()?.is_empty());
    assert!(matches!(
        map.decode_value("apple").map_err(Error::into_details),
        Err(Details::ContainerExhausted)
    ));
    Ok(())
}

#[test]
fn array_items_one_at_a_time() -> TestResult {
    let schema = ArraySchema {
        items: Box::new(Schema::Int),
    };
    let bytes = hex!("06 02 04 06 00 2a");
    let mut cursor = Cursor::new(&bytes);
    let mut array = ArrayDecoder::new(&schema, &mut cursor);

    assert_eq!(array.decode_item()?, Value::Int(1));
    let rest = array.by_ref().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(rest, [Value::Int(2), Value::Int(3)]);
    assert_eq!(array.consumed(), 3);
    assert!(matches!(
        array.decode_item().map_err(Error::into_details),
        Err(Details::ContainerExhausted)
    ));

    // The value after the array is untouched
    assert_eq!(cursor.read_int()?, 21);
    Ok(())
}

#[test]
fn array_with_sized_blocks() -> TestResult {
    let schema = ArraySchema {
        items: Box::new(Schema::Long),
    };
    // A block of -2 items that is 2 bytes long, followed by a block of 1 item
    let bytes = hex!("03 04 02 04 02 06 00");
    let mut cursor = Cursor::new(&bytes);

    let items = ArrayDecoder::new(&schema, &mut cursor).finish()?;
    assert_eq!(items, [Value::Long(1), Value::Long(2), Value::Long(3)]);
    assert!(cursor.is_empty());
    Ok(())
}

#[test]
fn record_fields_in_order() -> TestResult {
    let schema = nullable_user()?;
    let bytes = hex!("02 02 10 4a 6f 68 6e 20 44 6f 65 00");
    let mut cursor = Cursor::new(&bytes);
    let mut record = RecordDecoder::new(&schema, &mut cursor);

    assert_eq!(record.next_field().map(|f| f.name.as_str()), Some("id"));
    assert!(!record.is_null("id")?);
    assert_eq!(record.decode_field("id")?, Value::Int(1));

    assert!(!record.is_null("optionalName")?);
    // Peeking twice gives the same answer
    assert!(!record.is_null("optionalName")?);
    assert_eq!(
        record.decode_field("optionalName")?,
        Value::String("John Doe".to_string())
    );

    assert!(record.is_null("optionalEmail")?);
    assert_eq!(record.finish()?, [("optionalEmail".to_string(), Value::Null)]);
    assert!(cursor.is_empty());
    Ok(())
}

#[test]
fn record_fields_out_of_order() -> TestResult {
    let schema = nullable_user()?;
    let bytes = hex!("02 02 10 4a 6f 68 6e 20 44 6f 65 00");
    let mut cursor = Cursor::new(&bytes);
    let mut record = RecordDecoder::new(&schema, &mut cursor);

    match record.decode_field("optionalName").map_err(Error::into_details) {
        Err(Details::FieldOutOfOrder {
            expected,
            requested,
        }) => {
            assert_eq!(expected, "id");
            assert_eq!(requested, "optionalName");
        }
        other => panic!("Expected Details::FieldOutOfOrder, got {other:?}"),
    }

    assert!(matches!(
        record.decode_field("nickname").map_err(Error::into_details),
        Err(Details::UnknownField(name)) if name == "nickname"
    ));

    // Nothing was consumed by the failed requests
    assert_eq!(record.decode_field("id")?, Value::Int(1));
    Ok(())
}

#[test]
fn record_with_bad_union_index() -> TestResult {
    let schema = nullable_user()?;
    let bytes = hex!("02 06");
    let mut cursor = Cursor::new(&bytes);
    let mut record = RecordDecoder::new(&schema, &mut cursor);

    record.decode_field("id")?;
    let err = record.is_null("optionalName").unwrap_err();
    assert_eq!(err.path(), Some("optionalName"));
    assert!(matches!(
        err.into_details(),
        Details::GetUnionVariant { index: 3, .. }
    ));
    Ok(())
}
