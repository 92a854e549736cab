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

//! **[Apache Avro](https://avro.apache.org/)** binary encoding, driven by a schema.
//!
//! This crate converts between the generic [`Value`](types::Value) tree and the compact Avro
//! binary representation. A [`Schema`] is parsed from its JSON form or assembled with the
//! builders, and is then shared read-only by every call to [`encode`] and [`decode`].
//!
//! ```
//! # use avro_codec::{Schema, decode, encode, types::Value};
//! let schema = Schema::parse_str(r#"
//!     {
//!         "type": "record",
//!         "name": "Person",
//!         "fields": [
//!             {"name": "id", "type": "int"},
//!             {"name": "name", "type": "string"}
//!         ]
//!     }
//! "#)?;
//! let value = Value::record("Person", [("id", Value::from(42)), ("name", Value::from("Ada"))]);
//!
//! let bytes = encode(&schema, &value)?;
//! assert_eq!(bytes, [0x54, 0x06, b'A', b'd', b'a']);
//! assert_eq!(decode(&schema, &bytes)?, value);
//! # Ok::<(), avro_codec::Error>(())
//! ```
//!
//! Values can also be read field by field with the streaming decoders ([`RecordDecoder`],
//! [`ArrayDecoder`] and [`MapDecoder`]) on top of a [`Cursor`], and written piece by piece with
//! a [`Sink`].
//!
//! Object container files, codecs, schema resolution and the `fixed` and `duration` types are
//! not supported.
//!
//! # MSRV
//!
//! The current MSRV is 1.85.0.

mod decimal;
mod decode;
mod encode;
mod logical;

pub mod cursor;
pub mod error;
pub mod schema;
pub mod schema_component;
pub mod sink;
pub mod types;
pub mod util;
pub mod validator;

pub use bigdecimal::BigDecimal;
pub use cursor::Cursor;
pub use decode::{ArrayDecoder, MapDecoder, RecordDecoder, decode};
pub use encode::{encode, encode_into};
pub use error::{Details, Error};
pub use schema::Schema;
pub use schema_component::AvroSchema;
pub use sink::{Container, Sink};
pub use uuid::Uuid;

/// A convenience type alias for `Result`s with `Error`s.
pub type AvroResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use crate::{Schema, decode, encode, types::Value};
    use pretty_assertions::assert_eq;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn test_enum_with_default_round_trips() -> TestResult {
        let schema = Schema::parse_str(
            r#"
            {
                "type": "record",
                "name": "Ticket",
                "fields": [
                    {
                        "name": "state",
                        "type": {
                            "type": "enum",
                            "name": "State",
                            "symbols": ["OPEN", "CLOSED"],
                            "default": "OPEN"
                        }
                    }
                ]
            }
            "#,
        )?;
        let value = Value::record(
            "Ticket",
            [("state", Value::Enum("State".into(), "CLOSED".into()))],
        );

        let bytes = encode(&schema, &value)?;
        assert_eq!(bytes, [0x02]);
        assert_eq!(decode(&schema, &bytes)?, value);
        Ok(())
    }

    #[test]
    fn test_schema_shared_across_calls() -> TestResult {
        let schema = Schema::array(Schema::Long).build();
        let first = encode(&schema, &Value::Array(vec![1i64.into()]))?;
        let second = encode(&schema, &Value::Array(vec![]))?;

        assert_eq!(first, [0x02, 0x02, 0x00]);
        assert_eq!(second, [0x00]);
        Ok(())
    }
}
