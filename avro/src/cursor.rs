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

//! Reading the Avro binary encoding from a byte slice.

use crate::{
    AvroResult,
    error::Details,
    schema::{ArraySchema, MapSchema, RecordSchema, Schema},
    util::{safe_len, zag_i64},
};

/// A read position inside a borrowed buffer of Avro binary data.
///
/// Cloning a cursor is cheap, a clone can scan ahead without moving the original.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Moves the cursor to an absolute offset.
    ///
    /// # Errors
    /// Will return an error if `position` is past the end of the data.
    pub fn seek(&mut self, position: usize) -> AvroResult<()> {
        if position > self.data.len() {
            return Err(Details::EndOfData {
                needed: position - self.position,
                remaining: self.remaining(),
            }
            .into());
        }
        self.position = position;
        Ok(())
    }

    /// Returns the next `len` bytes and moves past them.
    fn take(&mut self, len: usize) -> AvroResult<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Details::EndOfData {
                needed: len,
                remaining,
            }
            .into());
        }
        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> AvroResult<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn read_variable(&mut self) -> AvroResult<u64> {
        let mut i = 0u64;

        let mut j = 0;
        loop {
            if j > 9 {
                // if j * 7 > 64
                return Err(Details::IntegerOverflow.into());
            }
            let [byte] = self.take_array::<1>()?;
            i |= (u64::from(byte & 0x7F)) << (j * 7);
            if (byte >> 7) == 0 {
                break;
            } else {
                j += 1;
            }
        }

        Ok(i)
    }

    /// Reads a boolean, any byte other than zero is `true`.
    pub fn read_boolean(&mut self) -> AvroResult<bool> {
        let [byte] = self.take_array::<1>()?;
        Ok(byte != 0)
    }

    pub fn read_int(&mut self) -> AvroResult<i32> {
        let n = self.read_long()?;
        i32::try_from(n).map_err(|e| Details::ZagI32(e, n).into())
    }

    pub fn read_long(&mut self) -> AvroResult<i64> {
        self.read_variable().map(zag_i64)
    }

    pub fn read_float(&mut self) -> AvroResult<f32> {
        self.take_array().map(f32::from_le_bytes)
    }

    pub fn read_double(&mut self) -> AvroResult<f64> {
        self.take_array().map(f64::from_le_bytes)
    }

    fn read_len(&mut self) -> AvroResult<usize> {
        let len = self.read_long()?;
        if len < 0 {
            return Err(Details::NegativeLength(len).into());
        }
        let len = len.unsigned_abs();
        let len = usize::try_from(len).map_err(|e| Details::ConvertU64ToUsize(e, len))?;
        safe_len(len)
    }

    /// Reads a length prefixed sequence of bytes, borrowing it from the underlying buffer.
    pub fn read_bytes(&mut self) -> AvroResult<&'a [u8]> {
        let len = self.read_len()?;
        self.take(len)
    }

    pub fn read_string(&mut self) -> AvroResult<String> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Details::ConvertToUtf8(e).into())
    }

    /// Reads the item count of the next block of an array or a map.
    ///
    /// Zero marks the end of the sequence. The byte size that follows a negative count is
    /// read and discarded.
    pub fn read_block_header(&mut self) -> AvroResult<usize> {
        self.read_block_header_with_size().map(|(count, _)| count)
    }

    fn read_block_header_with_size(&mut self) -> AvroResult<(usize, Option<usize>)> {
        let count = self.read_long()?;
        let size = if count < 0 {
            Some(self.read_len()?)
        } else {
            None
        };
        let count = count.unsigned_abs();
        let count = usize::try_from(count).map_err(|e| Details::ConvertU64ToUsize(e, count))?;
        Ok((count, size))
    }

    /// Moves past all the remaining blocks of an array or a map.
    ///
    /// Blocks that announce their byte size are jumped over, the items of the others are
    /// skipped one by one with `skip_item`. Zero-sized items need no skipping at all.
    fn skip_blocks<F>(&mut self, zero_sized_items: bool, mut skip_item: F) -> AvroResult<()>
    where
        F: FnMut(&mut Self) -> AvroResult<()>,
    {
        loop {
            match self.read_block_header_with_size()? {
                (0, _) => return Ok(()),
                (_, Some(size)) => {
                    self.take(size)?;
                }
                (_, None) if zero_sized_items => {}
                (count, None) => {
                    for _ in 0..count {
                        skip_item(self)?;
                    }
                }
            }
        }
    }

    /// Moves past one value of `schema` without materializing it.
    ///
    /// # Errors
    /// Unions cannot be skipped and fail with [`Details::SkipUnion`].
    pub fn skip(&mut self, schema: &Schema) -> AvroResult<()> {
        match schema {
            Schema::Null => Ok(()),
            Schema::Boolean => self.take(1).map(|_| ()),
            Schema::Int | Schema::Long | Schema::Enum(_) => self.read_variable().map(|_| ()),
            Schema::Float => self.take(4).map(|_| ()),
            Schema::Double => self.take(8).map(|_| ()),
            Schema::Bytes | Schema::String => self.read_bytes().map(|_| ()),
            Schema::Array(ArraySchema { items }) => {
                self.skip_blocks(items.is_zero_sized(), |c| c.skip(items))
            }
            Schema::Map(MapSchema { types }) => self.skip_blocks(false, |c| {
                c.read_bytes()?;
                c.skip(types)
            }),
            Schema::Record(RecordSchema { fields, .. }) => fields
                .iter()
                .try_for_each(|field| self.skip(&field.schema)),
            Schema::Union(_) => Err(Details::SkipUnion.into()),
            Schema::Logical(logical) => self.skip(logical.underlying()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::schema::{Name, RecordField};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    type TestResult = anyhow::Result<()>;

    #[rstest]
    #[case(&[0x00], 0)]
    #[case(&[0x01], -1)]
    #[case(&[0x02], 1)]
    #[case(&[0x54], 42)]
    #[case(&[0x80, 0x01], 64)]
    #[case(&[0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01], i64::MAX)]
    #[case(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01], i64::MIN)]
    fn read_long(#[case] data: &[u8], #[case] expected: i64) -> TestResult {
        let mut cursor = Cursor::new(data);
        assert_eq!(cursor.read_long()?, expected);
        assert!(cursor.is_empty());
        Ok(())
    }

    #[test]
    fn varint_overflow() {
        let data = [0xffu8; 11];
        let err = Cursor::new(&data).read_long().map_err(Error::into_details);
        assert!(matches!(err, Err(Details::IntegerOverflow)));
    }

    #[test]
    fn int_out_of_range() {
        // zig-zag encoding of i32::MAX + 1
        let data = [0x80, 0x80, 0x80, 0x80, 0x10];
        let err = Cursor::new(&data).read_int().map_err(Error::into_details);
        assert!(matches!(err, Err(Details::ZagI32(_, n)) if n == i64::from(i32::MAX) + 1));
    }

    #[test]
    #[allow(clippy::approx_constant)]
    fn floating_point_is_little_endian() -> TestResult {
        let mut cursor = Cursor::new(&[
            0x00, 0x00, 0x80, 0x3f, 0x1f, 0x85, 0xeb, 0x51, 0xb8, 0x1e, 0x09, 0x40,
        ]);
        assert_eq!(cursor.read_float()?, 1.0);
        assert_eq!(cursor.read_double()?, 3.14);
        Ok(())
    }

    #[test]
    fn booleans() -> TestResult {
        let mut cursor = Cursor::new(&[0x00, 0x01, 0x07]);
        assert!(!cursor.read_boolean()?);
        assert!(cursor.read_boolean()?);
        assert!(cursor.read_boolean()?);
        Ok(())
    }

    #[test]
    fn strings_and_bytes() -> TestResult {
        let mut cursor = Cursor::new(&[0x06, b'A', b'd', b'a', 0x04, 0xde, 0xad, 0x00]);
        assert_eq!(cursor.read_string()?, "Ada");
        assert_eq!(cursor.read_bytes()?, &[0xde, 0xad]);
        assert_eq!(cursor.read_string()?, "");
        Ok(())
    }

    #[test]
    fn negative_length() {
        let err = Cursor::new(&[0x01]).read_bytes().map_err(Error::into_details);
        assert!(matches!(err, Err(Details::NegativeLength(-1))));
    }

    #[test]
    fn end_of_data() {
        let err = Cursor::new(&[0x08, b'a']).read_string().map_err(Error::into_details);
        assert!(matches!(
            err,
            Err(Details::EndOfData {
                needed: 4,
                remaining: 1
            })
        ));

        let err = Cursor::new(&[0x1f, 0x85]).read_double().map_err(Error::into_details);
        assert!(matches!(err, Err(Details::EndOfData { needed: 8, .. })));

        let err = Cursor::new(&[0x80]).read_long().map_err(Error::into_details);
        assert!(matches!(err, Err(Details::EndOfData { needed: 1, remaining: 0 })));
    }

    #[test]
    fn invalid_utf8() {
        let err = Cursor::new(&[0x02, 0xff]).read_string().map_err(Error::into_details);
        assert!(matches!(err, Err(Details::ConvertToUtf8(_))));
    }

    #[test]
    fn block_headers() -> TestResult {
        // a block of 2 items, a block of -1 items spanning 1 byte, the end marker
        let mut cursor = Cursor::new(&[0x04, 0x01, 0x02, 0x00]);
        assert_eq!(cursor.read_block_header()?, 2);
        assert_eq!(cursor.read_block_header()?, 1);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read_block_header()?, 0);
        Ok(())
    }

    #[test]
    fn seek() -> TestResult {
        let mut cursor = Cursor::new(&[0x02, 0x04]);
        assert_eq!(cursor.read_long()?, 1);
        cursor.seek(0)?;
        assert_eq!(cursor.read_long()?, 1);
        assert_eq!(cursor.remaining(), 1);
        assert!(cursor.seek(3).is_err());
        Ok(())
    }

    #[test]
    fn skip_values() -> TestResult {
        let schema = Schema::record(Name::new("Sample")?)
            .fields(vec![
                RecordField::builder().name("flag").schema(Schema::Boolean).build(),
                RecordField::builder().name("f").schema(Schema::Float).build(),
                RecordField::builder()
                    .name("tags")
                    .schema(Schema::array(Schema::String).build())
                    .build(),
                RecordField::builder()
                    .name("scores")
                    .schema(Schema::map(Schema::Long).build())
                    .build(),
            ])
            .build();

        #[rustfmt::skip]
        let data = [
            0x01,
            0x00, 0x00, 0x80, 0x3f,
            // one sized block with one item, then a plain block with one item
            0x01, 0x04, 0x02, b'a', 0x02, 0x02, b'b', 0x00,
            0x02, 0x02, b'k', 0x54, 0x00,
            0x2a,
        ];
        let mut cursor = Cursor::new(&data);
        cursor.skip(&schema)?;
        assert_eq!(cursor.read_long()?, 21);
        assert!(cursor.is_empty());
        Ok(())
    }

    #[test]
    fn zero_sized_items_are_skipped_in_one_go() -> TestResult {
        let schema = Schema::array(Schema::Null).build();
        // a block announcing 2^40 items, the end marker and one more value
        let data = [0x80, 0x80, 0x80, 0x80, 0x80, 0x40, 0x00, 0x2a];
        let mut cursor = Cursor::new(&data);
        cursor.skip(&schema)?;
        assert_eq!(cursor.read_long()?, 21);
        Ok(())
    }

    #[test]
    fn unions_cannot_be_skipped() -> TestResult {
        let schema = Schema::union(vec![Schema::Null, Schema::Int])?;
        let err = Cursor::new(&[0x00]).skip(&schema).map_err(Error::into_details);
        assert!(matches!(err, Err(Details::SkipUnion)));
        Ok(())
    }
}
