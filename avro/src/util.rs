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
use crate::schema::Documentation;
use log::debug;
use serde_json::{Map, Value};
use std::sync::{
    Once,
    atomic::{AtomicUsize, Ordering},
};

/// Maximum number of bytes that can be allocated when decoding
/// Avro-encoded values. This is a protection against ill-formed
/// data, whose length field might be interpreted as enormous.
/// See [`max_allocation_bytes`] to change this limit.
pub const DEFAULT_MAX_ALLOCATION_BYTES: usize = 512 * 1024 * 1024;
static MAX_ALLOCATION_BYTES: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_ALLOCATION_BYTES);
static MAX_ALLOCATION_BYTES_ONCE: Once = Once::new();

/// Set a new maximum number of bytes that can be allocated when decoding data.
/// Once called, the limit cannot be changed.
///
/// **NOTE** This function must be called before decoding **any** data. The
/// library leverages [`std::sync::Once`] to set the limit either when calling
/// this method, or when decoding for the first time.
///
/// # Returns
/// The configured maximum, which might be different from `num_bytes` if the
/// value was already set before.
pub fn max_allocation_bytes(num_bytes: usize) -> usize {
    MAX_ALLOCATION_BYTES_ONCE.call_once(|| {
        debug!("Limiting decoded allocations to {num_bytes} bytes");
        MAX_ALLOCATION_BYTES.store(num_bytes, Ordering::Release);
    });
    MAX_ALLOCATION_BYTES.load(Ordering::Acquire)
}

/// Checks a decoded length against the configured allocation limit.
pub fn safe_len(len: usize) -> AvroResult<usize> {
    let max_bytes = max_allocation_bytes(DEFAULT_MAX_ALLOCATION_BYTES);

    if len <= max_bytes {
        Ok(len)
    } else {
        Err(Details::MemoryAllocation {
            desired: len,
            maximum: max_bytes,
        }
        .into())
    }
}

pub(crate) trait MapHelper {
    fn string(&self, key: &str) -> Option<String>;

    fn name(&self) -> Option<String> {
        self.string("name")
    }

    fn doc(&self) -> Documentation {
        self.string("doc")
    }

    fn aliases(&self) -> Option<Vec<String>>;
}

impl MapHelper for Map<String, Value> {
    fn string(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
    }

    fn aliases(&self) -> Option<Vec<String>> {
        self.get("aliases")
            .and_then(|aliases| aliases.as_array())
            .and_then(|aliases| {
                aliases
                    .iter()
                    .map(|alias| alias.as_str())
                    .map(|alias| alias.map(|a| a.to_string()))
                    .collect::<Option<_>>()
            })
    }
}

/// Appends the zig-zag varint encoding of a 32-bit integer.
pub fn zig_i32(n: i32, buffer: &mut Vec<u8>) -> usize {
    encode_variable(((n << 1) ^ (n >> 31)) as u32 as u64, buffer)
}

/// Appends the zig-zag varint encoding of a 64-bit integer.
pub fn zig_i64(n: i64, buffer: &mut Vec<u8>) -> usize {
    encode_variable(((n << 1) ^ (n >> 63)) as u64, buffer)
}

/// Reverses the zig-zag mapping of an already decoded varint.
pub(crate) fn zag_i64(z: u64) -> i64 {
    if z & 0x1 == 0 {
        (z >> 1) as i64
    } else {
        !(z >> 1) as i64
    }
}

fn encode_variable(mut z: u64, buffer: &mut Vec<u8>) -> usize {
    let mut written = 0;
    loop {
        written += 1;
        if z <= 0x7F {
            buffer.push((z & 0x7F) as u8);
            break;
        } else {
            buffer.push((0x80 | (z & 0x7F)) as u8);
            z >>= 7;
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn test_zigzag() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        zig_i32(42i32, &mut a);
        zig_i64(42i64, &mut b);
        assert_eq!(a, b);
    }

    #[rstest]
    #[case(0, &[0])]
    #[case(-1, &[1])]
    #[case(1, &[2])]
    #[case(-64, &[127])]
    #[case(64, &[128, 1])]
    #[case(i32::MAX as i64, &[254, 255, 255, 255, 15])]
    #[case(i32::MAX as i64 + 1, &[128, 128, 128, 128, 16])]
    #[case(i32::MIN as i64, &[255, 255, 255, 255, 15])]
    #[case(i32::MIN as i64 - 1, &[129, 128, 128, 128, 16])]
    #[case(i64::MAX, &[254, 255, 255, 255, 255, 255, 255, 255, 255, 1])]
    #[case(i64::MIN, &[255, 255, 255, 255, 255, 255, 255, 255, 255, 1])]
    fn test_zig_i64(#[case] n: i64, #[case] expected: &[u8]) {
        let mut s = Vec::new();
        let written = zig_i64(n, &mut s);
        assert_eq!(s, expected);
        assert_eq!(written, expected.len());
    }

    #[rstest]
    #[case(i32::MAX / 2, &[254, 255, 255, 255, 7])]
    #[case(i32::MIN / 2, &[255, 255, 255, 255, 7])]
    #[case(-(i32::MIN / 2), &[128, 128, 128, 128, 8])]
    #[case(i32::MIN / 2 - 1, &[129, 128, 128, 128, 8])]
    #[case(i32::MAX, &[254, 255, 255, 255, 15])]
    #[case(i32::MIN, &[255, 255, 255, 255, 15])]
    fn test_zig_i32(#[case] n: i32, #[case] expected: &[u8]) {
        let mut s = Vec::new();
        zig_i32(n, &mut s);
        assert_eq!(s, expected);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, -1)]
    #[case(2, 1)]
    #[case(u64::MAX - 1, i64::MAX)]
    #[case(u64::MAX, i64::MIN)]
    fn test_zag_i64(#[case] z: u64, #[case] expected: i64) {
        assert_eq!(zag_i64(z), expected);
    }

    #[test]
    fn test_safe_len() -> TestResult {
        assert_eq!(42usize, safe_len(42usize)?);
        assert!(safe_len(1024 * 1024 * 1024).is_err());

        Ok(())
    }
}
