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
    schema::{Precision, Scale},
};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// Whether `value` can be represented with at most `precision` digits, `scale` of them after
/// the decimal point.
///
/// Trailing fractional zeros do not count and a zero integer part counts as one digit.
pub(crate) fn fits(value: &BigDecimal, precision: Precision, scale: Scale) -> bool {
    let (unscaled, exponent) = value.normalized().into_bigint_and_exponent();
    let digits = unscaled.magnitude().to_str_radix(10).len();

    let (int_digits, frac_digits) = if exponent > 0 {
        let frac_digits = exponent.unsigned_abs() as usize;
        (digits.saturating_sub(frac_digits).max(1), frac_digits)
    } else {
        (digits + exponent.unsigned_abs() as usize, 0)
    };

    frac_digits <= scale && int_digits + frac_digits <= precision
}

fn check_fits(value: &BigDecimal, precision: Precision, scale: Scale) -> AvroResult<()> {
    if fits(value, precision, scale) {
        Ok(())
    } else {
        Err(Details::DecimalDoesNotFit {
            value: value.clone(),
            precision,
            scale,
        }
        .into())
    }
}

/// Returns the unscaled value of `value` as big-endian two's-complement bytes.
pub(crate) fn encode_decimal(
    value: &BigDecimal,
    precision: Precision,
    scale: Scale,
) -> AvroResult<Vec<u8>> {
    check_fits(value, precision, scale)?;
    let (unscaled, _) = value.with_scale(scale as i64).into_bigint_and_exponent();
    Ok(unscaled.to_signed_bytes_be())
}

/// Reads a decimal from the big-endian two's-complement bytes of its unscaled value.
pub(crate) fn decode_decimal(
    bytes: &[u8],
    precision: Precision,
    scale: Scale,
) -> AvroResult<BigDecimal> {
    let value = BigDecimal::new(BigInt::from_signed_bytes_be(bytes), scale as i64);
    check_fits(&value, precision, scale)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::str::FromStr;

    type TestResult = anyhow::Result<()>;

    #[rstest]
    #[case("3.12", 3, 2, true)]
    #[case("3.123", 3, 2, false)]
    #[case("3.10", 2, 1, true)]
    #[case("-3.12", 3, 2, true)]
    #[case("12.3", 3, 2, true)]
    #[case("123.4", 3, 2, false)]
    #[case("0", 1, 0, true)]
    #[case("0.05", 2, 2, false)]
    #[case("0.05", 3, 2, true)]
    #[case("1200", 4, 0, true)]
    #[case("1200", 3, 0, false)]
    #[case("1234.56", 6, 2, true)]
    fn decimal_fits(
        #[case] value: &str,
        #[case] precision: usize,
        #[case] scale: usize,
        #[case] expected: bool,
    ) -> TestResult {
        assert_eq!(fits(&BigDecimal::from_str(value)?, precision, scale), expected);
        Ok(())
    }

    #[rstest]
    #[case("1234.56", 6, 2, &[0x01, 0xe2, 0x40])]
    #[case("-1", 3, 2, &[0x9c])]
    #[case("-1.5", 3, 2, &[0xff, 0x6a])]
    #[case("0", 3, 2, &[0x00])]
    #[case("1.5", 3, 2, &[0x00, 0x96])]
    fn encoding(
        #[case] value: &str,
        #[case] precision: usize,
        #[case] scale: usize,
        #[case] expected: &[u8],
    ) -> TestResult {
        let value = BigDecimal::from_str(value)?;
        let bytes = encode_decimal(&value, precision, scale)?;
        assert_eq!(bytes, expected);
        assert_eq!(decode_decimal(&bytes, precision, scale)?, value);
        Ok(())
    }

    #[test]
    fn too_many_digits() -> TestResult {
        let err = encode_decimal(&BigDecimal::from_str("3.123")?, 3, 2).map_err(Error::into_details);
        assert!(matches!(
            err,
            Err(Details::DecimalDoesNotFit {
                precision: 3,
                scale: 2,
                ..
            })
        ));

        // 10000 with a scale of 2 is 100.00
        let err = decode_decimal(&[0x27, 0x10], 2, 2).map_err(Error::into_details);
        assert!(matches!(err, Err(Details::DecimalDoesNotFit { .. })));
        assert_eq!(decode_decimal(&[0x27, 0x10], 3, 2)?, BigDecimal::from(100));
        Ok(())
    }

    #[test]
    fn empty_bytes_are_zero() -> TestResult {
        assert_eq!(decode_decimal(&[], 1, 0)?, BigDecimal::from(0));
        Ok(())
    }
}
