// Copyright 2024 Cornell University
// released under BSD 3-Clause License
//
// Exact conversions from and to num-bigint numbers of any width.

use crate::bv::arithmetic::{assign, is_neg, negate};
use crate::{Error, Result, WidthInt, Word};
use num_bigint::{BigInt, BigUint, Sign};

pub(crate) fn to_big_uint(words: &[Word]) -> BigUint {
    words
        .iter()
        .rev()
        .fold(BigUint::default(), |acc, w| (acc << Word::BITS) | BigUint::from(*w))
}

pub(crate) fn to_big_int(words: &[Word], width: WidthInt) -> BigInt {
    if is_neg(words, width) {
        let mut magnitude = vec![0; words.len()];
        negate(&mut magnitude, words, width);
        BigInt::from_biguint(Sign::Minus, to_big_uint(&magnitude))
    } else {
        BigInt::from_biguint(Sign::Plus, to_big_uint(words))
    }
}

pub(crate) fn from_big_uint(value: &BigUint, width: WidthInt, out: &mut [Word]) -> Result<()> {
    if value.bits() > width as u64 {
        return Err(Error::range(value, width));
    }
    assign(out, &value.to_u64_digits());
    Ok(())
}

/// Accepts `[-2^(width-1), 2^width - 1]`, like [`crate::BitVecValue::from_integer`].
pub(crate) fn from_big_int(value: &BigInt, width: WidthInt, out: &mut [Word]) -> Result<()> {
    let magnitude = value.magnitude();
    if value.sign() == Sign::Minus {
        let min_magnitude = BigUint::from(1u8) << (width - 1);
        if *magnitude > min_magnitude {
            return Err(Error::range(value, width));
        }
        let mut unsigned = vec![0; out.len()];
        from_big_uint(magnitude, width, &mut unsigned)?;
        negate(out, &unsigned, width);
        Ok(())
    } else {
        from_big_uint(magnitude, width, out).map_err(|_| Error::range(value, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_big_int() {
        assert_eq!(to_big_int(&[0b1010], 4), BigInt::from(-6));
        assert_eq!(to_big_int(&[0b0110], 4), BigInt::from(6));
        assert_eq!(
            to_big_int(&[Word::MAX, Word::MAX, 1], 129),
            BigInt::from(-1)
        );
        assert_eq!(to_big_uint(&[0, 0, 1]), BigUint::from(1u8) << 128u32);
    }

    #[test]
    fn test_from_big_int_range() {
        let mut out = [0];
        assert!(from_big_int(&BigInt::from(-8), 4, &mut out).is_ok());
        assert_eq!(out, [0b1000]);
        let mut out = [0];
        assert!(from_big_int(&BigInt::from(-9), 4, &mut out).is_err());
        let mut out = [0];
        assert!(from_big_int(&BigInt::from(16), 4, &mut out).is_err());
        let mut out = [0, 0, 0];
        assert!(from_big_int(&-(BigInt::from(1) << 128u32), 129, &mut out).is_ok());
        assert_eq!(out, [0, 0, 1]);
    }
}
