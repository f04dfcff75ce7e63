// Copyright 2024 Cornell University
// released under BSD 3-Clause License
//
// The operation set over bit-vector values.
//
// Every sized operation confines its effect to the low `size` bits: the operands are
// truncated to `size` bits, the operation is computed at exactly that width (which
// is the same as computing it with enough extra bits and truncating back), and the
// result is spliced into a copy of the left operand. Bits at and above `size` in the
// result are therefore always the left operand's.

use crate::bv::arithmetic;
use crate::bv::io::strings;
use crate::bv::owned::double_word_from_words;
use crate::bv::BitVecMutOps;
use crate::{BitVecValue, DoubleWord, Error, Result, WidthInt, Word};

/// Validates the operands of a sized binary operation: both operands need the same width
/// and `size` has to lie in `1..=width`.
pub fn check_binary_size<L, R>(lhs: &L, rhs: &R, size: WidthInt) -> Result<()>
where
    L: BitVecOps + ?Sized,
    R: BitVecOps + ?Sized,
{
    if lhs.width() != rhs.width() || size == 0 || size > lhs.width() {
        Err(Error::WidthMismatch {
            lhs: lhs.width(),
            rhs: rhs.width(),
            size,
        })
    } else {
        Ok(())
    }
}

/// Validates the operand of a sized unary operation: `size` has to lie in `1..=width`.
pub fn check_unary_size<A: BitVecOps + ?Sized>(arg: &A, size: WidthInt) -> Result<()> {
    if size == 0 || size > arg.width() {
        Err(Error::WidthMismatch {
            lhs: arg.width(),
            rhs: arg.width(),
            size,
        })
    } else {
        Ok(())
    }
}

fn words_to_u128(words: &[Word]) -> Option<u128> {
    match words {
        [lsb] => Some(*lsb as DoubleWord),
        [lsb, msb, rest @ ..] if rest.iter().all(|w| *w == 0) => {
            Some(double_word_from_words(*lsb, *msb))
        }
        _ => None,
    }
}

/// The low `size` bits of `value` as a value of width `size`.
fn low_bits<V: BitVecOps + ?Sized>(value: &V, size: WidthInt) -> BitVecValue {
    let mut out = BitVecValue::new_zero(size);
    arithmetic::slice(out.words_mut(), value.words(), size - 1, 0);
    out
}

/// Places the `size`-bit `result` into the low bits of a copy of `lhs`.
fn splice_result<L: BitVecOps + ?Sized>(lhs: &L, result: BitVecValue) -> BitVecValue {
    if result.width() == lhs.width() {
        result
    } else {
        let mut out = lhs.to_value();
        arithmetic::splice_low(out.words_mut(), result.words(), result.width());
        out
    }
}

/// Runs `op` over the low `size` bits of both operands and splices the result back.
fn sized_bin_op<L, R>(
    lhs: &L,
    rhs: &R,
    size: WidthInt,
    op: impl FnOnce(&mut [Word], &[Word], &[Word], WidthInt) -> Result<()>,
) -> Result<BitVecValue>
where
    L: BitVecOps + ?Sized,
    R: BitVecOps + ?Sized,
{
    check_binary_size(lhs, rhs, size)?;
    let (a, b) = (low_bits(lhs, size), low_bits(rhs, size));
    let mut res = BitVecValue::new_zero(size);
    op(res.words_mut(), a.words(), b.words(), size)?;
    Ok(splice_result(lhs, res))
}

fn sized_un_op<A: BitVecOps + ?Sized>(
    arg: &A,
    size: WidthInt,
    op: fn(&mut [Word], &[Word], WidthInt),
) -> Result<BitVecValue> {
    check_unary_size(arg, size)?;
    let a = low_bits(arg, size);
    let mut res = BitVecValue::new_zero(size);
    op(res.words_mut(), a.words(), size);
    Ok(splice_result(arg, res))
}

fn sized_cmp<L, R>(
    lhs: &L,
    rhs: &R,
    size: WidthInt,
    cmp: impl FnOnce(&[Word], &[Word], WidthInt) -> bool,
) -> Result<bool>
where
    L: BitVecOps + ?Sized,
    R: BitVecOps + ?Sized,
{
    check_binary_size(lhs, rhs, size)?;
    let (a, b) = (low_bits(lhs, size), low_bits(rhs, size));
    Ok(cmp(a.words(), b.words(), size))
}

/// Declares a sized arithmetic function `$name_at(rhs, size)` over a kernel that takes the
/// operation width, together with `$name(rhs)` which operates on the full width.
macro_rules! declare_arith_bin_fn {
    ($(#[$attr:meta])* $name:ident) => {
        paste::paste! {
            $(#[$attr])*
            fn $name<R: BitVecOps + ?Sized>(&self, rhs: &R) -> Result<BitVecValue> {
                self.[<$name _at>](rhs, self.width())
            }

            $(#[$attr])*
            ///
            /// Only the low `size` bits take part, the upper bits are copied from `self`.
            fn [<$name _at>]<R: BitVecOps + ?Sized>(
                &self,
                rhs: &R,
                size: WidthInt,
            ) -> Result<BitVecValue> {
                sized_bin_op(self, rhs, size, |dst, a, b, width| {
                    arithmetic::$name(dst, a, b, width);
                    Ok(())
                })
            }
        }
    };
}

/// Declares a sized bitwise function. The kernel does not need to know the width.
macro_rules! declare_bit_arith_bin_fn {
    ($(#[$attr:meta])* $name:ident) => {
        paste::paste! {
            $(#[$attr])*
            fn $name<R: BitVecOps + ?Sized>(&self, rhs: &R) -> Result<BitVecValue> {
                self.[<$name _at>](rhs, self.width())
            }

            $(#[$attr])*
            ///
            /// Only the low `size` bits take part, the upper bits are copied from `self`.
            fn [<$name _at>]<R: BitVecOps + ?Sized>(
                &self,
                rhs: &R,
                size: WidthInt,
            ) -> Result<BitVecValue> {
                sized_bin_op(self, rhs, size, |dst, a, b, _| {
                    arithmetic::$name(dst, a, b);
                    Ok(())
                })
            }
        }
    };
}

/// Declares a sized division or remainder. `$quot` selects which result of the
/// `$kernel` is kept.
macro_rules! declare_div_fn {
    ($(#[$attr:meta])* $name:ident, $kernel:ident, $quot:literal) => {
        paste::paste! {
            $(#[$attr])*
            fn $name<R: BitVecOps + ?Sized>(&self, rhs: &R) -> Result<BitVecValue> {
                self.[<$name _at>](rhs, self.width())
            }

            $(#[$attr])*
            ///
            /// Only the low `size` bits take part, the upper bits are copied from `self`.
            fn [<$name _at>]<R: BitVecOps + ?Sized>(
                &self,
                rhs: &R,
                size: WidthInt,
            ) -> Result<BitVecValue> {
                sized_bin_op(self, rhs, size, |dst, a, b, width| {
                    if arithmetic::is_zero(b) {
                        return Err(Error::DivisionByZero);
                    }
                    let mut other = vec![0; dst.len()];
                    if $quot {
                        arithmetic::$kernel(dst, &mut other, a, b, width);
                    } else {
                        arithmetic::$kernel(&mut other, dst, a, b, width);
                    }
                    Ok(())
                })
            }
        }
    };
}

/// Declares a sized unary function over the low `size` bits of `self`.
macro_rules! declare_un_fn {
    ($(#[$attr:meta])* $name:ident, $kernel:ident) => {
        paste::paste! {
            $(#[$attr])*
            fn $name(&self) -> Result<BitVecValue> {
                self.[<$name _at>](self.width())
            }

            $(#[$attr])*
            ///
            /// Only the low `size` bits are affected, the upper bits are copied from `self`.
            fn [<$name _at>](&self, size: WidthInt) -> Result<BitVecValue> {
                sized_un_op(self, size, arithmetic::$kernel)
            }
        }
    };
}

/// Declares a sized comparison over the low `size` bits of both operands.
macro_rules! declare_cmp_fn {
    ($(#[$attr:meta])* $name:ident, |$a:ident, $b:ident, $width:ident| $cmp:expr) => {
        paste::paste! {
            $(#[$attr])*
            fn $name<R: BitVecOps + ?Sized>(&self, rhs: &R) -> Result<bool> {
                self.[<$name _at>](rhs, self.width())
            }

            $(#[$attr])*
            #[allow(unused_variables)]
            fn [<$name _at>]<R: BitVecOps + ?Sized>(&self, rhs: &R, size: WidthInt) -> Result<bool> {
                sized_cmp(self, rhs, size, |$a, $b, $width| $cmp)
            }
        }
    };
}

/// Operations over immutable bit-vector values.
pub trait BitVecOps {
    fn width(&self) -> WidthInt;
    fn words(&self) -> &[Word];

    /// Owned copy with identical width and bits.
    fn to_value(&self) -> BitVecValue {
        let mut out = BitVecValue::new_zero(self.width());
        out.words_mut().copy_from_slice(self.words());
        out
    }

    /// The bit at `pos`, with position 0 being the least significant bit.
    fn bit(&self, pos: WidthInt) -> Result<bool> {
        if pos < self.width() {
            Ok(arithmetic::is_bit_set(self.words(), pos))
        } else {
            Err(Error::Index {
                index: pos,
                width: self.width(),
            })
        }
    }

    /// Unsigned interpretation, `None` iff the value does not fit into 128 bits.
    fn as_unsigned(&self) -> Option<u128> {
        words_to_u128(self.words())
    }

    /// Two's complement interpretation, `None` iff the value does not fit into an `i128`.
    fn as_signed(&self) -> Option<i128> {
        if self.is_negative() {
            let mut magnitude = vec![0; self.words().len()];
            arithmetic::negate(&mut magnitude, self.words(), self.width());
            let magnitude = words_to_u128(&magnitude)?;
            // the magnitude of i128::MIN is 2^127 which wraps onto itself
            (magnitude <= i128::MIN.unsigned_abs()).then(|| (magnitude as i128).wrapping_neg())
        } else {
            self.as_unsigned()
                .filter(|v| *v <= i128::MAX as u128)
                .map(|v| v as i128)
        }
    }

    /// Hex digits with a `0x` prefix and without leading zeros, e.g. `0xa`.
    fn as_hex(&self) -> String {
        strings::to_hex_text(self.words(), self.width())
    }

    /// Binary digits with a `0b` prefix, without leading zeros and grouped by four,
    /// e.g. `0b1'1111`.
    fn as_binary_text(&self) -> String {
        strings::to_binary_text(self.words(), self.width())
    }

    /// Convert to a string of 1s and 0s.
    fn to_bit_str(&self) -> String {
        strings::to_bit_str(self.words(), self.width())
    }

    /// Convert to a string of 1s and 0s with a `-` if the value is negative.
    fn to_bit_str_signed(&self) -> String {
        strings::to_bit_str_signed(self.words(), self.width())
    }

    /// Convert to a string of hex characters
    fn to_hex_str(&self) -> String {
        strings::to_hex_str(self.words(), self.width())
    }

    /// Convert to a string of hex characters with a `-` if the value is negative.
    fn to_hex_str_signed(&self) -> String {
        strings::to_hex_str_signed(self.words(), self.width())
    }

    /// Convert to a string of a decimal number. No leading zeros.
    fn to_dec_str(&self) -> String {
        strings::to_dec_str(self.words())
    }

    #[cfg(feature = "bigint")]
    fn to_big_int(&self) -> num_bigint::BigInt {
        crate::bv::io::bigint::to_big_int(self.words(), self.width())
    }

    #[cfg(feature = "bigint")]
    fn to_big_uint(&self) -> num_bigint::BigUint {
        crate::bv::io::bigint::to_big_uint(self.words())
    }

    fn is_zero(&self) -> bool {
        arithmetic::is_zero(self.words())
    }

    fn is_negative(&self) -> bool {
        arithmetic::is_neg(self.words(), self.width())
    }

    /// Replaces the low `low.width()` bits of a copy of `self` with the bits of `low`.
    fn splice_low<R: BitVecOps + ?Sized>(&self, low: &R) -> Result<BitVecValue> {
        if low.width() > self.width() {
            return Err(Error::WidthMismatch {
                lhs: self.width(),
                rhs: low.width(),
                size: low.width(),
            });
        }
        let mut out = self.to_value();
        arithmetic::splice_low(out.words_mut(), low.words(), low.width());
        Ok(out)
    }

    /// Widens to `new_width` bits, the new msbs are zero.
    fn zero_extend(&self, new_width: WidthInt) -> Result<BitVecValue> {
        if new_width <= self.width() {
            return Err(Error::Direction {
                op: "zero extend",
                from: self.width(),
                to: new_width,
            });
        }
        let mut out = BitVecValue::new_zero(new_width);
        arithmetic::zero_extend(out.words_mut(), self.words());
        Ok(out)
    }

    /// Widens to `new_width` bits, the new msbs are copies of the sign bit.
    fn sign_extend(&self, new_width: WidthInt) -> Result<BitVecValue> {
        if new_width <= self.width() {
            return Err(Error::Direction {
                op: "sign extend",
                from: self.width(),
                to: new_width,
            });
        }
        let mut out = BitVecValue::new_zero(new_width);
        arithmetic::sign_extend(out.words_mut(), self.words(), self.width(), new_width);
        Ok(out)
    }

    /// Narrows to the low `new_width` bits.
    fn truncate(&self, new_width: WidthInt) -> Result<BitVecValue> {
        if new_width >= self.width() {
            return Err(Error::Direction {
                op: "truncate",
                from: self.width(),
                to: new_width,
            });
        }
        if new_width == 0 {
            return Err(Error::range(self.to_dec_str(), new_width));
        }
        Ok(low_bits(self, new_width))
    }

    declare_arith_bin_fn!(
        /// Wrapping addition.
        add
    );
    declare_arith_bin_fn!(
        /// Wrapping subtraction.
        sub
    );
    declare_arith_bin_fn!(
        /// Wrapping multiplication. Sign-agnostic, since only the low bits are kept.
        mul
    );
    declare_div_fn!(
        /// Unsigned division. Fails with [`Error::DivisionByZero`] if `rhs` is zero.
        udiv,
        udivrem,
        true
    );
    declare_div_fn!(
        /// Unsigned remainder. Fails with [`Error::DivisionByZero`] if `rhs` is zero.
        urem,
        udivrem,
        false
    );
    declare_div_fn!(
        /// Signed division, rounding towards zero. The most negative value divided by
        /// `-1` wraps to itself. Fails with [`Error::DivisionByZero`] if `rhs` is zero.
        sdiv,
        sdivrem,
        true
    );
    declare_div_fn!(
        /// Signed remainder with the sign of `self`, so that
        /// `self == sdiv(self, rhs) * rhs + srem(self, rhs)`.
        /// Fails with [`Error::DivisionByZero`] if `rhs` is zero.
        srem,
        sdivrem,
        false
    );

    declare_bit_arith_bin_fn!(and);
    declare_bit_arith_bin_fn!(or);
    declare_bit_arith_bin_fn!(xor);

    declare_un_fn!(
        /// Bitwise negation.
        not,
        not
    );
    declare_un_fn!(
        /// Shift left by one, the lsb becomes zero.
        shift_left,
        shift_left
    );
    declare_un_fn!(
        /// Shift right by one, the msb becomes zero.
        logical_shift_right,
        shift_right
    );
    declare_un_fn!(
        /// Shift right by one, the msb keeps its value.
        arithmetic_shift_right,
        arithmetic_shift_right
    );

    declare_cmp_fn!(equal, |a, b, width| arithmetic::cmp_equal(a, b));
    declare_cmp_fn!(not_equal, |a, b, width| !arithmetic::cmp_equal(a, b));
    declare_cmp_fn!(ult, |a, b, width| arithmetic::cmp_greater(b, a));
    declare_cmp_fn!(ule, |a, b, width| arithmetic::cmp_greater_equal(b, a));
    declare_cmp_fn!(ugt, |a, b, width| arithmetic::cmp_greater(a, b));
    declare_cmp_fn!(uge, |a, b, width| arithmetic::cmp_greater_equal(a, b));
    declare_cmp_fn!(slt, |a, b, width| arithmetic::cmp_greater_signed(
        b, a, width
    ));
    declare_cmp_fn!(sle, |a, b, width| arithmetic::cmp_greater_equal_signed(
        b, a, width
    ));
    declare_cmp_fn!(sgt, |a, b, width| arithmetic::cmp_greater_signed(
        a, b, width
    ));
    declare_cmp_fn!(sge, |a, b, width| arithmetic::cmp_greater_equal_signed(
        a, b, width
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bv(value: i128, width: WidthInt) -> BitVecValue {
        BitVecValue::from_integer(value, width).unwrap()
    }

    #[test]
    fn test_check_sizes() {
        let (a, b) = (bv(0, 8), bv(0, 4));
        assert!(check_binary_size(&a, &a, 8).is_ok());
        assert!(check_binary_size(&a, &a, 1).is_ok());
        assert!(check_binary_size(&a, &a, 0).is_err());
        assert!(check_binary_size(&a, &a, 9).is_err());
        assert_eq!(
            check_binary_size(&a, &b, 4),
            Err(Error::WidthMismatch {
                lhs: 8,
                rhs: 4,
                size: 4
            })
        );
        assert!(check_unary_size(&b, 4).is_ok());
        assert!(check_unary_size(&b, 5).is_err());
    }

    #[test]
    fn test_as_signed_limits() {
        assert_eq!(bv(i128::MIN, 128).as_signed(), Some(i128::MIN));
        assert_eq!(bv(i128::MIN, 200).as_signed(), Some(i128::MIN));
        assert_eq!(bv(i128::MAX, 200).as_signed(), Some(i128::MAX));
        assert_eq!(bv(-1, 1).as_signed(), Some(-1));
        // 2^127 is a valid unsigned, but not a valid signed 128-bit value
        let mut big = bv(1, 129);
        for _ in 0..127 {
            big = big.shift_left().unwrap();
        }
        assert_eq!(big.as_unsigned(), Some(1 << 127));
        assert_eq!(big.as_signed(), None);
        // -2^128 does not fit either
        let min = BitVecValue::from_bit_str(&format!("1{}", "0".repeat(128))).unwrap();
        assert_eq!(min.as_signed(), None);
        assert_eq!(min.as_unsigned(), None);
    }

    #[test]
    fn test_sized_result_keeps_upper_bits() {
        let a = bv(0b1010_0111, 8);
        let b = bv(0b0101_0001, 8);
        let res = a.add_at(&b, 4).unwrap();
        assert_eq!(res.as_unsigned(), Some(0b1010_1000));
        let res = a.not_at(3).unwrap();
        assert_eq!(res.as_unsigned(), Some(0b1010_0000));
    }

    #[test]
    fn test_division_by_zero_in_low_bits() {
        // rhs is non-zero, but its low four bits are
        let a = bv(7, 8);
        let b = bv(0b0001_0000, 8);
        assert_eq!(a.udiv(&b).unwrap().as_unsigned(), Some(0));
        assert_eq!(a.udiv_at(&b, 4), Err(Error::DivisionByZero));
        assert_eq!(a.srem_at(&b, 4), Err(Error::DivisionByZero));
    }
}
