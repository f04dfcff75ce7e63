// Copyright 2024 Cornell University
// released under BSD 3-Clause License
use crate::bv::arithmetic;
use crate::{BitVecOps, DoubleWord, Error, Result, WidthInt, Word};

/// Owned, fixed-width two's complement bit-vector value.
///
/// Values are immutable through the public API. Every operation in [`BitVecOps`]
/// returns a freshly built value.
///
/// Equality requires equal widths. Values of different widths are unordered:
/// `partial_cmp` returns `None`, so all of `<`, `<=`, `>` and `>=` are `false`.
/// Equal-width values are ordered by their unsigned interpretation.
#[derive(Clone, Hash)]
pub struct BitVecValue(pub(super) BitVecValueImpl);

/// Implementation enum for the owned bit-vector value.
/// We hide this inside a `pub struct` in order not to expose the individual enum entries to the
/// user.
#[derive(Clone, Hash, Eq, PartialEq)]
pub(super) enum BitVecValueImpl {
    Word(WidthInt, Word),
    Double(WidthInt, [Word; 2]),
    Big(WidthInt, Box<[Word]>),
}

impl BitVecValueImpl {
    /// Create a new value that fits into a single word
    const fn new_word(value: Word, width: WidthInt) -> Self {
        debug_assert!(width > 0 && width <= Word::BITS);
        Self::Word(width, value)
    }

    /// Create a new value of 64 < width <= 128
    const fn new_double_word(value: DoubleWord, width: WidthInt) -> Self {
        debug_assert!(width > Word::BITS && width <= DoubleWord::BITS);
        Self::Double(width, double_word_to_words(value))
    }

    /// Create a new value of width > 128. It will be initialized to all zeros.
    fn new_big_zero(width: WidthInt) -> Self {
        debug_assert!(width > DoubleWord::BITS);
        let num_words = arithmetic::words_for_width(width);
        Self::Big(width, vec![0; num_words].into_boxed_slice())
    }
}

pub(crate) const fn double_word_to_words(value: DoubleWord) -> [Word; 2] {
    // lsb first, then msb
    [value as Word, (value >> Word::BITS) as Word]
}

pub(crate) const fn double_word_from_words(lsb: Word, msb: Word) -> DoubleWord {
    lsb as DoubleWord | ((msb as DoubleWord) << Word::BITS)
}

/// divides width into three different classes
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum W {
    Word,
    Double,
    Big,
}

const MIN_DOUBLE_BITS: u32 = Word::BITS + 1;
impl From<WidthInt> for W {
    fn from(value: WidthInt) -> Self {
        match value {
            0 => unreachable!("zero-width values are rejected at construction"),
            1..=Word::BITS => Self::Word,
            MIN_DOUBLE_BITS..=DoubleWord::BITS => Self::Double,
            _ => Self::Big,
        }
    }
}

/// Checks that `value` lies in `[-2^(width-1), 2^width - 1]`, i.e. that it has a signed
/// or an unsigned encoding with `width` bits.
fn integer_fits(value: i128, width: WidthInt) -> bool {
    if width >= DoubleWord::BITS {
        true
    } else if value < 0 {
        value >= -(1i128 << (width - 1))
    } else {
        value as DoubleWord <= arithmetic::mask_double_word(width)
    }
}

impl BitVecValue {
    /// The value zero at `width` bits. Fails for a width of zero.
    pub fn zero(width: WidthInt) -> Result<Self> {
        if width == 0 {
            Err(Error::range(0, width))
        } else {
            Ok(Self::new_zero(width))
        }
    }

    /// All bits set, i.e. `-1` or `2^width - 1`.
    pub fn ones(width: WidthInt) -> Result<Self> {
        let mut out = Self::zero(width)?;
        arithmetic::set(out.words_mut());
        out.mask_msb();
        Ok(out)
    }

    /// Largest unsigned value, `2^width - 1`. Same bits as [`BitVecValue::ones`].
    pub fn max_unsigned(width: WidthInt) -> Result<Self> {
        Self::ones(width)
    }

    /// Largest signed value, `2^(width-1) - 1`.
    pub fn max_signed(width: WidthInt) -> Result<Self> {
        let mut out = Self::ones(width)?;
        out.set_bit(width - 1, false);
        Ok(out)
    }

    /// Most negative signed value, `-2^(width-1)`.
    pub fn min_signed(width: WidthInt) -> Result<Self> {
        let mut out = Self::zero(width)?;
        out.set_bit(width - 1, true);
        Ok(out)
    }

    /// Encodes `value` with `width` bits. Both negative numbers down to `-2^(width-1)`
    /// and non-negative numbers up to `2^width - 1` are accepted.
    pub fn from_integer(value: i128, width: WidthInt) -> Result<Self> {
        if width == 0 || !integer_fits(value, width) {
            return Err(Error::range(value, width));
        }
        let mut out = Self::new_zero(width);
        let words = double_word_to_words(value as DoubleWord);
        if width > DoubleWord::BITS {
            arithmetic::sign_extend(out.words_mut(), &words, DoubleWord::BITS, width);
        } else {
            arithmetic::assign(out.words_mut(), &words);
            out.mask_msb();
        }
        Ok(out)
    }

    /// Builds a value from explicit bits, `bits[0]` being the least significant one.
    /// Bits missing at the top are zero.
    pub fn from_bits(bits: &[bool], width: WidthInt) -> Result<Self> {
        if width == 0 || bits.len() > width as usize {
            return Err(Error::range(format!("{}-bit sequence", bits.len()), width));
        }
        let mut out = Self::new_zero(width);
        for (pos, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
            out.set_bit(pos as WidthInt, true);
        }
        Ok(out)
    }

    pub fn from_bool(value: bool) -> Self {
        Self(BitVecValueImpl::new_word(value as Word, 1))
    }

    /// Parse a string of 1s and 0s. The width of the resulting value is the number of digits,
    /// plus one if the number carries a `-`.
    pub fn from_bit_str(value: &str) -> Result<Self> {
        Self::from_str_with_derived_width(value, 2)
    }

    /// Parse a string of hex digits. The width of the resulting value is the number of digits
    /// times 4, plus one if the number carries a `-`.
    pub fn from_hex_str(value: &str) -> Result<Self> {
        Self::from_str_with_derived_width(value, 16)
    }

    fn from_str_with_derived_width(value: &str, radix: u32) -> Result<Self> {
        match crate::bv::io::strings::determine_width_from_str_radix(value, radix) {
            // no digits
            0 => Err(Error::InvalidDigit(value.to_string())),
            width => Self::from_str_radix(value, radix, width),
        }
    }

    /// Parses a number in any radix from 2 to 36 into a value of `width` bits.
    /// The number has to fit under the same rules as for [`BitVecValue::from_integer`].
    pub fn from_str_radix(value: &str, radix: u32, width: WidthInt) -> Result<Self> {
        let mut out = Self::zero(width).map_err(|_| Error::range(value, width))?;
        crate::bv::io::strings::from_str_radix(value, radix, out.words_mut(), width)?;
        Ok(out)
    }

    #[cfg(feature = "bigint")]
    pub fn from_big_int(value: &num_bigint::BigInt, width: WidthInt) -> Result<Self> {
        let mut out = Self::zero(width).map_err(|_| Error::range(value, width))?;
        crate::bv::io::bigint::from_big_int(value, width, out.words_mut())?;
        Ok(out)
    }

    #[cfg(feature = "bigint")]
    pub fn from_big_uint(value: &num_bigint::BigUint, width: WidthInt) -> Result<Self> {
        let mut out = Self::zero(width).map_err(|_| Error::range(value, width))?;
        crate::bv::io::bigint::from_big_uint(value, width, out.words_mut())?;
        Ok(out)
    }

    /// Draws a uniformly distributed value.
    #[cfg(feature = "rand1")]
    pub fn random(width: WidthInt, rng: &mut impl rand::Rng) -> Result<Self> {
        let mut out = Self::zero(width)?;
        rng.fill(out.words_mut());
        out.mask_msb();
        Ok(out)
    }

    /// Zero of a width that is already known to be valid.
    pub(crate) fn new_zero(width: WidthInt) -> Self {
        debug_assert!(width > 0);
        Self(match width.into() {
            W::Word => BitVecValueImpl::new_word(0, width),
            W::Double => BitVecValueImpl::new_double_word(0, width),
            W::Big => BitVecValueImpl::new_big_zero(width),
        })
    }
}

impl<O: BitVecOps> PartialEq<O> for BitVecValue {
    fn eq(&self, other: &O) -> bool {
        other.width() == self.width() && arithmetic::cmp_equal(self.words(), other.words())
    }
}

impl Eq for BitVecValue {}

impl PartialOrd for BitVecValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self.width() == other.width() {
            Some(arithmetic::cmp_unsigned(self.words(), other.words()))
        } else {
            None
        }
    }
}

impl From<bool> for BitVecValue {
    fn from(value: bool) -> Self {
        BitVecValue::from_bool(value)
    }
}

impl std::fmt::Debug for BitVecValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitVecValue<{}>({})", self.width(), self.to_bit_str())
    }
}

/// Shows width, unsigned value and grouped binary digits, e.g. `[4] 10~0b1010`.
impl std::fmt::Display for BitVecValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}~{}",
            self.width(),
            self.to_dec_str(),
            self.as_binary_text()
        )
    }
}

impl BitVecOps for BitVecValue {
    fn width(&self) -> WidthInt {
        match &self.0 {
            BitVecValueImpl::Word(w, _) => *w,
            BitVecValueImpl::Double(w, _) => *w,
            BitVecValueImpl::Big(w, _) => *w,
        }
    }

    fn words(&self) -> &[Word] {
        match &self.0 {
            BitVecValueImpl::Word(_, value) => std::slice::from_ref(value),
            BitVecValueImpl::Double(_, value) => value.as_slice(),
            BitVecValueImpl::Big(_, value) => value.as_ref(),
        }
    }
}

/// Mutation is reserved to the crate: it is only used while a result is being built.
pub(crate) trait BitVecMutOps: BitVecOps {
    fn words_mut(&mut self) -> &mut [Word];

    /// ensures that all unused bits in the most significant word are set to zero
    fn mask_msb(&mut self) {
        let width = self.width();
        arithmetic::mask_msb(self.words_mut(), width);
    }

    fn set_bit(&mut self, pos: WidthInt, value: bool) {
        debug_assert!(pos < self.width());
        if value {
            arithmetic::set_bit(self.words_mut(), pos);
        } else {
            arithmetic::clear_bit(self.words_mut(), pos);
        }
    }
}

impl BitVecMutOps for BitVecValue {
    fn words_mut(&mut self) -> &mut [Word] {
        match &mut self.0 {
            BitVecValueImpl::Word(_, value) => std::slice::from_mut(value),
            BitVecValueImpl::Double(_, value) => value.as_mut_slice(),
            BitVecValueImpl::Big(_, value) => value.as_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_size() {
        // by default we use 32 bits to represent the width
        assert_eq!(std::mem::size_of::<WidthInt>(), 4);
        // we use a 64-bit word size
        assert_eq!(std::mem::size_of::<Word>(), 8);
        // width + value + padding
        assert_eq!(std::mem::size_of::<BitVecValueImpl>(), 3 * 8);
    }

    #[test]
    fn test_storage_classes() {
        assert!(matches!(
            BitVecValue::zero(64).unwrap().0,
            BitVecValueImpl::Word(64, 0)
        ));
        assert!(matches!(
            BitVecValue::zero(65).unwrap().0,
            BitVecValueImpl::Double(65, [0, 0])
        ));
        let big = BitVecValue::zero(129).unwrap();
        assert_eq!(big.words(), &[0, 0, 0]);
    }

    #[test]
    fn test_from_integer_sign_extends_wide_values() {
        let a = BitVecValue::from_integer(-1, 130).unwrap();
        assert_eq!(a.words(), &[Word::MAX, Word::MAX, 0b11]);
        let a = BitVecValue::from_integer(i128::MIN, 129).unwrap();
        assert_eq!(a.words(), &[0, 1 << 63, 1]);
        let a = BitVecValue::from_integer(-8, 4).unwrap();
        assert_eq!(a.words(), &[0b1000]);
    }

    #[test]
    fn test_integer_fits() {
        assert!(integer_fits(-8, 4));
        assert!(integer_fits(15, 4));
        assert!(!integer_fits(-9, 4));
        assert!(!integer_fits(16, 4));
        assert!(integer_fits(-1, 1));
        assert!(integer_fits(1, 1));
        assert!(!integer_fits(2, 1));
        assert!(integer_fits(i128::MIN, 128));
        assert!(integer_fits(i128::MAX, 127));
        assert!(!integer_fits(i128::MIN, 127));
    }

    #[test]
    fn test_set_bit_is_local_to_construction() {
        let mut a = BitVecValue::zero(70).unwrap();
        a.set_bit(69, true);
        assert_eq!(a.words(), &[0, 1 << 5]);
        a.set_bit(69, false);
        assert!(a.is_zero());
    }

    #[test]
    fn test_ordering_requires_equal_width() {
        let a = BitVecValue::from_integer(3, 4).unwrap();
        let b = BitVecValue::from_integer(-1, 4).unwrap();
        let c = BitVecValue::from_integer(3, 5).unwrap();
        assert!(a < b);
        assert_ne!(a, c);
        assert_eq!(a.partial_cmp(&c), None);
        assert!(!(a < c) && !(c < a) && !(a >= c));
    }
}
