// Copyright 2024 Cornell University
// released under BSD 3-Clause License
//
// Word-level kernels. Every kernel works on little-endian word slices and
// keeps the unused msb bits of its destination cleared.

use crate::{DoubleWord, WidthInt, Word};
use std::cmp::Ordering;

#[inline]
pub(crate) fn mask(bits: WidthInt) -> Word {
    if bits == Word::BITS || bits == 0 {
        Word::MAX
    } else {
        assert!(bits < Word::BITS);
        ((1 as Word) << bits) - 1
    }
}

#[inline]
pub(crate) fn mask_double_word(bits: WidthInt) -> DoubleWord {
    if bits == DoubleWord::BITS || bits == 0 {
        DoubleWord::MAX
    } else {
        assert!(bits < DoubleWord::BITS);
        ((1 as DoubleWord) << bits) - 1
    }
}

#[inline]
pub(crate) fn words_for_width(width: WidthInt) -> usize {
    width.div_ceil(Word::BITS) as usize
}

#[inline]
pub(crate) fn clear(dst: &mut [Word]) {
    for w in dst.iter_mut() {
        *w = 0;
    }
}

#[inline]
pub(crate) fn set(dst: &mut [Word]) {
    for w in dst.iter_mut() {
        *w = Word::MAX;
    }
}

#[inline]
pub(crate) fn assign(dst: &mut [Word], source: &[Word]) {
    for (d, s) in dst.iter_mut().zip(source.iter()) {
        *d = *s;
    }
}

#[inline]
pub(crate) fn zero_extend(dst: &mut [Word], source: &[Word]) {
    assign(dst, source);
    clear(&mut dst[source.len()..]);
}

#[inline]
pub(crate) fn sign_extend(
    dst: &mut [Word],
    source: &[Word],
    src_width: WidthInt,
    dst_width: WidthInt,
) {
    assign(dst, source);
    if is_neg(source, src_width) {
        // set source msbs in destination
        let lsbs_in_msb = src_width % Word::BITS;
        if lsbs_in_msb > 0 {
            let msbs_in_msb = Word::BITS - lsbs_in_msb;
            dst[source.len() - 1] |= mask(msbs_in_msb) << lsbs_in_msb;
        }
        set(&mut dst[source.len()..]);
        mask_msb(dst, dst_width);
    } else {
        clear(&mut dst[source.len()..]);
    }
}

#[inline]
pub(crate) fn mask_msb(dst: &mut [Word], width: WidthInt) {
    debug_assert_eq!(words_for_width(width), dst.len());
    let m = mask(width % Word::BITS);
    if let Some(msb) = dst.last_mut() {
        *msb &= m;
    }
}

#[inline]
pub(crate) fn is_bit_set(source: &[Word], pos: WidthInt) -> bool {
    let bit_idx = pos % Word::BITS;
    let word_idx = (pos / Word::BITS) as usize;
    (source[word_idx] >> bit_idx) & 1 == 1
}

#[inline]
pub(crate) fn set_bit(dst: &mut [Word], pos: WidthInt) {
    let bit_idx = pos % Word::BITS;
    let word_idx = (pos / Word::BITS) as usize;
    dst[word_idx] |= 1 << bit_idx;
}

#[inline]
pub(crate) fn clear_bit(dst: &mut [Word], pos: WidthInt) {
    let bit_idx = pos % Word::BITS;
    let word_idx = (pos / Word::BITS) as usize;
    dst[word_idx] &= !(1 << bit_idx);
}

/// Copies bits `hi..=lo` of `source` into the lsbs of `dst`.
#[inline]
pub(crate) fn slice(dst: &mut [Word], source: &[Word], hi: WidthInt, lo: WidthInt) {
    let lo_offset = lo % Word::BITS;
    let hi_word = (hi / Word::BITS) as usize;
    let lo_word = (lo / Word::BITS) as usize;
    let src = &source[lo_word..(hi_word + 1)];

    let shift_right = lo_offset;
    if shift_right == 0 {
        assign(dst, src);
    } else {
        // assign with a shift
        let shift_left = Word::BITS - shift_right;
        let m = mask(shift_right);
        let mut prev = src[0] >> shift_right;
        // We append a zero to the src iter in case src.len() == dst.len().
        // If src.len() == dst.len() + 1, then the 0 will just be ignored by `zip`.
        for (d, s) in dst.iter_mut().zip(src.iter().skip(1).chain([0].iter())) {
            *d = prev | ((*s) & m) << shift_left;
            prev = (*s) >> shift_right;
        }
    }
    mask_msb(dst, hi - lo + 1);
}

/// Overwrites the `low_width` lsbs of `dst` with `low`. All other bits of `dst` stay untouched.
#[inline]
pub(crate) fn splice_low(dst: &mut [Word], low: &[Word], low_width: WidthInt) {
    debug_assert_eq!(words_for_width(low_width), low.len());
    let full_words = (low_width / Word::BITS) as usize;
    assign(&mut dst[..full_words], low);
    let lsbs_in_msb = low_width % Word::BITS;
    if lsbs_in_msb > 0 {
        let m = mask(lsbs_in_msb);
        dst[full_words] = (dst[full_words] & !m) | (low[full_words] & m);
    }
}

#[inline]
pub(crate) fn not(dst: &mut [Word], source: &[Word], width: WidthInt) {
    bitwise_un_op(dst, source, |e| !e);
    mask_msb(dst, width);
}

#[inline]
fn bitwise_un_op(dst: &mut [Word], source: &[Word], op: fn(Word) -> Word) {
    for (d, s) in dst.iter_mut().zip(source.iter()) {
        *d = (op)(*s);
    }
}

#[inline]
pub(crate) fn and(dst: &mut [Word], a: &[Word], b: &[Word]) {
    bitwise_bin_op(dst, a, b, |a, b| a & b)
}

#[inline]
pub(crate) fn or(dst: &mut [Word], a: &[Word], b: &[Word]) {
    bitwise_bin_op(dst, a, b, |a, b| a | b)
}

#[inline]
pub(crate) fn xor(dst: &mut [Word], a: &[Word], b: &[Word]) {
    bitwise_bin_op(dst, a, b, |a, b| a ^ b)
}

#[inline]
fn bitwise_bin_op(dst: &mut [Word], a: &[Word], b: &[Word], op: fn(Word, Word) -> Word) {
    for (d, (a, b)) in dst.iter_mut().zip(a.iter().zip(b.iter())) {
        *d = (op)(*a, *b);
    }
}

#[inline]
fn adc(dst: &mut Word, carry: u8, a: Word, b: Word) -> u8 {
    let sum = carry as DoubleWord + a as DoubleWord + b as DoubleWord;
    let new_carry = (sum >> Word::BITS) as u8;
    *dst = sum as Word;
    new_carry
}

/// Add function inspired by the num-bigint implementation: https://docs.rs/num-bigint/0.4.4/src/num_bigint/biguint/addition.rs.html
#[inline]
pub(crate) fn add(dst: &mut [Word], a: &[Word], b: &[Word], width: WidthInt) {
    let mut carry = 0;
    for (dd, (aa, bb)) in dst.iter_mut().zip(a.iter().zip(b.iter())) {
        carry = adc(dd, carry, *aa, *bb);
    }
    mask_msb(dst, width);
}

/// Sub function inspired by the num-bigint implementation: https://docs.rs/num-bigint/0.4.4/src/num_bigint/biguint/subtraction.rs.html
#[inline]
pub(crate) fn sub(dst: &mut [Word], a: &[Word], b: &[Word], width: WidthInt) {
    // we add one by setting the input carry to one
    let mut carry = 1;
    for (dd, (aa, bb)) in dst.iter_mut().zip(a.iter().zip(b.iter())) {
        // we invert b which in addition to adding 1 turns it into `-b`
        carry = adc(dd, carry, *aa, !(*bb));
    }
    mask_msb(dst, width);
}

/// Schoolbook multiplication, truncated to `dst.len()` words.
#[inline]
pub(crate) fn mul(dst: &mut [Word], a: &[Word], b: &[Word], width: WidthInt) {
    if let ([dd], [aa], [bb]) = (&mut *dst, a, b) {
        *dd = aa.wrapping_mul(*bb);
    } else {
        clear(dst);
        let len = dst.len();
        for (ii, aa) in a.iter().enumerate().filter(|(_, aa)| **aa != 0) {
            let mut carry: DoubleWord = 0;
            for (jj, bb) in b.iter().enumerate().take(len - ii) {
                let prod = (*aa as DoubleWord) * (*bb as DoubleWord)
                    + dst[ii + jj] as DoubleWord
                    + carry;
                dst[ii + jj] = prod as Word;
                carry = prod >> Word::BITS;
            }
        }
    }
    mask_msb(dst, width);
}

/// Unsigned long division. Computes `a / b` into `quot` and `a % b` into `rem`.
/// `b` must not be zero.
pub(crate) fn udivrem(quot: &mut [Word], rem: &mut [Word], a: &[Word], b: &[Word], width: WidthInt) {
    debug_assert!(!is_zero(b), "division by zero must be caught by the caller");
    let scratch_words = remainder_words(width);
    let mut r = vec![0 as Word; scratch_words];
    let mut d = vec![0 as Word; scratch_words];
    assign(&mut d, b);
    clear(quot);
    for pos in (0..width).rev() {
        shift_left_in_place(&mut r);
        if is_bit_set(a, pos) {
            r[0] |= 1;
        }
        if cmp_greater_equal(&r, &d) {
            sub_in_place(&mut r, &d);
            set_bit(quot, pos);
        }
    }
    assign(rem, &r);
}

/// Words for a running remainder of `width + 1` bits. It needs one extra bit, since it is
/// shifted before being reduced.
#[inline]
fn remainder_words(width: WidthInt) -> usize {
    width as usize / Word::BITS as usize + 1
}

/// Signed division rounding towards zero, the remainder takes the sign of the dividend.
pub(crate) fn sdivrem(quot: &mut [Word], rem: &mut [Word], a: &[Word], b: &[Word], width: WidthInt) {
    let (neg_a, neg_b) = (is_neg(a, width), is_neg(b, width));
    let abs_a = abs(a, width);
    let abs_b = abs(b, width);
    udivrem(quot, rem, &abs_a, &abs_b, width);
    if neg_a != neg_b {
        negate_in_place(quot, width);
    }
    if neg_a {
        negate_in_place(rem, width);
    }
}

/// Magnitude of a two's complement number. The magnitude of the most negative
/// value is its own unsigned interpretation.
#[inline]
fn abs(a: &[Word], width: WidthInt) -> Vec<Word> {
    let mut out = Vec::from(a);
    if is_neg(a, width) {
        negate_in_place(&mut out, width);
    }
    out
}

#[inline]
fn shift_left_in_place(dst: &mut [Word]) {
    let mut carry = 0;
    for d in dst.iter_mut() {
        let next_carry = *d >> (Word::BITS - 1);
        *d = (*d << 1) | carry;
        carry = next_carry;
    }
}

#[inline]
fn sub_in_place(dst: &mut [Word], b: &[Word]) {
    let mut carry = 1;
    for (dd, bb) in dst.iter_mut().zip(b.iter()) {
        let a = *dd;
        carry = adc(dd, carry, a, !(*bb));
    }
}

/// Moves every bit one position towards the msb. Bit 0 becomes zero.
#[inline]
pub(crate) fn shift_left(dst: &mut [Word], a: &[Word], width: WidthInt) {
    assign(dst, a);
    shift_left_in_place(dst);
    mask_msb(dst, width);
}

/// Moves every bit one position towards the lsb. The msb becomes zero.
#[inline]
pub(crate) fn shift_right(dst: &mut [Word], a: &[Word], _width: WidthInt) {
    let mut carry = 0;
    for (d, s) in dst.iter_mut().zip(a.iter()).rev() {
        *d = (*s >> 1) | carry;
        carry = *s << (Word::BITS - 1);
    }
}

/// Like [`shift_right`], but the msb keeps its value.
#[inline]
pub(crate) fn arithmetic_shift_right(dst: &mut [Word], a: &[Word], width: WidthInt) {
    shift_right(dst, a, width);
    if is_neg(a, width) {
        set_bit(dst, width - 1);
    }
}

#[inline]
pub(crate) fn negate(dst: &mut [Word], b: &[Word], width: WidthInt) {
    dst.clone_from_slice(b);
    negate_in_place(dst, width);
}

#[inline]
pub(crate) fn negate_in_place(dst: &mut [Word], width: WidthInt) {
    // we add one by setting the input carry to one
    let mut carry = 1;
    for dd in dst.iter_mut() {
        // we invert b which in addition to adding 1 turns it into `-b`
        let b = !(*dd);
        carry = adc(dd, carry, 0, b);
    }
    mask_msb(dst, width);
}

/// Computes `dst = dst * factor + summand` and returns the carry out of the msb word.
#[inline]
pub(crate) fn mul_add_small(dst: &mut [Word], factor: Word, summand: Word) -> Word {
    let mut carry = summand as DoubleWord;
    for d in dst.iter_mut() {
        let prod = (*d as DoubleWord) * (factor as DoubleWord) + carry;
        *d = prod as Word;
        carry = prod >> Word::BITS;
    }
    carry as Word
}

/// Divides `dst` in place by `divisor` and returns the remainder.
#[inline]
pub(crate) fn div_rem_small(dst: &mut [Word], divisor: Word) -> Word {
    debug_assert_ne!(divisor, 0);
    let mut rem: DoubleWord = 0;
    for d in dst.iter_mut().rev() {
        let cur = (rem << Word::BITS) | (*d as DoubleWord);
        *d = (cur / divisor as DoubleWord) as Word;
        rem = cur % divisor as DoubleWord;
    }
    rem as Word
}

#[inline]
pub(crate) fn is_zero(a: &[Word]) -> bool {
    a.iter().all(|w| *w == 0)
}

#[inline]
pub(crate) fn cmp_equal(a: &[Word], b: &[Word]) -> bool {
    a.iter().zip(b.iter()).all(|(a, b)| a == b)
}

#[inline]
pub(crate) fn cmp_greater(a: &[Word], b: &[Word]) -> bool {
    is_greater_and_not_less(a, b).unwrap_or(false)
}

#[inline]
pub(crate) fn is_neg(src: &[Word], width: WidthInt) -> bool {
    is_bit_set(src, width - 1)
}

#[inline]
pub(crate) fn cmp_greater_signed(a: &[Word], b: &[Word], width: WidthInt) -> bool {
    match (is_neg(a, width), is_neg(b, width)) {
        (true, false) => false, // -|a| < |b|
        (false, true) => true,  // |a| > -|b|
        // same sign: the unsigned order of the encodings is the signed order
        _ => cmp_greater(a, b),
    }
}

/// `Some(true)` if `a > b`, `Some(false)` if `a < b`, None if `a == b`
#[inline]
fn is_greater_and_not_less(a: &[Word], b: &[Word]) -> Option<bool> {
    for (a, b) in a.iter().rev().zip(b.iter().rev()) {
        match a.cmp(b) {
            Ordering::Less => return Some(false),
            Ordering::Equal => {} // continue
            Ordering::Greater => return Some(true),
        }
    }
    None
}

#[inline]
pub(crate) fn cmp_unsigned(a: &[Word], b: &[Word]) -> Ordering {
    match is_greater_and_not_less(a, b) {
        None => Ordering::Equal,
        Some(true) => Ordering::Greater,
        Some(false) => Ordering::Less,
    }
}

#[inline]
pub(crate) fn cmp_greater_equal(a: &[Word], b: &[Word]) -> bool {
    is_greater_and_not_less(a, b).unwrap_or(true)
}

#[inline]
pub(crate) fn cmp_greater_equal_signed(a: &[Word], b: &[Word], width: WidthInt) -> bool {
    match (is_neg(a, width), is_neg(b, width)) {
        (true, false) => false, // -|a| < |b|
        (false, true) => true,  // |a| > -|b|
        _ => cmp_greater_equal(a, b),
    }
}

#[cfg(test)]
pub(crate) fn assert_unused_bits_zero(value: &[Word], width: WidthInt) {
    let offset = width % Word::BITS;
    if offset > 0 {
        let msb = *value.last().unwrap();
        let m = !mask(offset);
        let unused = msb & m;
        assert_eq!(unused, 0, "unused msb bits need to be zero!")
    }
}
