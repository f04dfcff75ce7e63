// Copyright 2024 Cornell University
// released under BSD 3-Clause License
//
// Textual views of bit-vector values and number parsing.

use crate::bv::arithmetic::{
    div_rem_small, is_bit_set, is_neg, mask, mul_add_small, negate_in_place,
};
use crate::{Error, Result, WidthInt, Word};

/// Separator between groups of four binary digits.
const GROUP_SEPARATOR: char = '\'';

/// Magnitude of a negative two's complement number, or the number itself.
fn magnitude(values: &[Word], width: WidthInt) -> Vec<Word> {
    let mut copy = Vec::from(values);
    if is_neg(values, width) {
        negate_in_place(&mut copy, width);
    }
    copy
}

/// Interprets the bits as a two's complement integer.
pub(crate) fn to_bit_str_signed(values: &[Word], width: WidthInt) -> String {
    if is_neg(values, width) {
        format!("-{}", to_bit_str(&magnitude(values, width), width))
    } else {
        to_bit_str(values, width)
    }
}

pub(crate) fn to_bit_str(values: &[Word], width: WidthInt) -> String {
    (0..width)
        .rev()
        .map(|pos| if is_bit_set(values, pos) { '1' } else { '0' })
        .collect()
}

/// Binary digits without leading zeros, grouped by four and prefixed with `0b`.
pub(crate) fn to_binary_text(values: &[Word], width: WidthInt) -> String {
    let msb = (0..width).rev().find(|pos| is_bit_set(values, *pos));
    let mut out = String::from("0b");
    match msb {
        None => out.push('0'),
        Some(msb) => {
            for pos in (0..=msb).rev() {
                out.push(if is_bit_set(values, pos) { '1' } else { '0' });
                if pos % 4 == 0 && pos != 0 {
                    out.push(GROUP_SEPARATOR);
                }
            }
        }
    }
    out
}

/// 4 bits fit into a single hex digit
const BITS_PER_HEX_DIGIT: u32 = 4;
const WORD_HEX_DIGITS: u32 = Word::BITS / BITS_PER_HEX_DIGIT;
const WORD_HEX_MASK: Word = ((1 as Word) << BITS_PER_HEX_DIGIT) - 1;

/// Interprets the bits as a two's complement integer.
pub(crate) fn to_hex_str_signed(values: &[Word], width: WidthInt) -> String {
    if is_neg(values, width) {
        format!("-{}", to_hex_str(&magnitude(values, width), width))
    } else {
        to_hex_str(values, width)
    }
}

pub(crate) fn to_hex_str(values: &[Word], width: WidthInt) -> String {
    debug_assert_eq!(width.div_ceil(Word::BITS) as usize, values.len());
    let mut out = String::with_capacity(width.div_ceil(BITS_PER_HEX_DIGIT) as usize);
    let bits_in_msb = width % Word::BITS;
    let digits_in_msb = bits_in_msb.div_ceil(BITS_PER_HEX_DIGIT);
    let skip_num = if digits_in_msb > 0 {
        let msb = values[values.len() - 1];
        for ii in (0..digits_in_msb).rev() {
            push_hex_digit(&mut out, msb >> (ii * BITS_PER_HEX_DIGIT));
        }
        1
    } else {
        0
    };
    for word in values.iter().rev().skip(skip_num) {
        for ii in (0..WORD_HEX_DIGITS).rev() {
            push_hex_digit(&mut out, word >> (ii * BITS_PER_HEX_DIGIT));
        }
    }
    out
}

#[inline]
fn push_hex_digit(out: &mut String, value: Word) {
    let digit = (value & WORD_HEX_MASK) as u8;
    out.push(match digit {
        0..=9 => (b'0' + digit) as char,
        _ => (b'a' + digit - 10) as char,
    });
}

/// Hex digits without leading zeros, prefixed with `0x`.
pub(crate) fn to_hex_text(values: &[Word], width: WidthInt) -> String {
    let digits = to_hex_str(values, width);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{digits}")
    }
}

/// Largest power of ten that fits into a word.
const DEC_CHUNK: Word = 10_000_000_000_000_000_000;
const DEC_CHUNK_DIGITS: usize = 19;

pub(crate) fn to_dec_str(values: &[Word]) -> String {
    match words_used(values) {
        0 => "0".to_string(),
        1 => values[0].to_string(),
        2 => words_to_u128(values).to_string(),
        used => to_dec_str_wide(&values[0..used]),
    }
}

/// Returns the number of lsb words that are non-zero
#[inline]
fn words_used(words: &[Word]) -> usize {
    let mut len = words.len();
    for &w in words.iter().rev() {
        if w != 0 {
            return len;
        }
        len -= 1;
    }
    0 // all words are zero
}

#[inline]
fn words_to_u128(words: &[Word]) -> u128 {
    debug_assert!(words.len() >= 2);
    debug_assert_eq!(Word::BITS * 2, u128::BITS);
    ((words[1] as u128) << Word::BITS) | words[0] as u128
}

fn to_dec_str_wide(words: &[Word]) -> String {
    let mut rest = Vec::from(words);
    let mut chunks = vec![];
    while words_used(&rest) > 0 {
        chunks.push(div_rem_small(&mut rest, DEC_CHUNK));
    }
    let mut out = String::with_capacity(chunks.len() * DEC_CHUNK_DIGITS);
    if let Some((msb, lsbs)) = chunks.split_last() {
        out.push_str(&msb.to_string());
        for chunk in lsbs.iter().rev() {
            out.push_str(&format!("{chunk:0width$}", width = DEC_CHUNK_DIGITS));
        }
    }
    out
}

pub(crate) fn determine_width_from_str_radix(value: &str, radix: u32) -> WidthInt {
    debug_assert!(
        radix == 2 || radix == 16,
        "only works for 2 or 16 bit basis"
    );
    let starts_with_minus = value.starts_with('-');
    let num_digits = match value.as_bytes() {
        [] => 0,
        [b'+' | b'-'] => 0,
        [b'+' | b'-', digits @ ..] => digits.len() as WidthInt,
        digits => digits.len() as WidthInt,
    };

    let base_width = match radix {
        2 => num_digits,
        _ => num_digits * BITS_PER_HEX_DIGIT,
    };
    base_width + starts_with_minus as WidthInt
}

/// Converts a number string into a bit vector value. Similar to `from_str_radix` in the
/// Rust standard library. The words in `out` need to be zero.
pub(crate) fn from_str_radix(
    value: &str,
    radix: u32,
    out: &mut [Word],
    width: WidthInt,
) -> Result<()> {
    if !(2..=36).contains(&radix) {
        return Err(Error::InvalidDigit(value.to_string()));
    }
    let (is_negative, digits) = match value.as_bytes() {
        [b'-', digits @ ..] => (true, digits),
        [b'+', digits @ ..] => (false, digits),
        digits => (false, digits),
    };
    if digits.is_empty() {
        return Err(Error::InvalidDigit(value.to_string()));
    }

    let unused_msbs = !mask(width % Word::BITS);
    for &cc in digits {
        let digit = (cc as char)
            .to_digit(radix)
            .ok_or_else(|| Error::InvalidDigit(value.to_string()))?;
        let carry = mul_add_small(out, radix as Word, digit as Word);
        let overflow = width % Word::BITS > 0 && out[out.len() - 1] & unused_msbs != 0;
        if carry != 0 || overflow {
            return Err(Error::range(value, width));
        }
    }

    if is_negative {
        // the magnitude may be at most 2^(width-1)
        if is_neg(out, width) && !is_min_signed(out, width) {
            return Err(Error::range(value, width));
        }
        negate_in_place(out, width);
    }
    Ok(())
}

/// Only the msb is set.
fn is_min_signed(values: &[Word], width: WidthInt) -> bool {
    (0..width - 1).all(|pos| !is_bit_set(values, pos))
}
