// Copyright 2024 Cornell University
// released under BSD 3-Clause License
//
// Test string parsing and serialization
use bvw::{BitVecOps, BitVecValue, Error};
use proptest::prelude::*;

fn do_test_from_to_bit_str(s: &str) {
    let value = BitVecValue::from_bit_str(s).unwrap();
    if s.starts_with('-') {
        let signed = value.to_bit_str_signed();
        let reparsed = BitVecValue::from_str_radix(&signed, 2, value.width()).unwrap();
        assert_eq!(reparsed, value, "{s} {signed}");
    } else {
        compare_digit_str(&value.to_bit_str(), s);
    }
}

#[test]
fn test_from_to_bit_str_regression() {
    do_test_from_to_bit_str("+0");
    do_test_from_to_bit_str("-0");
    do_test_from_to_bit_str("-1");
    do_test_from_to_bit_str("-11");
}

fn do_test_from_to_hex_str(s: &str) {
    let value = BitVecValue::from_hex_str(s).unwrap();
    if s.starts_with('-') {
        let signed = value.to_hex_str_signed();
        let reparsed = BitVecValue::from_str_radix(&signed, 16, value.width()).unwrap();
        assert_eq!(reparsed, value, "{s} {signed}");
    } else {
        compare_digit_str(&value.to_hex_str(), s);
    }
}

fn compare_digit_str(ours: &str, original: &str) {
    let expected = original.strip_prefix('+').unwrap_or(original);
    assert_eq!(ours, expected.to_ascii_lowercase());
}

#[test]
fn test_from_to_hex_str_regression() {
    do_test_from_to_hex_str("a");
    do_test_from_to_hex_str("A");
    do_test_from_to_hex_str("0aaaA0a0aAA0aaaA");
    do_test_from_to_hex_str("+A");
    do_test_from_to_hex_str("0");
    do_test_from_to_hex_str("+aaaa0aa0aaaa0aaa00a0aaaaaa00aa00");
    do_test_from_to_hex_str("-aaaa00aaaaaaaaa0");
}

#[test]
fn test_signed_strings() {
    let a = BitVecValue::from_integer(-6, 4).unwrap();
    assert_eq!(a.to_bit_str_signed(), "-0110");
    assert_eq!(a.to_hex_str_signed(), "-6");
    let min = BitVecValue::from_integer(-8, 4).unwrap();
    assert_eq!(min.to_bit_str_signed(), "-1000");
    let b = BitVecValue::from_integer(6, 4).unwrap();
    assert_eq!(b.to_bit_str_signed(), "0110");
}

#[test]
fn test_parse_errors() {
    // an empty digit string is malformed, not out of range
    assert_eq!(
        BitVecValue::from_bit_str(""),
        Err(Error::InvalidDigit(String::new()))
    );
    assert_eq!(
        BitVecValue::from_hex_str("+"),
        Err(Error::InvalidDigit("+".to_string()))
    );
    assert!(matches!(
        BitVecValue::from_hex_str(""),
        Err(Error::InvalidDigit(_))
    ));
    assert!(matches!(
        BitVecValue::from_bit_str("-"),
        Err(Error::InvalidDigit(_))
    ));
    assert!(matches!(
        BitVecValue::from_bit_str("102"),
        Err(Error::InvalidDigit(_))
    ));
    assert!(matches!(
        BitVecValue::from_str_radix("300", 10, 8),
        Err(Error::Range { .. })
    ));
    assert!(matches!(
        BitVecValue::from_str_radix("-129", 10, 8),
        Err(Error::Range { .. })
    ));
    assert!(matches!(
        BitVecValue::from_str_radix("12", 1, 8),
        Err(Error::InvalidDigit(_))
    ));
    assert_eq!(
        BitVecValue::from_str_radix("-128", 10, 8).unwrap(),
        BitVecValue::from_integer(-128, 8).unwrap()
    );
}

fn do_test_to_from_decimal_str(s: &str) {
    let expected = BitVecValue::from_bit_str(s).unwrap();
    let dec_str = expected.to_dec_str();
    let actual = BitVecValue::from_str_radix(&dec_str, 10, expected.width()).unwrap();
    assert_eq!(expected, actual);
}

#[test]
fn test_to_from_dec_str_regression() {
    do_test_to_from_decimal_str("0");
    do_test_to_from_decimal_str("1000000");
    do_test_to_from_decimal_str(&"1".repeat(300));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    #[test]
    fn test_from_to_bit_str(s in "([-+])?[01]{1,300}") {
        do_test_from_to_bit_str(&s);
    }
    #[test]
    fn test_from_to_hex_str(s in "([-+])?[0-9a-fA-F]{1,80}") {
        do_test_from_to_hex_str(&s);
    }
    #[test]
    fn test_to_from_decimal_str(s in "[01]{1,300}") {
        do_test_to_from_decimal_str(&s);
    }
}
