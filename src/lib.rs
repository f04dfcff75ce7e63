// Copyright 2024 Cornell University
// released under BSD 3-Clause License
//
// Fixed-width two's-complement bit-vector values.

mod bv;
mod error;

/// This type restricts the maximum width that a bit-vector value is allowed to have.
pub type WidthInt = u32;

/// Word size for values.
pub type Word = u64;

pub type DoubleWord = u128;

const _: () = assert!(Word::BITS * 2 == DoubleWord::BITS);

pub use bv::*;
pub use error::{Error, Result};
