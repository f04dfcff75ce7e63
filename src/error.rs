// Copyright 2024 Cornell University
// released under BSD 3-Clause License
//
// Failures of bit-vector construction and operations. All of them are
// precondition violations, nothing is ever partially computed.

use crate::WidthInt;
use thiserror::Error;

/// The error type for every fallible bit-vector construction, conversion and operation.
///
/// # Error Categories
///
/// - [`Error::Range`] - value does not fit, or a zero width was requested
/// - [`Error::WidthMismatch`] - operand widths differ or `size` exceeds them
/// - [`Error::Direction`] - extension that does not grow, truncation that does not shrink
/// - [`Error::DivisionByZero`] - `udiv`, `urem`, `sdiv` or `srem` with a zero divisor
/// - [`Error::Index`] - bit access outside of `[0, width)`
/// - [`Error::InvalidDigit`] - malformed number string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested value cannot be represented at the requested width.
    ///
    /// `value` is rendered as text, since it may originate from a string, a bit
    /// sequence or an integer.
    #[error("{value} is not representable with {width} bits")]
    Range { value: String, width: WidthInt },

    /// Operands of a sized operation disagree on their width, or the requested
    /// `size` is zero or larger than the operand width.
    #[error("width mismatch: bv<{lhs}> and bv<{rhs}> at size {size}")]
    WidthMismatch {
        lhs: WidthInt,
        rhs: WidthInt,
        size: WidthInt,
    },

    /// Width change in the wrong direction.
    #[error("cannot {op} bv<{from}> to bv<{to}>")]
    Direction {
        op: &'static str,
        from: WidthInt,
        to: WidthInt,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("bit index {index} is out of range [0, {width})")]
    Index { index: WidthInt, width: WidthInt },

    #[error("invalid digit in {0:?}")]
    InvalidDigit(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn range(value: impl std::fmt::Display, width: WidthInt) -> Self {
        Error::Range {
            value: value.to_string(),
            width,
        }
    }
}
