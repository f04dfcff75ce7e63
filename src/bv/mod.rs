// Copyright 2024 Cornell University
// released under BSD 3-Clause License

mod arithmetic;
mod io;
mod ops;
mod owned;

pub use ops::{check_binary_size, check_unary_size, BitVecOps};
pub use owned::BitVecValue;
pub(crate) use owned::BitVecMutOps;
