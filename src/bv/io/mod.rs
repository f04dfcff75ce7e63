// Copyright 2024 Cornell University
// released under BSD 3-Clause License

#[cfg(feature = "bigint")]
pub(crate) mod bigint;
pub(crate) mod strings;
