//! Index implementations.

pub mod memory;
