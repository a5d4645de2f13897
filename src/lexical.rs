//! Lexical index access.
//!
//! This module defines the term dictionary and posting list contracts the
//! searchers consume, plus an in-memory index that implements them.

pub mod core;
pub mod index;
pub mod reader;
