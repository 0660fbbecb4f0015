//! # Mirror Serde
//! Byte-level encoding shared by the scene mirror source & observer crates.
//!
//! Everything is little-endian. Strings carry a 7-bit variable-length byte count.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod error;
mod integer;
mod number;
mod serde;
mod stream_reader;
mod stream_writer;
mod string;
mod vector;

pub use error::SerdeErr;
pub use integer::UnsignedVariableInteger;
pub use serde::Serde;
pub use stream_reader::StreamReader;
pub use stream_writer::{ByteWrite, StreamWriter};
