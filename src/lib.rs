//! Run-length encoding for arbitrary binary files.
//!
//! Encoded streams start with the magic header `!RLE` followed by
//! `(count, value)` byte pairs until end of file. See [`format`] for the layout.

pub mod dump;
pub mod error;
pub mod files;
pub mod fixture;
pub mod format;
pub mod naming;
pub mod rle;

pub use error::{DecodeError, Error, Result};
pub use files::{compress_file, expand_file, Summary};
pub use format::{Run, MAGIC};
pub use rle::{decode, encode, encode_stream};
