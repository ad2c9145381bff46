//! Error types for the codec and the file layer around it.
//!
//! The codec itself only fails while decoding; everything else is I/O at the
//! caller boundary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::{HEADER_LEN, MAGIC};

/// Structural problems found in an encoded stream.
///
/// Decoding validates the whole stream before producing output, so any of
/// these means nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes than the header needs
    #[error("stream too short: need at least {} header bytes, got {actual}", HEADER_LEN)]
    TooShort { actual: usize },

    /// First four bytes are not the magic header
    #[error("invalid magic header: expected {:02x?}, got {found:02x?}", MAGIC)]
    BadMagic { found: [u8; HEADER_LEN] },

    /// Dangling count byte with no value byte after it
    #[error("truncated stream: dangling count byte at offset {offset}")]
    TruncatedStream { offset: usize },

    /// A run claiming zero repeats
    #[error("invalid run at offset {offset}: count cannot be zero")]
    ZeroCount { offset: usize },
}

/// Errors surfaced by the file-level operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Input file could not be opened or read
    #[error("failed to read {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output file could not be created or written
    #[error("failed to write {}: {source}", path.display())]
    DestinationUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output path names the input file
    #[error("refusing to overwrite input {} with its own output", path.display())]
    SameFile { path: PathBuf },

    /// Expansion was asked for a file without the `.rle` suffix
    #[error("{} does not have the '.rle' extension", path.display())]
    MissingExtension { path: PathBuf },

    /// Encoded content failed validation
    #[error("invalid encoded stream: {0}")]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
