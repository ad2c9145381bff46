//! A small file with known contents, handy for checking the tool by hand.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// 100 bytes mixing single bytes, short runs and one run of 46 x `0xf7`.
pub const FIXTURE: [u8; 100] = [
    0xee, 0x5d, 0x41, 0x41, 0x41, 0x8e, 0x2a, 0x3a, 0x3a, 0x3a, 0x3a, 0xe8, 0xbd,
    0x22, 0x88, 0x0a, 0xac, 0xac, 0xac, 0x9a, 0x51, 0x3a, 0x3a, 0x3a, 0xaa, 0xaa,
    0xaa, 0x31, 0x61, 0x27, 0xa7, 0x7e, 0x6d, 0x52, 0xd8, 0x74, 0x6a, 0x6f, 0x6e,
    0x4e, 0xe8, 0x90, 0xa0, 0x7d, 0x88, 0x64, 0x12, 0x21, 0xdb, 0xae, 0xf7, 0xf7,
    0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7,
    0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7,
    0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xf7,
    0xf7, 0xf7, 0xf7, 0xf7, 0xf7, 0xaa, 0xaa, 0xbb, 0xbb,
];

/// Writes [`FIXTURE`] to `path`, returning the number of bytes written.
pub fn generate_file(path: &Path) -> Result<usize> {
    fs::write(path, FIXTURE).map_err(|source| Error::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FIXTURE.len())
}
