//! Wire format shared by the encoder and the decoder.
//!
//! ```text
//! offset 0..4   21 52 4c 45        "!RLE"
//! offset 4..    (count, value)*    until end of stream
//! ```

use crate::error::DecodeError;

/// Number of bytes in the magic header.
pub const HEADER_LEN: usize = 4;

/// Magic header written at the start of every encoded stream.
pub const MAGIC: [u8; HEADER_LEN] = *b"!RLE";

/// Longest run a single record can describe.
pub const MAX_RUN_LEN: u8 = u8::MAX;

/// Size of one serialized run record.
pub const RUN_LEN: usize = 2;

/// One `(count, value)` record: `value` repeated `count` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub count: u8,
    pub value: u8,
}

impl Run {
    pub fn new(count: u8, value: u8) -> Self {
        Self { count, value }
    }

    /// Serialized form, count first.
    pub fn to_bytes(self) -> [u8; RUN_LEN] {
        [self.count, self.value]
    }

    pub fn expand_into(self, out: &mut Vec<u8>) {
        out.resize(out.len() + usize::from(self.count), self.value);
    }
}

/// Checks the magic header and returns the run section that follows it.
pub fn split_header(bytes: &[u8]) -> Result<&[u8], DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::TooShort {
            actual: bytes.len(),
        });
    }

    let (header, body) = bytes.split_at(HEADER_LEN);
    if header != MAGIC {
        let mut found = [0u8; HEADER_LEN];
        found.copy_from_slice(header);
        return Err(DecodeError::BadMagic { found });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_spells_bang_rle() {
        assert_eq!(MAGIC, [0x21, 0x52, 0x4C, 0x45]);
    }

    #[test]
    fn test_run_bytes_are_count_first() {
        assert_eq!(Run::new(3, 0x41).to_bytes(), [3, 0x41]);
    }

    #[test]
    fn test_expand_into_appends() {
        let mut out = vec![0x01];
        Run::new(3, 0x7f).expand_into(&mut out);
        assert_eq!(out, vec![0x01, 0x7f, 0x7f, 0x7f]);
    }

    #[test]
    fn test_split_header() {
        assert_eq!(split_header(b"!RLE\x02\x41"), Ok(&[0x02, 0x41][..]));
        assert_eq!(split_header(b"!RLE"), Ok(&[][..]));
        assert_eq!(
            split_header(b"!RL"),
            Err(DecodeError::TooShort { actual: 3 })
        );
        assert_eq!(
            split_header(b"RLE!\x01\x00"),
            Err(DecodeError::BadMagic { found: *b"RLE!" })
        );
    }
}
