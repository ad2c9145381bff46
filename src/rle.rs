use std::io::{self, BufRead, ErrorKind, Write};
use std::slice::ChunksExact;

use crate::error::DecodeError;
use crate::format::{split_header, Run, HEADER_LEN, MAGIC, MAX_RUN_LEN, RUN_LEN};

const BUFFER_SIZE: usize = 8192; // Flush threshold for encoded output

/// Byte counts reported by [`encode_stream`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

/// Incremental run builder.
///
/// The pending run survives between calls to [`RunEncoder::feed`], so input
/// split into arbitrary chunks encodes exactly like the same bytes fed at once.
#[derive(Debug, Default)]
pub struct RunEncoder {
    pending: Option<Run>,
}

impl RunEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes `input`, appending every run that is complete to `out`.
    pub fn feed(&mut self, input: &[u8], out: &mut Vec<u8>) {
        for &byte in input {
            if let Some(run) = self.pending.as_mut() {
                if run.value == byte && run.count < MAX_RUN_LEN {
                    run.count += 1;
                    continue;
                }
                out.extend_from_slice(&run.to_bytes());
            }
            self.pending = Some(Run::new(1, byte));
        }
    }

    /// Flushes the last pending run, if any.
    pub fn finish(self, out: &mut Vec<u8>) {
        if let Some(run) = self.pending {
            out.extend_from_slice(&run.to_bytes());
        }
    }
}

/// Encodes `input` into a complete `!RLE` stream.
///
/// Empty input still produces the four header bytes.
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + input.len().min(BUFFER_SIZE));
    out.extend_from_slice(&MAGIC);

    let mut encoder = RunEncoder::new();
    encoder.feed(input, &mut out);
    encoder.finish(&mut out);
    out
}

/// Encodes data from a reader to a writer, chunk by chunk.
///
/// # Arguments
/// * `reader` - A mutable reference to a type implementing BufRead (e.g., BufReader<File>)
/// * `writer` - A mutable reference to a type implementing Write (e.g., BufWriter<File>)
///
/// # Returns
/// The number of bytes consumed and produced
pub fn encode_stream(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> io::Result<StreamStats> {
    writer.write_all(&MAGIC)?;

    let mut stats = StreamStats {
        bytes_in: 0,
        bytes_out: HEADER_LEN as u64,
    };
    let mut encoder = RunEncoder::new();
    let mut output_buffer = Vec::with_capacity(BUFFER_SIZE);

    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if chunk.is_empty() {
            break; // End of input stream
        }

        let consumed = chunk.len();
        encoder.feed(chunk, &mut output_buffer);
        reader.consume(consumed);
        stats.bytes_in += consumed as u64;

        if output_buffer.len() >= BUFFER_SIZE {
            writer.write_all(&output_buffer)?;
            stats.bytes_out += output_buffer.len() as u64;
            output_buffer.clear();
        }
    }

    encoder.finish(&mut output_buffer);
    writer.write_all(&output_buffer)?;
    stats.bytes_out += output_buffer.len() as u64;
    writer.flush()?;
    Ok(stats)
}

/// Validated view over the runs of an encoded stream.
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    records: ChunksExact<'a, u8>,
}

impl Iterator for Runs<'_> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        self.records.next().map(|pair| Run::new(pair[0], pair[1]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl ExactSizeIterator for Runs<'_> {}

/// Validates the whole of `encoded` and returns its runs.
///
/// # Errors
/// Returns an error if the header is missing or wrong, a count byte has no
/// value byte after it, or a run has a zero count
pub fn runs(encoded: &[u8]) -> Result<Runs<'_>, DecodeError> {
    let body = split_header(encoded)?;

    if body.len() % RUN_LEN != 0 {
        return Err(DecodeError::TruncatedStream {
            offset: HEADER_LEN + body.len() - 1,
        });
    }

    if let Some(index) = body
        .chunks_exact(RUN_LEN)
        .position(|pair| pair[0] == 0)
    {
        return Err(DecodeError::ZeroCount {
            offset: HEADER_LEN + index * RUN_LEN,
        });
    }

    Ok(Runs {
        records: body.chunks_exact(RUN_LEN),
    })
}

/// Size of the raw data `encoded` expands to.
pub fn decoded_len(encoded: &[u8]) -> Result<usize, DecodeError> {
    Ok(runs(encoded)?.map(|run| usize::from(run.count)).sum())
}

/// Expands an encoded stream back into the raw bytes.
///
/// Nothing is expanded unless the entire stream is well formed.
pub fn decode(encoded: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let runs = runs(encoded)?;
    let total = runs.clone().map(|run| usize::from(run.count)).sum();

    let mut output = Vec::with_capacity(total);
    for run in runs {
        run.expand_into(&mut output);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    fn header_plus(runs: &[u8]) -> Vec<u8> {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(runs);
        bytes
    }

    #[test]
    fn test_encode_empty_is_header_only() {
        let encoded = encode(&[]);
        assert_eq!(encoded, MAGIC.to_vec());
        assert_eq!(decode(&encoded), Ok(Vec::new()));
    }

    #[test]
    fn test_encode_single_byte() {
        assert_eq!(encode(&[0x10]), header_plus(&[1, 0x10]));
    }

    #[test]
    fn test_encode_does_not_merge_separated_values() {
        assert_eq!(
            encode(&[0x01, 0x02, 0x01]),
            header_plus(&[1, 0x01, 1, 0x02, 1, 0x01])
        );
    }

    #[test]
    fn test_encode_caps_runs_at_255() {
        let encoded = encode(&[0xAA; 300]);
        assert_eq!(encoded, header_plus(&[255, 0xAA, 45, 0xAA]));
    }

    #[test]
    fn test_encode_exactly_255_and_256() {
        assert_eq!(encode(&[0x00; 255]), header_plus(&[255, 0x00]));
        assert_eq!(encode(&[0x00; 256]), header_plus(&[255, 0x00, 1, 0x00]));
    }

    #[test]
    fn test_encode_always_starts_with_magic() {
        let inputs: [&[u8]; 4] = [b"", b"x", b"hello", &[0u8; 1000]];
        for input in inputs {
            assert!(encode(input).starts_with(&MAGIC));
        }
    }

    #[test]
    fn test_roundtrip() {
        let inputs: Vec<Vec<u8>> = vec![
            b"AAABBBCCCCCDDDDEFFFGAAAAAAAAA".to_vec(),
            (0..=255u8).collect(),
            (0..2000).map(|i| (i / 300) as u8).collect(),
            vec![0xFF; 1024],
        ];

        for input in inputs {
            let encoded = encode(&input);
            assert_eq!(decoded_len(&encoded), Ok(input.len()));
            assert_eq!(decode(&encoded), Ok(input));
        }
    }

    #[test]
    fn test_chunked_feed_matches_whole_input() {
        let input: Vec<u8> = b"aaaabbbbbbbbbbbbbbbbbbbccd".repeat(40);

        let mut chunked = MAGIC.to_vec();
        let mut encoder = RunEncoder::new();
        for chunk in input.chunks(7) {
            encoder.feed(chunk, &mut chunked);
        }
        encoder.finish(&mut chunked);

        assert_eq!(chunked, encode(&input));
    }

    #[test]
    fn test_stream_matches_buffer_encoding() -> io::Result<()> {
        let input = [vec![0x5A; 600], b"xyz".to_vec(), vec![0x00; 3]].concat();
        let mut compressed = Vec::new();
        // A tiny reader buffer forces runs to straddle fill_buf boundaries
        let mut reader = BufReader::with_capacity(5, Cursor::new(input.clone()));

        let stats = encode_stream(&mut reader, &mut compressed)?;

        assert_eq!(compressed, encode(&input));
        assert_eq!(stats.bytes_in, input.len() as u64);
        assert_eq!(stats.bytes_out, compressed.len() as u64);
        Ok(())
    }

    #[test]
    fn test_stream_empty_input() -> io::Result<()> {
        let mut compressed = Vec::new();
        let stats = encode_stream(&mut Cursor::new(Vec::<u8>::new()), &mut compressed)?;
        assert_eq!(compressed, MAGIC.to_vec());
        assert_eq!(stats, StreamStats { bytes_in: 0, bytes_out: 4 });
        Ok(())
    }

    #[test]
    fn test_decode_rejects_corrupt_header() {
        let result = decode(&[0x00, 0x00, 0x00, 0x00, 0x01, 0xFF]);
        assert_eq!(result, Err(DecodeError::BadMagic { found: [0; 4] }));
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert_eq!(decode(&[]), Err(DecodeError::TooShort { actual: 0 }));
        assert_eq!(decode(b"!RL"), Err(DecodeError::TooShort { actual: 3 }));
    }

    #[test]
    fn test_decode_rejects_dangling_count() {
        assert_eq!(
            decode(&header_plus(&[0x03])),
            Err(DecodeError::TruncatedStream { offset: 4 })
        );
        assert_eq!(
            decode(&header_plus(&[0x02, 0x41, 0x07])),
            Err(DecodeError::TruncatedStream { offset: 6 })
        );
    }

    #[test]
    fn test_decode_rejects_zero_count() {
        assert_eq!(
            decode(&header_plus(&[0x02, 0x41, 0x00, 0x42])),
            Err(DecodeError::ZeroCount { offset: 6 })
        );
    }

    #[test]
    fn test_failure_is_repeatable() {
        let bad = header_plus(&[0x03]);
        let first = decode(&bad);
        assert!(first.is_err());
        for _ in 0..3 {
            assert_eq!(decode(&bad), first);
        }
    }

    #[test]
    fn test_runs_iterates_records() {
        let encoded = header_plus(&[3, 0x41, 1, 0x42]);
        let runs: Vec<Run> = runs(&encoded).unwrap().collect();
        assert_eq!(runs, vec![Run::new(3, 0x41), Run::new(1, 0x42)]);
    }
}
