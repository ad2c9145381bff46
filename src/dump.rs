//! Plain hex dump for eyeballing raw and encoded files.

use std::fs;
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const BYTES_PER_LINE: usize = 16;

/// Formats one line: offset, eight two-byte groups, then the printable bytes.
pub fn format_line(offset: u64, bytes: &[u8]) -> String {
    let mut line = format!("{offset:08x}: ");

    for pair in 0..BYTES_PER_LINE / 2 {
        for i in [pair * 2, pair * 2 + 1] {
            match bytes.get(i) {
                Some(b) => line.push_str(&format!("{b:02x}")),
                None => line.push_str("  "),
            }
        }
        line.push(' ');
    }

    line.push(' ');
    line.extend(bytes.iter().map(|&b| {
        if (0x20..=0x7e).contains(&b) {
            char::from(b)
        } else {
            '.'
        }
    }));
    line
}

/// Fills `buf` as far as the reader allows, returning how much was read.
fn read_line_bytes(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Writes a hex dump of everything in `reader` and returns the byte count.
pub fn dump(reader: &mut impl Read, writer: &mut impl Write) -> io::Result<u64> {
    let mut buffer = [0u8; BYTES_PER_LINE];
    let mut offset = 0u64;

    loop {
        let n = read_line_bytes(reader, &mut buffer)?;
        if n == 0 {
            break;
        }
        writeln!(writer, "{}", format_line(offset, &buffer[..n]))?;
        offset += n as u64;
    }

    writer.flush()?;
    Ok(offset)
}

pub fn dump_file(path: &Path, writer: &mut impl Write) -> Result<u64> {
    let data = fs::read(path).map_err(|source| Error::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    // "-" names the caller's writer, usually stdout
    dump(&mut data.as_slice(), writer).map_err(|source| Error::DestinationUnwritable {
        path: PathBuf::from("-"),
        source,
    })
}
