//! File-to-file compress and expand.
//!
//! Both operations leave no output behind when they fail: compression removes
//! a partially written destination, expansion validates the whole source
//! before the destination is created.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::naming::{decoded_name, encoded_name};
use crate::rle::{decode, encode_stream};

/// What a completed compress or expand did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl Summary {
    /// Output size relative to input size; 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            0.0
        } else {
            self.bytes_out as f64 / self.bytes_in as f64
        }
    }
}

/// Remembers whether the write side of a stream has failed.
struct TrackedWriter<W> {
    inner: W,
    failed: bool,
}

impl<W: Write> TrackedWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            failed: false,
        }
    }

    fn track<T>(&mut self, result: io::Result<T>) -> io::Result<T> {
        // write_all retries interrupted writes itself
        if matches!(&result, Err(e) if e.kind() != io::ErrorKind::Interrupted) {
            self.failed = true;
        }
        result
    }
}

impl<W: Write> Write for TrackedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        self.track(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.flush();
        self.track(result)
    }
}

/// Whether writing `destination` would clobber `source`.
fn same_file(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => source == destination,
    }
}

fn ensure_distinct(source: &Path, destination: &Path) -> Result<()> {
    if same_file(source, destination) {
        return Err(Error::SameFile {
            path: destination.to_path_buf(),
        });
    }
    Ok(())
}

fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("could not remove partial output {:?}: {}", path, e);
    }
}

/// Encodes `source` into `destination`, defaulting to `source` + `.rle`.
pub fn compress_file(source: &Path, destination: Option<&Path>) -> Result<Summary> {
    let destination = destination.map_or_else(|| encoded_name(source), Path::to_path_buf);
    debug!("compressing {:?} -> {:?}", source, destination);
    ensure_distinct(source, &destination)?;

    let input = File::open(source).map_err(|e| Error::SourceUnreadable {
        path: source.to_path_buf(),
        source: e,
    })?;
    let output = File::create(&destination).map_err(|e| Error::DestinationUnwritable {
        path: destination.clone(),
        source: e,
    })?;

    let mut reader = BufReader::new(input);
    let mut writer = TrackedWriter::new(BufWriter::new(output));

    let stats = match encode_stream(&mut reader, &mut writer) {
        Ok(stats) => stats,
        Err(e) => {
            let err = if writer.failed {
                Error::DestinationUnwritable {
                    path: destination.clone(),
                    source: e,
                }
            } else {
                Error::SourceUnreadable {
                    path: source.to_path_buf(),
                    source: e,
                }
            };
            drop(writer);
            remove_partial(&destination);
            return Err(err);
        }
    };

    info!(
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        "compressed {:?}",
        source
    );

    Ok(Summary {
        source: source.to_path_buf(),
        destination,
        bytes_in: stats.bytes_in,
        bytes_out: stats.bytes_out,
    })
}

/// Expands `source`, which must end in `.rle`, into `destination`
/// (defaulting to `source` without the suffix).
pub fn expand_file(source: &Path, destination: Option<&Path>) -> Result<Summary> {
    let default_destination = decoded_name(source)?;
    let destination = destination.map_or(default_destination, Path::to_path_buf);
    debug!("expanding {:?} -> {:?}", source, destination);
    ensure_distinct(source, &destination)?;

    let encoded = fs::read(source).map_err(|e| Error::SourceUnreadable {
        path: source.to_path_buf(),
        source: e,
    })?;
    let raw = decode(&encoded)?;

    let output = File::create(&destination).map_err(|e| Error::DestinationUnwritable {
        path: destination.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(output);
    if let Err(e) = writer.write_all(&raw).and_then(|()| writer.flush()) {
        drop(writer);
        remove_partial(&destination);
        return Err(Error::DestinationUnwritable {
            path: destination,
            source: e,
        });
    }

    info!(
        bytes_in = encoded.len(),
        bytes_out = raw.len(),
        "expanded {:?}",
        source
    );

    Ok(Summary {
        source: source.to_path_buf(),
        destination,
        bytes_in: encoded.len() as u64,
        bytes_out: raw.len() as u64,
    })
}
