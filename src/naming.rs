//! Output naming: `name` encodes to `name.rle`, `name.rle` expands to `name`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const EXTENSION: &str = ".rle";

/// Name of the encoded file for `source`.
pub fn encoded_name(source: &Path) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// Name of the expanded file for `source`, which must end in `.rle`.
pub fn decoded_name(source: &Path) -> Result<PathBuf> {
    // A bare ".rle" has no extension as far as `Path` is concerned
    if source.extension() == Some(OsStr::new(&EXTENSION[1..])) {
        Ok(source.with_extension(""))
    } else {
        Err(Error::MissingExtension {
            path: source.to_path_buf(),
        })
    }
}
