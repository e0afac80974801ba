//! Disk I/O: construction-time load and whole-file replace.
//!
//! Every write goes through a temp file plus rename, so the backing file
//! is always either the old snapshot or the new one, never a torn mix.
//! Rename is only near-atomic on mainstream filesystems; FAT32 and
//! network shares make no hard promises, so keep backups there.

use crate::error::{Error, Result};
use crate::serializer::Serializer;
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Reads and deserializes the file at `path`.
///
/// A missing or zero-length file yields an empty object (not an error).
/// An existing file must be openable for both reading and writing — a
/// store that could never sync back is refused at construction instead
/// of failing on the first mutation.
pub fn load<S: Serializer>(path: &Path, serializer: &S) -> Result<Map<String, Value>> {
    let meta = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(Error::PermissionDenied(format!(
                "cannot access {}: {e}",
                path.display()
            )))
        }
        Err(e) => {
            return Err(Error::Io(format!(
                "cannot stat {}: {e}",
                path.display()
            )))
        }
    };

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => Error::PermissionDenied(format!(
                "need read+write access to {}: {e}",
                path.display()
            )),
            _ => Error::Io(format!("cannot open {}: {e}", path.display())),
        })?;

    if meta.len() == 0 {
        return Ok(Map::new());
    }

    let mut bytes = Vec::with_capacity(meta.len() as usize);
    file.read_to_end(&mut bytes)
        .map_err(|e| Error::Io(format!("cannot read {}: {e}", path.display())))?;
    serializer.deserialize(&bytes)
}

/// Write `bytes` to `<path>.tmp` and then rename over `path`. This avoids
/// leaving a half-written file if the process crashes mid-write, and makes
/// every sync a total-file replace.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
    let tmp = path.with_extension(format!("{ext}.tmp"));
    std::fs::write(&tmp, bytes).map_err(|e| write_error(&tmp, &e))?;
    std::fs::rename(&tmp, path).map_err(|e| write_error(path, &e))?;
    Ok(())
}

fn write_error(path: &Path, err: &std::io::Error) -> Error {
    if err.kind() == ErrorKind::PermissionDenied {
        Error::PermissionDenied(format!("cannot write {}: {err}", path.display()))
    } else {
        Error::Io(format!("cannot write {}: {err}", path.display()))
    }
}
