//! Whole-file replace through a temporary file and rename.
//!
//! The temporary file lives in the target's directory so the final rename
//! never crosses a filesystem; readers see either the old or the new file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::StorageError;

pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let dir = parent_dir(path);
    fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|source| StorageError::Io {
        path: dir.clone(),
        source,
    })?;
    tmp.write_all(contents)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|source| StorageError::Io {
            path: tmp.path().to_path_buf(),
            source,
        })?;

    // The temporary file starts out owner-only; keep the target's mode.
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|source| StorageError::Io {
                path: tmp.path().to_path_buf(),
                source,
            })?;
    }

    // Dropping the PersistError removes the temporary file.
    tmp.persist(path).map_err(|err| StorageError::Io {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
