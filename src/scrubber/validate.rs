//! Validación de rutas de entrada previa a cualquier modificación.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScrubError};

/// Confirma que `path` existe, es un archivo regular y se puede leer.
pub fn validate_file(path: &Path) -> Result<PathBuf> {
    let metadata = fs::metadata(path).map_err(|error| match error.kind() {
        ErrorKind::NotFound => ScrubError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ScrubError::Unreadable {
            path: path.to_path_buf(),
            source: error,
        },
    })?;

    if metadata.is_dir() {
        return Err(ScrubError::IsDirectory {
            path: path.to_path_buf(),
        });
    }

    if !metadata.is_file() {
        return Err(ScrubError::Unreadable {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::InvalidInput, "no es un archivo regular"),
        });
    }

    File::open(path).map_err(|error| ScrubError::Unreadable {
        path: path.to_path_buf(),
        source: error,
    })?;

    Ok(path.to_path_buf())
}
