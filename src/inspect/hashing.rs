//! Huellas MD5 y SHA-256 para comparar un archivo antes y después de limpiarlo.

use md5::Md5;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, ScrubError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HashSummary {
    pub md5: String,
    pub sha256: String,
}

/// Calcula ambos hashes en una sola lectura del archivo.
pub fn file_hashes(path: &Path) -> Result<HashSummary> {
    let mut file = File::open(path)
        .map_err(|e| ScrubError::io(format!("No se pudo abrir {}", path.display()), e))?;

    let mut md5 = Md5::new();
    let mut sha256 = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = file
            .read(&mut buffer)
            .map_err(|e| ScrubError::io(format!("No se pudo leer {}", path.display()), e))?;
        if read == 0 {
            break;
        }
        md5.update(&buffer[..read]);
        sha256.update(&buffer[..read]);
    }

    Ok(HashSummary {
        md5: format!("{:x}", md5.finalize()),
        sha256: format!("{:x}", sha256.finalize()),
    })
}
