//! Respaldo opcional del archivo original antes de limpiarlo.

use log::{info, warn};
use std::ffi::OsString;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use super::constants::BACKUP_SUFFIX;

/// Copia `path` a `path.backup` conservando permisos y fechas.
///
/// Un fallo solo se registra: el respaldo nunca detiene la limpieza.
pub fn create_backup(path: &Path) -> Option<PathBuf> {
    let backup_path = backup_path_for(path);
    match copy_with_times(path, &backup_path) {
        Ok(()) => {
            info!("Respaldo creado: {}", backup_path.display());
            Some(backup_path)
        }
        Err(error) => {
            warn!(
                "No se pudo crear el respaldo de {}: {error}",
                path.display()
            );
            None
        }
    }
}

pub(crate) fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn copy_with_times(source: &Path, target: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    // fs::copy ya replica los permisos.
    fs::copy(source, target)?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    // Basta un descriptor de lectura: la copia hereda el modo del origen y
    // puede ser de solo lectura.
    File::open(target)?.set_times(times)
}
