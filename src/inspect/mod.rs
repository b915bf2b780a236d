//! Inspección de un archivo: tipo, tamaño, fecha, hashes y, si es una
//! imagen, sus propiedades y etiquetas EXIF.

mod hashing;
mod image;
mod mime;

pub use hashing::{HashSummary, file_hashes};
pub use image::{ImageInfo, read_image_info};
pub use mime::{FileType, FileTypeCache};

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScrubError};

/// Informe completo de un archivo, serializable a JSON.
#[derive(Clone, Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<String>,
    pub file_type: FileType,
    pub hashes: HashSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInfo>,
}

pub fn inspect_file(path: &Path, cache: &mut FileTypeCache) -> Result<FileReport> {
    let file_type = cache.detect(path)?;
    let metadata = fs::metadata(path)
        .map_err(|e| ScrubError::io(format!("No se pudo leer {}", path.display()), e))?;

    let image = if file_type.mime.starts_with("image/") {
        match read_image_info(path) {
            Ok(info) => Some(info),
            Err(e) => {
                log::warn!("No se pudieron leer las propiedades de imagen: {e}");
                None
            }
        }
    } else {
        None
    };

    Ok(FileReport {
        path: path.to_path_buf(),
        size: metadata.len(),
        modified: metadata.modified().ok().map(|time| {
            let datetime: DateTime<Local> = time.into();
            datetime.format("%Y-%m-%d %H:%M:%S %Z").to_string()
        }),
        file_type,
        hashes: file_hashes(path)?,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{TestResult, create_jpeg_with_exif};
    use tempfile::tempdir;

    #[test]
    fn report_includes_image_section_for_images() -> TestResult {
        let dir = tempdir()?;
        let photo = dir.path().join("foto.jpg");
        create_jpeg_with_exif(&photo)?;
        let notes = dir.path().join("notas.txt");
        fs::write(&notes, "hola\n")?;

        let mut cache = FileTypeCache::new();
        let report = inspect_file(&photo, &mut cache)?;
        assert_eq!(report.file_type.mime, "image/jpeg");
        assert!(report.image.is_some());
        assert!(report.modified.is_some());

        let report = inspect_file(&notes, &mut cache)?;
        assert_eq!(report.size, 5);
        assert!(report.image.is_none());

        let json = serde_json::to_value(&report)?;
        assert_eq!(json["file_type"]["mime"], "text/plain");
        assert!(json.get("image").is_none());
        Ok(())
    }
}
