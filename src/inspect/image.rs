//! Propiedades básicas y etiquetas EXIF de una imagen.

use image::ImageReader;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, ScrubError};

#[derive(Clone, Debug, Serialize)]
pub struct ImageInfo {
    pub format: String,
    pub color: String,
    pub width: u32,
    pub height: u32,
    /// Etiqueta EXIF -> valor legible. Vacío si la imagen no tiene EXIF.
    pub exif: BTreeMap<String, String>,
}

pub fn read_image_info(path: &Path) -> Result<ImageInfo> {
    let reader = ImageReader::open(path)
        .map_err(|e| ScrubError::io(format!("No se pudo abrir {}", path.display()), e))?
        .with_guessed_format()
        .map_err(|e| ScrubError::io(format!("No se pudo leer {}", path.display()), e))?;

    let format = reader
        .format()
        .map(|format| format!("{format:?}").to_uppercase())
        .ok_or_else(|| ScrubError::format(path, "Formato de imagen desconocido"))?;
    let img = reader
        .decode()
        .map_err(|e| ScrubError::format(path, format!("Imagen inválida: {e}")))?;

    Ok(ImageInfo {
        format,
        color: format!("{:?}", img.color()),
        width: img.width(),
        height: img.height(),
        exif: read_exif_tags(path),
    })
}

/// Las imágenes sin EXIF, o con un bloque ilegible, devuelven un mapa vacío.
fn read_exif_tags(path: &Path) -> BTreeMap<String, String> {
    let Ok(file) = File::open(path) else {
        return BTreeMap::new();
    };
    match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(exif) => exif
            .fields()
            .map(|field| {
                (
                    field.tag.to_string(),
                    field.display_value().with_unit(&exif).to_string(),
                )
            })
            .collect(),
        Err(e) => {
            log::debug!("Sin EXIF en {}: {e}", path.display());
            BTreeMap::new()
        }
    }
}
