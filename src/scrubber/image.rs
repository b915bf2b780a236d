//! Limpieza de imágenes reconstruyendo los píxeles en un búfer nuevo.

use image::{DynamicImage, ImageBuffer, ImageReader};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::placement::{commit, discard, resolve_output, temp_sibling};
use super::request::{ScrubRequest, ScrubResult};
use super::backup_if_requested;
use crate::error::{Result, ScrubError};

/// Copia solo las muestras de píxel a una imagen recién construida y la
/// guarda en la salida. Ningún bloque EXIF, XMP o de texto sobrevive.
pub(crate) fn scrub_image(request: &ScrubRequest) -> Result<ScrubResult> {
    let input = &request.input;
    backup_if_requested(request);

    let output = resolve_output(input, request.output.as_deref());

    let img = ImageReader::open(input)
        .map_err(|e| ScrubError::io(format!("No se pudo abrir {}", input.display()), e))?
        .with_guessed_format()
        .map_err(|e| ScrubError::io(format!("No se pudo leer {}", input.display()), e))?
        .decode()
        .map_err(|e| ScrubError::format(input, format!("No se pudo decodificar la imagen: {e}")))?;

    let clean = rebuild_pixels(&img)
        .ok_or_else(|| ScrubError::format(input, "El búfer de píxeles no coincide con sus dimensiones"))?;

    let temp_path = temp_sibling(&output);
    if let Err(e) = clean.save(&temp_path) {
        discard(&temp_path);
        return Err(ScrubError::format(
            &output,
            format!("No se pudo guardar la imagen limpia: {e}"),
        ));
    }

    match verify_image_metadata_clean(&temp_path) {
        Ok(true) => {}
        Ok(false) => {
            discard(&temp_path);
            return Err(ScrubError::format(
                input,
                "La verificación indicó que la metadata no se eliminó correctamente",
            ));
        }
        Err(e) => {
            discard(&temp_path);
            return Err(e);
        }
    }

    commit(&temp_path, &output)?;
    info!(
        "Imagen limpia: {} -> {}",
        input.display(),
        output.display()
    );
    Ok(ScrubResult::scrubbed(&output))
}

/// Construye una imagen nueva con las mismas dimensiones, modo de color y
/// muestras que `img`. Devuelve `None` si el búfer no cuadra.
fn rebuild_pixels(img: &DynamicImage) -> Option<DynamicImage> {
    let (width, height) = (img.width(), img.height());
    let rebuilt = match img {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageRgb8(buf) => {
            DynamicImage::ImageRgb8(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageRgba8(buf) => {
            DynamicImage::ImageRgba8(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageLuma16(buf) => {
            DynamicImage::ImageLuma16(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageLumaA16(buf) => {
            DynamicImage::ImageLumaA16(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageRgb16(buf) => {
            DynamicImage::ImageRgb16(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageRgba16(buf) => {
            DynamicImage::ImageRgba16(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageRgb32F(buf) => {
            DynamicImage::ImageRgb32F(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        DynamicImage::ImageRgba32F(buf) => {
            DynamicImage::ImageRgba32F(ImageBuffer::from_raw(width, height, buf.as_raw().clone())?)
        }
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    };
    Some(rebuilt)
}

/// Comprueba que una imagen carece de campos EXIF residuales y, si es PNG,
/// de fragmentos de texto o eXIf.
pub fn verify_image_metadata_clean(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|e| {
        ScrubError::io("No se pudo abrir la imagen limpia para verificación", e)
    })?;
    let mut reader = BufReader::new(file);

    let exif_clean = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif.fields().next().is_none(),
        Err(exif::Error::NotFound(_)) | Err(exif::Error::BlankValue(_)) => true,
        Err(exif::Error::InvalidFormat(_)) => true,
        Err(exif::Error::Io(err)) => {
            return Err(ScrubError::io(
                "No se pudo leer metadata EXIF durante la verificación",
                err,
            ));
        }
        Err(other) => {
            return Err(ScrubError::format(
                path,
                format!("Error verificando metadata EXIF: {other}"),
            ));
        }
    };

    if !exif_clean {
        return Ok(false);
    }

    if is_png(path) {
        return png_chunks_clean(path);
    }

    Ok(true)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn png_chunks_clean(path: &Path) -> Result<bool> {
    let file = File::open(path)
        .map_err(|e| ScrubError::io("No se pudo abrir el PNG para verificación", e))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let reader = decoder
        .read_info()
        .map_err(|e| ScrubError::format(path, format!("PNG inválido: {e}")))?;
    let info = reader.info();

    Ok(info.uncompressed_latin1_text.is_empty()
        && info.compressed_latin1_text.is_empty()
        && info.utf8_text.is_empty()
        && info.exif_metadata.is_none())
}
