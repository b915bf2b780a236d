use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{Result, ScrubError};

/// Copia un paquete ZIP entrada por entrada a `target`, pasando el contenido
/// de cada archivo por `transform`. Devuelve si alguna entrada cambió.
///
/// Compresión, permisos y fechas de cada entrada se conservan.
pub(super) fn rewrite_package<F>(source: &Path, target: &Path, mut transform: F) -> Result<bool>
where
    F: FnMut(&str, Vec<u8>) -> Result<(Vec<u8>, bool)>,
{
    let file = File::open(source)
        .map_err(|e| ScrubError::io(format!("No se pudo abrir {}", source.display()), e))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ScrubError::format(source, format!("No es un documento Office válido: {e}")))?;

    let out = File::create(target)
        .map_err(|e| ScrubError::io("No se pudo crear el documento limpio", e))?;
    let mut writer = ZipWriter::new(BufWriter::new(out));
    let zip_error = |e: zip::result::ZipError| {
        ScrubError::format(source, format!("Error en el paquete ZIP: {e}"))
    };

    let mut changed_any = false;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(zip_error)?;
        let name = entry.name().to_string();

        let mut options =
            SimpleFileOptions::default().compression_method(entry.compression());
        if let Some(mode) = entry.unix_mode() {
            options = options.unix_permissions(mode);
        }
        if let Some(time) = entry.last_modified() {
            options = options.last_modified_time(time);
        }

        if entry.is_dir() {
            writer.add_directory(name, options).map_err(zip_error)?;
            continue;
        }

        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut contents)
            .map_err(|e| ScrubError::io(format!("No se pudo leer la entrada {name}"), e))?;

        let (data, changed) = transform(&name, contents)?;
        changed_any |= changed;

        writer.start_file(name.as_str(), options).map_err(zip_error)?;
        writer
            .write_all(&data)
            .map_err(|e| ScrubError::io(format!("No se pudo escribir la entrada {name}"), e))?;
    }

    let mut inner = writer.finish().map_err(zip_error)?;
    inner
        .flush()
        .map_err(|e| ScrubError::io("No se pudo finalizar el documento limpio", e))?;
    Ok(changed_any)
}
