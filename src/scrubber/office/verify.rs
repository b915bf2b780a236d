use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Result, ScrubError};
use crate::scrubber::constants::{
    APP_SANITIZE_FIELDS, CORE_SANITIZE_FIELDS, CUSTOM_PROPERTIES_EMPTY,
};

use super::sanitize::{APP_PART, CORE_PART, CUSTOM_PART};
use super::xml::{self, FieldLookup, FieldSpec};

/// Comprueba que un documento Office no conserva autoría, fechas ni
/// propiedades personalizadas.
pub fn verify_office_metadata_clean(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|e| {
        ScrubError::io("No se pudo abrir el documento limpio para verificación", e)
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| ScrubError::format(path, format!("No es un documento Office válido: {e}")))?;

    if let Some(core) = read_part(&mut archive, path, CORE_PART)?
        && !fields_match(&core, CORE_PART, &CORE_SANITIZE_FIELDS, FieldSpec::core)?
    {
        return Ok(false);
    }

    if let Some(app) = read_part(&mut archive, path, APP_PART)?
        && !fields_match(&app, APP_PART, &APP_SANITIZE_FIELDS, FieldSpec::app)?
    {
        return Ok(false);
    }

    match read_part(&mut archive, path, CUSTOM_PART)? {
        Some(custom) => custom_is_empty(&custom),
        None => Ok(true),
    }
}

fn read_part<R>(archive: &mut ZipArchive<R>, path: &Path, part: &str) -> Result<Option<Vec<u8>>>
where
    R: Read + std::io::Seek,
{
    let mut entry = match archive.by_name(part) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(ScrubError::format(
                path,
                format!("No se pudo acceder a {part}: {e}"),
            ));
        }
    };
    let mut contents = Vec::new();
    entry
        .read_to_end(&mut contents)
        .map_err(|e| ScrubError::io(format!("No se pudo leer {part}"), e))?;
    Ok(Some(contents))
}

/// Las propiedades ausentes cuentan como limpias solo si su valor esperado
/// es vacío.
fn fields_match(
    contents: &[u8],
    part: &str,
    expected: &[(&'static str, &'static str)],
    lookup: FieldLookup,
) -> Result<bool> {
    let root = xml::parse(contents, part)?;
    Ok(expected.iter().all(|&(tag, value)| match lookup(tag) {
        Some(spec) => match xml::field_value(&root, spec) {
            Some(current) => current == value,
            None => value.is_empty(),
        },
        None => true,
    }))
}

fn custom_is_empty(contents: &[u8]) -> Result<bool> {
    if contents == CUSTOM_PROPERTIES_EMPTY.as_bytes() {
        return Ok(true);
    }
    let root = xml::parse(contents, CUSTOM_PART)?;
    Ok(!xml::has_nested_elements(&root) && xml::text_content(&root).is_empty())
}
