//! Limpieza de PDFs: exiftool opcional y reescritura estructural con lopdf.

use log::{info, warn};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::fs;
use std::path::Path;

use super::constants::PDF_INFO_FIELDS;
use super::placement::{commit, discard, resolve_output, temp_sibling};
use super::request::{ScrubRequest, ScrubResult};
use super::tool::{ToolCommand, locate_tool};
use super::backup_if_requested;
use crate::config::ToolConfig;
use crate::error::{Result, ScrubError};

/// Limpia un PDF sobre una copia de trabajo y la mueve a la salida.
///
/// La fase de exiftool es opcional; la reescritura de páginas y del
/// diccionario Info es obligatoria.
pub(crate) fn scrub_pdf(request: &ScrubRequest, tools: &ToolConfig) -> Result<ScrubResult> {
    let input = &request.input;
    backup_if_requested(request);

    let output = resolve_output(input, request.output.as_deref());
    let working = temp_sibling(&output);

    fs::copy(input, &working).map_err(|e| {
        discard(&working);
        ScrubError::io("No se pudo crear la copia de trabajo del PDF", e)
    })?;

    clear_with_exiftool(&working, tools);

    if let Err(e) = rewrite_document(&working) {
        discard(&working);
        return Err(e);
    }

    commit(&working, &output)?;
    info!("PDF limpio: {} -> {}", input.display(), output.display());
    Ok(ScrubResult::scrubbed(&output))
}

/// Vacía los campos de metadata con exiftool si está instalado. Cualquier
/// fallo se registra y la limpieza continúa.
fn clear_with_exiftool(path: &Path, tools: &ToolConfig) {
    if locate_tool(&tools.exiftool).is_none() {
        warn!("exiftool no encontrado, se omite la limpieza EXIF del PDF");
        return;
    }

    let result = ToolCommand::new(&tools.exiftool)
        .args(["-all=", "-overwrite_original"])
        .arg(path)
        .timeout(tools.timeouts.pdf_metadata)
        .run();

    match result {
        Ok(output) if output.success() => {}
        Ok(output) => warn!("exiftool falló: {}", output.stderr.trim()),
        Err(e) => warn!("No se pudo ejecutar exiftool: {e}"),
    }
}

/// Reconstruye el documento sin anotaciones, formularios ni metadata XMP y
/// con un diccionario Info vacío.
fn rewrite_document(path: &Path) -> Result<()> {
    let mut doc = Document::load(path)
        .map_err(|e| ScrubError::format(path, format!("No se pudo leer el PDF: {e}")))?;

    strip_page_annotations(&mut doc).map_err(|e| pdf_error(path, e))?;
    strip_catalog_entries(&mut doc).map_err(|e| pdf_error(path, e))?;

    let info_id = doc.add_object(empty_info_dictionary());
    doc.trailer.set("Info", Object::Reference(info_id));

    doc.prune_objects();
    doc.save(path)
        .map_err(|e| ScrubError::format(path, format!("No se pudo escribir el PDF limpio: {e}")))?;
    Ok(())
}

fn strip_page_annotations(doc: &mut Document) -> lopdf::Result<()> {
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for page_id in page_ids {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        page.remove(b"Annots");
    }
    Ok(())
}

fn strip_catalog_entries(doc: &mut Document) -> lopdf::Result<()> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let catalog = doc.get_object_mut(root_id)?.as_dict_mut()?;
    catalog.remove(b"AcroForm");
    catalog.remove(b"Metadata");
    Ok(())
}

fn empty_info_dictionary() -> Dictionary {
    let mut info = Dictionary::new();
    for field in PDF_INFO_FIELDS {
        info.set(field, Object::string_literal(""));
    }
    info
}

fn pdf_error(path: &Path, error: lopdf::Error) -> ScrubError {
    ScrubError::format(path, format!("Estructura PDF inválida: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{SAMPLE_PDF_XMP, create_sample_pdf};
    use tempfile::tempdir;

    #[test]
    fn info_dictionary_is_rebuilt_empty() {
        let info = empty_info_dictionary();
        for field in PDF_INFO_FIELDS {
            assert!(matches!(info.get(field.as_bytes()), Ok(Object::String(bytes, _)) if bytes.is_empty()));
        }
    }

    #[test]
    fn rewrite_removes_annotations_forms_and_info() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("doc.pdf");
        create_sample_pdf(&path)?;

        rewrite_document(&path)?;

        let doc = Document::load(&path)?;
        for page_id in doc.get_pages().into_values() {
            assert!(!doc.get_dictionary(page_id)?.has(b"Annots"));
        }
        let root_id = doc.trailer.get(b"Root")?.as_reference()?;
        let catalog = doc.get_dictionary(root_id)?;
        assert!(!catalog.has(b"AcroForm"));
        assert!(!catalog.has(b"Metadata"));

        let info_id = doc.trailer.get(b"Info")?.as_reference()?;
        let info = doc.get_dictionary(info_id)?;
        assert!(matches!(info.get(b"Author"), Ok(Object::String(bytes, _)) if bytes.is_empty()));
        Ok(())
    }

    #[test]
    fn catalog_xmp_stream_is_dropped_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("xmp.pdf");
        create_sample_pdf(&path)?;
        let marker = b"xmp-ana-perez";
        assert!(SAMPLE_PDF_XMP.contains("xmp-ana-perez"));

        let before = Document::load(&path)?;
        let root_id = before.trailer.get(b"Root")?.as_reference()?;
        assert!(before.get_dictionary(root_id)?.has(b"Metadata"));
        assert!(fs::read(&path)?.windows(marker.len()).any(|w| w == marker));

        rewrite_document(&path)?;

        assert!(!fs::read(&path)?.windows(marker.len()).any(|w| w == marker));
        Ok(())
    }

    #[test]
    fn garbage_is_a_format_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("fake.pdf");
        fs::write(&path, b"esto no es un pdf")?;

        assert!(matches!(
            rewrite_document(&path),
            Err(ScrubError::Format { .. })
        ));
        Ok(())
    }
}
