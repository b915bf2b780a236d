//! Eliminación de líneas de comentario en archivos de texto plano.

use log::info;
use std::fs;

use super::backup_if_requested;
use super::placement::{commit, discard, resolve_output, temp_sibling};
use super::request::{ScrubRequest, ScrubResult};
use crate::error::{Result, ScrubError};

/// Copia el texto sin las líneas de comentario y cuenta las eliminadas.
pub(crate) fn scrub_text(request: &ScrubRequest) -> Result<ScrubResult> {
    let input = &request.input;
    backup_if_requested(request);

    let output = resolve_output(input, request.output.as_deref());
    let bytes = fs::read(input)
        .map_err(|e| ScrubError::io(format!("No se pudo leer {}", input.display()), e))?;

    let text = decode_dropping_invalid(&bytes);
    let (kept, removed) = strip_comment_lines(&text, &request.options.comment_prefixes);

    let temp_path = temp_sibling(&output);
    if let Err(e) = fs::write(&temp_path, kept) {
        discard(&temp_path);
        return Err(ScrubError::io("No se pudo escribir el texto limpio", e));
    }
    commit(&temp_path, &output)?;

    info!("Eliminadas {removed} líneas de comentario de {}", input.display());
    Ok(ScrubResult::with_removed_lines(&output, removed))
}

/// Decodifica UTF-8 descartando los bytes inválidos en vez de sustituirlos.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Parte el texto en líneas con su terminador incluido. Reconoce `\n`,
/// `\r\n` y `\r` aislado.
fn lines_with_endings(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.find(['\n', '\r']) {
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

/// Filtra las líneas cuyo contenido, sin espacios iniciales, empieza por
/// alguno de los prefijos. Cada línea conservada mantiene su terminador.
fn strip_comment_lines(text: &str, prefixes: &[String]) -> (String, usize) {
    let mut kept = String::with_capacity(text.len());
    let mut removed = 0;

    for line in lines_with_endings(text) {
        let trimmed = line.trim_start();
        if prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && trimmed.starts_with(prefix.as_str()))
        {
            removed += 1;
        } else {
            kept.push_str(line);
        }
    }

    (kept, removed)
}
