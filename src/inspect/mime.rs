//! Detección del tipo de archivo por contenido, memorizada por ruta.

use infer::{Infer, MatcherType};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScrubError};
use crate::scrubber::validate_file;

const OCTET_STREAM: &str = "application/octet-stream";
const TEXT_PLAIN: &str = "text/plain";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileType {
    pub mime: String,
    pub description: String,
}

/// Caché de detecciones. La pertenece quien la crea, así que no necesita
/// sincronización.
pub struct FileTypeCache {
    infer: Infer,
    entries: HashMap<PathBuf, FileType>,
}

impl FileTypeCache {
    pub fn new() -> Self {
        Self {
            infer: Infer::new(),
            entries: HashMap::new(),
        }
    }

    /// Devuelve el tipo de `path`, inspeccionando el contenido solo la
    /// primera vez que se pide.
    pub fn detect(&mut self, path: &Path) -> Result<FileType> {
        let path = validate_file(path)?;
        if let Some(cached) = self.entries.get(&path) {
            return Ok(cached.clone());
        }

        let file_type = self.sniff(&path)?;
        self.entries.insert(path, file_type.clone());
        Ok(file_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sniff(&self, path: &Path) -> Result<FileType> {
        let bytes = fs::read(path)
            .map_err(|e| ScrubError::io(format!("No se pudo leer {}", path.display()), e))?;

        if let Some(kind) = self.infer.get(&bytes) {
            return Ok(FileType {
                mime: kind.mime_type().to_string(),
                description: format!(
                    "{} {}",
                    family_label(kind.matcher_type()),
                    kind.extension().to_uppercase()
                ),
            });
        }

        Ok(match std::str::from_utf8(&bytes) {
            Ok(_) => FileType {
                mime: TEXT_PLAIN.to_string(),
                description: "Texto UTF-8".to_string(),
            },
            Err(_) => FileType {
                mime: OCTET_STREAM.to_string(),
                description: "Datos binarios".to_string(),
            },
        })
    }
}

impl Default for FileTypeCache {
    fn default() -> Self {
        Self::new()
    }
}

fn family_label(matcher: MatcherType) -> &'static str {
    match matcher {
        MatcherType::Image => "Imagen",
        MatcherType::Video => "Video",
        MatcherType::Audio => "Audio",
        MatcherType::Archive => "Archivo comprimido",
        MatcherType::Doc => "Documento",
        MatcherType::Book => "Libro",
        MatcherType::Font => "Fuente",
        MatcherType::App => "Aplicación",
        MatcherType::Text => "Texto",
        _ => "Archivo",
    }
}
