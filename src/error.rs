//! Taxonomía de fallos de la limpieza de metadata.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("Archivo no encontrado: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("La ruta es un directorio, no un archivo: {}", path.display())]
    IsDirectory { path: PathBuf },

    #[error("No se puede leer `{}`: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{tool} no está instalado. Instálalo para limpiar este tipo de archivo.")]
    ToolNotFound { tool: String },

    #[error("{tool} excedió el tiempo límite de {}s", timeout.as_secs())]
    ToolTimeout { tool: String, timeout: Duration },

    #[error("{tool} falló ({}): {stderr}", describe_code(*code))]
    ToolFailure {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Formato inválido en `{}`: {message}", path.display())]
    Format { path: PathBuf, message: String },

    #[error("Falta la capacidad `{capability}`: {hint}")]
    UnsupportedDependency {
        capability: &'static str,
        hint: &'static str,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl ScrubError {
    pub(crate) fn format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ScrubError::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ScrubError::Io {
            context: context.into(),
            source,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("código {code}"),
        None => "terminado por señal".to_string(),
    }
}

pub type Result<T, E = ScrubError> = std::result::Result<T, E>;
