//! Ubicación de las herramientas externas y límites de tiempo de ejecución.

use std::env;
use std::ffi::OsString;
use std::time::Duration;

pub const FFMPEG_ENV: &str = "BLEACH_FFMPEG";
pub const EXIFTOOL_ENV: &str = "BLEACH_EXIFTOOL";
pub const SETFATTR_ENV: &str = "BLEACH_SETFATTR";

/// Límites de tiempo por tipo de operación.
///
/// Las ediciones de metadata son rápidas; las recodificaciones pueden tardar
/// varios minutos en archivos grandes.
#[derive(Clone, Debug)]
pub struct ToolTimeouts {
    pub pdf_metadata: Duration,
    pub raw_metadata: Duration,
    pub video: Duration,
    pub audio: Duration,
    pub attributes: Duration,
}

impl Default for ToolTimeouts {
    fn default() -> Self {
        Self {
            pdf_metadata: Duration::from_secs(30),
            raw_metadata: Duration::from_secs(60),
            video: Duration::from_secs(600),
            audio: Duration::from_secs(300),
            attributes: Duration::from_secs(5),
        }
    }
}

/// Programas externos usados por los limpiadores. Cada entrada puede ser un
/// nombre a buscar en `PATH` o una ruta explícita.
#[derive(Clone, Debug)]
pub struct ToolConfig {
    pub ffmpeg: OsString,
    pub exiftool: OsString,
    pub setfattr: OsString,
    pub timeouts: ToolTimeouts,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg: OsString::from("ffmpeg"),
            exiftool: OsString::from("exiftool"),
            setfattr: OsString::from("setfattr"),
            timeouts: ToolTimeouts::default(),
        }
    }
}

impl ToolConfig {
    /// Valores por defecto con las sustituciones `BLEACH_*` del entorno.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(value) = non_empty_var(FFMPEG_ENV) {
            config.ffmpeg = value;
        }
        if let Some(value) = non_empty_var(EXIFTOOL_ENV) {
            config.exiftool = value;
        }
        if let Some(value) = non_empty_var(SETFATTR_ENV) {
            config.setfattr = value;
        }
        config
    }
}

fn non_empty_var(key: &str) -> Option<OsString> {
    env::var_os(key).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_plain_program_names() {
        let config = ToolConfig::default();
        assert_eq!(config.ffmpeg, "ffmpeg");
        assert_eq!(config.exiftool, "exiftool");
        assert_eq!(config.timeouts.video, Duration::from_secs(600));
        assert!(config.timeouts.attributes < config.timeouts.pdf_metadata);
    }
}
