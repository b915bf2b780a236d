//! Modelos de petición y resultado compartidos por todos los limpiadores.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::constants::DEFAULT_COMMENT_PREFIXES;

/// Familia de formato. Se elige con el verbo de la CLI, nunca por inspección
/// del contenido.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FormatKind {
    Image,
    Pdf,
    Video,
    Audio,
    RawCamera,
    OfficeDocument,
    PlainText,
}

impl FormatKind {
    /// Indica si el formato se reemplaza en el sitio cuando no hay salida explícita.
    pub fn supports_in_place(self) -> bool {
        matches!(
            self,
            FormatKind::Video | FormatKind::Audio | FormatKind::RawCamera
        )
    }
}

/// Presets de velocidad de libx264.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum VideoPreset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    #[default]
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl VideoPreset {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoPreset::Ultrafast => "ultrafast",
            VideoPreset::Superfast => "superfast",
            VideoPreset::Veryfast => "veryfast",
            VideoPreset::Faster => "faster",
            VideoPreset::Fast => "fast",
            VideoPreset::Medium => "medium",
            VideoPreset::Slow => "slow",
            VideoPreset::Slower => "slower",
            VideoPreset::Veryslow => "veryslow",
        }
    }
}

/// Calidad VBR de libmp3lame: 0 es la mejor, 9 la peor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AudioQuality(u8);

impl AudioQuality {
    pub const MAX: u8 = 9;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for AudioQuality {
    fn default() -> Self {
        Self(2)
    }
}

/// Opciones específicas de cada formato. Los limpiadores ignoran las que no
/// les corresponden.
#[derive(Clone, Debug)]
pub struct FormatOptions {
    pub reencode: bool,
    pub preset: VideoPreset,
    pub quality: AudioQuality,
    pub comment_prefixes: Vec<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            reencode: false,
            preset: VideoPreset::default(),
            quality: AudioQuality::default(),
            comment_prefixes: DEFAULT_COMMENT_PREFIXES
                .iter()
                .map(|prefix| prefix.to_string())
                .collect(),
        }
    }
}

impl FormatOptions {
    /// Sustituye los prefijos de comentario, descartando los vacíos. Una lista
    /// sin prefijos útiles conserva los valores por defecto.
    pub fn with_comment_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes
            .into_iter()
            .map(Into::into)
            .filter(|prefix| !prefix.is_empty())
            .collect();
        if !prefixes.is_empty() {
            self.comment_prefixes = prefixes;
        }
        self
    }
}

/// Petición completa de limpieza para un único archivo.
#[derive(Clone, Debug)]
pub struct ScrubRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub kind: FormatKind,
    pub options: FormatOptions,
    pub backup: bool,
    pub in_place: bool,
}

impl ScrubRequest {
    /// Petición con las opciones por defecto: sin respaldo y en el sitio para
    /// los formatos que lo admiten.
    pub fn new(input: impl Into<PathBuf>, kind: FormatKind) -> Self {
        Self {
            input: input.into(),
            output: None,
            kind,
            options: FormatOptions::default(),
            backup: false,
            in_place: kind.supports_in_place(),
        }
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn with_in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }
}

/// Resultado de una limpieza exitosa.
#[derive(Clone, Debug, Serialize)]
pub struct ScrubResult {
    pub output: PathBuf,
    pub status: String,
    pub removed: Option<usize>,
}

impl ScrubResult {
    pub(crate) fn scrubbed(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            status: format!("Scrubbed: {}", display_name(output)),
            removed: None,
        }
    }

    pub(crate) fn with_removed_lines(output: &Path, removed: usize) -> Self {
        Self {
            output: output.to_path_buf(),
            status: format!(
                "Scrubbed: {} ({removed} lines removed)",
                display_name(output)
            ),
            removed: Some(removed),
        }
    }
}

impl fmt::Display for ScrubResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
