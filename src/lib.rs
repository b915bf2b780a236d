//! # bleach
//!
//! Elimina metadata sensible de imágenes, PDFs, video, audio, fotografías RAW,
//! documentos Office y archivos de texto.
//!
//! Cada petición se valida, respalda opcionalmente y limpia con la estrategia
//! propia de su formato. El resultado se escribe siempre en un temporal del
//! mismo directorio y se mueve a su destino con un rename atómico, de modo que
//! un fallo nunca deja el original a medio escribir.
//!
//! ```no_run
//! use bleach::{FormatKind, ScrubRequest, ToolConfig, scrub};
//!
//! let request = ScrubRequest::new("foto.jpg", FormatKind::Image).with_backup(true);
//! let result = scrub(&request, &ToolConfig::from_env())?;
//! println!("{result}");
//! # Ok::<(), bleach::ScrubError>(())
//! ```
//!
//! Video, audio y RAW dependen de `ffmpeg` y `exiftool`; el limpiador de PDFs
//! usa `exiftool` si está disponible. Los documentos Office requieren la
//! característica `office`.

pub mod config;
pub mod error;
pub mod inspect;
pub mod scrubber;

pub use config::{ToolConfig, ToolTimeouts};
pub use error::{Result, ScrubError};
pub use scrubber::{
    AudioQuality, FormatKind, FormatOptions, ScrubRequest, ScrubResult, VideoPreset, scrub,
};

#[cfg(test)]
pub(crate) mod test_helpers;
