//! Limpieza de metadata por formato: validación, respaldo, despacho y
//! colocación segura del resultado.

mod backup;
mod constants;
mod image;
mod media;
mod office;
mod pdf;
mod placement;
mod raw;
mod request;
mod text;
mod tool;
mod validate;

pub use backup::create_backup;
pub use image::verify_image_metadata_clean;
#[cfg(feature = "office")]
pub use office::verify_office_metadata_clean;
pub use placement::default_output_path;
pub use request::{
    AudioQuality, FormatKind, FormatOptions, ScrubRequest, ScrubResult, VideoPreset,
};
pub use tool::{ToolCommand, ToolOutput, locate_tool};
pub use validate::validate_file;

use log::debug;

use crate::config::ToolConfig;
use crate::error::Result;

/// Ejecuta la limpieza completa descrita por `request`.
///
/// La ruta se valida antes de cualquier otra acción; cada estrategia comprueba
/// sus herramientas y crea el respaldo antes de tocar el disco.
pub fn scrub(request: &ScrubRequest, tools: &ToolConfig) -> Result<ScrubResult> {
    validate_file(&request.input)?;
    debug!(
        "Limpiando {} como {:?}",
        request.input.display(),
        request.kind
    );

    match request.kind {
        FormatKind::Image => image::scrub_image(request),
        FormatKind::Pdf => pdf::scrub_pdf(request, tools),
        FormatKind::Video | FormatKind::Audio => media::scrub_media(request, tools),
        FormatKind::RawCamera => raw::scrub_raw(request, tools),
        FormatKind::OfficeDocument => office::scrub_office(request),
        FormatKind::PlainText => text::scrub_text(request),
    }
}

/// Crea el respaldo solicitado. Nunca interrumpe la operación principal.
fn backup_if_requested(request: &ScrubRequest) {
    if request.backup {
        let _ = create_backup(&request.input);
    }
}
