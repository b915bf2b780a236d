//! Limpieza de documentos Office (docx, xlsx, pptx) reescribiendo el paquete ZIP.
//!
//! Requiere la característica `office`; sin ella la operación falla antes de
//! tocar el disco.

#[cfg(feature = "office")]
mod archive;
#[cfg(feature = "office")]
mod sanitize;
#[cfg(feature = "office")]
mod verify;
#[cfg(feature = "office")]
mod xml;

#[cfg(feature = "office")]
pub use verify::verify_office_metadata_clean;

use super::request::{ScrubRequest, ScrubResult};
use crate::error::Result;

#[cfg(feature = "office")]
pub(crate) fn scrub_office(request: &ScrubRequest) -> Result<ScrubResult> {
    use log::info;

    use super::backup_if_requested;
    use super::placement::{commit, discard, resolve_output, temp_sibling};
    use crate::error::ScrubError;

    let input = &request.input;
    backup_if_requested(request);

    let output = resolve_output(input, request.output.as_deref());
    let temp_path = temp_sibling(&output);

    let changed = match archive::rewrite_package(input, &temp_path, sanitize::sanitize_entry) {
        Ok(changed) => changed,
        Err(e) => {
            discard(&temp_path);
            return Err(e);
        }
    };

    match verify_office_metadata_clean(&temp_path) {
        Ok(true) => {}
        Ok(false) => {
            discard(&temp_path);
            return Err(ScrubError::format(
                input,
                "La verificación indicó que la metadata no se eliminó correctamente",
            ));
        }
        Err(e) => {
            discard(&temp_path);
            return Err(e);
        }
    }

    commit(&temp_path, &output)?;
    if changed {
        info!("Documento limpio: {} -> {}", input.display(), output.display());
    } else {
        info!("{} no contenía metadata sensible", input.display());
    }
    Ok(ScrubResult::scrubbed(&output))
}

#[cfg(not(feature = "office"))]
pub(crate) fn scrub_office(_request: &ScrubRequest) -> Result<ScrubResult> {
    Err(crate::error::ScrubError::UnsupportedDependency {
        capability: "office",
        hint: "recompila bleach con `--features office` para limpiar documentos Office",
    })
}
