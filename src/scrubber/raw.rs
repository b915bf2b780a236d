//! Limpieza de fotografías RAW de cámara con exiftool.

use log::{debug, info};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::backup_if_requested;
use super::constants::EXIFTOOL_ORIGINAL_SUFFIX;
use super::placement::{Placement, commit, discard, placement_for, replace_in_place, temp_sibling};
use super::request::{ScrubRequest, ScrubResult};
use super::tool::{ToolCommand, require_tool};
use crate::config::ToolConfig;
use crate::error::{Result, ScrubError};

/// Vacía todas las etiquetas de un RAW trabajando sobre una copia temporal,
/// de modo que el original no cambia si exiftool falla.
pub(crate) fn scrub_raw(request: &ScrubRequest, tools: &ToolConfig) -> Result<ScrubResult> {
    let input = &request.input;
    require_tool(&tools.exiftool)?;
    backup_if_requested(request);

    let placement = placement_for(request);
    let destination = placement.destination(input);
    let working = temp_sibling(&destination);

    if let Err(e) = fs::copy(input, &working) {
        discard(&working);
        return Err(ScrubError::io("No se pudo crear la copia de trabajo del RAW", e));
    }

    let result = ToolCommand::new(&tools.exiftool)
        .args(["-overwrite_original", "-all="])
        .arg(&working)
        .timeout(tools.timeouts.raw_metadata)
        .run_checked();
    remove_artifact(&exiftool_artifact(&working));

    if let Err(e) = result {
        discard(&working);
        return Err(e);
    }

    match placement {
        Placement::InPlace => replace_in_place(&working, input)?,
        Placement::Separate(_) => commit(&working, &destination)?,
    }

    if !request.backup {
        remove_artifact(&exiftool_artifact(input));
    }

    info!("RAW limpio: {}", destination.display());
    Ok(ScrubResult::scrubbed(&destination))
}

/// Ruta `<archivo>_original` que exiftool deja al editar.
fn exiftool_artifact(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(EXIFTOOL_ORIGINAL_SUFFIX);
    PathBuf::from(name)
}

fn remove_artifact(path: &Path) {
    if path.exists() && fs::remove_file(path).is_ok() {
        debug!("Eliminado {}", path.display());
    }
}
