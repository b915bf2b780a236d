//! Limpieza de video y audio con ffmpeg (`-map_metadata -1`).

use log::{debug, info};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use super::placement::{Placement, commit, discard, placement_for, replace_in_place, temp_sibling};
use super::request::{FormatKind, FormatOptions, ScrubRequest, ScrubResult};
use super::tool::{ToolCommand, require_tool};
use super::backup_if_requested;
use crate::config::ToolConfig;
use crate::error::Result;

/// Atributo extendido que algunas aplicaciones usan para comentarios.
const COMMENT_XATTR: &str = "user.comment";

/// Elimina los flujos de metadata con ffmpeg, copiando los flujos o
/// recodificándolos, y coloca el resultado según la petición.
pub(crate) fn scrub_media(request: &ScrubRequest, tools: &ToolConfig) -> Result<ScrubResult> {
    let input = &request.input;
    require_tool(&tools.ffmpeg)?;
    backup_if_requested(request);

    let placement = placement_for(request);
    let destination = placement.destination(input);
    let temp_path = temp_sibling(&destination);

    let args = ffmpeg_args(request.kind, &request.options, input, &temp_path);
    let timeout = media_timeout(request.kind, tools);
    if request.options.reencode {
        debug!("Recodificando {} ({:?})", input.display(), request.kind);
    }

    if let Err(e) = ToolCommand::new(&tools.ffmpeg)
        .args(&args)
        .timeout(timeout)
        .run_checked()
    {
        discard(&temp_path);
        return Err(e);
    }

    strip_comment_attribute(&temp_path, tools);

    match placement {
        Placement::InPlace => {
            replace_in_place(&temp_path, input)?;
            info!("Archivo limpio (en el sitio): {}", input.display());
        }
        Placement::Separate(_) => {
            commit(&temp_path, &destination)?;
            info!(
                "Archivo limpio: {} -> {}",
                input.display(),
                destination.display()
            );
        }
    }

    Ok(ScrubResult::scrubbed(&destination))
}

fn media_timeout(kind: FormatKind, tools: &ToolConfig) -> Duration {
    match kind {
        FormatKind::Audio => tools.timeouts.audio,
        _ => tools.timeouts.video,
    }
}

/// Construye los argumentos de ffmpeg: copia de flujos o recodificación,
/// siempre sin metadata global ni de flujo.
fn ffmpeg_args(
    kind: FormatKind,
    options: &FormatOptions,
    input: &Path,
    output: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-i".into(),
        input.into(),
        "-map_metadata".into(),
        "-1".into(),
    ];

    if options.reencode {
        match kind {
            FormatKind::Audio => {
                args.extend(["-c:a", "libmp3lame", "-q:a"].map(OsString::from));
                args.push(options.quality.value().to_string().into());
            }
            _ => {
                args.extend(["-c:v", "libx264", "-preset"].map(OsString::from));
                args.push(options.preset.as_str().into());
                args.extend(["-crf", "20", "-c:a", "aac"].map(OsString::from));
            }
        }
    } else {
        args.extend(["-c", "copy"].map(OsString::from));
    }

    args.push(output.into());
    args
}

/// Quita el comentario de atributos extendidos si `setfattr` existe. Los
/// fallos se ignoran: muchos sistemas de archivos no soportan xattrs.
fn strip_comment_attribute(path: &Path, tools: &ToolConfig) {
    let result = ToolCommand::new(&tools.setfattr)
        .args(["-h", "-x", COMMENT_XATTR])
        .arg(path)
        .timeout(tools.timeouts.attributes)
        .run();
    if let Err(e) = result {
        debug!("setfattr no disponible: {e}");
    }
}
