//! Política de colocación de resultados: rutas por defecto, temporales
//! hermanos y reemplazo atómico.

use log::debug;
use std::ffi::OsString;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use super::constants::SCRUBBED_MARKER;
use super::request::ScrubRequest;
use crate::error::{Result, ScrubError};

/// Ruta hermana `<stem>.scrubbed<.ext>` usada cuando no se indica salida.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut name = OsString::from(stem);
    name.push(".");
    name.push(SCRUBBED_MARKER);
    if let Some(extension) = input.extension() {
        name.push(".");
        name.push(extension);
    }
    input.with_file_name(name)
}

/// Destino final de una petición: la salida explícita o la ruta por defecto.
pub(crate) fn resolve_output(input: &Path, output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input))
}

/// Destino de un archivo limpio en los formatos que admiten reemplazo.
#[derive(Debug, PartialEq)]
pub(crate) enum Placement {
    /// Reemplaza el original mediante rename atómico.
    InPlace,
    /// Escribe en una ruta distinta del original.
    Separate(PathBuf),
}

impl Placement {
    pub(crate) fn destination(&self, input: &Path) -> PathBuf {
        match self {
            Placement::InPlace => input.to_path_buf(),
            Placement::Separate(path) => path.clone(),
        }
    }
}

/// La salida explícita manda; sin ella, `in_place` decide entre el original
/// y la ruta por defecto.
pub(crate) fn placement_for(request: &ScrubRequest) -> Placement {
    match (&request.output, request.in_place) {
        (Some(output), _) => Placement::Separate(output.clone()),
        (None, true) => Placement::InPlace,
        (None, false) => Placement::Separate(resolve_output(&request.input, None)),
    }
}

/// Crea un nombre temporal oculto en el mismo directorio que `path`,
/// conservando la extensión para que las herramientas detecten el formato.
pub(crate) fn temp_sibling(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let name = match path.extension() {
        Some(extension) => format!(
            ".{}_tmp_{}_{}.{}",
            stem,
            nanos,
            process::id(),
            extension.to_string_lossy()
        ),
        None => format!(".{}_tmp_{}_{}", stem, nanos, process::id()),
    };
    parent.join(name)
}

/// Mueve el temporal a su destino. Si falla, el temporal se elimina.
pub(crate) fn commit(temp_path: &Path, destination: &Path) -> Result<()> {
    fs::rename(temp_path, destination).map_err(|e| {
        let _ = fs::remove_file(temp_path);
        ScrubError::io(
            format!(
                "No se pudo mover el resultado a {}",
                destination.display()
            ),
            e,
        )
    })?;
    debug!("{} -> {}", temp_path.display(), destination.display());
    Ok(())
}

/// Reemplaza el original con el temporal (rename atómico, nunca copia y
/// borrado) y actualiza sus fechas al momento actual.
pub(crate) fn replace_in_place(temp_path: &Path, original: &Path) -> Result<()> {
    commit(temp_path, original)?;
    touch_now(original)
}

/// Fija el acceso y la modificación de `path` al instante actual.
pub(crate) fn touch_now(path: &Path) -> Result<()> {
    let now = SystemTime::now();
    let times = FileTimes::new().set_accessed(now).set_modified(now);
    File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_times(times))
        .map_err(|e| {
            ScrubError::io(
                format!("No se pudieron actualizar las fechas de {}", path.display()),
                e,
            )
        })
}

/// Elimina un temporal que no llegó a su destino.
pub(crate) fn discard(temp_path: &Path) {
    if temp_path.exists() {
        let _ = fs::remove_file(temp_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrubber::request::FormatKind;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn placement_prefers_explicit_output() {
        let request = ScrubRequest::new("clip.mp4", FormatKind::Video)
            .with_output(Some(PathBuf::from("out.mp4")));
        assert_eq!(
            placement_for(&request),
            Placement::Separate(PathBuf::from("out.mp4"))
        );

        let request = ScrubRequest::new("clip.mp4", FormatKind::Video);
        assert_eq!(placement_for(&request), Placement::InPlace);

        let request = ScrubRequest::new("IMG_1.NEF", FormatKind::RawCamera).with_in_place(false);
        assert_eq!(
            placement_for(&request),
            Placement::Separate(PathBuf::from("IMG_1.scrubbed.NEF"))
        );
    }

    #[test]
    fn default_output_inserts_marker_before_extension() {
        assert_eq!(
            default_output_path(Path::new("/tmp/photo.jpg")),
            PathBuf::from("/tmp/photo.scrubbed.jpg")
        );
        assert_eq!(
            default_output_path(Path::new("notes")),
            PathBuf::from("notes.scrubbed")
        );
        assert_eq!(
            default_output_path(Path::new("archive.tar.gz")),
            PathBuf::from("archive.tar.scrubbed.gz")
        );
    }

    #[test]
    fn temp_sibling_stays_in_directory_and_keeps_extension() {
        let temp = temp_sibling(Path::new("/data/clip.mp4"));
        assert_eq!(temp.parent(), Some(Path::new("/data")));
        assert_eq!(temp.extension().and_then(|e| e.to_str()), Some("mp4"));
        let name = temp.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with(".clip_tmp_"));

        let bare = temp_sibling(Path::new("clip.mp4"));
        assert_eq!(bare.parent(), Some(Path::new(".")));
    }

    #[test]
    fn replace_in_place_swaps_content_and_refreshes_mtime() -> Result<(), Box<dyn std::error::Error>>
    {
        let dir = tempdir()?;
        let original = dir.path().join("song.mp3");
        fs::write(&original, b"viejo")?;
        let old = SystemTime::now() - Duration::from_secs(86_400);
        File::options()
            .write(true)
            .open(&original)?
            .set_modified(old)?;

        let temp = temp_sibling(&original);
        fs::write(&temp, b"nuevo")?;
        let before = SystemTime::now() - Duration::from_secs(1);

        replace_in_place(&temp, &original)?;

        assert!(!temp.exists());
        assert_eq!(fs::read(&original)?, b"nuevo");
        assert!(fs::metadata(&original)?.modified()? >= before);
        Ok(())
    }

    #[test]
    fn failed_commit_removes_temp() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let temp = dir.path().join(".x_tmp.txt");
        fs::write(&temp, b"x")?;
        let destination = dir.path().join("missing_dir").join("x.txt");

        assert!(commit(&temp, &destination).is_err());
        assert!(!temp.exists());
        Ok(())
    }
}
