use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use std::path::{Path, PathBuf};
use std::process;

use bleach::inspect::{FileReport, FileTypeCache, inspect_file};
use bleach::{
    AudioQuality, FormatKind, FormatOptions, ScrubRequest, ToolConfig, VideoPreset, scrub,
};

#[derive(Parser, Debug)]
#[command(
    name = "bleach",
    version,
    about = "Elimina metadata sensible de imágenes, PDFs, video, audio, RAW, documentos Office y texto"
)]
struct Cli {
    /// Muestra los comandos ejecutados y otros detalles
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruye una imagen solo con sus píxeles
    Image(WithOutput),
    /// Vacía el diccionario Info y quita anotaciones y formularios de un PDF
    Pdf(WithOutput),
    /// Quita la metadata de un video con ffmpeg
    Video {
        #[command(flatten)]
        media: MediaArgs,
        /// Preset de libx264 al recodificar
        #[arg(long, value_enum, default_value_t = VideoPreset::Medium)]
        preset: VideoPreset,
    },
    /// Quita la metadata de un audio con ffmpeg
    Audio {
        #[command(flatten)]
        media: MediaArgs,
        /// Calidad VBR de libmp3lame al recodificar (0 = mejor, 9 = peor)
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=9))]
        quality: u8,
    },
    /// Vacía todas las etiquetas de una fotografía RAW con exiftool (en el sitio)
    Raw(Common),
    /// Vacía las propiedades de autoría de un documento Office
    Docx(WithOutput),
    /// Elimina las líneas de comentario de un archivo de texto
    Text {
        #[command(flatten)]
        target: WithOutput,
        /// Prefijos de comentario separados por comas
        #[arg(long, value_delimiter = ',', default_value = "#,//,;")]
        prefixes: Vec<String>,
    },
    /// Muestra tipo, hashes y metadata de imagen de un archivo
    Inspect {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Imprime el informe como JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct Common {
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Copia el original a `<archivo>.backup` antes de limpiar
    #[arg(long)]
    backup: bool,
}

#[derive(Args, Debug)]
struct WithOutput {
    #[command(flatten)]
    common: Common,
    /// Destino del archivo limpio (por defecto `<nombre>.scrubbed<.ext>`)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct MediaArgs {
    #[command(flatten)]
    common: Common,
    /// Recodifica los flujos en lugar de copiarlos
    #[arg(long)]
    reencode: bool,
    /// Escribe `<nombre>.scrubbed<.ext>` en lugar de reemplazar el original
    #[arg(long)]
    no_inplace: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    if let Err(error) = run(cli.command) {
        eprintln!("{} {error:#}", style("❌ Error:").red().bold());
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    let request = match command {
        Command::Inspect { input, json } => return print_inspection(&input, json),
        Command::Image(args) => with_output(args, FormatKind::Image),
        Command::Pdf(args) => with_output(args, FormatKind::Pdf),
        Command::Docx(args) => with_output(args, FormatKind::OfficeDocument),
        Command::Raw(Common { input, backup }) => {
            ScrubRequest::new(input, FormatKind::RawCamera).with_backup(backup)
        }
        Command::Text { target, prefixes } => {
            let options = FormatOptions::default()
                .with_comment_prefixes(prefixes.iter().map(|prefix| prefix.trim().to_string()));
            with_output(target, FormatKind::PlainText).with_options(options)
        }
        Command::Video { media, preset } => {
            let options = FormatOptions {
                reencode: media.reencode,
                preset,
                ..FormatOptions::default()
            };
            media_request(media, FormatKind::Video, options)
        }
        Command::Audio { media, quality } => {
            let quality = AudioQuality::new(quality)
                .with_context(|| format!("Calidad fuera de rango (0-{})", AudioQuality::MAX))?;
            let options = FormatOptions {
                reencode: media.reencode,
                quality,
                ..FormatOptions::default()
            };
            media_request(media, FormatKind::Audio, options)
        }
    };

    let result = scrub(&request, &ToolConfig::from_env())?;
    println!("{} {result}", style("✓").green().bold());
    Ok(())
}

fn with_output(args: WithOutput, kind: FormatKind) -> ScrubRequest {
    ScrubRequest::new(args.common.input, kind)
        .with_output(args.output)
        .with_backup(args.common.backup)
}

fn media_request(args: MediaArgs, kind: FormatKind, options: FormatOptions) -> ScrubRequest {
    ScrubRequest::new(args.common.input, kind)
        .with_backup(args.common.backup)
        .with_in_place(!args.no_inplace)
        .with_options(options)
}

fn print_inspection(path: &Path, json: bool) -> Result<()> {
    let mut cache = FileTypeCache::new();
    let report = inspect_file(path, &mut cache)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    render_report(&report);
    Ok(())
}

fn render_report(report: &FileReport) {
    println!("\n{}", style(format!("┌─ {}", report.path.display())).cyan().bold());
    print_row("Tipo", &format!("{} ({})", report.file_type.description, report.file_type.mime));
    print_row("Tamaño", &format!("{} bytes", report.size));
    if let Some(modified) = &report.modified {
        print_row("Modificado", modified);
    }
    print_row("MD5", &report.hashes.md5);
    print_row("SHA-256", &report.hashes.sha256);

    if let Some(image) = &report.image {
        print_row(
            "Imagen",
            &format!("{} {}x{} {}", image.format, image.width, image.height, image.color),
        );
        if image.exif.is_empty() {
            print_row("EXIF", "sin etiquetas");
        }
        for (tag, value) in &image.exif {
            print_row(tag, value);
        }
    }
    println!("{}", style("└─").cyan());
}

fn print_row(label: &str, value: &str) {
    println!("{} {}: {}", style("│").cyan(), style(label).bold(), value);
}
