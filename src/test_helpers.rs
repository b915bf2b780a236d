//! Fixtures generadas en las pruebas: imágenes con EXIF, PNG con texto,
//! PDFs con anotaciones y paquetes Office con autoría.

use image::{ImageFormat, Rgb, RgbImage};
use lopdf::{Document, Object, Stream, dictionary};
use std::error::Error;
use std::fs;
use std::io::Cursor;
use std::path::Path;

pub(crate) type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Segmento APP1 con un IFD mínimo: Make = "ACM".
const EXIF_APP1: [u8; 36] = [
    0xFF, 0xE1, 0x00, 0x22, // marcador y longitud
    b'E', b'x', b'i', b'f', 0x00, 0x00, // cabecera Exif
    b'I', b'I', 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // TIFF little endian
    0x01, 0x00, // una entrada
    0x0F, 0x01, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, b'A', b'C', b'M', 0x00,
    0x00, 0x00, 0x00, 0x00, // sin IFD siguiente
];

/// Gradiente determinista para comparar píxeles.
pub(crate) fn sample_pixels(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 40) as u8, (y * 40) as u8, ((x + y) * 20) as u8])
    })
}

/// JPEG con un bloque EXIF insertado justo después de SOI.
pub(crate) fn create_jpeg_with_exif(path: &Path) -> TestResult {
    let mut encoded = Cursor::new(Vec::new());
    sample_pixels(4, 4).write_to(&mut encoded, ImageFormat::Jpeg)?;
    let jpeg = encoded.into_inner();

    let mut bytes = Vec::with_capacity(jpeg.len() + EXIF_APP1.len());
    bytes.extend_from_slice(&jpeg[..2]);
    bytes.extend_from_slice(&EXIF_APP1);
    bytes.extend_from_slice(&jpeg[2..]);
    fs::write(path, bytes)?;
    Ok(())
}

/// PNG RGB con fragmentos tEXt de autoría.
pub(crate) fn create_png_with_text(path: &Path) -> TestResult {
    let pixels = sample_pixels(3, 2);
    let file = fs::File::create(path)?;
    let mut encoder = png::Encoder::new(file, pixels.width(), pixels.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.add_text_chunk("Author".to_string(), "Ana Pérez".to_string())?;
    encoder.add_text_chunk("Comment".to_string(), "Oficina central".to_string())?;

    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels.as_raw())?;
    writer.finish()?;
    Ok(())
}

/// PDF de una página con anotación, formulario, XMP y diccionario Info lleno.
pub(crate) fn create_sample_pdf(path: &Path) -> TestResult {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /F1 18 Tf 72 720 Td (Contenido visible) Tj ET".to_vec(),
    ));
    let annot_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Text",
        "Rect" => vec![100.into(), 100.into(), 120.into(), 120.into()],
        "Contents" => Object::string_literal("Nota privada"),
        "T" => Object::string_literal("Ana"),
    });
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
        "Annots" => vec![annot_id.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let form_id = doc.add_object(dictionary! { "Fields" => Vec::<Object>::new() });
    let metadata_id = doc.add_object(Stream::new(
        dictionary! { "Type" => "Metadata", "Subtype" => "XML" },
        SAMPLE_PDF_XMP.as_bytes().to_vec(),
    ));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => form_id,
        "Metadata" => metadata_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Author" => Object::string_literal("Ana Pérez"),
        "Producer" => Object::string_literal("Suite Ofimática 3.1"),
        "Title" => Object::string_literal("Informe confidencial"),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    doc.save(path)?;
    Ok(())
}

/// Paquete XMP enlazado desde el catálogo de [`create_sample_pdf`].
pub(crate) const SAMPLE_PDF_XMP: &str = r#"<x:xmpmeta xmlns:x="adobe:ns:meta/"><dc:creator>xmp-ana-perez</dc:creator></x:xmpmeta>"#;

/// Paquete docx mínimo con autoría en core, app y custom.
#[cfg(feature = "office")]
pub(crate) fn create_sample_docx(path: &Path) -> TestResult {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

    const CORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:creator>Ana Pérez</dc:creator>
  <cp:lastModifiedBy>Luis Gómez</cp:lastModifiedBy>
  <dc:title>Plan trimestral</dc:title>
  <dc:description>Borrador interno</dc:description>
  <cp:keywords>ventas, privado</cp:keywords>
  <cp:category>Finanzas</cp:category>
  <dcterms:created xsi:type="dcterms:W3CDTF">2023-05-02T09:00:00Z</dcterms:created>
  <cp:revision>14</cp:revision>
</cp:coreProperties>"#;

    const APP: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Procesador 7</Application><Company>Acme S.A.</Company><Pages>3</Pages></Properties>"#;

    const CUSTOM: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="2" name="Cliente"><vt:lpwstr>Banco Norte</vt:lpwstr></property></Properties>"#;

    let mut writer = ZipWriter::new(fs::File::create(path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, body) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", RELS),
        ("word/document.xml", SAMPLE_DOCX_BODY),
        ("docProps/core.xml", CORE),
        ("docProps/app.xml", APP),
        ("docProps/custom.xml", CUSTOM),
    ] {
        writer.start_file(name, options)?;
        writer.write_all(body.as_bytes())?;
    }
    writer.finish()?;
    Ok(())
}

/// Cuerpo de `word/document.xml` en [`create_sample_docx`].
#[cfg(feature = "office")]
pub(crate) const SAMPLE_DOCX_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Texto del cuerpo</w:t></w:r></w:p></w:body></w:document>"#;

/// Lee una entrada de un paquete ZIP como texto.
#[cfg(feature = "office")]
pub(crate) fn read_zip_entry(path: &Path, name: &str) -> TestResult<String> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(fs::File::open(path)?)?;
    let mut entry = archive.by_name(name)?;
    let mut contents = String::new();
    entry.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Escribe un script ejecutable que hace de herramienta externa.
#[cfg(unix)]
pub(crate) fn write_fake_tool(path: &Path, script: &str) -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{script}\n"))?;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}
