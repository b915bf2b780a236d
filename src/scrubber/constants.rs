//! Valores compartidos para normalizar propiedades de metadata.

pub const DEFAULT_COMMENT_PREFIXES: [&str; 3] = ["#", "//", ";"];

pub const SCRUBBED_MARKER: &str = "scrubbed";
pub const BACKUP_SUFFIX: &str = ".backup";
/// Sufijo del respaldo que exiftool deja junto al archivo editado.
pub const EXIFTOOL_ORIGINAL_SUFFIX: &str = "_original";

/// Campos del diccionario Info de un PDF que se reescriben vacíos.
pub const PDF_INFO_FIELDS: [&str; 6] = [
    "Producer", "Creator", "Title", "Author", "Subject", "Keywords",
];

#[cfg(feature = "office")]
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
#[cfg(feature = "office")]
pub const CP_NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
#[cfg(feature = "office")]
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
#[cfg(feature = "office")]
pub const APP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";

#[cfg(feature = "office")]
pub const CORE_SANITIZE_FIELDS: [(&str, &str); 11] = [
    ("dc:creator", ""),
    ("dc:title", ""),
    ("dc:description", ""),
    ("cp:lastModifiedBy", ""),
    ("dc:subject", ""),
    ("cp:keywords", ""),
    ("cp:category", ""),
    ("dcterms:created", ""),
    ("dcterms:modified", ""),
    ("cp:contentStatus", ""),
    ("cp:revision", "1"),
];

#[cfg(feature = "office")]
pub const APP_SANITIZE_FIELDS: [(&str, &str); 6] = [
    ("Application", ""),
    ("Company", ""),
    ("Manager", ""),
    ("Pages", "0"),
    ("Words", "0"),
    ("Lines", "0"),
];

#[cfg(feature = "office")]
pub const CUSTOM_PROPERTIES_EMPTY: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/custom-properties\" xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\"/>\n";
