use crate::error::Result;
use crate::scrubber::constants::{
    APP_SANITIZE_FIELDS, CORE_SANITIZE_FIELDS, CUSTOM_PROPERTIES_EMPTY,
};

use super::xml::{self, FieldLookup, FieldSpec};

pub(super) const CORE_PART: &str = "docProps/core.xml";
pub(super) const APP_PART: &str = "docProps/app.xml";
pub(super) const CUSTOM_PART: &str = "docProps/custom.xml";

/// Transformación aplicada a cada entrada del paquete: las partes de
/// propiedades se normalizan y el resto pasa intacto.
pub(super) fn sanitize_entry(name: &str, contents: Vec<u8>) -> Result<(Vec<u8>, bool)> {
    match name {
        CORE_PART => rewrite_fields(contents, CORE_PART, &CORE_SANITIZE_FIELDS, FieldSpec::core),
        APP_PART => rewrite_fields(contents, APP_PART, &APP_SANITIZE_FIELDS, FieldSpec::app),
        CUSTOM_PART => {
            let empty = CUSTOM_PROPERTIES_EMPTY.as_bytes();
            let changed = contents != empty;
            Ok((empty.to_vec(), changed))
        }
        _ => Ok((contents, false)),
    }
}

fn rewrite_fields(
    contents: Vec<u8>,
    part: &str,
    fields: &[(&'static str, &'static str)],
    lookup: FieldLookup,
) -> Result<(Vec<u8>, bool)> {
    let mut root = xml::parse(&contents, part)?;

    let mut changed = false;
    for &(tag, value) in fields {
        if let Some(spec) = lookup(tag) {
            changed |= xml::set_field(&mut root, spec, value);
        }
    }

    if !changed {
        return Ok((contents, false));
    }
    Ok((xml::serialize(&root, part)?, true))
}
