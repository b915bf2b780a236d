use std::io::Cursor;
use xmltree::{Element, EmitterConfig, Namespace, XMLNode};

use crate::error::{Result, ScrubError};
use crate::scrubber::constants::{APP_NS, CP_NS, DC_NS, DCTERMS_NS};

/// Nombre calificado de una propiedad dentro de `core.xml` o `app.xml`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct FieldSpec {
    pub(super) prefix: Option<&'static str>,
    pub(super) local_name: &'static str,
    pub(super) namespace: &'static str,
}

impl FieldSpec {
    /// Interpreta una etiqueta `prefijo:nombre` de `core.xml`.
    pub(super) fn core(tag: &'static str) -> Option<Self> {
        let (prefix, local_name) = tag.split_once(':')?;
        let namespace = match prefix {
            "dc" => DC_NS,
            "cp" => CP_NS,
            "dcterms" => DCTERMS_NS,
            _ => return None,
        };
        Some(Self {
            prefix: Some(prefix),
            local_name,
            namespace,
        })
    }

    /// Las propiedades de `app.xml` viven en el espacio por defecto.
    pub(super) fn app(tag: &'static str) -> Option<Self> {
        (!tag.contains(':')).then_some(Self {
            prefix: None,
            local_name: tag,
            namespace: APP_NS,
        })
    }

    fn matches(&self, element: &Element) -> bool {
        element.name == self.local_name && element.namespace.as_deref() == Some(self.namespace)
    }
}

/// Selector de especificación según el archivo de propiedades.
pub(super) type FieldLookup = fn(&'static str) -> Option<FieldSpec>;

pub(super) fn parse(contents: &[u8], part: &str) -> Result<Element> {
    Element::parse(Cursor::new(contents)).map_err(|e| {
        ScrubError::format(part, format!("XML de metadata inválido: {e}"))
    })
}

pub(super) fn serialize(root: &Element, part: &str) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let config = EmitterConfig::new()
        .perform_indent(false)
        .write_document_declaration(true);
    root.write_with_config(&mut output, config).map_err(|e| {
        ScrubError::format(part, format!("No se pudo escribir el XML: {e}"))
    })?;
    Ok(output)
}

/// Fija el texto de la propiedad, creándola si no existe. Devuelve si hubo
/// algún cambio. Al crearla declara su prefijo en la raíz.
pub(super) fn set_field(root: &mut Element, spec: FieldSpec, value: &str) -> bool {
    let existing = root.children.iter_mut().find_map(|node| match node {
        XMLNode::Element(child) if spec.matches(child) => Some(child),
        _ => None,
    });

    match existing {
        Some(child) => replace_text(child, value),
        None => {
            if let Some(prefix) = spec.prefix {
                root.namespaces
                    .get_or_insert_with(Namespace::empty)
                    .put(prefix, spec.namespace);
            }
            let mut child = Element::new(spec.local_name);
            child.prefix = spec.prefix.map(str::to_string);
            child.namespace = Some(spec.namespace.to_string());
            if !value.is_empty() {
                child.children.push(XMLNode::Text(value.to_string()));
            }
            root.children.push(XMLNode::Element(child));
            true
        }
    }
}

fn replace_text(element: &mut Element, value: &str) -> bool {
    if text_content(element) == value && !has_nested_elements(element) {
        return false;
    }
    element.children.clear();
    if !value.is_empty() {
        element.children.push(XMLNode::Text(value.to_string()));
    }
    true
}

/// Texto de la propiedad, o `None` si no existe.
pub(super) fn field_value(root: &Element, spec: FieldSpec) -> Option<String> {
    root.children.iter().find_map(|node| match node {
        XMLNode::Element(child) if spec.matches(child) => Some(text_content(child)),
        _ => None,
    })
}

pub(super) fn text_content(element: &Element) -> String {
    let mut content = String::new();
    for node in &element.children {
        match node {
            XMLNode::Text(text) | XMLNode::CData(text) => content.push_str(text),
            XMLNode::Element(child) => content.push_str(&text_content(child)),
            _ => {}
        }
    }
    content.trim().to_string()
}

pub(super) fn has_nested_elements(element: &Element) -> bool {
    element
        .children
        .iter()
        .any(|node| matches!(node, XMLNode::Element(_)))
}
