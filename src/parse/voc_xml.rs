//! Pascal VOC XML parser.
//!
//! Each `<object>` directly under the root element is one annotation
//! instance. The class comes from `<name>`; the box is the raw text of
//! `<bndbox>`'s `xmin`, `ymin`, `xmax`, `ymax`, in that order.

use std::borrow::Cow;
use std::path::Path;

use roxmltree::{Node, ParsingOptions};

use super::{read_bytes, AnnotationMap, BoxText};
use crate::error::CensusError;

const BNDBOX_FIELDS: [&str; 4] = ["xmin", "ymin", "xmax", "ymax"];

/// `encoding` declaration values decoded as ISO-8859-1.
const LATIN1_LABELS: [&str; 7] = [
    "iso-8859-1",
    "iso8859-1",
    "iso_8859_1",
    "latin-1",
    "latin1",
    "latin",
    "l1",
];

/// Parse a VOC XML file from disk.
pub fn read_voc_xml(path: &Path) -> Result<AnnotationMap, CensusError> {
    let bytes = read_bytes(path)?;
    let xml = decode_xml(&bytes, path)?;
    parse_voc_xml_str(&xml, path)
}

/// Parse VOC XML from a UTF-8 string.
pub fn from_voc_xml_str(xml: &str) -> Result<AnnotationMap, CensusError> {
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

/// Parse VOC XML from bytes.
///
/// The input must be UTF-8 unless its XML declaration names ISO-8859-1.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<AnnotationMap, CensusError> {
    let path = Path::new("<memory>");
    let xml = decode_xml(bytes, path)?;
    parse_voc_xml_str(&xml, path)
}

fn decode_xml<'a>(bytes: &'a [u8], path: &Path) -> Result<Cow<'a, str>, CensusError> {
    if let Ok(xml) = std::str::from_utf8(bytes) {
        return Ok(Cow::Borrowed(xml));
    }

    let latin1 = declared_encoding(bytes).is_some_and(|encoding| {
        LATIN1_LABELS
            .iter()
            .any(|label| label.eq_ignore_ascii_case(encoding))
    });
    if latin1 {
        return Ok(Cow::Owned(bytes.iter().copied().map(char::from).collect()));
    }

    Err(CensusError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

/// The `encoding` value of a leading `<?xml ... ?>` declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&str> {
    let rest = bytes.strip_prefix(b"<?xml")?;
    let end = rest.windows(2).position(|pair| pair == b"?>")?;
    let declaration = std::str::from_utf8(&rest[..end]).ok()?;

    let after = &declaration[declaration.find("encoding")? + "encoding".len()..];
    let value = after.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &value[1..];
    Some(&value[..value.find(quote)?])
}

fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<AnnotationMap, CensusError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = roxmltree::Document::parse_with_options(xml, options).map_err(|source| {
        CensusError::XmlParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        }
    })?;

    let mut annotations = AnnotationMap::new();

    for object in document
        .root_element()
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let Some(name) = child_text(object, "name") else {
            continue;
        };

        let bbox = child_element(object, "bndbox")
            .and_then(bndbox_text)
            .unwrap_or_else(BoxText::empty);

        annotations.push(name, bbox);
    }

    Ok(annotations)
}

fn bndbox_text(bndbox: Node<'_, '_>) -> Option<BoxText> {
    let [xmin, ymin, xmax, ymax] = BNDBOX_FIELDS;
    Some(BoxText::from_components([
        child_text(bndbox, xmin)?,
        child_text(bndbox, ymin)?,
        child_text(bndbox, xmax)?,
        child_text(bndbox, ymax)?,
    ]))
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
