//! Container decoding: gzip envelope to an owned markup tree.
//!
//! A `.als` file is a gzip stream wrapping a UTF-8 XML document. The XML is
//! parsed with `roxmltree` and copied into `Element`, an owned tree that
//! outlives the decompressed text buffer.
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::DecodeError;

/// One XML element with its attributes (in document order), child elements
/// and leading text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    /// Text between the start tag and the first child, if any.
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Read and decode a project file from disk.
pub fn decode_file(path: &Path) -> Result<Element, DecodeError> {
    let data = fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_bytes(&data)
}

/// Decompress a gzip byte stream and parse the payload as XML.
pub fn decode_bytes(data: &[u8]) -> Result<Element, DecodeError> {
    if data.len() < 2 || data[0] != 0x1f || data[1] != 0x8b {
        return Err(DecodeError::NotGzip);
    }

    let mut decoder = GzDecoder::new(Cursor::new(data));
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(DecodeError::Gzip)?;

    let xml = String::from_utf8(out)?;
    parse_xml(&xml)
}

/// Parse an XML document and return its root element.
pub fn parse_xml(xml: &str) -> Result<Element, DecodeError> {
    let document = roxmltree::Document::parse(xml)?;
    Ok(copy_element(document.root_element()))
}

fn copy_element(node: roxmltree::Node<'_, '_>) -> Element {
    let attributes = node
        .attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();
    let children = node
        .children()
        .filter(|c| c.is_element())
        .map(copy_element)
        .collect();

    Element {
        tag: node.tag_name().name().to_string(),
        attributes,
        children,
        text: node.text().map(str::to_string),
    }
}
