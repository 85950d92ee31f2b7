//! Events emitted by the manifest scanner.

use streamforge_common::Attributes;

/// An opening (or self-closing) element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementToken {
    /// Local name, namespace prefix removed.
    pub name: String,
    /// Attributes with entities decoded. Keys keep their prefix.
    pub attributes: Attributes,
    /// `<Element ... />`
    pub self_closing: bool,
}

/// One scanned piece of markup.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    Open(ElementToken),
    /// Local name of the closed element.
    Close(String),
    /// Trimmed, non-empty text content with entities decoded.
    Text(String),
}
