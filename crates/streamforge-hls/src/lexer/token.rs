//! Events emitted by the playlist scanner.

use streamforge_common::Attributes;

/// A `#EXT...` line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagToken {
    /// Tag name without the leading `#`.
    pub key: String,
    /// Everything after the first `:`, trimmed. `None` for bare tags.
    pub value: Option<String>,
    /// `KEY=VALUE` pairs found after the `:`. `None` for bare tags.
    pub attributes: Option<Attributes>,
}

/// One scanned line.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    Tag(TagToken),
    Uri(String),
}
