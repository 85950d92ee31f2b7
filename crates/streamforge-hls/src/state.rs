//! Session-scoped scratch space shared by tag processors and the builder.

use crate::model::{Encryption, MediaInitializationSection, Segment, VariantStream};
use std::collections::BTreeMap;
use streamforge_common::ParseOptions;

/// Mutable state of one parse session.
///
/// Custom tag handlers receive it read-only. It is dropped when the session is
/// finalized, so nothing carries over into the next session.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    /// Set by the first `EXT-X-STREAM-INF`; URI lines then close variants.
    pub is_multivariant_playlist: bool,

    /// Segment being built from the tags since the last URI line.
    pub current_segment: Segment,

    /// Variant opened by an accepted `EXT-X-STREAM-INF`, waiting for its URI.
    pub current_variant: Option<VariantStream>,

    /// Key attached to every following segment.
    pub current_encryption: Option<Encryption>,

    /// Initialization section attached to every following segment.
    pub current_map: Option<MediaInitializationSection>,

    /// Sticky `EXT-X-BITRATE` value.
    pub current_bitrate: Option<u64>,

    pub base_url: String,
    pub base_time: f64,
    pub base_define: BTreeMap<String, String>,

    /// A variable was bound; attribute values and URIs are substituted.
    pub has_variables_for_substitution: bool,

    /// An `EXT-X-PROGRAM-DATE-TIME` was seen in this session.
    pub seen_program_date_time: bool,
}

impl SharedState {
    /// Fresh state for a session started with `options`.
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            base_url: options.base_url.clone(),
            base_time: options.base_time,
            base_define: options.base_define.clone(),
            ..Self::default()
        }
    }
}
