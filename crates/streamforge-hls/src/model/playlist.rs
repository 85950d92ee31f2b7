//! The playlist root and its playlist-level records.

use super::{DateRange, Encryption, IFramePlaylist, RenditionGroups, Segment, VariantStream};
use std::collections::BTreeMap;
use streamforge_common::CustomBag;

/// `EXT-X-PLAYLIST-TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum PlaylistType {
    Event,
    Vod,
}

enumerated!(PlaylistType {
    Event => "EVENT",
    Vod => "VOD",
});

/// `EXT-X-START`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Start {
    pub time_offset: f64,
    pub precise: bool,
}

/// `EXT-X-PART-INF`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartInf {
    pub part_target: f64,
}

/// `EXT-X-SERVER-CONTROL`.
///
/// Missing hold backs default to three target durations (three part targets
/// for `part_hold_back`) once the session is finalized.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerControl {
    pub can_skip_until: Option<f64>,
    pub can_skip_date_ranges: bool,
    pub hold_back: Option<f64>,
    pub part_hold_back: Option<f64>,
    pub can_block_reload: bool,
}

/// `EXT-X-SKIP` of a playlist delta update.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skip {
    pub skipped_segments: u64,
    pub recently_removed_date_ranges: Vec<String>,
}

/// `TYPE` of an `EXT-X-PRELOAD-HINT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum PreloadHintType {
    #[default]
    Part,
    Map,
}

enumerated!(PreloadHintType {
    Part => "PART",
    Map => "MAP",
});

/// A resource the server expects the client to request next.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreloadHint {
    pub hint_type: PreloadHintType,
    pub uri: String,
    pub resolved_uri: String,
    pub byte_range_start: Option<u64>,
    pub byte_range_length: Option<u64>,
}

/// Latest preload hint of each type.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreloadHints {
    pub part: Option<PreloadHint>,
    pub map: Option<PreloadHint>,
}

/// `EXT-X-RENDITION-REPORT`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenditionReport {
    pub uri: String,
    pub resolved_uri: String,
    pub last_msn: Option<u64>,
    pub last_part: Option<u64>,
}

/// `FORMAT` of an `EXT-X-SESSION-DATA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum SessionDataFormat {
    #[default]
    Json,
    Raw,
}

enumerated!(SessionDataFormat {
    Json => "JSON",
    Raw => "RAW",
});

/// `EXT-X-SESSION-DATA`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionData {
    pub data_id: String,
    pub value: Option<String>,
    pub uri: Option<String>,
    pub resolved_uri: Option<String>,
    pub format: SessionDataFormat,
    pub language: Option<String>,
}

/// `EXT-X-CONTENT-STEERING`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentSteering {
    pub server_uri: String,
    pub resolved_server_uri: String,
    pub pathway_id: Option<String>,
}

/// Variable bindings declared with `EXT-X-DEFINE`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Define {
    /// `NAME`/`VALUE` bindings.
    pub name: BTreeMap<String, String>,
    /// `IMPORT` bindings, copied from the caller's base define table.
    pub import: BTreeMap<String, String>,
    /// `QUERYPARAM` bindings, read from the base URL.
    pub query_param: BTreeMap<String, String>,
}

impl Define {
    /// Look a variable up by name, then import, then query parameter.
    pub fn lookup(&self, variable: &str) -> Option<&str> {
        self.name
            .get(variable)
            .or_else(|| self.import.get(variable))
            .or_else(|| self.query_param.get(variable))
            .map(String::as_str)
    }
}

/// A parsed HLS playlist, media or multivariant.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedPlaylist {
    /// `#EXTM3U` was seen.
    pub m3u: bool,
    pub version: Option<u32>,
    pub target_duration: Option<u64>,
    pub media_sequence: Option<u64>,
    pub discontinuity_sequence: Option<u64>,
    pub playlist_type: Option<PlaylistType>,
    pub independent_segments: bool,
    pub end_list: bool,
    pub i_frames_only: bool,
    pub start: Option<Start>,
    pub part_inf: Option<PartInf>,
    pub server_control: Option<ServerControl>,
    pub skip: Option<Skip>,
    pub segments: Vec<Segment>,
    pub variant_streams: Vec<VariantStream>,
    pub i_frame_playlists: Vec<IFramePlaylist>,
    pub rendition_groups: RenditionGroups,
    pub date_ranges: Vec<DateRange>,
    pub preload_hints: PreloadHints,
    pub rendition_reports: Vec<RenditionReport>,
    pub session_data: Vec<SessionData>,
    pub session_keys: Vec<Encryption>,
    pub content_steering: Option<ContentSteering>,
    pub define: Define,
    /// Output of caller-registered custom tag handlers.
    pub custom: CustomBag,
}

impl ParsedPlaylist {
    /// Whether this is a multivariant playlist.
    pub fn is_multivariant(&self) -> bool {
        !self.variant_streams.is_empty() || !self.i_frame_playlists.is_empty()
    }

    /// Sum of all segment durations, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}
