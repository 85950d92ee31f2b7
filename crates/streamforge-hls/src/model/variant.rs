//! Variant streams of a multivariant playlist.

use super::Resolution;
use std::collections::BTreeMap;

/// `HDCP-LEVEL` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HdcpLevel {
    #[cfg_attr(feature = "serde", serde(rename = "TYPE-0"))]
    Type0,
    #[cfg_attr(feature = "serde", serde(rename = "TYPE-1"))]
    Type1,
    #[cfg_attr(feature = "serde", serde(rename = "NONE"))]
    None,
}

enumerated!(HdcpLevel {
    Type0 => "TYPE-0",
    Type1 => "TYPE-1",
    None => "NONE",
});

/// `VIDEO-RANGE` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum VideoRange {
    Sdr,
    Hlg,
    Pq,
}

enumerated!(VideoRange {
    Sdr => "SDR",
    Hlg => "HLG",
    Pq => "PQ",
});

/// A variant stream (`EXT-X-STREAM-INF` plus the URI line after it).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariantStream {
    pub bandwidth: u64,
    pub average_bandwidth: Option<u64>,
    pub score: Option<f64>,
    pub codecs: Vec<String>,
    pub supplemental_codecs: Vec<String>,
    pub resolution: Option<Resolution>,
    pub frame_rate: Option<f64>,
    pub hdcp_level: Option<HdcpLevel>,
    /// Key format to content protection configuration labels.
    pub allowed_cpc: BTreeMap<String, Vec<String>>,
    pub video_range: Option<VideoRange>,
    pub stable_variant_id: Option<String>,
    pub audio: Option<String>,
    pub video: Option<String>,
    pub subtitles: Option<String>,
    pub closed_captions: Option<String>,
    pub pathway_id: Option<String>,
    pub uri: String,
    pub resolved_uri: String,
}

/// An I-frame playlist (`EXT-X-I-FRAME-STREAM-INF`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IFramePlaylist {
    pub bandwidth: u64,
    pub average_bandwidth: Option<u64>,
    pub score: Option<f64>,
    pub codecs: Vec<String>,
    pub supplemental_codecs: Vec<String>,
    pub resolution: Option<Resolution>,
    pub hdcp_level: Option<HdcpLevel>,
    pub allowed_cpc: BTreeMap<String, Vec<String>>,
    pub video_range: Option<VideoRange>,
    pub stable_variant_id: Option<String>,
    pub video: Option<String>,
    pub pathway_id: Option<String>,
    pub uri: String,
    pub resolved_uri: String,
}
