//! Representations and their expanded segments.

use super::ByteRange;

/// Initialization segment of a representation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Initialization {
    pub uri: String,
    pub resolved_uri: String,
    pub byte_range: Option<ByteRange>,
}

/// One media segment.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashSegment {
    pub uri: String,
    pub resolved_uri: String,
    /// `$Number$` of the segment.
    pub number: u64,
    /// `$Time$` of the segment, in timescale units.
    pub time: u64,
    /// Seconds.
    pub duration: f64,
    /// Seconds on the session timeline (base time plus period start).
    pub start_time: f64,
    pub end_time: f64,
    pub byte_range: Option<ByteRange>,
}

/// A `Representation`.
///
/// Codec, MIME type, size, frame rate and sampling rate fall back to the
/// enclosing adaptation set.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Representation {
    pub id: String,
    pub bandwidth: u64,
    pub codecs: Option<String>,
    pub mime_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Frames per second; `30000/1001` style values are divided out.
    pub frame_rate: Option<f64>,
    pub audio_sampling_rate: Option<u32>,
    /// Base URL after composing every enclosing `BaseURL`.
    pub base_url: String,
    pub initialization: Option<Initialization>,
    /// `SegmentBase@indexRange`.
    pub index_range: Option<ByteRange>,
    pub segments: Vec<DashSegment>,
}

impl Representation {
    /// Sum of all segment durations, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}
