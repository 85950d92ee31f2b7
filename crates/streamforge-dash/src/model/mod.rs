//! Data model types for parsed DASH manifests.
//!
//! [`ParsedManifest`] is the root. Periods are appended when their closing tag
//! is scanned, so a progressive session only exposes complete periods.

mod adaptation;
mod period;
mod representation;

pub use adaptation::{AdaptationSet, ContentProtection, Role};
pub use period::{Event, EventStream, Period};
pub use representation::{DashSegment, Initialization, Representation};
pub use streamforge_common::values::ByteRange;

use std::fmt;
use std::str::FromStr;
use streamforge_common::CustomBag;

/// Error type for parsing enumerated values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// `MPD@type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PresentationType {
    #[default]
    Static,
    Dynamic,
}

impl PresentationType {
    /// Every value the attribute accepts.
    pub const ALLOWED: &'static [&'static str] = &["static", "dynamic"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationType::Static => "static",
            PresentationType::Dynamic => "dynamic",
        }
    }
}

impl FromStr for PresentationType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(PresentationType::Static),
            "dynamic" => Ok(PresentationType::Dynamic),
            other => Err(ParseError(other.to_string())),
        }
    }
}

impl fmt::Display for PresentationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `UTCTiming` clock source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtcTiming {
    pub scheme_id_uri: String,
    pub value: String,
}

/// A parsed media presentation description.
///
/// Durations are in seconds, wall-clock times in milliseconds since the Unix
/// epoch.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedManifest {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub presentation_type: PresentationType,
    pub id: Option<String>,
    pub profiles: Vec<String>,
    pub media_presentation_duration: Option<f64>,
    pub min_buffer_time: Option<f64>,
    pub minimum_update_period: Option<f64>,
    pub time_shift_buffer_depth: Option<f64>,
    pub suggested_presentation_delay: Option<f64>,
    pub max_segment_duration: Option<f64>,
    pub availability_start_time: Option<f64>,
    pub publish_time: Option<f64>,
    /// `BaseURL` elements of the `MPD`, verbatim.
    pub base_urls: Vec<String>,
    /// `Location` elements, resolved.
    pub locations: Vec<String>,
    pub utc_timings: Vec<UtcTiming>,
    pub periods: Vec<Period>,
    /// Written only by custom element handlers.
    pub custom: CustomBag,
}

impl ParsedManifest {
    /// Whether the manifest describes a live presentation.
    pub fn is_dynamic(&self) -> bool {
        self.presentation_type == PresentationType::Dynamic
    }

    /// Every representation of every period, in document order.
    pub fn representations(&self) -> impl Iterator<Item = &Representation> {
        self.periods
            .iter()
            .flat_map(|p| &p.adaptation_sets)
            .flat_map(|a| &a.representations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_type_from_str() {
        assert_eq!("dynamic".parse(), Ok(PresentationType::Dynamic));
        assert!("Dynamic".parse::<PresentationType>().is_err());
        assert_eq!(PresentationType::default().to_string(), "static");
    }
}
