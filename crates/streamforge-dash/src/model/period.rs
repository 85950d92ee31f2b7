//! Periods and in-band event streams.

use super::AdaptationSet;

/// One `Event` of an `EventStream`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub id: Option<String>,
    /// Seconds from the period start.
    pub presentation_time: f64,
    pub duration: Option<f64>,
    /// `messageData` attribute or the element's text.
    pub message_data: Option<String>,
}

/// An `EventStream` of a period.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventStream {
    pub scheme_id_uri: String,
    pub value: Option<String>,
    pub timescale: u64,
    pub events: Vec<Event>,
}

/// A `Period`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Period {
    pub id: Option<String>,
    /// Seconds from the presentation start. Derived from the previous period
    /// when the attribute is absent.
    pub start: f64,
    pub duration: Option<f64>,
    /// Base URL after composing every enclosing `BaseURL`.
    pub base_url: String,
    pub adaptation_sets: Vec<AdaptationSet>,
    pub event_streams: Vec<EventStream>,
}

impl Period {
    /// End of the period, when its duration is known.
    pub fn end(&self) -> Option<f64> {
        self.duration.map(|d| self.start + d)
    }
}
