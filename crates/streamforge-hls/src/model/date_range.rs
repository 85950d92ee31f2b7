//! `EXT-X-DATERANGE` records.

use std::collections::BTreeMap;

/// A date range. Dates are milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateRange {
    pub id: String,
    pub class: Option<String>,
    pub start_date: f64,
    pub cue: Option<String>,
    pub end_date: Option<f64>,
    pub duration: Option<f64>,
    pub planned_duration: Option<f64>,
    pub end_on_next: bool,
    pub scte35_cmd: Option<String>,
    pub scte35_out: Option<String>,
    pub scte35_in: Option<String>,
    /// `X-` prefixed attributes, verbatim.
    pub client_attributes: BTreeMap<String, String>,
}
