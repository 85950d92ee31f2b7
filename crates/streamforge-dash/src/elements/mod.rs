//! Element processor registry.
//!
//! Every built-in element maps to an [`ElementProcessor`] in a static table:
//! its required attributes plus plain functions run when the element opens,
//! when text content arrives inside it and when it closes.

mod descriptor;
mod segment;
mod structure;

use crate::model::ParsedManifest;
use crate::state::SharedState;
use crate::DashParserConfig;
use phf::phf_map;
use std::fmt;
use std::str::FromStr;
use streamforge_common::attributes::optional;
use streamforge_common::values::{date_time_millis, parse_dash_range, parse_iso8601_duration};
use streamforge_common::{uri, Attributes, Diagnostic};

/// Everything a processor may read or mutate.
pub(crate) struct ElementContext<'a> {
    pub config: &'a DashParserConfig,
    pub state: &'a mut SharedState,
    pub manifest: &'a mut ParsedManifest,
    pub element: &'a str,
}

impl ElementContext<'_> {
    pub fn warn(&self, diagnostic: Diagnostic) {
        self.config.warn(diagnostic);
    }

    pub fn advisory(&self, message: impl Into<String>) {
        self.warn(Diagnostic::Advisory {
            tag: self.element.to_string(),
            message: message.into(),
        });
    }

    /// Resolve a URI against the innermost base URL, falling back to the
    /// literal.
    pub fn resolve(&self, reference: &str) -> String {
        uri::resolve_or_literal(reference, self.state.current_base_url(), |d| {
            self.config.warn(d)
        })
    }

    /// Parse an optional attribute, warning when it is present but malformed.
    pub fn optional<T: FromStr>(&self, attributes: &Attributes, key: &str) -> Option<T> {
        optional(self.element, attributes, key, |d| self.config.warn(d))
    }

    fn parsed<T>(&self, attributes: &Attributes, key: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
        let raw = attributes.get(key)?;
        let parsed = parse(raw);
        if parsed.is_none() {
            self.warn(Diagnostic::UnparsableValue {
                tag: self.element.to_string(),
                value: format!("{key}={raw}"),
            });
        }
        parsed
    }

    /// An ISO 8601 duration attribute, in seconds.
    pub fn duration(&self, attributes: &Attributes, key: &str) -> Option<f64> {
        self.parsed(attributes, key, parse_iso8601_duration)
    }

    /// A date-time attribute, in milliseconds since the epoch.
    pub fn date(&self, attributes: &Attributes, key: &str) -> Option<f64> {
        self.parsed(attributes, key, date_time_millis)
    }

    /// A `first-last` byte range attribute.
    pub fn range(&self, attributes: &Attributes, key: &str) -> Option<crate::model::ByteRange> {
        self.parsed(attributes, key, parse_dash_range)
    }
}

/// An attribute value, verbatim.
pub(crate) fn text(attributes: &Attributes, key: &str) -> Option<String> {
    attributes.get(key).cloned()
}

/// An `xs:boolean` attribute. `segmentAlignment` also accepts a group number,
/// which counts as true.
pub(crate) fn flag(attributes: &Attributes, key: &str) -> bool {
    attributes
        .get(key)
        .is_some_and(|v| v != "false" && v != "0")
}

/// How an element is processed.
pub(crate) struct ElementProcessor {
    pub required: &'static [&'static str],
    /// Returns whether the element was accepted. A rejected element is
    /// skipped together with its children.
    pub open: fn(&mut ElementContext<'_>, &Attributes) -> bool,
    pub text: Option<fn(&mut ElementContext<'_>, &str)>,
    pub close: Option<fn(&mut ElementContext<'_>)>,
}

impl fmt::Debug for ElementProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementProcessor")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

pub(crate) static REGISTRY: phf::Map<&'static str, ElementProcessor> = phf_map! {
    "MPD" => ElementProcessor { required: &[], open: structure::mpd, text: None, close: None },
    "Period" => ElementProcessor {
        required: &[],
        open: structure::period,
        text: None,
        close: Some(structure::close_period),
    },
    "AdaptationSet" => ElementProcessor {
        required: &[],
        open: structure::adaptation_set,
        text: None,
        close: Some(structure::close_adaptation_set),
    },
    "Representation" => ElementProcessor {
        required: &["id", "bandwidth"],
        open: structure::representation,
        text: None,
        close: Some(structure::close_representation),
    },
    "BaseURL" => ElementProcessor { required: &[], open: accept, text: Some(structure::base_url), close: None },
    "Location" => ElementProcessor { required: &[], open: accept, text: Some(structure::location), close: None },
    "Label" => ElementProcessor { required: &[], open: accept, text: Some(structure::label), close: None },
    "UTCTiming" => ElementProcessor {
        required: &["schemeIdUri", "value"],
        open: structure::utc_timing,
        text: None,
        close: None,
    },
    "EventStream" => ElementProcessor {
        required: &["schemeIdUri"],
        open: structure::event_stream,
        text: None,
        close: Some(structure::close_event_stream),
    },
    "Event" => ElementProcessor {
        required: &[],
        open: structure::event,
        text: Some(structure::event_text),
        close: Some(structure::close_event),
    },

    "SegmentTemplate" => ElementProcessor { required: &[], open: segment::template, text: None, close: None },
    "SegmentTimeline" => ElementProcessor { required: &[], open: segment::timeline, text: None, close: None },
    "S" => ElementProcessor { required: &["d"], open: segment::timeline_entry, text: None, close: None },
    "SegmentBase" => ElementProcessor { required: &[], open: segment::base, text: None, close: None },
    "Initialization" => ElementProcessor { required: &[], open: segment::initialization, text: None, close: None },
    "SegmentList" => ElementProcessor { required: &[], open: segment::list, text: None, close: None },
    "SegmentURL" => ElementProcessor { required: &[], open: segment::url, text: None, close: None },

    "ContentProtection" => ElementProcessor {
        required: &["schemeIdUri"],
        open: descriptor::content_protection,
        text: None,
        close: Some(descriptor::close_content_protection),
    },
    "pssh" => ElementProcessor { required: &[], open: accept, text: Some(descriptor::pssh), close: None },
    "Role" => ElementProcessor { required: &[], open: descriptor::role, text: None, close: None },
};

/// Open function of elements that only carry text.
fn accept(_: &mut ElementContext<'_>, _: &Attributes) -> bool {
    true
}

/// Look up the processor of a built-in element.
pub(crate) fn lookup(name: &str) -> Option<&'static ElementProcessor> {
    REGISTRY.get(name)
}
