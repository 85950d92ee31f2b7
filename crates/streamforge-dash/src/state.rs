//! Session-scoped scratch space shared by element processors and the builder.

use crate::model::{AdaptationSet, ByteRange, ContentProtection, Event, EventStream, Period, Representation};
use streamforge_common::{Attributes, ParseOptions};

/// Element levels that carry a base URL and segment information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Mpd,
    Period,
    AdaptationSet,
    Representation,
}

/// One `S` element of a `SegmentTimeline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimelineEntry {
    pub t: Option<u64>,
    pub d: u64,
    /// Repeat count; negative repeats until the next `t` or the period end.
    pub r: i64,
}

/// One `SegmentURL` of a `SegmentList`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SegmentUrl {
    pub media: Option<String>,
    pub media_range: Option<ByteRange>,
}

/// An `Initialization` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InitializationSource {
    pub source_url: Option<String>,
    pub range: Option<ByteRange>,
}

/// Segment addressing declared at one level.
///
/// Unset fields inherit from the enclosing level, so a representation can
/// override a single attribute of its adaptation set's template.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentInfo {
    pub timescale: Option<u64>,
    pub duration: Option<u64>,
    pub start_number: Option<u64>,
    pub presentation_time_offset: Option<u64>,
    /// `SegmentTemplate@media`
    pub media: Option<String>,
    /// `SegmentTemplate@initialization`
    pub initialization_template: Option<String>,
    pub initialization: Option<InitializationSource>,
    /// `SegmentBase@indexRange`
    pub index_range: Option<ByteRange>,
    /// A `SegmentBase` was declared.
    pub segment_base: bool,
    pub timeline: Option<Vec<TimelineEntry>>,
    pub segment_urls: Option<Vec<SegmentUrl>>,
}

impl SegmentInfo {
    /// `self` with every unset field taken from `outer`.
    pub fn inherit(&self, outer: &SegmentInfo) -> SegmentInfo {
        SegmentInfo {
            timescale: self.timescale.or(outer.timescale),
            duration: self.duration.or(outer.duration),
            start_number: self.start_number.or(outer.start_number),
            presentation_time_offset: self
                .presentation_time_offset
                .or(outer.presentation_time_offset),
            media: self.media.clone().or_else(|| outer.media.clone()),
            initialization_template: self
                .initialization_template
                .clone()
                .or_else(|| outer.initialization_template.clone()),
            initialization: self
                .initialization
                .clone()
                .or_else(|| outer.initialization.clone()),
            index_range: self.index_range.or(outer.index_range),
            segment_base: self.segment_base || outer.segment_base,
            timeline: self.timeline.clone().or_else(|| outer.timeline.clone()),
            segment_urls: self
                .segment_urls
                .clone()
                .or_else(|| outer.segment_urls.clone()),
        }
    }
}

/// Base URL and segment information of one open level.
#[derive(Debug, Clone)]
pub struct Scope {
    pub level: Level,
    pub base_url: String,
    /// A `BaseURL` was already applied; later ones are alternates.
    pub has_base_url: bool,
    pub segment_info: SegmentInfo,
}

impl Scope {
    fn new(level: Level, base_url: String) -> Self {
        Self {
            level,
            base_url,
            has_base_url: false,
            segment_info: SegmentInfo::default(),
        }
    }
}

/// Mutable state of one parse session.
///
/// Custom element handlers receive it read-only. It is dropped when the
/// session is finalized.
#[derive(Debug, Clone)]
pub struct SharedState {
    pub base_url: String,
    pub base_time: f64,

    /// Open levels, outermost first. The first scope stands for the document
    /// and is never popped.
    pub scopes: Vec<Scope>,

    pub current_period: Option<Period>,
    pub current_adaptation_set: Option<AdaptationSet>,
    /// Raw attributes of the open adaptation set, inherited by
    /// representations.
    pub adaptation_attributes: Attributes,
    pub current_representation: Option<Representation>,
    pub current_event_stream: Option<EventStream>,
    pub current_event: Option<Event>,
    pub current_content_protection: Option<ContentProtection>,
}

impl SharedState {
    /// Fresh state for a session started with `options`.
    pub fn new(options: &ParseOptions) -> Self {
        Self {
            base_url: options.base_url.clone(),
            base_time: options.base_time,
            scopes: vec![Scope::new(Level::Mpd, options.base_url.clone())],
            current_period: None,
            current_adaptation_set: None,
            adaptation_attributes: Attributes::new(),
            current_representation: None,
            current_event_stream: None,
            current_event: None,
            current_content_protection: None,
        }
    }

    /// The innermost open scope.
    pub fn scope(&self) -> &Scope {
        // The document scope is never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Base URL of the innermost scope.
    pub fn current_base_url(&self) -> &str {
        &self.scope().base_url
    }

    /// Base URL a `BaseURL` of the innermost scope is resolved against.
    pub(crate) fn parent_base_url(&self) -> &str {
        match self.scopes.len() {
            0 | 1 => &self.base_url,
            n => &self.scopes[n - 2].base_url,
        }
    }

    /// Open a nested level inheriting the current base URL.
    pub(crate) fn push_scope(&mut self, level: Level) {
        let base_url = self.current_base_url().to_string();
        self.scopes.push(Scope::new(level, base_url));
    }

    /// Close the innermost level, keeping the document scope.
    pub(crate) fn pop_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Segment information in effect at the innermost scope.
    pub fn effective_segment_info(&self) -> SegmentInfo {
        self.scopes
            .iter()
            .fold(SegmentInfo::default(), |outer, scope| {
                scope.segment_info.inherit(&outer)
            })
    }
}
