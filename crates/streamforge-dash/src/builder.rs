//! Segment expansion on `Representation` close.
//!
//! The effective segment information picks one addressing mode, in order:
//! a `SegmentTimeline`, a `SegmentTemplate` with a fixed duration, a
//! `SegmentList`, then a single segment for `SegmentBase` or a plain
//! `BaseURL`.

use crate::model::{DashSegment, Initialization};
use crate::state::{SegmentInfo, TimelineEntry};
use crate::template::{self, TemplateValues};
use crate::DashParserConfig;
use streamforge_common::{uri, Diagnostic};

/// Most segments expanded for one representation.
pub(crate) const MAX_SEGMENTS: u64 = 100_000;

/// Everything segment expansion needs about one representation.
pub(crate) struct Expansion<'a> {
    pub config: &'a DashParserConfig,
    pub info: &'a SegmentInfo,
    pub representation_id: &'a str,
    pub bandwidth: u64,
    pub base_url: &'a str,
    /// Some level below the document declared a `BaseURL`.
    pub has_own_base_url: bool,
    pub period_start: f64,
    pub period_duration: Option<f64>,
    pub base_time: f64,
    pub is_dynamic: bool,
}

/// Result of [`Expansion::expand`].
#[derive(Debug, Default)]
pub(crate) struct Expanded {
    pub initialization: Option<Initialization>,
    pub segments: Vec<DashSegment>,
}

impl Expansion<'_> {
    fn advisory(&self, message: String) {
        self.config.warn(Diagnostic::Advisory {
            tag: "Representation".to_string(),
            message,
        });
    }

    fn resolve(&self, reference: &str) -> String {
        uri::resolve_or_literal(reference, self.base_url, |d| self.config.warn(d))
    }

    fn timescale(&self) -> u64 {
        self.info.timescale.unwrap_or(1).max(1)
    }

    fn presentation_time_offset(&self) -> u64 {
        self.info.presentation_time_offset.unwrap_or(0)
    }

    fn start_number(&self) -> u64 {
        self.info.start_number.unwrap_or(1)
    }

    /// Session time of `time` timescale units.
    fn seconds(&self, time: u64) -> f64 {
        let offset = time as f64 - self.presentation_time_offset() as f64;
        self.base_time + self.period_start + offset / self.timescale() as f64
    }

    fn values(&self, number: Option<u64>, time: Option<u64>) -> TemplateValues<'_> {
        TemplateValues {
            representation_id: self.representation_id,
            bandwidth: self.bandwidth,
            number,
            time,
        }
    }

    /// A segment covering `[time, time + duration)` in timescale units.
    fn segment(&self, uri: String, number: u64, time: u64, duration: u64) -> DashSegment {
        DashSegment {
            resolved_uri: self.resolve(&uri),
            uri,
            number,
            time,
            duration: duration as f64 / self.timescale() as f64,
            start_time: self.seconds(time),
            end_time: self.seconds(time) + duration as f64 / self.timescale() as f64,
            byte_range: None,
        }
    }

    pub fn expand(&self) -> Expanded {
        let initialization = self.initialization();
        let segments = match (&self.info.timeline, &self.info.media, &self.info.segment_urls) {
            (Some(timeline), Some(media), _) => self.timeline(timeline, |number, time| {
                template::expand(media, &self.values(Some(number), Some(time)))
            }),
            (None, Some(media), _) => self.fixed_duration(media),
            (_, None, Some(urls)) => self.list(urls),
            (_, None, None) => self.single(),
        };
        Expanded {
            initialization,
            segments,
        }
    }

    fn initialization(&self) -> Option<Initialization> {
        if let Some(template) = &self.info.initialization_template {
            let uri = template::expand(template, &self.values(None, None));
            return Some(Initialization {
                resolved_uri: self.resolve(&uri),
                uri,
                byte_range: None,
            });
        }
        let source = self.info.initialization.as_ref()?;
        let uri = source.source_url.clone().unwrap_or_default();
        Some(Initialization {
            resolved_uri: self.resolve(&uri),
            uri,
            byte_range: source.range,
        })
    }

    /// End of the period in timescale units, when known.
    fn period_end_time(&self) -> Option<u64> {
        let duration = self.period_duration?;
        let units = (duration * self.timescale() as f64).round();
        Some(self.presentation_time_offset().saturating_add(units as u64))
    }

    fn limit_reached(&self) {
        self.advisory(format!(
            "segment count limit of {MAX_SEGMENTS} reached, remaining segments dropped"
        ));
    }

    fn overflowed(&self, field: &str) {
        self.advisory(format!("segment {field} overflows, remaining segments dropped"));
    }

    /// Occurrences of an entry starting at `time` that begin before the
    /// period end.
    fn clamp_to_period(&self, count: u64, time: u64, duration: u64) -> u64 {
        match self.period_end_time() {
            Some(end) if time >= end => 0,
            Some(end) if duration > 0 => count.min((end - time).div_ceil(duration)),
            _ => count,
        }
    }

    /// How many times an entry with a negative repeat count occurs.
    fn open_repeat(&self, entry: &TimelineEntry, time: u64, next: Option<&TimelineEntry>) -> u64 {
        let end = next.and_then(|n| n.t).or_else(|| self.period_end_time());
        match end {
            Some(end) if end > time && entry.d > 0 => (end - time).div_ceil(entry.d),
            Some(_) => 1,
            None => {
                self.advisory(format!(
                    "open-ended timeline repeat without a period end, expanded once at t={time}"
                ));
                1
            }
        }
    }

    fn timeline(
        &self,
        timeline: &[TimelineEntry],
        uri_for: impl Fn(u64, u64) -> String,
    ) -> Vec<DashSegment> {
        let mut segments = Vec::new();
        // `None` once the running value has overflowed.
        let mut number = Some(self.start_number());
        let mut time = Some(0);
        for (i, entry) in timeline.iter().enumerate() {
            if entry.t.is_some() {
                time = entry.t;
            }
            let Some(start) = time else {
                self.overflowed("time");
                return segments;
            };
            let count = match u64::try_from(entry.r) {
                Ok(repeat) => self.clamp_to_period(repeat.saturating_add(1), start, entry.d),
                Err(_) => self.open_repeat(entry, start, timeline.get(i + 1)),
            };
            for _ in 0..count {
                if segments.len() as u64 >= MAX_SEGMENTS {
                    self.limit_reached();
                    return segments;
                }
                let (Some(t), Some(n)) = (time, number) else {
                    self.overflowed("time or number");
                    return segments;
                };
                segments.push(self.segment(uri_for(n, t), n, t, entry.d));
                time = t.checked_add(entry.d);
                number = n.checked_add(1);
            }
        }
        segments
    }

    /// `SegmentTemplate@duration`: as many segments as fit the period.
    fn fixed_duration(&self, media: &str) -> Vec<DashSegment> {
        let Some(duration) = self.info.duration.filter(|d| *d > 0) else {
            self.advisory("segment template has neither a timeline nor a duration".to_string());
            return Vec::new();
        };
        let Some(period_duration) = self.period_duration else {
            let kind = if self.is_dynamic { "dynamic" } else { "static" };
            self.advisory(format!(
                "{kind} presentation without a period duration, no segments expanded"
            ));
            return Vec::new();
        };

        let segment_seconds = duration as f64 / self.timescale() as f64;
        let mut count = (period_duration / segment_seconds).ceil().max(0.0) as u64;
        if count > MAX_SEGMENTS {
            self.limit_reached();
            count = MAX_SEGMENTS;
        }
        let mut segments = Vec::new();
        for i in 0..count {
            let Some((number, time)) = self.numbered(i, duration) else {
                self.overflowed("time or number");
                break;
            };
            let uri = template::expand(media, &self.values(Some(number), Some(time)));
            segments.push(self.segment(uri, number, time, duration));
        }
        segments
    }

    /// Number and start time of the `index`th segment of fixed `duration`.
    fn numbered(&self, index: u64, duration: u64) -> Option<(u64, u64)> {
        let number = self.start_number().checked_add(index)?;
        let time = index
            .checked_mul(duration)?
            .checked_add(self.presentation_time_offset())?;
        Some((number, time))
    }

    /// `SegmentList`, timed by its timeline or its fixed duration.
    fn list(&self, urls: &[crate::state::SegmentUrl]) -> Vec<DashSegment> {
        let uri_at = |index: usize| -> String {
            urls.get(index)
                .and_then(|u| u.media.clone())
                .unwrap_or_default()
        };
        let mut segments = match &self.info.timeline {
            Some(timeline) => {
                let first = self.start_number();
                let mut timed = self.timeline(timeline, |number, _| uri_at((number - first) as usize));
                timed.truncate(urls.len());
                timed
            }
            None => {
                let duration = self.info.duration.unwrap_or(0);
                let mut timed = Vec::with_capacity(urls.len());
                for i in 0..urls.len() as u64 {
                    let Some((number, time)) = self.numbered(i, duration) else {
                        self.overflowed("time or number");
                        break;
                    };
                    timed.push(self.segment(uri_at(i as usize), number, time, duration));
                }
                timed
            }
        };
        for (segment, url) in segments.iter_mut().zip(urls) {
            segment.byte_range = url.media_range;
        }
        segments
    }

    /// `SegmentBase` or a bare `BaseURL`: the whole resource is one segment.
    fn single(&self) -> Vec<DashSegment> {
        if !self.info.segment_base && !self.has_own_base_url {
            return Vec::new();
        }
        let duration = self.period_duration.unwrap_or(0.0);
        let start_time = self.base_time + self.period_start;
        vec![DashSegment {
            uri: self.base_url.to_string(),
            resolved_uri: self.base_url.to_string(),
            number: self.start_number(),
            time: self.presentation_time_offset(),
            duration,
            start_time,
            end_time: start_time + duration,
            byte_range: None,
        }]
    }
}
