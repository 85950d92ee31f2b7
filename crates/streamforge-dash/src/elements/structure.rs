//! Presentation structure: `MPD`, periods, adaptation sets, representations
//! and the text elements around them.

use super::{flag, text, ElementContext};
use crate::builder;
use crate::model::{
    AdaptationSet, Event, EventStream, Period, PresentationType, Representation, UtcTiming,
};
use crate::state::Level;
use streamforge_common::values::split_list;
use streamforge_common::{uri, Attributes, Diagnostic};

pub(super) fn mpd(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    if let Some(raw) = attributes.get("type") {
        match raw.parse::<PresentationType>() {
            Ok(presentation_type) => ctx.manifest.presentation_type = presentation_type,
            Err(_) => ctx.warn(Diagnostic::InvalidEnumValue {
                tag: ctx.element.to_string(),
                value: raw.clone(),
                allowed: PresentationType::ALLOWED.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    let manifest = &mut *ctx.manifest;
    manifest.id = text(attributes, "id");
    manifest.profiles = attributes
        .get("profiles")
        .map(|raw| split_list(raw, ','))
        .unwrap_or_default();

    let media_presentation_duration = ctx.duration(attributes, "mediaPresentationDuration");
    let min_buffer_time = ctx.duration(attributes, "minBufferTime");
    let minimum_update_period = ctx.duration(attributes, "minimumUpdatePeriod");
    let time_shift_buffer_depth = ctx.duration(attributes, "timeShiftBufferDepth");
    let suggested_presentation_delay = ctx.duration(attributes, "suggestedPresentationDelay");
    let max_segment_duration = ctx.duration(attributes, "maxSegmentDuration");
    let availability_start_time = ctx.date(attributes, "availabilityStartTime");
    let publish_time = ctx.date(attributes, "publishTime");

    let manifest = &mut *ctx.manifest;
    manifest.media_presentation_duration = media_presentation_duration;
    manifest.min_buffer_time = min_buffer_time;
    manifest.minimum_update_period = minimum_update_period;
    manifest.time_shift_buffer_depth = time_shift_buffer_depth;
    manifest.suggested_presentation_delay = suggested_presentation_delay;
    manifest.max_segment_duration = max_segment_duration;
    manifest.availability_start_time = availability_start_time;
    manifest.publish_time = publish_time;
    true
}

/// `Period`. Without `start` the period follows the previous one.
pub(super) fn period(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let start = ctx.duration(attributes, "start").unwrap_or_else(|| {
        ctx.manifest
            .periods
            .last()
            .map_or(0.0, |previous| previous.end().unwrap_or(previous.start))
    });
    let duration = ctx.duration(attributes, "duration");

    ctx.state.push_scope(Level::Period);
    ctx.state.current_period = Some(Period {
        id: text(attributes, "id"),
        start,
        duration,
        ..Default::default()
    });
    true
}

pub(super) fn close_period(ctx: &mut ElementContext<'_>) {
    let Some(scope) = ctx.state.pop_scope() else {
        return;
    };
    if let Some(mut period) = ctx.state.current_period.take() {
        period.base_url = scope.base_url;
        ctx.manifest.periods.push(period);
    }
}

pub(super) fn adaptation_set(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    ctx.state.push_scope(Level::AdaptationSet);
    ctx.state.adaptation_attributes = attributes.clone();
    ctx.state.current_adaptation_set = Some(AdaptationSet {
        id: text(attributes, "id"),
        content_type: text(attributes, "contentType"),
        mime_type: text(attributes, "mimeType"),
        lang: text(attributes, "lang"),
        codecs: text(attributes, "codecs"),
        segment_alignment: flag(attributes, "segmentAlignment"),
        ..Default::default()
    });
    true
}

pub(super) fn close_adaptation_set(ctx: &mut ElementContext<'_>) {
    ctx.state.pop_scope();
    ctx.state.adaptation_attributes.clear();
    let Some(adaptation_set) = ctx.state.current_adaptation_set.take() else {
        return;
    };
    match ctx.state.current_period.as_mut() {
        Some(period) => period.adaptation_sets.push(adaptation_set),
        None => ctx.advisory("adaptation set outside a period was dropped"),
    }
}

/// `frameRate` is either a number or `numerator/denominator`.
fn frame_rate(raw: &str) -> Option<f64> {
    let rate = match raw.split_once('/') {
        Some((numerator, denominator)) => {
            let denominator: f64 = denominator.trim().parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            numerator.trim().parse::<f64>().ok()? / denominator
        }
        None => raw.trim().parse().ok()?,
    };
    rate.is_finite().then_some(rate)
}

pub(super) fn representation(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let Some(bandwidth) = ctx.optional(attributes, "bandwidth") else {
        return false;
    };

    let inherited = ctx.state.adaptation_attributes.clone();
    let lookup = |key: &str| attributes.get(key).or_else(|| inherited.get(key));
    let number = |key: &str| -> Option<u32> {
        let raw = lookup(key)?;
        // `audioSamplingRate` may list a range.
        let parsed = raw.split_whitespace().next()?.parse().ok();
        if parsed.is_none() {
            ctx.warn(Diagnostic::UnparsableValue {
                tag: ctx.element.to_string(),
                value: format!("{key}={raw}"),
            });
        }
        parsed
    };

    let frame_rate = lookup("frameRate").and_then(|raw| {
        let parsed = frame_rate(raw);
        if parsed.is_none() {
            ctx.warn(Diagnostic::UnparsableValue {
                tag: ctx.element.to_string(),
                value: format!("frameRate={raw}"),
            });
        }
        parsed
    });
    let representation = Representation {
        id: text(attributes, "id").unwrap_or_default(),
        bandwidth,
        codecs: lookup("codecs").cloned(),
        mime_type: lookup("mimeType").cloned(),
        width: number("width"),
        height: number("height"),
        frame_rate,
        audio_sampling_rate: number("audioSamplingRate"),
        ..Default::default()
    };

    ctx.state.push_scope(Level::Representation);
    ctx.state.current_representation = Some(representation);
    true
}

/// Expand the segments of the closing representation and attach it.
pub(super) fn close_representation(ctx: &mut ElementContext<'_>) {
    let info = ctx.state.effective_segment_info();
    let base_url = ctx.state.current_base_url().to_string();
    let has_own_base_url = ctx.state.scopes.iter().skip(1).any(|s| s.has_base_url);
    ctx.state.pop_scope();

    let Some(mut representation) = ctx.state.current_representation.take() else {
        return;
    };
    let (period_start, period_duration) = match &ctx.state.current_period {
        Some(period) => (
            period.start,
            period.duration.or_else(|| {
                ctx.manifest
                    .media_presentation_duration
                    .map(|total| total - period.start)
            }),
        ),
        None => (0.0, ctx.manifest.media_presentation_duration),
    };

    let plan = builder::Expansion {
        config: ctx.config,
        info: &info,
        representation_id: &representation.id,
        bandwidth: representation.bandwidth,
        base_url: &base_url,
        has_own_base_url,
        period_start,
        period_duration,
        base_time: ctx.state.base_time,
        is_dynamic: ctx.manifest.is_dynamic(),
    };
    let expanded = plan.expand();
    representation.base_url = base_url;
    representation.initialization = expanded.initialization;
    representation.index_range = info.index_range;
    representation.segments = expanded.segments;

    match ctx.state.current_adaptation_set.as_mut() {
        Some(adaptation_set) => adaptation_set.representations.push(representation),
        None => ctx.advisory("representation outside an adaptation set was dropped"),
    }
}

/// `BaseURL`. The first one of a level wins; the rest are alternates.
pub(super) fn base_url(ctx: &mut ElementContext<'_>, content: &str) {
    let scope = ctx.state.scope();
    if scope.level == Level::Mpd {
        ctx.manifest.base_urls.push(content.to_string());
    }
    if scope.has_base_url {
        return;
    }
    let resolved = uri::resolve_or_literal(content, ctx.state.parent_base_url(), |d| {
        ctx.config.warn(d)
    });
    let scope = ctx.state.scope_mut();
    scope.base_url = resolved;
    scope.has_base_url = true;
}

pub(super) fn location(ctx: &mut ElementContext<'_>, content: &str) {
    let resolved = ctx.resolve(content);
    ctx.manifest.locations.push(resolved);
}

/// `Label` of an adaptation set; representation labels are not modelled.
pub(super) fn label(ctx: &mut ElementContext<'_>, content: &str) {
    if ctx.state.current_representation.is_some() {
        return;
    }
    if let Some(adaptation_set) = ctx.state.current_adaptation_set.as_mut() {
        adaptation_set.label = Some(content.to_string());
    }
}

pub(super) fn utc_timing(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    ctx.manifest.utc_timings.push(UtcTiming {
        scheme_id_uri: text(attributes, "schemeIdUri").unwrap_or_default(),
        value: text(attributes, "value").unwrap_or_default(),
    });
    true
}

pub(super) fn event_stream(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let timescale = ctx
        .optional::<u64>(attributes, "timescale")
        .filter(|t| *t > 0)
        .unwrap_or(1);
    ctx.state.current_event_stream = Some(EventStream {
        scheme_id_uri: text(attributes, "schemeIdUri").unwrap_or_default(),
        value: text(attributes, "value"),
        timescale,
        events: Vec::new(),
    });
    true
}

pub(super) fn close_event_stream(ctx: &mut ElementContext<'_>) {
    let Some(stream) = ctx.state.current_event_stream.take() else {
        return;
    };
    match ctx.state.current_period.as_mut() {
        Some(period) => period.event_streams.push(stream),
        None => ctx.advisory("event stream outside a period was dropped"),
    }
}

/// `Event`; times are converted with the stream's timescale.
pub(super) fn event(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let Some(timescale) = ctx.state.current_event_stream.as_ref().map(|s| s.timescale) else {
        ctx.advisory("event outside an event stream");
        return false;
    };
    let presentation_time: u64 = ctx.optional(attributes, "presentationTime").unwrap_or(0);
    let duration: Option<u64> = ctx.optional(attributes, "duration");
    ctx.state.current_event = Some(Event {
        id: text(attributes, "id"),
        presentation_time: presentation_time as f64 / timescale as f64,
        duration: duration.map(|d| d as f64 / timescale as f64),
        message_data: text(attributes, "messageData"),
    });
    true
}

pub(super) fn event_text(ctx: &mut ElementContext<'_>, content: &str) {
    if let Some(event) = ctx.state.current_event.as_mut() {
        event.message_data.get_or_insert_with(|| content.to_string());
    }
}

pub(super) fn close_event(ctx: &mut ElementContext<'_>) {
    let Some(event) = ctx.state.current_event.take() else {
        return;
    };
    if let Some(stream) = ctx.state.current_event_stream.as_mut() {
        stream.events.push(event);
    }
}
