//! Segment addressing elements. Each one writes into the segment information
//! of the innermost open level.

use super::{text, ElementContext};
use crate::state::{InitializationSource, SegmentInfo, SegmentUrl, TimelineEntry};
use streamforge_common::Attributes;

/// Attributes shared by `SegmentTemplate`, `SegmentList` and `SegmentBase`.
fn multiple_segment_base(ctx: &ElementContext<'_>, attributes: &Attributes, info: &mut SegmentInfo) {
    if let Some(timescale) = ctx.optional::<u64>(attributes, "timescale").filter(|t| *t > 0) {
        info.timescale = Some(timescale);
    }
    if let Some(duration) = ctx.optional(attributes, "duration") {
        info.duration = Some(duration);
    }
    if let Some(start_number) = ctx.optional(attributes, "startNumber") {
        info.start_number = Some(start_number);
    }
    if let Some(offset) = ctx.optional(attributes, "presentationTimeOffset") {
        info.presentation_time_offset = Some(offset);
    }
}

pub(super) fn template(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let mut info = ctx.state.scope().segment_info.clone();
    multiple_segment_base(ctx, attributes, &mut info);
    if let Some(media) = text(attributes, "media") {
        info.media = Some(media);
    }
    if let Some(initialization) = text(attributes, "initialization") {
        info.initialization_template = Some(initialization);
    }
    ctx.state.scope_mut().segment_info = info;
    true
}

pub(super) fn list(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let mut info = ctx.state.scope().segment_info.clone();
    multiple_segment_base(ctx, attributes, &mut info);
    info.segment_urls = Some(Vec::new());
    ctx.state.scope_mut().segment_info = info;
    true
}

pub(super) fn base(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let mut info = ctx.state.scope().segment_info.clone();
    multiple_segment_base(ctx, attributes, &mut info);
    info.segment_base = true;
    if let Some(range) = ctx.range(attributes, "indexRange") {
        info.index_range = Some(range);
    }
    ctx.state.scope_mut().segment_info = info;
    true
}

pub(super) fn initialization(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let source = InitializationSource {
        source_url: text(attributes, "sourceURL"),
        range: ctx.range(attributes, "range"),
    };
    ctx.state.scope_mut().segment_info.initialization = Some(source);
    true
}

pub(super) fn timeline(ctx: &mut ElementContext<'_>, _: &Attributes) -> bool {
    ctx.state.scope_mut().segment_info.timeline = Some(Vec::new());
    true
}

/// `S`. Unparsable `d` rejects the entry; bad `t` or `r` fall back to their
/// defaults after a warning.
pub(super) fn timeline_entry(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let Some(d) = ctx.optional(attributes, "d") else {
        return false;
    };
    let entry = TimelineEntry {
        t: ctx.optional(attributes, "t"),
        d,
        r: ctx.optional(attributes, "r").unwrap_or(0),
    };
    ctx.state
        .scope_mut()
        .segment_info
        .timeline
        .get_or_insert_with(Vec::new)
        .push(entry);
    true
}

pub(super) fn url(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let url = SegmentUrl {
        media: text(attributes, "media"),
        media_range: ctx.range(attributes, "mediaRange"),
    };
    ctx.state
        .scope_mut()
        .segment_info
        .segment_urls
        .get_or_insert_with(Vec::new)
        .push(url);
    true
}
