//! Single-value tags.

use super::TagContext;
use crate::model::{ByteRange, Segment};
use streamforge_common::values::{date_time_millis, parse_byte_range};
use streamforge_common::Diagnostic;

fn unparsable(ctx: &TagContext<'_>, value: &str) {
    ctx.warn(Diagnostic::UnparsableValue {
        tag: ctx.tag.to_string(),
        value: value.to_string(),
    });
}

pub(super) fn version(ctx: &mut TagContext<'_>, value: u64) {
    match u32::try_from(value) {
        Ok(version) => ctx.playlist.version = Some(version),
        Err(_) => unparsable(ctx, &value.to_string()),
    }
}

pub(super) fn target_duration(ctx: &mut TagContext<'_>, value: u64) {
    ctx.playlist.target_duration = Some(value);
}

pub(super) fn media_sequence(ctx: &mut TagContext<'_>, value: u64) {
    ctx.playlist.media_sequence = Some(value);
}

pub(super) fn discontinuity_sequence(ctx: &mut TagContext<'_>, value: u64) {
    ctx.playlist.discontinuity_sequence = Some(value);
}

pub(super) fn bitrate(ctx: &mut TagContext<'_>, value: u64) {
    ctx.state.current_bitrate = Some(value);
}

pub(super) fn playlist_type(ctx: &mut TagContext<'_>, value: &str) {
    if let Ok(playlist_type) = value.parse() {
        ctx.playlist.playlist_type = Some(playlist_type);
    }
}

/// `EXTINF:<duration>[,<title>]`
pub(super) fn inf(ctx: &mut TagContext<'_>, value: &str) {
    let (duration, title) = value.split_once(',').unwrap_or((value, ""));
    let duration = match duration.trim().parse::<f64>() {
        Ok(duration) if duration.is_finite() && duration >= 0.0 => duration,
        _ => return unparsable(ctx, value),
    };

    let segment = &mut ctx.state.current_segment;
    segment.duration = duration;
    let title = title.trim();
    segment.title = (!title.is_empty()).then(|| title.to_string());
}

/// `EXT-X-BYTERANGE:<length>[@<offset>]`
///
/// Without an offset the range continues after the previous segment's range.
pub(super) fn byte_range(ctx: &mut TagContext<'_>, value: &str) {
    let Some((length, offset)) = parse_byte_range(value) else {
        return unparsable(ctx, value);
    };

    let range = match offset {
        Some(offset) => ByteRange::from_length(offset, length),
        None => match ctx.playlist.segments.last().and_then(|s| s.byte_range) {
            Some(previous) => previous.followed_by(length),
            None => {
                ctx.warn(Diagnostic::MissingByteRangeOffset {
                    tag: ctx.tag.to_string(),
                    value: value.to_string(),
                });
                return;
            }
        },
    };
    match range {
        Some(range) => ctx.state.current_segment.byte_range = Some(range),
        None => unparsable(ctx, value),
    }
}

/// `EXT-X-PROGRAM-DATE-TIME:<date-time>`
///
/// The first occurrence back-fills every segment already appended.
pub(super) fn program_date_time(ctx: &mut TagContext<'_>, value: &str) {
    let Some(millis) = date_time_millis(value) else {
        return unparsable(ctx, value);
    };
    ctx.state.current_segment.program_date_time_start = Some(millis);

    if !ctx.state.seen_program_date_time {
        ctx.state.seen_program_date_time = true;
        backfill_program_date_time(&mut ctx.playlist.segments, millis);
    }
}

fn backfill_program_date_time(segments: &mut [Segment], first_known: f64) {
    let mut end = first_known;
    for segment in segments.iter_mut().rev() {
        let start = end - segment.duration * 1000.0;
        segment.program_date_time_start = Some(start);
        segment.program_date_time_end = Some(end);
        end = start;
    }
}
