//! Playlist model assembly on URI lines.

use crate::define;
use crate::model::ParsedPlaylist;
use crate::state::SharedState;
use crate::HlsParserConfig;
use std::mem;
use streamforge_common::{uri, Diagnostic};

/// `current + step`, held at `u64::MAX` once the counter runs out.
fn next_sequence(config: &HlsParserConfig, tag: &str, current: u64, step: u64) -> u64 {
    current.checked_add(step).unwrap_or_else(|| {
        config.warn(Diagnostic::Advisory {
            tag: tag.to_string(),
            message: format!("sequence number overflows past {current}"),
        });
        u64::MAX
    })
}

/// Close the variant or segment in progress with `line` as its URI.
pub(crate) fn handle_uri(
    config: &HlsParserConfig,
    state: &mut SharedState,
    playlist: &mut ParsedPlaylist,
    line: &str,
) {
    let uri = if state.has_variables_for_substitution {
        define::substitute(line, &playlist.define, |d| config.warn(d))
    } else {
        line.to_string()
    };
    let resolved_uri = uri::resolve_or_literal(&uri, &state.base_url, |d| config.warn(d));

    if state.is_multivariant_playlist {
        let Some(mut variant) = state.current_variant.take() else {
            config.warn(Diagnostic::Advisory {
                tag: "EXT-X-STREAM-INF".to_string(),
                message: format!("no variant stream attributes precede {uri}"),
            });
            return;
        };
        variant.uri = uri;
        variant.resolved_uri = resolved_uri;
        playlist.variant_streams.push(variant);
        return;
    }

    let mut segment = mem::take(&mut state.current_segment);
    let previous = playlist.segments.last();

    segment.media_sequence = match previous {
        Some(previous) => next_sequence(config, "EXT-X-MEDIA-SEQUENCE", previous.media_sequence, 1),
        None => playlist.media_sequence.unwrap_or(0),
    };
    let discontinuity_base = match previous {
        Some(previous) => previous.discontinuity_sequence,
        None => playlist.discontinuity_sequence.unwrap_or(0),
    };
    segment.discontinuity_sequence = next_sequence(
        config,
        "EXT-X-DISCONTINUITY-SEQUENCE",
        discontinuity_base,
        u64::from(segment.is_discontinuity),
    );

    segment.start_time = previous.map_or(state.base_time, |p| p.end_time);
    segment.end_time = segment.start_time + segment.duration;

    if segment.byte_range.is_none() {
        segment.bitrate = state.current_bitrate;
    }
    segment.encryption = state.current_encryption.clone();
    segment.map = state.current_map.clone();

    let program_date_time_start = segment
        .program_date_time_start
        .or_else(|| previous.and_then(|p| p.program_date_time_end));
    if let Some(start) = program_date_time_start {
        segment.program_date_time_start = Some(start);
        segment.program_date_time_end = Some(start + segment.duration * 1000.0);
    }

    if let Some(target_duration) = playlist.target_duration {
        if segment.duration > target_duration as f64 {
            config.warn(Diagnostic::SegmentDurationExceedsTarget {
                uri: uri.clone(),
                duration: segment.duration,
                target_duration,
            });
        }
    }

    segment.uri = uri;
    segment.resolved_uri = resolved_uri;
    playlist.segments.push(segment);
}

/// Fill defaults that depend on tags which may appear in any order.
pub(crate) fn finalize(playlist: &mut ParsedPlaylist) {
    let target_duration = playlist.target_duration;
    let part_target = playlist.part_inf.as_ref().map(|p| p.part_target);
    if let Some(control) = playlist.server_control.as_mut() {
        if control.hold_back.is_none() {
            control.hold_back = target_duration.map(|t| t as f64 * 3.0);
        }
        if control.part_hold_back.is_none() {
            control.part_hold_back = part_target.map(|t| t * 3.0);
        }
    }
}
