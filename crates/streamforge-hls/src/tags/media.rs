//! Attribute tags of media playlists.

use super::{flag, text, TagContext};
use crate::model::{
    ByteRange, DateRange, Encryption, EncryptionMethod, MediaInitializationSection, PartInf,
    PartialSegment, PreloadHint, PreloadHintType, RenditionReport, ServerControl, Skip, Start,
};
use streamforge_common::values::{date_time_millis, parse_byte_range};
use streamforge_common::{uri, Attributes, Diagnostic};

pub(super) fn start(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(time_offset) = ctx.optional(attributes, "TIME-OFFSET") else {
        return;
    };
    ctx.playlist.start = Some(Start {
        time_offset,
        precise: flag(attributes, "PRECISE"),
    });
}

pub(super) fn part_inf(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(part_target) = ctx.optional(attributes, "PART-TARGET") else {
        return;
    };
    ctx.playlist.part_inf = Some(PartInf { part_target });
}

pub(super) fn server_control(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    ctx.playlist.server_control = Some(ServerControl {
        can_skip_until: ctx.optional(attributes, "CAN-SKIP-UNTIL"),
        can_skip_date_ranges: flag(attributes, "CAN-SKIP-DATERANGES"),
        hold_back: ctx.optional(attributes, "HOLD-BACK"),
        part_hold_back: ctx.optional(attributes, "PART-HOLD-BACK"),
        can_block_reload: flag(attributes, "CAN-BLOCK-RELOAD"),
    });
}

/// Build the key record shared by `EXT-X-KEY` and `EXT-X-SESSION-KEY`.
pub(super) fn encryption(
    ctx: &TagContext<'_>,
    attributes: &Attributes,
    method: EncryptionMethod,
) -> Encryption {
    let uri = text(attributes, "URI");
    Encryption {
        method,
        resolved_uri: uri.as_deref().map(|u| ctx.resolve(u)),
        uri,
        iv: text(attributes, "IV"),
        key_format: text(attributes, "KEYFORMAT").unwrap_or_else(|| "identity".to_string()),
        key_format_versions: text(attributes, "KEYFORMATVERSIONS"),
    }
}

/// `EXT-X-KEY`; `METHOD=NONE` clears the active key.
pub(super) fn key(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Ok(Some(method)) = ctx.enumerated(attributes, "METHOD", EncryptionMethod::ALLOWED) else {
        return;
    };
    ctx.state.current_encryption = match method {
        EncryptionMethod::None => None,
        method => Some(encryption(ctx, attributes, method)),
    };
}

pub(super) fn map(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(uri) = text(attributes, "URI") else {
        return;
    };
    let byte_range = match attributes.get("BYTERANGE") {
        Some(raw) => {
            let range = parse_byte_range(raw)
                .and_then(|(length, offset)| ByteRange::from_length(offset.unwrap_or(0), length));
            if range.is_none() {
                ctx.warn(Diagnostic::UnparsableValue {
                    tag: ctx.tag.to_string(),
                    value: format!("BYTERANGE={raw}"),
                });
                return;
            }
            range
        }
        None => None,
    };

    ctx.state.current_map = Some(MediaInitializationSection {
        resolved_uri: ctx.resolve(&uri),
        uri,
        byte_range,
        encryption: ctx.state.current_encryption.clone(),
    });
}

fn part_byte_range(ctx: &TagContext<'_>, raw: &str) -> Option<ByteRange> {
    let unparsable = || {
        ctx.warn(Diagnostic::UnparsableValue {
            tag: ctx.tag.to_string(),
            value: format!("BYTERANGE={raw}"),
        })
    };
    let Some((length, offset)) = parse_byte_range(raw) else {
        unparsable();
        return None;
    };
    let range = match offset {
        Some(offset) => ByteRange::from_length(offset, length),
        None => {
            let previous = ctx
                .state
                .current_segment
                .parts
                .last()
                .and_then(|p| p.byte_range)
                .or_else(|| ctx.playlist.segments.last().and_then(|s| s.byte_range));
            let Some(previous) = previous else {
                ctx.warn(Diagnostic::MissingByteRangeOffset {
                    tag: ctx.tag.to_string(),
                    value: raw.to_string(),
                });
                return None;
            };
            previous.followed_by(length)
        }
    };
    if range.is_none() {
        unparsable();
    }
    range
}

/// `EXT-X-PART`, appended to the segment in progress.
///
/// A part range without offset continues the previous part of the same
/// segment, or the previous segment's range.
pub(super) fn part(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(uri) = text(attributes, "URI") else {
        return;
    };
    let Some(duration) = ctx.optional(attributes, "DURATION") else {
        return;
    };

    let byte_range = match attributes.get("BYTERANGE") {
        Some(raw) => part_byte_range(ctx, raw),
        None => None,
    };

    let part = PartialSegment {
        resolved_uri: ctx.resolve(&uri),
        uri,
        duration,
        independent: flag(attributes, "INDEPENDENT"),
        byte_range,
        is_gap: flag(attributes, "GAP"),
    };
    ctx.state.current_segment.parts.push(part);
}

pub(super) fn skip(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(skipped_segments) = ctx.optional(attributes, "SKIPPED-SEGMENTS") else {
        return;
    };
    let recently_removed_date_ranges = attributes
        .get("RECENTLY-REMOVED-DATERANGES")
        .map(|ids| {
            ids.split('\t')
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    ctx.playlist.skip = Some(Skip {
        skipped_segments,
        recently_removed_date_ranges,
    });
}

fn date(ctx: &TagContext<'_>, attributes: &Attributes, key: &str) -> Result<Option<f64>, ()> {
    let Some(raw) = attributes.get(key) else {
        return Ok(None);
    };
    match date_time_millis(raw) {
        Some(millis) => Ok(Some(millis)),
        None => {
            ctx.warn(Diagnostic::UnparsableValue {
                tag: ctx.tag.to_string(),
                value: format!("{key}={raw}"),
            });
            Err(())
        }
    }
}

pub(super) fn date_range(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(id) = text(attributes, "ID") else {
        return;
    };
    let Ok(Some(start_date)) = date(ctx, attributes, "START-DATE") else {
        return;
    };
    let Ok(end_date) = date(ctx, attributes, "END-DATE") else {
        return;
    };

    let client_attributes = attributes
        .iter()
        .filter(|(key, _)| key.starts_with("X-"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let range = DateRange {
        id,
        class: text(attributes, "CLASS"),
        start_date,
        cue: text(attributes, "CUE"),
        end_date,
        duration: ctx.optional(attributes, "DURATION"),
        planned_duration: ctx.optional(attributes, "PLANNED-DURATION"),
        end_on_next: flag(attributes, "END-ON-NEXT"),
        scte35_cmd: text(attributes, "SCTE35-CMD"),
        scte35_out: text(attributes, "SCTE35-OUT"),
        scte35_in: text(attributes, "SCTE35-IN"),
        client_attributes,
    };
    ctx.playlist.date_ranges.push(range);
}

/// `EXT-X-PRELOAD-HINT`; a later hint replaces an earlier one of its type.
pub(super) fn preload_hint(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Ok(Some(hint_type)) = ctx.enumerated(attributes, "TYPE", PreloadHintType::ALLOWED) else {
        return;
    };
    let Some(uri) = text(attributes, "URI") else {
        return;
    };

    let hint = PreloadHint {
        hint_type,
        resolved_uri: ctx.resolve(&uri),
        uri,
        byte_range_start: ctx.optional(attributes, "BYTERANGE-START"),
        byte_range_length: ctx.optional(attributes, "BYTERANGE-LENGTH"),
    };
    match hint_type {
        PreloadHintType::Part => ctx.playlist.preload_hints.part = Some(hint),
        PreloadHintType::Map => ctx.playlist.preload_hints.map = Some(hint),
    }
}

pub(super) fn rendition_report(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(uri) = text(attributes, "URI") else {
        return;
    };
    let report = RenditionReport {
        resolved_uri: ctx.resolve(&uri),
        uri,
        last_msn: ctx.optional(attributes, "LAST-MSN"),
        last_part: ctx.optional(attributes, "LAST-PART"),
    };
    ctx.playlist.rendition_reports.push(report);
}

/// `EXT-X-DEFINE`. Any binding turns substitution on for the session.
pub(super) fn define(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    if let Some(name) = attributes.get("NAME") {
        let Some(value) = attributes.get("VALUE") else {
            return ctx.warn(Diagnostic::MissingRequiredAttribute {
                tag: ctx.tag.to_string(),
                attribute: "VALUE".to_string(),
            });
        };
        ctx.playlist.define.name.insert(name.clone(), value.clone());
    } else if let Some(import) = attributes.get("IMPORT") {
        let Some(value) = ctx.state.base_define.get(import).cloned() else {
            return ctx.warn(Diagnostic::UnresolvedVariable {
                name: import.clone(),
            });
        };
        ctx.playlist.define.import.insert(import.clone(), value);
    } else if let Some(param) = attributes.get("QUERYPARAM") {
        let Some(value) = uri::query_param(&ctx.state.base_url, param) else {
            return ctx.warn(Diagnostic::UnresolvedVariable {
                name: param.clone(),
            });
        };
        ctx.playlist.define.query_param.insert(param.clone(), value);
    } else {
        return ctx.warn(Diagnostic::MissingRequiredAttribute {
            tag: ctx.tag.to_string(),
            attribute: "NAME".to_string(),
        });
    }
    ctx.state.has_variables_for_substitution = true;
}
