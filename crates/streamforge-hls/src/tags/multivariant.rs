//! Attribute tags of multivariant playlists.

use super::media::encryption;
use super::{flag, text, TagContext};
use crate::model::{
    ContentSteering, EncryptionMethod, HdcpLevel, IFramePlaylist, Rendition, RenditionType,
    Resolution, SessionData, SessionDataFormat, VariantStream, VideoRange,
};
use std::collections::BTreeMap;
use streamforge_common::values::{parse_resolution, split_list};
use streamforge_common::{Attributes, Diagnostic};

fn resolution(ctx: &TagContext<'_>, attributes: &Attributes) -> Option<Resolution> {
    let raw = attributes.get("RESOLUTION")?;
    let parsed = parse_resolution(raw);
    if parsed.is_none() {
        ctx.warn(Diagnostic::UnparsableValue {
            tag: ctx.tag.to_string(),
            value: format!("RESOLUTION={raw}"),
        });
    }
    parsed
}

/// `ALLOWED-CPC="com.example.drm1:SMART-TV/PC,com.example.drm2:HW"`
fn allowed_cpc(attributes: &Attributes) -> BTreeMap<String, Vec<String>> {
    let Some(raw) = attributes.get("ALLOWED-CPC") else {
        return BTreeMap::new();
    };
    split_list(raw, ',')
        .iter()
        .filter_map(|entry| entry.split_once(':'))
        .map(|(key_format, labels)| (key_format.to_string(), split_list(labels, '/')))
        .collect()
}

fn list(attributes: &Attributes, key: &str) -> Vec<String> {
    attributes
        .get(key)
        .map(|raw| split_list(raw, ','))
        .unwrap_or_default()
}

/// `EXT-X-STREAM-INF`. The variant is completed by the next URI line.
pub(super) fn stream_inf(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(bandwidth) = ctx.optional(attributes, "BANDWIDTH") else {
        return;
    };
    ctx.state.is_multivariant_playlist = true;

    let variant = VariantStream {
        bandwidth,
        average_bandwidth: ctx.optional(attributes, "AVERAGE-BANDWIDTH"),
        score: ctx.optional(attributes, "SCORE"),
        codecs: list(attributes, "CODECS"),
        supplemental_codecs: list(attributes, "SUPPLEMENTAL-CODECS"),
        resolution: resolution(ctx, attributes),
        frame_rate: ctx.optional(attributes, "FRAME-RATE"),
        hdcp_level: ctx
            .enumerated(attributes, "HDCP-LEVEL", HdcpLevel::ALLOWED)
            .unwrap_or_default(),
        allowed_cpc: allowed_cpc(attributes),
        video_range: ctx
            .enumerated(attributes, "VIDEO-RANGE", VideoRange::ALLOWED)
            .unwrap_or_default(),
        stable_variant_id: text(attributes, "STABLE-VARIANT-ID"),
        audio: text(attributes, "AUDIO"),
        video: text(attributes, "VIDEO"),
        subtitles: text(attributes, "SUBTITLES"),
        closed_captions: text(attributes, "CLOSED-CAPTIONS"),
        pathway_id: text(attributes, "PATHWAY-ID"),
        uri: String::new(),
        resolved_uri: String::new(),
    };
    ctx.state.current_variant = Some(variant);
}

pub(super) fn i_frame_stream_inf(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(bandwidth) = ctx.optional(attributes, "BANDWIDTH") else {
        return;
    };
    let Some(uri) = text(attributes, "URI") else {
        return;
    };

    let playlist = IFramePlaylist {
        bandwidth,
        average_bandwidth: ctx.optional(attributes, "AVERAGE-BANDWIDTH"),
        score: ctx.optional(attributes, "SCORE"),
        codecs: list(attributes, "CODECS"),
        supplemental_codecs: list(attributes, "SUPPLEMENTAL-CODECS"),
        resolution: resolution(ctx, attributes),
        hdcp_level: ctx
            .enumerated(attributes, "HDCP-LEVEL", HdcpLevel::ALLOWED)
            .unwrap_or_default(),
        allowed_cpc: allowed_cpc(attributes),
        video_range: ctx
            .enumerated(attributes, "VIDEO-RANGE", VideoRange::ALLOWED)
            .unwrap_or_default(),
        stable_variant_id: text(attributes, "STABLE-VARIANT-ID"),
        video: text(attributes, "VIDEO"),
        pathway_id: text(attributes, "PATHWAY-ID"),
        resolved_uri: ctx.resolve(&uri),
        uri,
    };
    ctx.playlist.i_frame_playlists.push(playlist);
}

/// `EXT-X-MEDIA`; `DEFAULT=YES` implies `AUTOSELECT=YES`.
pub(super) fn media(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Ok(Some(rendition_type)) = ctx.enumerated(attributes, "TYPE", RenditionType::ALLOWED)
    else {
        return;
    };
    let default = flag(attributes, "DEFAULT");
    let uri = text(attributes, "URI");

    let rendition = Rendition {
        rendition_type,
        group_id: text(attributes, "GROUP-ID").unwrap_or_default(),
        name: text(attributes, "NAME").unwrap_or_default(),
        language: text(attributes, "LANGUAGE"),
        assoc_language: text(attributes, "ASSOC-LANGUAGE"),
        stable_rendition_id: text(attributes, "STABLE-RENDITION-ID"),
        default,
        auto_select: default || flag(attributes, "AUTOSELECT"),
        forced: flag(attributes, "FORCED"),
        in_stream_id: text(attributes, "INSTREAM-ID"),
        bit_depth: ctx.optional(attributes, "BIT-DEPTH"),
        sample_rate: ctx.optional(attributes, "SAMPLE-RATE"),
        characteristics: list(attributes, "CHARACTERISTICS"),
        channels: text(attributes, "CHANNELS"),
        resolved_uri: uri.as_deref().map(|u| ctx.resolve(u)),
        uri,
    };
    ctx.playlist.rendition_groups.push(rendition);
}

pub(super) fn session_data(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Ok(format) = ctx.enumerated(attributes, "FORMAT", SessionDataFormat::ALLOWED) else {
        return;
    };
    let uri = text(attributes, "URI");

    let data = SessionData {
        data_id: text(attributes, "DATA-ID").unwrap_or_default(),
        value: text(attributes, "VALUE"),
        resolved_uri: uri.as_deref().map(|u| ctx.resolve(u)),
        uri,
        format: format.unwrap_or_default(),
        language: text(attributes, "LANGUAGE"),
    };
    ctx.playlist.session_data.push(data);
}

pub(super) fn session_key(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Ok(Some(method)) = ctx.enumerated(attributes, "METHOD", EncryptionMethod::ALLOWED) else {
        return;
    };
    let key = encryption(ctx, attributes, method);
    ctx.playlist.session_keys.push(key);
}

pub(super) fn content_steering(ctx: &mut TagContext<'_>, attributes: &Attributes) {
    let Some(server_uri) = text(attributes, "SERVER-URI") else {
        return;
    };
    ctx.playlist.content_steering = Some(ContentSteering {
        resolved_server_uri: ctx.resolve(&server_uri),
        server_uri,
        pathway_id: text(attributes, "PATHWAY-ID"),
    });
}
