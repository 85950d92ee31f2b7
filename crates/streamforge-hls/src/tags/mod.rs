//! Tag processor registry.
//!
//! Every built-in tag maps to a [`TagProcessor`] in a static table. A processor
//! carries only the data its shape needs (required keys, fallback, allowed
//! values) plus a plain mutation function over the session.

mod empty;
mod media;
mod multivariant;
mod value;

use crate::define;
use crate::model::ParsedPlaylist;
use crate::state::SharedState;
use crate::HlsParserConfig;
use phf::phf_map;
use std::str::FromStr;
use streamforge_common::attributes::{check_required, optional};
use streamforge_common::{uri, Attributes, Diagnostic};

/// Everything a processor may read or mutate.
pub(crate) struct TagContext<'a> {
    pub config: &'a HlsParserConfig,
    pub state: &'a mut SharedState,
    pub playlist: &'a mut ParsedPlaylist,
    pub tag: &'a str,
}

impl TagContext<'_> {
    pub fn warn(&self, diagnostic: Diagnostic) {
        self.config.warn(diagnostic);
    }

    /// Resolve a URI against the session base URL, falling back to the literal.
    pub fn resolve(&self, uri: &str) -> String {
        uri::resolve_or_literal(uri, &self.state.base_url, |d| self.config.warn(d))
    }

    /// Parse an optional attribute, warning when it is present but malformed.
    pub fn optional<T: FromStr>(&self, attributes: &Attributes, key: &str) -> Option<T> {
        optional(self.tag, attributes, key, |d| self.config.warn(d))
    }

    /// Parse an optional enumerated attribute, warning with the allowed set.
    pub fn enumerated<T: FromStr>(
        &self,
        attributes: &Attributes,
        key: &str,
        allowed: &[&str],
    ) -> Result<Option<T>, ()> {
        let Some(raw) = attributes.get(key) else {
            return Ok(None);
        };
        match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                self.warn(Diagnostic::InvalidEnumValue {
                    tag: self.tag.to_string(),
                    value: raw.clone(),
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                });
                Err(())
            }
        }
    }
}

/// An attribute value, verbatim.
pub(crate) fn text(attributes: &Attributes, key: &str) -> Option<String> {
    attributes.get(key).cloned()
}

/// A `YES`/`NO` attribute; anything but `YES` is false.
pub(crate) fn flag(attributes: &Attributes, key: &str) -> bool {
    attributes.get(key).is_some_and(|v| v == "YES")
}

/// How a tag is processed.
pub(crate) enum TagProcessor {
    /// A bare flag tag.
    Empty(fn(&mut TagContext<'_>)),

    /// A single unsigned integer. With a fallback, unparsable values store the
    /// fallback instead of skipping the tag.
    Numeric {
        fallback: Option<u64>,
        apply: fn(&mut TagContext<'_>, u64),
    },

    /// One value out of a fixed set.
    Enumerated {
        allowed: &'static [&'static str],
        apply: fn(&mut TagContext<'_>, &str),
    },

    /// A value with its own grammar.
    Value(fn(&mut TagContext<'_>, &str)),

    /// An attribute list with required keys.
    Attributes {
        required: &'static [&'static str],
        apply: fn(&mut TagContext<'_>, &Attributes),
    },
}

pub(crate) static REGISTRY: phf::Map<&'static str, TagProcessor> = phf_map! {
    "EXTM3U" => TagProcessor::Empty(empty::m3u),
    "EXT-X-INDEPENDENT-SEGMENTS" => TagProcessor::Empty(empty::independent_segments),
    "EXT-X-ENDLIST" => TagProcessor::Empty(empty::end_list),
    "EXT-X-I-FRAMES-ONLY" => TagProcessor::Empty(empty::i_frames_only),
    "EXT-X-DISCONTINUITY" => TagProcessor::Empty(empty::discontinuity),
    "EXT-X-GAP" => TagProcessor::Empty(empty::gap),

    "EXT-X-VERSION" => TagProcessor::Numeric { fallback: None, apply: value::version },
    "EXT-X-TARGETDURATION" => TagProcessor::Numeric { fallback: None, apply: value::target_duration },
    "EXT-X-MEDIA-SEQUENCE" => TagProcessor::Numeric { fallback: Some(0), apply: value::media_sequence },
    "EXT-X-DISCONTINUITY-SEQUENCE" => TagProcessor::Numeric { fallback: Some(0), apply: value::discontinuity_sequence },
    "EXT-X-BITRATE" => TagProcessor::Numeric { fallback: None, apply: value::bitrate },
    "EXT-X-PLAYLIST-TYPE" => TagProcessor::Enumerated {
        allowed: crate::model::PlaylistType::ALLOWED,
        apply: value::playlist_type,
    },
    "EXTINF" => TagProcessor::Value(value::inf),
    "EXT-X-BYTERANGE" => TagProcessor::Value(value::byte_range),
    "EXT-X-PROGRAM-DATE-TIME" => TagProcessor::Value(value::program_date_time),

    "EXT-X-START" => TagProcessor::Attributes { required: &["TIME-OFFSET"], apply: media::start },
    "EXT-X-PART-INF" => TagProcessor::Attributes { required: &["PART-TARGET"], apply: media::part_inf },
    "EXT-X-SERVER-CONTROL" => TagProcessor::Attributes { required: &[], apply: media::server_control },
    "EXT-X-KEY" => TagProcessor::Attributes { required: &["METHOD"], apply: media::key },
    "EXT-X-MAP" => TagProcessor::Attributes { required: &["URI"], apply: media::map },
    "EXT-X-PART" => TagProcessor::Attributes { required: &["URI", "DURATION"], apply: media::part },
    "EXT-X-SKIP" => TagProcessor::Attributes { required: &["SKIPPED-SEGMENTS"], apply: media::skip },
    "EXT-X-DATERANGE" => TagProcessor::Attributes { required: &["ID", "START-DATE"], apply: media::date_range },
    "EXT-X-PRELOAD-HINT" => TagProcessor::Attributes { required: &["TYPE", "URI"], apply: media::preload_hint },
    "EXT-X-RENDITION-REPORT" => TagProcessor::Attributes { required: &["URI"], apply: media::rendition_report },
    "EXT-X-DEFINE" => TagProcessor::Attributes { required: &[], apply: media::define },

    "EXT-X-MEDIA" => TagProcessor::Attributes { required: &["TYPE", "GROUP-ID", "NAME"], apply: multivariant::media },
    "EXT-X-STREAM-INF" => TagProcessor::Attributes { required: &["BANDWIDTH"], apply: multivariant::stream_inf },
    "EXT-X-I-FRAME-STREAM-INF" => TagProcessor::Attributes { required: &["BANDWIDTH", "URI"], apply: multivariant::i_frame_stream_inf },
    "EXT-X-SESSION-DATA" => TagProcessor::Attributes { required: &["DATA-ID"], apply: multivariant::session_data },
    "EXT-X-SESSION-KEY" => TagProcessor::Attributes { required: &["METHOD"], apply: multivariant::session_key },
    "EXT-X-CONTENT-STEERING" => TagProcessor::Attributes { required: &["SERVER-URI"], apply: multivariant::content_steering },
};

/// Look up the processor of a built-in tag.
pub(crate) fn lookup(key: &str) -> Option<&'static TagProcessor> {
    REGISTRY.get(key)
}

/// Run `processor` on one tag.
pub(crate) fn process(
    processor: &TagProcessor,
    ctx: &mut TagContext<'_>,
    value: Option<&str>,
    attributes: Option<&Attributes>,
) {
    match processor {
        TagProcessor::Empty(apply) => apply(ctx),
        TagProcessor::Numeric { fallback, apply } => {
            let raw = value.unwrap_or_default();
            match raw.parse::<u64>() {
                Ok(number) => apply(ctx, number),
                Err(_) => match fallback {
                    Some(fallback) => {
                        ctx.warn(Diagnostic::FallbackUsed {
                            tag: ctx.tag.to_string(),
                            value: raw.to_string(),
                            fallback: fallback.to_string(),
                        });
                        apply(ctx, *fallback);
                    }
                    None => ctx.warn(Diagnostic::UnparsableValue {
                        tag: ctx.tag.to_string(),
                        value: raw.to_string(),
                    }),
                },
            }
        }
        TagProcessor::Enumerated { allowed, apply } => {
            let raw = value.unwrap_or_default();
            if allowed.iter().any(|a| *a == raw) {
                apply(ctx, raw);
            } else {
                ctx.warn(Diagnostic::InvalidEnumValue {
                    tag: ctx.tag.to_string(),
                    value: raw.to_string(),
                    allowed: allowed.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
        TagProcessor::Value(apply) => apply(ctx, value.unwrap_or_default()),
        TagProcessor::Attributes { required, apply } => {
            let empty = Attributes::new();
            let raw = attributes.unwrap_or(&empty);
            let substituted;
            let attrs = if ctx.state.has_variables_for_substitution {
                substituted = substitute_all(ctx, raw);
                &substituted
            } else {
                raw
            };
            if check_required(ctx.tag, attrs, required, |d| ctx.warn(d)) {
                apply(ctx, attrs);
            }
        }
    }
}

fn substitute_all(ctx: &TagContext<'_>, attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .map(|(key, value)| {
            let value = define::substitute(value, &ctx.playlist.define, |d| ctx.warn(d));
            (key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_builtin_tags() {
        for key in [
            "EXTM3U",
            "EXTINF",
            "EXT-X-KEY",
            "EXT-X-STREAM-INF",
            "EXT-X-DEFINE",
            "EXT-X-PRELOAD-HINT",
        ] {
            assert!(lookup(key).is_some(), "{key} should be registered");
        }
        assert!(lookup("EXT-X-CUE-OUT").is_none());
    }

    #[test]
    fn test_required_attributes() {
        match lookup("EXT-X-PART") {
            Some(TagProcessor::Attributes { required, .. }) => {
                assert_eq!(*required, &["URI", "DURATION"])
            }
            _ => panic!("EXT-X-PART should be an attribute processor"),
        }
        match lookup("EXT-X-MEDIA-SEQUENCE") {
            Some(TagProcessor::Numeric { fallback, .. }) => assert_eq!(*fallback, Some(0)),
            _ => panic!("EXT-X-MEDIA-SEQUENCE should be numeric"),
        }
    }
}
