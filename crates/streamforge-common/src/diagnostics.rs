//! Structured diagnostics channel.
//!
//! Every anomaly the parsers tolerate is reported as a [`Diagnostic`]. The set
//! is closed so callers can match on it instead of parsing message text.

use crate::token::Attributes;
use std::fmt;

/// Broad category of a [`Diagnostic`], describing its effect on the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DiagnosticKind {
    /// The tag produced no model mutation at all.
    SkipTag,
    /// The model received a declared fallback value.
    FallbackUsed,
    /// A `{$name}` placeholder could not be resolved and was left verbatim.
    UnresolvedVariable,
    /// A URI could not be resolved and the literal was used instead.
    ResolutionFailed,
    /// Informational only; the model is unaffected.
    Advisory,
}

/// A non-fatal anomaly found while parsing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Diagnostic {
    /// A required attribute was absent; the tag was skipped.
    MissingRequiredAttribute { tag: String, attribute: String },

    /// A value could not be parsed and no fallback exists; the tag was skipped.
    UnparsableValue { tag: String, value: String },

    /// A value is not a member of the tag's allowed set; the tag was skipped.
    InvalidEnumValue {
        tag: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A byte range without an offset had no previous range to continue from.
    MissingByteRangeOffset { tag: String, value: String },

    /// The tag is neither built in nor handled by a custom handler.
    UnsupportedTag { tag: String },

    /// The tag is in the caller's ignore set.
    IgnoredTag { tag: String },

    /// A value could not be parsed; the declared fallback was stored instead.
    FallbackUsed {
        tag: String,
        value: String,
        fallback: String,
    },

    /// A substitution variable has no binding.
    UnresolvedVariable { name: String },

    /// A URI could not be resolved against the base URL.
    UriResolutionFailed {
        uri: String,
        base: String,
        reason: String,
    },

    /// A segment is longer than the playlist's target duration.
    SegmentDurationExceedsTarget {
        uri: String,
        duration: f64,
        target_duration: u64,
    },

    /// Any other informational notice.
    Advisory { tag: String, message: String },
}

impl Diagnostic {
    /// The category of this diagnostic.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::MissingRequiredAttribute { .. }
            | Diagnostic::UnparsableValue { .. }
            | Diagnostic::InvalidEnumValue { .. }
            | Diagnostic::MissingByteRangeOffset { .. }
            | Diagnostic::UnsupportedTag { .. }
            | Diagnostic::IgnoredTag { .. } => DiagnosticKind::SkipTag,
            Diagnostic::FallbackUsed { .. } => DiagnosticKind::FallbackUsed,
            Diagnostic::UnresolvedVariable { .. } => DiagnosticKind::UnresolvedVariable,
            Diagnostic::UriResolutionFailed { .. } => DiagnosticKind::ResolutionFailed,
            Diagnostic::SegmentDurationExceedsTarget { .. } | Diagnostic::Advisory { .. } => {
                DiagnosticKind::Advisory
            }
        }
    }

    /// The tag this diagnostic refers to, when there is one.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Diagnostic::MissingRequiredAttribute { tag, .. }
            | Diagnostic::UnparsableValue { tag, .. }
            | Diagnostic::InvalidEnumValue { tag, .. }
            | Diagnostic::MissingByteRangeOffset { tag, .. }
            | Diagnostic::UnsupportedTag { tag }
            | Diagnostic::IgnoredTag { tag }
            | Diagnostic::FallbackUsed { tag, .. }
            | Diagnostic::Advisory { tag, .. } => Some(tag),
            Diagnostic::UnresolvedVariable { .. }
            | Diagnostic::UriResolutionFailed { .. }
            | Diagnostic::SegmentDurationExceedsTarget { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingRequiredAttribute { tag, attribute } => {
                write!(f, "{tag}: missing required attribute {attribute}")
            }
            Diagnostic::UnparsableValue { tag, value } => {
                write!(f, "{tag}: unable to parse \"{value}\"")
            }
            Diagnostic::InvalidEnumValue {
                tag,
                value,
                allowed,
            } => write!(
                f,
                "{tag}: \"{value}\" is not one of {}",
                allowed.join(", ")
            ),
            Diagnostic::MissingByteRangeOffset { tag, value } => write!(
                f,
                "{tag}: byte range \"{value}\" has no offset and no previous range"
            ),
            Diagnostic::UnsupportedTag { tag } => write!(f, "{tag}: unsupported tag"),
            Diagnostic::IgnoredTag { tag } => write!(f, "{tag}: ignored"),
            Diagnostic::FallbackUsed {
                tag,
                value,
                fallback,
            } => write!(
                f,
                "{tag}: unable to parse \"{value}\", using fallback {fallback}"
            ),
            Diagnostic::UnresolvedVariable { name } => {
                write!(f, "unresolved variable \"{name}\"")
            }
            Diagnostic::UriResolutionFailed { uri, base, reason } => {
                write!(f, "unable to resolve \"{uri}\" against \"{base}\": {reason}")
            }
            Diagnostic::SegmentDurationExceedsTarget {
                uri,
                duration,
                target_duration,
            } => write!(
                f,
                "segment {uri} duration {duration} exceeds target duration {target_duration}"
            ),
            Diagnostic::Advisory { tag, message } => write!(f, "{tag}: {message}"),
        }
    }
}

/// Raw token information handed to the debug callback as it is scanned.
#[derive(Debug, Clone, Copy)]
pub enum DebugEvent<'a> {
    /// A tag (HLS) or opening element (DASH).
    Tag {
        key: &'a str,
        value: Option<&'a str>,
        attributes: Option<&'a Attributes>,
    },
    /// A closing element (DASH only).
    Close { key: &'a str },
    /// A URI line (HLS) or text content (DASH).
    Content(&'a str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let skip = Diagnostic::MissingRequiredAttribute {
            tag: "EXT-X-KEY".into(),
            attribute: "METHOD".into(),
        };
        assert_eq!(skip.kind(), DiagnosticKind::SkipTag);
        assert_eq!(skip.tag(), Some("EXT-X-KEY"));

        let fallback = Diagnostic::FallbackUsed {
            tag: "EXT-X-MEDIA-SEQUENCE".into(),
            value: "x".into(),
            fallback: "0".into(),
        };
        assert_eq!(fallback.kind(), DiagnosticKind::FallbackUsed);

        let variable = Diagnostic::UnresolvedVariable {
            name: "missing".into(),
        };
        assert_eq!(variable.kind(), DiagnosticKind::UnresolvedVariable);
        assert_eq!(variable.tag(), None);

        let advisory = Diagnostic::SegmentDurationExceedsTarget {
            uri: "a.ts".into(),
            duration: 11.0,
            target_duration: 10,
        };
        assert_eq!(advisory.kind(), DiagnosticKind::Advisory);
    }

    #[test]
    fn test_display_includes_details() {
        let d = Diagnostic::InvalidEnumValue {
            tag: "EXT-X-PLAYLIST-TYPE".into(),
            value: "LIVE".into(),
            allowed: vec!["EVENT".into(), "VOD".into()],
        };
        assert_eq!(
            d.to_string(),
            "EXT-X-PLAYLIST-TYPE: \"LIVE\" is not one of EVENT, VOD"
        );

        let d = Diagnostic::UnresolvedVariable {
            name: "token".into(),
        };
        assert!(d.to_string().contains("token"));
    }
}
