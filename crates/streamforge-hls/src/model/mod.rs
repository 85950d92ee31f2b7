//! Data model types for parsed HLS playlists.
//!
//! [`ParsedPlaylist`] is the root. It only grows during a session: records are
//! appended once complete and not touched again, except for program date time
//! back-fill when the first `EXT-X-PROGRAM-DATE-TIME` arrives late.

/// Implements `as_str`, `FromStr` and the allowed-value list for an
/// enumerated attribute.
macro_rules! enumerated {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Every value the attribute accepts.
            pub const ALLOWED: &'static [&'static str] = &[$($text),+];

            /// The playlist spelling of this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::model::ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::model::ParseError(other.to_string())),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod date_range;
mod playlist;
mod rendition;
mod segment;
mod variant;

pub use date_range::DateRange;
pub use playlist::{
    ContentSteering, Define, ParsedPlaylist, PartInf, PlaylistType, PreloadHint, PreloadHintType,
    PreloadHints, RenditionReport, ServerControl, SessionData, SessionDataFormat, Skip, Start,
};
pub use rendition::{Rendition, RenditionGroups, RenditionType};
pub use segment::{
    Encryption, EncryptionMethod, MediaInitializationSection, PartialSegment, Segment,
};
pub use streamforge_common::values::{ByteRange, Resolution};
pub use variant::{HdcpLevel, IFramePlaylist, VariantStream, VideoRange};

/// Error type for parsing enumerated values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for ParseError {}
