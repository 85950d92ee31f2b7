//! # streamforge-hls
//!
//! A resumable HLS playlist parser.
//!
//! Input is consumed one byte at a time by a plain-data scanner, so a playlist
//! can be parsed in one call or pushed in chunks as it arrives from the
//! network. Both paths give identical results.
//!
//! ## Quick Start
//!
//! ```
//! let playlist = streamforge_hls::parse(
//!     "#EXTM3U\n#EXT-X-TARGETDURATION:6\n#EXTINF:6,\nsegment-0.ts\n",
//!     "https://cdn.example/live/index.m3u8",
//! )
//! .unwrap();
//!
//! assert_eq!(playlist.target_duration, Some(6));
//! assert_eq!(
//!     playlist.segments[0].resolved_uri,
//!     "https://cdn.example/live/segment-0.ts"
//! );
//! ```
//!
//! ## Progressive Parsing
//!
//! ```
//! use streamforge_hls::{ParseOptions, ProgressivePlaylistParser};
//!
//! let options = ParseOptions::new("https://cdn.example/index.m3u8");
//! let mut parser = ProgressivePlaylistParser::default();
//! parser.push("#EXTM3U\n#EXTINF:4,\nseg", &options).unwrap();
//! parser.push(b"ment-0.ts\n#EXTINF:4,\nsegment-1.ts", &options).unwrap();
//!
//! let playlist = parser.done(&options).unwrap();
//! assert_eq!(playlist.segments.len(), 2);
//! assert_eq!(playlist.segments[1].start_time, 4.0);
//! ```

mod builder;
pub mod define;
mod engine;
pub mod lexer;
pub mod model;
mod state;
mod tags;

pub use engine::PlaylistSession;
pub use model::*;
pub use state::SharedState;
pub use streamforge_common::{
    CustomBag, CustomTag, CustomValue, DebugEvent, Diagnostic, DiagnosticKind, Error, HookError,
    ParseOptions, Result,
};

use streamforge_common::{FullParser, ParserConfig, ProgressiveParser};

/// Parser configuration whose custom handlers see the HLS [`SharedState`].
pub type HlsParserConfig = ParserConfig<SharedState>;

/// Parses a whole playlist per call.
pub type FullPlaylistParser = FullParser<PlaylistSession>;

/// Parses a playlist pushed in chunks.
pub type ProgressivePlaylistParser = ProgressiveParser<PlaylistSession>;

/// Parse a playlist with default configuration.
///
/// Relative URIs are resolved against `base_url`.
pub fn parse(input: impl AsRef<[u8]>, base_url: &str) -> Result<ParsedPlaylist> {
    FullPlaylistParser::default().parse(input, &ParseOptions::new(base_url))
}
