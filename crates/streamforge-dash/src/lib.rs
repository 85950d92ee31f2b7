//! # streamforge-dash
//!
//! A resumable MPEG-DASH manifest parser.
//!
//! The MPD is scanned one byte at a time by a small tag automaton, with the
//! same full and progressive front-ends as the HLS parser. Segment lists are
//! expanded from `SegmentTemplate`, `SegmentTimeline`, `SegmentList` and
//! `SegmentBase` when each `Representation` closes.
//!
//! ## Quick Start
//!
//! ```
//! let manifest = streamforge_dash::parse(
//!     r#"<MPD type="static" mediaPresentationDuration="PT8S">
//!       <Period>
//!         <AdaptationSet mimeType="video/mp4">
//!           <SegmentTemplate timescale="1000" duration="4000"
//!             media="$RepresentationID$/$Number$.m4s" initialization="$RepresentationID$/init.mp4"/>
//!           <Representation id="720p" bandwidth="3000000" width="1280" height="720"/>
//!         </AdaptationSet>
//!       </Period>
//!     </MPD>"#,
//!     "https://cdn.example/vod/manifest.mpd",
//! )
//! .unwrap();
//!
//! let representation = manifest.representations().next().unwrap();
//! assert_eq!(representation.segments.len(), 2);
//! assert_eq!(
//!     representation.segments[1].resolved_uri,
//!     "https://cdn.example/vod/720p/2.m4s"
//! );
//! ```
//!
//! ## Progressive Parsing
//!
//! ```
//! use streamforge_dash::{ParseOptions, ProgressiveManifestParser};
//!
//! let options = ParseOptions::new("https://cdn.example/live.mpd");
//! let mut parser = ProgressiveManifestParser::default();
//! parser.push(r#"<MPD type="dyn"#, &options).unwrap();
//! parser.push(r#"amic"><Period id="p0"></Period></MPD>"#, &options).unwrap();
//!
//! let manifest = parser.done(&options).unwrap();
//! assert!(manifest.is_dynamic());
//! assert_eq!(manifest.periods[0].id.as_deref(), Some("p0"));
//! ```

mod builder;
mod elements;
mod engine;
pub mod lexer;
pub mod model;
mod state;
pub mod template;

pub use engine::ManifestSession;
pub use model::*;
pub use state::{InitializationSource, Level, Scope, SegmentInfo, SegmentUrl, SharedState, TimelineEntry};
pub use streamforge_common::{
    CustomBag, CustomTag, CustomValue, DebugEvent, Diagnostic, DiagnosticKind, Error, HookError,
    ParseOptions, Result,
};

use streamforge_common::{FullParser, ParserConfig, ProgressiveParser};

/// Parser configuration whose custom handlers see the DASH [`SharedState`].
pub type DashParserConfig = ParserConfig<SharedState>;

/// Parses a whole manifest per call.
pub type FullManifestParser = FullParser<ManifestSession>;

/// Parses a manifest pushed in chunks.
pub type ProgressiveManifestParser = ProgressiveParser<ManifestSession>;

/// Parse a manifest with default configuration.
///
/// Relative URIs are resolved against `base_url`.
pub fn parse(input: impl AsRef<[u8]>, base_url: &str) -> Result<ParsedManifest> {
    FullManifestParser::default().parse(input, &ParseOptions::new(base_url))
}
