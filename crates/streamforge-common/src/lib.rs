//! Streamforge-Common: pieces shared by the HLS and DASH manifest parsers.
//!
//! Both format crates are built from the same parts: a byte-driven scanner,
//! a static table of tag processors, a session-scoped shared state and a model
//! builder. This crate holds everything that does not depend on the format:
//!
//! - **Diagnostics**: the closed set of non-fatal anomalies ([`Diagnostic`])
//! - **Configuration**: caller hooks and callbacks ([`ParserConfig`])
//! - **Parse options**: per-call base URL, base time and define table
//! - **Front-ends**: [`FullParser`] and [`ProgressiveParser`] over any [`Engine`]
//! - **Value grammars**: byte ranges, resolutions, ISO 8601 durations, dates
//! - **URI resolution**: relative references against the session base URL
//!
//! # Examples
//!
//! ```
//! use streamforge_common::{Diagnostic, DiagnosticKind};
//!
//! let diagnostic = Diagnostic::UnsupportedTag { tag: "EXT-X-FOO".into() };
//! assert_eq!(diagnostic.kind(), DiagnosticKind::SkipTag);
//! ```

pub mod attributes;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod options;
pub mod session;
pub mod token;
pub mod uri;
pub mod values;

pub use config::{ParserConfig, ParserConfigBuilder, PreparedTag};
pub use diagnostics::{DebugEvent, Diagnostic, DiagnosticKind};
pub use error::{Error, HookError, Result};
pub use options::ParseOptions;
pub use session::{Engine, FullParser, ProgressiveParser};
pub use token::{Attributes, CustomBag, CustomTag, CustomValue};
