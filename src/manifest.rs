//! Format detection and parser setup for the CLI.

use crate::config::{Config, ParserSettings};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use streamforge_common::{Diagnostic, ParseOptions, ParserConfig};
use streamforge_dash::{FullManifestParser, ParsedManifest, ProgressiveManifestParser};
use streamforge_hls::{FullPlaylistParser, ParsedPlaylist, ProgressivePlaylistParser};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot tell whether {0} is an HLS playlist or a DASH manifest")]
    UnknownFormat(String),

    #[error("invalid base URL {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("manifest path cannot be turned into a file URL: {0}")]
    FileUrl(String),

    #[error(transparent)]
    Parse(#[from] streamforge_common::Error),
}

/// Manifest format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Decide from the file extension, then from the content
    #[default]
    Auto,
    Hls,
    Dash,
}

impl Format {
    /// Resolve `Auto` for the manifest at `path` with content `input`.
    pub fn detect(self, path: &Path, input: &[u8]) -> Result<Format, ManifestError> {
        if self != Format::Auto {
            return Ok(self);
        }
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("m3u8" | "m3u") => return Ok(Format::Hls),
            Some("mpd") => return Ok(Format::Dash),
            _ => {}
        }

        let body = input.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(input);
        let start = body.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(body.len());
        let body = &body[start..];
        if body.starts_with(b"#EXTM3U") {
            Ok(Format::Hls)
        } else if body.starts_with(b"<") {
            Ok(Format::Dash)
        } else {
            Err(ManifestError::UnknownFormat(path.display().to_string()))
        }
    }
}

/// A parsed manifest of either format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "manifest", rename_all = "lowercase")]
pub enum Manifest {
    Hls(ParsedPlaylist),
    Dash(ParsedManifest),
}

/// A manifest together with the diagnostics raised while parsing it.
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub manifest: Manifest,
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-call options from the configuration, with an optional base URL
/// override.
pub fn parse_options(
    config: &Config,
    base_url_override: Option<&str>,
    path: &Path,
) -> Result<ParseOptions, ManifestError> {
    let base_url = match base_url_override.or(config.parser.base_url.as_deref()) {
        Some(url) => url::Url::parse(url)
            .map_err(|source| ManifestError::BaseUrl {
                url: url.to_string(),
                source,
            })?
            .to_string(),
        None => file_url(path)?,
    };

    let options = config
        .define
        .iter()
        .fold(ParseOptions::new(base_url), |options, (name, value)| {
            options.with_define(name.clone(), value.clone())
        });
    Ok(options.with_base_time(config.parser.base_time))
}

fn file_url(path: &Path) -> Result<String, ManifestError> {
    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    url::Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .map_err(|()| ManifestError::FileUrl(path.display().to_string()))
}

/// Parser configuration collecting every diagnostic into `sink`.
fn parser_config<S>(settings: &ParserSettings, sink: Arc<Mutex<Vec<Diagnostic>>>) -> ParserConfig<S> {
    ParserConfig::builder()
        .ignore_tags(settings.ignore_tags.iter().cloned())
        .warn_callback(move |diagnostic| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(diagnostic.clone());
            }
        })
        .build()
}

/// Parse `input` as `format`, in one call or in chunks of `chunk_size` bytes.
///
/// `format` should already be detected; `Auto` parses as HLS.
pub fn parse(
    input: &[u8],
    format: Format,
    settings: &ParserSettings,
    options: &ParseOptions,
    chunk_size: Option<usize>,
) -> Result<ParseReport, ManifestError> {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let manifest = match format {
        Format::Hls | Format::Auto => {
            let config = parser_config(settings, Arc::clone(&sink));
            Manifest::Hls(match chunk_size {
                Some(size) => {
                    let mut parser = ProgressivePlaylistParser::new(config);
                    for chunk in input.chunks(size.max(1)) {
                        parser.push(chunk, options)?;
                    }
                    parser.done(options)?
                }
                None => FullPlaylistParser::new(config).parse(input, options)?,
            })
        }
        Format::Dash => {
            let config = parser_config(settings, Arc::clone(&sink));
            Manifest::Dash(match chunk_size {
                Some(size) => {
                    let mut parser = ProgressiveManifestParser::new(config);
                    for chunk in input.chunks(size.max(1)) {
                        parser.push(chunk, options)?;
                    }
                    parser.done(options)?
                }
                None => FullManifestParser::new(config).parse(input, options)?,
            })
        }
    };

    let diagnostics = sink.lock().map(|seen| seen.clone()).unwrap_or_default();
    tracing::debug!(diagnostics = diagnostics.len(), "manifest parsed");
    Ok(ParseReport {
        manifest,
        diagnostics,
    })
}
