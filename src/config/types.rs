use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserSettings,

    /// Base define table, imported by `EXT-X-DEFINE:IMPORT`.
    #[serde(default)]
    pub define: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ParserSettings {
    /// Tags (HLS) or elements (DASH) skipped before any processing
    #[serde(default)]
    pub ignore_tags: Vec<String>,

    /// Base URL for relative URIs. Defaults to the manifest's `file://` URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Session time of the first segment, in seconds
    #[serde(default)]
    pub base_time: f64,

    /// Feed the parser in chunks of this many bytes instead of in one call
    #[serde(default)]
    pub chunk_size: Option<usize>,
}
