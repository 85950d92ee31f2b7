//! Per-call parse options.

use std::collections::BTreeMap;

/// Options supplied with each parse call.
///
/// For a progressive parser the options passed to the first `push` of a session
/// are captured; later pushes in the same session ignore theirs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOptions {
    /// URL every relative URI is resolved against.
    pub base_url: String,

    /// Timeline origin of the first segment, in seconds.
    pub base_time: f64,

    /// Seed bindings for `IMPORT` variable definitions.
    pub base_define: BTreeMap<String, String>,
}

impl ParseOptions {
    /// Options with the given base URL, base time `0` and no define table.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the timeline origin.
    pub fn with_base_time(mut self, base_time: f64) -> Self {
        self.base_time = base_time;
        self
    }

    /// Add one binding to the base define table.
    pub fn with_define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_define.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let options = ParseOptions::new("https://cdn.example/live/main.m3u8")
            .with_base_time(12.5)
            .with_define("token", "abc");
        assert_eq!(options.base_url, "https://cdn.example/live/main.m3u8");
        assert_eq!(options.base_time, 12.5);
        assert_eq!(options.base_define.get("token").map(String::as_str), Some("abc"));
    }
}
