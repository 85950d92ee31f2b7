//! Parser configuration.
//!
//! A [`ParserConfig`] holds everything the caller can plug into a parser:
//! diagnostic and debug callbacks, custom tag handlers, the ignore set and the
//! two transform hooks. It is generic over the session state `S` handed to
//! custom handlers, so the HLS and DASH crates each expose their own alias.

use crate::diagnostics::{DebugEvent, Diagnostic};
use crate::error::{Error, HookError, Result};
use crate::token::{Attributes, CustomBag, CustomTag};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Callback receiving every diagnostic.
pub type WarnCallback = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// Callback receiving raw scanner events.
pub type DebugCallback = Arc<dyn Fn(&DebugEvent<'_>) + Send + Sync>;

/// Handler for a tag outside the built-in registry.
pub type CustomTagHandler<S> =
    Arc<dyn Fn(&CustomTag<'_>, &mut CustomBag, &S) -> std::result::Result<(), HookError> + Send + Sync>;

/// Hook rewriting a tag's raw value before built-in processing.
pub type TransformValue =
    Arc<dyn Fn(&str, Option<&str>) -> std::result::Result<Option<String>, HookError> + Send + Sync>;

/// Hook rewriting a tag's raw attributes before built-in processing.
pub type TransformAttributes =
    Arc<dyn Fn(&str, &Attributes) -> std::result::Result<Attributes, HookError> + Send + Sync>;

/// A tag after the ignore check and transform hooks ran.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreparedTag {
    pub value: Option<String>,
    pub attributes: Option<Attributes>,
}

/// Configuration for a parser.
///
/// Use the builder pattern to create a configuration:
///
/// ```
/// use streamforge_common::ParserConfig;
///
/// let config: ParserConfig<()> = ParserConfig::builder()
///     .ignore_tag("EXT-X-ALLOW-CACHE")
///     .warn_callback(|diagnostic| eprintln!("{diagnostic}"))
///     .build();
/// assert!(config.is_ignored("EXT-X-ALLOW-CACHE"));
/// ```
pub struct ParserConfig<S> {
    /// Receives every non-fatal anomaly. Default: none.
    pub warn_callback: Option<WarnCallback>,

    /// Receives raw scanner events. Default: none.
    pub debug_callback: Option<DebugCallback>,

    /// Handlers for tags the built-in registry does not know.
    pub custom_tags: HashMap<String, CustomTagHandler<S>>,

    /// Tags skipped before any processing.
    pub ignore_tags: HashSet<String>,

    /// Rewrites a tag's raw value.
    pub transform_tag_value: Option<TransformValue>,

    /// Rewrites a tag's raw attributes.
    pub transform_tag_attributes: Option<TransformAttributes>,
}

impl<S> Default for ParserConfig<S> {
    fn default() -> Self {
        Self {
            warn_callback: None,
            debug_callback: None,
            custom_tags: HashMap::new(),
            ignore_tags: HashSet::new(),
            transform_tag_value: None,
            transform_tag_attributes: None,
        }
    }
}

impl<S> Clone for ParserConfig<S> {
    fn clone(&self) -> Self {
        Self {
            warn_callback: self.warn_callback.clone(),
            debug_callback: self.debug_callback.clone(),
            custom_tags: self.custom_tags.clone(),
            ignore_tags: self.ignore_tags.clone(),
            transform_tag_value: self.transform_tag_value.clone(),
            transform_tag_attributes: self.transform_tag_attributes.clone(),
        }
    }
}

impl<S> fmt::Debug for ParserConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut custom: Vec<&String> = self.custom_tags.keys().collect();
        custom.sort();
        let mut ignored: Vec<&String> = self.ignore_tags.iter().collect();
        ignored.sort();
        f.debug_struct("ParserConfig")
            .field("warn_callback", &self.warn_callback.is_some())
            .field("debug_callback", &self.debug_callback.is_some())
            .field("custom_tags", &custom)
            .field("ignore_tags", &ignored)
            .field("transform_tag_value", &self.transform_tag_value.is_some())
            .field(
                "transform_tag_attributes",
                &self.transform_tag_attributes.is_some(),
            )
            .finish()
    }
}

impl<S> ParserConfig<S> {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration builder.
    pub fn builder() -> ParserConfigBuilder<S> {
        ParserConfigBuilder::default()
    }

    /// Whether `key` is in the ignore set.
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore_tags.contains(key)
    }

    /// Whether a custom handler is registered for `key`.
    pub fn has_custom_tag(&self, key: &str) -> bool {
        self.custom_tags.contains_key(key)
    }

    /// Report a diagnostic to the log and the warn callback.
    pub fn warn(&self, diagnostic: Diagnostic) {
        tracing::warn!(kind = ?diagnostic.kind(), "{diagnostic}");
        if let Some(callback) = &self.warn_callback {
            callback(&diagnostic);
        }
    }

    /// Report a raw scanner event to the log and the debug callback.
    pub fn debug(&self, event: &DebugEvent<'_>) {
        tracing::trace!(?event, "scanned");
        if let Some(callback) = &self.debug_callback {
            callback(event);
        }
    }

    /// Apply the ignore set and transform hooks to a raw tag.
    ///
    /// Returns `Ok(None)` when the tag is ignored (an `IgnoredTag` diagnostic
    /// has then been emitted). A failing hook is returned as an error.
    pub fn prepare_tag(
        &self,
        key: &str,
        value: Option<&str>,
        attributes: Option<&Attributes>,
    ) -> Result<Option<PreparedTag>> {
        if self.is_ignored(key) {
            self.warn(Diagnostic::IgnoredTag {
                tag: key.to_string(),
            });
            return Ok(None);
        }

        let value = match &self.transform_tag_value {
            Some(transform) => transform(key, value).map_err(|e| Error::transform(key, e))?,
            None => value.map(str::to_string),
        };

        let attributes = match &self.transform_tag_attributes {
            Some(transform) => {
                let empty = Attributes::new();
                let transformed = transform(key, attributes.unwrap_or(&empty))
                    .map_err(|e| Error::transform(key, e))?;
                if attributes.is_none() && transformed.is_empty() {
                    None
                } else {
                    Some(transformed)
                }
            }
            None => attributes.cloned(),
        };

        Ok(Some(PreparedTag { value, attributes }))
    }

    /// Run the custom handler registered for `key`, if any.
    ///
    /// Returns whether a handler was found.
    pub fn run_custom_tag(
        &self,
        key: &str,
        value: Option<&str>,
        attributes: Option<&Attributes>,
        bag: &mut CustomBag,
        state: &S,
    ) -> Result<bool> {
        let Some(handler) = self.custom_tags.get(key) else {
            return Ok(false);
        };
        let tag = CustomTag {
            key,
            value,
            attributes,
        };
        handler(&tag, bag, state).map_err(|e| Error::custom_tag(key, e))?;
        Ok(true)
    }
}

/// Builder for `ParserConfig`.
pub struct ParserConfigBuilder<S> {
    warn_callback: Option<WarnCallback>,
    debug_callback: Option<DebugCallback>,
    custom_tags: HashMap<String, CustomTagHandler<S>>,
    ignore_tags: HashSet<String>,
    transform_tag_value: Option<TransformValue>,
    transform_tag_attributes: Option<TransformAttributes>,
}

impl<S> Default for ParserConfigBuilder<S> {
    fn default() -> Self {
        Self {
            warn_callback: None,
            debug_callback: None,
            custom_tags: HashMap::new(),
            ignore_tags: HashSet::new(),
            transform_tag_value: None,
            transform_tag_attributes: None,
        }
    }
}

impl<S> ParserConfigBuilder<S> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the callback receiving every diagnostic.
    pub fn warn_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        self.warn_callback = Some(Arc::new(callback));
        self
    }

    /// Set the callback receiving raw scanner events.
    pub fn debug_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DebugEvent<'_>) + Send + Sync + 'static,
    {
        self.debug_callback = Some(Arc::new(callback));
        self
    }

    /// Register a handler for a tag outside the built-in registry.
    ///
    /// Built-in tags always win; a handler registered under a built-in key is
    /// never called.
    pub fn custom_tag<F>(mut self, key: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&CustomTag<'_>, &mut CustomBag, &S) -> std::result::Result<(), HookError>
            + Send
            + Sync
            + 'static,
    {
        self.custom_tags.insert(key.into(), Arc::new(handler));
        self
    }

    /// Skip `key` before any processing.
    pub fn ignore_tag(mut self, key: impl Into<String>) -> Self {
        self.ignore_tags.insert(key.into());
        self
    }

    /// Skip every key in `keys` before any processing.
    pub fn ignore_tags<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.ignore_tags.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Set the hook rewriting raw tag values.
    ///
    /// Returning `Ok(None)` removes the value.
    pub fn transform_tag_value<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> std::result::Result<Option<String>, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.transform_tag_value = Some(Arc::new(transform));
        self
    }

    /// Set the hook rewriting raw tag attributes.
    ///
    /// Tags without an attribute list are passed an empty map.
    pub fn transform_tag_attributes<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str, &Attributes) -> std::result::Result<Attributes, HookError>
            + Send
            + Sync
            + 'static,
    {
        self.transform_tag_attributes = Some(Arc::new(transform));
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ParserConfig<S> {
        ParserConfig {
            warn_callback: self.warn_callback,
            debug_callback: self.debug_callback,
            custom_tags: self.custom_tags,
            ignore_tags: self.ignore_tags,
            transform_tag_value: self.transform_tag_value,
            transform_tag_attributes: self.transform_tag_attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::CustomValue;
    use std::sync::Mutex;

    fn collecting() -> (ParserConfigBuilder<()>, Arc<Mutex<Vec<Diagnostic>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let builder = ParserConfig::builder()
            .warn_callback(move |d: &Diagnostic| sink.lock().unwrap().push(d.clone()));
        (builder, seen)
    }

    #[test]
    fn test_default_config() {
        let config: ParserConfig<()> = ParserConfig::default();
        assert!(config.warn_callback.is_none());
        assert!(config.custom_tags.is_empty());
        assert!(config.ignore_tags.is_empty());
    }

    #[test]
    fn test_config_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParserConfig<()>>();
    }

    #[test]
    fn test_ignored_tag_warns_and_stops() {
        let (builder, seen) = collecting();
        let config = builder.ignore_tags(["EXT-X-FOO", "EXT-X-BAR"]).build();

        let prepared = config.prepare_tag("EXT-X-FOO", Some("1"), None).unwrap();
        assert!(prepared.is_none());
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[Diagnostic::IgnoredTag {
                tag: "EXT-X-FOO".into()
            }]
        );
    }

    #[test]
    fn test_transform_hooks_rewrite_tag() {
        let config: ParserConfig<()> = ParserConfig::builder()
            .transform_tag_value(|key, value| {
                Ok(match key {
                    "EXT-X-VERSION" => Some("7".to_string()),
                    _ => value.map(str::to_string),
                })
            })
            .transform_tag_attributes(|_, attributes| {
                let mut attributes = attributes.clone();
                attributes.insert("INJECTED".into(), "YES".into());
                Ok(attributes)
            })
            .build();

        let prepared = config
            .prepare_tag("EXT-X-VERSION", Some("3"), None)
            .unwrap()
            .unwrap();
        assert_eq!(prepared.value.as_deref(), Some("7"));
        assert_eq!(
            prepared.attributes.unwrap().get("INJECTED").map(String::as_str),
            Some("YES")
        );
    }

    #[test]
    fn test_transform_error_is_returned() {
        let config: ParserConfig<()> = ParserConfig::builder()
            .transform_tag_value(|_, _| Err("rejected".into()))
            .build();
        let err = config.prepare_tag("EXTINF", Some("5,"), None).unwrap_err();
        assert!(matches!(err, Error::Transform { .. }));
        assert_eq!(err.tag(), "EXTINF");
    }

    #[test]
    fn test_custom_tag_handler_fills_bag() {
        let config: ParserConfig<()> = ParserConfig::builder()
            .custom_tag("EXT-X-CUE-OUT", |tag, bag, _| {
                bag.insert(
                    tag.key.to_string(),
                    CustomValue::from(tag.value.unwrap_or_default()),
                );
                Ok(())
            })
            .build();

        let mut bag = CustomBag::new();
        assert!(config
            .run_custom_tag("EXT-X-CUE-OUT", Some("30"), None, &mut bag, &())
            .unwrap());
        assert!(!config
            .run_custom_tag("EXT-X-OTHER", None, None, &mut bag, &())
            .unwrap());
        assert_eq!(bag.get("EXT-X-CUE-OUT"), Some(&CustomValue::from("30")));
    }

    #[test]
    fn test_custom_tag_error_is_returned() {
        let config: ParserConfig<()> = ParserConfig::builder()
            .custom_tag("EXT-X-FAIL", |_, _, _| Err("handler failed".into()))
            .build();
        let mut bag = CustomBag::new();
        let err = config
            .run_custom_tag("EXT-X-FAIL", None, None, &mut bag, &())
            .unwrap_err();
        assert!(matches!(err, Error::CustomTag { .. }));
    }
}
