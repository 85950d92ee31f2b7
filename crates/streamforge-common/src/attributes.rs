//! Attribute-list helpers used by tag processors.

use crate::diagnostics::Diagnostic;
use crate::token::Attributes;
use std::str::FromStr;

/// Check that every `required` key is present.
///
/// Emits one `MissingRequiredAttribute` per missing key and returns whether
/// the tag may be processed.
pub fn check_required(
    tag: &str,
    attributes: &Attributes,
    required: &[&str],
    mut warn: impl FnMut(Diagnostic),
) -> bool {
    let mut complete = true;
    for key in required {
        if !attributes.contains_key(*key) {
            warn(Diagnostic::MissingRequiredAttribute {
                tag: tag.to_string(),
                attribute: (*key).to_string(),
            });
            complete = false;
        }
    }
    complete
}

/// Parse an optional attribute.
///
/// An absent key yields `None` silently; a present but malformed value yields
/// `None` and an `UnparsableValue` diagnostic.
pub fn optional<T: FromStr>(
    tag: &str,
    attributes: &Attributes,
    key: &str,
    warn: impl FnOnce(Diagnostic),
) -> Option<T> {
    let raw = attributes.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn(Diagnostic::UnparsableValue {
                tag: tag.to_string(),
                value: format!("{key}={raw}"),
            });
            None
        }
    }
}
