//! Raw tag data shared between scanners, hooks and custom handlers.

use std::collections::BTreeMap;

/// Attribute list of a tag, keyed by attribute name.
pub type Attributes = BTreeMap<String, String>;

/// Output bag filled by custom tag handlers.
pub type CustomBag = BTreeMap<String, CustomValue>;

/// A tag handed to a caller-supplied custom handler.
#[derive(Debug, Clone, Copy)]
pub struct CustomTag<'a> {
    /// The tag key (HLS) or element name (DASH).
    pub key: &'a str,
    /// The raw value after the `:`. Always `None` for DASH elements, whose
    /// handlers run when the element opens.
    pub value: Option<&'a str>,
    /// The raw attribute list.
    pub attributes: Option<&'a Attributes>,
}

/// A value stored in the [`CustomBag`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CustomValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Attributes(Attributes),
    List(Vec<CustomValue>),
}

impl CustomValue {
    /// Append `value` to a list entry, converting a scalar entry into a list.
    pub fn push(&mut self, value: CustomValue) {
        match self {
            CustomValue::List(items) => items.push(value),
            other => {
                let first = std::mem::replace(other, CustomValue::List(Vec::new()));
                *other = CustomValue::List(vec![first, value]);
            }
        }
    }
}

impl From<bool> for CustomValue {
    fn from(value: bool) -> Self {
        CustomValue::Flag(value)
    }
}

impl From<f64> for CustomValue {
    fn from(value: f64) -> Self {
        CustomValue::Number(value)
    }
}

impl From<&str> for CustomValue {
    fn from(value: &str) -> Self {
        CustomValue::Text(value.to_string())
    }
}

impl From<String> for CustomValue {
    fn from(value: String) -> Self {
        CustomValue::Text(value)
    }
}

impl From<Attributes> for CustomValue {
    fn from(value: Attributes) -> Self {
        CustomValue::Attributes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_converts_scalar_to_list() {
        let mut value = CustomValue::from("first");
        value.push(CustomValue::from("second"));
        assert_eq!(
            value,
            CustomValue::List(vec!["first".into(), "second".into()])
        );

        value.push(CustomValue::Flag(true));
        match value {
            CustomValue::List(items) => assert_eq!(items.len(), 3),
            other => panic!("expected a list, got {other:?}"),
        }
    }
}
