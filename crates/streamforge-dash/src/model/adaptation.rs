//! Adaptation sets and their descriptors.

use super::Representation;

/// A `Role` descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Role {
    pub scheme_id_uri: Option<String>,
    pub value: Option<String>,
}

/// A `ContentProtection` descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentProtection {
    pub scheme_id_uri: String,
    pub value: Option<String>,
    /// `cenc:default_KID`
    pub default_kid: Option<String>,
    /// Base64 `cenc:pssh` box.
    pub pssh: Option<String>,
}

/// An `AdaptationSet`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptationSet {
    pub id: Option<String>,
    pub content_type: Option<String>,
    pub mime_type: Option<String>,
    pub lang: Option<String>,
    pub codecs: Option<String>,
    pub label: Option<String>,
    pub segment_alignment: bool,
    pub roles: Vec<Role>,
    pub content_protections: Vec<ContentProtection>,
    pub representations: Vec<Representation>,
}
