//! Descriptors attached to adaptation sets.

use super::{text, ElementContext};
use crate::model::{ContentProtection, Role};
use streamforge_common::Attributes;

/// `ContentProtection`, with the `cenc:default_KID` of the common
/// encryption scheme.
pub(super) fn content_protection(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let default_kid = attributes
        .iter()
        .find(|(key, _)| key.rsplit(':').next() == Some("default_KID"))
        .map(|(_, value)| value.clone());
    ctx.state.current_content_protection = Some(ContentProtection {
        scheme_id_uri: text(attributes, "schemeIdUri").unwrap_or_default(),
        value: text(attributes, "value"),
        default_kid,
        pssh: None,
    });
    true
}

/// `cenc:pssh` inside a `ContentProtection`.
pub(super) fn pssh(ctx: &mut ElementContext<'_>, content: &str) {
    if let Some(protection) = ctx.state.current_content_protection.as_mut() {
        protection.pssh = Some(content.to_string());
    }
}

pub(super) fn close_content_protection(ctx: &mut ElementContext<'_>) {
    let Some(protection) = ctx.state.current_content_protection.take() else {
        return;
    };
    match ctx.state.current_adaptation_set.as_mut() {
        Some(adaptation_set) => adaptation_set.content_protections.push(protection),
        None => ctx.advisory("content protection outside an adaptation set was dropped"),
    }
}

pub(super) fn role(ctx: &mut ElementContext<'_>, attributes: &Attributes) -> bool {
    let role = Role {
        scheme_id_uri: text(attributes, "schemeIdUri"),
        value: text(attributes, "value"),
    };
    match ctx.state.current_adaptation_set.as_mut() {
        Some(adaptation_set) => adaptation_set.roles.push(role),
        None => ctx.advisory("role outside an adaptation set was dropped"),
    }
    true
}
