//! URI resolution against the session base URL.

use crate::diagnostics::Diagnostic;
use url::Url;

/// Resolve `uri` against `base`.
pub fn resolve(uri: &str, base: &str) -> Result<String, url::ParseError> {
    let base = Url::parse(base)?;
    Ok(base.join(uri)?.to_string())
}

/// Resolve `uri` against `base`, falling back to the literal.
///
/// Failures are reported through `warn` as `UriResolutionFailed`.
pub fn resolve_or_literal(uri: &str, base: &str, warn: impl FnOnce(Diagnostic)) -> String {
    match resolve(uri, base) {
        Ok(resolved) => resolved,
        Err(e) => {
            warn(Diagnostic::UriResolutionFailed {
                uri: uri.to_string(),
                base: base.to_string(),
                reason: e.to_string(),
            });
            uri.to_string()
        }
    }
}

/// Look up a query parameter of `base`.
pub fn query_param(base: &str, name: &str) -> Option<String> {
    let url = Url::parse(base).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve("segment-1.ts", "https://cdn.example/live/index.m3u8").unwrap(),
            "https://cdn.example/live/segment-1.ts"
        );
        assert_eq!(
            resolve("/root.ts", "https://cdn.example/live/index.m3u8").unwrap(),
            "https://cdn.example/root.ts"
        );
        assert_eq!(
            resolve("https://other.example/a.ts", "https://cdn.example/x.m3u8").unwrap(),
            "https://other.example/a.ts"
        );
    }

    #[test]
    fn test_resolve_failure_falls_back() {
        let mut warned = None;
        let resolved = resolve_or_literal("segment.ts", "not a url", |d| warned = Some(d));
        assert_eq!(resolved, "segment.ts");
        assert!(matches!(
            warned,
            Some(Diagnostic::UriResolutionFailed { ref uri, .. }) if uri == "segment.ts"
        ));
    }

    #[test]
    fn test_query_param() {
        let base = "https://cdn.example/live.m3u8?token=abc&session=1";
        assert_eq!(query_param(base, "token").as_deref(), Some("abc"));
        assert_eq!(query_param(base, "missing"), None);
        assert_eq!(query_param("relative.m3u8", "token"), None);
    }
}
