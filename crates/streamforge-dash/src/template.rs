//! `SegmentTemplate` identifier substitution.
//!
//! Replaces `$RepresentationID$`, `$Number$`, `$Bandwidth$` and `$Time$`,
//! the last three optionally with a `%0<width>d` format tag, and turns `$$`
//! into a literal `$`. Unknown identifiers and identifiers without a value
//! are left verbatim.

/// Values available to a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateValues<'a> {
    pub representation_id: &'a str,
    pub bandwidth: u64,
    /// `None` for initialization templates.
    pub number: Option<u64>,
    pub time: Option<u64>,
}

/// Widest `%0<width>d` padding accepted; wider tags are left verbatim.
const MAX_WIDTH: usize = 64;

/// Zero-padding width of a `%0<width>d` format tag.
fn width(format: &str) -> Option<usize> {
    let digits = format.strip_prefix('%')?.strip_suffix('d')?;
    if digits.is_empty() {
        return Some(0);
    }
    digits.parse().ok().filter(|width| *width <= MAX_WIDTH)
}

fn number(value: u64, format: Option<&str>) -> Option<String> {
    match format {
        None => Some(value.to_string()),
        Some(format) => width(format).map(|width| format!("{value:0width$}")),
    }
}

fn identifier(identifier: &str, values: &TemplateValues<'_>) -> Option<String> {
    let (name, format) = match identifier.find('%') {
        Some(at) => (&identifier[..at], Some(&identifier[at..])),
        None => (identifier, None),
    };
    match name {
        "RepresentationID" => Some(values.representation_id.to_string()),
        "Bandwidth" => number(values.bandwidth, format),
        "Number" => number(values.number?, format),
        "Time" => number(values.time?, format),
        _ => None,
    }
}

/// Expand every identifier of `template`.
pub fn expand(template: &str, values: &TemplateValues<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('$') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('$') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = &after[..close];
        if name.is_empty() {
            out.push('$');
        } else {
            match identifier(name, values) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('$');
                    out.push_str(name);
                    out.push('$');
                }
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> TemplateValues<'static> {
        TemplateValues {
            representation_id: "video-1080",
            bandwidth: 4_800_000,
            number: Some(42),
            time: Some(180_000),
        }
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            expand("$RepresentationID$/seg-$Number$.m4s", &values()),
            "video-1080/seg-42.m4s"
        );
        assert_eq!(
            expand("$Bandwidth$/$Time$.m4s", &values()),
            "4800000/180000.m4s"
        );
    }

    #[test]
    fn test_width_format() {
        assert_eq!(expand("seg-$Number%05d$.m4s", &values()), "seg-00042.m4s");
        assert_eq!(expand("seg-$Number%01d$.m4s", &values()), "seg-42.m4s");
        assert_eq!(expand("t$Time%d$", &values()), "t180000");
        assert_eq!(expand("$Number%064d$", &values()).len(), 64);
    }

    #[test]
    fn test_oversized_width_left_verbatim() {
        assert_eq!(
            expand("seg-$Number%0999999999d$.m4s", &values()),
            "seg-$Number%0999999999d$.m4s"
        );
        assert_eq!(expand("$Time%065d$", &values()), "$Time%065d$");
    }

    #[test]
    fn test_escape_and_unknown() {
        assert_eq!(expand("cost$$5", &values()), "cost$5");
        assert_eq!(expand("$Unknown$-$Number$", &values()), "$Unknown$-42");
        assert_eq!(expand("dangling$Number", &values()), "dangling$Number");
    }

    #[test]
    fn test_missing_values_left_verbatim() {
        let init = TemplateValues {
            number: None,
            time: None,
            ..values()
        };
        assert_eq!(
            expand("$RepresentationID$/init-$Number$.mp4", &init),
            "video-1080/init-$Number$.mp4"
        );
    }
}
