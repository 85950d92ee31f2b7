//! Byte-driven MPD scanner.
//!
//! Same six-state shape as the playlist scanner, over `<Element attr="...">`
//! markup instead of lines. Declarations (`<?...?>`), comments and doctypes are
//! consumed inside the tag-key state and produce nothing; CDATA sections come
//! out as text. All buffers live in the [`Scanner`], so scanning can stop after
//! any byte and resume with the next chunk.

mod token;
pub use token::{ElementToken, XmlEvent};

use streamforge_common::Attributes;

/// Automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Between elements, skipping whitespace.
    #[default]
    SeekingStart,
    /// After `<`: element name, closing tag or skipped markup.
    ReadingTagKey,
    /// Inside a start tag, reading an attribute name.
    ReadingAttributeKey,
    /// Reading text content.
    ReadingTagBody,
    /// Reading an unquoted attribute value.
    ReadingAttributeValue,
    /// Reading a `"` or `'` quoted attribute value.
    ReadingQuotedAttributeValue,
}

/// Resumable MPD scanner.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    state: ScanState,
    key: Vec<u8>,
    closing: bool,
    self_closing: bool,
    quote: u8,
    attribute_key: Vec<u8>,
    attribute_value: Vec<u8>,
    attributes: Attributes,
    text: Vec<u8>,
}

/// Decode the five predefined XML entities and numeric character references.
pub fn unescape(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                    .and_then(|code| code.ok())
                    .and_then(char::from_u32),
            };
            ch.map(|ch| (ch, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn local_name(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    let name = name.trim();
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.to_string(),
    }
}

/// Whether a `<?`/`<!` construct collected in `key` has ended.
fn markup_complete(key: &[u8]) -> bool {
    if key.starts_with(b"?") {
        key.len() >= 3 && key.ends_with(b"?>")
    } else if key.starts_with(b"!--") {
        key.len() >= 6 && key.ends_with(b"-->")
    } else if key.starts_with(b"![CDATA[") {
        key.len() >= 11 && key.ends_with(b"]]>")
    } else {
        key.ends_with(b">")
    }
}

impl Scanner {
    /// Create a scanner positioned before the document.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current automaton state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    fn in_markup(&self) -> bool {
        matches!(self.key.first(), Some(b'?' | b'!'))
    }

    /// Consume one byte, returning an event when it completes one.
    pub fn step(&mut self, byte: u8) -> Option<XmlEvent> {
        match self.state {
            ScanState::SeekingStart => {
                match byte {
                    b'<' => self.state = ScanState::ReadingTagKey,
                    b if b.is_ascii_whitespace() => {}
                    b => {
                        self.text.push(b);
                        self.state = ScanState::ReadingTagBody;
                    }
                }
                None
            }
            ScanState::ReadingTagBody => match byte {
                b'<' => {
                    self.state = ScanState::ReadingTagKey;
                    self.emit_text()
                }
                b => {
                    self.text.push(b);
                    None
                }
            },
            ScanState::ReadingTagKey => {
                if self.in_markup() || (self.key.is_empty() && matches!(byte, b'?' | b'!')) {
                    self.key.push(byte);
                    return if byte == b'>' && markup_complete(&self.key) {
                        self.finish_markup()
                    } else {
                        None
                    };
                }
                match byte {
                    b'/' if self.key.is_empty() && !self.closing => self.closing = true,
                    b'/' => self.self_closing = true,
                    b'>' => return self.emit_element(),
                    b if b.is_ascii_whitespace() => {
                        if !self.key.is_empty() && !self.closing {
                            self.state = ScanState::ReadingAttributeKey;
                        }
                    }
                    b => self.key.push(b),
                }
                None
            }
            ScanState::ReadingAttributeKey => {
                match byte {
                    b'=' => {
                        self.attribute_value.clear();
                        self.state = ScanState::ReadingAttributeValue;
                    }
                    b'/' => self.self_closing = true,
                    b'>' => return self.emit_element(),
                    b if b.is_ascii_whitespace() => {}
                    b => {
                        self.self_closing = false;
                        self.attribute_key.push(b);
                    }
                }
                None
            }
            ScanState::ReadingAttributeValue => {
                match byte {
                    b'"' | b'\'' if self.attribute_value.is_empty() => {
                        self.quote = byte;
                        self.state = ScanState::ReadingQuotedAttributeValue;
                    }
                    b if b.is_ascii_whitespace() => {
                        if !self.attribute_value.is_empty() {
                            self.commit_attribute();
                            self.state = ScanState::ReadingAttributeKey;
                        }
                    }
                    b'>' => {
                        self.commit_attribute();
                        return self.emit_element();
                    }
                    b => self.attribute_value.push(b),
                }
                None
            }
            ScanState::ReadingQuotedAttributeValue => {
                if byte == self.quote {
                    self.commit_attribute();
                    self.state = ScanState::ReadingAttributeKey;
                } else {
                    self.attribute_value.push(byte);
                }
                None
            }
        }
    }

    /// Consume a whole chunk, collecting the events it completes.
    pub fn scan(&mut self, chunk: &[u8]) -> Vec<XmlEvent> {
        chunk.iter().filter_map(|&byte| self.step(byte)).collect()
    }

    fn commit_attribute(&mut self) {
        let key = String::from_utf8_lossy(&self.attribute_key).trim().to_string();
        let value = unescape(&String::from_utf8_lossy(&self.attribute_value));
        if !key.is_empty() {
            self.attributes.insert(key, value);
        }
        self.attribute_key.clear();
        self.attribute_value.clear();
    }

    fn emit_element(&mut self) -> Option<XmlEvent> {
        self.state = ScanState::SeekingStart;
        let name = local_name(&self.key);
        let attributes = std::mem::take(&mut self.attributes);
        let closing = std::mem::take(&mut self.closing);
        let self_closing = std::mem::take(&mut self.self_closing);
        self.key.clear();
        self.attribute_key.clear();
        self.attribute_value.clear();

        if name.is_empty() {
            return None;
        }
        if closing {
            return Some(XmlEvent::Close(name));
        }
        Some(XmlEvent::Open(ElementToken {
            name,
            attributes,
            self_closing,
        }))
    }

    fn finish_markup(&mut self) -> Option<XmlEvent> {
        self.state = ScanState::SeekingStart;
        let markup = std::mem::take(&mut self.key);
        let cdata = markup
            .strip_prefix(b"![CDATA[")
            .and_then(|rest| rest.strip_suffix(b"]]>"))?;
        let text = String::from_utf8_lossy(cdata).trim().to_string();
        (!text.is_empty()).then_some(XmlEvent::Text(text))
    }

    fn emit_text(&mut self) -> Option<XmlEvent> {
        let text = unescape(String::from_utf8_lossy(&self.text).trim());
        self.text.clear();
        (!text.is_empty()).then_some(XmlEvent::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(name: &str, attributes: &[(&str, &str)], self_closing: bool) -> XmlEvent {
        XmlEvent::Open(ElementToken {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            self_closing,
        })
    }

    #[test]
    fn test_elements_and_text() {
        let events = Scanner::new()
            .scan(b"<MPD type=\"static\"><BaseURL> https://cdn.example/ </BaseURL></MPD>");
        assert_eq!(
            events,
            vec![
                open("MPD", &[("type", "static")], false),
                open("BaseURL", &[], false),
                XmlEvent::Text("https://cdn.example/".into()),
                XmlEvent::Close("BaseURL".into()),
                XmlEvent::Close("MPD".into()),
            ]
        );
    }

    #[test]
    fn test_self_closing_and_single_quotes() {
        let events = Scanner::new().scan(b"<S t='0' d=\"90\" r=\"-1\"/>\n<Role value=main />");
        assert_eq!(
            events,
            vec![
                open("S", &[("t", "0"), ("d", "90"), ("r", "-1")], true),
                open("Role", &[("value", "main")], true),
            ]
        );
    }

    #[test]
    fn test_declarations_and_comments_are_skipped() {
        let input = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
            <!-- generated by <packager> -->\n\
            <!DOCTYPE MPD>\n<MPD/>";
        assert_eq!(Scanner::new().scan(input), vec![open("MPD", &[], true)]);
    }

    #[test]
    fn test_cdata_is_text() {
        let events = Scanner::new().scan(b"<Event><![CDATA[ <splice/> ]]></Event>");
        assert_eq!(events[1], XmlEvent::Text("<splice/>".into()));
    }

    #[test]
    fn test_namespace_prefix_stripped() {
        let events = Scanner::new()
            .scan(b"<cenc:pssh xmlns:cenc=\"urn:mpeg:cenc:2013\">AAAA</cenc:pssh>");
        assert_eq!(
            events,
            vec![
                open("pssh", &[("xmlns:cenc", "urn:mpeg:cenc:2013")], false),
                XmlEvent::Text("AAAA".into()),
                XmlEvent::Close("pssh".into()),
            ]
        );
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(unescape("a&amp;b&lt;c&gt;&quot;&apos;"), "a&b<c>\"'");
        assert_eq!(unescape("&#65;&#x42;"), "AB");
        assert_eq!(unescape("AT&T &unknown; &"), "AT&T &unknown; &");

        let events = Scanner::new().scan(b"<SegmentURL media=\"seg.mp4?a=1&amp;b=2\"/>");
        assert_eq!(
            events,
            vec![open("SegmentURL", &[("media", "seg.mp4?a=1&b=2")], true)]
        );
    }

    #[test]
    fn test_resumes_across_single_bytes() {
        let input = "<?xml version=\"1.0\"?><AdaptationSet lang=\"fr\" label=\"Français\">\
            <!-- c --><Representation id=\"a\"/></AdaptationSet>"
            .as_bytes();
        let expected = Scanner::new().scan(input);

        let mut scanner = Scanner::new();
        let mut events = Vec::new();
        for byte in input {
            events.extend(scanner.scan(std::slice::from_ref(byte)));
        }
        assert_eq!(events, expected);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_state_is_reported_mid_tag() {
        let mut scanner = Scanner::new();
        assert!(scanner.scan(b"<Period id=\"p").is_empty());
        assert_eq!(scanner.state(), ScanState::ReadingQuotedAttributeValue);
    }
}
