//! Byte-driven playlist scanner.
//!
//! The scanner is a six-state automaton that knows nothing about playlist
//! semantics. It consumes one byte per [`Scanner::step`] and emits a
//! [`ScanEvent`] when a line ends. Every buffer lives in the `Scanner` value,
//! so a session can stop after any byte and resume with the next chunk.
//!
//! Text is decoded as UTF-8 only when an event is emitted, which keeps
//! multi-byte characters split across chunks intact.

mod token;
pub use token::{ScanEvent, TagToken};

use streamforge_common::Attributes;

/// Automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Between lines.
    #[default]
    SeekingStart,
    /// After `#`, before `:` or the end of the line.
    ReadingTagKey,
    /// Inside an attribute list, reading a key.
    ReadingAttributeKey,
    /// Reading a URI line.
    ReadingTagBody,
    /// Reading an unquoted attribute value.
    ReadingAttributeValue,
    /// Reading a double-quoted attribute value.
    ReadingQuotedAttributeValue,
}

/// Resumable playlist scanner.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    state: ScanState,
    key: Vec<u8>,
    value: Vec<u8>,
    attribute_key: Vec<u8>,
    attribute_value: Vec<u8>,
    attributes: Attributes,
    line: Vec<u8>,
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

impl Scanner {
    /// Create a scanner positioned at the start of a line.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current automaton state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Consume one byte, returning an event when it completes a line.
    pub fn step(&mut self, byte: u8) -> Option<ScanEvent> {
        match self.state {
            ScanState::SeekingStart => {
                match byte {
                    b'#' => self.state = ScanState::ReadingTagKey,
                    b if b.is_ascii_whitespace() => {}
                    b => {
                        self.line.push(b);
                        self.state = ScanState::ReadingTagBody;
                    }
                }
                None
            }
            ScanState::ReadingTagKey => match byte {
                b'\n' => self.emit_tag(false),
                b':' => {
                    self.state = ScanState::ReadingAttributeKey;
                    None
                }
                b => {
                    self.key.push(b);
                    None
                }
            },
            ScanState::ReadingTagBody => match byte {
                b'\n' => self.emit_uri(),
                b => {
                    self.line.push(b);
                    None
                }
            },
            ScanState::ReadingAttributeKey => {
                if byte == b'\n' {
                    return self.emit_tag(true);
                }
                self.value.push(byte);
                match byte {
                    b'=' => {
                        self.attribute_value.clear();
                        self.state = ScanState::ReadingAttributeValue;
                    }
                    // A key without `=` is plain value text.
                    b',' => self.attribute_key.clear(),
                    b => self.attribute_key.push(b),
                }
                None
            }
            ScanState::ReadingAttributeValue => {
                if byte == b'\n' {
                    self.commit_attribute(false);
                    return self.emit_tag(true);
                }
                self.value.push(byte);
                match byte {
                    b'"' if self.attribute_value.is_empty() => {
                        self.state = ScanState::ReadingQuotedAttributeValue;
                    }
                    b',' => {
                        self.commit_attribute(false);
                        self.state = ScanState::ReadingAttributeKey;
                    }
                    b => self.attribute_value.push(b),
                }
                None
            }
            ScanState::ReadingQuotedAttributeValue => {
                if byte == b'\n' {
                    self.commit_attribute(true);
                    return self.emit_tag(true);
                }
                self.value.push(byte);
                match byte {
                    b'"' => {
                        self.commit_attribute(true);
                        self.state = ScanState::ReadingAttributeKey;
                    }
                    b => self.attribute_value.push(b),
                }
                None
            }
        }
    }

    /// Consume a whole chunk, collecting the events it completes.
    pub fn scan(&mut self, chunk: &[u8]) -> Vec<ScanEvent> {
        chunk.iter().filter_map(|&byte| self.step(byte)).collect()
    }

    fn commit_attribute(&mut self, quoted: bool) {
        let key = decode(&self.attribute_key);
        let value = if quoted {
            String::from_utf8_lossy(&self.attribute_value).into_owned()
        } else {
            decode(&self.attribute_value)
        };
        if !key.is_empty() {
            self.attributes.insert(key, value);
        }
        self.attribute_key.clear();
        self.attribute_value.clear();
    }

    fn emit_tag(&mut self, has_value: bool) -> Option<ScanEvent> {
        self.state = ScanState::SeekingStart;
        let key = decode(&self.key);
        let value = decode(&self.value);
        let attributes = std::mem::take(&mut self.attributes);
        self.key.clear();
        self.value.clear();
        self.attribute_key.clear();
        self.attribute_value.clear();

        // Lines starting with `#` that are not tags are comments.
        if !key.starts_with("EXT") {
            return None;
        }
        Some(ScanEvent::Tag(TagToken {
            key,
            value: has_value.then_some(value),
            attributes: has_value.then_some(attributes),
        }))
    }

    fn emit_uri(&mut self) -> Option<ScanEvent> {
        self.state = ScanState::SeekingStart;
        let line = decode(&self.line);
        self.line.clear();
        (!line.is_empty()).then_some(ScanEvent::Uri(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(key: &str, value: Option<&str>, attributes: Option<&[(&str, &str)]>) -> ScanEvent {
        ScanEvent::Tag(TagToken {
            key: key.to_string(),
            value: value.map(str::to_string),
            attributes: attributes.map(|pairs| {
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            }),
        })
    }

    #[test]
    fn test_bare_tag_and_uri() {
        let events = Scanner::new().scan(b"#EXTM3U\nsegment.ts\n");
        assert_eq!(
            events,
            vec![tag("EXTM3U", None, None), ScanEvent::Uri("segment.ts".into())]
        );
    }

    #[test]
    fn test_value_tag_keeps_empty_attributes() {
        let events = Scanner::new().scan(b"#EXTINF:5,Intro title\n");
        assert_eq!(events, vec![tag("EXTINF", Some("5,Intro title"), Some(&[]))]);
    }

    #[test]
    fn test_attribute_list() {
        let events = Scanner::new()
            .scan(b"#EXT-X-STREAM-INF:BANDWIDTH=1280000,CODECS=\"avc1.4d401f,mp4a.40.2\",RESOLUTION=640x360\n");
        assert_eq!(
            events,
            vec![tag(
                "EXT-X-STREAM-INF",
                Some("BANDWIDTH=1280000,CODECS=\"avc1.4d401f,mp4a.40.2\",RESOLUTION=640x360"),
                Some(&[
                    ("BANDWIDTH", "1280000"),
                    ("CODECS", "avc1.4d401f,mp4a.40.2"),
                    ("RESOLUTION", "640x360"),
                ]),
            )]
        );
    }

    #[test]
    fn test_quoted_value_keeps_equals() {
        let events = Scanner::new().scan(b"#EXT-X-MAP:URI=\"init.mp4?a=b\"\n");
        assert_eq!(
            events,
            vec![tag(
                "EXT-X-MAP",
                Some("URI=\"init.mp4?a=b\""),
                Some(&[("URI", "init.mp4?a=b")]),
            )]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let events = Scanner::new().scan(b"#EXTM3U\r\n#EXT-X-VERSION:4\r\n#EXT-X-KEY:METHOD=NONE\r\nseg.ts\r\n");
        assert_eq!(
            events,
            vec![
                tag("EXTM3U", None, None),
                tag("EXT-X-VERSION", Some("4"), Some(&[])),
                tag("EXT-X-KEY", Some("METHOD=NONE"), Some(&[("METHOD", "NONE")])),
                ScanEvent::Uri("seg.ts".into()),
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let events = Scanner::new().scan(b"# a comment: with=attrs\n#EXT-X-ENDLIST\n");
        assert_eq!(events, vec![tag("EXT-X-ENDLIST", None, None)]);
    }

    #[test]
    fn test_newline_ends_unterminated_quote() {
        let mut scanner = Scanner::new();
        let events = scanner.scan(b"#EXT-X-MEDIA:NAME=\"broken\nnext.ts\n");
        assert_eq!(
            events,
            vec![
                tag("EXT-X-MEDIA", Some("NAME=\"broken"), Some(&[("NAME", "broken")])),
                ScanEvent::Uri("next.ts".into()),
            ]
        );
        assert_eq!(scanner.state(), ScanState::SeekingStart);
    }

    #[test]
    fn test_resumes_across_single_bytes() {
        let input = "#EXT-X-SESSION-DATA:DATA-ID=\"com.example.title\",VALUE=\"Café\"\n".as_bytes();
        let expected = Scanner::new().scan(input);

        let mut scanner = Scanner::new();
        let mut events = Vec::new();
        for byte in input {
            events.extend(scanner.scan(std::slice::from_ref(byte)));
        }
        assert_eq!(events, expected);
        match &events[0] {
            ScanEvent::Tag(token) => assert_eq!(
                token.attributes.as_ref().unwrap().get("VALUE").map(String::as_str),
                Some("Café")
            ),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_state_is_reported_mid_line() {
        let mut scanner = Scanner::new();
        assert!(scanner.scan(b"#EXT-X-KEY:URI=\"ke").is_empty());
        assert_eq!(scanner.state(), ScanState::ReadingQuotedAttributeValue);
    }
}
