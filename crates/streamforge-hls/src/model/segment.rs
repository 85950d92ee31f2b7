//! Media segments and the records attached to them.

use super::ByteRange;

/// Encryption method of an `EXT-X-KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncryptionMethod {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "NONE"))]
    None,
    #[cfg_attr(feature = "serde", serde(rename = "AES-128"))]
    Aes128,
    #[cfg_attr(feature = "serde", serde(rename = "SAMPLE-AES"))]
    SampleAes,
    #[cfg_attr(feature = "serde", serde(rename = "SAMPLE-AES-CTR"))]
    SampleAesCtr,
}

enumerated!(EncryptionMethod {
    None => "NONE",
    Aes128 => "AES-128",
    SampleAes => "SAMPLE-AES",
    SampleAesCtr => "SAMPLE-AES-CTR",
});

/// Key used to decrypt segments.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encryption {
    pub method: EncryptionMethod,
    pub uri: Option<String>,
    pub resolved_uri: Option<String>,
    pub iv: Option<String>,
    /// `KEYFORMAT`, `identity` when absent.
    pub key_format: String,
    pub key_format_versions: Option<String>,
}

/// Media initialization section declared by `EXT-X-MAP`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaInitializationSection {
    pub uri: String,
    pub resolved_uri: String,
    pub byte_range: Option<ByteRange>,
    /// The key active when the map was declared.
    pub encryption: Option<Encryption>,
}

/// A low-latency partial segment (`EXT-X-PART`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartialSegment {
    pub uri: String,
    pub resolved_uri: String,
    pub duration: f64,
    pub independent: bool,
    pub byte_range: Option<ByteRange>,
    pub is_gap: bool,
}

/// A media segment.
///
/// Times are in seconds on the session timeline. Program date times are
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub uri: String,
    pub resolved_uri: String,
    pub title: Option<String>,
    pub duration: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub media_sequence: u64,
    pub discontinuity_sequence: u64,
    pub is_discontinuity: bool,
    pub is_gap: bool,
    pub byte_range: Option<ByteRange>,
    pub bitrate: Option<u64>,
    pub encryption: Option<Encryption>,
    pub map: Option<MediaInitializationSection>,
    pub parts: Vec<PartialSegment>,
    pub program_date_time_start: Option<f64>,
    pub program_date_time_end: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encryption_method_from_str() {
        assert_eq!("AES-128".parse(), Ok(EncryptionMethod::Aes128));
        assert_eq!("SAMPLE-AES-CTR".parse(), Ok(EncryptionMethod::SampleAesCtr));
        assert!("aes-128".parse::<EncryptionMethod>().is_err());
        assert_eq!(EncryptionMethod::SampleAes.to_string(), "SAMPLE-AES");
        assert_eq!(EncryptionMethod::ALLOWED.len(), 4);
    }
}
