//! Alternative renditions (`EXT-X-MEDIA`).

use std::collections::BTreeMap;

/// `TYPE` of a rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING-KEBAB-CASE"))]
pub enum RenditionType {
    #[default]
    Audio,
    Video,
    Subtitles,
    ClosedCaptions,
}

enumerated!(RenditionType {
    Audio => "AUDIO",
    Video => "VIDEO",
    Subtitles => "SUBTITLES",
    ClosedCaptions => "CLOSED-CAPTIONS",
});

/// One alternative rendition.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rendition {
    pub rendition_type: RenditionType,
    pub group_id: String,
    pub name: String,
    pub language: Option<String>,
    pub assoc_language: Option<String>,
    pub stable_rendition_id: Option<String>,
    pub default: bool,
    /// Also set when `default` is.
    pub auto_select: bool,
    pub forced: bool,
    pub in_stream_id: Option<String>,
    pub bit_depth: Option<u32>,
    pub sample_rate: Option<u32>,
    pub characteristics: Vec<String>,
    pub channels: Option<String>,
    pub uri: Option<String>,
    pub resolved_uri: Option<String>,
}

/// Renditions grouped by type, then `GROUP-ID`, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenditionGroups {
    pub audio: BTreeMap<String, Vec<Rendition>>,
    pub video: BTreeMap<String, Vec<Rendition>>,
    pub subtitles: BTreeMap<String, Vec<Rendition>>,
    pub closed_captions: BTreeMap<String, Vec<Rendition>>,
}

impl RenditionGroups {
    /// The groups of one rendition type.
    pub fn of_type(&self, rendition_type: RenditionType) -> &BTreeMap<String, Vec<Rendition>> {
        match rendition_type {
            RenditionType::Audio => &self.audio,
            RenditionType::Video => &self.video,
            RenditionType::Subtitles => &self.subtitles,
            RenditionType::ClosedCaptions => &self.closed_captions,
        }
    }

    /// The renditions of one group, in declaration order.
    pub fn group(&self, rendition_type: RenditionType, group_id: &str) -> &[Rendition] {
        self.of_type(rendition_type)
            .get(group_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append a rendition to its group.
    pub fn push(&mut self, rendition: Rendition) {
        let groups = match rendition.rendition_type {
            RenditionType::Audio => &mut self.audio,
            RenditionType::Video => &mut self.video,
            RenditionType::Subtitles => &mut self.subtitles,
            RenditionType::ClosedCaptions => &mut self.closed_captions,
        };
        groups
            .entry(rendition.group_id.clone())
            .or_default()
            .push(rendition);
    }

    /// Whether no rendition was declared.
    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
            && self.video.is_empty()
            && self.subtitles.is_empty()
            && self.closed_captions.is_empty()
    }
}
