//! Chapter payloads - the narrative content behind each node.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constellation::NodeId;

/// Media attached to a chapter. Values are asset paths or URLs resolved by
/// the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterMedia {
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub video: Option<String>,

    /// Spoken testimony track.
    #[serde(default)]
    pub voiceover: Option<String>,

    /// Looping sound bed played behind the chapter.
    #[serde(default)]
    pub background_audio: Option<String>,

    /// Embedded visualization markup.
    #[serde(default)]
    pub embed: Option<String>,
}

impl ChapterMedia {
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
            && self.video.is_none()
            && self.voiceover.is_none()
            && self.background_audio.is_none()
            && self.embed.is_none()
    }
}

/// The content panel behind a narrative node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,

    /// Body paragraphs, in display order.
    #[serde(default)]
    pub body: Vec<String>,

    #[serde(flatten)]
    pub media: ChapterMedia,
}

impl Chapter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
            media: ChapterMedia::default(),
        }
    }

    pub fn with_body(mut self, paragraphs: Vec<&str>) -> Self {
        self.body = paragraphs.into_iter().map(str::to_string).collect();
        self
    }

    pub fn with_media(mut self, media: ChapterMedia) -> Self {
        self.media = media;
        self
    }
}

/// Chapter payloads keyed by node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chapters {
    entries: HashMap<NodeId, Chapter>,
}

impl Chapters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<NodeId>, chapter: Chapter) {
        self.entries.insert(id.into(), chapter);
    }

    /// Total lookup: a node without a chapter yields `None`, never an error.
    pub fn get(&self, id: &str) -> Option<&Chapter> {
        self.entries.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
