//! The story atlas - one validated aggregate holding everything a
//! documentary needs: graph, chapters, rules, and the entry/exit nodes.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::chapters::{Chapter, Chapters};
use crate::constellation::{Constellation, Link, Node, NodeId};
use crate::rules::UnlockRules;

mod reference;

/// Errors raised while loading or validating an atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to read atlas file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed atlas document: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{context} references unknown node `{id}`")]
    UnknownNode { context: &'static str, id: NodeId },

    #[error("start node `{0}` is decorative")]
    DecorativeStart(NodeId),

    #[error("duplicate node id `{0}`")]
    DuplicateNode(NodeId),

    #[error("node `{0}` has a non-finite position")]
    NonFinitePosition(NodeId),
}

/// A complete documentary: constellation, chapter payloads, unlock rules,
/// and the start/terminal nodes.
///
/// Construction validates referential integrity, so a loaded atlas never
/// points at nodes that do not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryAtlas {
    constellation: Constellation,
    chapters: Chapters,
    rules: UnlockRules,
    start: NodeId,
    terminal: NodeId,
}

impl StoryAtlas {
    /// Assemble and validate an atlas.
    pub fn new(
        constellation: Constellation,
        chapters: Chapters,
        rules: UnlockRules,
        start: NodeId,
        terminal: NodeId,
    ) -> Result<Self, AtlasError> {
        let atlas = Self {
            constellation,
            chapters,
            rules,
            start,
            terminal,
        };
        atlas.validate()?;
        Ok(atlas)
    }

    /// Parse an atlas from a TOML document.
    pub fn from_toml_str(doc: &str) -> Result<Self, AtlasError> {
        let doc: AtlasDoc = toml::from_str(doc)?;
        doc.into_atlas()
    }

    /// Load an atlas from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The reference documentary shipped with the crate, "Horizons
    /// Suspendus".
    pub fn bundled() -> Self {
        reference::horizons()
    }

    pub fn constellation(&self) -> &Constellation {
        &self.constellation
    }

    pub fn chapters(&self) -> &Chapters {
        &self.chapters
    }

    pub fn rules(&self) -> &UnlockRules {
        &self.rules
    }

    /// The node unlocked from the first frame.
    pub fn start(&self) -> &NodeId {
        &self.start
    }

    /// Visiting this node completes the documentary.
    pub fn terminal(&self) -> &NodeId {
        &self.terminal
    }

    /// Total chapter lookup; nodes without content yield `None`.
    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.get(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.constellation.node(id)
    }

    /// Check that every reference in the atlas points at a known node and
    /// that every authored position is finite.
    pub fn validate(&self) -> Result<(), AtlasError> {
        let mut seen = HashSet::new();
        for node in self.constellation.nodes() {
            if !seen.insert(node.id.clone()) {
                return Err(AtlasError::DuplicateNode(node.id.clone()));
            }
            // TOML happily parses `nan` and `inf` floats.
            if let Some(position) = node.position {
                if !position.x.is_finite() || !position.y.is_finite() {
                    return Err(AtlasError::NonFinitePosition(node.id.clone()));
                }
            }
        }

        self.require_known("start", &self.start)?;
        self.require_known("terminal", &self.terminal)?;
        if self.constellation.is_decorative(self.start.as_str()) {
            return Err(AtlasError::DecorativeStart(self.start.clone()));
        }

        for link in self.constellation.links() {
            self.require_known("link", &link.source)?;
            self.require_known("link", &link.target)?;
        }
        for id in self.rules.referenced_ids() {
            self.require_known("rule", id)?;
        }
        for id in self.chapters.ids() {
            self.require_known("chapter", id)?;
        }

        Ok(())
    }

    fn require_known(&self, context: &'static str, id: &NodeId) -> Result<(), AtlasError> {
        if self.constellation.contains(id.as_str()) {
            Ok(())
        } else {
            Err(AtlasError::UnknownNode {
                context,
                id: id.clone(),
            })
        }
    }
}

/// On-disk shape of an atlas document.
#[derive(Debug, Deserialize)]
struct AtlasDoc {
    start: NodeId,
    terminal: NodeId,

    #[serde(default, rename = "node")]
    nodes: Vec<Node>,

    #[serde(default, rename = "link")]
    links: Vec<Link>,

    #[serde(default)]
    rules: UnlockRules,

    #[serde(default)]
    chapters: Chapters,
}

impl AtlasDoc {
    fn into_atlas(self) -> Result<StoryAtlas, AtlasError> {
        StoryAtlas::new(
            Constellation::new(self.nodes, self.links),
            self.chapters,
            self.rules,
            self.start,
            self.terminal,
        )
    }
}
