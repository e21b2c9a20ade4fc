//! Events the core emits toward the host shell.

use serde::{Deserialize, Serialize};
use story_atlas::NodeId;

/// Outward cues, drained by the host after each call into the core.
///
/// Audio variants are cues only; whether and how they play is the host's
/// business. The ambience cues are emitted solely once the visitor has
/// entered the experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceEvent {
    /// The visitor entered from the landing screen; start the ambient bed.
    AmbienceStarted,

    /// A chapter panel opened.
    ChapterOpened(NodeId),

    /// A chapter panel closed.
    ChapterClosed(NodeId),

    /// Duck the ambient bed while a chapter plays.
    AmbienceFadeOut,

    /// Bring the ambient bed back after the panel closes.
    AmbienceFadeIn,

    /// An engagement timer ran its course and the visit now counts.
    VisitCredited(NodeId),

    /// New nodes opened on the map, in rule order.
    NodesUnlocked(Vec<NodeId>),

    /// The terminal chapter was visited. Emitted once.
    Completed,

    /// A host-scheduled rendering timer came due.
    CosmeticDue { node: NodeId, tag: String },
}
