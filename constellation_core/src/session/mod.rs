//! Chapter Session - the lifecycle of one opened chapter panel.
//!
//! A session starts when a chapter opens and ends when it closes. It owns
//! two kinds of timers: the single engagement timer that credits the visit
//! once the reader has stayed long enough, and any number of cosmetic
//! tasks scheduled while the panel is open. Engagement survives closing
//! the panel early; cosmetics do not.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use story_atlas::NodeId;

/// Unique identifier for a chapter session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cosmetic effect scheduled while a chapter is open.
///
/// Cosmetic tasks are tied to the panel: closing the chapter drops any
/// that have not come due yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosmeticTask {
    pub tag: String,
    pub due: Instant,
}

/// A visit credit that outlived its session.
///
/// Produced when a chapter closes before its engagement timer fired. The
/// coordinator keeps it and credits the visit once `due` passes.
#[derive(Debug, Clone)]
pub struct PendingVisit {
    pub node: NodeId,
    pub due: Instant,
}

/// State of one open chapter panel.
#[derive(Debug, Clone)]
pub struct ChapterSession {
    id: SessionId,
    node: NodeId,
    opened_at: Instant,
    engagement_due: Instant,
    engagement_fired: bool,
    cosmetics: Vec<CosmeticTask>,
}

impl ChapterSession {
    /// Open a session for a chapter node.
    pub fn open(node: NodeId, now: Instant, engagement_delay: Duration) -> Self {
        Self {
            id: SessionId::new(),
            node,
            opened_at: now,
            engagement_due: now + engagement_delay,
            engagement_fired: false,
            cosmetics: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Node this session belongs to.
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    /// When the engagement timer comes due.
    pub fn engagement_due(&self) -> Instant {
        self.engagement_due
    }

    /// Whether the engagement timer has already fired.
    pub fn engagement_fired(&self) -> bool {
        self.engagement_fired
    }

    /// Fire the engagement timer if it is due.
    ///
    /// Returns true exactly once, on the first call at or after the
    /// deadline.
    pub fn take_engagement(&mut self, now: Instant) -> bool {
        if self.engagement_fired || now < self.engagement_due {
            return false;
        }
        self.engagement_fired = true;
        true
    }

    /// Schedule a cosmetic effect to fire at `due`.
    pub fn schedule_cosmetic(&mut self, tag: impl Into<String>, due: Instant) {
        self.cosmetics.push(CosmeticTask { tag: tag.into(), due });
    }

    /// Remove and return every cosmetic task that has come due.
    ///
    /// Tasks keep the order they were scheduled in.
    pub fn take_due_cosmetics(&mut self, now: Instant) -> Vec<CosmeticTask> {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.cosmetics)
            .into_iter()
            .partition(|task| task.due <= now);
        self.cosmetics = pending;
        due
    }

    /// Close the session.
    ///
    /// If the engagement timer has not fired yet, returns the visit that
    /// still has to be credited once its deadline passes. Cosmetic tasks
    /// that never came due are dropped.
    pub fn close(self) -> Option<PendingVisit> {
        if self.engagement_fired {
            None
        } else {
            Some(PendingVisit {
                node: self.node,
                due: self.engagement_due,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> NodeId {
        NodeId::from(raw)
    }

    fn delay() -> Duration {
        Duration::from_millis(1800)
    }

    #[test]
    fn test_engagement_waits_for_delay() {
        let now = Instant::now();
        let mut session = ChapterSession::open(id("les-racines"), now, delay());

        assert!(!session.take_engagement(now));
        assert!(!session.take_engagement(now + Duration::from_millis(1000)));
        assert!(!session.engagement_fired());
    }

    #[test]
    fn test_engagement_fires_exactly_once() {
        let now = Instant::now();
        let mut session = ChapterSession::open(id("les-racines"), now, delay());

        let due = now + delay();
        assert!(session.take_engagement(due));
        assert!(session.engagement_fired());
        assert!(!session.take_engagement(due));
        assert!(!session.take_engagement(due + Duration::from_secs(10)));
    }

    #[test]
    fn test_close_before_engagement_leaves_pending_visit() {
        let now = Instant::now();
        let session = ChapterSession::open(id("le-vertige"), now, delay());

        let pending = session.close().unwrap();
        assert_eq!(pending.node, id("le-vertige"));
        assert_eq!(pending.due, now + delay());
    }

    #[test]
    fn test_close_after_engagement_has_nothing_pending() {
        let now = Instant::now();
        let mut session = ChapterSession::open(id("le-vertige"), now, delay());

        assert!(session.take_engagement(now + Duration::from_secs(2)));
        assert!(session.close().is_none());
    }

    #[test]
    fn test_cosmetics_fire_in_scheduled_order() {
        let now = Instant::now();
        let mut session = ChapterSession::open(id("la-boussole"), now, delay());

        session.schedule_cosmetic("halo", now + Duration::from_millis(300));
        session.schedule_cosmetic("shimmer", now + Duration::from_millis(100));
        session.schedule_cosmetic("echo", now + Duration::from_millis(900));

        assert!(session.take_due_cosmetics(now).is_empty());

        let due = session.take_due_cosmetics(now + Duration::from_millis(300));
        let tags: Vec<_> = due.iter().map(|task| task.tag.as_str()).collect();
        assert_eq!(tags, ["halo", "shimmer"]);

        let rest = session.take_due_cosmetics(now + Duration::from_secs(1));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].tag, "echo");
    }

    #[test]
    fn test_fresh_sessions_get_distinct_ids() {
        let now = Instant::now();
        let first = ChapterSession::open(id("les-racines"), now, delay());
        let second = ChapterSession::open(id("les-racines"), now, delay());
        assert_ne!(first.id(), second.id());
    }
}
