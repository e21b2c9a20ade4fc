//! Progression state - which chapters were engaged with and which nodes are
//! open on the map.

use std::collections::HashSet;

use story_atlas::{NodeId, StoryAtlas, UnlockRules};

use crate::store::StoredProgression;

/// Owns the visited and unlocked sets and applies the rule table.
///
/// All mutation goes through [`mark_visited`] and [`unlock_next`]; there
/// are no raw setters. Both operations tolerate unknown ids (no rule fires)
/// and repeated calls (the sets cannot change twice).
///
/// Invariant: `unlocked` stays a superset of `visited ∪ {start}` for any
/// caller that only selects unlocked nodes. The engine does not enforce the
/// gate itself, but it logs a warning when the invariant is broken.
///
/// [`mark_visited`]: ProgressionEngine::mark_visited
/// [`unlock_next`]: ProgressionEngine::unlock_next
#[derive(Debug, Clone)]
pub struct ProgressionEngine {
    rules: UnlockRules,
    start: NodeId,
    terminal: NodeId,
    visited: HashSet<NodeId>,
    unlocked: HashSet<NodeId>,
}

impl ProgressionEngine {
    /// Fresh progression: nothing visited, only the start node unlocked.
    pub fn new(rules: UnlockRules, start: NodeId, terminal: NodeId) -> Self {
        let unlocked = HashSet::from([start.clone()]);
        Self {
            rules,
            start,
            terminal,
            visited: HashSet::new(),
            unlocked,
        }
    }

    pub fn from_atlas(atlas: &StoryAtlas) -> Self {
        Self::new(
            atlas.rules().clone(),
            atlas.start().clone(),
            atlas.terminal().clone(),
        )
    }

    /// Record that a chapter was actually engaged with. Idempotent.
    pub fn mark_visited(&mut self, id: &NodeId) {
        if !self.unlocked.contains(id) {
            tracing::warn!(node = %id, "visit credited for a node that is not unlocked");
        }
        if self.visited.insert(id.clone()) {
            tracing::debug!(node = %id, "visit credited");
        }
    }

    /// Open whatever the rule table unlocks after completing `completed`.
    ///
    /// Candidates are evaluated against `visited ∪ {completed}`, so a
    /// convergence fires on the very call that satisfies its last
    /// prerequisite. Monotone: nothing is ever re-locked. Returns the newly
    /// opened ids in rule order; a repeat call returns nothing.
    pub fn unlock_next(&mut self, completed: &NodeId) -> Vec<NodeId> {
        let mut effective = self.visited.clone();
        effective.insert(completed.clone());

        let opened: Vec<NodeId> = self
            .rules
            .unlocked_by(completed, &effective)
            .into_iter()
            .filter(|id| !self.unlocked.contains(id))
            .collect();

        for id in &opened {
            self.unlocked.insert(id.clone());
            tracing::debug!(node = %id, "node unlocked");
        }

        opened
    }

    /// Whether the terminal chapter has been visited.
    pub fn is_complete(&self) -> bool {
        self.visited.contains(&self.terminal)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.contains(id)
    }

    pub fn unlocked(&self) -> &HashSet<NodeId> {
        &self.unlocked
    }

    pub fn visited(&self) -> &HashSet<NodeId> {
        &self.visited
    }

    pub fn start(&self) -> &NodeId {
        &self.start
    }

    pub fn terminal(&self) -> &NodeId {
        &self.terminal
    }

    /// Snapshot for persistence, sorted so storage stays deterministic.
    pub fn snapshot(&self) -> StoredProgression {
        let mut visited: Vec<NodeId> = self.visited.iter().cloned().collect();
        visited.sort();
        let mut unlocked: Vec<NodeId> = self.unlocked.iter().cloned().collect();
        unlocked.sort();

        StoredProgression { visited, unlocked }
    }

    /// Replace state with a stored snapshot, repairing whatever is off.
    ///
    /// The start node is always unlocked, visited nodes are never locked,
    /// and every rule the stored visits satisfy is replayed. An empty or
    /// corrupt snapshot therefore degrades to the fresh state.
    pub fn restore(&mut self, stored: StoredProgression) {
        self.visited = stored.visited.iter().cloned().collect();
        self.unlocked = stored.unlocked.into_iter().collect();
        self.unlocked.insert(self.start.clone());
        self.unlocked.extend(self.visited.iter().cloned());

        for id in stored.visited {
            self.unlock_next(&id);
        }
    }
}
