//! The unlock rule table - which completions open which nodes.
//!
//! Rules are plain data. Nothing downstream hardcodes node names; adding a
//! path or another convergence is a content change, not a code change.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::constellation::NodeId;

/// An N-ary all-of rule: `unlocks` opens once every id in `requires` has
/// been visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceRule {
    pub requires: Vec<NodeId>,
    pub unlocks: NodeId,
}

impl ConvergenceRule {
    pub fn new(requires: Vec<NodeId>, unlocks: impl Into<NodeId>) -> Self {
        Self {
            requires,
            unlocks: unlocks.into(),
        }
    }

    /// Whether the visited set satisfies every prerequisite.
    pub fn satisfied_by(&self, visited: &HashSet<NodeId>) -> bool {
        self.requires.iter().all(|id| visited.contains(id))
    }
}

/// The full unlock table: a direct map plus convergence rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnlockRules {
    #[serde(default)]
    direct: HashMap<NodeId, Vec<NodeId>>,

    #[serde(default, rename = "convergence")]
    convergences: Vec<ConvergenceRule>,
}

impl UnlockRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a direct rule: completing `completed` unlocks `unlocks`.
    pub fn add_direct(&mut self, completed: impl Into<NodeId>, unlocks: Vec<NodeId>) {
        self.direct.entry(completed.into()).or_default().extend(unlocks);
    }

    pub fn add_convergence(&mut self, rule: ConvergenceRule) {
        self.convergences.push(rule);
    }

    /// Direct unlocks for a completed node. Unknown ids yield an empty slice.
    pub fn direct_unlocks(&self, completed: &str) -> &[NodeId] {
        self.direct
            .get(completed)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn convergences(&self) -> &[ConvergenceRule] {
        &self.convergences
    }

    /// Every node id mentioned anywhere in the table.
    pub fn referenced_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.direct
            .iter()
            .flat_map(|(completed, unlocks)| std::iter::once(completed).chain(unlocks))
            .chain(self.convergences.iter().flat_map(|rule| {
                rule.requires.iter().chain(std::iter::once(&rule.unlocks))
            }))
    }

    /// Evaluate what completing `completed` opens, given the visited set.
    ///
    /// `visited` must already include `completed`, so a convergence fires on
    /// the call that satisfies its last prerequisite. The result keeps rule
    /// order, may repeat ids already unlocked, and is empty for unknown ids.
    pub fn unlocked_by(&self, completed: &NodeId, visited: &HashSet<NodeId>) -> Vec<NodeId> {
        let mut opened = Vec::new();

        for id in self.direct_unlocks(completed.as_str()) {
            if !opened.contains(id) {
                opened.push(id.clone());
            }
        }

        for rule in &self.convergences {
            if rule.satisfied_by(visited) && !opened.contains(&rule.unlocks) {
                opened.push(rule.unlocks.clone());
            }
        }

        opened
    }
}
