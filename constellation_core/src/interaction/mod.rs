//! Pointer interaction over the constellation: hit-testing, selection
//! gating, and the phase each node renders in.

mod viewport;

pub use viewport::*;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use story_atlas::{Constellation, Link, NodeId};

use crate::progression::ProgressionEngine;

/// Tuning for pointer interaction.
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    /// Canvas-space radius inside which a pointer reaches a node.
    pub hit_radius: f32,

    /// How long a freshly unlocked node stays click-proof while its reveal
    /// animation plays.
    pub reveal_interval: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            hit_radius: 15.0,
            reveal_interval: Duration::from_millis(1500),
        }
    }
}

/// What a node currently renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    /// Not reachable yet.
    Locked,
    /// Unlocked moments ago; the reveal animation is playing and clicks are
    /// ignored.
    JustUnlocked,
    /// Open for selection.
    Unlocked,
    /// Its chapter panel is on screen.
    Open,
    /// Its chapter has been engaged with.
    Visited,
}

/// How a link should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Background tie touching a decorative star.
    Muted,
    /// Leads to an unlocked node.
    Solid,
    /// Leads somewhere still locked.
    Dashed,
}

/// The interaction layer over one rendered constellation.
///
/// Owns what the engine does not: reveal deadlines, the open panel, and the
/// hovered node. Every other answer derives from engine state, so the view
/// can never disagree with progression.
#[derive(Debug, Clone)]
pub struct ConstellationView {
    viewport: Viewport,
    config: ViewConfig,
    reveals: HashMap<NodeId, Instant>,
    open: Option<NodeId>,
    hovered: Option<NodeId>,
}

impl ConstellationView {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_config(viewport, ViewConfig::default())
    }

    pub fn with_config(viewport: Viewport, config: ViewConfig) -> Self {
        Self {
            viewport,
            config,
            reveals: HashMap::new(),
            open: None,
            hovered: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
    }

    /// The node under the pointer: the nearest one within the hit radius.
    ///
    /// Strictly closer wins; at equal distance the earlier table entry is
    /// kept. Nodes without coordinates never match, and neither do nodes
    /// whose distance comes out non-finite.
    pub fn node_at<'a>(
        &self,
        constellation: &'a Constellation,
        x: f32,
        y: f32,
    ) -> Option<&'a NodeId> {
        let mut best: Option<(&NodeId, f32)> = None;

        for node in constellation.nodes() {
            let Some(position) = node.position else {
                continue;
            };
            let point = self.viewport.project(position);
            let distance = ((x - point.x).powi(2) + (y - point.y).powi(2)).sqrt();
            // Positive comparisons; a NaN distance never qualifies.
            let within = distance < self.config.hit_radius;
            let nearer = best.map_or(true, |(_, nearest)| distance < nearest);
            if within && nearer {
                best = Some((&node.id, distance));
            }
        }

        best.map(|(id, _)| id)
    }

    /// Whether the node can be clicked right now: unlocked, narrative, and
    /// past its reveal interval.
    pub fn selectable(
        &self,
        engine: &ProgressionEngine,
        constellation: &Constellation,
        id: &NodeId,
        now: Instant,
    ) -> bool {
        engine.is_unlocked(id.as_str())
            && !constellation.is_decorative(id.as_str())
            && !self.is_revealing(id, now)
    }

    fn is_revealing(&self, id: &NodeId, now: Instant) -> bool {
        self.reveals.get(id).map(|until| now < *until).unwrap_or(false)
    }

    /// Hover bookkeeping. Returns the hovered node when the pointer could
    /// select it; hosts switch the cursor on that.
    pub fn pointer_moved(
        &mut self,
        engine: &ProgressionEngine,
        constellation: &Constellation,
        x: f32,
        y: f32,
        now: Instant,
    ) -> Option<NodeId> {
        let hit = self.node_at(constellation, x, y).cloned();
        self.hovered = hit.clone();
        hit.filter(|id| self.selectable(engine, constellation, id, now))
    }

    /// Resolve a click. Locked nodes, decorative stars, nodes mid-reveal,
    /// and empty space all come back as `None` with nothing changed.
    pub fn try_select(
        &self,
        engine: &ProgressionEngine,
        constellation: &Constellation,
        x: f32,
        y: f32,
        now: Instant,
    ) -> Option<NodeId> {
        let id = self.node_at(constellation, x, y)?;
        if self.selectable(engine, constellation, id, now) {
            Some(id.clone())
        } else {
            tracing::debug!(node = %id, "selection ignored");
            None
        }
    }

    /// Start reveal timers for nodes that just unlocked.
    pub fn begin_reveal(&mut self, opened: &[NodeId], now: Instant) {
        for id in opened {
            self.reveals
                .insert(id.clone(), now + self.config.reveal_interval);
        }
    }

    /// Drop reveal deadlines that have passed. Pure bookkeeping; phases
    /// derive correctly either way.
    pub fn prune_reveals(&mut self, now: Instant) {
        self.reveals.retain(|_, until| now < *until);
    }

    pub fn set_open(&mut self, id: Option<NodeId>) {
        self.open = id;
    }

    pub fn open(&self) -> Option<&NodeId> {
        self.open.as_ref()
    }

    pub fn hovered(&self) -> Option<&NodeId> {
        self.hovered.as_ref()
    }

    /// The phase `id` renders in right now.
    pub fn phase(&self, engine: &ProgressionEngine, id: &NodeId, now: Instant) -> NodePhase {
        if self.open.as_ref() == Some(id) {
            return NodePhase::Open;
        }
        if engine.is_visited(id.as_str()) {
            return NodePhase::Visited;
        }
        if !engine.is_unlocked(id.as_str()) {
            return NodePhase::Locked;
        }
        if self.is_revealing(id, now) {
            NodePhase::JustUnlocked
        } else {
            NodePhase::Unlocked
        }
    }

    /// How to draw a link given current progression.
    pub fn link_style(
        &self,
        engine: &ProgressionEngine,
        constellation: &Constellation,
        link: &Link,
    ) -> LinkStyle {
        if constellation.is_decorative_link(link) {
            LinkStyle::Muted
        } else if engine.is_unlocked(link.target.as_str()) {
            LinkStyle::Solid
        } else {
            LinkStyle::Dashed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use story_atlas::{Node, UnlockRules};

    fn id(raw: &str) -> NodeId {
        NodeId::new(raw)
    }

    /// Three narrative nodes on a 800x600 canvas at scale 1.0, one star,
    /// and one node with no coordinates.
    ///
    /// Canvas positions: origin (400, 300), east (500, 300), far (400, 100),
    /// star (300, 300).
    fn fixture() -> (Constellation, ProgressionEngine, ConstellationView) {
        let constellation = Constellation::new(
            vec![
                Node::new("origin", "Origin").with_position(0.0, 0.0),
                Node::new("east", "East").with_position(100.0, 0.0),
                Node::new("far", "Far").with_position(0.0, -200.0),
                Node::new("star", "").with_size(2.0).with_position(-100.0, 0.0).decorative(),
                Node::new("adrift", "Adrift"),
            ],
            vec![
                Link::new("origin", "east"),
                Link::new("origin", "far"),
                Link::new("star", "origin"),
            ],
        );

        let mut rules = UnlockRules::new();
        rules.add_direct("origin", vec![id("east")]);
        rules.add_direct("east", vec![id("far")]);
        let engine = ProgressionEngine::new(rules, id("origin"), id("far"));

        let view = ConstellationView::new(Viewport::with_scale(800.0, 600.0, 1.0));

        (constellation, engine, view)
    }

    #[test]
    fn test_empty_space_misses() {
        let (constellation, _, view) = fixture();
        assert!(view.node_at(&constellation, 50.0, 50.0).is_none());
    }

    #[test]
    fn test_exact_hit_resolves() {
        let (constellation, _, view) = fixture();
        let hit = view.node_at(&constellation, 400.0, 300.0).unwrap();
        assert_eq!(hit.as_str(), "origin");
    }

    #[test]
    fn test_hit_requires_radius() {
        let (constellation, _, view) = fixture();

        assert!(view.node_at(&constellation, 400.0, 314.0).is_some());
        assert!(view.node_at(&constellation, 400.0, 315.0).is_none());
    }

    #[test]
    fn test_nearest_node_wins() {
        let (_, _, view) = fixture();

        // Two nodes 20 canvas units apart, both within radius of the probe.
        let crowded = Constellation::new(
            vec![
                Node::new("first", "First").with_position(0.0, 0.0),
                Node::new("second", "Second").with_position(20.0, 0.0),
            ],
            vec![],
        );

        // Probe sits 12 units from `first`, 8 from `second`.
        let hit = view.node_at(&crowded, 412.0, 300.0).unwrap();
        assert_eq!(hit.as_str(), "second");
    }

    #[test]
    fn test_equidistant_tie_keeps_table_order() {
        let (_, _, view) = fixture();

        let crowded = Constellation::new(
            vec![
                Node::new("first", "First").with_position(0.0, 0.0),
                Node::new("second", "Second").with_position(20.0, 0.0),
            ],
            vec![],
        );

        // Probe sits exactly between the two.
        let hit = view.node_at(&crowded, 410.0, 300.0).unwrap();
        assert_eq!(hit.as_str(), "first");
    }

    #[test]
    fn test_nodes_without_coordinates_never_match() {
        let (constellation, _, view) = fixture();

        for x in (0..800).step_by(25) {
            for y in (0..600).step_by(25) {
                if let Some(hit) = view.node_at(&constellation, x as f32, y as f32) {
                    assert_ne!(hit.as_str(), "adrift");
                }
            }
        }
    }

    #[test]
    fn test_non_finite_coordinates_never_capture_the_pointer() {
        let (_, _, view) = fixture();

        let haunted = Constellation::new(
            vec![
                Node::new("real", "Real").with_position(0.0, 0.0),
                Node::new("ghost", "Ghost").with_position(f32::NAN, f32::INFINITY),
            ],
            vec![],
        );

        // A NaN distance must not displace a genuine hit, nor match alone.
        let hit = view.node_at(&haunted, 400.0, 300.0).unwrap();
        assert_eq!(hit.as_str(), "real");
        assert!(view.node_at(&haunted, 50.0, 50.0).is_none());
    }

    #[test]
    fn test_locked_node_is_not_selectable() {
        let (constellation, engine, view) = fixture();
        let now = Instant::now();

        // `east` is locked until origin is completed.
        assert!(view.try_select(&engine, &constellation, 500.0, 300.0, now).is_none());

        // The engine state is untouched by the attempt.
        assert!(!engine.is_visited("east"));
        assert_eq!(engine.unlocked().len(), 1);
    }

    #[test]
    fn test_unlocked_node_selects() {
        let (constellation, engine, view) = fixture();
        let now = Instant::now();

        let selected = view.try_select(&engine, &constellation, 400.0, 300.0, now);
        assert_eq!(selected, Some(id("origin")));
    }

    #[test]
    fn test_decorative_node_is_never_selectable() {
        let (constellation, _, view) = fixture();
        let now = Instant::now();

        // Even a decorative node forced open by a rule stays unselectable.
        let mut rules = UnlockRules::new();
        rules.add_direct("origin", vec![id("star")]);
        let mut engine = ProgressionEngine::new(rules, id("origin"), id("far"));
        engine.mark_visited(&id("origin"));
        engine.unlock_next(&id("origin"));
        assert!(engine.is_unlocked("star"));

        assert!(view.try_select(&engine, &constellation, 300.0, 300.0, now).is_none());
    }

    #[test]
    fn test_reveal_interval_gates_clicks() {
        let (constellation, mut engine, mut view) = fixture();
        let now = Instant::now();

        engine.mark_visited(&id("origin"));
        let opened = engine.unlock_next(&id("origin"));
        view.begin_reveal(&opened, now);

        // Mid-reveal: the click is swallowed.
        let mid = now + Duration::from_millis(800);
        assert!(view.try_select(&engine, &constellation, 500.0, 300.0, mid).is_none());
        assert_eq!(view.phase(&engine, &id("east"), mid), NodePhase::JustUnlocked);

        // Past the interval the node opens up.
        let later = now + Duration::from_millis(1500);
        assert_eq!(
            view.try_select(&engine, &constellation, 500.0, 300.0, later),
            Some(id("east"))
        );
        assert_eq!(view.phase(&engine, &id("east"), later), NodePhase::Unlocked);
    }

    #[test]
    fn test_phase_derivation() {
        let (_, mut engine, mut view) = fixture();
        let now = Instant::now();

        assert_eq!(view.phase(&engine, &id("east"), now), NodePhase::Locked);
        assert_eq!(view.phase(&engine, &id("origin"), now), NodePhase::Unlocked);

        view.set_open(Some(id("origin")));
        assert_eq!(view.phase(&engine, &id("origin"), now), NodePhase::Open);

        view.set_open(None);
        engine.mark_visited(&id("origin"));
        assert_eq!(view.phase(&engine, &id("origin"), now), NodePhase::Visited);
    }

    #[test]
    fn test_pointer_moved_reports_selectable_only() {
        let (constellation, engine, mut view) = fixture();
        let now = Instant::now();

        // Over a locked node: hover is tracked, selectability is not.
        let over_locked = view.pointer_moved(&engine, &constellation, 500.0, 300.0, now);
        assert!(over_locked.is_none());
        assert_eq!(view.hovered(), Some(&id("east")));

        let over_open = view.pointer_moved(&engine, &constellation, 400.0, 300.0, now);
        assert_eq!(over_open, Some(id("origin")));

        let over_nothing = view.pointer_moved(&engine, &constellation, 50.0, 50.0, now);
        assert!(over_nothing.is_none());
        assert!(view.hovered().is_none());
    }

    #[test]
    fn test_link_styles() {
        let (constellation, mut engine, view) = fixture();

        // origin -> east while east is locked.
        assert_eq!(
            view.link_style(&engine, &constellation, &constellation.links()[0]),
            LinkStyle::Dashed
        );

        engine.mark_visited(&id("origin"));
        engine.unlock_next(&id("origin"));
        assert_eq!(
            view.link_style(&engine, &constellation, &constellation.links()[0]),
            LinkStyle::Solid
        );

        // Anything touching a star stays muted, unlocked or not.
        assert_eq!(
            view.link_style(&engine, &constellation, &constellation.links()[2]),
            LinkStyle::Muted
        );
    }

    #[test]
    fn test_prune_reveals_keeps_pending_deadlines() {
        let (_, _, mut view) = fixture();
        let now = Instant::now();

        view.begin_reveal(&[id("east"), id("far")], now);
        view.prune_reveals(now + Duration::from_millis(200));
        assert!(view.is_revealing(&id("east"), now + Duration::from_millis(300)));

        view.prune_reveals(now + Duration::from_millis(1500));
        assert!(!view.is_revealing(&id("east"), now + Duration::from_millis(1600)));
    }
}
