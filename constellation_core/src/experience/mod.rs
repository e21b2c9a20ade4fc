//! Experience - the coordinator behind one visitor's documentary run.
//!
//! Hosts forward raw input (clicks, pointer moves, panel closes, clock
//! ticks) and drain [`ExperienceEvent`]s back out. All policy lives here;
//! the host only renders and plays what the events tell it to.
//!
//! Time is explicit: every time-sensitive call takes `now`, and `tick`
//! fires whatever came due. Nothing in here sleeps or spawns.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use story_atlas::{Chapter, Link, NodeId, StoryAtlas};

use crate::events::ExperienceEvent;
use crate::interaction::{ConstellationView, LinkStyle, NodePhase, ViewConfig, Viewport};
use crate::progression::ProgressionEngine;
use crate::session::{ChapterSession, PendingVisit};
use crate::store::ProgressionStore;

/// Tuning for the whole experience.
#[derive(Debug, Clone, Copy)]
pub struct ExperienceConfig {
    /// How long a chapter must stay open before its visit counts.
    pub engagement_delay: Duration,

    pub view: ViewConfig,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            engagement_delay: Duration::from_millis(1800),
            view: ViewConfig::default(),
        }
    }
}

/// One visitor's interactive documentary.
///
/// Owns the atlas, the progression engine, the interaction layer, the open
/// chapter session, engagement timers that outlived their session, and the
/// outbound event queue.
pub struct Experience {
    atlas: StoryAtlas,
    config: ExperienceConfig,
    engine: ProgressionEngine,
    view: ConstellationView,
    session: Option<ChapterSession>,
    pending_visits: Vec<PendingVisit>,
    started: bool,
    completed_announced: bool,
    store: Option<Box<dyn ProgressionStore>>,
    events: VecDeque<ExperienceEvent>,
}

impl Experience {
    pub fn new(atlas: StoryAtlas, viewport: Viewport) -> Self {
        Self::with_config(atlas, viewport, ExperienceConfig::default())
    }

    pub fn with_config(atlas: StoryAtlas, viewport: Viewport, config: ExperienceConfig) -> Self {
        let engine = ProgressionEngine::from_atlas(&atlas);
        let view = ConstellationView::with_config(viewport, config.view);

        Self {
            atlas,
            config,
            engine,
            view,
            session: None,
            pending_visits: Vec::new(),
            started: false,
            completed_announced: false,
            store: None,
            events: VecDeque::new(),
        }
    }

    /// Attach a store and restore whatever progression it holds.
    ///
    /// Restoring is silent: no unlock events, no reveal timers. Progress the
    /// visitor already made comes back immediately selectable. A store that
    /// cannot be read is kept for writing and the run starts fresh.
    pub fn attach_store(&mut self, store: Box<dyn ProgressionStore>) {
        match store.load_progression() {
            Ok(stored) => self.engine.restore(stored),
            Err(error) => {
                tracing::warn!(%error, "progression store unreadable, starting fresh");
            }
        }
        self.completed_announced = self.engine.is_complete();
        self.store = Some(store);
    }

    /// The visitor entered from the landing screen. Idempotent; ambience
    /// cues are held back until this has happened.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.events.push_back(ExperienceEvent::AmbienceStarted);
        tracing::info!("experience started");
    }

    /// Forward a pointer move. Returns the node a click would open right
    /// now; hosts switch the cursor on that.
    pub fn pointer_moved(&mut self, x: f32, y: f32, now: Instant) -> Option<NodeId> {
        let Self {
            view,
            engine,
            atlas,
            ..
        } = self;
        view.pointer_moved(engine, atlas.constellation(), x, y, now)
    }

    /// Resolve a click on the canvas.
    ///
    /// A hit on a selectable node closes whatever chapter is open and opens
    /// the clicked one. Anything else is inert. Switching chapters keeps the
    /// ambient bed ducked, so no fade plays in between.
    pub fn click(&mut self, x: f32, y: f32, now: Instant) -> Option<NodeId> {
        let selected = self
            .view
            .try_select(&self.engine, self.atlas.constellation(), x, y, now)?;

        let was_open = self.session.is_some();
        self.teardown_session(now, false);

        self.session = Some(ChapterSession::open(
            selected.clone(),
            now,
            self.config.engagement_delay,
        ));
        self.view.set_open(Some(selected.clone()));
        self.events
            .push_back(ExperienceEvent::ChapterOpened(selected.clone()));
        if self.started && !was_open {
            self.events.push_back(ExperienceEvent::AmbienceFadeOut);
        }
        tracing::debug!(node = %selected, "chapter opened");

        Some(selected)
    }

    /// Close the open chapter panel, if any.
    ///
    /// An engagement timer that has not fired survives the close and still
    /// credits the visit once its deadline passes.
    pub fn close_chapter(&mut self, now: Instant) {
        self.teardown_session(now, true);
    }

    /// Attach a cosmetic timer to the open chapter. Without an open chapter
    /// there is nothing to decorate and the call is ignored.
    pub fn schedule_cosmetic(&mut self, tag: impl Into<String>, delay: Duration, now: Instant) {
        match self.session.as_mut() {
            Some(session) => session.schedule_cosmetic(tag, now + delay),
            None => tracing::debug!("cosmetic scheduled with no open chapter, ignored"),
        }
    }

    /// Fire everything that came due: the open session's engagement timer,
    /// engagement timers that outlived their session, and cosmetic tasks.
    pub fn tick(&mut self, now: Instant) {
        let engaged = self
            .session
            .as_mut()
            .and_then(|session| session.take_engagement(now).then(|| session.node().clone()));
        if let Some(node) = engaged {
            self.credit_visit(&node, now);
        }

        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_visits)
            .into_iter()
            .partition(|visit| visit.due <= now);
        self.pending_visits = waiting;
        for visit in due {
            self.credit_visit(&visit.node, now);
        }

        if let Some(session) = self.session.as_mut() {
            let node = session.node().clone();
            for task in session.take_due_cosmetics(now) {
                self.events.push_back(ExperienceEvent::CosmeticDue {
                    node: node.clone(),
                    tag: task.tag,
                });
            }
        }

        self.view.prune_reveals(now);
    }

    /// Hand the queued events to the host, oldest first.
    pub fn drain_events(&mut self) -> Vec<ExperienceEvent> {
        self.events.drain(..).collect()
    }

    pub fn atlas(&self) -> &StoryAtlas {
        &self.atlas
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    pub fn view(&self) -> &ConstellationView {
        &self.view
    }

    /// The open chapter and its content, when one is open and has any.
    pub fn open_chapter(&self) -> Option<(&NodeId, &Chapter)> {
        let session = self.session.as_ref()?;
        let chapter = self.atlas.chapter(session.node().as_str())?;
        Some((session.node(), chapter))
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    /// The phase `id` renders in right now.
    pub fn phase(&self, id: &NodeId, now: Instant) -> NodePhase {
        self.view.phase(&self.engine, id, now)
    }

    /// How to draw a link given current progression.
    pub fn link_style(&self, link: &Link) -> LinkStyle {
        self.view
            .link_style(&self.engine, self.atlas.constellation(), link)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.view.resize(width, height);
    }

    fn teardown_session(&mut self, now: Instant, emit_fade_in: bool) {
        let Some(session) = self.session.take() else {
            return;
        };

        let node = session.node().clone();
        let pending = session.close();

        self.view.set_open(None);
        self.events.push_back(ExperienceEvent::ChapterClosed(node));
        if emit_fade_in && self.started {
            self.events.push_back(ExperienceEvent::AmbienceFadeIn);
        }

        if let Some(pending) = pending {
            if pending.due <= now {
                self.credit_visit(&pending.node, now);
            } else {
                self.pending_visits.push(pending);
            }
        }
    }

    /// An engagement timer ran its course: record the visit, open what it
    /// unlocks, and persist.
    fn credit_visit(&mut self, node: &NodeId, now: Instant) {
        self.engine.mark_visited(node);
        self.events
            .push_back(ExperienceEvent::VisitCredited(node.clone()));

        let opened = self.engine.unlock_next(node);
        if !opened.is_empty() {
            self.view.begin_reveal(&opened, now);
            self.events.push_back(ExperienceEvent::NodesUnlocked(opened));
        }

        if self.engine.is_complete() && !self.completed_announced {
            self.completed_announced = true;
            self.events.push_back(ExperienceEvent::Completed);
            tracing::info!("documentary completed");
        }

        self.persist();
    }

    fn persist(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(error) = store.save_progression(&self.engine.snapshot()) {
            tracing::warn!(%error, "failed to persist progression");
        }
    }
}
