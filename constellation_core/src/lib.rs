//! # Constellation Core
//!
//! The engine behind the web documentary. This crate owns progression state,
//! pointer interaction over the constellation, chapter session timing, and
//! persistence. Rendering, audio playback, and navigation belong to the host
//! shell; the core only emits the events they react to.
//!
//! ## Core Components
//!
//! - **progression**: visited/unlocked sets and the rule-driven unlock step
//! - **interaction**: canvas projection, hit-testing, and selection gating
//! - **session**: per-chapter timers (engagement credit, cosmetic tasks)
//! - **experience**: the coordinator wiring everything together
//! - **store**: progression persistence behind a key-value seam
//! - **events**: the outward cue channel drained by the host
//!
//! ## Design Philosophy
//!
//! - **Data-Driven**: paths and convergences live in the atlas rule table,
//!   never in code
//! - **Deterministic Time**: every timed operation takes an [`Instant`];
//!   nothing reads the clock behind the caller's back
//! - **No Error Channel to the Visitor**: unknown ids, gated clicks, and
//!   corrupt storage degrade silently and are at most logged
//!
//! [`Instant`]: std::time::Instant

pub mod events;
pub mod experience;
pub mod interaction;
pub mod progression;
pub mod session;
pub mod store;

pub use events::*;
pub use experience::*;
pub use interaction::*;
pub use progression::*;
pub use session::*;
pub use store::*;
