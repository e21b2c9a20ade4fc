//! # Story Atlas
//!
//! The "single source of truth" crate - contains the constellation graph, the
//! chapter payloads, and the unlock rules of the web documentary. This crate
//! is pure data and holds no progression or rendering logic.

pub mod atlas;
pub mod chapters;
pub mod constellation;
pub mod rules;

pub use atlas::*;
pub use chapters::*;
pub use constellation::*;
pub use rules::*;
