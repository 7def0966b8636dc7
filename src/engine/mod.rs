//! Engine Module - Core of Career GPS
//!
//! Implements the gap analysis → mission → progression loop.
//!
//! Architecture:
//! - Catalog: roles, curricula, learning modules and project templates
//! - Insight: skill-gap analysis and mentor answers (remote or static)
//! - Missions: per-mission state machine and proof-of-work checks
//! - Progression: score, roadmap and next-action updates after a mission
//! - Session: persisted user/analysis/profile records
//! - Timer: focus timer that awards the daily streak

pub mod catalog;
pub mod insight;
pub mod missions;
pub mod progression;
pub mod scoring;
pub mod session;
pub mod timer;
pub mod types;

pub use catalog::*;
pub use insight::*;
pub use missions::*;
pub use progression::*;
pub use scoring::*;
pub use session::*;
pub use timer::*;
pub use types::*;
