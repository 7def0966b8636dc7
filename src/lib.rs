//! Career GPS
//!
//! Career-readiness navigator for engineering students:
//! - Skill-gap analysis against a target role
//! - Missions (skills, projects, open-source) with proof-of-work
//! - Progression engine for score, roadmap and next actions
//! - Persistent session, strategy report and share card

pub mod app;
pub mod config;
pub mod engine;
pub mod export;

pub use app::*;
pub use config::*;
pub use engine::*;
pub use export::*;
