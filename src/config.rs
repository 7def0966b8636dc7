//! Runtime configuration read from the environment.

use crate::engine::{VerificationDelays, DEFAULT_MODEL, DEFAULT_STREAK_THRESHOLD_SECS};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Session database path
    pub db_path: PathBuf,
    /// Directory reports and share cards are written to
    pub export_dir: PathBuf,
    /// Enables the generative insight provider when set
    pub api_key: Option<String>,
    pub model: String,
    pub streak_threshold_secs: u64,
    /// Skip simulated verification delays
    pub fast: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("career_gps.db"),
            export_dir: PathBuf::from("."),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            streak_threshold_secs: DEFAULT_STREAK_THRESHOLD_SECS,
            fast: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparsable values keep their
    /// defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            db_path: non_empty("CAREER_GPS_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            export_dir: non_empty("CAREER_GPS_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            model: non_empty("CAREER_GPS_MODEL").unwrap_or(defaults.model),
            streak_threshold_secs: non_empty("CAREER_GPS_STREAK_SECS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.streak_threshold_secs),
            fast: non_empty("CAREER_GPS_FAST")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.fast),
        }
    }

    pub fn delays(&self) -> VerificationDelays {
        if self.fast {
            VerificationDelays::none()
        } else {
            VerificationDelays::default()
        }
    }
}
