//! Career GPS Types
//!
//! Core data structures shared by the progression engine, the session
//! store and the insight providers. Field names serialize in camelCase so
//! persisted records keep the layout the web client wrote.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================
// USER
// ============================================================

/// Engineering branch a student is enrolled in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Branch {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    #[serde(rename = "Electronics & Communication")]
    Electronics,
    #[serde(rename = "Mechanical")]
    Mechanical,
    #[serde(rename = "Civil")]
    Civil,
    #[serde(rename = "Electrical")]
    Electrical,
}

impl Branch {
    pub const ALL: [Branch; 5] = [
        Branch::ComputerScience,
        Branch::Electronics,
        Branch::Mechanical,
        Branch::Civil,
        Branch::Electrical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::ComputerScience => "Computer Science",
            Branch::Electronics => "Electronics & Communication",
            Branch::Mechanical => "Mechanical",
            Branch::Civil => "Civil",
            Branch::Electrical => "Electrical",
        }
    }

    /// Accepts the display name or the short code ("cse", "ece", ...)
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "cse" | "cs" => return Some(Branch::ComputerScience),
            "ece" => return Some(Branch::Electronics),
            "me" => return Some(Branch::Mechanical),
            "ce" => return Some(Branch::Civil),
            "ee" => return Some(Branch::Electrical),
            _ => {}
        }
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.as_str().to_lowercase() == lowered)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Admin,
}

/// Identity and accumulated progress of the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Skill names; only ever grows
    #[serde(default)]
    pub completed_skills: Vec<String>,
    /// Milestone labels in the order they were earned
    #[serde(default)]
    pub completed_projects: Vec<String>,
    #[serde(default)]
    pub contributions: u32,
    #[serde(default)]
    pub streak: u32,
    /// Minutes
    #[serde(default)]
    pub total_time: u32,
    /// Calendar day of the last visit, used only to detect day rollover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_date: Option<String>,
}

impl User {
    pub fn student(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            role: UserRole::Student,
            branch: None,
            year: None,
            completed_skills: Vec::new(),
            completed_projects: Vec::new(),
            contributions: 0,
            streak: 0,
            total_time: 0,
            last_active_date: None,
        }
    }

    /// Adds skills not already present, preserving order
    pub fn absorb_skills(&mut self, skills: &[String]) {
        for skill in skills {
            if !self.completed_skills.contains(skill) {
                self.completed_skills.push(skill.clone());
            }
        }
    }
}

// ============================================================
// ACTIONS
// ============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Skill,
    Project,
    Opportunity,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Skill => "skill",
            ActionType::Project => "project",
            ActionType::Opportunity => "opportunity",
        }
    }
}

/// A recommended next task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionItem {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ActionItem {
    pub fn new(action_type: ActionType, title: &str, description: &str) -> Self {
        Self {
            action_type,
            title: title.to_string(),
            description: description.to_string(),
            details: None,
            resources: Vec::new(),
            outcome: None,
            link: None,
        }
    }

    pub fn with_details(mut self, details: &str) -> Self {
        self.details = Some(details.to_string());
        self
    }

    pub fn with_outcome(mut self, outcome: &str) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn is_skill(&self) -> bool {
        self.action_type == ActionType::Skill
    }
}

// ============================================================
// ROADMAP & ANALYSIS
// ============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LevelStatus {
    Completed,
    InProgress,
    Missing,
}

impl LevelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelStatus::Completed => "completed",
            LevelStatus::InProgress => "in-progress",
            LevelStatus::Missing => "missing",
        }
    }
}

/// One curriculum milestone on the route to the target role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapLevel {
    pub title: String,
    pub status: LevelStatus,
    pub skills: Vec<String>,
}

impl RoadmapLevel {
    pub fn new(title: &str, status: LevelStatus, skills: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            status,
            skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Skill-gap snapshot for one target role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Readiness score, 0-100
    #[serde(deserialize_with = "score_from_number")]
    pub score: u32,
    pub explanation: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub roadmap: Vec<RoadmapLevel>,
    pub next_actions: Vec<ActionItem>,
}

impl AnalysisResult {
    pub fn find_action(&self, title: &str) -> Option<&ActionItem> {
        self.next_actions.iter().find(|a| a.title == title)
    }

    /// Points for the skill radar: matched skills at 100, missing at 30
    pub fn radar_points(&self) -> Vec<(String, u32)> {
        self.matched_skills
            .iter()
            .map(|s| (s.clone(), 100))
            .chain(self.missing_skills.iter().map(|s| (s.clone(), 30)))
            .collect()
    }
}

/// Generative sources emit fractional or out-of-range scores.
fn score_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Ok(0);
    }
    Ok(raw.round().clamp(0.0, 100.0) as u32)
}

// ============================================================
// ROLES & PROFILE
// ============================================================

/// Static description of a target job profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CareerRole {
    pub id: String,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
}

/// What the student submitted when requesting an analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    pub branch: Branch,
    pub year: u32,
    /// Role id, e.g. "web-dev"
    pub target_role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_text: Option<String>,
}

// ============================================================
// VIEWS
// ============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AppView {
    #[default]
    Dashboard,
    Route,
    Profile,
    MissionSkill,
    MissionProject,
    MissionOs,
}

impl AppView {
    pub fn for_action(action_type: ActionType) -> Self {
        match action_type {
            ActionType::Skill => AppView::MissionSkill,
            ActionType::Project => AppView::MissionProject,
            ActionType::Opportunity => AppView::MissionOs,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppView::Dashboard => "dashboard",
            AppView::Route => "route",
            AppView::Profile => "profile",
            AppView::MissionSkill => "mission-skill",
            AppView::MissionProject => "mission-project",
            AppView::MissionOs => "mission-os",
        }
    }
}
