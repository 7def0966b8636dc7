//! Score & Stat Accumulation
//!
//! Fixed score deltas per mission type, skill-list bookkeeping for skill
//! missions and the milestone badge derived from roadmap progress.

use super::types::{ActionItem, ActionType, AnalysisResult, LevelStatus, RoadmapLevel, User};
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u32 = 100;

/// Score delta awarded per mission type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreTable {
    pub skill: u32,
    pub project: u32,
    pub open_source: u32,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            skill: 10,
            project: 15,
            open_source: 10,
        }
    }
}

impl ScoreTable {
    pub fn delta_for(&self, action_type: ActionType) -> u32 {
        match action_type {
            ActionType::Skill => self.skill,
            ActionType::Project => self.project,
            ActionType::Opportunity => self.open_source,
        }
    }
}

/// Adds `delta` and clamps to [`MAX_SCORE`]
pub fn bump_score(score: u32, delta: u32) -> u32 {
    score.saturating_add(delta).min(MAX_SCORE)
}

/// Applies the score delta and, for skill missions, moves `skill` from the
/// missing list to the matched list.
///
/// Returns a new snapshot; the input is left untouched.
pub fn apply_completion(
    analysis: &AnalysisResult,
    action: &ActionItem,
    skill: &str,
    table: &ScoreTable,
) -> AnalysisResult {
    let mut updated = analysis.clone();

    if action.action_type == ActionType::Skill {
        if !updated.matched_skills.iter().any(|s| s == skill) {
            updated.matched_skills.push(skill.to_string());
        }
        updated.missing_skills.retain(|s| s != skill);
    }

    updated.score = bump_score(updated.score, table.delta_for(action.action_type));
    updated
}

/// Number of roadmap levels currently marked completed
pub fn completed_levels(roadmap: &[RoadmapLevel]) -> usize {
    roadmap
        .iter()
        .filter(|l| l.status == LevelStatus::Completed)
        .count()
}

/// Appends a "Milestone N" badge when the roadmap has more completed levels
/// than the user has badges. Returns the awarded label.
pub fn award_milestone(user: &mut User, roadmap: &[RoadmapLevel]) -> Option<String> {
    let completed = completed_levels(roadmap);
    if completed > user.completed_projects.len() {
        let label = format!("Milestone {}", completed);
        user.completed_projects.push(label.clone());
        return Some(label);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(score: u32, matched: &[&str], missing: &[&str]) -> AnalysisResult {
        AnalysisResult {
            score,
            explanation: String::new(),
            matched_skills: matched.iter().map(|s| s.to_string()).collect(),
            missing_skills: missing.iter().map(|s| s.to_string()).collect(),
            roadmap: Vec::new(),
            next_actions: Vec::new(),
        }
    }

    #[test]
    fn test_skill_completion_moves_skill() {
        let before = analysis(40, &[], &["TypeScript", "Node.js"]);
        let action = ActionItem::new(ActionType::Skill, "Master TypeScript with React", "");
        let after = apply_completion(&before, &action, "TypeScript", &ScoreTable::default());

        assert_eq!(after.matched_skills, vec!["TypeScript"]);
        assert_eq!(after.missing_skills, vec!["Node.js"]);
        assert_eq!(after.score, 50);
        assert_eq!(before.score, 40);
    }

    #[test]
    fn test_skill_completion_does_not_duplicate() {
        let before = analysis(10, &["TypeScript"], &[]);
        let action = ActionItem::new(ActionType::Skill, "TypeScript", "");
        let after = apply_completion(&before, &action, "TypeScript", &ScoreTable::default());
        assert_eq!(after.matched_skills, vec!["TypeScript"]);
    }

    #[test]
    fn test_project_and_open_source_only_touch_score() {
        let before = analysis(50, &["Git"], &["Docker"]);
        let table = ScoreTable::default();

        let project = ActionItem::new(ActionType::Project, "Full-Stack Inventory Manager", "");
        let after = apply_completion(&before, &project, "Full-Stack Inventory Manager", &table);
        assert_eq!(after.score, 65);
        assert_eq!(after.matched_skills, before.matched_skills);
        assert_eq!(after.missing_skills, before.missing_skills);

        let os = ActionItem::new(ActionType::Opportunity, "Contribute to Supabase", "");
        let after = apply_completion(&before, &os, "Contribute to Supabase", &table);
        assert_eq!(after.score, 60);
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(bump_score(95, 15), 100);
        assert_eq!(bump_score(100, 10), 100);
        assert_eq!(bump_score(u32::MAX, 10), 100);
    }

    #[test]
    fn test_award_milestone_only_when_ahead() {
        let mut user = User::student("Asha", "asha@example.com");
        let roadmap = vec![
            RoadmapLevel::new("Fundamentals", LevelStatus::Completed, &["Git"]),
            RoadmapLevel::new("Core", LevelStatus::InProgress, &["React", "Node.js"]),
        ];

        assert_eq!(award_milestone(&mut user, &roadmap), Some("Milestone 1".to_string()));
        assert_eq!(award_milestone(&mut user, &roadmap), None);
        assert_eq!(user.completed_projects, vec!["Milestone 1"]);
    }
}
