//! Progression Engine
//!
//! Turns a completed mission into the next analysis snapshot:
//! 1. score and skill bookkeeping (see [`super::scoring`])
//! 2. next-action advancement through the role curriculum
//! 3. roadmap status recomputation
//! 4. user stat updates (completed skills, milestone badges)
//!
//! Everything here is pure. Persisting the result is the caller's job.

use super::catalog::{self, CurriculumEntry};
use super::scoring::{self, ScoreTable};
use super::types::{ActionItem, ActionType, AnalysisResult, LevelStatus, RoadmapLevel, User};
use log::debug;
use serde::Serialize;

// ============================================================
// ROADMAP STATUS RECOMPUTATION
// ============================================================

/// Status of one level given the matched skills.
///
/// Levels only move toward completed: a level with no matched skills keeps
/// its stored status, and a completed level is never demoted. Levels with
/// an empty skill list are not applicable and keep their status.
pub fn level_status(level: &RoadmapLevel, matched: &[String]) -> LevelStatus {
    if level.skills.is_empty() {
        return level.status;
    }

    let is_matched = |skill: &String| matched.iter().any(|m| m == skill);

    if level.skills.iter().all(is_matched) {
        LevelStatus::Completed
    } else if level.skills.iter().any(is_matched) && level.status != LevelStatus::Completed {
        LevelStatus::InProgress
    } else {
        level.status
    }
}

/// New roadmap with every level's status recomputed from `matched_skills`
pub fn recompute_roadmap(analysis: &AnalysisResult) -> Vec<RoadmapLevel> {
    analysis
        .roadmap
        .iter()
        .map(|level| RoadmapLevel {
            status: level_status(level, &analysis.matched_skills),
            ..level.clone()
        })
        .collect()
}

// ============================================================
// NEXT-ACTION ADVANCEMENT
// ============================================================

/// What happened to the skill slot of `nextActions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advancement {
    /// Skill slot now holds the named curriculum entry
    Advanced { next: String },
    /// Last curriculum entry completed; skill slot removed
    Exhausted,
    /// Completed title is not part of the curriculum; nothing changed
    NotInCurriculum,
    /// Completed action was not a skill mission
    NotApplicable,
}

/// Replaces the skill-type entries of `next_actions` with the curriculum
/// entry that follows `completed`, or drops them when `completed` was last.
///
/// Project and opportunity entries keep their position and content.
pub fn advance_next_actions(
    completed: &ActionItem,
    curriculum: &[CurriculumEntry],
    next_actions: &[ActionItem],
) -> (Vec<ActionItem>, Advancement) {
    if !completed.is_skill() {
        return (next_actions.to_vec(), Advancement::NotApplicable);
    }

    let Some(index) = curriculum
        .iter()
        .position(|e| e.action.title == completed.title)
    else {
        debug!("'{}' not in curriculum, skill slot left as is", completed.title);
        return (next_actions.to_vec(), Advancement::NotInCurriculum);
    };

    match curriculum.get(index + 1) {
        Some(next) => {
            let actions = next_actions
                .iter()
                .map(|a| if a.is_skill() { next.action.clone() } else { a.clone() })
                .collect();
            (
                actions,
                Advancement::Advanced {
                    next: next.action.title.clone(),
                },
            )
        }
        None => {
            let actions = next_actions
                .iter()
                .filter(|a| !a.is_skill())
                .cloned()
                .collect();
            (actions, Advancement::Exhausted)
        }
    }
}

// ============================================================
// ENGINE
// ============================================================

/// Result of feeding one completed mission through the engine
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
    pub analysis: AnalysisResult,
    pub user: User,
    pub score_delta: u32,
    /// Skill credited by a skill mission
    pub skill: Option<String>,
    pub advancement: Advancement,
    pub milestone: Option<String>,
}

/// The progression engine
#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine {
    scores: ScoreTable,
}

impl ProgressionEngine {
    pub fn new(scores: ScoreTable) -> Self {
        Self { scores }
    }

    /// Applies a completed mission to the current snapshot and user.
    ///
    /// `target_role` is the active role id; without one the skill slot is
    /// not advanced.
    pub fn complete_mission(
        &self,
        analysis: &AnalysisResult,
        user: &User,
        action: &ActionItem,
        target_role: Option<&str>,
    ) -> ProgressUpdate {
        let skill = action.is_skill().then(|| catalog::skill_for_title(&action.title));
        let credited = skill.as_deref().unwrap_or(&action.title);

        let mut updated = scoring::apply_completion(analysis, action, credited, &self.scores);
        let score_delta = updated.score.saturating_sub(analysis.score);

        let advancement = match target_role {
            Some(role_id) => {
                let curriculum = catalog::curriculum_or_default(role_id);
                let (actions, advancement) =
                    advance_next_actions(action, &curriculum, &updated.next_actions);
                updated.next_actions = actions;
                advancement
            }
            None => Advancement::NotApplicable,
        };

        updated.roadmap = recompute_roadmap(&updated);

        let mut user = user.clone();
        if action.action_type == ActionType::Opportunity {
            user.contributions += 1;
        }
        user.absorb_skills(&updated.matched_skills);
        let milestone = scoring::award_milestone(&mut user, &updated.roadmap);

        ProgressUpdate {
            analysis: updated,
            user,
            score_delta,
            skill,
            advancement,
            milestone,
        }
    }
}
