//! Missions
//!
//! Per-mission state machine:
//!
//! ```text
//! idle -> in-progress -> [awaiting-proof] -> verifying -> completed
//! ```
//!
//! Skill missions walk their learning modules in order and go straight to
//! verifying. Project and open-source missions require a proof-of-work link
//! first. Verification is a fixed delay and always succeeds.

use super::catalog::{self, SkillModule};
use super::insight::InsightProvider;
use super::types::{ActionItem, ActionType};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

pub const MENTOR_OFFLINE_MESSAGE: &str =
    "AI Mentor is temporarily offline. Please continue using the learning resources provided above.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MissionPhase {
    Idle,
    InProgress,
    AwaitingProof,
    Verifying,
    Completed,
}

impl MissionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionPhase::Idle => "idle",
            MissionPhase::InProgress => "in-progress",
            MissionPhase::AwaitingProof => "awaiting-proof",
            MissionPhase::Verifying => "verifying",
            MissionPhase::Completed => "completed",
        }
    }
}

/// Proof-of-work link rejected before verification
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("Please provide a valid GitHub repository URL.")]
    NotARepository,

    #[error("Please paste a valid GitHub contribution/PR link.")]
    NotAContribution,

    #[error("Skill missions do not take a proof link")]
    NotRequired,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MissionError {
    #[error("Cannot {action} while mission is {from}")]
    InvalidTransition { from: &'static str, action: &'static str },

    #[error("Module {index} does not exist")]
    NoSuchModule { index: usize },

    #[error("Module {index} is locked; complete the previous module first")]
    ModuleLocked { index: usize },

    #[error("Complete all modules first ({done}/{total} done)")]
    ModulesIncomplete { done: usize, total: usize },

    #[error(transparent)]
    Proof(#[from] ProofError),
}

/// Checks a proof-of-work link for the mission type
pub fn validate_proof(action_type: ActionType, link: &str) -> Result<String, ProofError> {
    let link = link.trim();
    match action_type {
        ActionType::Skill => Err(ProofError::NotRequired),
        ActionType::Project if !link.contains("github.com") => Err(ProofError::NotARepository),
        ActionType::Opportunity if !link.contains("github.com") => {
            Err(ProofError::NotAContribution)
        }
        _ => Ok(link.to_string()),
    }
}

// ============================================================
// VERIFICATION DELAYS
// ============================================================

/// Simulated verification pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationDelays {
    pub skill: Duration,
    pub project_review: Duration,
    /// Success screen shown before a project is marked complete
    pub project_celebration: Duration,
    pub open_source: Duration,
}

impl Default for VerificationDelays {
    fn default() -> Self {
        Self {
            skill: Duration::from_millis(2000),
            project_review: Duration::from_millis(2000),
            project_celebration: Duration::from_millis(2500),
            open_source: Duration::from_millis(2000),
        }
    }
}

impl VerificationDelays {
    pub fn none() -> Self {
        Self {
            skill: Duration::ZERO,
            project_review: Duration::ZERO,
            project_celebration: Duration::ZERO,
            open_source: Duration::ZERO,
        }
    }

    pub fn total_for(&self, action_type: ActionType) -> Duration {
        match action_type {
            ActionType::Skill => self.skill,
            ActionType::Project => self.project_review + self.project_celebration,
            ActionType::Opportunity => self.open_source,
        }
    }
}

// ============================================================
// MENTOR CHAT
// ============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Mentor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub text: String,
}

/// Mentor conversation attached to a skill mission
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MentorChat {
    pub messages: Vec<ChatMessage>,
    /// Set after the first failed answer; later questions are not sent
    pub offline: bool,
}

impl MentorChat {
    pub fn greet(&mut self, mission_title: &str) {
        if self.messages.is_empty() {
            self.push(
                Speaker::Mentor,
                format!(
                    "Hi! I'm your Career GPS Mentor. I'm here to help you navigate {}. Ask me any technical doubts!",
                    mission_title
                ),
            );
        }
    }

    /// Sends a question; returns the mentor's reply if one was produced
    pub async fn ask(
        &mut self,
        provider: &dyn InsightProvider,
        question: &str,
        context: &str,
    ) -> Option<String> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }
        self.push(Speaker::User, question.to_string());

        if self.offline {
            return None;
        }

        let reply = match provider.ask_mentor(question, context).await {
            Ok(answer) => answer,
            Err(e) => {
                info!("Mentor unavailable: {}", e);
                self.offline = true;
                MENTOR_OFFLINE_MESSAGE.to_string()
            }
        };
        self.push(Speaker::Mentor, reply.clone());
        Some(reply)
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.messages.push(ChatMessage { speaker, text });
    }
}

// ============================================================
// MISSION
// ============================================================

/// One mission being worked on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mission {
    pub action: ActionItem,
    pub phase: MissionPhase,
    /// Learning modules (skill missions only)
    pub modules: Vec<SkillModule>,
    pub completed_modules: BTreeSet<usize>,
    pub active_module: Option<usize>,
    pub proof: Option<String>,
    pub chat: MentorChat,
}

impl Mission {
    pub fn new(action: ActionItem) -> Self {
        let modules = if action.is_skill() {
            catalog::modules_for(&action.title)
        } else {
            Vec::new()
        };
        Self {
            action,
            phase: MissionPhase::Idle,
            modules,
            completed_modules: BTreeSet::new(),
            active_module: None,
            proof: None,
            chat: MentorChat::default(),
        }
    }

    pub fn action_type(&self) -> ActionType {
        self.action.action_type
    }

    pub fn start(&mut self) -> Result<(), MissionError> {
        self.expect_phase(&[MissionPhase::Idle], "start")?;
        self.phase = MissionPhase::InProgress;
        debug!("Mission '{}' started", self.action.title);
        Ok(())
    }

    pub fn is_module_locked(&self, index: usize) -> bool {
        index > 0 && !self.completed_modules.contains(&(index - 1))
    }

    /// Opens a learning module; the mentor greets on the first one
    pub fn open_module(&mut self, index: usize) -> Result<&SkillModule, MissionError> {
        self.check_module(index, "open a module")?;
        self.active_module = Some(index);
        self.chat.greet(&self.action.title);
        Ok(&self.modules[index])
    }

    pub fn complete_module(&mut self, index: usize) -> Result<(), MissionError> {
        self.check_module(index, "complete a module")?;
        self.completed_modules.insert(index);
        if self.active_module == Some(index) {
            self.active_module = None;
        }
        Ok(())
    }

    pub fn all_modules_done(&self) -> bool {
        self.completed_modules.len() == self.modules.len()
    }

    /// Skill missions: hand in once every module is done
    pub fn finish_learning(&mut self) -> Result<(), MissionError> {
        if !self.action.is_skill() {
            return Err(MissionError::InvalidTransition {
                from: self.phase.as_str(),
                action: "finish learning on a non-skill mission",
            });
        }
        self.expect_phase(&[MissionPhase::InProgress], "finish learning")?;
        if !self.all_modules_done() {
            return Err(MissionError::ModulesIncomplete {
                done: self.completed_modules.len(),
                total: self.modules.len(),
            });
        }
        self.phase = MissionPhase::Verifying;
        Ok(())
    }

    /// Project and open-source missions: submit the proof-of-work link.
    ///
    /// A rejected link keeps the mission in awaiting-proof.
    pub fn submit_proof(&mut self, link: &str) -> Result<(), MissionError> {
        if self.action.is_skill() {
            return Err(ProofError::NotRequired.into());
        }
        self.expect_phase(
            &[MissionPhase::InProgress, MissionPhase::AwaitingProof],
            "submit proof",
        )?;
        self.phase = MissionPhase::AwaitingProof;

        let link = validate_proof(self.action.action_type, link)?;
        self.proof = Some(link);
        self.phase = MissionPhase::Verifying;
        Ok(())
    }

    /// Waits out the simulated verification and marks the mission complete
    pub async fn verify(&mut self, delays: &VerificationDelays) -> Result<(), MissionError> {
        self.expect_phase(&[MissionPhase::Verifying], "verify")?;
        let delay = delays.total_for(self.action.action_type);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.phase = MissionPhase::Completed;
        info!("Mission '{}' verified", self.action.title);
        Ok(())
    }

    fn check_module(&self, index: usize, action: &'static str) -> Result<(), MissionError> {
        self.expect_phase(&[MissionPhase::InProgress], action)?;
        if index >= self.modules.len() {
            return Err(MissionError::NoSuchModule { index });
        }
        if self.is_module_locked(index) {
            return Err(MissionError::ModuleLocked { index });
        }
        Ok(())
    }

    fn expect_phase(&self, allowed: &[MissionPhase], action: &'static str) -> Result<(), MissionError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(MissionError::InvalidTransition {
                from: self.phase.as_str(),
                action,
            })
        }
    }
}
