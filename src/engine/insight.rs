//! Insight Providers
//!
//! The analysis, learning-notes and mentor capability behind one trait.
//! Two variants exist:
//! - [`StaticInsightProvider`]: fixed fallback analysis and knowledge-base
//!   notes, no mentor. Default and test double.
//! - [`GenerativeInsightProvider`]: a hosted generative model over HTTPS.
//!
//! Callers go through [`analyze_or_fallback`], which never surfaces a
//! provider failure: it logs and returns the fallback analysis instead.
//! There are no retries.

use super::catalog::{self, ModuleLevel};
use super::types::{
    ActionItem, ActionType, AnalysisResult, CareerRole, LevelStatus, RoadmapLevel,
};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid model output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model returned empty content")]
    EmptyContent,

    #[error("Insight provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for InsightError {
    /// Drops the request URL so the error text never carries endpoint details
    fn from(e: reqwest::Error) -> Self {
        InsightError::Http(e.without_url())
    }
}

// ============================================================
// PROVIDER INTERFACE
// ============================================================

#[async_trait]
pub trait InsightProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Skill-gap analysis of a resume against a target role
    async fn analyze_career_path(
        &self,
        resume_text: &str,
        role: &CareerRole,
        student_skills: &[String],
    ) -> Result<AnalysisResult, InsightError>;

    /// Markdown learning notes for one module of a skill
    async fn module_content(
        &self,
        skill_title: &str,
        level: ModuleLevel,
    ) -> Result<String, InsightError>;

    /// Answer to a learner's question within a mission context
    async fn ask_mentor(&self, question: &str, context: &str) -> Result<String, InsightError>;
}

/// Runs the analysis, substituting [`fallback_analysis`] on any failure
pub async fn analyze_or_fallback(
    provider: &dyn InsightProvider,
    resume_text: &str,
    role: &CareerRole,
    student_skills: &[String],
) -> AnalysisResult {
    match provider
        .analyze_career_path(resume_text, role, student_skills)
        .await
    {
        Ok(analysis) => {
            info!(
                "Analysis from {} for '{}': score {}",
                provider.name(),
                role.title,
                analysis.score
            );
            analysis
        }
        Err(e) => {
            warn!("{} analysis failed, using fallback: {}", provider.name(), e);
            fallback_analysis()
        }
    }
}

/// Result used whenever a real analysis is unavailable
pub fn fallback_analysis() -> AnalysisResult {
    AnalysisResult {
        score: 65,
        explanation: "Your profile shows strong foundational knowledge in programming but lacks specific implementation experience in modern frameworks required for this role.".to_string(),
        matched_skills: vec!["Python".into(), "Java".into(), "Basic React".into()],
        missing_skills: vec![
            "TypeScript".into(),
            "Node.js".into(),
            "PostgreSQL".into(),
            "Tailwind CSS".into(),
        ],
        roadmap: vec![
            RoadmapLevel::new("Fundamentals", LevelStatus::Completed, &["JavaScript", "HTML/CSS", "Git"]),
            RoadmapLevel::new("Core Skills", LevelStatus::InProgress, &["React", "TypeScript", "Node.js"]),
            RoadmapLevel::new("Projects", LevelStatus::Missing, &["Full-Stack App", "Database Design"]),
            RoadmapLevel::new("Industry Ready", LevelStatus::Missing, &["Testing", "CI/CD", "Performance"]),
        ],
        next_actions: vec![
            ActionItem::new(
                ActionType::Skill,
                "Master TypeScript with React",
                "Learn type-safe development for enterprise apps.",
            )
            .with_details("Focus on Generics and Hooks.")
            .with_outcome("Ability to build scalable frontend apps."),
            ActionItem::new(
                ActionType::Project,
                "Full-Stack Inventory Manager",
                "Build a real-world CRUD application.",
            )
            .with_details("Use React + Node + PostgreSQL.")
            .with_outcome("Portfolio piece showing database integration."),
            ActionItem::new(
                ActionType::Opportunity,
                "Contribute to Supabase",
                "Open source contribution mission.",
            )
            .with_details("Find beginner issues in the Supabase repo.")
            .with_outcome("Verified industry-level contribution."),
        ],
    }
}

/// Resume text used until real document parsing exists
pub fn parse_resume_stub() -> String {
    "Simulated content: Java, Python, React. Engineering student.".to_string()
}

// ============================================================
// STATIC PROVIDER
// ============================================================

/// Offline provider backed by the fallback literal and the knowledge base
#[derive(Debug, Clone, Default)]
pub struct StaticInsightProvider;

#[async_trait]
impl InsightProvider for StaticInsightProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn analyze_career_path(
        &self,
        _resume_text: &str,
        role: &CareerRole,
        _student_skills: &[String],
    ) -> Result<AnalysisResult, InsightError> {
        debug!("Static analysis for '{}'", role.title);
        Ok(fallback_analysis())
    }

    async fn module_content(
        &self,
        skill_title: &str,
        level: ModuleLevel,
    ) -> Result<String, InsightError> {
        catalog::modules_for(skill_title)
            .into_iter()
            .find(|m| m.level == level)
            .map(|m| format!("## {}\n\n{}", m.title, m.notes))
            .ok_or_else(|| {
                InsightError::Unavailable(format!("no {} notes for {}", level.as_str(), skill_title))
            })
    }

    async fn ask_mentor(&self, _question: &str, _context: &str) -> Result<String, InsightError> {
        Err(InsightError::Unavailable(
            "no generative model configured".to_string(),
        ))
    }
}

// ============================================================
// GENERATIVE PROVIDER
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Provider that calls a hosted generative model
#[derive(Clone)]
pub struct GenerativeInsightProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GenerativeInsightProvider {
    pub fn new(api_key: String, model: Option<String>) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Points the provider at another models endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate(
        &self,
        prompt: &str,
        generation_config: Option<serde_json::Value>,
    ) -> Result<String, InsightError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(InsightError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.text().ok_or(InsightError::EmptyContent)
    }
}

/// Prompt asking for a readiness score, a 4-level roadmap and three actions
pub fn analysis_prompt(resume_text: &str, role: &CareerRole, student_skills: &[String]) -> String {
    format!(
        r#"Analyze this student profile for the role: "{}".
Student Declared Skills: {}
Resume: {}
Target Core Skills: {}

Calculate Readiness Score (0-100).
Generate a 4-level Roadmap and exactly 3 Next Actions (1 Skill, 1 Project, 1 Opportunity).
Respond STRICTLY in JSON."#,
        role.title,
        student_skills.join(", "),
        resume_text,
        role.required_skills.join(", ")
    )
}

fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER" },
            "explanation": { "type": "STRING" },
            "matchedSkills": { "type": "ARRAY", "items": { "type": "STRING" } },
            "missingSkills": { "type": "ARRAY", "items": { "type": "STRING" } },
            "roadmap": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "status": { "type": "STRING", "enum": ["completed", "in-progress", "missing"] },
                        "skills": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["title", "status", "skills"]
                }
            },
            "nextActions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "type": { "type": "STRING", "enum": ["skill", "project", "opportunity"] },
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "details": { "type": "STRING" },
                        "outcome": { "type": "STRING" }
                    },
                    "required": ["type", "title", "description", "details", "outcome"]
                }
            }
        },
        "required": ["score", "explanation", "matchedSkills", "missingSkills", "roadmap", "nextActions"]
    })
}

#[async_trait]
impl InsightProvider for GenerativeInsightProvider {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn analyze_career_path(
        &self,
        resume_text: &str,
        role: &CareerRole,
        student_skills: &[String],
    ) -> Result<AnalysisResult, InsightError> {
        let prompt = analysis_prompt(resume_text, role, student_skills);
        let config = json!({
            "responseMimeType": "application/json",
            "responseSchema": analysis_schema(),
        });
        let text = self.generate(&prompt, Some(config)).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn module_content(
        &self,
        skill_title: &str,
        level: ModuleLevel,
    ) -> Result<String, InsightError> {
        let prompt = format!(
            "Generate learning notes for \"{}\" at a {} level. Format as Markdown.",
            skill_title,
            level.as_str()
        );
        self.generate(&prompt, None).await
    }

    async fn ask_mentor(&self, question: &str, context: &str) -> Result<String, InsightError> {
        let prompt = format!("AI Mentor Answer for: {}. Question: {}", context, question);
        self.generate(&prompt, None).await
    }
}
