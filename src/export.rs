//! Export Module
//!
//! Renders the strategy report, the share text and the stats card with
//! Handlebars, and builds the public share links.

use crate::engine::{AnalysisResult, CareerRole, User};
use handlebars::{handlebars_helper, Handlebars};
use log::info;
use reqwest::Url;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const SHARE_BASE_URL: &str = "https://career-gps.app";
const WHATSAPP_URL: &str = "https://wa.me/";
const LINKEDIN_URL: &str = "https://www.linkedin.com/sharing/share-offsite/";

pub const CARD_WIDTH: u32 = 1200;
pub const CARD_HEIGHT: u32 = 630;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid share link: {0}")]
    Link(String),
}

// ============================================================
// TEMPLATES
// ============================================================

const REPORT_TEMPLATE: &str = "CAREER GPS STRATEGY REPORT

Target Destination: {{{role}}}
Candidate: {{{name}}}
Current Fit Score: {{score}}%

Route Milestones
{{#each milestones}}{{this.number}}. {{{this.title}}} ({{upper this.status}})
   Focus: {{{this.focus}}}
{{/each}}
Career GPS Advice
{{{advice}}}
";

const SHARE_TEMPLATE: &str = "🚀 My Career Progress with Career GPS

🎯 Role: {{{role}}}
📊 Skill Fit: {{score}}%
🔥 Streak: {{streak}} days
🛠 Projects Completed: {{projects}}

Start your journey 🚀";

const CARD_TEMPLATE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="{{width}}" height="{{height}}" viewBox="0 0 {{width}} {{height}}">
  <defs>
    <linearGradient id="bg" x1="0" y1="0" x2="1" y2="1">
      <stop offset="0" stop-color="#0F172A"/>
      <stop offset="1" stop-color="#1E293B"/>
    </linearGradient>
    <radialGradient id="glow" cx="1100" cy="100" r="300" gradientUnits="userSpaceOnUse">
      <stop offset="0.16" stop-color="rgba(79, 70, 229, 0.2)"/>
      <stop offset="1" stop-color="transparent"/>
    </radialGradient>
  </defs>
  <rect width="{{width}}" height="{{height}}" fill="url(#bg)"/>
  <circle cx="1100" cy="100" r="300" fill="url(#glow)"/>
  <g font-family="sans-serif">
    <text x="80" y="100" fill="#FFFFFF" font-size="40" font-weight="bold">CAREER GPS PROGRESS</text>
    <text x="80" y="200" fill="#FFFFFF" font-size="80" font-weight="bold">{{name}}</text>
    <text x="80" y="250" fill="#94A3B8" font-size="30">TARGET: {{upper role}}</text>
    <text x="80" y="420" fill="#6366F1" font-size="120" font-weight="bold">{{score}}%</text>
    <text x="250" y="420" fill="#6366F1" font-size="30" font-weight="bold">SKILL FIT MATCH</text>
    <text x="80" y="520" fill="#FFFFFF" font-size="40" font-weight="bold">SKILLS: {{skills}}</text>
    <text x="350" y="520" fill="#FFFFFF" font-size="40" font-weight="bold">PROJECTS: {{projects}}</text>
    <text x="700" y="520" fill="#FFFFFF" font-size="40" font-weight="bold">STREAK: {{streak}} DAYS 🔥</text>
    <text x="80" y="580" fill="#475569" font-size="24">VERIFIED AT CAREER-GPS.APP</text>
  </g>
</svg>
"##;

handlebars_helper!(upper: |s: str| s.to_uppercase());

// ============================================================
// SNAPSHOT
// ============================================================

/// Everything an export is rendered from
#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot<'a> {
    pub user: &'a User,
    pub analysis: &'a AnalysisResult,
    pub role: &'a CareerRole,
}

/// Share URLs for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    pub public_url: String,
    pub whatsapp: String,
    pub linkedin: String,
}

// ============================================================
// EXPORTER
// ============================================================

pub struct Exporter {
    registry: Handlebars<'static>,
    out_dir: PathBuf,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self, ExportError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_helper("upper", Box::new(upper));
        registry.register_template_string("report", REPORT_TEMPLATE)?;
        registry.register_template_string("share", SHARE_TEMPLATE)?;
        registry.register_template_string("card", CARD_TEMPLATE)?;

        Ok(Self {
            registry,
            out_dir: out_dir.into(),
        })
    }

    /// Plain-text strategy report
    pub fn render_report(&self, snapshot: &ProgressSnapshot<'_>) -> Result<String, ExportError> {
        let milestones: Vec<_> = snapshot
            .analysis
            .roadmap
            .iter()
            .enumerate()
            .map(|(i, level)| {
                json!({
                    "number": i + 1,
                    "title": level.title,
                    "status": level.status.as_str(),
                    "focus": level.skills.join(", "),
                })
            })
            .collect();

        let data = json!({
            "role": snapshot.role.title,
            "name": snapshot.user.name,
            "score": snapshot.analysis.score,
            "milestones": milestones,
            "advice": strategy_advice(snapshot.user, snapshot.analysis),
        });
        Ok(self.registry.render("report", &data)?)
    }

    /// Writes the report as `Career_GPS_<Name>_Strategy.txt`
    pub fn write_report(&self, snapshot: &ProgressSnapshot<'_>) -> Result<PathBuf, ExportError> {
        let body = self.render_report(snapshot)?;
        let path = self.out_dir.join(format!(
            "Career_GPS_{}_Strategy.txt",
            underscored(&snapshot.user.name)
        ));
        fs::create_dir_all(&self.out_dir)?;
        fs::write(&path, body)?;
        info!("Strategy report written to {}", path.display());
        Ok(path)
    }

    pub fn share_text(&self, snapshot: &ProgressSnapshot<'_>) -> Result<String, ExportError> {
        let data = json!({
            "role": snapshot.role.title,
            "score": snapshot.analysis.score,
            "streak": snapshot.user.streak,
            "projects": snapshot.user.completed_projects.len(),
        });
        Ok(self.registry.render("share", &data)?)
    }

    pub fn share_links(&self, snapshot: &ProgressSnapshot<'_>) -> Result<ShareLinks, ExportError> {
        let public_url = public_share_url(&snapshot.user.name);
        let message = format!("{}\n\n{}", self.share_text(snapshot)?, public_url);

        let whatsapp = Url::parse_with_params(WHATSAPP_URL, &[("text", message.as_str())])
            .map_err(|e| ExportError::Link(e.to_string()))?;
        let linkedin = Url::parse_with_params(LINKEDIN_URL, &[("url", public_url.as_str())])
            .map_err(|e| ExportError::Link(e.to_string()))?;

        Ok(ShareLinks {
            public_url,
            whatsapp: whatsapp.to_string(),
            linkedin: linkedin.to_string(),
        })
    }

    /// Stats card as an SVG document
    pub fn render_card(&self, snapshot: &ProgressSnapshot<'_>) -> Result<String, ExportError> {
        let data = json!({
            "width": CARD_WIDTH,
            "height": CARD_HEIGHT,
            "name": snapshot.user.name,
            "role": snapshot.role.title,
            "score": snapshot.analysis.score,
            "skills": snapshot.user.completed_skills.len(),
            "projects": snapshot.user.completed_projects.len(),
            "streak": snapshot.user.streak,
        });
        Ok(self.registry.render("card", &data)?)
    }

    /// Writes the card as `CareerGPS_Stats_<Name>.svg`
    pub fn write_card(&self, snapshot: &ProgressSnapshot<'_>) -> Result<PathBuf, ExportError> {
        let svg = self.render_card(snapshot)?;
        let path = self
            .out_dir
            .join(format!("CareerGPS_Stats_{}.svg", underscored(&snapshot.user.name)));
        fs::create_dir_all(&self.out_dir)?;
        fs::write(&path, svg)?;
        info!("Stats card written to {}", path.display());
        Ok(path)
    }
}

// ============================================================
// HELPERS
// ============================================================

/// Closing advice of the strategy report
pub fn strategy_advice(user: &User, analysis: &AnalysisResult) -> String {
    let year = user.year.unwrap_or(3);
    let priority = analysis
        .missing_skills
        .first()
        .map(String::as_str)
        .unwrap_or("advanced architecture");
    format!(
        "Based on your current speed, you are on track to be industry-ready by the end of your {} year. \
         Focus on project implementation and open-source contributions to boost your score past 80%. \
         Your next priority should be mastering {}.",
        ordinal(year),
        priority
    )
}

pub fn public_share_url(name: &str) -> String {
    let slug = name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{}/share/{}", SHARE_BASE_URL, slug.to_lowercase())
}

/// File-name stem for `name`: whitespace runs and anything outside
/// `[A-Za-z0-9_-]` become `_`, so the result is always a single component
fn underscored(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
