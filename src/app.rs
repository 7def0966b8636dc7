//! Application Controller
//!
//! Owns the session and routes every user action through the engine:
//! sign-in, analysis, mission work, completion and streaks. Every state
//! change is persisted before the call returns.

use crate::engine::{
    analyze_or_fallback, catalog, day_label, AnalysisResult, AppView, Branch, CareerRole,
    InsightProvider, Mission, MissionError, MissionPhase, ProgressUpdate, ProgressionEngine,
    Session, SessionError, SessionStore, SkillModule, StudentProfile, User, VerificationDelays,
};
use crate::export::{ExportError, ProgressSnapshot};
use chrono::{Local, NaiveDate};
use log::{debug, info};
use thiserror::Error;

pub const DEFAULT_USER_NAME: &str = "Engineer One";
pub const DEFAULT_RESUME_TEXT: &str = "Candidate interested in development.";
pub const SIGNUP_ACK: &str =
    "Signal Locked! Your coordinates are registered. Recalibrating for login...";

const LOGIN_STREAK: u32 = 1;
const LOGIN_TOTAL_TIME: u32 = 45;
const DEFAULT_YEAR: u32 = 3;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Mission(#[from] MissionError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Unknown career role '{0}'")]
    UnknownRole(String),

    #[error("No one is signed in")]
    NoSession,

    #[error("No analysis yet; run an analysis first")]
    NoAnalysis,

    #[error("'{0}' is not one of the current next actions")]
    UnknownAction(String),

    #[error("No mission in progress")]
    NoActiveMission,
}

/// Sign-in form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub name: String,
    pub email: String,
    pub branch: Option<Branch>,
    pub year: Option<u32>,
}

pub struct CareerApp {
    store: Box<dyn SessionStore>,
    provider: Box<dyn InsightProvider>,
    engine: ProgressionEngine,
    delays: VerificationDelays,
    session: Session,
    view: AppView,
}

impl CareerApp {
    pub fn new(store: Box<dyn SessionStore>, provider: Box<dyn InsightProvider>) -> Self {
        Self {
            store,
            provider,
            engine: ProgressionEngine::default(),
            delays: VerificationDelays::default(),
            session: Session::default(),
            view: AppView::default(),
        }
    }

    pub fn with_delays(mut self, delays: VerificationDelays) -> Self {
        self.delays = delays;
        self
    }

    // ============================================================
    // ACCESSORS
    // ============================================================

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.session.analysis.as_ref()
    }

    pub fn mission(&self) -> Option<&Mission> {
        self.session.mission.as_ref()
    }

    pub fn view(&self) -> AppView {
        self.view
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Role of the active profile, or the default role when none is set
    pub fn current_role(&self) -> Result<CareerRole, AppError> {
        let role_id = self
            .session
            .profile
            .as_ref()
            .map(|p| p.target_role.as_str())
            .unwrap_or(catalog::DEFAULT_ROLE_ID);
        catalog::find_role(role_id).ok_or_else(|| AppError::UnknownRole(role_id.to_string()))
    }

    /// User, analysis and role for rendering exports
    pub fn snapshot<'a>(&'a self, role: &'a CareerRole) -> Result<ProgressSnapshot<'a>, AppError> {
        let user = self.user().ok_or(AppError::NoSession)?;
        let analysis = self.analysis().ok_or(AppError::NoAnalysis)?;
        Ok(ProgressSnapshot { user, analysis, role })
    }

    // ============================================================
    // SESSION LIFECYCLE
    // ============================================================

    pub fn startup(&mut self) -> Result<&Session, AppError> {
        self.startup_on(Local::now().date_naive())
    }

    /// Restores the stored session, stamping `lastActiveDate` when the day
    /// has rolled over
    pub fn startup_on(&mut self, today: NaiveDate) -> Result<&Session, AppError> {
        self.session = self.store.load()?;

        let today = day_label(today);
        if let Some(user) = self.session.user.as_mut() {
            if user.last_active_date.as_deref() != Some(today.as_str()) {
                debug!("New day for {}, last active {:?}", user.name, user.last_active_date);
                user.last_active_date = Some(today);
                self.store.save(&self.session)?;
            }
        }

        self.view = match &self.session.mission {
            Some(mission) => AppView::for_action(mission.action_type()),
            None => AppView::Dashboard,
        };
        Ok(&self.session)
    }

    /// Registration is acknowledged only; the user signs in afterwards
    pub fn signup(&self, email: &str) -> &'static str {
        info!("Signup acknowledged for {}", email);
        SIGNUP_ACK
    }

    pub fn login(&mut self, form: LoginForm) -> Result<&User, AppError> {
        self.login_on(form, Local::now().date_naive())
    }

    pub fn login_on(&mut self, form: LoginForm, today: NaiveDate) -> Result<&User, AppError> {
        let name = match form.name.trim() {
            "" => DEFAULT_USER_NAME,
            name => name,
        };
        let mut user = User::student(name, form.email.trim());
        user.branch = Some(form.branch.unwrap_or(Branch::ComputerScience));
        user.year = Some(form.year.unwrap_or(DEFAULT_YEAR));
        user.streak = LOGIN_STREAK;
        user.total_time = LOGIN_TOTAL_TIME;
        user.last_active_date = Some(day_label(today));

        info!("{} signed in", user.name);
        self.session.user = Some(user);
        self.store.save(&self.session)?;
        self.session.user.as_ref().ok_or(AppError::NoSession)
    }

    /// Forgets the user, the analysis, the profile and any mission
    pub fn logout(&mut self) -> Result<(), AppError> {
        if let Some(user) = &self.session.user {
            info!("{} signed out", user.name);
        }
        self.store.clear()?;
        self.session = Session::default();
        self.view = AppView::Dashboard;
        Ok(())
    }

    // ============================================================
    // ANALYSIS
    // ============================================================

    /// Runs the gap analysis for a profile and makes it the active one
    pub async fn start_analysis(
        &mut self,
        mut profile: StudentProfile,
    ) -> Result<&AnalysisResult, AppError> {
        if self.session.user.is_none() {
            return Err(AppError::NoSession);
        }
        let role = catalog::find_role(&profile.target_role)
            .ok_or_else(|| AppError::UnknownRole(profile.target_role.clone()))?;

        let resume_text = match profile.resume_text.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => DEFAULT_RESUME_TEXT.to_string(),
        };
        profile.resume_text = Some(resume_text.clone());

        info!("Analyzing {} for '{}' with {}", profile.name, role.title, self.provider.name());
        let analysis =
            analyze_or_fallback(self.provider.as_ref(), &resume_text, &role, &profile.skills).await;

        self.session.analysis = Some(analysis);
        self.session.profile = Some(profile);
        self.session.mission = None;
        self.view = AppView::Dashboard;
        self.store.save(&self.session)?;
        self.analysis().ok_or(AppError::NoAnalysis)
    }

    // ============================================================
    // NAVIGATION
    // ============================================================

    /// Switches between the non-mission views
    pub fn navigate(&mut self, view: AppView) {
        self.view = view;
    }

    /// Opens the mission for one of the current next actions, resuming it
    /// when it is already in progress
    pub fn navigate_to_mission(&mut self, title: &str) -> Result<&Mission, AppError> {
        let analysis = self.analysis().ok_or(AppError::NoAnalysis)?;
        let action = analysis
            .find_action(title)
            .cloned()
            .ok_or_else(|| AppError::UnknownAction(title.to_string()))?;

        let resuming = self
            .session
            .mission
            .as_ref()
            .is_some_and(|m| m.action.title == action.title);
        if !resuming {
            let mut mission = Mission::new(action);
            mission.start()?;
            info!("Mission '{}' started", mission.action.title);
            self.session.mission = Some(mission);
            self.store.save(&self.session)?;
        }

        let mission = self.session.mission.as_ref().ok_or(AppError::NoActiveMission)?;
        self.view = AppView::for_action(mission.action_type());
        Ok(mission)
    }

    // ============================================================
    // MISSION WORK
    // ============================================================

    pub fn open_module(&mut self, index: usize) -> Result<SkillModule, AppError> {
        let mission = self.active_mission()?;
        let module = mission.open_module(index)?.clone();
        self.store.save(&self.session)?;
        Ok(module)
    }

    /// Learning notes for a module, from the provider when it has them
    pub async fn module_notes(&self, index: usize) -> Result<String, AppError> {
        let mission = self.mission().ok_or(AppError::NoActiveMission)?;
        let module = mission
            .modules
            .get(index)
            .ok_or(MissionError::NoSuchModule { index })?;

        match self
            .provider
            .module_content(&mission.action.title, module.level)
            .await
        {
            Ok(notes) => Ok(notes),
            Err(e) => {
                debug!("Module notes from {} failed: {}", self.provider.name(), e);
                Ok(module.notes.clone())
            }
        }
    }

    pub fn complete_module(&mut self, index: usize) -> Result<(), AppError> {
        self.active_mission()?.complete_module(index)?;
        self.store.save(&self.session)?;
        Ok(())
    }

    pub fn finish_learning(&mut self) -> Result<(), AppError> {
        self.active_mission()?.finish_learning()?;
        self.store.save(&self.session)?;
        Ok(())
    }

    /// Submits a proof link; a rejected link still leaves the mission
    /// waiting for proof
    pub fn submit_proof(&mut self, link: &str) -> Result<(), AppError> {
        let result = self.active_mission()?.submit_proof(link);
        self.store.save(&self.session)?;
        result.map_err(AppError::from)
    }

    /// Asks the mentor about the active mission
    pub async fn ask_mentor(&mut self, question: &str) -> Result<Option<String>, AppError> {
        let mission = self
            .session
            .mission
            .as_mut()
            .ok_or(AppError::NoActiveMission)?;

        let context = format!("{} Mission Context", mission.action.title);

        let reply = mission
            .chat
            .ask(self.provider.as_ref(), question, &context)
            .await;
        self.store.save(&self.session)?;
        Ok(reply)
    }

    /// Verifies the active mission and feeds it through the progression
    /// engine. The mission is cleared and the dashboard shown afterwards.
    pub async fn complete_active_mission(&mut self) -> Result<ProgressUpdate, AppError> {
        if self.session.user.is_none() {
            return Err(AppError::NoSession);
        }
        if self.session.analysis.is_none() {
            return Err(AppError::NoAnalysis);
        }
        let mission = self
            .session
            .mission
            .as_mut()
            .ok_or(AppError::NoActiveMission)?;
        if mission.phase != MissionPhase::Completed {
            mission.verify(&self.delays).await?;
        }
        let action = mission.action.clone();

        let user = self.session.user.as_ref().ok_or(AppError::NoSession)?;
        let analysis = self.session.analysis.as_ref().ok_or(AppError::NoAnalysis)?;
        let target_role = self.session.profile.as_ref().map(|p| p.target_role.as_str());

        let update = self
            .engine
            .complete_mission(analysis, user, &action, target_role);
        info!(
            "Mission '{}' complete: +{} (score {})",
            action.title, update.score_delta, update.analysis.score
        );
        if let Some(milestone) = &update.milestone {
            info!("{} unlocked", milestone);
        }

        self.session.analysis = Some(update.analysis.clone());
        self.session.user = Some(update.user.clone());
        self.session.mission = None;
        self.view = AppView::Dashboard;
        self.store.save(&self.session)?;
        Ok(update)
    }

    // ============================================================
    // STREAKS
    // ============================================================

    /// Adds one day to the streak; returns the new streak
    pub fn streak_earned(&mut self) -> Result<u32, AppError> {
        let user = self.session.user.as_mut().ok_or(AppError::NoSession)?;
        user.streak += 1;
        let streak = user.streak;
        info!("Focus streak extended to {} days", streak);
        self.store.save(&self.session)?;
        Ok(streak)
    }

    fn active_mission(&mut self) -> Result<&mut Mission, AppError> {
        self.session
            .mission
            .as_mut()
            .ok_or(AppError::NoActiveMission)
    }
}
