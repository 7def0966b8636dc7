use async_trait::async_trait;
use career_gps::engine::{
    fallback_analysis, ActionItem, ActionType, AnalysisResult, AppView, Branch, CareerRole,
    InsightError, InsightProvider, LevelStatus, MemorySessionStore, MissionError, MissionPhase,
    ModuleLevel, ProofError, RoadmapLevel, SessionStore, SqliteSessionStore,
    StaticInsightProvider, StudentProfile, VerificationDelays, MENTOR_OFFLINE_MESSAGE, USER_KEY,
};
use career_gps::{AppError, CareerApp, Exporter, LoginForm, DEFAULT_RESUME_TEXT};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

/// Provider with a fixed analysis that records the resume it was given
struct ScriptedProvider {
    analysis: AnalysisResult,
    mentor_online: bool,
    last_resume: Arc<Mutex<Option<String>>>,
}

#[async_trait]
impl InsightProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn analyze_career_path(
        &self,
        resume_text: &str,
        _role: &CareerRole,
        _student_skills: &[String],
    ) -> Result<AnalysisResult, InsightError> {
        *self.last_resume.lock().unwrap() = Some(resume_text.to_string());
        Ok(self.analysis.clone())
    }

    async fn module_content(&self, title: &str, level: ModuleLevel) -> Result<String, InsightError> {
        Ok(format!("{} notes for {}", level.as_str(), title))
    }

    async fn ask_mentor(&self, question: &str, context: &str) -> Result<String, InsightError> {
        if self.mentor_online {
            Ok(format!("Answer: {} [{}]", question, context))
        } else {
            Err(InsightError::Api { status: 503, message: "overloaded".into() })
        }
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn typescript_gap() -> AnalysisResult {
    AnalysisResult {
        score: 50,
        explanation: "Needs TypeScript".to_string(),
        matched_skills: vec![],
        missing_skills: vec!["TypeScript".to_string(), "Node.js".to_string()],
        roadmap: vec![
            RoadmapLevel::new("Typed Frontend", LevelStatus::Missing, &["TypeScript"]),
            RoadmapLevel::new("Backend", LevelStatus::Missing, &["Node.js", "PostgreSQL"]),
        ],
        next_actions: vec![
            ActionItem::new(ActionType::Skill, "Master TypeScript with React", "Types"),
            ActionItem::new(ActionType::Project, "Full-Stack Inventory Manager", "CRUD"),
            ActionItem::new(ActionType::Opportunity, "Contribute to Supabase", "OSS"),
        ],
    }
}

fn profile(role: &str) -> StudentProfile {
    StudentProfile {
        name: "Asha Rao".to_string(),
        branch: Branch::ComputerScience,
        year: 3,
        target_role: role.to_string(),
        skills: vec!["Java".to_string()],
        resume_text: None,
    }
}

fn scripted_app(store: MemorySessionStore, mentor_online: bool) -> (CareerApp, Arc<Mutex<Option<String>>>) {
    let last_resume = Arc::new(Mutex::new(None));
    let provider = ScriptedProvider {
        analysis: typescript_gap(),
        mentor_online,
        last_resume: last_resume.clone(),
    };
    let app = CareerApp::new(Box::new(store), Box::new(provider))
        .with_delays(VerificationDelays::none());
    (app, last_resume)
}

fn login(app: &mut CareerApp) {
    app.login_on(
        LoginForm {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            ..LoginForm::default()
        },
        day(19),
    )
    .unwrap();
}

#[test]
fn test_login_defaults() {
    let store = MemorySessionStore::new();
    let mut app = CareerApp::new(Box::new(store.clone()), Box::new(StaticInsightProvider));

    let user = app
        .login_on(LoginForm { email: "x@example.com".into(), ..LoginForm::default() }, day(19))
        .unwrap();
    assert_eq!(user.name, "Engineer One");
    assert_eq!(user.streak, 1);
    assert_eq!(user.total_time, 45);
    assert_eq!(user.year, Some(3));
    assert_eq!(user.branch, Some(Branch::ComputerScience));
    assert_eq!(user.last_active_date.as_deref(), Some("Mon Oct 19 2026"));
    assert!(store.get_record(USER_KEY).unwrap().is_some());
}

#[test]
fn test_startup_refreshes_last_active_date() {
    let store = MemorySessionStore::new();
    let (mut app, _) = scripted_app(store.clone(), true);
    login(&mut app);

    let (mut reopened, _) = scripted_app(store.clone(), true);
    let session = reopened.startup_on(day(20)).unwrap();
    let user = session.user.as_ref().unwrap();
    assert_eq!(user.last_active_date.as_deref(), Some("Tue Oct 20 2026"));
    assert_eq!(user.streak, 1);

    let stored = store.load().unwrap();
    assert_eq!(
        stored.user.unwrap().last_active_date.as_deref(),
        Some("Tue Oct 20 2026")
    );
}

#[test]
fn test_startup_with_malformed_record_has_no_session() {
    let store = MemorySessionStore::new();
    store.put_record(USER_KEY, "{\"name\": 42").unwrap();

    let (mut app, _) = scripted_app(store, true);
    let session = app.startup_on(day(19)).unwrap();
    assert!(session.user.is_none());
    assert_eq!(app.view(), AppView::Dashboard);
}

#[tokio::test]
async fn test_analysis_requires_login_and_known_role() {
    let (mut app, _) = scripted_app(MemorySessionStore::new(), true);
    assert!(matches!(
        app.start_analysis(profile("web-dev")).await,
        Err(AppError::NoSession)
    ));

    login(&mut app);
    match app.start_analysis(profile("astronaut")).await {
        Err(AppError::UnknownRole(role)) => assert_eq!(role, "astronaut"),
        other => panic!("expected unknown role, got {:?}", other.map(|a| a.score)),
    }
}

#[tokio::test]
async fn test_analysis_uses_default_resume_text_and_persists() {
    let store = MemorySessionStore::new();
    let (mut app, last_resume) = scripted_app(store.clone(), true);
    login(&mut app);

    let score = app.start_analysis(profile("web-dev")).await.unwrap().score;
    assert_eq!(score, 50);
    assert_eq!(last_resume.lock().unwrap().as_deref(), Some(DEFAULT_RESUME_TEXT));

    let stored = store.load().unwrap();
    assert_eq!(stored.analysis, Some(typescript_gap()));
    assert_eq!(stored.profile.unwrap().target_role, "web-dev");
}

#[tokio::test]
async fn test_skill_mission_end_to_end() {
    let store = MemorySessionStore::new();
    let (mut app, _) = scripted_app(store.clone(), true);
    login(&mut app);
    app.start_analysis(profile("web-dev")).await.unwrap();

    let mission = app.navigate_to_mission("Master TypeScript with React").unwrap();
    assert_eq!(mission.phase, MissionPhase::InProgress);
    assert_eq!(mission.modules.len(), 3);
    assert_eq!(app.view(), AppView::MissionSkill);

    // modules unlock in order
    assert!(matches!(
        app.open_module(1),
        Err(AppError::Mission(MissionError::ModuleLocked { index: 1 }))
    ));
    for i in 0..3 {
        app.open_module(i).unwrap();
        let notes = app.module_notes(i).await.unwrap();
        assert!(notes.ends_with("notes for Master TypeScript with React"));
        app.complete_module(i).unwrap();
    }

    let answer = app.ask_mentor("What are generics?").await.unwrap();
    assert_eq!(
        answer.as_deref(),
        Some("Answer: What are generics? [Master TypeScript with React Mission Context]")
    );

    app.finish_learning().unwrap();
    let update = app.complete_active_mission().await.unwrap();

    assert_eq!(update.analysis.score, 60);
    assert_eq!(update.analysis.matched_skills, vec!["TypeScript".to_string()]);
    assert_eq!(update.analysis.missing_skills, vec!["Node.js".to_string()]);
    assert_eq!(
        update.analysis.next_actions[0].title,
        "Node.js & Express Backend Development"
    );
    assert_eq!(update.analysis.roadmap[0].status, LevelStatus::Completed);
    assert_eq!(update.milestone.as_deref(), Some("Milestone 1"));
    assert_eq!(app.view(), AppView::Dashboard);
    assert!(app.mission().is_none());

    let stored = store.load().unwrap();
    assert_eq!(stored.analysis.unwrap().score, 60);
    let user = stored.user.unwrap();
    assert_eq!(user.completed_skills, vec!["TypeScript".to_string()]);
    assert_eq!(user.completed_projects, vec!["Milestone 1".to_string()]);
    assert!(stored.mission.is_none());
}

#[tokio::test]
async fn test_project_mission_rejects_bad_proof() {
    let (mut app, _) = scripted_app(MemorySessionStore::new(), true);
    login(&mut app);
    app.start_analysis(profile("web-dev")).await.unwrap();
    app.navigate_to_mission("Full-Stack Inventory Manager").unwrap();

    let err = app.submit_proof("https://gitlab.com/asha/inventory").unwrap_err();
    assert!(matches!(
        err,
        AppError::Mission(MissionError::Proof(ProofError::NotARepository))
    ));
    assert_eq!(app.mission().unwrap().phase, MissionPhase::AwaitingProof);

    app.submit_proof("https://github.com/asha/inventory").unwrap();
    let update = app.complete_active_mission().await.unwrap();
    assert_eq!(update.score_delta, 15);
    // skill slot untouched by a project
    assert_eq!(update.analysis.next_actions[0].title, "Master TypeScript with React");
}

#[tokio::test]
async fn test_open_source_mission_counts_contribution() {
    let (mut app, _) = scripted_app(MemorySessionStore::new(), true);
    login(&mut app);
    app.start_analysis(profile("web-dev")).await.unwrap();
    app.navigate_to_mission("Contribute to Supabase").unwrap();
    assert_eq!(app.view(), AppView::MissionOs);

    app.submit_proof("https://github.com/supabase/supabase/pull/1").unwrap();
    let update = app.complete_active_mission().await.unwrap();
    assert_eq!(update.user.contributions, 1);
    assert_eq!(app.user().unwrap().contributions, 1);
}

#[tokio::test]
async fn test_mission_survives_restart() {
    let store = MemorySessionStore::new();
    let (mut app, _) = scripted_app(store.clone(), true);
    login(&mut app);
    app.start_analysis(profile("web-dev")).await.unwrap();
    app.navigate_to_mission("Master TypeScript with React").unwrap();
    app.open_module(0).unwrap();
    app.complete_module(0).unwrap();

    let (mut reopened, _) = scripted_app(store, true);
    reopened.startup_on(day(19)).unwrap();
    assert_eq!(reopened.view(), AppView::MissionSkill);
    let mission = reopened.mission().unwrap();
    assert!(mission.completed_modules.contains(&0));
    assert!(!mission.is_module_locked(1));
}

#[tokio::test]
async fn test_mentor_goes_offline_after_failure() {
    let (mut app, _) = scripted_app(MemorySessionStore::new(), false);
    login(&mut app);
    app.start_analysis(profile("web-dev")).await.unwrap();
    app.navigate_to_mission("Master TypeScript with React").unwrap();
    app.open_module(0).unwrap();

    let first = app.ask_mentor("Why types?").await.unwrap();
    assert_eq!(first.as_deref(), Some(MENTOR_OFFLINE_MESSAGE));
    let second = app.ask_mentor("Still there?").await.unwrap();
    assert!(second.is_none());
    assert!(app.mission().unwrap().chat.offline);
}

#[tokio::test]
async fn test_complete_without_mission() {
    let (mut app, _) = scripted_app(MemorySessionStore::new(), true);
    login(&mut app);
    app.start_analysis(profile("web-dev")).await.unwrap();
    assert!(matches!(
        app.complete_active_mission().await,
        Err(AppError::NoActiveMission)
    ));
    assert!(matches!(
        app.navigate_to_mission("Learn Rust"),
        Err(AppError::UnknownAction(_))
    ));
}

#[tokio::test]
async fn test_static_provider_fallback_flow_with_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("career_gps.db");

    {
        let store = SqliteSessionStore::new(Some(db_path.clone())).unwrap();
        let mut app = CareerApp::new(Box::new(store), Box::new(StaticInsightProvider))
            .with_delays(VerificationDelays::none());
        login(&mut app);
        let analysis = app.start_analysis(profile("web-dev")).await.unwrap();
        assert_eq!(analysis, &fallback_analysis());

        app.navigate_to_mission("Master TypeScript with React").unwrap();
        for i in 0..3 {
            app.open_module(i).unwrap();
            app.complete_module(i).unwrap();
        }
        app.finish_learning().unwrap();
        let update = app.complete_active_mission().await.unwrap();
        assert_eq!(update.analysis.score, 75);
        assert!(update.analysis.matched_skills.contains(&"TypeScript".to_string()));
        assert!(!update.analysis.missing_skills.contains(&"TypeScript".to_string()));
        // "Fundamentals" starts completed in the fallback roadmap
        assert_eq!(update.milestone.as_deref(), Some("Milestone 1"));
    }

    let store = SqliteSessionStore::new(Some(db_path)).unwrap();
    let mut app = CareerApp::new(Box::new(store), Box::new(StaticInsightProvider));
    let session = app.startup_on(day(19)).unwrap();
    let analysis = session.analysis.as_ref().unwrap();
    assert_eq!(analysis.score, 75);
    assert_eq!(
        analysis.next_actions[0].title,
        "Node.js & Express Backend Development"
    );

    let role = app.current_role().unwrap();
    let exporter = Exporter::new(dir.path()).unwrap();
    let report = exporter.write_report(&app.snapshot(&role).unwrap()).unwrap();
    assert!(report.ends_with("Career_GPS_Asha_Rao_Strategy.txt"));
    let body = std::fs::read_to_string(report).unwrap();
    assert!(body.contains("Current Fit Score: 75%"));
    assert!(body.contains("mastering Node.js."));
}

#[test]
fn test_streak_and_logout() {
    let store = MemorySessionStore::new();
    let (mut app, _) = scripted_app(store.clone(), true);
    assert!(matches!(app.streak_earned(), Err(AppError::NoSession)));

    login(&mut app);
    assert_eq!(app.streak_earned().unwrap(), 2);
    assert_eq!(store.load().unwrap().user.unwrap().streak, 2);

    app.logout().unwrap();
    assert!(app.user().is_none());
    assert!(store.is_empty());
}
