use career_gps::engine::{
    catalog, progression, ActionItem, ActionType, Advancement, AnalysisResult, LevelStatus,
    ProgressionEngine, RoadmapLevel, User,
};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn fresh_analysis(matched: &[&str], missing: &[&str]) -> AnalysisResult {
    AnalysisResult {
        score: 40,
        explanation: "Baseline".to_string(),
        matched_skills: strings(matched),
        missing_skills: strings(missing),
        roadmap: vec![
            RoadmapLevel::new("Basics", LevelStatus::Missing, &["Git", "HTML"]),
            RoadmapLevel::new("Frontend", LevelStatus::Missing, &["React", "TypeScript"]),
            RoadmapLevel::new("Backend", LevelStatus::Missing, &["Node.js", "PostgreSQL"]),
            RoadmapLevel::new("Soft skills", LevelStatus::Missing, &[]),
        ],
        next_actions: vec![
            ActionItem::new(ActionType::Skill, "Master TypeScript with React", "Types"),
            ActionItem::new(ActionType::Project, "Full-Stack Inventory Manager", "CRUD"),
            ActionItem::new(ActionType::Opportunity, "Contribute to Supabase", "OSS"),
        ],
    }
}

fn skill(title: &str) -> ActionItem {
    ActionItem::new(ActionType::Skill, title, "")
}

fn assert_disjoint(analysis: &AnalysisResult) {
    for s in &analysis.matched_skills {
        assert!(!analysis.missing_skills.contains(s), "{} is both matched and missing", s);
        assert_eq!(analysis.matched_skills.iter().filter(|m| *m == s).count(), 1);
    }
    for s in &analysis.missing_skills {
        assert_eq!(analysis.missing_skills.iter().filter(|m| *m == s).count(), 1);
    }
}

#[test]
fn test_recompute_is_idempotent() {
    let scenarios = [
        fresh_analysis(&[], &["Git"]),
        fresh_analysis(&["Git"], &["HTML"]),
        fresh_analysis(&["Git", "HTML", "React"], &["TypeScript"]),
        fresh_analysis(&["Git", "HTML", "React", "TypeScript", "Node.js", "PostgreSQL"], &[]),
    ];
    for mut analysis in scenarios {
        analysis.roadmap = progression::recompute_roadmap(&analysis);
        let once = analysis.roadmap.clone();
        analysis.roadmap = progression::recompute_roadmap(&analysis);
        assert_eq!(analysis.roadmap, once);
    }
}

#[test]
fn test_completed_iff_all_skills_matched() {
    let pool = ["Git", "HTML", "React", "TypeScript", "Node.js", "PostgreSQL"];
    // every subset of the skill pool
    for mask in 0u32..(1 << pool.len()) {
        let matched: Vec<&str> = pool
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, s)| *s)
            .collect();
        let analysis = fresh_analysis(&matched, &[]);
        let roadmap = progression::recompute_roadmap(&analysis);

        for level in roadmap.iter().filter(|l| !l.skills.is_empty()) {
            let hits = level
                .skills
                .iter()
                .filter(|s| analysis.matched_skills.contains(s))
                .count();
            match level.status {
                LevelStatus::Completed => assert_eq!(hits, level.skills.len()),
                LevelStatus::InProgress => assert!(hits > 0 && hits < level.skills.len()),
                LevelStatus::Missing => assert_eq!(hits, 0),
            }
        }
        assert_eq!(roadmap[3].status, LevelStatus::Missing);
    }
}

#[test]
fn test_score_monotone_and_capped() {
    let engine = ProgressionEngine::default();
    let mut analysis = fresh_analysis(&[], &["TypeScript", "Node.js", "PostgreSQL"]);
    let mut user = User::student("Dev", "dev@example.com");
    let titles = [
        "Master TypeScript with React",
        "Node.js & Express Backend Development",
        "Full-Stack Inventory Manager",
        "Contribute to Supabase",
    ];

    for round in 0..12 {
        let title = titles[round % titles.len()];
        let action = analysis
            .find_action(title)
            .cloned()
            .unwrap_or_else(|| ActionItem::new(ActionType::Project, title, ""));
        let update = engine.complete_mission(&analysis, &user, &action, Some("web-dev"));

        assert!(update.analysis.score >= analysis.score);
        assert!(update.analysis.score <= 100);
        assert_disjoint(&update.analysis);

        analysis = update.analysis;
        user = update.user;
    }
    assert_eq!(analysis.score, 100);
}

#[test]
fn test_web_dev_curriculum_walk() {
    let curriculum = catalog::curriculum("web-dev").unwrap();
    let mut actions = vec![curriculum[0].action.clone()];

    for pair in curriculum.windows(2) {
        let (next, outcome) = progression::advance_next_actions(&pair[0].action, &curriculum, &actions);
        assert_eq!(outcome, Advancement::Advanced { next: pair[1].action.title.clone() });
        assert_eq!(next[0], pair[1].action);
        actions = next;
    }

    let last = &curriculum[curriculum.len() - 1].action;
    let (next, outcome) = progression::advance_next_actions(last, &curriculum, &actions);
    assert_eq!(outcome, Advancement::Exhausted);
    assert!(next.is_empty());
}

#[test]
fn test_typescript_mission_end_to_end() {
    let engine = ProgressionEngine::default();
    let analysis = fresh_analysis(&[], &["TypeScript", "Node.js"]);
    let user = User::student("Dev", "dev@example.com");

    let update = engine.complete_mission(
        &analysis,
        &user,
        &skill("Master TypeScript with React"),
        Some("web-dev"),
    );

    assert_eq!(update.skill.as_deref(), Some("TypeScript"));
    assert_eq!(update.analysis.matched_skills, strings(&["TypeScript"]));
    assert_eq!(update.analysis.missing_skills, strings(&["Node.js"]));
    assert_eq!(update.analysis.score, analysis.score + 10);
    assert_eq!(update.score_delta, 10);
    assert_eq!(
        update.analysis.next_actions[0].title,
        "Node.js & Express Backend Development"
    );
    assert_eq!(update.analysis.next_actions[1].title, "Full-Stack Inventory Manager");
    assert_eq!(update.analysis.roadmap[1].status, LevelStatus::InProgress);
    assert_eq!(update.user.completed_skills, strings(&["TypeScript"]));
    assert!(update.milestone.is_none());
}

#[test]
fn test_unknown_role_advances_on_default_curriculum() {
    let engine = ProgressionEngine::default();
    let analysis = fresh_analysis(&[], &["TypeScript"]);
    let user = User::student("Dev", "dev@example.com");

    let update = engine.complete_mission(
        &analysis,
        &user,
        &skill("Master TypeScript with React"),
        Some("game-dev"),
    );
    assert_eq!(
        update.advancement,
        Advancement::Advanced { next: "Node.js & Express Backend Development".to_string() }
    );
}

#[test]
fn test_project_and_open_source_credit() {
    let engine = ProgressionEngine::default();
    let analysis = fresh_analysis(&["Git", "HTML"], &["React"]);
    let user = User::student("Dev", "dev@example.com");

    let project = ActionItem::new(ActionType::Project, "Full-Stack Inventory Manager", "");
    let update = engine.complete_mission(&analysis, &user, &project, Some("web-dev"));
    assert_eq!(update.score_delta, 15);
    assert_eq!(update.analysis.next_actions, analysis.next_actions);
    // "Basics" completes with Git + HTML
    assert_eq!(update.milestone.as_deref(), Some("Milestone 1"));

    let oss = ActionItem::new(ActionType::Opportunity, "Contribute to Supabase", "");
    let update = engine.complete_mission(&update.analysis, &update.user, &oss, Some("web-dev"));
    assert_eq!(update.score_delta, 10);
    assert_eq!(update.user.contributions, 1);
    assert!(update.milestone.is_none());
    assert_eq!(update.user.completed_projects, strings(&["Milestone 1"]));
}

#[test]
fn test_serde_roundtrip_of_session_types() {
    let mut user = User::student("Dev", "dev@example.com");
    user.completed_skills = strings(&["Git"]);
    user.last_active_date = Some("Mon Oct 19 2026".to_string());
    let user_json = serde_json::to_string(&user).unwrap();
    assert!(user_json.contains("\"completedSkills\""));
    assert_eq!(serde_json::from_str::<User>(&user_json).unwrap(), user);

    let analysis = fresh_analysis(&["Git"], &["React"]);
    let analysis_json = serde_json::to_string(&analysis).unwrap();
    assert!(analysis_json.contains("\"nextActions\""));
    assert!(analysis_json.contains("\"type\":\"skill\""));
    assert_eq!(serde_json::from_str::<AnalysisResult>(&analysis_json).unwrap(), analysis);
}
