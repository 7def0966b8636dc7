//! Career GPS - Main Entry Point
//!
//! Command-line front end over the persisted Career GPS session.

use anyhow::{bail, Context, Result};
use career_gps::{
    catalog, format_clock, parse_resume_stub, ActionType, AppConfig, AppView, Branch,
    CareerApp, Exporter, GenerativeInsightProvider, InsightProvider, LoginForm, MissionPhase,
    SessionTimer, SqliteSessionStore, StaticInsightProvider, StudentProfile,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "career-gps")]
#[command(version, about = "Career GPS - navigate from skills to job-ready", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available career roles
    Roles,
    /// Register an account (acknowledged only)
    Signup {
        #[arg(short, long)]
        email: String,
    },
    /// Sign in and start a fresh user record
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        name: Option<String>,
        /// Branch name or code (cse, ece, me, ce, ee)
        #[arg(short, long)]
        branch: Option<String>,
        #[arg(short, long)]
        year: Option<u32>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the dashboard
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the skill-gap analysis for a target role
    Analyze {
        /// Role id (see `roles`)
        #[arg(short, long, default_value = catalog::DEFAULT_ROLE_ID)]
        role: String,
        /// Current skills, comma separated
        #[arg(short, long, value_delimiter = ',')]
        skills: Vec<String>,
        /// Plain-text resume file
        #[arg(long)]
        resume: Option<PathBuf>,
        /// Use the built-in sample resume
        #[arg(long, conflicts_with = "resume")]
        sample_resume: bool,
    },
    /// Show the roadmap
    Route,
    /// Open the mission for one of the next actions
    Start { title: String },
    /// Open a learning module of the active skill mission (1-based)
    Module {
        index: usize,
        /// Mark the module done
        #[arg(long)]
        done: bool,
    },
    /// Submit the proof-of-work link for a project or open-source mission
    Submit { link: String },
    /// Ask the AI mentor about the active mission
    Ask { question: String },
    /// Verify the active mission and apply its progress
    Complete,
    /// Run the focus timer until the daily streak is earned
    Focus,
    /// Write the strategy report
    Report,
    /// Print share text and links, and write the stats card
    Share,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let store = SqliteSessionStore::new(Some(config.db_path.clone()))
        .with_context(|| format!("opening session store {}", config.db_path.display()))?;
    let provider: Box<dyn InsightProvider> = match &config.api_key {
        Some(key) => Box::new(GenerativeInsightProvider::new(
            key.clone(),
            Some(config.model.clone()),
        )?),
        None => Box::new(StaticInsightProvider),
    };
    let mut app = CareerApp::new(Box::new(store), provider).with_delays(config.delays());
    app.startup()?;

    match cli.command {
        Commands::Roles => {
            for role in catalog::career_roles() {
                println!("{:<14} {}", role.id, role.title);
                println!("{:<14} {}", "", role.required_skills.join(", "));
            }
        }
        Commands::Signup { email } => println!("{}", app.signup(&email)),
        Commands::Login { email, name, branch, year } => {
            let branch = match branch {
                Some(b) => match Branch::parse(&b) {
                    Some(branch) => Some(branch),
                    None => bail!("Unknown branch '{}'", b),
                },
                None => None,
            };
            let user = app.login(LoginForm {
                name: name.unwrap_or_default(),
                email,
                branch,
                year,
            })?;
            println!("Welcome, {}! Streak: {} day(s)", user.name, user.streak);
        }
        Commands::Logout => {
            app.logout()?;
            println!("Signed out. Session cleared.");
        }
        Commands::Status { json } => print_status(&app, json)?,
        Commands::Analyze { role, skills, resume, sample_resume } => {
            let user = app.user().context("sign in first (`career-gps login`)")?;
            let resume_text = match resume {
                Some(path) => Some(
                    std::fs::read_to_string(&path)
                        .with_context(|| format!("reading resume {}", path.display()))?,
                ),
                None if sample_resume => Some(parse_resume_stub()),
                None => None,
            };
            let profile = StudentProfile {
                name: user.name.clone(),
                branch: user.branch.unwrap_or(Branch::ComputerScience),
                year: user.year.unwrap_or(3),
                target_role: role,
                skills: skills
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                resume_text,
            };
            let analysis = app.start_analysis(profile).await?;
            println!("Fit score: {}%", analysis.score);
            println!("{}", analysis.explanation);
            print_next_actions(&app);
        }
        Commands::Route => {
            app.navigate(AppView::Route);
            let role = app.current_role()?;
            let analysis = app.analysis().context("run `career-gps analyze` first")?;
            println!("Route to {} ({}%)", role.title, analysis.score);
            for (i, level) in analysis.roadmap.iter().enumerate() {
                println!("{}. {} [{}]", i + 1, level.title, level.status.as_str());
                if !level.skills.is_empty() {
                    println!("   Focus: {}", level.skills.join(", "));
                }
            }
        }
        Commands::Start { title } => {
            let mission = app.navigate_to_mission(&title)?;
            println!("Mission: {} ({})", mission.action.title, mission.phase.as_str());
            println!("{}", mission.action.description);
            match mission.action_type() {
                ActionType::Skill => {
                    for (i, module) in mission.modules.iter().enumerate() {
                        let mark = if mission.completed_modules.contains(&i) {
                            "x"
                        } else if mission.is_module_locked(i) {
                            "locked"
                        } else {
                            " "
                        };
                        println!("  {}. [{}] {} ({})", i + 1, mark, module.title, module.level.as_str());
                    }
                }
                ActionType::Project => {
                    let template = catalog::project_template(&mission.action.title);
                    println!("Stack: {}", template.stack.join(", "));
                    for feature in &template.features {
                        println!("  - {}", feature);
                    }
                    println!("Submit your GitHub repository with `career-gps submit <url>`");
                }
                ActionType::Opportunity => {
                    for repo in catalog::open_source_repos() {
                        println!("  {} - {} ({})", repo.name, repo.description, repo.link);
                    }
                    println!("Submit your merged PR with `career-gps submit <url>`");
                }
            }
        }
        Commands::Module { index, done } => {
            let index = index.checked_sub(1).context("modules are numbered from 1")?;
            let module = app.open_module(index)?;
            println!("{} ({})", module.title, module.level.as_str());
            println!("{}", app.module_notes(index).await?);
            for resource in module.videos.iter().chain(module.docs.iter()) {
                println!("  - {}: {}", resource.title, resource.url);
            }
            if done {
                app.complete_module(index)?;
                println!("Module {} done", index + 1);
            }
        }
        Commands::Submit { link } => {
            app.submit_proof(&link)?;
            println!("Proof received. Run `career-gps complete` to verify.");
        }
        Commands::Ask { question } => {
            match app.ask_mentor(&question).await? {
                Some(answer) => println!("{}", answer),
                None => println!("Mentor is offline; your question was noted."),
            }
        }
        Commands::Complete => {
            let needs_handin = app.mission().is_some_and(|m| {
                m.action_type() == ActionType::Skill && m.phase == MissionPhase::InProgress
            });
            if needs_handin {
                app.finish_learning()?;
            }
            println!("Verifying...");
            let update = app.complete_active_mission().await?;
            println!(
                "Mission complete! +{} -> {}%",
                update.score_delta, update.analysis.score
            );
            if let Some(skill) = &update.skill {
                println!("Skill unlocked: {}", skill);
            }
            if let Some(milestone) = &update.milestone {
                println!("Badge earned: {}", milestone);
            }
            print_next_actions(&app);
        }
        Commands::Focus => {
            if app.user().is_none() {
                bail!("sign in first (`career-gps login`)");
            }
            let timer = SessionTimer::new(config.streak_threshold_secs);
            println!(
                "Focus timer running; streak awarded at {}",
                format_clock(config.streak_threshold_secs)
            );
            let (tx, mut rx) = mpsc::channel(1);
            let handle = tokio::spawn(timer.run_until_streak(tx));
            if rx.recv().await.is_some() {
                let streak = app.streak_earned()?;
                println!("Daily streak earned! {} day(s)", streak);
            }
            handle.await?;
        }
        Commands::Report => {
            let role = app.current_role()?;
            let exporter = Exporter::new(config.export_dir.clone())?;
            let path = exporter.write_report(&app.snapshot(&role)?)?;
            println!("Report saved to {}", path.display());
        }
        Commands::Share => {
            let role = app.current_role()?;
            let snapshot = app.snapshot(&role)?;
            let exporter = Exporter::new(config.export_dir.clone())?;
            println!("{}\n", exporter.share_text(&snapshot)?);
            let links = exporter.share_links(&snapshot)?;
            println!("Link:     {}", links.public_url);
            println!("WhatsApp: {}", links.whatsapp);
            println!("LinkedIn: {}", links.linkedin);
            let card = exporter.write_card(&snapshot)?;
            println!("Card:     {}", card.display());
        }
    }

    Ok(())
}

fn print_status(app: &CareerApp, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(app.session())?);
        return Ok(());
    }

    let Some(user) = app.user() else {
        println!("Not signed in. Run `career-gps login --email <email>`.");
        return Ok(());
    };
    println!("{} ({})", user.name, user.email);
    println!(
        "Streak: {} day(s) | Skills: {} | Projects: {} | Contributions: {}",
        user.streak,
        user.completed_skills.len(),
        user.completed_projects.len(),
        user.contributions
    );

    let Some(analysis) = app.analysis() else {
        println!("No analysis yet. Run `career-gps analyze --role <id>`.");
        return Ok(());
    };
    let role = app.current_role()?;
    println!(
        "Target: {} | Fit: {}% ({} insights)",
        role.title,
        analysis.score,
        app.provider_name()
    );
    println!("Skill radar:");
    for (skill, value) in analysis.radar_points() {
        println!("  {:<24} {}", skill, value);
    }
    print_next_actions(app);

    if let Some(mission) = app.mission() {
        println!("Active mission: {} ({})", mission.action.title, mission.phase.as_str());
    }
    Ok(())
}

fn print_next_actions(app: &CareerApp) {
    let Some(analysis) = app.analysis() else {
        return;
    };
    println!("Next actions:");
    for action in &analysis.next_actions {
        println!("  [{}] {}", action.action_type.as_str(), action.title);
    }
}
