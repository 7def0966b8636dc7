//! Static Reference Data
//!
//! Career roles, per-role skill curricula, the learning-module knowledge
//! base, curated open-source repositories and project templates. Nothing
//! here is persisted; everything is rebuilt on demand.

use super::types::{ActionItem, ActionType, CareerRole};
use serde::{Deserialize, Serialize};

/// Role whose curriculum is used when the active role has none
pub const DEFAULT_ROLE_ID: &str = "web-dev";

/// Knowledge-base key used when a mission title has no modules of its own
pub const DEFAULT_MODULE_KEY: &str = "TypeScript";

// ============================================================
// CAREER ROLES
// ============================================================

pub fn career_roles() -> Vec<CareerRole> {
    vec![
        role(
            "web-dev",
            "Full Stack Web Developer",
            "Build modern web applications using React, Node.js, and Databases.",
            &["React", "TypeScript", "Node.js", "PostgreSQL", "Tailwind CSS", "Git", "REST APIs"],
        ),
        role(
            "data-analyst",
            "Data Analyst",
            "Transform raw data into meaningful insights using statistical tools.",
            &["Python", "SQL", "Tableau", "Pandas", "Excel", "Statistics", "PowerBI"],
        ),
        role(
            "ai-ml",
            "AI/ML Engineer",
            "Design and implement machine learning models and AI systems.",
            &["Python", "PyTorch", "Linear Algebra", "Scikit-learn", "NLP", "Computer Vision", "Deep Learning"],
        ),
        role(
            "devops",
            "DevOps Engineer",
            "Bridge the gap between development and operations with automation.",
            &["Docker", "Kubernetes", "AWS", "CI/CD", "Linux", "Terraform", "Shell Scripting"],
        ),
    ]
}

pub fn find_role(role_id: &str) -> Option<CareerRole> {
    career_roles().into_iter().find(|r| r.id == role_id)
}

fn role(id: &str, title: &str, description: &str, skills: &[&str]) -> CareerRole {
    CareerRole {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        required_skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

// ============================================================
// SKILL CURRICULA
// ============================================================

/// One step of a role's curriculum: the mission and the skill it teaches
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumEntry {
    /// Name used in matched/missing skill lists
    pub skill: String,
    pub action: ActionItem,
}

impl CurriculumEntry {
    fn new(skill: &str, title: &str, description: &str, outcome: &str) -> Self {
        Self {
            skill: skill.to_string(),
            action: ActionItem::new(ActionType::Skill, title, description).with_outcome(outcome),
        }
    }

    fn with_details(mut self, details: &str) -> Self {
        self.action = self.action.with_details(details);
        self
    }
}

/// Ordered skill missions for a role, `None` for unknown roles
pub fn curriculum(role_id: &str) -> Option<Vec<CurriculumEntry>> {
    let entries = match role_id {
        "web-dev" => vec![
            CurriculumEntry::new(
                "TypeScript",
                "Master TypeScript with React",
                "Learn type-safe development for enterprise apps.",
                "Ability to build scalable frontend apps.",
            )
            .with_details("Focus on Generics and Hooks."),
            CurriculumEntry::new(
                "Node.js",
                "Node.js & Express Backend Development",
                "Learn server-side development, APIs, middleware, and backend architecture.",
                "Build robust and secure backend services.",
            )
            .with_details("Master Express.js and JWT Auth."),
            CurriculumEntry::new(
                "PostgreSQL",
                "Database Design with PostgreSQL",
                "Master relational data modeling, indexing, and complex SQL queries.",
                "Handle complex data persistent layers for scale.",
            )
            .with_details("Learn normalization and Joins."),
            CurriculumEntry::new(
                "REST APIs",
                "RESTful API Design & Security",
                "Advanced concepts in building secure, documented, and scalable APIs.",
                "Industry-standard API architecture.",
            )
            .with_details("OAuth2 and Swagger integration."),
        ],
        "data-analyst" => vec![
            CurriculumEntry::new(
                "Python",
                "Python for Data Science",
                "Master NumPy and Pandas for data manipulation.",
                "Clean and process raw data effectively.",
            ),
            CurriculumEntry::new(
                "SQL",
                "SQL Mastery for Analytics",
                "Advanced queries, aggregations, and window functions.",
                "Extract insights from relational databases.",
            ),
            CurriculumEntry::new(
                "Tableau",
                "Data Visualization with Tableau",
                "Create interactive dashboards and storyboards.",
                "Communicate data insights to stakeholders.",
            ),
        ],
        "ai-ml" => vec![
            CurriculumEntry::new(
                "Linear Algebra",
                "Linear Algebra & Calculus for ML",
                "The mathematical foundations of machine learning.",
                "Understand how models work under the hood.",
            ),
            CurriculumEntry::new(
                "Scikit-learn",
                "Machine Learning with Scikit-learn",
                "Supervised and unsupervised learning algorithms.",
                "Build and evaluate predictive models.",
            ),
            CurriculumEntry::new(
                "PyTorch",
                "Deep Learning with PyTorch",
                "Neural networks, CNNs, and RNNs.",
                "Implement cutting-edge AI architectures.",
            ),
        ],
        "devops" => vec![
            CurriculumEntry::new(
                "Linux",
                "Linux Systems Administration",
                "Master the command line and server management.",
                "Manage cloud infrastructure effectively.",
            ),
            CurriculumEntry::new(
                "Docker",
                "Docker & Containerization",
                "Package applications for consistent deployment.",
                "Build portable development environments.",
            ),
            CurriculumEntry::new(
                "CI/CD",
                "CI/CD Pipeline Automation",
                "Automate testing and deployment with GitHub Actions.",
                "High-velocity delivery cycles.",
            ),
        ],
        _ => return None,
    };
    Some(entries)
}

/// Curriculum for the role, or the default role's curriculum
pub fn curriculum_or_default(role_id: &str) -> Vec<CurriculumEntry> {
    curriculum(role_id)
        .or_else(|| curriculum(DEFAULT_ROLE_ID))
        .unwrap_or_default()
}

/// Skill name taught by a mission title.
///
/// Titles found in any curriculum map to that entry's skill; anything else
/// is taken to be a skill name already.
pub fn skill_for_title(title: &str) -> String {
    career_roles()
        .iter()
        .filter_map(|r| curriculum(&r.id))
        .flatten()
        .find(|e| e.action.title == title)
        .map(|e| e.skill)
        .unwrap_or_else(|| title.to_string())
}

// ============================================================
// KNOWLEDGE BASE
// ============================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModuleLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ModuleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleLevel::Beginner => "Beginner",
            ModuleLevel::Intermediate => "Intermediate",
            ModuleLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

/// One learning module of a skill mission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillModule {
    pub title: String,
    pub level: ModuleLevel,
    pub notes: String,
    pub videos: Vec<Resource>,
    pub docs: Vec<Resource>,
}

fn module(
    title: &str,
    level: ModuleLevel,
    notes: &str,
    videos: &[(&str, &str)],
    docs: &[(&str, &str)],
) -> SkillModule {
    let to_resources = |items: &[(&str, &str)]| -> Vec<Resource> {
        items
            .iter()
            .map(|(t, u)| Resource { title: t.to_string(), url: u.to_string() })
            .collect()
    };
    SkillModule {
        title: title.to_string(),
        level,
        notes: notes.to_string(),
        videos: to_resources(videos),
        docs: to_resources(docs),
    }
}

/// Modules for a knowledge-base key, resolving title aliases
fn knowledge_base(key: &str) -> Option<Vec<SkillModule>> {
    use ModuleLevel::*;

    let key = match key {
        "Master TypeScript with React" => "TypeScript",
        "React Deep Dive" => "React",
        other => other,
    };

    let modules = match key {
        "TypeScript" => vec![
            module(
                "Basics of TypeScript with React",
                Beginner,
                "TypeScript is a strongly typed superset of JavaScript. In React, it helps define props, state, and event types to catch errors at compile-time rather than runtime. This fundamental level covers interfaces, types, and the basic configuration required to run TS in a React environment.",
                &[("TypeScript for React Beginners", "https://www.youtube.com/watch?v=jrKcJxF0lAU")],
                &[
                    ("TypeScript Handbook", "https://www.typescriptlang.org/docs/"),
                    ("React + TS Cheatsheet", "https://react-typescript-cheatsheet.netlify.app/"),
                ],
            ),
            module(
                "Intermediate TypeScript Patterns",
                Intermediate,
                "Focus on Generics, Union Types, and Type Guards. Learn how to type complex hooks like useReducer and custom context providers. Intermediate patterns allow you to write reusable components that maintain strict type safety across different data structures.",
                &[("Advanced TS Patterns in React", "https://www.youtube.com/watch?v=Z5iWr6Srsj8")],
                &[("Advanced Types", "https://www.typescriptlang.org/docs/handbook/2/types-from-types.html")],
            ),
            module(
                "Advanced Implementation",
                Advanced,
                "Master utility types (Partial, Omit, Pick) and conditional types. Learn to optimize React performance with memoization and strictly typed refs. At this level, you should be able to type external libraries and handle high-level architecture decisions using advanced TS features.",
                &[("Optimizing React with TS", "https://www.youtube.com/watch?v=9tZkX2R2QzA")],
                &[("React Render & Commit", "https://react.dev/learn/render-and-commit")],
            ),
        ],
        "Node.js & Express Backend Development" => vec![
            module(
                "Node.js Runtime & Express.js Setup",
                Beginner,
                "Understand the Node.js event loop and how to set up a basic Express.js server. Learn about routing and handling HTTP requests and responses.",
                &[("Express.js Fast Track", "https://www.youtube.com/watch?v=L72fhGm1tfE")],
                &[("Express Getting Started", "https://expressjs.com/en/starter/installing.html")],
            ),
            module(
                "Middleware & Request Pipeline",
                Intermediate,
                "Learn how to use built-in and third-party middleware for logging, parsing JSON, and handling errors. Master custom middleware creation for logic like authentication checks.",
                &[("Middleware Masterclass", "https://www.youtube.com/watch?v=lY6icfhap2o")],
                &[("Using Middleware", "https://expressjs.com/en/guide/using-middleware.html")],
            ),
            module(
                "Scalable Architecture & Authentication",
                Advanced,
                "Structure your backend for scale using MVC or clean architecture patterns. Implement secure authentication using JWT (JSON Web Tokens).",
                &[("Clean Architecture in Node", "https://www.youtube.com/watch?v=CnailTcJV_U")],
                &[("JWT Introduction", "https://jwt.io/introduction/")],
            ),
        ],
        "Database Design with PostgreSQL" => vec![
            module(
                "Introduction to RDBMS & SQL Basics",
                Beginner,
                "Learn about relational databases and basic SQL commands: SELECT, INSERT, UPDATE, DELETE. Set up a local PostgreSQL instance.",
                &[("SQL for Beginners", "https://www.youtube.com/watch?v=HXV3zeQKqGY")],
                &[("PostgreSQL Tutorial", "https://www.postgresqltutorial.com/")],
            ),
            module(
                "Data Modeling & Relationships",
                Intermediate,
                "Master table relationships: One-to-One, One-to-Many, and Many-to-Many. Learn about Primary Keys and Foreign Keys.",
                &[("Database Normalization", "https://www.youtube.com/watch?v=076p_G_hndI")],
                &[("Database Design Guide", "https://www.ntu.edu.sg/home/ehchua/programming/sql/Relational_Database_Design.html")],
            ),
            module(
                "Indexing, Performance & Transactions",
                Advanced,
                "Optimize your database for speed with indexes. Learn about ACID properties and handling database transactions.",
                &[("Postgres Indexing Deep Dive", "https://www.youtube.com/watch?v=ni-T6u6FpXo")],
                &[("PostgreSQL Indexing", "https://www.postgresql.org/docs/current/indexes.html")],
            ),
        ],
        "React" => vec![
            module(
                "React Fundamentals",
                Beginner,
                "Components, Props, and State are the building blocks. Learn the 'Thinking in React' philosophy and how data flows through a component tree.",
                &[("React Crash Course", "https://www.youtube.com/watch?v=w7ejDZ8SWv8")],
                &[("React.dev Intro", "https://react.dev/learn")],
            ),
            module(
                "Hooks & State Management",
                Intermediate,
                "useEffect, useContext, and custom hooks. Avoid common pitfalls like infinite render loops and learn how to lift state effectively.",
                &[("React Hooks Explained", "https://www.youtube.com/watch?v=LlvBzyy-558")],
                &[("Built-in React Hooks", "https://react.dev/reference/react")],
            ),
            module(
                "Advanced Design Patterns",
                Advanced,
                "Higher Order Components (HOCs), Render Props, and the Compound Component pattern for building scalable UI libraries.",
                &[("Modern React Patterns", "https://www.youtube.com/watch?v=V-G7WZzT7NM")],
                &[("Scaling React Apps", "https://react.dev/learn/scaling-up-with-reducer-and-context")],
            ),
        ],
        _ => return None,
    };
    Some(modules)
}

/// Learning modules for a skill mission; unknown titles get the default set
pub fn modules_for(title: &str) -> Vec<SkillModule> {
    knowledge_base(title)
        .or_else(|| knowledge_base(DEFAULT_MODULE_KEY))
        .unwrap_or_default()
}

// ============================================================
// OPEN SOURCE & PROJECTS
// ============================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OpenSourceRepo {
    pub name: String,
    pub description: String,
    pub link: String,
    pub tags: Vec<String>,
}

pub fn open_source_repos() -> Vec<OpenSourceRepo> {
    let repo = |name: &str, description: &str, link: &str, tags: &[&str]| OpenSourceRepo {
        name: name.to_string(),
        description: description.to_string(),
        link: link.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    };
    vec![
        repo(
            "React Hook Form",
            "Performant, flexible and extensible forms with easy-to-use validation.",
            "https://github.com/react-hook-form/react-hook-form",
            &["React", "TypeScript", "Beginner Friendly"],
        ),
        repo(
            "Supabase",
            "The open source Firebase alternative. Great for learning PostgreSQL and Auth.",
            "https://github.com/supabase/supabase",
            &["PostgreSQL", "Go", "TypeScript"],
        ),
        repo(
            "FreeCodeCamp",
            "The massive open source codebase and curriculum. Excellent for first-time contributors.",
            "https://github.com/freeCodeCamp/freeCodeCamp",
            &["JavaScript", "Education", "Node.js"],
        ),
        repo(
            "Tailwind UI",
            "Explore headless UI components and learn advanced CSS architecture.",
            "https://github.com/tailwindlabs/headlessui",
            &["React", "CSS", "UI/UX"],
        ),
    ]
}

/// Stack and feature checklist shown in a project mission briefing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectTemplate {
    pub stack: Vec<String>,
    pub features: Vec<String>,
}

pub fn project_template(title: &str) -> ProjectTemplate {
    let (stack, features) = match title {
        "Full-Stack Inventory Manager" => (
            vec!["React", "Node.js", "PostgreSQL", "Tailwind"],
            vec!["CRUD Operations", "Dashboard Visualization", "JWT Authentication", "CSV Export"],
        ),
        "AI Resume Parser" => (
            vec!["Python", "Flask", "Gemini API", "React"],
            vec!["File Upload", "Skill Extraction", "PDF Generation", "Match Scoring"],
        ),
        _ => (vec!["React", "Node.js"], vec!["Core logic", "User interface"]),
    };
    ProjectTemplate {
        stack: stack.iter().map(|s| s.to_string()).collect(),
        features: features.iter().map(|s| s.to_string()).collect(),
    }
}
