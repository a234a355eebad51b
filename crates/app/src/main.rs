use std::fmt;

use plan_core::model::{CourseId, CourseState, ProgressDraft};
use plan_core::{Clock, DerivedState};
use services::{AppServices, CurriculumView};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    MissingEmail,
    MissingCourse,
    InvalidCourseId { raw: String },
    InvalidState { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidRetakeSpec { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingEmail => write!(f, "--email (or PLAN_EMAIL) is required"),
            ArgsError::MissingCourse => write!(f, "--course is required"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course value: {raw}"),
            ArgsError::InvalidState { raw } => {
                write!(f, "invalid --state value: {raw} (expected in_progress or passed)")
            }
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidRetakeSpec { raw } => {
                write!(f, "invalid --retake value: {raw} (expected ATTEMPT=GRADE)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- view   [--db <sqlite_url>] --email <email> [--json]");
    eprintln!("  cargo run -p app -- save   [--db <sqlite_url>] --email <email> \\");
    eprintln!("                             --course <id> --state <in_progress|passed> \\");
    eprintln!("                             [--grade <6-10>] [--retakes <0-3>] [--retake N=G ...]");
    eprintln!("  cargo run -p app -- delete [--db <sqlite_url>] --email <email> --course <id>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:plan.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PLAN_DB_URL, PLAN_EMAIL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    View,
    Save,
    Delete,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "view" => Some(Self::View),
            "save" => Some(Self::Save),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    email: String,
    json: bool,
    course: Option<CourseId>,
    state: CourseState,
    grade: Option<f64>,
    retakes: Option<u8>,
    retake_grades: Vec<(u8, f64)>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PLAN_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://plan.sqlite3".into(), normalize_sqlite_url);
        let mut email = std::env::var("PLAN_EMAIL").ok();
        let mut json = false;
        let mut course = None;
        let mut state = CourseState::Passed;
        let mut grade = None;
        let mut retakes = None;
        let mut retake_grades = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--email" => {
                    email = Some(require_value(args, "--email")?);
                }
                "--json" => json = true,
                "--course" => {
                    let value = require_value(args, "--course")?;
                    course = Some(
                        value
                            .parse()
                            .map_err(|_| ArgsError::InvalidCourseId { raw: value })?,
                    );
                }
                "--state" => {
                    let value = require_value(args, "--state")?;
                    state = match value.as_str() {
                        "in_progress" => CourseState::InProgress,
                        "passed" => CourseState::Passed,
                        _ => return Err(ArgsError::InvalidState { raw: value }),
                    };
                }
                "--grade" => {
                    let value = require_value(args, "--grade")?;
                    grade = Some(value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--grade",
                        raw: value,
                    })?);
                }
                "--retakes" => {
                    let value = require_value(args, "--retakes")?;
                    retakes = Some(value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--retakes",
                        raw: value,
                    })?);
                }
                "--retake" => {
                    let value = require_value(args, "--retake")?;
                    retake_grades.push(parse_retake_spec(&value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            email: email.ok_or(ArgsError::MissingEmail)?,
            json,
            course,
            state,
            grade,
            retakes,
            retake_grades,
        })
    }
}

fn parse_retake_spec(raw: &str) -> Result<(u8, f64), ArgsError> {
    let invalid = || ArgsError::InvalidRetakeSpec {
        raw: raw.to_string(),
    };
    let (attempt, grade) = raw.split_once('=').ok_or_else(invalid)?;
    let attempt: u8 = attempt.parse().map_err(|_| invalid())?;
    let grade: f64 = grade.parse().map_err(|_| invalid())?;
    Ok((attempt, grade))
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn state_label(state: DerivedState) -> &'static str {
    match state {
        DerivedState::Locked => "locked",
        DerivedState::Available => "available",
        DerivedState::InProgress => "in progress",
        DerivedState::Passed => "passed",
    }
}

fn render_view(view: &CurriculumView) {
    let mut current_level = 0;
    for node in &view.nodes {
        if node.level != current_level {
            current_level = node.level;
            println!("Level {current_level}");
        }

        let mut line = format!(
            "  #{:<3} {:<45} {}",
            node.id,
            node.name,
            state_label(node.state)
        );
        if let Some(grade) = node.displayed_grade {
            line.push_str(&format!(" {grade:.2}"));
        }
        if !node.retake_badges.is_empty() {
            let badges: Vec<String> = node.retake_badges.iter().map(|g| format!("{g}")).collect();
            line.push_str(&format!("  [retakes: {}]", badges.join(", ")));
        }
        println!("{line}");
    }

    println!();
    println!(
        "average {:.2} | passed {} | retakes {}",
        view.stats.average_grade, view.stats.passed_count, view.stats.total_retakes
    );
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: show the curriculum when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::View,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::View,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so
    // core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let services = AppServices::new_sqlite(&args.db_url, Clock::default_clock()).await?;
    let user = services.login().login(&args.email).await?;

    match cmd {
        Command::View => {
            let view = services.progress().curriculum_view(user.id).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                render_view(&view);
            }
            Ok(())
        }
        Command::Save => {
            let course = args.course.ok_or(ArgsError::MissingCourse)?;
            let mut draft = ProgressDraft::new(course, args.state);
            if let Some(grade) = args.grade {
                draft = draft.with_final_grade(grade);
            }
            for (attempt, grade) in args.retake_grades {
                draft = draft.with_retake(attempt, Some(grade));
            }
            if let Some(count) = args.retakes {
                draft.retake_count = count;
            }

            let record = services.progress().save(user.id, draft).await?;
            let label = match record.state {
                CourseState::InProgress => "in progress",
                CourseState::Passed => "passed",
            };
            println!("saved course {} as {label}", record.course_id);
            Ok(())
        }
        Command::Delete => {
            let course = args.course.ok_or(ArgsError::MissingCourse)?;
            services.progress().delete(user.id, course).await?;
            println!("deleted progress for course {course}");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn parses_save_arguments() {
        let args = parse(&[
            "--email",
            "ada@example.edu",
            "--course",
            "19",
            "--state",
            "passed",
            "--grade",
            "8",
            "--retake",
            "1=3.5",
        ])
        .unwrap();
        assert_eq!(args.course, Some(CourseId::new(19)));
        assert_eq!(args.state, CourseState::Passed);
        assert_eq!(args.grade, Some(8.0));
        assert_eq!(args.retake_grades, vec![(1, 3.5)]);
    }

    #[test]
    fn rejects_unknown_state() {
        let err = parse(&["--email", "a@b.c", "--state", "APROBADA"]).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidState { .. }));
    }

    #[test]
    fn rejects_malformed_retake_spec() {
        let err = parse(&["--email", "a@b.c", "--retake", "one=3"]).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidRetakeSpec { .. }));
    }

    #[test]
    fn normalizes_bare_paths_to_sqlite_urls() {
        assert_eq!(
            normalize_sqlite_url("sqlite::memory:".into()),
            "sqlite::memory:"
        );
        assert!(normalize_sqlite_url("plan.sqlite3".into()).starts_with("sqlite://"));
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/plan.sqlite3".into()),
            "sqlite:///tmp/plan.sqlite3"
        );
    }
}
