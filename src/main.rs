use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use pathwise::api::{ApiClient, ApiError};
use pathwise::api::models::{
    LoginRequest, RegisterRequest, ResourceRequest, RoadmapRequest, STRUCTURED_LEARNING,
};
use pathwise::app::input::{SecretInput, secret_input_key};
use pathwise::app::state::QuizState;
use pathwise::model::{
    KnowledgeLevel, LoginForm, RegistrationForm, StudyPlanLength, Topic, duration, quiz,
    validation,
};
use pathwise::progress::{
    LearningBadge, format_study_time, learning_stats, overall_stats, quiz_marks, quiz_progress,
};
use pathwise::quiz::{QuizSession, load_questions};
use pathwise::reader::platforms::course_links;
use pathwise::reader::{ChapterContext, ReaderSession, generate_chapters};
use pathwise::store::{FileStore, Repository, UserIdentity};
use pathwise::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pathwise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use this store file instead of the one in the data directory
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Override the backend URL from the config
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a roadmap for a new topic
    New {
        topic: String,
        /// Study plan length, e.g. "4 Weeks" or "2 Months"
        #[arg(short, long, default_value = "4 Weeks")]
        time: String,
        /// Current knowledge: absolute, beginner, moderate, expert
        #[arg(short, long, default_value = "beginner")]
        level: KnowledgeLevel,
    },
    /// List enrolled topics with progress
    Topics,
    /// Show a topic's roadmap
    Roadmap { topic: String },
    /// Rate how hard the material feels (1 = too easy, 10 = too hard)
    Rate { rating: i64 },
    /// Take the quiz for a subtopic
    Quiz { topic: String, week: u32, subtopic: u32 },
    /// Read the chapters of a subtopic
    Learn {
        topic: String,
        week: u32,
        subtopic: u32,
        /// Skip content generation and read the chapter outline only
        #[arg(long)]
        offline: bool,
    },
    /// Show learning statistics and quiz marks
    Stats,
    /// Delete a topic and everything recorded for it
    Delete { topic: String },
    /// Course platform search links for a subtopic
    Links { subtopic: String },
    /// Create an account
    Register { name: String, email: String },
    /// Sign in
    Login { email: String },
    /// Sign out
    Logout,
    /// Show the signed-in user's profile
    Profile,
    /// Switch to the next avatar style
    Avatar,
    /// Administration
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// List users with learning totals
    Users,
    /// Export every user record as JSON
    Export {
        /// Output file (default users_export_<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(api) = cli.api {
        config.api_base_url = api;
    }
    let data_dir = Config::data_dir()?;
    init_logging(&data_dir)?;

    let store_path = cli.store.unwrap_or_else(|| data_dir.join(FileStore::FILE_NAME));
    let store = FileStore::open(&store_path)
        .with_context(|| format!("Failed to open store at {:?}", store_path))?;
    let mut repo = Repository::new(store);
    let client = ApiClient::new(&config.api_base_url)?;

    match cli.command {
        Commands::New { topic, time, level } => new_topic(&mut repo, &client, &topic, &time, level).await,
        Commands::Topics => list_topics(&repo),
        Commands::Roadmap { topic } => show_roadmap(&repo, &topic),
        Commands::Rate { rating } => {
            let index = repo.rate_hardness(rating, &config.hardness_bounds)?;
            println!("Hardness index is now {:.2}", index.value());
            Ok(())
        }
        Commands::Quiz { topic, week, subtopic } => {
            take_quiz(config, repo, &client, &topic, week, subtopic).await
        }
        Commands::Learn { topic, week, subtopic, offline } => {
            learn(config, repo, &client, &topic, week, subtopic, offline).await
        }
        Commands::Stats => show_stats(&repo),
        Commands::Delete { topic } => {
            if repo.delete_topic(&topic)? {
                println!("Deleted '{}' and all of its progress", topic);
            } else {
                println!("No topic named '{}'", topic);
            }
            Ok(())
        }
        Commands::Links { subtopic } => {
            for (platform, url) in course_links(&subtopic) {
                println!("{:<14} {}\n               {}", platform.name, platform.description, url);
            }
            Ok(())
        }
        Commands::Register { name, email } => register(&mut repo, &client, name, email).await,
        Commands::Login { email } => login(&mut repo, &client, email).await,
        Commands::Logout => {
            repo.logout()?;
            println!("Signed out");
            Ok(())
        }
        Commands::Profile => profile(&repo, &client).await,
        Commands::Avatar => {
            let style = repo.cycle_avatar_style()?;
            println!("Avatar style {}", style + 1);
            Ok(())
        }
        Commands::Admin { command } => admin(&client, command).await,
    }
}

/// Log to a file in the data directory; the TUI owns the terminal
fn init_logging(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    let log_path = data_dir.join("pathwise.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathwise=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

/// Wrap a backend failure with a hint on what the user can do about it
fn backend_error(err: ApiError, action: &str) -> anyhow::Error {
    let hint = if err.is_unauthorized() {
        Some("check your email and password")
    } else if err.is_recoverable() {
        Some("the backend may be unavailable, try again shortly")
    } else {
        None
    };
    match hint {
        Some(hint) => anyhow::Error::new(err).context(format!("{} ({})", action, hint)),
        None => anyhow::Error::new(err).context(action.to_string()),
    }
}

/// Prompt for a password without echoing it
fn prompt_password(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    enable_raw_mode().context("Failed to switch the terminal to raw mode")?;
    let result = read_secret();
    let restored = disable_raw_mode();
    println!();
    restored.context("Failed to restore the terminal")?;
    result
}

fn read_secret() -> Result<String> {
    let mut buffer = String::new();
    loop {
        if let Event::Key(key) = event::read().context("Failed to read input")? {
            match secret_input_key(&mut buffer, key) {
                SecretInput::Pending => {}
                SecretInput::Submit => return Ok(buffer),
                SecretInput::Cancel => bail!("Cancelled"),
            }
        }
    }
}

async fn new_topic(
    repo: &mut Repository<FileStore>,
    client: &ApiClient,
    topic: &str,
    time: &str,
    level: KnowledgeLevel,
) -> Result<()> {
    let topic = validation::validate_topic_name(topic)?;
    let plan = StudyPlanLength::parse(time)?;
    if repo.is_enrolled(topic)? {
        bail!("You are already enrolled in '{}'. Delete it first to start over", topic);
    }

    println!("Generating a {} roadmap for {} ({})...", plan.label(), topic, level);
    let request = RoadmapRequest { topic: topic.to_string(), time: plan.label(), knowledge_level: level };
    let roadmap = client.roadmap(&request).await.map_err(|e| backend_error(e, "Failed to generate roadmap"))?;
    if roadmap.is_empty() {
        bail!("The backend returned an empty roadmap for '{}'", topic);
    }

    let subtopics = roadmap.subtopic_count();
    let weeks = roadmap.week_count();
    repo.enroll(topic, Topic { time: plan.label(), knowledge_level: level }, roadmap)?;
    tracing::info!(topic, weeks, subtopics, "Enrolled in topic");
    println!("Enrolled in '{}': {} weeks, {} subtopics", topic, weeks, subtopics);
    Ok(())
}

fn list_topics(repo: &Repository<FileStore>) -> Result<()> {
    let topics = repo.topics()?;
    if topics.is_empty() {
        println!("No topics yet. Start one with `pathwise new <topic>`");
        return Ok(());
    }

    let roadmaps = repo.roadmaps()?;
    let quizzes = quiz_progress(&roadmaps, &repo.quiz_stats()?);
    let learning = learning_stats(&roadmaps, repo)?;

    for (name, topic) in &topics {
        let quiz_pct = quizzes.get(name).map_or(0.0, |p| p.percentage());
        let read_pct = learning.get(name).map_or(0.0, |s| s.completion_percentage);
        println!(
            "{:<24} {:<10} {:<18} quizzes {:>5.1}%  chapters {:>5.1}%",
            name, topic.time, topic.knowledge_level, quiz_pct, read_pct
        );
    }
    Ok(())
}

fn show_roadmap(repo: &Repository<FileStore>, topic: &str) -> Result<()> {
    let roadmap = repo.roadmap(topic)?.with_context(|| format!("No roadmap for '{}'", topic))?;
    let hardness = repo.hardness_index()?;
    let stats = repo.quiz_stats()?;

    for (week_no, (label, week)) in roadmap.weeks().into_iter().enumerate() {
        let week_no = week_no as u32 + 1;
        println!("{}: {}", label, week.topic);
        for (i, sub) in week.subtopics.iter().enumerate() {
            let number = i as u32 + 1;
            let mark = match quiz::lookup(&stats, topic, week_no, number) {
                Some(record) => format!("quiz {}/{}", record.num_correct, record.num_ques),
                None => "no quiz yet".to_string(),
            };
            println!(
                "  {}.{} {:<40} {:>12}  {}",
                week_no,
                number,
                sub.subtopic,
                hardness.displayed_duration(&sub.time),
                mark
            );
        }
    }
    println!("Hardness index {:.2}", hardness.value());
    Ok(())
}

async fn take_quiz(
    config: Config,
    mut repo: Repository<FileStore>,
    client: &ApiClient,
    topic: &str,
    week: u32,
    subtopic: u32,
) -> Result<()> {
    let roadmap = repo.roadmap(topic)?.with_context(|| format!("No roadmap for '{}'", topic))?;
    let position = roadmap
        .subtopic(week, subtopic)
        .with_context(|| format!("Week {} has no subtopic {}", week, subtopic))?;
    let (name, description) = (position.subtopic.subtopic.clone(), position.subtopic.description.clone());

    let stats = repo.quiz_stats()?;
    let mut roadmaps = repo.roadmaps()?;
    roadmaps.retain(|t, _| t.as_str() == topic);
    let previous = quiz_marks(&roadmaps, &stats)
        .into_iter()
        .find(|m| m.week == week && m.subtopic_number == subtopic);
    if let Some(mark) = &previous {
        if !mark.can_retake(Utc::now()) {
            let at = mark.retake_at().map(|t| t.to_rfc2822()).unwrap_or_default();
            bail!("You scored {:.0}% on this quiz. You can retake it after {}", mark.percentage, at);
        }
    }

    println!("Loading quiz for {}...", name);
    let questions = load_questions(&mut repo, client, topic, week, subtopic).await?;
    let mut state = QuizState::new(topic, week, subtopic, name, description, QuizSession::start(questions));
    state.previous = quiz::lookup(&stats, topic, week, subtopic).cloned();

    let mut app = App::quiz(config, repo, state)?;
    app.run().await
}

async fn learn(
    config: Config,
    repo: Repository<FileStore>,
    client: &ApiClient,
    topic: &str,
    week: u32,
    subtopic: u32,
    offline: bool,
) -> Result<()> {
    let details = repo.topic(topic)?.with_context(|| format!("Not enrolled in '{}'", topic))?;
    let roadmap = repo.roadmap(topic)?.with_context(|| format!("No roadmap for '{}'", topic))?;
    let position = roadmap
        .subtopic(week, subtopic)
        .with_context(|| format!("Week {} has no subtopic {}", week, subtopic))?;
    let sub = position.subtopic;

    let content = if offline {
        None
    } else {
        println!("Generating content for {}...", sub.subtopic);
        let request = ResourceRequest {
            subtopic: sub.subtopic.clone(),
            description: sub.description.clone(),
            time: sub.time.clone(),
            course: topic.to_string(),
            knowledge_level: details.knowledge_level,
            request_type: STRUCTURED_LEARNING.to_string(),
            time_in_minutes: duration::minutes(&sub.time),
        };
        match client.generate_resource(&request).await {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!("Content generation failed: {}", e);
                eprintln!("Could not generate content ({}). Showing the chapter outline.", e);
                None
            }
        }
    };

    let ctx = ChapterContext { subtopic: &sub.subtopic, time: &sub.time, course: topic };
    let chapters = generate_chapters(&ctx, content.as_ref());
    let session = ReaderSession::load(&repo, topic, &sub.subtopic, chapters, config.autosave_delay())?;

    let mut app = App::reader(config, repo, session)?;
    app.run().await
}

fn show_stats(repo: &Repository<FileStore>) -> Result<()> {
    if let Some(user) = repo.current_user()? {
        println!("{} <{}>  avatar style {}", user.name, user.email, repo.avatar_style()? + 1);
    }

    let roadmaps = repo.roadmaps()?;
    let stats = repo.quiz_stats()?;
    let learning = learning_stats(&roadmaps, repo)?;
    let overall = overall_stats(&learning);
    let badge = LearningBadge::for_learner(overall.total_courses, overall.total_study_time);

    println!("\n{} · {}", badge, badge.description());
    println!(
        "{} courses · {}/{} subtopics · {}/{} chapters · {:.1}% complete · studied {}",
        overall.total_courses,
        overall.completed_subtopics,
        overall.total_subtopics,
        overall.completed_chapters,
        overall.total_chapters,
        overall.overall_completion_percentage,
        format_study_time(overall.total_study_time)
    );

    println!("\nQuiz progress");
    for (topic, progress) in quiz_progress(&roadmaps, &stats) {
        println!("  {:<24} {:>5.1}%  ({}/{} time units)", topic, progress.percentage(), progress.completed, progress.total);
    }

    println!("\nLearning");
    for (topic, s) in &learning {
        println!(
            "  {:<24} {:>5.1}%  {} notes  {} bookmarks  {}",
            topic,
            s.completion_percentage,
            s.total_notes,
            s.total_bookmarks,
            format_study_time(s.total_study_time)
        );
    }

    let marks = quiz_marks(&roadmaps, &stats);
    if !marks.is_empty() {
        println!("\nQuiz marks");
        let now = Utc::now();
        for mark in marks {
            let status = if mark.passed() { "passed" } else { "failed" };
            let retake = if mark.can_retake(now) { "" } else { "  (retake locked)" };
            println!(
                "  {} {}.{} {:<32} {}/{} {:>5.1}% {:>6} {}{}",
                mark.topic,
                mark.week,
                mark.subtopic_number,
                mark.subtopic,
                mark.num_correct,
                mark.num_ques,
                mark.percentage,
                format_study_time(mark.time_taken_secs),
                status,
                retake
            );
        }
    }

    println!("\nHardness index {:.2}", repo.hardness_index()?.value());
    Ok(())
}

async fn register(
    repo: &mut Repository<FileStore>,
    client: &ApiClient,
    name: String,
    email: String,
) -> Result<()> {
    let form = RegistrationForm {
        name,
        email,
        password: prompt_password("Password")?,
        confirm_password: prompt_password("Confirm password")?,
    };
    form.validate()?;

    let request = RegisterRequest { name: form.name, email: form.email, password: form.password };
    let response = client.register(&request).await.map_err(|e| backend_error(e, "Registration failed"))?;
    repo.login_user(&UserIdentity { email: response.user.email.clone(), name: response.user.name.clone() })?;
    println!("{}", response.message.as_deref().unwrap_or("Registered"));
    Ok(())
}

async fn login(repo: &mut Repository<FileStore>, client: &ApiClient, email: String) -> Result<()> {
    let form = LoginForm { email, password: prompt_password("Password")? };
    form.validate()?;

    let request = LoginRequest { email: form.email, password: form.password };
    let response = client.login(&request).await.map_err(|e| backend_error(e, "Login failed"))?;
    repo.login_user(&UserIdentity { email: response.user.email.clone(), name: response.user.name.clone() })?;
    println!("Signed in as {}", response.user.name);
    Ok(())
}

async fn profile(repo: &Repository<FileStore>, client: &ApiClient) -> Result<()> {
    let user = repo.current_user()?.context("Not signed in. Use `pathwise login <email>`")?;
    let response = client.profile(&user.email).await.map_err(|e| backend_error(e, "Failed to load profile"))?;
    let p = &response.profile;

    println!("{} <{}>", response.name.as_deref().unwrap_or(&user.name), user.email);
    println!("Learning hours:    {:.1}", p.learning_hours);
    println!("Courses completed: {}", p.courses_completed);
    if !p.achievements.is_empty() {
        println!("Achievements:      {}", p.achievements.join(", "));
    }
    Ok(())
}

async fn admin(client: &ApiClient, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Users => {
            let response = client.admin_users().await.map_err(|e| backend_error(e, "Failed to load users"))?;
            let s = &response.summary;
            println!(
                "{} users · {:.1} learning hours · {} courses completed · {} achievements",
                response.total_users, s.total_learning_hours, s.total_courses_completed, s.total_achievements
            );
            for user in &response.users {
                println!(
                    "  {:<32} {:<20} {:>6.1}h {:>3} courses {:>3} achievements",
                    user.email, user.name, user.learning_hours, user.courses_completed, user.achievements
                );
            }
        }
        AdminCommand::Export { output } => {
            let export = client.admin_export().await.map_err(|e| backend_error(e, "Failed to export users"))?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(format!("users_export_{}.json", Utc::now().format("%Y-%m-%d")))
            });
            let contents = serde_json::to_string_pretty(&export)?;
            fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
            println!("Exported users to {}", path.display());
        }
    }
    Ok(())
}
