use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal,
};
use tracing_subscriber::EnvFilter;

use learning_pal::auth::{AuthContext, FileSessionStore};
use learning_pal::clients::GeminiClient;
use learning_pal::progress::{average_progress, sample_subjects, Subject};
use learning_pal::session::QuizSession;
use learning_pal::syllabus::SyllabusClient;

#[derive(Parser)]
#[command(author, version, about = "MyLearningPal student companion", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    GEMINI_API_KEY    API key for quiz generation (environment or .env file)

EXAMPLES:
    pal login alex.j@student.com
    pal quiz operating systems
    pal syllabus ./syllabus.pdf --server http://localhost:8000
    pal dashboard")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in (demo credentials, nothing is verified)
    Login {
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Log out and clear the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Generate a quiz on a topic and answer it interactively
    Quiz {
        /// Topic words, e.g. `pal quiz operating systems`
        topic: Vec<String>,
    },
    /// Upload a syllabus file to the parser service and display it
    Syllabus {
        file: PathBuf,
        #[arg(long, default_value = "http://localhost:8000")]
        server: String,
    },
    /// Show enrolled subjects and module progress
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Login { email, password } => login(&email, &password),
        Command::Logout => logout(),
        Command::Whoami => whoami(),
        Command::Quiz { topic } => run_quiz(&topic.join(" ")).await,
        Command::Syllabus { file, server } => run_syllabus(&file, &server).await,
        Command::Dashboard => {
            dashboard(&sample_subjects());
            Ok(())
        }
    }
}

fn auth_context() -> Result<AuthContext<FileSessionStore>> {
    AuthContext::init(FileSessionStore::default()).context("failed to read session store")
}

fn login(email: &str, password: &str) -> Result<()> {
    let mut auth = auth_context()?;
    let user = auth.login(email, password).context("failed to save session")?;
    println!("Welcome, {}!", user.name);
    Ok(())
}

fn logout() -> Result<()> {
    auth_context()?.logout().context("failed to clear session")?;
    println!("Logged out.");
    Ok(())
}

fn whoami() -> Result<()> {
    match auth_context()?.current_user() {
        Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
        None => println!("Not logged in."),
    }
    Ok(())
}

async fn run_quiz(topic: &str) -> Result<()> {
    if topic.trim().is_empty() {
        bail!("please provide a topic, e.g. `pal quiz operating systems`");
    }

    let client = GeminiClient::from_env()?;
    println!("Generating quiz on {}...", topic.trim());

    let mut session = QuizSession::new();
    session.generate(&client, topic).await;
    if let Some(message) = session.error() {
        bail!("{message}");
    }
    let quiz = session.quiz().cloned().context("generation produced no quiz")?;

    for (i, question) in quiz.questions.iter().enumerate() {
        println!("\n{}. {}", i + 1, question.question);
        for (j, option) in question.options.iter().enumerate() {
            println!("   {}) {}", j + 1, option);
        }
        let choice = read_choice(question.options.len())?;
        session.record_answer(i, choice);
    }

    let score = session.submit().context("quiz left unanswered")?;
    println!(
        "\nYour Score: {:.1}%  ({} of {} correct)",
        score.percent, score.correct, score.total
    );
    Ok(())
}

/// Read a single option keypress (1-based digit), or 'q' to abort.
fn read_choice(options: usize) -> Result<usize> {
    print!("Answer [1-{}]: ", options);
    use std::io::Write;
    std::io::stdout().flush()?;

    terminal::enable_raw_mode()?;
    let choice = loop {
        if !event::poll(Duration::from_secs(300))? {
            break None;
        }
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => break None,
                KeyCode::Char(c) => {
                    if let Some(digit) = c.to_digit(10) {
                        let index = digit as usize;
                        if (1..=options).contains(&index) {
                            break Some(index - 1);
                        }
                    }
                }
                _ => {}
            }
        }
    };
    terminal::disable_raw_mode()?;

    match choice {
        Some(index) => {
            println!("{}", index + 1);
            Ok(index)
        }
        None => bail!("quiz aborted"),
    }
}

async fn run_syllabus(file: &PathBuf, server: &str) -> Result<()> {
    let client = SyllabusClient::new(server);
    let parsed = client.upload(file).await?;

    let syllabus = &parsed.syllabus_data;
    println!("File uploaded and parsed successfully!\n");
    println!("{}", syllabus.course_name);
    println!("Instructor: {}   Term: {}", syllabus.instructor, syllabus.term);
    if !syllabus.description.is_empty() {
        println!("\n{}", syllabus.description);
    }

    for module in &syllabus.modules {
        println!("\n[{:>3}%] {} ({})", module.progress(), module.name, module.duration);
        for topic in &module.topics {
            let mark = if topic.completed { 'x' } else { ' ' };
            println!("   [{}] {}", mark, topic.name);
        }
        if !module.resources.is_empty() {
            println!("   Resources: {}", module.resources.join(", "));
        }
    }

    println!("\nPrerequisites: {}", syllabus.prerequisites);
    println!("Objectives: {}", syllabus.objectives);
    Ok(())
}

fn dashboard(subjects: &[Subject]) {
    println!("Current Progress\n");
    for subject in subjects {
        let percent = subject.progress();
        println!("{}  {}%", subject.name, percent);
        println!("{}", bar(percent));
        println!("Next: {}   {}", subject.next_topic, subject.next_session);
        for module in &subject.modules {
            let mark = if module.completed { 'x' } else { ' ' };
            println!("   [{}] {}", mark, module.name);
        }
        println!();
    }
    println!("Subjects: {}   Avg. Progress: {}%", subjects.len(), average_progress(subjects));
}

fn bar(percent: u32) -> String {
    let filled = (percent as usize * 20) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}
