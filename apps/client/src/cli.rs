//! Terminal front end for the client core.
//!
//! Subcommands:
//! - `login` / `register` / `logout` / `status` - session management
//! - `profile show` / `profile edit` - view and change the bot profile
//! - `bot run` / `bot email` / `bot download` - dashboard actions
//! - `jobs applied` / `jobs recommended` - job lists
//! - `admin users` - registered users (superusers only)

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::dispatch::dashboard::{BotStatus, ReportFormat};
use crate::models::job::JobRecord;
use crate::models::user::{RegisterRequest, UserRecord};
use crate::profile::{
    ListField, PendingResume, Profile, ProfileModel, ScalarField, TagCommit, TagListEditor,
};
use crate::session::routes::Route;
use crate::state::AppState;
use crate::views::admin::AdminUsersView;
use crate::views::jobs::{JobList, JobListView};
use crate::views::ListScreen;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "applybot")]
#[command(author, version, about = "Control panel for the job-application bot", long_about = None)]
pub struct Cli {
    /// Base URL of the automation service API
    #[arg(long, env = "APPLYBOT_API_URL")]
    pub api_url: Option<String>,

    /// File the session token is kept in
    #[arg(long, env = "APPLYBOT_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "APPLYBOT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "APPLYBOT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the API URL and whether a session is stored
    Status,

    /// Profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Dashboard actions
    #[command(subcommand)]
    Bot(BotCommands),

    /// Job lists
    #[command(subcommand)]
    Jobs(JobsCommands),

    /// Administration
    #[command(subcommand)]
    Admin(AdminCommands),
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Print the stored profile
    Show,
    /// Load the profile, apply the changes and save it once
    Edit {
        /// Set a scalar field, e.g. `--set ctc=12`
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// Add a tag to a list field, e.g. `--add keywords=rust`
        #[arg(long = "add", value_name = "FIELD=TAG")]
        add: Vec<String>,
        /// Remove a tag from a list field
        #[arg(long = "remove", value_name = "FIELD=TAG")]
        remove: Vec<String>,
        /// Upload a new resume (.pdf, .doc or .docx)
        #[arg(long)]
        resume: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BotCommands {
    /// Start the apply bot in the background
    Run,
    /// Email the applied-jobs report
    Email,
    /// Download the applied-jobs report
    Download {
        #[arg(short, long, value_enum, default_value_t = FormatArg::Excel)]
        format: FormatArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobsCommands {
    /// Jobs the bot applied to
    Applied,
    /// Jobs recommended for your keywords
    Recommended,
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List registered users
    Users {
        /// Filter by email or username (case-insensitive)
        #[arg(short, long, default_value = "")]
        search: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Excel,
    Pdf,
}

impl From<FormatArg> for ReportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Excel => ReportFormat::Excel,
            FormatArg::Pdf => ReportFormat::Pdf,
        }
    }
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

pub async fn run(command: Commands, state: &AppState) -> Result<ExitCode> {
    let guarded = matches!(
        &command,
        Commands::Profile(_) | Commands::Bot(_) | Commands::Jobs(_) | Commands::Admin(_)
    );
    let ok = match command {
        Commands::Login { username, password } => login(state, &username, &password).await,
        Commands::Register {
            email,
            username,
            password,
        } => register(state, email, username, password).await,
        Commands::Logout => {
            state.api.logout();
            println!("Logged out.");
            true
        }
        Commands::Status => {
            status(state);
            true
        }
        Commands::Profile(cmd) => {
            enter(state, Route::Profile)?;
            match cmd {
                ProfileCommands::Show => profile_show(state).await,
                ProfileCommands::Edit {
                    set,
                    add,
                    remove,
                    resume,
                } => profile_edit(state, &set, &add, &remove, resume).await?,
            }
        }
        Commands::Bot(cmd) => {
            enter(state, Route::Dashboard)?;
            bot(state, cmd).await
        }
        Commands::Jobs(cmd) => {
            let (route, kind) = match cmd {
                JobsCommands::Applied => (Route::Dashboard, JobList::Applied),
                JobsCommands::Recommended => (Route::Recommend, JobList::Recommended),
            };
            enter(state, route)?;
            jobs(state, kind).await
        }
        Commands::Admin(AdminCommands::Users { search }) => {
            enter(state, Route::Admin)?;
            admin_users(state, &search).await
        }
    };
    // A rejected token sends the navigator back to the login screen.
    if guarded && state.session.navigator().current() == Route::Login {
        println!("Run `applybot login` to sign in again.");
    }
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Runs the route guard; a protected command without a session stops here.
fn enter(state: &AppState, route: Route) -> Result<()> {
    if state.guard.enter(route, || ()).rendered().is_none() {
        bail!("Not logged in. Run `applybot login` first.");
    }
    Ok(())
}

async fn login(state: &AppState, username: &str, password: &str) -> bool {
    match state.api.login(username, password).await {
        Ok(()) => {
            println!("Logged in as {username}.");
            true
        }
        Err(e) => {
            state.notifier.error(&e.user_message());
            false
        }
    }
}

async fn register(state: &AppState, email: String, username: String, password: String) -> bool {
    let request = RegisterRequest {
        email,
        username,
        password,
    };
    match state.api.register(&request).await {
        Ok(user) => {
            println!("Account {} created. You can log in now.", user.username);
            true
        }
        Err(e) => {
            state.notifier.error(&e.user_message());
            false
        }
    }
}

fn status(state: &AppState) {
    println!("API:        {}", state.config.api_url);
    println!("Token file: {}", state.config.token_file.display());
    if state.session.is_authenticated() {
        println!("Session:    logged in");
    } else {
        println!("Session:    not logged in");
    }
}

async fn profile_show(state: &AppState) -> bool {
    let model = ProfileModel::new(state.api.clone(), state.notifier.clone());
    match model.load().await {
        Ok(profile) => {
            print_profile(&profile);
            true
        }
        Err(_) => false,
    }
}

async fn profile_edit(
    state: &AppState,
    set: &[String],
    add: &[String],
    remove: &[String],
    resume: Option<PathBuf>,
) -> Result<bool> {
    // Parse everything up front so a typo never costs a round trip.
    let set = set
        .iter()
        .map(|raw| {
            let (field, value) = split_assignment(raw)?;
            Ok((field.parse::<ScalarField>()?, value.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    let add = parse_list_assignments(add)?;
    let remove = parse_list_assignments(remove)?;
    let resume = match resume {
        Some(path) => Some(PendingResume::from_path(&path).await?),
        None => None,
    };

    let model = ProfileModel::new(state.api.clone(), state.notifier.clone());
    if model.load().await.is_err() {
        return Ok(false);
    }

    for (field, value) in set {
        model.update_field(field, value);
    }

    let mut editor = TagListEditor::new();
    for (field, token) in add {
        let current = model.list(field);
        match editor.commit_text(&token, &current, |next| model.update_list_field(field, next)) {
            TagCommit::Added(tag) => println!("+ {}: {tag}", field.wire_name()),
            TagCommit::Duplicate => println!("= {}: {token} already present", field.wire_name()),
            TagCommit::Empty => {}
            TagCommit::Rejected(e) => {
                state.notifier.error(&e.to_string());
                return Ok(false);
            }
        }
    }
    for (field, token) in remove {
        let current = model.list(field);
        if editor.remove(&current, &token, |next| model.update_list_field(field, next)) {
            println!("- {}: {token}", field.wire_name());
        } else {
            println!("= {}: {token} not present", field.wire_name());
        }
    }

    if let Some(resume) = resume {
        model.select_resume(resume);
    }

    match model.save().await {
        Ok(()) => {
            print_profile(&model.draft());
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}

fn split_assignment(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim(), value))
        .with_context(|| format!("Expected FIELD=VALUE, got '{raw}'"))
}

fn parse_list_assignments(raw: &[String]) -> Result<Vec<(ListField, String)>> {
    raw.iter()
        .map(|item| {
            let (field, token) = split_assignment(item)?;
            Ok((field.parse::<ListField>()?, token.to_string()))
        })
        .collect()
}

async fn bot(state: &AppState, cmd: BotCommands) -> bool {
    let dashboard = state.dashboard();
    let outcome = match cmd {
        BotCommands::Run => dashboard.run_bot().await,
        BotCommands::Email => dashboard.email_report().await,
        BotCommands::Download { format } => dashboard.download_report(format.into()).await,
    };
    if dashboard.bot_status() == BotStatus::Running {
        println!("Bot status: running");
    }
    outcome.is_success()
}

async fn jobs(state: &AppState, kind: JobList) -> bool {
    let view = JobListView::new(kind, state.api.clone(), state.notifier.clone());
    view.activate().await;
    print_screen(view.render(), print_jobs)
}

async fn admin_users(state: &AppState, search: &str) -> bool {
    let view = AdminUsersView::new(state.api.clone(), state.notifier.clone());
    view.activate().await;
    print_screen(view.render(search), print_users)
}

// ============================================================================
// Output
// ============================================================================

fn print_screen<T>(screen: ListScreen<T>, print: fn(&[T])) -> bool {
    match screen {
        ListScreen::Records(records) => {
            print(&records);
            true
        }
        ListScreen::Loading(text) | ListScreen::NoData(text) => {
            println!("{text}");
            true
        }
        ListScreen::LoadFailed(text) => {
            println!("{text}");
            false
        }
    }
}

fn print_profile(profile: &Profile) {
    for field in ScalarField::ALL {
        let value = profile.scalar(field);
        let shown = if field == ScalarField::NaukriPassword && !value.is_empty() {
            "********"
        } else {
            value
        };
        println!("{:<22} {shown}", field.wire_name());
    }
    for field in ListField::ALL {
        println!("{:<22} {}", field.wire_name(), profile.list(field));
    }
    println!(
        "{:<22} {}",
        "resume_filename",
        profile.resume.display_filename().unwrap_or("-")
    );
}

fn print_jobs(jobs: &[JobRecord]) {
    for (i, job) in jobs.iter().enumerate() {
        println!("{:>3}. {} at {}", i + 1, job.title, job.company);
        if let Some(date) = job.applied_date {
            println!("     applied {}", date.format("%Y-%m-%d %H:%M"));
        }
        if let Some(keyword) = &job.matched_keyword {
            println!("     matched '{keyword}'");
        }
        println!("     {}", job.link);
    }
}

fn print_users(users: &[UserRecord]) {
    println!("{:<6} {:<32} {:<20} {:<8} ADMIN", "ID", "EMAIL", "USERNAME", "ACTIVE");
    for user in users {
        println!(
            "{:<6} {:<32} {:<20} {:<8} {}",
            user.id,
            user.email,
            user.username,
            if user.is_active { "yes" } else { "no" },
            if user.is_superuser { "yes" } else { "no" },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_profile_edit() {
        let cli = Cli::try_parse_from([
            "applybot",
            "profile",
            "edit",
            "--set",
            "ctc=12",
            "--add",
            "keywords=rust",
            "--add",
            "locations=Remote",
        ])
        .unwrap();
        match cli.command {
            Commands::Profile(ProfileCommands::Edit { set, add, .. }) => {
                assert_eq!(set, ["ctc=12"]);
                assert_eq!(add.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_download_format_defaults_to_excel() {
        let cli = Cli::try_parse_from(["applybot", "bot", "download"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Bot(BotCommands::Download {
                format: FormatArg::Excel
            })
        ));
        let cli = Cli::try_parse_from(["applybot", "bot", "download", "--format", "pdf"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Bot(BotCommands::Download { format: FormatArg::Pdf })
        ));
    }

    #[test]
    fn test_list_assignments() {
        let parsed = parse_list_assignments(&["blacklisted_companies=Acme Corp".to_string()]).unwrap();
        assert_eq!(parsed, [(ListField::BlacklistedCompanies, "Acme Corp".to_string())]);
        assert!(parse_list_assignments(&["keywords".to_string()]).is_err());
        assert!(parse_list_assignments(&["ctc=1".to_string()]).is_err());
    }
}
