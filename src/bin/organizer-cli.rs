//! # Organizer CLI Tool
//!
//! Command-line interface for the organizer API: sign in, then list and edit
//! tasks, projects, and preferences.

mod cli;

use clap::{Parser, Subcommand};
use organizer_client::config::LoggingConfig;
use organizer_client::logging::init_structured_logging;
use organizer_client::ClientConfig;
use tracing::info;

use cli::{
    handle_auth_command, handle_config_command, handle_project_command, handle_task_command,
    handle_user_command,
};

#[derive(Parser, Debug)]
#[command(name = "organizer-cli")]
#[command(about = "Command-line interface for the Act/Plan/Reflect organizer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file path (default: ~/.organizer/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format (table or json)
    #[arg(long, default_value = "table")]
    format: String,

    /// Subcommands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, and inspect the session
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Task operations
    #[command(subcommand)]
    Task(TaskCommands),

    /// Project operations
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Current user profile and preferences
    #[command(subcommand)]
    User(UserCommands),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Store a bearer token and confirm it with the server
    Login {
        /// Bearer token issued by the organizer API
        #[arg(value_name = "TOKEN")]
        token: String,
    },
    /// Finish an OAuth sign-in from the redirect URL
    Callback {
        /// Full redirect URL, including its query string
        #[arg(value_name = "URL")]
        url: String,
    },
    /// Forget the stored token
    Logout,
    /// Show who is signed in
    Status,
    /// Exchange the stored token for a fresh one
    Refresh,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommands {
    /// List tasks with optional filters
    List {
        /// Filter by status (TODO, IN_PROGRESS, DONE, CANCELLED)
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by project id
        #[arg(short, long)]
        project: Option<String>,
        /// Filter by scheduled date (YYYY-MM-DD)
        #[arg(long)]
        scheduled_for: Option<String>,
        /// Filter by tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Tasks scheduled for today
    Today,
    /// Tasks that can be acted on now
    Actionable,
    /// Get task details
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Create a new task
    Create {
        /// Task title
        #[arg(long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Project to file the task under
        #[arg(short, long)]
        project: Option<String>,
        /// Task type (ACTION, WAITING_FOR, REFERENCE, SOMEDAY_MAYBE)
        #[arg(long = "type")]
        task_type: Option<String>,
        /// Scheduled date (YYYY-MM-DD)
        #[arg(long)]
        scheduled_for: Option<String>,
        /// Estimated pomodoros
        #[arg(short, long)]
        estimate: Option<u32>,
        /// Context such as @home or @office
        #[arg(long)]
        context: Option<String>,
        /// Energy level (1-5)
        #[arg(long)]
        energy: Option<u8>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Update task fields
    Update {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// New status (TODO, IN_PROGRESS, DONE, CANCELLED)
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        project: Option<String>,
        #[arg(long)]
        scheduled_for: Option<String>,
        /// Actual pomodoros spent
        #[arg(long)]
        actual: Option<u32>,
    },
    /// Mark a task done
    Complete {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Move a task to a new position
    Reorder {
        #[arg(value_name = "ID")]
        id: String,
        /// New ordinal value
        #[arg(value_name = "ORDER", allow_negative_numbers = true)]
        order: i64,
    },
    /// Append a note to a task
    Note {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_name = "CONTENT")]
        content: String,
    },
    /// Record a reflection on a finished task
    Reflect {
        #[arg(value_name = "ID")]
        id: String,
        /// Difficulty (1-5)
        #[arg(long)]
        difficulty: u8,
        /// Satisfaction (1-5)
        #[arg(long)]
        satisfaction: u8,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        lessons: Option<String>,
    },
    /// Delete a task
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List,
    /// Get project details
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Create a new project
    Create {
        #[arg(long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Priority (LOW, MEDIUM, HIGH, CRITICAL)
        #[arg(short, long)]
        priority: Option<String>,
        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Update project fields
    Update {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// New status (ACTIVE, ON_HOLD, COMPLETED, ARCHIVED)
        #[arg(short, long)]
        status: Option<String>,
        /// New priority (LOW, MEDIUM, HIGH, CRITICAL)
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Move a project on the planning canvas
    Position {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(value_name = "X", allow_negative_numbers = true)]
        x: f64,
        #[arg(value_name = "Y", allow_negative_numbers = true)]
        y: f64,
    },
    /// Show project statistics
    Stats {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Delete a project
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommands {
    /// Show the current user
    Show,
    /// Update profile fields
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Update preferences; unspecified fields keep their current value
    UpdatePrefs {
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        max_daily_tasks: Option<u32>,
        /// Hour of day (0-23) for the reflection reminder
        #[arg(long)]
        reflection_hour: Option<u8>,
        #[arg(long)]
        notifications: Option<bool>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Destination (default: ~/.organizer/config.toml)
        #[arg(short, long)]
        path: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> organizer_client::ClientResult<()> {
    let cli = Cli::parse();

    // Load configuration with precedence: --config > standard locations + env
    let config = if let Some(config_path) = &cli.config {
        ClientConfig::load_from_file(std::path::Path::new(config_path))?
    } else {
        ClientConfig::load()?
    };

    let log_level = match cli.verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    };
    init_structured_logging(&LoggingConfig {
        level: log_level
            .map(str::to_string)
            .or_else(|| config.logging.level.clone())
            .or_else(|| Some("warn".to_string())),
        json: config.logging.json,
    });

    info!(base_url = %config.api.base_url, "Organizer CLI starting");

    let json = cli.format.eq_ignore_ascii_case("json");

    match cli.command {
        Commands::Auth(auth_cmd) => handle_auth_command(auth_cmd, &config).await,
        Commands::Task(task_cmd) => handle_task_command(task_cmd, &config, json).await,
        Commands::Project(project_cmd) => handle_project_command(project_cmd, &config, json).await,
        Commands::User(user_cmd) => handle_user_command(user_cmd, &config, json).await,
        Commands::Config(config_cmd) => handle_config_command(config_cmd, &config).await,
    }
}
