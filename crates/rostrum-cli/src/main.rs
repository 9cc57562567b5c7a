//! Rostrum CLI - browse, run and judge debates from the terminal
//!
//! # Usage
//!
//! ```bash
//! # Log in and see the next assigned debate
//! rostrum login sam
//! rostrum experiments next
//!
//! # Read a debate, ask for another turn, then judge it
//! rostrum debate show 12
//! rostrum debate turn 12 --message "Which quote supports your answer?"
//! rostrum debate judge 12 --confidence-b 70 --explanation "B's quotes were verified"
//!
//! # Browse imported transcript files
//! rostrum files tree
//! rostrum files row 1a2b3c4d 3 --hide-answers
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use rostrum_client::{AppContext, ClientConfig};

mod commands;
mod render;

use commands::{debate, experiments, files, playground, session};

/// Rostrum - judge structured AI debates
#[derive(Parser)]
#[command(
    name = "rostrum",
    version,
    about = "Rostrum CLI - browse, run and judge AI debates",
    long_about = "Rostrum talks to a debate backend on behalf of a human judge.\n\n\
                  Debates are generated turn by turn; the judge reads the arguments,\n\
                  checks the quoted evidence and records a confidence for each answer."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Backend base URL
    #[arg(long, env = "ROSTRUM_API_URL", global = true)]
    api_url: Option<String>,

    /// Where the login session is cached
    #[arg(long, env = "ROSTRUM_SESSION_FILE", global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in by user name
    #[command(name = "login")]
    Login(session::LoginArgs),

    /// Forget the saved session
    #[command(name = "logout")]
    Logout,

    /// Show the logged-in user
    #[command(name = "whoami")]
    Whoami,

    /// Browse imported transcript files (admins)
    #[command(name = "files")]
    Files(files::FilesArgs),

    /// View, continue and judge a single debate
    #[command(name = "debate")]
    Debate(debate::DebateArgs),

    /// Start and list ad-hoc debates (admins)
    #[command(name = "playground")]
    Playground(playground::PlaygroundArgs),

    /// Assigned debates and finished experiments
    #[command(name = "experiments")]
    Experiments(experiments::ExperimentsArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env().context("Invalid configuration")?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = Some(session_file);
    }
    config.validate().context("Invalid configuration")?;

    let ctx = AppContext::from_config(&config).context("Failed to set up the API client")?;
    if let Err(e) = ctx.init().await {
        tracing::warn!(error = %e, "could not restore the saved session");
    }

    // Execute command
    match cli.command {
        Commands::Login(args) => session::login(args, &ctx).await,
        Commands::Logout => session::logout(&ctx).await,
        Commands::Whoami => session::whoami(&ctx),
        Commands::Files(args) => files::run(args, &ctx).await,
        Commands::Debate(args) => debate::run(args, &ctx).await,
        Commands::Playground(args) => playground::run(args, &ctx).await,
        Commands::Experiments(args) => experiments::run(args, &ctx).await,
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
