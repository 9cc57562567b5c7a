//! Playground command - ad-hoc debates outside any experiment
//!
//! Usage:
//! ```bash
//! rostrum playground list
//! rostrum playground configs
//! rostrum playground create --type debate --config debaters/gpt4.yaml
//! rostrum playground create --type incorrect_consultancy --previous 41
//! ```

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use rostrum_client::{AppContext, AuthRequirement, NewPlaygroundDebate, PlaygroundDebateType};

use crate::render;
use crate::{print_info, print_success};

/// Arguments for the playground command
#[derive(Args)]
pub struct PlaygroundArgs {
    #[command(subcommand)]
    command: PlaygroundCommand,
}

#[derive(Subcommand)]
pub enum PlaygroundCommand {
    /// List playground debates
    #[command(name = "list")]
    List {
        /// Do not reveal correctness in the list
        #[arg(long)]
        hide_answers: bool,
    },

    /// List the available debater and consultant configs
    #[command(name = "configs")]
    Configs,

    /// Start a new playground debate
    #[command(name = "create")]
    Create {
        /// debate, consultancy, correct_consultancy or incorrect_consultancy
        #[arg(short = 't', long = "type", default_value = "debate")]
        debate_type: PlaygroundDebateType,

        /// Config file; defaults to the first one available for the type
        #[arg(short, long)]
        config: Option<String>,

        /// Reuse the question of an earlier debate
        #[arg(short, long)]
        previous: Option<i64>,
    },
}

/// Run the playground command
pub async fn run(args: PlaygroundArgs, ctx: &AppContext) -> Result<()> {
    match args.command {
        PlaygroundCommand::List { hide_answers } => list(ctx, hide_answers).await,
        PlaygroundCommand::Configs => configs(ctx).await,
        PlaygroundCommand::Create {
            debate_type,
            config,
            previous,
        } => create(ctx, debate_type, config, previous).await,
    }
}

async fn list(ctx: &AppContext, hide_answers: bool) -> Result<()> {
    ctx.require(AuthRequirement::Admin)?;
    let debates = ctx
        .api()
        .playground_debates()
        .await
        .context("Failed to list playground debates")?;

    if debates.is_empty() {
        println!("No playground debates yet.");
        println!(
            "Start one: {}",
            "rostrum playground create --type debate".green()
        );
        return Ok(());
    }
    println!("{}", render::debate_table(&debates, hide_answers));
    Ok(())
}

async fn configs(ctx: &AppContext) -> Result<()> {
    ctx.require(AuthRequirement::User)?;
    let configs = ctx
        .api()
        .debater_configs()
        .await
        .context("Failed to load debater configs")?;

    for (title, paths) in [
        ("Debater configs", &configs.debater_configs),
        ("Consultant configs", &configs.consultant_configs),
    ] {
        println!("{}", title.bold());
        if paths.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for path in paths {
            println!("  {path}");
        }
    }
    Ok(())
}

async fn create(
    ctx: &AppContext,
    debate_type: PlaygroundDebateType,
    config: Option<String>,
    previous: Option<i64>,
) -> Result<()> {
    ctx.require(AuthRequirement::User)?;
    let configs = ctx
        .api()
        .debater_configs()
        .await
        .context("Failed to load debater configs")?;
    let available = configs.for_type(debate_type);

    let config_path = match config {
        Some(path) if available.contains(&path) => path,
        Some(path) => bail!(
            "'{path}' is not a config for {debate_type}; see `rostrum playground configs`"
        ),
        None => match available.first() {
            Some(path) => path.clone(),
            None => bail!("No configs available for {debate_type}"),
        },
    };

    print_info(&format!("Creating {debate_type} with {config_path}"));
    let id = ctx
        .api()
        .create_playground_debate(&NewPlaygroundDebate {
            debate_type,
            config_path,
            previous_debate_id: previous,
        })
        .await
        .context("Failed to create debate")?;

    print_success(&format!("Created debate {id}"));
    println!("Open it: {}", format!("rostrum debate show {id}").green());
    Ok(())
}
