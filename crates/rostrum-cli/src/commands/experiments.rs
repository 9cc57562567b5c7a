//! Experiments command - assigned debates and past results
//!
//! Usage:
//! ```bash
//! rostrum experiments next
//! rostrum experiments completed
//! rostrum experiments score
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use rostrum_client::{AppContext, AuthRequirement};
use rostrum_core::{group_by_experiment, quadratic_score, ExperimentGroup};

use crate::render;
use crate::print_warning;

/// Arguments for the experiments command
#[derive(Args)]
pub struct ExperimentsArgs {
    #[command(subcommand)]
    command: ExperimentsCommand,
}

#[derive(Subcommand)]
pub enum ExperimentsCommand {
    /// Show the next debate waiting for you
    #[command(name = "next")]
    Next,

    /// List the debates you have judged, per experiment
    #[command(name = "completed")]
    Completed,

    /// Your score per experiment, where the experiment gives feedback
    #[command(name = "score")]
    Score,
}

/// Run the experiments command
pub async fn run(args: ExperimentsArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(AuthRequirement::User)?;
    match args.command {
        ExperimentsCommand::Next => next(ctx).await,
        ExperimentsCommand::Completed => completed(ctx).await,
        ExperimentsCommand::Score => score(ctx).await,
    }
}

async fn next(ctx: &AppContext) -> Result<()> {
    let next = ctx
        .api()
        .next_debate()
        .await
        .context("Failed to fetch the next debate")?;

    let Some(debate) = next else {
        println!("No debates to judge for now.");
        return Ok(());
    };

    let heading = debate
        .experiment
        .as_ref()
        .and_then(|e| e.public_name.as_deref())
        .unwrap_or("Next debate");
    println!(
        "{} {}",
        heading.bold(),
        format!("{} remaining", debate.debates_remaining.unwrap_or(0)).dimmed()
    );
    println!("{}", render::debate_table([&debate.debate], true));
    println!(
        "Open it: {}",
        format!("rostrum debate show {}", debate.id).green()
    );
    Ok(())
}

async fn load_groups(ctx: &AppContext) -> Result<Vec<ExperimentGroup>> {
    let debates = ctx
        .api()
        .completed_debates()
        .await
        .context("Failed to list completed debates")?;
    Ok(group_by_experiment(debates))
}

async fn completed(ctx: &AppContext) -> Result<()> {
    let groups = load_groups(ctx).await?;
    if groups.is_empty() {
        println!("You haven't judged any experiment debates yet.");
        return Ok(());
    }

    for group in &groups {
        let judged = group.judged();
        println!(
            "{}",
            format!("{} ({})", group.experiment.display_name(), judged.len()).bold()
        );
        println!("{}", render::debate_table(judged, false));
        println!();
    }
    Ok(())
}

/// Score line for one experiment, or `None` when feedback is withheld
fn score_line(group: &ExperimentGroup) -> Option<String> {
    if !group.experiment.give_judge_feedback {
        return None;
    }
    let confidences = group.confidences();
    let line = match quadratic_score(&confidences) {
        Ok(total) => format!(
            "{}: {:+.1} over {} debate{}",
            group.experiment.display_name(),
            total,
            confidences.len(),
            if confidences.len() == 1 { "" } else { "s" }
        ),
        Err(e) => format!("{}: {e}", group.experiment.display_name()),
    };
    Some(line)
}

async fn score(ctx: &AppContext) -> Result<()> {
    let groups = load_groups(ctx).await?;
    if groups.is_empty() {
        println!("You haven't judged any experiment debates yet.");
        return Ok(());
    }

    for group in &groups {
        match score_line(group) {
            Some(line) => println!("{line}"),
            None => print_warning(&format!(
                "{}: feedback is withheld for this experiment",
                group.experiment.display_name()
            )),
        }
    }
    Ok(())
}
