//! Debate command - read, continue and judge one debate
//!
//! Usage:
//! ```bash
//! rostrum debate show 12
//! rostrum debate show 12 --raw
//! rostrum debate turn 12 --message "Quote the relevant passage"
//! rostrum debate judge 12 --confidence-b 70 --explanation "B's quotes check out"
//! ```

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use rostrum_client::judging::submit_judgement;
use rostrum_client::turn::{needs_first_turn, run_turn};
use rostrum_client::{AppContext, AuthRequirement, Flow};
use rostrum_core::judgement::{confidence_correct_from_b, SLIDER_MAX, SLIDER_MIN};
use rostrum_core::{policy, DebateDetail, JudgementDraft, RoundLayout};

use crate::render;
use crate::{print_info, print_success, print_warning};

/// Arguments for the debate command
#[derive(Args)]
pub struct DebateArgs {
    #[command(subcommand)]
    command: DebateCommand,
}

#[derive(Subcommand)]
pub enum DebateCommand {
    /// Show a debate, starting its first turn if it has none
    #[command(name = "show")]
    Show {
        /// Debate ID
        id: i64,

        /// Keep answers hidden even after judging
        #[arg(long)]
        hide_answers: bool,

        /// Show the stored transcript JSON
        #[arg(long)]
        raw: bool,
    },

    /// Generate the next round
    #[command(name = "turn")]
    Turn {
        /// Debate ID
        id: i64,

        /// Message to the debaters, where the debate allows it
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Record your judgement
    #[command(name = "judge")]
    Judge {
        /// Debate ID
        id: i64,

        /// Confidence that answer B is correct (5-95, snapped to steps of 5)
        #[arg(short = 'b', long, value_parser = clap::value_parser!(u8).range(SLIDER_MIN as i64..=SLIDER_MAX as i64))]
        confidence_b: u8,

        /// Why you chose this confidence
        #[arg(short, long, default_value = "")]
        explanation: String,
    },
}

/// Run the debate command
pub async fn run(args: DebateArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(AuthRequirement::User)?;
    match args.command {
        DebateCommand::Show {
            id,
            hide_answers,
            raw,
        } => show(ctx, id, hide_answers, raw).await,
        DebateCommand::Turn { id, message } => turn(ctx, id, message.as_deref()).await,
        DebateCommand::Judge {
            id,
            confidence_b,
            explanation,
        } => judge(ctx, id, confidence_b, explanation).await,
    }
}

async fn fetch(ctx: &AppContext, id: i64) -> Result<DebateDetail> {
    ctx.api()
        .get_debate(id)
        .await
        .with_context(|| format!("Failed to load debate {id}"))
}

async fn show(ctx: &AppContext, id: i64, hide_requested: bool, raw: bool) -> Result<()> {
    let mut debate = fetch(ctx, id).await?;

    if raw {
        println!("{}", render::raw_transcript(&debate.raw_transcript, &[]));
        return Ok(());
    }

    let owned = ctx.user().is_some_and(|u| debate.is_owned_by(&u));
    if owned && needs_first_turn(&debate) {
        print_info("Starting the first round...");
        if let Err(e) = generate(ctx, &mut debate, None).await {
            print_warning(&format!("First round failed: {e}"));
        }
    }

    print_debate(&debate, hide_requested);
    Ok(())
}

fn print_debate(debate: &DebateDetail, hide_requested: bool) {
    let flow = Flow::of(debate);
    let hide = flow.hide_answers(debate, hide_requested);

    println!("{}", render::debate_summary(debate, hide));
    println!();
    println!("{}", render::transcript_block(&debate.transcript, hide));

    match render::judgement_block(debate, hide) {
        Some(block) => {
            println!();
            println!("{block}");
        }
        None => {
            println!();
            println!(
                "Judge it: {}",
                format!("rostrum debate judge {} --confidence-b <5-95>", debate.id).green()
            );
            if !flow.turn_limit_reached(debate) {
                println!(
                    "Continue: {}",
                    format!("rostrum debate turn {}", debate.id).green()
                );
            }
        }
    }

    if flow == Flow::Experiment && policy::is_complete(debate) {
        println!();
        print_remaining(debate);
    }
}

fn print_remaining(debate: &DebateDetail) {
    let remaining = debate.debates_remaining.unwrap_or(0);
    let plural = if remaining == 1 { "" } else { "s" };
    println!("{remaining} debate{plural} remaining");
    match debate.next_debate_id {
        Some(next) => println!(
            "Next debate: {}",
            format!("rostrum debate show {next}").green()
        ),
        None => print_success("You've judged all of your assigned debates!"),
    }
}

/// Run one turn, redrawing the elapsed-time placeholder on a single line
async fn generate(
    ctx: &AppContext,
    debate: &mut DebateDetail,
    message: Option<&str>,
) -> rostrum_client::ClientResult<()> {
    let result = run_turn(ctx, debate, message, |d| {
        let status = d.transcript.rounds.last().and_then(|r| r.correct.as_deref());
        if let Some(line) = status.and_then(|s| s.lines().next()) {
            print!("\r{}", line.dimmed());
            let _ = std::io::stdout().flush();
        }
    })
    .await;
    println!();
    result
}

async fn turn(ctx: &AppContext, id: i64, message: Option<&str>) -> Result<()> {
    let mut debate = fetch(ctx, id).await?;
    let before = debate.transcript.successful_rounds().count();

    if let Err(e) = generate(ctx, &mut debate, message).await {
        print_warning(&format!(
            "Retry with {}",
            format!("rostrum debate turn {id}").green()
        ));
        return Err(e).context("Turn failed");
    }

    let hide = Flow::of(&debate).hide_answers(&debate, false);
    let transcript = &debate.transcript;
    for (i, round) in transcript.rounds.iter().enumerate().skip(before) {
        let layout = RoundLayout::of(round, &transcript.names, transcript.swap, hide);
        println!("{}", render::round_block(i + 1, &layout));
    }
    print_success(&format!("Round {} added", transcript.round_count()));
    Ok(())
}

async fn judge(ctx: &AppContext, id: i64, confidence_b: u8, explanation: String) -> Result<()> {
    let debate = fetch(ctx, id).await?;
    let draft = JudgementDraft {
        confidence_correct: confidence_correct_from_b(confidence_b, debate.transcript.swap),
        explanation,
    };
    submit_judgement(ctx, &debate, &draft)
        .await
        .context("Judgement not recorded")?;
    print_success("Judgement recorded");

    let debate = fetch(ctx, id).await?;
    println!();
    print_debate(&debate, false);
    Ok(())
}
