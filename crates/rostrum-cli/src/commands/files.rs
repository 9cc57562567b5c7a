//! Files command - browse imported transcript files
//!
//! Usage:
//! ```bash
//! rostrum files tree
//! rostrum files show 1a2b3c4d
//! rostrum files row 1a2b3c4d 3 --hide-answers
//! rostrum files row 1a2b3c4d 3 --raw
//! ```

use std::borrow::Cow;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use rostrum_client::{AppContext, AuthRequirement};
use rostrum_core::{Answers, FileDetail, FileTree, RowDetail, Transcript};

use crate::render;

/// Arguments for the files command
#[derive(Args)]
pub struct FilesArgs {
    #[command(subcommand)]
    command: FilesCommand,
}

#[derive(Subcommand)]
pub enum FilesCommand {
    /// Show all files as a directory tree
    #[command(name = "tree")]
    Tree,

    /// List the rows of one file
    #[command(name = "show")]
    Show {
        /// Path hash of the file (the first 8 characters are enough)
        path_hash: String,

        /// Do not reveal answers or judge results
        #[arg(long)]
        hide_answers: bool,
    },

    /// Show one row's transcript
    #[command(name = "row")]
    Row {
        /// Path hash of the file
        path_hash: String,

        /// Row number
        row: u32,

        /// Do not reveal answers; A/B placement is randomized
        #[arg(long)]
        hide_answers: bool,

        /// Show the stored transcript JSON instead
        #[arg(long, conflicts_with = "story")]
        raw: bool,

        /// Show the source story instead
        #[arg(long)]
        story: bool,
    },
}

/// Run the files command
pub async fn run(args: FilesArgs, ctx: &AppContext) -> Result<()> {
    ctx.require(AuthRequirement::Admin)?;
    match args.command {
        FilesCommand::Tree => show_tree(ctx).await,
        FilesCommand::Show {
            path_hash,
            hide_answers,
        } => show_file(ctx, &path_hash, hide_answers).await,
        FilesCommand::Row {
            path_hash,
            row,
            hide_answers,
            raw,
            story,
        } => {
            let view = if raw {
                RowView::Raw
            } else if story {
                RowView::Story
            } else {
                RowView::Arguments
            };
            show_row(ctx, &path_hash, row, hide_answers, view).await
        }
    }
}

async fn show_tree(ctx: &AppContext) -> Result<()> {
    let files = ctx.api().list_files().await.context("Failed to list files")?;
    if files.is_empty() {
        println!("No files imported yet.");
        return Ok(());
    }
    let tree = FileTree::build(files);
    println!("{}", render::file_tree_block(&tree));
    println!();
    println!("Open a file: {}", "rostrum files show <hash>".green());
    Ok(())
}

fn rows_table(file: &FileDetail, hide_answers: bool) -> Table {
    let mut header = vec![
        Cell::new("Row").fg(Color::Cyan),
        Cell::new("Question").fg(Color::Cyan),
    ];
    if !hide_answers {
        header.push(Cell::new("Answers").fg(Color::Cyan));
        header.push(Cell::new("⚖️").fg(Color::Cyan));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for row in &file.rows {
        let mut cells = vec![
            Cell::new(row.row_number).fg(Color::Green),
            Cell::new(&row.question.question_text),
        ];
        if !hide_answers {
            cells.push(Cell::new(format!(
                "✅ {}\n❌ {}",
                row.question.correct_answer, row.question.incorrect_answer
            )));
            let judged = u8::from(row.is_judgement_correct == Some(true));
            cells.push(Cell::new(format!("{judged}/1")));
        }
        table.add_row(cells);
    }
    table
}

async fn show_file(ctx: &AppContext, path_hash: &str, hide_answers: bool) -> Result<()> {
    let file = ctx
        .api()
        .get_file(path_hash)
        .await
        .with_context(|| format!("Failed to load file '{path_hash}'"))?;

    let mut summary = format!("{} - {} debates", file.file.path.bold(), file.rows.len());
    if !hide_answers {
        if let Some(pct) = file.percentage_correct() {
            summary.push_str(&format!("  {:.0}% judgements correct", pct));
        }
    }
    println!("{summary}");
    if !file.rows.is_empty() {
        println!("{}", rows_table(&file, hide_answers));
        let hash = file.file.short_hash().unwrap_or(path_hash);
        println!();
        println!(
            "Open a row: {}",
            format!("rostrum files row {hash} <row>").green()
        );
    }
    Ok(())
}

/// Which tab of a row to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowView {
    Arguments,
    Raw,
    Story,
}

/// The transcript as displayed: reversed on a coin flip when answers are hidden
fn displayed_transcript(transcript: &Transcript, hide_answers: bool, flip: bool) -> Cow<'_, Transcript> {
    if hide_answers && flip {
        Cow::Owned(transcript.reversed())
    } else {
        Cow::Borrowed(transcript)
    }
}

/// Last few components of a path
fn short_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').collect();
    parts[parts.len().saturating_sub(5)..].join("/")
}

async fn show_row(
    ctx: &AppContext,
    path_hash: &str,
    row_number: u32,
    hide_answers: bool,
    view: RowView,
) -> Result<()> {
    let row = ctx
        .api()
        .get_row(path_hash, row_number)
        .await
        .with_context(|| format!("Failed to load row {row_number} of '{path_hash}'"))?;

    let transcript = row
        .transcript
        .as_ref()
        .map(|t| displayed_transcript(t, hide_answers, rand::random_bool(0.5)));

    match view {
        RowView::Raw => println!("{}", render::raw_transcript(&row.raw_transcript, &["story"])),
        RowView::Story => match transcript.as_ref().and_then(|t| t.story.as_deref()) {
            Some(story) => println!("{}", render::raw_transcript(story, &[])),
            None => println!("This row has no story."),
        },
        RowView::Arguments => print_row(&row, transcript.as_deref(), hide_answers),
    }

    println!();
    print_navigation(&row, path_hash);
    Ok(())
}

fn print_row(row: &RowDetail, transcript: Option<&Transcript>, hide_answers: bool) {
    let fallback_answers = Answers {
        correct: row.question.correct_answer.clone(),
        incorrect: row.question.incorrect_answer.clone(),
    };
    let answers = transcript.map_or(&fallback_answers, |t| &t.answers);
    let names = transcript.map(|t| t.names.clone()).unwrap_or_default();
    let swap = transcript.is_some_and(|t| t.swap);

    println!("{} {}", "Row".bold(), row.row_number);
    if !hide_answers {
        println!("{} {}", "File:".dimmed(), short_path(&row.file.path));
    }
    println!(
        "{}",
        render::header_block(&row.question.question_text, answers, &names, swap, hide_answers)
    );
    println!();

    if let Some(t) = transcript {
        println!(
            "{}",
            render::rounds_block(&t.rounds, &t.names, t.swap, hide_answers)
        );
        if let Some(responses) = &t.responses {
            println!();
            println!("{}", "Responses".bold().underline());
            println!(
                "{}",
                render::rounds_block(responses, &t.names, t.swap, hide_answers)
            );
        }
    }

    if !hide_answers {
        println!();
        println!("{}", "⚖️ Judgements".bold());
        match &row.judgement {
            Some(judgement) => {
                let (icon, color) = match judgement.is_correct {
                    Some(true) => ("✅", Color::Green),
                    Some(false) => ("❌", Color::Red),
                    None => ("??", Color::White),
                };
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .apply_modifier(UTF8_ROUND_CORNERS)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec![Cell::new(format!(
                        "{icon} {}",
                        judgement.display_judge_name(transcript)
                    ))
                    .fg(color)])
                    .add_row(vec![Cell::new(&judgement.judgement_text)]);
                println!("{table}");
            }
            None => println!("No judgements."),
        }
    }
}

fn print_navigation(row: &RowDetail, path_hash: &str) {
    let hash = row.file.short_hash().unwrap_or(path_hash);
    if row.row_number >= 2 {
        println!(
            "Previous: {}",
            format!("rostrum files row {hash} {}", row.row_number - 1).green()
        );
    }
    if row.next_available.unwrap_or(false) {
        println!(
            "Next:     {}",
            format!("rostrum files row {hash} {}", row.row_number + 1).green()
        );
    }
}
