//! Terminal rendering of debates, transcripts and judgements

use colored::{ColoredString, Colorize};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use rostrum_core::format::format_date;
use rostrum_core::layout::{answer_lines, AnswerLine, DebaterRows, Message};
use rostrum_core::policy::{self, Shading};
use rostrum_core::quote::{tokenize, SegmentKind};
use rostrum_core::scoring::quadratic_term;
use rostrum_core::{
    Accent, Answers, ConfidenceSplit, Debate, FileTree, Names, Round, RoundLayout, Transcript,
};

/// Width of the confidence bar, in characters
const BAR_WIDTH: usize = 40;

/// Highlight quotes: unverified in yellow, verified in green
pub fn highlight(text: &str) -> String {
    tokenize(text)
        .into_iter()
        .map(|segment| match segment.kind {
            SegmentKind::Plain => segment.content,
            SegmentKind::UQuote => segment.content.black().on_yellow().to_string(),
            SegmentKind::VQuote => segment.content.black().on_green().to_string(),
        })
        .collect()
}

fn accented(text: &str, accent: Accent) -> ColoredString {
    match accent {
        Accent::None => text.bold(),
        Accent::Correct => text.green().bold(),
        Accent::Incorrect => text.red().bold(),
        Accent::Moderator => text.blue().bold(),
    }
}

fn accent_color(accent: Accent) -> Option<Color> {
    match accent {
        Accent::None => None,
        Accent::Correct => Some(Color::Green),
        Accent::Incorrect => Some(Color::Red),
        Accent::Moderator => Some(Color::Blue),
    }
}

fn message_block(message: &Message<'_>, position: Option<&str>) -> String {
    let label = match position {
        Some(p) => format!("{p}: {}", message.label),
        None => message.label.clone(),
    };
    let body: Vec<String> = highlight(message.content)
        .lines()
        .map(|line| format!("  {line}"))
        .collect();
    format!("{}\n{}", accented(&label, message.accent), body.join("\n"))
}

fn side_by_side(a: Option<&Message<'_>>, b: Option<&Message<'_>>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let columns: Vec<(&str, &Message<'_>)> = [("A", a), ("B", b)]
        .into_iter()
        .filter_map(|(p, m)| m.map(|m| (p, m)))
        .collect();

    table.set_header(columns.iter().map(|(p, m)| {
        let cell = Cell::new(format!("{p}: {}", m.label));
        match accent_color(m.accent) {
            Some(color) => cell.fg(color),
            None => cell,
        }
    }));
    table.add_row(columns.iter().map(|(_, m)| Cell::new(highlight(m.content))));
    table
}

/// One round, top to bottom
pub fn round_block(number: usize, layout: &RoundLayout<'_>) -> String {
    let mut out = vec![format!("── Round {number} ──").dimmed().to_string()];

    for message in [&layout.error, &layout.judge, &layout.cross_examiner]
        .into_iter()
        .flatten()
    {
        out.push(message_block(message, None));
    }

    match &layout.debaters {
        DebaterRows::SideBySide(a, b) => {
            if a.is_some() || b.is_some() {
                out.push(side_by_side(a.as_ref(), b.as_ref()).to_string());
            }
        }
        DebaterRows::Stacked(a, b) => {
            if let Some(a) = a {
                out.push(message_block(a, Some("A")));
            }
            if let Some(b) = b {
                out.push(message_block(b, Some("B")));
            }
        }
    }
    out.join("\n")
}

/// Every round of `rounds`, numbered from one
pub fn rounds_block(rounds: &[Round], names: &Names, swap: bool, hide_answers: bool) -> String {
    if rounds.is_empty() {
        return "No rounds yet.".dimmed().to_string();
    }
    rounds
        .iter()
        .enumerate()
        .map(|(i, round)| round_block(i + 1, &RoundLayout::of(round, names, swap, hide_answers)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn answer_line(line: &AnswerLine<'_>) -> String {
    let icon = match line.is_correct {
        Some(true) => "✅ ",
        Some(false) => "❌ ",
        None => "",
    };
    let name = line
        .name
        .map(|n| format!(" ({})", n.italic()))
        .unwrap_or_default();
    format!(
        "{icon}{} {}{name}",
        format!("{}:", line.position.label()).bold(),
        line.answer
    )
}

/// Question and both answers, in A, B order
pub fn header_block(
    question: &str,
    answers: &Answers,
    names: &Names,
    swap: bool,
    hide_answers: bool,
) -> String {
    let mut out = vec![format!("{} {question}", "Question:".bold())];
    out.extend(answer_lines(answers, names, swap, hide_answers).iter().map(answer_line));
    out.join("\n")
}

/// Header and rounds of a transcript
pub fn transcript_block(transcript: &Transcript, hide_answers: bool) -> String {
    format!(
        "{}\n\n{}",
        header_block(
            &transcript.question,
            &transcript.answers,
            &transcript.names,
            transcript.swap,
            hide_answers
        ),
        rounds_block(
            &transcript.rounds,
            &transcript.names,
            transcript.swap,
            hide_answers
        )
    )
}

/// Two-part bar of the judge's confidence in A and B
pub fn confidence_bar(split: ConfidenceSplit) -> String {
    let (wa, wb) = split.bar_weights();
    let a_cols = ((wa / (wa + wb)) * BAR_WIDTH as f64).round() as usize;
    let b_cols = BAR_WIDTH.saturating_sub(a_cols);
    format!(
        "A {:.0}% {}{} {:.0}% B",
        split.a,
        "█".repeat(a_cols).blue(),
        "█".repeat(b_cols).magenta(),
        split.b
    )
}

/// The recorded judgement, if any.
///
/// Correctness and score appear only when answers are shown and feedback is allowed.
pub fn judgement_block(debate: &Debate, hide_answers: bool) -> Option<String> {
    let judgement = debate.judgement.as_ref()?;
    let mut out = vec![
        format!("{}", "Judgement".bold()),
        confidence_bar(ConfidenceSplit::new(
            judgement.confidence_correct,
            debate.transcript.swap,
        )),
    ];
    if let Some(explanation) = judgement.explanation.as_deref().filter(|e| !e.is_empty()) {
        out.push(format!("{} {explanation}", "Explanation:".dimmed()));
    }
    if !hide_answers && policy::should_show_feedback(debate) {
        let verdict = if judgement.is_correct() {
            "Correct".green().bold()
        } else {
            "Incorrect".red().bold()
        };
        out.push(format!(
            "{verdict} (score {:+.1})",
            quadratic_term(judgement.confidence_correct)
        ));
    }
    out.push(format!(
        "{} {}",
        "Judged on".dimmed(),
        format_date(&judgement.created_at)
    ));
    Some(out.join("\n"))
}

/// Debate metadata shown above the transcript
pub fn debate_summary(debate: &Debate, hide_answers: bool) -> String {
    let mut out = vec![
        format!("{} {}", debate.name.bold().cyan(), format!("#{}", debate.id).dimmed()),
        format!(
            "{} {}",
            "Type:".dimmed(),
            policy::classify(debate, hide_answers)
        ),
        format!("{} {}", "Judge:".dimmed(), debate.user.display_name()),
        format!(
            "{} {}",
            "Turns used:".dimmed(),
            debate.transcript.round_count()
        ),
        format!(
            "{} {}",
            "Turns allowed:".dimmed(),
            debate
                .max_turns
                .map_or_else(|| "Unlimited".to_string(), |m| m.to_string())
        ),
        format!(
            "{} {}",
            "Minimum turns:".dimmed(),
            debate
                .min_turns
                .filter(|m| *m > 0)
                .map_or_else(|| "None".to_string(), |m| m.to_string())
        ),
    ];
    if policy::has_interactive_judge(debate) {
        out.push("Interactive".dimmed().to_string());
    }
    if let Some(experiment) = &debate.experiment {
        out.push(format!(
            "{} {}",
            "Experiment:".dimmed(),
            experiment.display_name()
        ));
    }
    out.join("\n")
}

fn shading_cell(debate: &Debate, hide_answers: bool) -> Cell {
    match policy::list_shading(debate, hide_answers) {
        Shading::Pending => Cell::new("Pending").fg(Color::Yellow),
        Shading::Neutral => Cell::new("Complete"),
        Shading::Correct | Shading::Incorrect => {
            let confidence = debate
                .judgement
                .as_ref()
                .map_or(0.0, |j| j.confidence_correct);
            let split = ConfidenceSplit::new(confidence, debate.transcript.swap);
            let color = if confidence > 50.0 {
                Color::Green
            } else {
                Color::Red
            };
            Cell::new(format!("A {:.0}% / B {:.0}%", split.a, split.b)).fg(color)
        }
    }
}

/// Debates as a table
pub fn debate_table<'a>(debates: impl IntoIterator<Item = &'a Debate>, hide_answers: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Question").fg(Color::Cyan),
            Cell::new("Type").fg(Color::Cyan),
            Cell::new("Turns").fg(Color::Cyan),
            Cell::new("Judgement").fg(Color::Cyan),
        ]);

    for debate in debates {
        let kind = policy::classify(debate, hide_answers).to_string();
        let kind = if policy::has_interactive_judge(debate) {
            format!("{kind}, Interactive")
        } else {
            kind
        };
        table.add_row(vec![
            Cell::new(debate.id).fg(Color::Green),
            Cell::new(&debate.name),
            Cell::new(&debate.transcript.question),
            Cell::new(kind),
            Cell::new(debate.transcript.round_count()),
            shading_cell(debate, hide_answers),
        ]);
    }
    table
}

/// Directory tree with row counts and creation dates
pub fn file_tree_block(tree: &FileTree) -> String {
    let (root, node) = tree.first_branch();
    let mut out = vec![root.bold().to_string()];
    tree_lines(node, 1, &mut out);
    out.join("\n")
}

fn tree_lines(tree: &FileTree, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (name, dir) in tree.directories() {
        out.push(format!(
            "{indent}{} {}/",
            dir.len().to_string().dimmed(),
            name.blue().bold()
        ));
        tree_lines(dir, depth + 1, out);
    }
    for (name, summary) in tree.files() {
        let rows = summary
            .row_count
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let hash = summary.file.short_hash().unwrap_or("--------");
        out.push(format!(
            "{indent}{} {name}  {}  {}",
            rows.dimmed(),
            format_date(&summary.file.created_at).dimmed(),
            hash.green()
        ));
    }
}

/// Stored transcript JSON, pretty-printed, with `truncate` keys elided
pub fn raw_transcript(raw: &str, truncate: &[&str]) -> String {
    let formatted = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(mut value) => {
            if let Some(object) = value.as_object_mut() {
                for key in truncate {
                    if let Some(v) = object.get_mut(*key) {
                        if is_truthy(v) {
                            *v = serde_json::Value::String("<TRUNCATED>".to_string());
                        }
                    }
                }
            }
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.to_string())
        }
        Err(_) => raw.to_string(),
    };
    formatted
        .replace("\\n\\n", "\n")
        .replace("\\n", "\n")
        .replace("\\\"", "\"")
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => true,
    }
}
