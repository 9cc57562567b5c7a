//! Which messages of a round are shown, where, and how they are marked
//!
//! Position A/B is decided by the transcript's `swap` flag alone; `seq` and
//! `sim` rounds differ only in whether the two debaters share a row.

use crate::transcript::{Answers, Names, Round, RoundKind};

/// On-screen position of a debater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    A,
    B,
}

impl Position {
    /// Position of the correct side
    pub fn of_correct(swap: bool) -> Self {
        if swap {
            Position::B
        } else {
            Position::A
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::A => "A",
            Position::B => "B",
        }
    }
}

/// Border accent of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accent {
    None,
    /// Correct debater, answers shown
    Correct,
    /// Incorrect debater (answers shown) or an error
    Incorrect,
    /// Judge or cross-examiner
    Moderator,
}

/// A message ready to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    pub label: String,
    pub content: &'a str,
    pub accent: Accent,
}

/// How the two debaters are arranged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebaterRows<'a> {
    /// One row, A left and B right
    SideBySide(Option<Message<'a>>, Option<Message<'a>>),
    /// A on one row, B on the next
    Stacked(Option<Message<'a>>, Option<Message<'a>>),
}

impl<'a> DebaterRows<'a> {
    /// Messages in A, B order
    pub fn in_order(&self) -> impl Iterator<Item = &Message<'a>> {
        let (a, b) = match self {
            DebaterRows::SideBySide(a, b) | DebaterRows::Stacked(a, b) => (a, b),
        };
        a.iter().chain(b.iter())
    }
}

/// All messages of one round, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundLayout<'a> {
    pub error: Option<Message<'a>>,
    pub judge: Option<Message<'a>>,
    pub cross_examiner: Option<Message<'a>>,
    pub debaters: DebaterRows<'a>,
}

impl<'a> RoundLayout<'a> {
    pub fn of(round: &'a Round, names: &Names, swap: bool, hide_answers: bool) -> Self {
        let error = round.error.as_deref().map(|content| Message {
            label: "Error".to_string(),
            content,
            accent: Accent::Incorrect,
        });

        let judge = round.judge.as_deref().map(|content| Message {
            label: names
                .judge
                .as_deref()
                .map_or_else(|| "Judge".to_string(), |n| format!("{n} (Judge)")),
            content,
            accent: Accent::Moderator,
        });

        let cross_examiner = speaker(
            round.cross_examiner.as_deref(),
            names.cross_examiner.as_deref(),
            Accent::Moderator,
        );

        let debater_accent = |accent| if hide_answers { Accent::None } else { accent };
        let correct = speaker(
            round.correct.as_deref(),
            names.correct.as_deref(),
            debater_accent(Accent::Correct),
        );
        let incorrect = speaker(
            round.incorrect.as_deref(),
            names.incorrect.as_deref(),
            debater_accent(Accent::Incorrect),
        );

        let (a, b) = if swap {
            (incorrect, correct)
        } else {
            (correct, incorrect)
        };
        let debaters = match round.kind {
            RoundKind::Seq => DebaterRows::Stacked(a, b),
            RoundKind::Sim => DebaterRows::SideBySide(a, b),
        };

        Self {
            error,
            judge,
            cross_examiner,
            debaters,
        }
    }

    /// Every message, top to bottom
    pub fn messages(&self) -> impl Iterator<Item = &Message<'a>> {
        self.error
            .iter()
            .chain(self.judge.iter())
            .chain(self.cross_examiner.iter())
            .chain(self.debaters.in_order())
    }
}

/// A debater is only shown when both their text and their name are known
fn speaker<'a>(content: Option<&'a str>, name: Option<&str>, accent: Accent) -> Option<Message<'a>> {
    match (content, name) {
        (Some(content), Some(name)) if !content.is_empty() && !name.is_empty() => Some(Message {
            label: name.to_string(),
            content,
            accent,
        }),
        _ => None,
    }
}

/// One candidate answer in the debate header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerLine<'a> {
    pub position: Position,
    pub answer: &'a str,
    pub name: Option<&'a str>,
    /// Known only when answers are shown
    pub is_correct: Option<bool>,
}

/// Header answer lines, in A, B order
pub fn answer_lines<'a>(
    answers: &'a Answers,
    names: &'a Names,
    swap: bool,
    hide_answers: bool,
) -> [AnswerLine<'a>; 2] {
    let reveal = |correct: bool| (!hide_answers).then_some(correct);
    let correct = AnswerLine {
        position: Position::of_correct(swap),
        answer: &answers.correct,
        name: names.correct.as_deref().filter(|n| !n.is_empty()),
        is_correct: reveal(true),
    };
    let incorrect = AnswerLine {
        position: if swap { Position::A } else { Position::B },
        answer: &answers.incorrect,
        name: names.incorrect.as_deref().filter(|n| !n.is_empty()),
        is_correct: reveal(false),
    };
    if swap {
        [incorrect, correct]
    } else {
        [correct, incorrect]
    }
}
