//! Drafting a judgement before it is submitted
//!
//! Judges state their confidence per on-screen position (A/B); the backend
//! stores confidence in the correct answer. The `swap` flag maps between them.

use thiserror::Error;

use crate::debate::Debate;

/// Lowest confidence the slider allows for either position
pub const SLIDER_MIN: u8 = 5;
/// Highest confidence the slider allows for either position
pub const SLIDER_MAX: u8 = 95;
/// Slider granularity
pub const SLIDER_STEP: u8 = 5;

/// Confidence per on-screen position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceSplit {
    pub a: f64,
    pub b: f64,
}

impl ConfidenceSplit {
    /// Split confidence in the correct answer into A/B shares
    pub fn new(confidence_correct: f64, swap: bool) -> Self {
        let incorrect = 100.0 - confidence_correct;
        if swap {
            Self {
                a: incorrect,
                b: confidence_correct,
            }
        } else {
            Self {
                a: confidence_correct,
                b: incorrect,
            }
        }
    }

    /// Flex weights for a two-part bar; each side keeps at least 15%
    pub fn bar_weights(&self) -> (f64, f64) {
        (self.a.clamp(15.0, 85.0), self.b.clamp(15.0, 85.0))
    }
}

/// Snap a slider reading to the allowed range and step
pub fn snap_slider(value: u8) -> u8 {
    let clamped = value.clamp(SLIDER_MIN, SLIDER_MAX);
    let rounded = (clamped + SLIDER_STEP / 2) / SLIDER_STEP * SLIDER_STEP;
    rounded.clamp(SLIDER_MIN, SLIDER_MAX)
}

/// Confidence in the correct answer given the slider's confidence in B
pub fn confidence_correct_from_b(confidence_b: u8, swap: bool) -> u8 {
    let b = snap_slider(confidence_b);
    if swap {
        b
    } else {
        100 - b
    }
}

/// A judgement being prepared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgementDraft {
    pub confidence_correct: u8,
    pub explanation: String,
}

impl Default for JudgementDraft {
    fn default() -> Self {
        Self {
            confidence_correct: 50,
            explanation: String::new(),
        }
    }
}

/// Extra requirements some flows put on a judgement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JudgementRules {
    /// A written explanation must be given
    pub explanation_required: bool,
    /// 50/50 is not an answer
    pub commitment_required: bool,
}

impl JudgementRules {
    /// Rules for assigned experiment debates
    pub fn experiment() -> Self {
        Self {
            explanation_required: true,
            commitment_required: true,
        }
    }
}

/// Why a judgement cannot be submitted yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JudgementRejection {
    #[error("50/50 splits are not allowed. Please choose which answer you think is more likely to be correct, even if you are uncertain.")]
    Uncommitted,
    #[error("Please provide an explanation for your judgement.")]
    MissingExplanation,
    #[error("Must have at least one round to judge debate.")]
    NoRounds,
    #[error("Cannot submit judgement while generating a new turn.")]
    TurnInProgress,
    #[error("Please create another turn first. This debate requires that you use at least {0} turns before submitting a judgement.")]
    TooFewTurns(u32),
}

/// Check a draft against the debate's state, reporting the first problem
pub fn validate(
    debate: &Debate,
    draft: &JudgementDraft,
    rules: JudgementRules,
    generating_turn: bool,
) -> Result<(), JudgementRejection> {
    if rules.commitment_required && draft.confidence_correct == 50 {
        return Err(JudgementRejection::Uncommitted);
    }
    if rules.explanation_required && draft.explanation.trim().is_empty() {
        return Err(JudgementRejection::MissingExplanation);
    }
    let rounds = debate.transcript.round_count();
    if rounds == 0 {
        return Err(JudgementRejection::NoRounds);
    }
    if generating_turn {
        return Err(JudgementRejection::TurnInProgress);
    }
    match debate.min_turns {
        Some(min) if min > 0 && rounds < min as usize => Err(JudgementRejection::TooFewTurns(min)),
        _ => Ok(()),
    }
}
