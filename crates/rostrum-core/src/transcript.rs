//! Debate transcripts and their reversal

use serde::{Deserialize, Serialize};

use crate::swap::swap_substrings;

/// The two candidate answers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    pub correct: String,
    pub incorrect: String,
}

/// Display names for each role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Names {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_examiner: Option<String>,
}

impl Names {
    /// Both debater names, when both are present and non-empty
    pub fn debaters(&self) -> Option<(&str, &str)> {
        match (self.correct.as_deref(), self.incorrect.as_deref()) {
            (Some(c), Some(i)) if !c.is_empty() && !i.is_empty() => Some((c, i)),
            _ => None,
        }
    }
}

/// Round ordering hint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundKind {
    /// Both debaters speak simultaneously
    #[default]
    Sim,
    /// Debaters speak one after the other
    Seq,
}

/// One turn of the exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub judge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_examiner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: RoundKind,
}

impl Round {
    /// A round that failed to generate
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Did this round fail?
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Copy of this round with `a` and `b` swapped in every spoken text.
    ///
    /// `error` and `kind` are left untouched.
    pub fn with_names_swapped(&self, a: &str, b: &str) -> Self {
        let swap = |text: &Option<String>| text.as_deref().map(|t| swap_substrings(t, a, b));
        Self {
            correct: swap(&self.correct),
            incorrect: swap(&self.incorrect),
            judge: swap(&self.judge),
            cross_examiner: swap(&self.cross_examiner),
            error: self.error.clone(),
            kind: self.kind,
        }
    }
}

/// A full debate transcript
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    pub answers: Answers,
    #[serde(default)]
    pub names: Names,
    #[serde(default)]
    pub swap: bool,
    #[serde(default)]
    pub rounds: Vec<Round>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Vec<Round>>,
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Transcript {
    /// Invert which side is shown as A and which as B.
    ///
    /// The `swap` flag flips, the correct/incorrect display names are exchanged
    /// and the debater names are swapped inside every round's text so the
    /// arguments keep addressing the right speaker. Who actually said what,
    /// and which answer is correct, never changes. Rounds are left as-is when
    /// either debater name is missing.
    ///
    /// Applying it twice gives back the original transcript.
    pub fn reversed(&self) -> Self {
        let rounds = match self.names.debaters() {
            Some((correct, incorrect)) => self
                .rounds
                .iter()
                .map(|round| round.with_names_swapped(correct, incorrect))
                .collect(),
            None => self.rounds.clone(),
        };

        Self {
            names: Names {
                correct: self.names.incorrect.clone(),
                incorrect: self.names.correct.clone(),
                ..self.names.clone()
            },
            swap: !self.swap,
            rounds,
            ..self.clone()
        }
    }

    /// Number of rounds played
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Rounds that did not fail
    pub fn successful_rounds(&self) -> impl Iterator<Item = &Round> {
        self.rounds.iter().filter(|r| !r.is_error())
    }

    /// Look up a display hint in the free-form `extra` map
    pub fn extra_hint(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }
}
