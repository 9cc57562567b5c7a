//! Differences between the playground and assigned experiment debates

use rostrum_core::{policy, Debate, JudgementRules};

/// Where a debate is being judged from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Self-started debates, no limits
    Playground,
    /// Debates assigned by an experiment
    Experiment,
}

impl Flow {
    /// The flow a debate belongs to
    pub fn of(debate: &Debate) -> Self {
        if debate.experiment.is_some() {
            Flow::Experiment
        } else {
            Flow::Playground
        }
    }

    pub fn judgement_rules(self) -> JudgementRules {
        match self {
            Flow::Playground => JudgementRules::default(),
            Flow::Experiment => JudgementRules::experiment(),
        }
    }

    /// Turn limit in force for `debate`
    pub fn max_turns(self, debate: &Debate) -> Option<u32> {
        match self {
            Flow::Playground => None,
            Flow::Experiment => debate.max_turns,
        }
    }

    /// Has `debate` used up its turns? Failed rounds don't count.
    pub fn turn_limit_reached(self, debate: &Debate) -> bool {
        self.max_turns(debate)
            .is_some_and(|max| max as usize <= debate.transcript.successful_rounds().count())
    }

    pub fn judge_messages_allowed(self, debate: &Debate) -> bool {
        match self {
            Flow::Playground => true,
            Flow::Experiment => policy::has_interactive_judge(debate),
        }
    }

    /// Should answers be hidden, given what the viewer asked for?
    ///
    /// Both flows hide them until the debate is judged.
    pub fn hide_answers(self, debate: &Debate, requested: bool) -> bool {
        match self {
            Flow::Playground => requested || !policy::is_complete(debate),
            Flow::Experiment => policy::effective_hide_answers(debate, requested),
        }
    }
}
