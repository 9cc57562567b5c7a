//! What a viewer may be told about a debate
//!
//! Ground truth (which answer is correct, whether the judge got it right) must
//! not leak to a judge whose experiment withholds feedback. Every check here is
//! a pure function of the debate.

use std::fmt;

use crate::debate::{Debate, Method};

/// Has a judgement been recorded?
pub fn is_complete(debate: &Debate) -> bool {
    debate.judgement.is_some()
}

/// Are two debaters arguing, rather than a single consultant?
pub fn is_two_sided(debate: &Debate) -> bool {
    debate.method == Method::Debate
}

/// May the judge message the debaters between turns?
pub fn has_interactive_judge(debate: &Debate) -> bool {
    debate.allow_judge_interaction
}

/// May correctness ever be shown for this debate?
///
/// Always true outside experiments; inside one it is the experiment's call.
/// Independent of the viewer's own "hide answers" choice.
pub fn should_show_feedback(debate: &Debate) -> bool {
    debate
        .experiment
        .as_ref()
        .map_or(true, |e| e.give_judge_feedback)
}

/// Whether answers end up hidden in the experiment flow.
///
/// Answers stay hidden until the debate is judged, and for good when the
/// experiment gives no feedback.
pub fn effective_hide_answers(debate: &Debate, requested: bool) -> bool {
    requested || !is_complete(debate) || !should_show_feedback(debate)
}

/// Label describing a debate's format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebateType {
    Debate,
    Consultancy,
    HonestConsultancy,
    DishonestConsultancy,
}

impl DebateType {
    pub fn label(self) -> &'static str {
        match self {
            DebateType::Debate => "Debate",
            DebateType::Consultancy => "Consultancy",
            DebateType::HonestConsultancy => "Honest Consultancy",
            DebateType::DishonestConsultancy => "Dishonest Consultancy",
        }
    }
}

impl fmt::Display for DebateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a debate for display.
///
/// A consultancy only reveals whether its consultant argued the correct answer
/// once it is judged, answers are shown, and feedback is allowed. Until then it
/// is reported as a plain `Consultancy`.
pub fn classify(debate: &Debate, hide_answers: bool) -> DebateType {
    if is_two_sided(debate) {
        return DebateType::Debate;
    }
    if is_complete(debate) && !hide_answers && should_show_feedback(debate) {
        let correct_name = debate.transcript.names.correct.as_deref();
        if correct_name.is_some_and(|name| !name.is_empty()) {
            DebateType::HonestConsultancy
        } else {
            DebateType::DishonestConsultancy
        }
    } else {
        DebateType::Consultancy
    }
}

/// Shading of a debate in a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Not judged yet
    Pending,
    /// Judged, but correctness is withheld
    Neutral,
    /// Judge leaned towards the correct answer
    Correct,
    /// Judge leaned towards the incorrect answer (or sat on the fence)
    Incorrect,
}

pub fn list_shading(debate: &Debate, hide_answers: bool) -> Shading {
    match &debate.judgement {
        None => Shading::Pending,
        Some(_) if hide_answers || !should_show_feedback(debate) => Shading::Neutral,
        Some(j) if j.confidence_correct > 50.0 => Shading::Correct,
        Some(_) => Shading::Incorrect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::fixtures::*;

    #[test]
    fn test_feedback_without_experiment() {
        let d = debate(Method::Debate);
        assert!(should_show_feedback(&d));
    }

    #[test]
    fn test_feedback_follows_experiment() {
        let mut d = debate(Method::Debate);
        d.experiment = Some(experiment(1, false));
        assert!(!should_show_feedback(&d));
        d.experiment = Some(experiment(1, true));
        assert!(should_show_feedback(&d));
    }

    #[test]
    fn test_two_sided() {
        assert!(is_two_sided(&debate(Method::Debate)));
        assert!(!is_two_sided(&debate(Method::Consultancy)));
        assert!(!is_two_sided(&debate(Method::Baseline)));
    }

    #[test]
    fn test_classify_debate() {
        let d = debate(Method::Debate);
        assert_eq!(classify(&d, false), DebateType::Debate);
        assert_eq!(classify(&d, true), DebateType::Debate);
    }

    #[test]
    fn test_classify_incomplete_consultancy_never_leaks() {
        let d = debate(Method::Consultancy);
        assert_eq!(classify(&d, false), DebateType::Consultancy);
        assert_eq!(classify(&d, true), DebateType::Consultancy);
    }

    #[test]
    fn test_classify_complete_consultancy() {
        let mut d = debate(Method::Consultancy);
        d.judgement = Some(judgement(1, 70.0));
        assert_eq!(classify(&d, false), DebateType::HonestConsultancy);
        assert_eq!(classify(&d, true), DebateType::Consultancy);

        d.transcript.names.correct = None;
        assert_eq!(classify(&d, false), DebateType::DishonestConsultancy);
        assert_eq!(classify(&d, false).to_string(), "Dishonest Consultancy");

        d.transcript.names.correct = Some(String::new());
        assert_eq!(classify(&d, false), DebateType::DishonestConsultancy);

        d.experiment = Some(experiment(1, false));
        assert_eq!(classify(&d, false), DebateType::Consultancy);
    }

    #[test]
    fn test_effective_hide_answers() {
        let mut d = debate(Method::Debate);
        d.experiment = Some(experiment(1, true));
        assert!(effective_hide_answers(&d, false));
        d.judgement = Some(judgement(1, 70.0));
        assert!(!effective_hide_answers(&d, false));
        assert!(effective_hide_answers(&d, true));
        d.experiment = Some(experiment(1, false));
        assert!(effective_hide_answers(&d, false));
    }

    #[test]
    fn test_list_shading() {
        let mut d = debate(Method::Debate);
        assert_eq!(list_shading(&d, false), Shading::Pending);
        d.judgement = Some(judgement(1, 50.0));
        assert_eq!(list_shading(&d, false), Shading::Incorrect);
        assert_eq!(list_shading(&d, true), Shading::Neutral);
        d.judgement = Some(judgement(1, 55.0));
        assert_eq!(list_shading(&d, false), Shading::Correct);
    }
}
