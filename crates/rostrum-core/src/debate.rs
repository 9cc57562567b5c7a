//! Debates, their judges and experiments

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timestamp;
use crate::transcript::Transcript;

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

impl User {
    /// Full name if known, otherwise the login name
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.user_name)
    }
}

/// A batch of debates assigned to judges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub public_name: Option<String>,
    pub give_judge_feedback: bool,
    #[serde(default, with = "timestamp::option")]
    pub starts_at: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp::option")]
    pub ends_at: Option<NaiveDateTime>,
}

impl Experiment {
    /// Name shown to judges
    pub fn display_name(&self) -> &str {
        self.public_name.as_deref().unwrap_or(&self.name)
    }
}

/// A human verdict on a debate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanJudgement {
    pub id: i64,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    /// Confidence (0-100) that the correct answer is right
    pub confidence_correct: f64,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl HumanJudgement {
    /// Did the judge lean towards the correct answer?
    pub fn is_correct(&self) -> bool {
        self.confidence_correct > 50.0
    }
}

/// How a debate is conducted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Two debaters argue opposite answers
    Debate,
    /// A single consultant argues one answer
    Consultancy,
    Baseline,
}

/// A debate with its transcript and optional judgement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub max_turns: Option<u32>,
    #[serde(default)]
    pub min_turns: Option<u32>,
    pub method: Method,
    #[serde(default)]
    pub config_path: String,
    #[serde(default)]
    pub allow_judge_interaction: bool,
    pub user: User,
    pub transcript: Transcript,
    #[serde(default)]
    pub judgement: Option<HumanJudgement>,
    #[serde(default)]
    pub experiment: Option<Experiment>,
}

impl Debate {
    /// Is `user` the judge this debate belongs to?
    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user.id == user.id
    }
}

/// A single debate as returned by the debate endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateDetail {
    #[serde(flatten)]
    pub debate: Debate,
    /// The stored transcript, serialized
    #[serde(default)]
    pub raw_transcript: String,
    #[serde(default)]
    pub next_debate_id: Option<i64>,
    #[serde(default)]
    pub debates_remaining: Option<u32>,
}

impl std::ops::Deref for DebateDetail {
    type Target = Debate;

    fn deref(&self) -> &Debate {
        &self.debate
    }
}

impl std::ops::DerefMut for DebateDetail {
    fn deref_mut(&mut self) -> &mut Debate {
        &mut self.debate
    }
}

/// Completed debates of one experiment
#[derive(Debug, Clone)]
pub struct ExperimentGroup {
    pub experiment: Experiment,
    pub debates: Vec<Debate>,
}

impl ExperimentGroup {
    /// Judged debates, most recently judged first
    pub fn judged(&self) -> Vec<&Debate> {
        let mut judged: Vec<&Debate> = self
            .debates
            .iter()
            .filter(|d| d.judgement.is_some())
            .collect();
        judged.sort_by_key(|d| std::cmp::Reverse(d.judgement.as_ref().map(|j| j.id)));
        judged
    }

    /// Confidence values of every judged debate
    pub fn confidences(&self) -> Vec<f64> {
        self.debates
            .iter()
            .filter_map(|d| d.judgement.as_ref().map(|j| j.confidence_correct))
            .collect()
    }
}

/// Group debates by experiment, newest experiment first.
///
/// Debates outside any experiment are skipped.
pub fn group_by_experiment(debates: Vec<Debate>) -> Vec<ExperimentGroup> {
    let mut groups: Vec<ExperimentGroup> = Vec::new();

    for debate in debates {
        let Some(experiment) = debate.experiment.clone() else {
            continue;
        };
        match groups.iter_mut().find(|g| g.experiment.id == experiment.id) {
            Some(group) => group.debates.push(debate),
            None => groups.push(ExperimentGroup {
                experiment,
                debates: vec![debate],
            }),
        }
    }

    groups.sort_by_key(|g| std::cmp::Reverse(g.experiment.id));
    groups
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::transcript::{Answers, Names, Round};

    pub fn user(id: i64) -> User {
        User {
            id,
            user_name: format!("judge{id}"),
            full_name: None,
            admin: false,
        }
    }

    pub fn judgement(id: i64, confidence_correct: f64) -> HumanJudgement {
        HumanJudgement {
            id,
            created_at: chrono::DateTime::from_timestamp(1_702_000_000, 0)
                .unwrap()
                .naive_utc(),
            confidence_correct,
            explanation: Some("seemed right".to_string()),
        }
    }

    pub fn experiment(id: i64, give_judge_feedback: bool) -> Experiment {
        Experiment {
            id,
            name: format!("exp-{id}"),
            public_name: None,
            give_judge_feedback,
            starts_at: None,
            ends_at: None,
        }
    }

    pub fn debate(method: Method) -> Debate {
        Debate {
            id: 1,
            name: "The Door".to_string(),
            max_turns: None,
            min_turns: None,
            method,
            config_path: "debaters/gpt4.yaml".to_string(),
            allow_judge_interaction: true,
            user: user(7),
            transcript: Transcript {
                question: "Who opened the door?".to_string(),
                answers: Answers {
                    correct: "The butler".to_string(),
                    incorrect: "The cook".to_string(),
                },
                names: Names {
                    correct: Some("Alice".to_string()),
                    incorrect: Some("Bob".to_string()),
                    ..Names::default()
                },
                rounds: vec![Round {
                    correct: Some("It was the butler".to_string()),
                    incorrect: Some("It was the cook".to_string()),
                    ..Round::default()
                }],
                ..Transcript::default()
            },
            judgement: None,
            experiment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_group_by_experiment() {
        let mut a = debate(Method::Debate);
        a.experiment = Some(experiment(1, true));
        a.judgement = Some(judgement(10, 80.0));
        let mut b = debate(Method::Consultancy);
        b.id = 2;
        b.experiment = Some(experiment(2, false));
        let mut c = debate(Method::Debate);
        c.id = 3;
        c.experiment = Some(experiment(1, true));
        c.judgement = Some(judgement(11, 20.0));
        let loose = debate(Method::Debate);

        let groups = group_by_experiment(vec![a, b, c, loose]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].experiment.id, 2);
        assert_eq!(groups[1].debates.len(), 2);

        let judged = groups[1].judged();
        assert_eq!(judged[0].id, 3);
        assert_eq!(groups[1].confidences(), vec![80.0, 20.0]);
    }

    #[test]
    fn test_detail_flattens_debate() {
        let json = serde_json::json!({
            "id": 4,
            "name": "Door",
            "max_turns": 3,
            "min_turns": null,
            "method": "consultancy",
            "config_path": "c.yaml",
            "allow_judge_interaction": false,
            "user": {"id": 1, "user_name": "sam", "full_name": "Sam Lee", "admin": true},
            "transcript": {
                "question": "Q",
                "answers": {"correct": "a", "incorrect": "b"},
                "names": {},
                "swap": false,
                "rounds": []
            },
            "judgement": {
                "id": 9,
                "created_at": "2023-12-08T11:17:00.123456",
                "confidence_correct": 65.0,
                "explanation": null
            },
            "experiment": null,
            "raw_transcript": "{}",
            "next_debate_id": 5,
            "debates_remaining": 2
        });
        let detail: DebateDetail = serde_json::from_value(json).unwrap();
        assert_eq!(detail.id, 4);
        assert_eq!(detail.method, Method::Consultancy);
        assert_eq!(detail.user.display_name(), "Sam Lee");
        assert!(detail.judgement.as_ref().unwrap().is_correct());
        assert_eq!(detail.next_debate_id, Some(5));
    }
}
