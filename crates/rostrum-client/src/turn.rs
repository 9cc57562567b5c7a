//! Generating new debate turns

use std::time::Duration;

use rostrum_core::format::thinking_message;
use rostrum_core::{DebateDetail, Round, RoundKind};

use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::flow::Flow;

/// A fresh debate with no rounds starts its first turn without being asked
pub fn needs_first_turn(debate: &DebateDetail) -> bool {
    debate.transcript.rounds.is_empty() && debate.judgement.is_none()
}

/// Refuse a turn the debate cannot take
fn check_turn_allowed(
    ctx: &AppContext,
    debate: &DebateDetail,
    flow: Flow,
    judge_message: Option<&str>,
) -> ClientResult<()> {
    let user = ctx.require_user()?;
    if !debate.is_owned_by(&user) {
        return Err(ClientError::Precondition(format!(
            "Only {} can continue this debate.",
            debate.user.display_name()
        )));
    }
    if debate.judgement.is_some() {
        return Err(ClientError::Precondition(
            "This debate has already been judged.".to_string(),
        ));
    }
    if flow.turn_limit_reached(debate) {
        return Err(ClientError::Precondition("Turn limit reached.".to_string()));
    }
    if judge_message.is_some() && !flow.judge_messages_allowed(debate) {
        return Err(ClientError::Precondition(
            "Judge interaction disabled for this debate.".to_string(),
        ));
    }
    Ok(())
}

fn show_placeholder(debate: &mut DebateDetail, elapsed_seconds: u64) {
    let message = thinking_message(elapsed_seconds);
    if let Some(round) = debate.transcript.rounds.last_mut() {
        round.correct = Some(message.clone());
        round.incorrect = Some(message);
    }
}

/// Ask the debaters for the next round.
///
/// While the request runs, the new round shows an elapsed-time placeholder
/// and `on_progress` is called with the debate once a second. On success the
/// debate is replaced by the server's copy. On failure the placeholder
/// becomes an error round, which the next turn clears.
pub async fn run_turn<F>(
    ctx: &AppContext,
    debate: &mut DebateDetail,
    judge_message: Option<&str>,
    mut on_progress: F,
) -> ClientResult<()>
where
    F: FnMut(&DebateDetail),
{
    let judge_message = judge_message.map(str::trim).filter(|m| !m.is_empty());
    let flow = Flow::of(debate);
    check_turn_allowed(ctx, debate, flow, judge_message)?;
    let _guard = ctx.begin_turn()?;

    debate.transcript.rounds.retain(|r| !r.is_error());
    debate.transcript.rounds.push(Round {
        correct: Some(String::new()),
        incorrect: Some(String::new()),
        judge: judge_message.map(str::to_owned),
        kind: RoundKind::Sim,
        ..Round::default()
    });

    let mut elapsed = 0;
    show_placeholder(debate, elapsed);
    on_progress(&*debate);

    tracing::debug!(debate_id = debate.id, "requesting new turn");
    let request = ctx.api().create_turn(debate.id, judge_message);
    tokio::pin!(request);

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // The first tick completes immediately
    ticker.tick().await;

    let result = loop {
        tokio::select! {
            result = &mut request => break result,
            _ = ticker.tick() => {
                elapsed += 1;
                show_placeholder(debate, elapsed);
                on_progress(&*debate);
            }
        }
    };

    match result {
        Ok(updated) => {
            tracing::info!(
                debate_id = updated.id,
                rounds = updated.transcript.round_count(),
                "turn generated"
            );
            *debate = updated;
            Ok(())
        }
        Err(e) => {
            tracing::warn!(debate_id = debate.id, error = %e, "turn failed");
            debate.transcript.rounds.pop();
            debate.transcript.rounds.push(Round::failed(e.to_string()));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rostrum_core::{Debate, Experiment, Method, Names, Transcript, User};

    use super::*;
    use crate::mock::MockApi;
    use crate::session::SessionStore;

    fn judge() -> User {
        User {
            id: 7,
            user_name: "judge".to_string(),
            full_name: Some("Jo Judge".to_string()),
            admin: false,
        }
    }

    fn detail(rounds: Vec<Round>) -> DebateDetail {
        DebateDetail {
            debate: Debate {
                id: 1,
                name: "Door".to_string(),
                max_turns: None,
                min_turns: None,
                method: Method::Debate,
                config_path: "debaters.yaml".to_string(),
                allow_judge_interaction: true,
                user: judge(),
                transcript: Transcript {
                    question: "Who opened the door?".to_string(),
                    names: Names {
                        correct: Some("Alice".to_string()),
                        incorrect: Some("Bob".to_string()),
                        ..Names::default()
                    },
                    rounds,
                    ..Transcript::default()
                },
                judgement: None,
                experiment: None,
            },
            raw_transcript: String::new(),
            next_debate_id: None,
            debates_remaining: None,
        }
    }

    async fn logged_in(api: MockApi) -> (AppContext, Arc<MockApi>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(api.with_user(judge()));
        let ctx = AppContext::new(api.clone(), SessionStore::new(dir.path().join("s.json")));
        ctx.login("judge").await.unwrap();
        (ctx, api, dir)
    }

    #[tokio::test]
    async fn test_turn_replaces_debate_on_success() {
        let start = detail(vec![Round::failed("HTTP Error: 500 - boom")]);
        let (ctx, _api, _dir) = logged_in(MockApi::new().with_debate(detail(vec![]))).await;

        let mut debate = start;
        let mut seen = Vec::new();
        run_turn(&ctx, &mut debate, Some("  Why the butler? "), |d| {
            seen.push(d.transcript.rounds.clone())
        })
        .await
        .unwrap();

        assert_eq!(debate.transcript.rounds.len(), 1);
        assert_eq!(debate.transcript.rounds[0].judge.as_deref(), Some("Why the butler?"));
        assert!(!ctx.is_generating_turn());

        // The error round was dropped before the placeholder appeared
        let first = &seen[0];
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].correct, Some(thinking_message(0)));
        assert!(!first[0].is_error());
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_error_round() {
        let existing = Round {
            correct: Some("It was the butler".to_string()),
            incorrect: Some("It was the cook".to_string()),
            ..Round::default()
        };
        let api = MockApi::new();
        api.push_turn(Err(ClientError::Api {
            status: 500,
            message: "Debater timed out".to_string(),
        }));
        let (ctx, _api, _dir) = logged_in(api).await;

        let mut debate = detail(vec![existing.clone()]);
        let err = run_turn(&ctx, &mut debate, None, |_| {}).await.unwrap_err();

        assert_eq!(err.to_string(), "HTTP Error: 500 - Debater timed out");
        assert_eq!(debate.transcript.rounds.len(), 2);
        assert_eq!(debate.transcript.rounds[0], existing);
        assert_eq!(
            debate.transcript.rounds[1].error.as_deref(),
            Some("HTTP Error: 500 - Debater timed out")
        );
        assert!(!ctx.is_generating_turn());
    }

    #[tokio::test]
    async fn test_placeholder_ticks_while_waiting() {
        let api = MockApi::new()
            .with_debate(detail(vec![]))
            .with_turn_delay(Duration::from_millis(1500));
        let (ctx, _api, _dir) = logged_in(api).await;

        let mut debate = detail(vec![]);
        let mut placeholders = Vec::new();
        run_turn(&ctx, &mut debate, None, |d| {
            placeholders.push(d.transcript.rounds[0].correct.clone().unwrap_or_default())
        })
        .await
        .unwrap();

        assert!(placeholders.len() >= 2);
        assert!(placeholders[1].starts_with("Thinking... (0:01)"));
    }

    #[tokio::test]
    async fn test_turn_limit_refused_in_experiments() {
        let (ctx, _api, _dir) = logged_in(MockApi::new()).await;
        let mut debate = detail(vec![Round::default()]);
        debate.max_turns = Some(1);
        debate.experiment = Some(Experiment {
            id: 1,
            name: "exp".to_string(),
            public_name: None,
            give_judge_feedback: true,
            starts_at: None,
            ends_at: None,
        });

        let err = run_turn(&ctx, &mut debate, None, |_| {}).await.unwrap_err();
        assert_eq!(err.to_string(), "Turn limit reached.");
        assert_eq!(debate.transcript.rounds.len(), 1);

        debate.max_turns = Some(2);
        debate.allow_judge_interaction = false;
        let err = run_turn(&ctx, &mut debate, Some("hello"), |_| {})
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Judge interaction disabled for this debate.");
    }

    #[tokio::test]
    async fn test_only_owner_may_continue() {
        let (ctx, _api, _dir) = logged_in(MockApi::new()).await;
        let mut debate = detail(vec![]);
        debate.user.id = 99;
        debate.user.full_name = Some("Someone Else".to_string());

        let err = run_turn(&ctx, &mut debate, None, |_| {}).await.unwrap_err();
        assert_eq!(err.to_string(), "Only Someone Else can continue this debate.");
    }

    #[test]
    fn test_needs_first_turn() {
        assert!(needs_first_turn(&detail(vec![])));
        assert!(!needs_first_turn(&detail(vec![Round::default()])));
    }
}
