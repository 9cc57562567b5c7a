//! Submitting human judgements

use rostrum_core::judgement::validate;
use rostrum_core::{Debate, JudgementDraft};

use crate::api::JudgementSubmission;
use crate::context::AppContext;
use crate::error::{ClientError, ClientResult};
use crate::flow::Flow;

/// Check and send the logged-in judge's verdict on `debate`.
///
/// Local checks run first; nothing is sent when any of them fails.
pub async fn submit_judgement(
    ctx: &AppContext,
    debate: &Debate,
    draft: &JudgementDraft,
) -> ClientResult<()> {
    let user = ctx.require_user()?;
    if !debate.is_owned_by(&user) {
        return Err(ClientError::Precondition(format!(
            "Waiting for {} to judge.",
            debate.user.display_name()
        )));
    }
    if debate.judgement.is_some() {
        return Err(ClientError::Precondition(
            "This debate has already been judged.".to_string(),
        ));
    }

    let rules = Flow::of(debate).judgement_rules();
    validate(debate, draft, rules, ctx.is_generating_turn())?;

    let submission = JudgementSubmission {
        confidence_correct: draft.confidence_correct,
        user_name: user.user_name.clone(),
        explanation: draft.explanation.trim().to_string(),
    };
    ctx.api().submit_judgement(debate.id, &submission).await?;

    tracing::info!(
        debate_id = debate.id,
        confidence_correct = draft.confidence_correct,
        "judgement submitted"
    );
    Ok(())
}
