use tracing::{error, info};
use uuid::Uuid;

use super::answerer::{ChatMessage, Role};
use super::repo_types::Question;
use crate::{error::AppError, ownership::require_owned, state::AppState};

pub const MAX_QUESTION_LEN: usize = 1000;
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const MAX_HISTORY_LIMIT: i64 = 100;

pub fn clamp_history_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

/// Flattens a thread into alternating user/assistant turns, keeping the last `max` messages.
pub fn conversation_history(thread: &[Question], max: usize) -> Vec<ChatMessage> {
    let messages: Vec<ChatMessage> = thread
        .iter()
        .flat_map(|q| {
            [
                ChatMessage::new(Role::User, q.question.clone()),
                ChatMessage::new(Role::Assistant, q.answer.clone()),
            ]
        })
        .collect();
    let skip = messages.len().saturating_sub(max);
    messages.into_iter().skip(skip).collect()
}

/// Loads a caller-owned question and the root of its thread.
pub async fn owned_root(
    st: &AppState,
    user_id: Uuid,
    question_id: Uuid,
) -> Result<(Question, Uuid), AppError> {
    let question = require_owned(st.questions.find(user_id, question_id).await?, user_id)?;
    let root = st
        .questions
        .root_of(user_id, question.id)
        .await?
        .unwrap_or(question.id);
    Ok((question, root))
}

/// Gets an answer for the question and stores both. Nothing is stored when the
/// answer client fails.
pub async fn ask(
    st: &AppState,
    user_id: Uuid,
    question: &str,
    parent_question_id: Option<Uuid>,
) -> Result<Question, AppError> {
    let question = question.trim();
    let len = question.chars().count();
    if len == 0 || len > MAX_QUESTION_LEN {
        return Err(AppError::Validation(format!(
            "Question must be 1 to {MAX_QUESTION_LEN} characters"
        )));
    }

    let history = match parent_question_id {
        Some(parent_id) => {
            let (_, root) = owned_root(st, user_id, parent_id).await?;
            let thread = st.questions.thread(user_id, root).await?;
            conversation_history(&thread, st.config.openai.max_history_messages)
        }
        None => Vec::new(),
    };

    let answer = st.answerer.answer(question, &history).await.map_err(|e| {
        error!(error = ?e, %user_id, "answer client failed");
        AppError::UpstreamUnavailable("AI service unavailable".into())
    })?;

    let stored = st
        .questions
        .create(user_id, parent_question_id, question, &answer)
        .await?;
    info!(%user_id, question_id = %stored.id, follow_up = parent_question_id.is_some(), "question answered");
    Ok(stored)
}
