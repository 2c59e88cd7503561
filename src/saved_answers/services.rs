use tracing::info;
use uuid::Uuid;

use super::repo_types::{SavedAnswer, SavedAnswerFilter};
use crate::{
    error::AppError,
    ownership::require_owned,
    questions::services::owned_root,
    state::AppState,
};

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 500;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 50;

/// Trims, drops blanks and duplicates, keeps first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Result<Vec<String>, AppError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || out.iter().any(|t| t == tag) {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(AppError::Validation(format!(
                "Tags must be at most {MAX_TAG_LEN} characters"
            )));
        }
        out.push(tag.to_string());
    }
    if out.len() > MAX_TAGS {
        return Err(AppError::Validation(format!("At most {MAX_TAGS} tags allowed")));
    }
    Ok(out)
}

pub fn build_filter(
    limit: Option<i64>,
    query: Option<String>,
    tag: Option<String>,
) -> SavedAnswerFilter {
    let non_blank = |s: Option<String>| {
        s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    };
    let tag = non_blank(tag);
    let query = if tag.is_some() { None } else { non_blank(query) };
    SavedAnswerFilter {
        limit: limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT),
        query,
        tag,
    }
}

/// Saves the root of the thread containing `question_id`, with the root's answer as content.
pub async fn save(
    st: &AppState,
    user_id: Uuid,
    question_id: Uuid,
    tags: Vec<String>,
) -> Result<SavedAnswer, AppError> {
    let tags = normalize_tags(tags)?;
    let (question, root_id) = owned_root(st, user_id, question_id).await?;
    let root = if root_id == question.id {
        question
    } else {
        require_owned(st.questions.find(user_id, root_id).await?, user_id)?
    };

    let saved = st
        .saved_answers
        .save(user_id, root.id, &root.answer, &tags)
        .await?;
    info!(%user_id, saved_answer_id = %saved.id, question_id = %root.id, "answer saved");
    Ok(saved)
}

pub async fn get(st: &AppState, user_id: Uuid, id: Uuid) -> Result<SavedAnswer, AppError> {
    require_owned(st.saved_answers.find(user_id, id).await?, user_id)
}

pub async fn delete(st: &AppState, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
    let saved = get(st, user_id, id).await?;
    if !st.saved_answers.delete(user_id, saved.id).await? {
        return Err(AppError::NotFound("Saved answer"));
    }
    info!(%user_id, saved_answer_id = %id, "saved answer deleted");
    Ok(())
}
