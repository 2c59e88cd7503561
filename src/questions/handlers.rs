use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{AskRequest, AskResponse, HistoryQuery, HistoryResponse, ThreadResponse},
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::AppError,
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask))
        .route("/history", get(history))
        .route("/questions/:id/thread", get(thread))
}

#[instrument(skip(state, payload))]
pub async fn ask(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<AskRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let stored =
        services::ask(&state, user_id, &payload.question, payload.parent_question_id).await?;
    Ok(Json(AskResponse {
        answer: stored.answer,
        question_id: stored.id,
    }))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(q): ApiQuery<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let limit = services::clamp_history_limit(q.limit);
    let questions: Vec<_> = state
        .questions
        .history(user_id, limit)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(HistoryResponse {
        total: questions.len(),
        questions,
    }))
}

#[instrument(skip(state))]
pub async fn thread(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ThreadResponse>, AppError> {
    let (_, root) = services::owned_root(&state, user_id, id).await?;
    let thread = state.questions.thread(user_id, root).await?;
    Ok(Json(ThreadResponse {
        root_question_id: root,
        thread: thread.into_iter().map(Into::into).collect(),
    }))
}
