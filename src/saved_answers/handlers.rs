use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{ListQuery, SaveAnswerRequest, SavedAnswerResponse, SavedAnswersList},
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
        .route("/saved-answers", get(list_saved).post(save_answer))
        .route("/saved-answers/tags", get(list_tags))
        .route("/saved-answers/:id", get(get_saved).delete(delete_saved))
}

#[instrument(skip(state, payload))]
pub async fn save_answer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<SaveAnswerRequest>,
) -> Result<(StatusCode, Json<SavedAnswerResponse>), AppError> {
    let saved = services::save(&state, user_id, payload.question_id, payload.tags).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

#[instrument(skip(state))]
pub async fn list_saved(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> Result<Json<SavedAnswersList>, AppError> {
    let filter = services::build_filter(q.limit, q.query, q.tag);
    let saved_answers: Vec<SavedAnswerResponse> = state
        .saved_answers
        .list(user_id, &filter)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(SavedAnswersList {
        total: saved_answers.len(),
        saved_answers,
    }))
}

#[instrument(skip(state))]
pub async fn list_tags(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.saved_answers.tags(user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_saved(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SavedAnswerResponse>, AppError> {
    Ok(Json(services::get(&state, user_id, id).await?.into()))
}

#[instrument(skip(state))]
pub async fn delete_saved(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
