use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use super::{
    dto::{
        CrossReferenceQuery, CrossReferenceResponse, LexiconQuery, ReadingPlanDetail,
        ReadingPlanQuery, TopicQuery, TopicSearchResponse,
    },
    repo_types::{LexiconEntry, ReadingPlan},
    services,
};
use crate::{
    error::AppError,
    extract::{ApiPath, ApiQuery},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/study/cross-references", get(cross_references))
        .route("/study/lexicon", get(lexicon))
        .route("/study/topics", get(search_topics))
        .route("/study/reading-plans", get(list_reading_plans))
        .route("/study/reading-plans/:slug", get(get_reading_plan))
}

#[instrument(skip(state))]
pub async fn cross_references(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<CrossReferenceQuery>,
) -> Result<Json<CrossReferenceResponse>, AppError> {
    let book = q.book.trim();
    if book.chars().count() < 2 {
        return Err(AppError::Validation("Book must be at least 2 characters".into()));
    }
    if q.chapter < 1 || q.verse < 1 {
        return Err(AppError::Validation("Chapter and verse must be positive".into()));
    }

    let data = state.study.cross_references(book, q.chapter, q.verse).await?;
    // stored as a JSON list; anything else counts as no references
    let references = match data {
        Some(serde_json::Value::Array(items)) => items,
        _ => Vec::new(),
    };
    debug!(book, chapter = q.chapter, verse = q.verse, count = references.len(), "cross references");

    Ok(Json(CrossReferenceResponse {
        book: book.to_string(),
        chapter: q.chapter,
        verse: q.verse,
        references,
    }))
}

#[instrument(skip(state))]
pub async fn lexicon(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<LexiconQuery>,
) -> Result<Json<LexiconEntry>, AppError> {
    let strongs = q.strongs.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let lemma = q.lemma.as_deref().map(str::trim).filter(|s| !s.is_empty());
    if strongs.is_none() && lemma.is_none() {
        return Err(AppError::Validation("Provide strongs or lemma".into()));
    }

    state
        .study
        .lexicon_entry(strongs, lemma)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Lexicon entry"))
}

#[instrument(skip(state))]
pub async fn search_topics(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<TopicQuery>,
) -> Result<Json<TopicSearchResponse>, AppError> {
    let res = services::search_topics(state.study.as_ref(), q.keyword.as_deref(), q.limit).await?;
    Ok(Json(res))
}

#[instrument(skip(state))]
pub async fn list_reading_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReadingPlan>>, AppError> {
    Ok(Json(state.study.reading_plans().await?))
}

#[instrument(skip(state))]
pub async fn get_reading_plan(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(q): ApiQuery<ReadingPlanQuery>,
) -> Result<Json<ReadingPlanDetail>, AppError> {
    let detail =
        services::reading_plan(state.study.as_ref(), &slug, q.days, q.start_date.as_deref())
            .await?;
    Ok(Json(detail))
}
