use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Question;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub parent_question_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub question_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: Uuid,
    pub question: String,
    pub answer: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Question> for HistoryItem {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question: q.question,
            answer: Some(q.answer),
            created_at: q.asked_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub questions: Vec<HistoryItem>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: Uuid,
    pub parent_question_id: Option<Uuid>,
    pub question: String,
    pub answer: String,
    #[serde(with = "time::serde::rfc3339")]
    pub asked_at: OffsetDateTime,
}

impl From<Question> for ThreadMessage {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            parent_question_id: q.parent_question_id,
            question: q.question,
            answer: q.answer,
            asked_at: q.asked_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreadResponse {
    pub root_question_id: Uuid,
    pub thread: Vec<ThreadMessage>,
}
