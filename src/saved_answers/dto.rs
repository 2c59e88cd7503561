use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::SavedAnswer;

#[derive(Debug, Deserialize)]
pub struct SaveAnswerRequest {
    pub question_id: Uuid,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub query: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedAnswerResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub question: String,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
}

impl From<SavedAnswer> for SavedAnswerResponse {
    fn from(s: SavedAnswer) -> Self {
        Self {
            id: s.id,
            question_id: s.question_id,
            question: s.question,
            content: s.content,
            tags: s.tags,
            saved_at: s.saved_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedAnswersList {
    pub saved_answers: Vec<SavedAnswerResponse>,
    pub total: usize,
}
