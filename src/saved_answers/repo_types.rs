use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ownership::Owned;

/// Saved answer joined with the text of its root question.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedAnswer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid, // always the root of a thread
    pub question: String,
    pub content: String, // answer text captured at save time
    pub tags: Vec<String>,
    pub saved_at: OffsetDateTime,
}

impl Owned for SavedAnswer {
    const KIND: &'static str = "Saved answer";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Listing filter; `tag` wins over `query` when both are given.
#[derive(Debug, Clone, Default)]
pub struct SavedAnswerFilter {
    pub limit: i64,
    pub query: Option<String>,
    pub tag: Option<String>,
}
