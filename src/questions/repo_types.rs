use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::ownership::Owned;

/// A question and the answer it received.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub user_id: Uuid,
    pub parent_question_id: Option<Uuid>, // set on follow-ups
    pub question: String,
    pub answer: String,
    pub asked_at: OffsetDateTime,
}

impl Owned for Question {
    const KIND: &'static str = "Question";

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}
