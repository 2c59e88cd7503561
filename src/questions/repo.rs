use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::questions::repo_types::Question;

/// Persistence for asked questions. Every query is scoped by owner.
#[async_trait]
pub trait QuestionRepo: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        parent_question_id: Option<Uuid>,
        question: &str,
        answer: &str,
    ) -> Result<Question, AppError>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Question>, AppError>;
    /// Newest first.
    async fn history(&self, user_id: Uuid, limit: i64) -> Result<Vec<Question>, AppError>;
    /// Follows the parent chain up to the question without a parent.
    async fn root_of(&self, user_id: Uuid, id: Uuid) -> Result<Option<Uuid>, AppError>;
    /// The root and all transitive follow-ups, ordered by depth then time.
    async fn thread(&self, user_id: Uuid, root_id: Uuid) -> Result<Vec<Question>, AppError>;
}

#[derive(Clone)]
pub struct PgQuestionRepo {
    db: PgPool,
}

impl PgQuestionRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuestionRepo for PgQuestionRepo {
    async fn create(
        &self,
        user_id: Uuid,
        parent_question_id: Option<Uuid>,
        question: &str,
        answer: &str,
    ) -> Result<Question, AppError> {
        let row = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (id, user_id, parent_question_id, question, answer)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, parent_question_id, question, answer, asked_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(parent_question_id) // Option<Uuid> → NULL allowed
        .bind(question)
        .bind(answer)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Question>, AppError> {
        let row = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, user_id, parent_question_id, question, answer, asked_at
            FROM questions
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn history(&self, user_id: Uuid, limit: i64) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, user_id, parent_question_id, question, answer, asked_at
            FROM questions
            WHERE user_id = $1
            ORDER BY asked_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn root_of(&self, user_id: Uuid, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let root = sqlx::query_scalar::<_, Uuid>(
            r#"
            WITH RECURSIVE chain AS (
                SELECT id, parent_question_id
                FROM questions
                WHERE id = $1 AND user_id = $2

                UNION ALL

                SELECT q.id, q.parent_question_id
                FROM questions q
                JOIN chain c ON q.id = c.parent_question_id
                WHERE q.user_id = $2
            )
            SELECT id FROM chain WHERE parent_question_id IS NULL
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(root)
    }

    async fn thread(&self, user_id: Uuid, root_id: Uuid) -> Result<Vec<Question>, AppError> {
        let rows = sqlx::query_as::<_, Question>(
            r#"
            WITH RECURSIVE thread AS (
                SELECT id, user_id, parent_question_id, question, answer, asked_at, 0 AS depth
                FROM questions
                WHERE id = $1 AND user_id = $2

                UNION ALL

                SELECT q.id, q.user_id, q.parent_question_id, q.question, q.answer, q.asked_at,
                       t.depth + 1
                FROM questions q
                JOIN thread t ON q.parent_question_id = t.id
                WHERE q.user_id = $2
            )
            SELECT id, user_id, parent_question_id, question, answer, asked_at
            FROM thread
            ORDER BY depth, asked_at
            "#,
        )
        .bind(root_id)
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
