use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{SavedAnswer, SavedAnswerFilter};
use crate::{db::like_pattern, error::AppError};

/// Persistence for saved answers. Every query is scoped by owner.
#[async_trait]
pub trait SavedAnswerRepo: Send + Sync {
    /// Inserts, or replaces content and tags of the existing (user, question) row.
    async fn save(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        content: &str,
        tags: &[String],
    ) -> Result<SavedAnswer, AppError>;
    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<SavedAnswer>, AppError>;
    /// Newest first.
    async fn list(
        &self,
        user_id: Uuid,
        filter: &SavedAnswerFilter,
    ) -> Result<Vec<SavedAnswer>, AppError>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    /// Distinct tags, sorted.
    async fn tags(&self, user_id: Uuid) -> Result<Vec<String>, AppError>;
}

#[derive(Clone)]
pub struct PgSavedAnswerRepo {
    db: PgPool,
}

impl PgSavedAnswerRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SavedAnswerRepo for PgSavedAnswerRepo {
    async fn save(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        content: &str,
        tags: &[String],
    ) -> Result<SavedAnswer, AppError> {
        let row = sqlx::query_as::<_, SavedAnswer>(
            r#"
            WITH saved AS (
                INSERT INTO saved_answers (id, user_id, question_id, content, tags)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (user_id, question_id) DO UPDATE
                SET content = EXCLUDED.content, tags = EXCLUDED.tags, saved_at = now()
                RETURNING id, user_id, question_id, content, tags, saved_at
            )
            SELECT s.id, s.user_id, s.question_id, q.question, s.content, s.tags, s.saved_at
            FROM saved s
            JOIN questions q ON q.id = s.question_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(question_id)
        .bind(content)
        .bind(tags)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<SavedAnswer>, AppError> {
        let row = sqlx::query_as::<_, SavedAnswer>(
            r#"
            SELECT sa.id, sa.user_id, sa.question_id, q.question, sa.content, sa.tags, sa.saved_at
            FROM saved_answers sa
            JOIN questions q ON q.id = sa.question_id
            WHERE sa.id = $1 AND sa.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(
        &self,
        user_id: Uuid,
        filter: &SavedAnswerFilter,
    ) -> Result<Vec<SavedAnswer>, AppError> {
        let pattern = filter.query.as_deref().map(like_pattern);
        let rows = sqlx::query_as::<_, SavedAnswer>(
            r#"
            SELECT sa.id, sa.user_id, sa.question_id, q.question, sa.content, sa.tags, sa.saved_at
            FROM saved_answers sa
            JOIN questions q ON q.id = sa.question_id
            WHERE sa.user_id = $1
              AND ($2::text IS NULL OR $2 = ANY(sa.tags))
              AND ($3::text IS NULL OR q.question ILIKE $3 OR sa.content ILIKE $3)
            ORDER BY sa.saved_at DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(filter.tag.as_deref())
        .bind(pattern)
        .bind(filter.limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let res = sqlx::query("DELETE FROM saved_answers WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn tags(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let tags = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT tag
            FROM saved_answers, unnest(tags) AS tag
            WHERE user_id = $1
            ORDER BY tag
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(tags)
    }
}
