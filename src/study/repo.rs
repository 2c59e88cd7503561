use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{LexiconEntry, ReadingPlan, ReadingPlanDay, Topic};
use crate::error::AppError;

/// Read-only reference data.
#[async_trait]
pub trait StudyRepo: Send + Sync {
    /// Book is matched case-insensitively; `None` when no row exists.
    async fn cross_references(
        &self,
        book: &str,
        chapter: i32,
        verse: i32,
    ) -> Result<Option<serde_json::Value>, AppError>;
    async fn lexicon_entry(
        &self,
        strongs_number: Option<&str>,
        lemma: Option<&str>,
    ) -> Result<Option<LexiconEntry>, AppError>;
    /// Substring match on topic, summary or any keyword; `None` lists all. Ordered by topic.
    async fn search_topics(
        &self,
        keyword: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Topic>, AppError>;
    /// Ordered by name.
    async fn reading_plans(&self) -> Result<Vec<ReadingPlan>, AppError>;
    /// Slug is matched case-insensitively.
    async fn reading_plan(&self, slug: &str) -> Result<Option<ReadingPlan>, AppError>;
    /// Ordered by day number, at most `max_days` entries when given.
    async fn plan_schedule(
        &self,
        plan_id: i32,
        max_days: Option<i64>,
    ) -> Result<Vec<ReadingPlanDay>, AppError>;
}

#[derive(Clone)]
pub struct PgStudyRepo {
    db: PgPool,
}

impl PgStudyRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudyRepo for PgStudyRepo {
    async fn cross_references(
        &self,
        book: &str,
        chapter: i32,
        verse: i32,
    ) -> Result<Option<serde_json::Value>, AppError> {
        let data = sqlx::query_scalar::<_, serde_json::Value>(
            r#"
            SELECT reference_data
            FROM cross_references
            WHERE LOWER(book) = LOWER($1) AND chapter = $2 AND verse = $3
            LIMIT 1
            "#,
        )
        .bind(book)
        .bind(chapter)
        .bind(verse)
        .fetch_optional(&self.db)
        .await?;
        Ok(data)
    }

    async fn lexicon_entry(
        &self,
        strongs_number: Option<&str>,
        lemma: Option<&str>,
    ) -> Result<Option<LexiconEntry>, AppError> {
        let lemma = lemma.map(crate::db::like_pattern);
        let entry = sqlx::query_as::<_, LexiconEntry>(
            r#"
            SELECT strongs_number, lemma, transliteration, pronunciation, language,
                   definition, usage, reference_list, metadata
            FROM lexicon_entries
            WHERE ($1::text IS NULL OR LOWER(strongs_number) = LOWER($1))
              AND ($2::text IS NULL OR lemma ILIKE $2)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(strongs_number)
        .bind(lemma)
        .fetch_optional(&self.db)
        .await?;
        Ok(entry)
    }

    async fn search_topics(
        &self,
        keyword: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Topic>, AppError> {
        let pattern = keyword.map_or_else(|| "%".to_string(), crate::db::like_pattern);
        let rows = sqlx::query_as::<_, Topic>(
            r#"
            SELECT topic, summary, keywords, reference_entries
            FROM topic_index
            WHERE topic ILIKE $1
               OR summary ILIKE $1
               OR EXISTS (SELECT 1 FROM unnest(keywords) kw WHERE kw ILIKE $1)
            ORDER BY topic ASC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn reading_plans(&self) -> Result<Vec<ReadingPlan>, AppError> {
        let rows = sqlx::query_as::<_, ReadingPlan>(
            r#"
            SELECT id, slug, name, description, duration_days, metadata
            FROM reading_plans
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn reading_plan(&self, slug: &str) -> Result<Option<ReadingPlan>, AppError> {
        let row = sqlx::query_as::<_, ReadingPlan>(
            r#"
            SELECT id, slug, name, description, duration_days, metadata
            FROM reading_plans
            WHERE LOWER(slug) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn plan_schedule(
        &self,
        plan_id: i32,
        max_days: Option<i64>,
    ) -> Result<Vec<ReadingPlanDay>, AppError> {
        // LIMIT NULL is no limit
        let rows = sqlx::query_as::<_, ReadingPlanDay>(
            r#"
            SELECT day_number, title, passage, notes, metadata
            FROM reading_plan_entries
            WHERE plan_id = $1
            ORDER BY day_number ASC
            LIMIT $2
            "#,
        )
        .bind(plan_id)
        .bind(max_days)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
