use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Strong's-style lexicon entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LexiconEntry {
    pub strongs_number: String,
    pub lemma: String,
    pub transliteration: Option<String>,
    pub pronunciation: Option<String>,
    pub language: String,
    pub definition: String,
    pub usage: Option<String>,
    #[sqlx(rename = "reference_list")]
    pub references: serde_json::Value,
    pub metadata: Option<serde_json::Value>,
}

/// Entry of the topical index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Topic {
    pub topic: String,
    pub summary: Option<String>,
    pub keywords: Vec<String>,
    #[sqlx(rename = "reference_entries")]
    pub references: serde_json::Value,
}

/// Curated reading plan; days live in `ReadingPlanDay`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReadingPlan {
    #[serde(skip)]
    pub id: i32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_days: i32,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReadingPlanDay {
    pub day_number: i32,
    pub title: String,
    pub passage: String,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
}
