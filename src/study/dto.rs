use serde::{Deserialize, Serialize};

use super::repo_types::{ReadingPlan, Topic};

#[derive(Debug, Deserialize)]
pub struct CrossReferenceQuery {
    pub book: String,
    pub chapter: i32,
    pub verse: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CrossReferenceResponse {
    pub book: String,
    pub chapter: i32,
    pub verse: i32,
    pub references: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct LexiconQuery {
    pub strongs: Option<String>,
    pub lemma: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopicQuery {
    pub keyword: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicSearchResponse {
    pub keyword: Option<String>,
    pub results: Vec<Topic>,
}

#[derive(Debug, Deserialize)]
pub struct ReadingPlanQuery {
    pub days: Option<i64>,
    pub start_date: Option<String>,
}

/// A plan day with its calendar date when a start date was given.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduledDay {
    pub day_number: i32,
    pub title: String,
    pub passage: String,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
    pub scheduled_date: Option<String>, // YYYY-MM-DD
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadingPlanDetail {
    pub plan: ReadingPlan,
    pub schedule: Vec<ScheduledDay>,
}
