use time::{macros::format_description, Date, Duration};
use tracing::debug;

use super::{
    dto::{ReadingPlanDetail, ScheduledDay, TopicSearchResponse},
    repo::StudyRepo,
    repo_types::ReadingPlanDay,
};
use crate::error::AppError;

pub const DEFAULT_TOPIC_LIMIT: i64 = 10;
pub const MAX_TOPIC_LIMIT: i64 = 50;
pub const MIN_KEYWORD_LEN: usize = 2;

fn parse_start_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::Validation("start_date must be YYYY-MM-DD".into()))
}

/// Blank keywords count as absent.
pub fn normalize_keyword(keyword: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
        return Ok(None);
    };
    if keyword.chars().count() < MIN_KEYWORD_LEN {
        return Err(AppError::Validation(format!(
            "Keyword must be at least {MIN_KEYWORD_LEN} characters"
        )));
    }
    Ok(Some(keyword.to_string()))
}

pub async fn search_topics(
    study: &dyn StudyRepo,
    keyword: Option<&str>,
    limit: Option<i64>,
) -> Result<TopicSearchResponse, AppError> {
    let limit = limit.unwrap_or(DEFAULT_TOPIC_LIMIT);
    if !(1..=MAX_TOPIC_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "Limit must be 1 to {MAX_TOPIC_LIMIT}"
        )));
    }
    let keyword = normalize_keyword(keyword)?;
    let results = study.search_topics(keyword.as_deref(), limit).await?;
    Ok(TopicSearchResponse { keyword, results })
}

/// Day `n` of the schedule falls on `start + (n - 1)` days.
pub fn date_schedule(days: Vec<ReadingPlanDay>, start: Option<Date>) -> Vec<ScheduledDay> {
    days.into_iter()
        .enumerate()
        .map(|(idx, day)| ScheduledDay {
            scheduled_date: start
                .and_then(|d| d.checked_add(Duration::days(idx as i64)))
                .map(|d| d.to_string()),
            day_number: day.day_number,
            title: day.title,
            passage: day.passage,
            notes: day.notes,
            metadata: day.metadata,
        })
        .collect()
}

pub async fn reading_plan(
    study: &dyn StudyRepo,
    slug: &str,
    days: Option<i64>,
    start_date: Option<&str>,
) -> Result<ReadingPlanDetail, AppError> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(AppError::Validation("Plan slug is required".into()));
    }
    if days.is_some_and(|d| d < 1) {
        return Err(AppError::Validation("days must be at least 1".into()));
    }
    let start = start_date.map(parse_start_date).transpose()?;

    let plan = study
        .reading_plan(slug)
        .await?
        .ok_or(AppError::NotFound("Reading plan"))?;
    let max_days = days.map(|d| d.min(i64::from(plan.duration_days)).max(1));
    let schedule = study.plan_schedule(plan.id, max_days).await?;
    debug!(slug = %plan.slug, days = schedule.len(), "reading plan");

    Ok(ReadingPlanDetail {
        schedule: date_schedule(schedule, start),
        plan,
    })
}
