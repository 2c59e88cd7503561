//! In-process store backing `AppState::fake()`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{repo::UserRepo, repo_types::User},
    error::AppError,
    questions::{repo::QuestionRepo, repo_types::Question},
    saved_answers::{
        repo::SavedAnswerRepo,
        repo_types::{SavedAnswer, SavedAnswerFilter},
    },
    study::{
        repo::StudyRepo,
        repo_types::{LexiconEntry, ReadingPlan, ReadingPlanDay, Topic},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    seq: u64,
    users: Vec<User>,
    // (insertion sequence, row)
    questions: Vec<(u64, Question)>,
    saved: Vec<(u64, SavedAnswer)>,
    cross_references: HashMap<(String, i32, i32), serde_json::Value>,
    lexicon: Vec<LexiconEntry>,
    topics: Vec<Topic>,
    plans: Vec<(ReadingPlan, Vec<ReadingPlanDay>)>,
}

impl Inner {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn question(&self, user_id: Uuid, id: Uuid) -> Option<&Question> {
        self.questions
            .iter()
            .map(|(_, q)| q)
            .find(|q| q.id == id && q.user_id == user_id)
    }

    fn with_question_text(&self, mut saved: SavedAnswer) -> SavedAnswer {
        if let Some(q) = self.question(saved.user_id, saved.question_id) {
            saved.question = q.question.clone();
        }
        saved
    }
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn seed_cross_references(
        &self,
        book: &str,
        chapter: i32,
        verse: i32,
        data: serde_json::Value,
    ) {
        self.lock()
            .cross_references
            .insert((book.to_lowercase(), chapter, verse), data);
    }

    pub fn seed_lexicon(&self, entry: LexiconEntry) {
        self.lock().lexicon.push(entry);
    }

    pub fn seed_topic(&self, topic: Topic) {
        self.lock().topics.push(topic);
    }

    /// Assigns the plan id; days may be given in any order.
    pub fn seed_reading_plan(&self, mut plan: ReadingPlan, days: Vec<ReadingPlanDay>) {
        let mut inner = self.lock();
        plan.id = inner.plans.len() as i32 + 1;
        inner.plans.push((plan, days));
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(AppError::DuplicateResource("Email already registered".into()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.password_hash = password_hash.to_string();
        }
        Ok(())
    }

    async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.is_active = false;
        }
        Ok(())
    }
}

#[async_trait]
impl QuestionRepo for MemoryStore {
    async fn create(
        &self,
        user_id: Uuid,
        parent_question_id: Option<Uuid>,
        question: &str,
        answer: &str,
    ) -> Result<Question, AppError> {
        let mut inner = self.lock();
        let row = Question {
            id: Uuid::new_v4(),
            user_id,
            parent_question_id,
            question: question.to_string(),
            answer: answer.to_string(),
            asked_at: OffsetDateTime::now_utc(),
        };
        let seq = inner.next_seq();
        inner.questions.push((seq, row.clone()));
        Ok(row)
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<Question>, AppError> {
        Ok(self.lock().question(user_id, id).cloned())
    }

    async fn history(&self, user_id: Uuid, limit: i64) -> Result<Vec<Question>, AppError> {
        let inner = self.lock();
        let mut rows: Vec<&(u64, Question)> = inner
            .questions
            .iter()
            .filter(|(_, q)| q.user_id == user_id)
            .collect();
        rows.sort_by(|a, b| (b.1.asked_at, b.0).cmp(&(a.1.asked_at, a.0)));
        Ok(rows
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|(_, q)| q.clone())
            .collect())
    }

    async fn root_of(&self, user_id: Uuid, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let inner = self.lock();
        let mut current = inner.question(user_id, id);
        // bounded by the number of rows in case of a cycle
        for _ in 0..=inner.questions.len() {
            match current {
                None => return Ok(None),
                Some(q) => match q.parent_question_id {
                    None => return Ok(Some(q.id)),
                    Some(parent) => current = inner.question(user_id, parent),
                },
            }
        }
        Ok(None)
    }

    async fn thread(&self, user_id: Uuid, root_id: Uuid) -> Result<Vec<Question>, AppError> {
        let inner = self.lock();
        let Some(root) = inner.question(user_id, root_id) else {
            return Ok(Vec::new());
        };

        let mut out: Vec<Question> = vec![root.clone()];
        let mut frontier = vec![root.id];
        while !frontier.is_empty() {
            let mut level: Vec<&(u64, Question)> = inner
                .questions
                .iter()
                .filter(|(_, q)| {
                    q.user_id == user_id
                        && q.parent_question_id.is_some_and(|p| frontier.contains(&p))
                        && !out.iter().any(|seen| seen.id == q.id)
                })
                .collect();
            level.sort_by(|a, b| (a.1.asked_at, a.0).cmp(&(b.1.asked_at, b.0)));
            frontier = level.iter().map(|(_, q)| q.id).collect();
            out.extend(level.into_iter().map(|(_, q)| q.clone()));
        }
        Ok(out)
    }
}

#[async_trait]
impl SavedAnswerRepo for MemoryStore {
    async fn save(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        content: &str,
        tags: &[String],
    ) -> Result<SavedAnswer, AppError> {
        let mut inner = self.lock();
        let seq = inner.next_seq();
        let now = OffsetDateTime::now_utc();

        let existing = inner
            .saved
            .iter_mut()
            .find(|(_, s)| s.user_id == user_id && s.question_id == question_id);
        let row = match existing {
            Some((row_seq, s)) => {
                *row_seq = seq;
                s.content = content.to_string();
                s.tags = tags.to_vec();
                s.saved_at = now;
                s.clone()
            }
            None => {
                let s = SavedAnswer {
                    id: Uuid::new_v4(),
                    user_id,
                    question_id,
                    question: String::new(),
                    content: content.to_string(),
                    tags: tags.to_vec(),
                    saved_at: now,
                };
                inner.saved.push((seq, s.clone()));
                s
            }
        };
        Ok(inner.with_question_text(row))
    }

    async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Option<SavedAnswer>, AppError> {
        let inner = self.lock();
        let row = inner
            .saved
            .iter()
            .map(|(_, s)| s)
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned();
        Ok(row.map(|s| inner.with_question_text(s)))
    }

    async fn list(
        &self,
        user_id: Uuid,
        filter: &SavedAnswerFilter,
    ) -> Result<Vec<SavedAnswer>, AppError> {
        let inner = self.lock();
        let needle = filter.query.as_deref().map(str::to_lowercase);
        let mut rows: Vec<(u64, SavedAnswer)> = inner
            .saved
            .iter()
            .filter(|(_, s)| s.user_id == user_id)
            .map(|(seq, s)| (*seq, inner.with_question_text(s.clone())))
            .filter(|(_, s)| filter.tag.as_ref().map_or(true, |t| s.tags.contains(t)))
            .filter(|(_, s)| {
                needle.as_deref().map_or(true, |n| {
                    s.question.to_lowercase().contains(n) || s.content.to_lowercase().contains(n)
                })
            })
            .collect();
        rows.sort_by(|a, b| (b.1.saved_at, b.0).cmp(&(a.1.saved_at, a.0)));
        Ok(rows
            .into_iter()
            .take(filter.limit.max(0) as usize)
            .map(|(_, s)| s)
            .collect())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.lock();
        let before = inner.saved.len();
        inner
            .saved
            .retain(|(_, s)| !(s.id == id && s.user_id == user_id));
        Ok(inner.saved.len() < before)
    }

    async fn tags(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let inner = self.lock();
        let mut tags: Vec<String> = inner
            .saved
            .iter()
            .filter(|(_, s)| s.user_id == user_id)
            .flat_map(|(_, s)| s.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        Ok(tags)
    }
}

#[async_trait]
impl StudyRepo for MemoryStore {
    async fn cross_references(
        &self,
        book: &str,
        chapter: i32,
        verse: i32,
    ) -> Result<Option<serde_json::Value>, AppError> {
        Ok(self
            .lock()
            .cross_references
            .get(&(book.to_lowercase(), chapter, verse))
            .cloned())
    }

    async fn lexicon_entry(
        &self,
        strongs_number: Option<&str>,
        lemma: Option<&str>,
    ) -> Result<Option<LexiconEntry>, AppError> {
        let lemma = lemma.map(str::to_lowercase);
        Ok(self
            .lock()
            .lexicon
            .iter()
            .filter(|e| strongs_number.map_or(true, |s| e.strongs_number.eq_ignore_ascii_case(s)))
            .find(|e| {
                lemma
                    .as_deref()
                    .map_or(true, |l| e.lemma.to_lowercase().contains(l))
            })
            .cloned())
    }

    async fn search_topics(
        &self,
        keyword: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Topic>, AppError> {
        let needle = keyword.map(str::to_lowercase);
        let matches = |t: &Topic| {
            let Some(n) = needle.as_deref() else {
                return true;
            };
            t.topic.to_lowercase().contains(n)
                || t.summary.as_deref().is_some_and(|s| s.to_lowercase().contains(n))
                || t.keywords.iter().any(|k| k.to_lowercase().contains(n))
        };
        let mut rows: Vec<Topic> = self
            .lock()
            .topics
            .iter()
            .filter(|t| matches(*t))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.topic.cmp(&b.topic));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn reading_plans(&self) -> Result<Vec<ReadingPlan>, AppError> {
        let mut plans: Vec<ReadingPlan> =
            self.lock().plans.iter().map(|(p, _)| p.clone()).collect();
        plans.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(plans)
    }

    async fn reading_plan(&self, slug: &str) -> Result<Option<ReadingPlan>, AppError> {
        Ok(self
            .lock()
            .plans
            .iter()
            .map(|(p, _)| p)
            .find(|p| p.slug.to_lowercase() == slug.to_lowercase())
            .cloned())
    }

    async fn plan_schedule(
        &self,
        plan_id: i32,
        max_days: Option<i64>,
    ) -> Result<Vec<ReadingPlanDay>, AppError> {
        let inner = self.lock();
        let Some((_, days)) = inner.plans.iter().find(|(p, _)| p.id == plan_id) else {
            return Ok(Vec::new());
        };
        let mut days = days.clone();
        days.sort_by_key(|d| d.day_number);
        if let Some(max) = max_days {
            days.truncate(max.max(0) as usize);
        }
        Ok(days)
    }
}
