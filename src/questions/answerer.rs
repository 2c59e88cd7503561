use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OpenAiConfig;

const SYSTEM_PROMPT: &str = "You are a helpful Bible scholar with deep knowledge of Christian \
theology, biblical history, and scriptural interpretation. Provide thoughtful, accurate, and \
biblically-grounded answers, including relevant scripture references when appropriate. Be \
respectful of different denominational perspectives. When answering follow-up questions, keep \
the context of the previous conversation. Only answer questions that clearly relate to the Bible \
or Christian faith. If a user asks about something unrelated, respond with: 'This app is only for \
researching and asking questions about God's word. Please ask a Bible-related question.'";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Produces an answer for a question given the prior conversation.
#[async_trait]
pub trait AnswerClient: Send + Sync {
    async fn answer(&self, question: &str, history: &[ChatMessage]) -> anyhow::Result<String>;
}

/// Chat-completions client. One round trip per question, bounded by the client timeout.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(cfg: &OpenAiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_output_tokens.max(1),
        })
    }
}

#[async_trait]
impl AnswerClient for OpenAiClient {
    async fn answer(&self, question: &str, history: &[ChatMessage]) -> anyhow::Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::new(Role::System, SYSTEM_PROMPT));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::new(Role::User, question));

        let url = format!("{}/chat/completions", self.base_url);
        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
                max_tokens: self.max_tokens,
            })
            .send()
            .await
            .context("send chat completion")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, "chat completion rejected");
            anyhow::bail!("chat completion returned {status}: {body}");
        }

        let completion: CompletionResponse =
            res.json().await.context("decode chat completion")?;
        let answer = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .context("chat completion had no content")?;

        debug!(model = %self.model, chars = answer.len(), "chat completion received");
        Ok(answer)
    }
}
