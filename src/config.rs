use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_output_tokens: u32,
    pub request_timeout_secs: u64,
    pub max_history_messages: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub openai: OpenAiConfig,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "bible-qa".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "bible-qa-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
        };
        let openai = OpenAiConfig {
            api_key: std::env::var("OPENAI_API_KEY")?,
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".into()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            max_output_tokens: env_or("OPENAI_MAX_OUTPUT_TOKENS", 800),
            request_timeout_secs: env_or("OPENAI_REQUEST_TIMEOUT_SECS", 30),
            max_history_messages: env_or("OPENAI_MAX_HISTORY_MESSAGES", 10),
        };
        let allowed_origins = parse_origins(
            &std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        if jwt.ttl_minutes <= 0 {
            anyhow::bail!("JWT_TTL_MINUTES must be positive");
        }

        Ok(Self {
            database_url,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            jwt,
            openai,
            allowed_origins,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Comma separated list; blanks are dropped.
pub(crate) fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_origins_trims_and_drops_blanks() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn parse_origins_empty_means_none() {
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn env_or_falls_back_on_missing_or_garbage() {
        assert_eq!(env_or("BIBLE_QA_TEST_SURELY_UNSET", 42u32), 42);
    }
}
