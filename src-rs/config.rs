use std::env;

use crate::helpers::load_ai_keys;
use crate::llm::openai_adapter::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::notify::mailer::DEFAULT_MAIL_API_BASE;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_path: String,
    pub ai_api_keys: Vec<String>,
    pub ai_base_url: String,
    pub ai_model: String,
    pub email_user: Option<String>,
    pub email_token: Option<String>,
    pub email_api_base: String,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_path: "./tasks.db".to_string(),
            ai_api_keys: Vec::new(),
            ai_base_url: DEFAULT_BASE_URL.to_string(),
            ai_model: DEFAULT_MODEL.to_string(),
            email_user: None,
            email_token: None,
            email_api_base: DEFAULT_MAIL_API_BASE.to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|raw| raw.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            database_path: env_or("DATABASE_PATH", defaults.database_path),
            ai_api_keys: load_ai_keys(),
            ai_base_url: env_or("AI_BASE_URL", defaults.ai_base_url),
            ai_model: env_or("AI_MODEL", defaults.ai_model),
            email_user: env_opt("EMAIL_USER"),
            email_token: env_opt("EMAIL_TOKEN"),
            email_api_base: env_or("EMAIL_API_BASE", defaults.email_api_base),
            log_level: env_or("VOICE_TASKS_LOG", defaults.log_level),
            log_json: env::var("VOICE_TASKS_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.log_json),
        }
    }

    pub fn ai_enabled(&self) -> bool {
        !self.ai_api_keys.is_empty()
    }
}

fn env_or(key: &str, fallback: String) -> String {
    env_opt(key).unwrap_or(fallback)
}

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}
