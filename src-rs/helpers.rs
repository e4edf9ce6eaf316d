use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::server::AppState;
use crate::config::AppConfig;
use crate::extract::TaskExtractor;
use crate::llm::{OpenAiAdapter, OpenAiConfig};
use crate::notify::{HttpMailer, LogNotifier, MailerConfig, Notifier};
use crate::task::TaskStore;

/// Placeholder key shipped in sample env files; treated as "no key".
const PLACEHOLDER_KEY: &str = "dummy-key";

fn load_keys_from_env(primary: &str, prefix: &str) -> Vec<String> {
    let mut raw_values = Vec::new();
    if let Ok(raw) = env::var(primary) {
        raw_values.extend(raw.split(',').map(str::to_string));
    }
    for idx in 2..=10 {
        if let Ok(value) = env::var(format!("{}_{}", prefix, idx)) {
            raw_values.push(value);
        }
    }
    normalize_keys(&raw_values)
}

fn normalize_keys(raw_values: &[String]) -> Vec<String> {
    raw_values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty() && *value != PLACEHOLDER_KEY)
        .map(str::to_string)
        .collect()
}

pub fn load_ai_keys() -> Vec<String> {
    load_keys_from_env("AI_API_KEY", "AI_API_KEY")
}

pub fn init_tracing(cfg: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        cfg.log_level.parse::<EnvFilter>().unwrap_or_else(|err| {
            eprintln!(
                "WARN: VOICE_TASKS_LOG='{}' is not a valid filter ({}); using 'info'",
                cfg.log_level, err
            );
            EnvFilter::new("info")
        })
    });
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

pub fn build_extractor(cfg: &AppConfig) -> Result<TaskExtractor> {
    if !cfg.ai_enabled() {
        warn!("no AI_API_KEY found, using keyword extractor");
        return Ok(TaskExtractor::heuristic());
    }
    let adapter = OpenAiAdapter::new(OpenAiConfig {
        api_keys: cfg.ai_api_keys.clone(),
        base_url: cfg.ai_base_url.clone(),
        model: cfg.ai_model.clone(),
        ..OpenAiConfig::default()
    })
    .context("failed to build LLM client")?;
    info!(model = adapter.model(), keys = cfg.ai_api_keys.len(), "LLM extraction enabled");
    Ok(TaskExtractor::with_provider(Arc::new(adapter)))
}

pub fn build_notifier(cfg: &AppConfig) -> Result<Arc<dyn Notifier>> {
    let user = match &cfg.email_user {
        Some(user) => user.clone(),
        None => {
            info!("EMAIL_USER not set, task emails will be logged only");
            return Ok(Arc::new(LogNotifier));
        }
    };
    let mailer = HttpMailer::new(MailerConfig {
        user,
        token: cfg.email_token.clone().unwrap_or_default(),
        api_base: cfg.email_api_base.clone(),
    })
    .context("failed to build mail client")?;
    Ok(Arc::new(mailer))
}

/// Opens the database and wires the collaborators. Call this outside the
/// async runtime: the blocking HTTP clients must not be created or dropped
/// on a runtime thread.
pub fn build_app_state(cfg: &AppConfig) -> Result<AppState> {
    let store = TaskStore::open(&cfg.database_path)
        .with_context(|| format!("failed to open database at {}", cfg.database_path))?;
    info!(path = %cfg.database_path, "connected to SQLite database");
    Ok(AppState {
        store: Arc::new(store),
        extractor: Arc::new(build_extractor(cfg)?),
        notifier: build_notifier(cfg)?,
    })
}
