use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::heuristic::heuristic_extract;
use super::types::ExtractedTask;
use crate::llm::{CompletionRequest, Message, ProviderAdapter, ProviderError};
use crate::task::{parse_due_date, TaskPriority};

pub const EXTRACTION_PROMPT: &str = "You are a task extractor. Extract 'title' (string), 'dueDate' (ISO string or null), \
and 'priority' ('high', 'normal', 'low') from the user's input. Return strictly JSON.";

/// Maps transcripts to task skeletons. With a provider attached the LLM is
/// asked first; any failure there falls back to the keyword heuristic.
#[derive(Clone, Default)]
pub struct TaskExtractor {
    provider: Option<Arc<dyn ProviderAdapter>>,
}

impl TaskExtractor {
    pub fn heuristic() -> Self {
        Self { provider: None }
    }

    pub fn with_provider(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Blocking when a provider is attached.
    pub fn extract(&self, text: &str, now: DateTime<Utc>) -> ExtractedTask {
        let provider = match &self.provider {
            Some(provider) => provider,
            None => return heuristic_extract(text, now),
        };
        match request_extraction(provider.as_ref(), text) {
            Ok(task) => {
                debug!(title = %task.title, priority = task.priority.as_str(), "LLM extraction succeeded");
                task
            }
            Err(err) => {
                warn!(code = %err.code, error = %err.message, "LLM extraction failed, using heuristic");
                heuristic_extract(text, now)
            }
        }
    }
}

fn request_extraction(provider: &dyn ProviderAdapter, text: &str) -> Result<ExtractedTask, ProviderError> {
    let request = CompletionRequest {
        messages: vec![Message::system(EXTRACTION_PROMPT), Message::user(text)],
        json_response: true,
        ..CompletionRequest::default()
    };
    let response = provider.complete(request)?;
    parse_extraction(&response.content)
}

/// Reads the provider's JSON object reply. Missing or unrecognized fields
/// degrade to an empty title, no due date and normal priority.
pub fn parse_extraction(content: &str) -> Result<ExtractedTask, ProviderError> {
    let value: Value = serde_json::from_str(content.trim())
        .map_err(|err| ProviderError::new("parse_error", &err.to_string(), false))?;
    let object = value
        .as_object()
        .ok_or_else(|| ProviderError::new("parse_error", "completion is not a JSON object", false))?;

    let title = object
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let due_date = object
        .get("dueDate")
        .and_then(Value::as_str)
        .and_then(parse_due_date);
    let priority = object
        .get("priority")
        .and_then(Value::as_str)
        .and_then(TaskPriority::parse)
        .unwrap_or_default();

    Ok(ExtractedTask {
        title,
        due_date,
        priority,
    })
}
