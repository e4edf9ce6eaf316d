use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::debug;

use super::rotation::Rotator;
use super::types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub struct OpenAiConfig {
    pub api_keys: Vec<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Chat-completions client for OpenAI and API-compatible servers.
pub struct OpenAiAdapter {
    cfg: OpenAiConfig,
    rotator: Rotator,
    client: Client,
}

impl OpenAiAdapter {
    pub fn new(mut cfg: OpenAiConfig) -> Result<Self, ProviderError> {
        if cfg.base_url.is_empty() {
            cfg.base_url = DEFAULT_BASE_URL.to_string();
        }
        if cfg.model.is_empty() {
            cfg.model = DEFAULT_MODEL.to_string();
        }
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|err| ProviderError::new("client_error", &err.to_string(), false))?;
        Ok(Self {
            rotator: Rotator::new(cfg.api_keys.clone()),
            cfg,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.cfg.model
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn complete(&self, request: CompletionRequest) -> Result<LLMResponse, ProviderError> {
        // One attempt per request; the rotator only spreads load across keys.
        let key = self
            .rotator
            .next()
            .ok_or_else(|| ProviderError::new("auth_error", "no AI API keys configured", false))?;
        let model = request.model.clone().unwrap_or_else(|| self.cfg.model.clone());
        let temperature = request.temperature.or(self.cfg.temperature);
        let payload = build_payload(&request.messages, &model, temperature, request.json_response);
        debug!(model = %model, keys = self.rotator.len(), "sending chat completion");
        send_request(&self.client, &self.cfg.base_url, key, &payload)
    }
}

fn build_payload(messages: &[Message], model: &str, temperature: Option<f64>, json_response: bool) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|msg| json!({"role": msg.role, "content": msg.content}))
        .collect();

    let mut payload = json!({
        "model": model,
        "messages": messages,
    });
    if let Some(temperature) = temperature {
        payload["temperature"] = json!(temperature);
    }
    if json_response {
        payload["response_format"] = json!({"type": "json_object"});
    }
    payload
}

fn send_request(client: &Client, base_url: &str, api_key: &str, payload: &Value) -> Result<LLMResponse, ProviderError> {
    let endpoint = format!("{}/v1/chat/completions", base_url.trim_end_matches('/'));
    let resp = client
        .post(endpoint)
        .bearer_auth(api_key)
        .json(payload)
        .send()
        .map_err(|err| ProviderError::new("network_error", &err.to_string(), true))?;

    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    if status.is_client_error() || status.is_server_error() {
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProviderError::new("auth_error", &body, false));
        }
        if status.as_u16() == 429 || body.to_lowercase().contains("quota") {
            return Err(ProviderError::new("rate_limit", &body, true));
        }
        if status.is_server_error() {
            return Err(ProviderError::new("server_error", &body, true));
        }
        return Err(ProviderError::new("api_error", &body, false));
    }

    let raw: Value = serde_json::from_str(&body)
        .map_err(|_| ProviderError::new("parse_error", "invalid json", false))?;
    let content = parse_response(&raw)
        .ok_or_else(|| ProviderError::new("parse_error", "completion has no message content", false))?;
    Ok(LLMResponse {
        content,
        raw: Some(raw),
    })
}

fn parse_response(raw: &Value) -> Option<String> {
    raw.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_requests_json_object() {
        let messages = vec![Message::system("extract"), Message::user("buy milk")];
        let payload = build_payload(&messages, "gpt-3.5-turbo", None, true);
        assert_eq!(payload["model"], "gpt-3.5-turbo");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "buy milk");
        assert_eq!(payload["response_format"]["type"], "json_object");
        assert!(payload.get("temperature").is_none());
    }

    #[test]
    fn payload_without_json_mode() {
        let payload = build_payload(&[Message::user("hi")], "m", Some(0.2), false);
        assert!(payload.get("response_format").is_none());
        assert_eq!(payload["temperature"], 0.2);
    }

    #[test]
    fn parses_first_choice_content() {
        let raw = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "{\"title\":\"Buy milk\"}"}}
            ]
        });
        assert_eq!(parse_response(&raw).as_deref(), Some("{\"title\":\"Buy milk\"}"));
        assert_eq!(parse_response(&json!({"choices": []})), None);
    }

    #[test]
    fn missing_keys_fail_without_network() {
        let adapter = OpenAiAdapter::new(OpenAiConfig::default()).unwrap();
        let err = adapter.complete(CompletionRequest::default()).unwrap_err();
        assert_eq!(err.code, "auth_error");
    }

    #[test]
    fn unreachable_endpoint_is_a_network_error() {
        let adapter = OpenAiAdapter::new(OpenAiConfig {
            api_keys: vec!["test-key".to_string()],
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..OpenAiConfig::default()
        })
        .unwrap();
        let err = adapter
            .complete(CompletionRequest {
                messages: vec![Message::user("buy milk")],
                ..CompletionRequest::default()
            })
            .unwrap_err();
        assert_eq!(err.code, "network_error");
        assert!(err.retryable);
    }
}
