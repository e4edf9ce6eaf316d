use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use tracing::info;

use super::types::{render_body, render_subject, NotifyError, Notifier};
use crate::task::Task;

pub const DEFAULT_MAIL_API_BASE: &str = "https://www.googleapis.com/gmail/v1";

#[derive(Clone, Debug)]
pub struct MailerConfig {
    /// Sender address; messages go to the same mailbox.
    pub user: String,
    pub token: String,
    pub api_base: String,
}

/// Sends task summaries through a Gmail-API-compatible `messages/send` endpoint.
pub struct HttpMailer {
    cfg: MailerConfig,
    client: Client,
}

impl HttpMailer {
    pub fn new(mut cfg: MailerConfig) -> Result<Self, NotifyError> {
        if cfg.api_base.is_empty() {
            cfg.api_base = DEFAULT_MAIL_API_BASE.to_string();
        }
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { cfg, client })
    }

    fn send_raw(&self, subject: &str, body: &str) -> Result<String, NotifyError> {
        let url = format!("{}/users/me/messages/send", self.cfg.api_base.trim_end_matches('/'));
        let message = build_message(&self.cfg.user, &self.cfg.user, subject, body);
        let payload = json!({ "raw": URL_SAFE_NO_PAD.encode(message.as_bytes()) });

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.cfg.token)
            .json(&payload)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: resp.text().unwrap_or_default(),
            });
        }
        let sent: Value = resp.json()?;
        Ok(sent["id"].as_str().unwrap_or("").to_string())
    }
}

impl Notifier for HttpMailer {
    fn notify(&self, task: &Task) -> Result<(), NotifyError> {
        let message_id = self.send_raw(&render_subject(task), &render_body(task))?;
        info!(task_id = task.id, message_id = %message_id, "task email sent");
        Ok(())
    }
}

fn build_message(from: &str, to: &str, subject: &str, body: &str) -> String {
    format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}",
        from, to, subject, body
    )
}

/// Stand-in used when no mail account is configured: logs instead of sending.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, task: &Task) -> Result<(), NotifyError> {
        info!(
            task_id = task.id,
            title = %task.title,
            priority = task.priority.as_str(),
            due = ?task.due_date,
            "email not configured, task created"
        );
        Ok(())
    }
}
