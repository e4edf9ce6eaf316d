use thiserror::Error;

use crate::task::Task;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Side channel told about every newly created task. Implementations may
/// block; callers run them off the request path and only log failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, task: &Task) -> Result<(), NotifyError>;
}

pub fn render_subject(task: &Task) -> String {
    format!("New Task: {}", task.title)
}

pub fn render_body(task: &Task) -> String {
    let due = task
        .due_date
        .map(|due| due.to_rfc3339())
        .unwrap_or_else(|| "No Date".to_string());
    format!(
        "Task Details:\nTitle: {}\nDue: {}\nPriority: {}",
        task.title,
        due,
        task.priority.as_str()
    )
}
