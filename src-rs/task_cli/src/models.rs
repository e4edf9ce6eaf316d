use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct CLIConfig {
    pub base_url: String,
    /// Status filter applied by a bare `/tasks`.
    pub default_filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusResponse {
    pub id: i64,
    pub status: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub id: i64,
    pub title: String,
    pub due_date: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_priority() -> String {
    "normal".to_string()
}

fn default_status() -> String {
    "pending".to_string()
}

/// Status a task moves to when toggled: completed flips back to pending,
/// anything else becomes completed.
pub fn toggled_status(current: &str) -> &'static str {
    if current == "completed" {
        "pending"
    } else {
        "completed"
    }
}
