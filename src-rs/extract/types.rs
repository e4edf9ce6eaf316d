use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::TaskPriority;

/// Structured skeleton pulled out of a transcript. An empty `title` means
/// the extractor found nothing usable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTask {
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
}
