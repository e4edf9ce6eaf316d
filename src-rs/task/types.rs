use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extract::ExtractedTask;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    #[default]
    Normal,
    Low,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::High => "high",
            TaskPriority::Normal => "normal",
            TaskPriority::Low => "low",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "high" => Some(TaskPriority::High),
            "normal" => Some(TaskPriority::Normal),
            "low" => Some(TaskPriority::Low),
            _ => None,
        }
    }
}

/// Task status as stored. Writes are not validated, so anything other than
/// the two known states is carried through verbatim in `Other`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Other(raw) => raw,
        }
    }

    /// completed -> pending, everything else -> completed.
    pub fn toggled(&self) -> TaskStatus {
        match self {
            TaskStatus::Completed => TaskStatus::Pending,
            _ => TaskStatus::Completed,
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => TaskStatus::Pending,
            "completed" => TaskStatus::Completed,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        TaskStatus::from(raw.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Row to insert. `id`, `status` and `createdAt` are assigned by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
}

impl NewTask {
    /// Builds the row for a transcript, using the transcript itself when the
    /// extractor produced no title.
    pub fn from_extraction(extracted: ExtractedTask, transcript: &str) -> Self {
        let title = if extracted.title.trim().is_empty() {
            transcript.to_string()
        } else {
            extracted.title
        };
        Self {
            title,
            due_date: extracted.due_date,
            priority: extracted.priority,
        }
    }
}

/// Lenient due-date reading: RFC 3339, a naive date-time (taken as UTC) or a
/// bare `YYYY-MM-DD` (midnight UTC). Anything else is no due date.
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_unknown_values() {
        let status: TaskStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, TaskStatus::Other("archived".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"archived\"");
    }

    #[test]
    fn toggle_twice_restores_known_status() {
        assert_eq!(TaskStatus::Pending.toggled().toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::Completed.toggled().toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::from("weird").toggled(), TaskStatus::Completed);
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(TaskPriority::parse("HIGH"), Some(TaskPriority::High));
        assert_eq!(TaskPriority::parse(" low "), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn new_task_falls_back_to_transcript_title() {
        let extracted = ExtractedTask {
            title: "  ".to_string(),
            due_date: None,
            priority: TaskPriority::Normal,
        };
        let row = NewTask::from_extraction(extracted, "remind me to");
        assert_eq!(row.title, "remind me to");
    }

    #[test]
    fn due_dates_parse_leniently() {
        use chrono::TimeZone;

        let midnight = Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2026-10-20"), Some(midnight));
        assert_eq!(parse_due_date("2026-10-20T00:00:00.000Z"), Some(midnight));
        assert_eq!(parse_due_date("2026-10-20 00:00:00"), Some(midnight));
        assert_eq!(parse_due_date("2026-10-20T00:00:00"), Some(midnight));
        assert_eq!(parse_due_date("next friday"), None);
        assert_eq!(parse_due_date(""), None);
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: 7,
            title: "Buy milk".to_string(),
            due_date: None,
            priority: TaskPriority::High,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["priority"], "high");
        assert_eq!(value["status"], "pending");
        assert!(value.get("dueDate").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
