use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use super::types::ExtractedTask;
use crate::task::TaskPriority;

const HIGH_PRIORITY_KEYWORDS: [&str; 3] = ["urgent", "important", "high priority"];
const LOW_PRIORITY_KEYWORDS: [&str; 1] = ["low priority"];

fn title_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(r"(?i)^(remind me to|add a task to|i need to|note that)").expect("valid title prefix pattern")
    })
}

/// Keyword-based extraction. Pure: the result depends only on `text` and `now`.
pub fn heuristic_extract(text: &str, now: DateTime<Utc>) -> ExtractedTask {
    let lower = text.to_lowercase();
    ExtractedTask {
        title: clean_title(text),
        due_date: detect_due_date(&lower, now),
        priority: detect_priority(&lower),
    }
}

fn detect_priority(lower: &str) -> TaskPriority {
    if HIGH_PRIORITY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        TaskPriority::High
    } else if LOW_PRIORITY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        TaskPriority::Low
    } else {
        TaskPriority::Normal
    }
}

fn detect_due_date(lower: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if lower.contains("today") {
        Some(now)
    } else if lower.contains("tomorrow") {
        Some(now + Duration::days(1))
    } else {
        None
    }
}

fn clean_title(text: &str) -> String {
    let stripped = title_prefix().replace(text, "");
    capitalize_first(stripped.trim())
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    #[test]
    fn strips_prefix_and_detects_tomorrow() {
        let now = fixed_now();
        let task = heuristic_extract("remind me to buy milk tomorrow", now);
        assert_eq!(task.title, "Buy milk tomorrow");
        assert_eq!(task.due_date, Some(now + Duration::days(1)));
        assert_eq!(task.priority, TaskPriority::Normal);
    }

    #[test]
    fn today_wins_over_tomorrow() {
        let now = fixed_now();
        let task = heuristic_extract("finish today or tomorrow", now);
        assert_eq!(task.due_date, Some(now));
    }

    #[test]
    fn prefixes_are_case_insensitive() {
        let now = fixed_now();
        assert_eq!(heuristic_extract("Add a task to water plants", now).title, "Water plants");
        assert_eq!(heuristic_extract("I NEED TO file taxes", now).title, "File taxes");
        assert_eq!(heuristic_extract("note that the door squeaks", now).title, "The door squeaks");
    }

    #[test]
    fn prefix_must_start_the_text() {
        let task = heuristic_extract("please remind me to call", fixed_now());
        assert_eq!(task.title, "Please remind me to call");
    }

    #[test]
    fn only_one_prefix_is_stripped() {
        let task = heuristic_extract("remind me to note that it rains", fixed_now());
        assert_eq!(task.title, "Note that it rains");
    }

    #[test]
    fn bare_prefix_yields_empty_title() {
        assert_eq!(heuristic_extract("remind me to", fixed_now()).title, "");
        assert_eq!(heuristic_extract("   ", fixed_now()).title, "");
    }

    #[test]
    fn priority_rules() {
        let now = fixed_now();
        assert_eq!(heuristic_extract("URGENT: fix the sink", now).priority, TaskPriority::High);
        assert_eq!(heuristic_extract("this is Important", now).priority, TaskPriority::High);
        assert_eq!(heuristic_extract("low priority: sort socks", now).priority, TaskPriority::Low);
        // high rule is checked first
        assert_eq!(
            heuristic_extract("urgent but low priority", now).priority,
            TaskPriority::High
        );
    }

    const KEYWORD_FREE: &str = "[b-df-hj-np-z ]{0,40}";

    proptest! {
        #[test]
        fn keyword_free_text_is_normal_and_undated(text in KEYWORD_FREE) {
            let task = heuristic_extract(&text, fixed_now());
            prop_assert_eq!(task.priority, TaskPriority::Normal);
            prop_assert_eq!(task.due_date, None);
        }

        #[test]
        fn keyword_free_title_is_idempotent(text in KEYWORD_FREE) {
            let once = heuristic_extract(&text, fixed_now());
            let twice = heuristic_extract(&once.title, fixed_now());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn urgency_keyword_in_any_case_is_high(
            prefix in "[a-z ]{0,10}",
            keyword in prop::sample::select(vec!["urgent", "important", "high priority"]),
            upper in any::<bool>(),
        ) {
            let keyword = if upper { keyword.to_uppercase() } else { keyword.to_string() };
            let text = format!("{}{} task", prefix, keyword);
            prop_assert_eq!(heuristic_extract(&text, fixed_now()).priority, TaskPriority::High);
        }

        #[test]
        fn deterministic_for_fixed_now(text in ".{0,60}") {
            prop_assert_eq!(
                heuristic_extract(&text, fixed_now()),
                heuristic_extract(&text, fixed_now())
            );
        }
    }
}
