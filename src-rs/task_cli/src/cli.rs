use std::env;

use crate::models::CLIConfig;

const DEFAULT_URL: &str = "http://localhost:3000";

pub fn parse_config() -> CLIConfig {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args(
        &args,
        CLIConfig {
            base_url: env_or("VOICE_TASKS_URL", DEFAULT_URL.to_string()),
            default_filter: env_opt("VOICE_TASKS_FILTER"),
        },
    )
}

fn parse_args(args: &[String], mut cfg: CLIConfig) -> CLIConfig {
    let mut idx = 0;
    while idx < args.len() {
        match args[idx].as_str() {
            "--base" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.base_url = value.clone();
                    idx += 1;
                }
            }
            "--filter" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.default_filter = Some(value.clone());
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }
    cfg
}

fn env_or(key: &str, fallback: String) -> String {
    env_opt(key).unwrap_or(fallback)
}

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args: Vec<String> = ["--base", "http://tasks:8080", "--filter", "pending", "--unknown"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let cfg = parse_args(
            &args,
            CLIConfig {
                base_url: DEFAULT_URL.to_string(),
                default_filter: None,
            },
        );
        assert_eq!(cfg.base_url, "http://tasks:8080");
        assert_eq!(cfg.default_filter.as_deref(), Some("pending"));
    }
}
