use std::io::{self, Write};

use crate::models::{CLIConfig, TaskInfo};

pub fn banner(cfg: &CLIConfig) {
    println!("Voice Task Tracker");
    println!("API: {}", cfg.base_url);
    println!("Type a task the way you would say it, or /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  <text>                 Create a task from a transcript");
    println!("  /tasks [status]        List tasks, optionally by status");
    println!("  /toggle <id>           Flip a task between pending and completed");
    println!("  /done <id>             Same as /toggle");
    println!("  /config                Show current config");
    println!("  /base <url>            Update base URL");
    println!("  /help                  Show commands");
    println!("  /exit | /quit          Exit");
}

pub fn created(task: &TaskInfo) {
    println!("added #{}: {} [{}]", task.id, task.title, task.priority);
}

pub fn tasks(tasks: &[TaskInfo]) {
    if tasks.is_empty() {
        println!("No tasks yet. Speak to add one!");
        return;
    }
    let pending = tasks.iter().filter(|task| task.status == "pending").count();
    println!("{} pending", pending);
    for task in tasks {
        let mark = if task.status == "completed" { "x" } else { " " };
        let due = task
            .due_date
            .as_deref()
            .map(|due| format!("  due {}", due.get(..10).unwrap_or(due)))
            .unwrap_or_default();
        println!(
            "[{}] #{:<4} {:<7} {}{}",
            mark,
            task.id,
            task.priority.to_uppercase(),
            task.title,
            due
        );
    }
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    if let Some(filter) = &cfg.default_filter {
        println!("  filter: {}", filter);
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
