use std::io;

use crate::client::HTTPClient;
use crate::models::{toggled_status, CLIConfig, TaskInfo};
use crate::render;

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
    /// Tasks from the most recent listing, used to look up current status.
    pub last_listing: Vec<TaskInfo>,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self {
            config,
            client,
            last_listing: Vec::new(),
        }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            self.submit(&line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "tasks" | "list" => {
                let filter = if rest.is_empty() {
                    self.config.default_filter.clone()
                } else {
                    Some(rest.to_string())
                };
                self.list_tasks(filter.as_deref());
            }
            "toggle" | "done" => match rest.parse::<i64>() {
                Ok(id) => self.toggle(id),
                Err(_) => render::error("usage: /toggle <id>"),
            },
            "config" => render::config(&self.config),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    match HTTPClient::new(rest) {
                        Ok(client) => {
                            self.config.base_url = rest.to_string();
                            self.client = client;
                            self.last_listing.clear();
                            render::info("base url updated");
                        }
                        Err(err) => render::error(&err),
                    }
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    fn submit(&mut self, transcript: &str) {
        match self.client.create_task(transcript) {
            Ok(task) => {
                render::created(&task);
                self.list_tasks(self.config.default_filter.clone().as_deref());
            }
            Err(err) => render::error(&format!("could not create task: {}", err)),
        }
    }

    fn list_tasks(&mut self, status: Option<&str>) {
        match self.client.list_tasks(status) {
            Ok(tasks) => {
                render::tasks(&tasks);
                self.last_listing = tasks;
            }
            Err(err) => render::error(&err),
        }
    }

    fn toggle(&mut self, id: i64) {
        if !self.last_listing.iter().any(|task| task.id == id) {
            match self.client.list_tasks(None) {
                Ok(tasks) => self.last_listing = tasks,
                Err(err) => {
                    render::error(&err);
                    return;
                }
            }
        }
        let current = match self.last_listing.iter().find(|task| task.id == id) {
            Some(task) => task.status.clone(),
            None => {
                render::error(&format!("no task with id {}", id));
                return;
            }
        };

        let next = toggled_status(&current);
        match self.client.update_status(id, next) {
            Ok(resp) => {
                if let Some(task) = self.last_listing.iter_mut().find(|task| task.id == id) {
                    task.status = resp.status.clone();
                }
                render::info(&format!("task {} is now {}", resp.id, resp.status));
            }
            Err(err) => render::error(&err),
        }
    }
}
