pub mod config;
pub mod helpers;

#[path = "llm/lib.rs"]
pub mod llm;
#[path = "extract/lib.rs"]
pub mod extract;
#[path = "task/lib.rs"]
pub mod task;
#[path = "notify/lib.rs"]
pub mod notify;
#[path = "api/lib.rs"]
pub mod api;

pub use api::{build_router, AppState, TaskServer};
pub use config::AppConfig;
pub use extract::{ExtractedTask, TaskExtractor};
pub use task::{Task, TaskPriority, TaskStatus, TaskStore};
