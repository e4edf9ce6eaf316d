pub mod store;
pub mod types;

pub use store::{StoreError, TaskStore};
pub use types::{parse_due_date, NewTask, Task, TaskPriority, TaskStatus};
