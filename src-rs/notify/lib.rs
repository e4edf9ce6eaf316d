pub mod mailer;
pub mod types;

pub use mailer::{HttpMailer, LogNotifier, MailerConfig};
pub use types::{render_body, render_subject, NotifyError, Notifier};
