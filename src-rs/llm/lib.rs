pub mod openai_adapter;
pub mod rotation;
pub mod types;

pub use openai_adapter::{OpenAiAdapter, OpenAiConfig};
pub use rotation::Rotator;
pub use types::{CompletionRequest, LLMResponse, Message, ProviderAdapter, ProviderError};
