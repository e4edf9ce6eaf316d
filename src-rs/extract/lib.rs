pub mod extractor;
pub mod heuristic;
pub mod types;

pub use extractor::{parse_extraction, TaskExtractor, EXTRACTION_PROMPT};
pub use heuristic::heuristic_extract;
pub use types::ExtractedTask;
