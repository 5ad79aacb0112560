pub mod models;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::{ImageBackend, PromptStage, TextModel};
pub use storage::ContentStore;
pub use types::{ArticleRecord, ImagePayload, ImageRecord, PipelineItem, SummaryRecord};
