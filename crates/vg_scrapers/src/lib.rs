pub mod extractor;
pub mod fetcher;
pub mod html;
pub mod logging;
pub mod pipeline;

pub use extractor::ContentExtractor;
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use pipeline::{Pipeline, PipelineError, Stage};
