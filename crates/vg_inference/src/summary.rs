//! Summary generation with a bounded validate-or-retry loop.
//!
//! Text models are not reliable about output format, so every completion is
//! checked against a strict array grammar and regenerated when it does not
//! match, up to [`MAX_ATTEMPTS`] times.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use vg_core::{ContentStore, Error, Result, SummaryRecord, TextModel};

pub const MAX_ATTEMPTS: usize = 3;
pub const SUMMARY_MAX_TOKENS: u32 = 100;

/// Why a completion was rejected by [`parse_summary_array`].
#[derive(Error, Debug)]
pub enum ArrayError {
    #[error("no opening bracket")]
    Missing,
    #[error("unbalanced brackets")]
    Unbalanced,
    #[error("not a JSON array of strings: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("array is empty")]
    Empty,
    #[error("array contains a blank item")]
    BlankItem,
}

pub fn summary_prompt(article_content: &str) -> String {
    format!(
        "You will act as an image prompt generator. I will provide you a description and you will \
         generate ONLY ONE prompt for the image generation as a JSON ARRAY containing the image prompt.\n\n{}",
        article_content
    )
}

/// Returns the first balanced `[...]` span of `text`.
///
/// Brackets inside JSON string literals do not count.
fn first_balanced_span(text: &str) -> std::result::Result<&str, ArrayError> {
    let start = text.find('[').ok_or(ArrayError::Missing)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(ArrayError::Unbalanced)
}

/// Extracts the summary array from raw model output.
///
/// Accepts only a non-empty JSON array of non-blank strings found as the
/// first balanced bracketed span.
pub fn parse_summary_array(text: &str) -> std::result::Result<Vec<String>, ArrayError> {
    let span = first_balanced_span(text)?;
    let items: Vec<String> = serde_json::from_str(span)?;
    if items.is_empty() {
        return Err(ArrayError::Empty);
    }
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(ArrayError::BlankItem);
    }
    Ok(items)
}

pub struct SummaryGenerator {
    model: Arc<dyn TextModel>,
    store: Arc<dyn ContentStore>,
    max_attempts: usize,
}

impl SummaryGenerator {
    pub fn new(model: Arc<dyn TextModel>, store: Arc<dyn ContentStore>) -> Self {
        Self {
            model,
            store,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Summarizes `article_content`, reusing a stored summary for identical text.
    pub async fn generate_summary(&self, article_content: &str) -> Result<Vec<String>> {
        if let Some(record) = self.store.get_summary(article_content).await? {
            debug!("📦 Summary cache hit");
            return Ok(record.summary);
        }

        let prompt = summary_prompt(article_content);
        for attempt in 1..=self.max_attempts {
            info!(
                "🤖 Generating summary with {} (attempt {}/{})",
                self.model.name(),
                attempt,
                self.max_attempts
            );
            let raw = self.model.complete(&prompt, SUMMARY_MAX_TOKENS).await?;

            match parse_summary_array(raw.trim()) {
                Ok(summary) => {
                    self.store
                        .upsert_summary(&SummaryRecord::new(article_content, summary.clone()))
                        .await?;
                    info!("✨ Summary generated: {:?}", summary);
                    return Ok(summary);
                }
                Err(e) => warn!("Discarding model output on attempt {}: {}", attempt, e),
            }
        }

        Err(Error::SummaryGeneration {
            attempts: self.max_attempts,
        })
    }
}
