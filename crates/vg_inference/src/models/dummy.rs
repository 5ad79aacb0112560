use std::fmt;
use vg_core::{Result, TextModel};

const SUMMARY_WORDS: usize = 12;

/// Offline model: answers every prompt with its last paragraph, shortened and
/// wrapped in a JSON array.
#[derive(Default)]
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl TextModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String> {
        let content = prompt.rsplit("\n\n").next().unwrap_or(prompt);
        let words: Vec<&str> = content.split_whitespace().take(SUMMARY_WORDS).collect();
        Ok(serde_json::to_string(&[words.join(" ")])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();
        let prompt = "Instructions go here.\n\nThis is a test article. It has multiple sentences and plenty of words to cut.";
        let output = model.complete(prompt, 100).await.unwrap();
        let parsed: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].starts_with("This is a test article."));
        assert!(!parsed[0].contains("Instructions"));
        assert_eq!(parsed[0].split_whitespace().count(), SUMMARY_WORDS);
    }
}
