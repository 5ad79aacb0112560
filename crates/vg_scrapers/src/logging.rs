use tracing::Level;
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the global fmt subscriber once. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    INIT.call_once(|| {
        if !tracing::dispatcher::has_been_set() {
            let _ = tracing_subscriber::fmt()
                .with_max_level(level)
                .try_init();
        }
    });
}

/// Prefixes every message, e.g. with the URL a request is working on.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: Vec<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    fn line(&self, message: &str) -> String {
        let mut line = String::new();
        for prefix in &self.prefixes {
            line.push_str(prefix);
            line.push(' ');
        }
        line.push_str(message);
        line
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", self.line(message));
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}", self.line(message));
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}", self.line(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_are_joined_in_order() {
        let logger = Logger::new()
            .with_prefix("[https://example.com/a]")
            .with_prefix("[summary]");
        assert_eq!(
            logger.line("done"),
            "[https://example.com/a] [summary] done"
        );
        assert_eq!(Logger::new().line("bare"), "bare");
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(false);
        init_logging(true);
    }
}
