// Shared helpers for the integration tests

use async_trait::async_trait;
use axum::Router;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use vg_core::{Error, ImageBackend, ImagePayload, Result, TextModel};

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Text model that replays canned answers and counts calls.
/// Once the script runs out, the last answer repeats.
pub struct ScriptedModel {
    answers: Mutex<VecDeque<Result<String>>>,
    last: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(answers: Vec<&str>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| Ok(a.to_string())).collect()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answers: Mutex::new(VecDeque::from(vec![Err(Error::Inference(message.to_string()))])),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn complete(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.answers.lock().unwrap().pop_front();
        match next {
            Some(Ok(answer)) => {
                *self.last.lock().unwrap() = Some(answer.clone());
                Ok(answer)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.lock().unwrap().clone().unwrap_or_default()),
        }
    }
}

/// Image backend that fails for one specific prompt.
pub struct FlakyBackend {
    pub fail_on: String,
    pub calls: AtomicUsize,
}

impl FlakyBackend {
    pub fn new(fail_on: &str) -> Self {
        Self {
            fail_on: fail_on.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ImageBackend for FlakyBackend {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImagePayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if prompt == self.fail_on {
            return Err(Error::backend("flaky", "empty response"));
        }
        Ok(ImagePayload::png_base64("AAAA"))
    }
}
