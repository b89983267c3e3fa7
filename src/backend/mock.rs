//! Mock backends for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::BackendError;
use super::selector::GenerationLimits;
use super::{CondenseBackend, EmbedBackend, GenerateBackend};

/// Condense backend that echoes a marked copy of its input, or fails on
/// request.
#[derive(Debug, Default)]
pub struct MockCondenseBackend {
    fail: bool,
    calls: AtomicUsize,
}

impl MockCondenseBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails (exercises the degrade path).
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of condense calls observed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CondenseBackend for MockCondenseBackend {
    async fn condense(&self, text: &str, _limits: &GenerationLimits) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(BackendError::Provider {
                reason: "mock condense failure".to_string(),
            });
        }

        Ok(format!("synopsis: {text}"))
    }
}

/// Deterministic token-bag embedder: cosine similarity tracks vocabulary
/// overlap, which is enough for relevance-ordering tests.
#[derive(Debug)]
pub struct MockEmbedBackend {
    dim: usize,
}

impl MockEmbedBackend {
    pub fn new() -> Self {
        Self { dim: 64 }
    }
}

impl Default for MockEmbedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbedBackend for MockEmbedBackend {
    fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut embedding = vec![0.0f32; self.dim];

        for token in text.split_whitespace() {
            let token: String = token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if token.is_empty() {
                continue;
            }

            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            embedding[(hasher.finish() % self.dim as u64) as usize] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        Ok(embedding)
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }
}

/// Generate backend that replays a scripted sequence of responses and
/// records the prompts it received.
#[derive(Debug, Default)]
pub struct MockGenerateBackend {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerateBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that always returns the same text.
    pub fn always(text: &str) -> Self {
        let mock = Self::new();
        mock.push_ok(text);
        mock
    }

    /// Queues a successful response (the last queued entry is replayed once
    /// the queue runs dry).
    pub fn push_ok(&self, text: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(text.to_string()));
    }

    /// Queues a failing response.
    pub fn push_err(&self, reason: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(reason.to_string()));
    }

    /// Prompts received so far, in call order.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of generate calls observed.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl GenerateBackend for MockGenerateBackend {
    async fn generate(&self, prompt: &str, _limits: &GenerationLimits) -> Result<String, BackendError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let mut responses = self.responses.lock().unwrap();
        let next = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        };

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(BackendError::Provider { reason }),
            None => Err(BackendError::EmptyOutput),
        }
    }
}
