//! Condensation stage: slide records in, document synopsis out.
//!
//! Each slide's text is flattened, tail-truncated to the backend's input
//! budget (never mid-word), and condensed by the lightweight backend.
//! Backend errors and timeouts degrade per slide to the raw truncated text
//! instead of failing the whole pipeline; a process-wide counter of
//! degraded slides is surfaced in logs only.


use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::backend::{CondenseBackend, GenerationLimits};
use crate::slides::{DocumentSynopsis, SlideRecord};

/// Total slides degraded to raw text since process start.
static DEGRADED_SLIDES: AtomicU64 = AtomicU64::new(0);

/// Returns the process-wide degraded-slide count.
pub fn degraded_slide_count() -> u64 {
    DEGRADED_SLIDES.load(Ordering::Relaxed)
}

/// Truncates `text` to at most `max_chars`, cutting at a word boundary.
///
/// Deterministic: the same input always yields the same prefix. Falls back
/// to the nearest char boundary when the budget is smaller than the first
/// word.
pub fn truncate_tail(text: &str, max_chars: usize) -> &str {
    if text.len() <= max_chars {
        return text;
    }

    let mut cut = max_chars;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }

    match text[..cut].rfind(char::is_whitespace) {
        Some(boundary) if boundary > 0 => text[..boundary].trim_end(),
        _ => &text[..cut],
    }
}

/// Condenses slide records into a [`DocumentSynopsis`].
pub struct CondensationStage<C: CondenseBackend> {
    backend: Arc<C>,
    limits: GenerationLimits,
    timeout: Duration,
    batch_size: usize,
}

impl<C: CondenseBackend> std::fmt::Debug for CondensationStage<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CondensationStage")
            .field("limits", &self.limits)
            .field("timeout", &self.timeout)
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl<C: CondenseBackend> CondensationStage<C> {
    /// Creates a stage over `backend` with the given budgets.
    ///
    /// `batch_size` bounds how many slides are condensed concurrently.
    pub fn new(backend: Arc<C>, limits: GenerationLimits, timeout: Duration, batch_size: usize) -> Self {
        Self {
            backend,
            limits,
            timeout,
            batch_size: batch_size.max(1),
        }
    }

    /// Condenses every slide, in order, into a document synopsis.
    ///
    /// Never fails: blank slides produce empty synopses, backend failures
    /// degrade to the slide's raw truncated text.
    pub async fn condense_document(&self, slides: &[SlideRecord]) -> DocumentSynopsis {
        let mut per_slide = Vec::with_capacity(slides.len());

        for batch in slides.chunks(self.batch_size) {
            let futures = batch.iter().map(|slide| self.condense_slide(slide));
            per_slide.extend(join_all(futures).await);
        }

        debug!(
            slides = slides.len(),
            degraded_total = degraded_slide_count(),
            "Condensation complete"
        );

        DocumentSynopsis::from_per_slide(per_slide)
    }

    async fn condense_slide(&self, slide: &SlideRecord) -> String {
        let text = slide.flattened_text();
        if text.is_empty() {
            return String::new();
        }

        let input = truncate_tail(&text, self.limits.max_input_chars);

        let outcome = tokio::time::timeout(self.timeout, self.backend.condense(input, &self.limits)).await;

        match outcome {
            Ok(Ok(synopsis)) => synopsis,
            Ok(Err(e)) => self.degrade(slide.position, input, &e.to_string()),
            Err(_) => self.degrade(slide.position, input, "timed out"),
        }
    }

    // Degrade, don't fail: substitute the raw truncated slide text.
    fn degrade(&self, position: usize, input: &str, reason: &str) -> String {
        let total = DEGRADED_SLIDES.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            slide = position,
            reason,
            degraded_total = total,
            "Condensation degraded to raw slide text"
        );
        input.to_string()
    }
}
