//! Slide records and document synopses.
//!
//! [`SlideRecord`] is the input contract with the extraction collaborator:
//! an ordered, immutable snapshot of one slide's text. [`DocumentSynopsis`]
//! is derived per request by the condensation stage and never persisted.


use serde::{Deserialize, Serialize};

/// Separator placed between per-slide synopses in the overall synopsis.
pub const SLIDE_MARKER: &str = "\n---\n";

/// Extracted text content of a single slide, in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Zero-based position within the document.
    pub position: usize,

    /// Title placeholder text, if the slide has one.
    #[serde(default)]
    pub title: Option<String>,

    /// Body text runs, in reading order.
    #[serde(default)]
    pub body: Vec<String>,

    /// Speaker notes, if present.
    #[serde(default)]
    pub notes: Option<String>,
}

impl SlideRecord {
    /// Creates a slide record from its parts.
    pub fn new(position: usize, title: Option<String>, body: Vec<String>, notes: Option<String>) -> Self {
        Self {
            position,
            title,
            body,
            notes,
        }
    }

    /// Joins title, body, and notes into one input string for condensation.
    pub fn flattened_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(self.body.len() + 2);

        if let Some(title) = &self.title {
            let title = title.trim();
            if !title.is_empty() {
                parts.push(title);
            }
        }

        for run in &self.body {
            let run = run.trim();
            if !run.is_empty() {
                parts.push(run);
            }
        }

        if let Some(notes) = &self.notes {
            let notes = notes.trim();
            if !notes.is_empty() {
                parts.push(notes);
            }
        }

        parts.join(" ")
    }

    /// Returns `true` if the slide carries no extractable text.
    pub fn is_blank(&self) -> bool {
        self.flattened_text().is_empty()
    }
}

/// Condensed representation of a document: one synopsis per slide plus an
/// overall synopsis assembled in slide order.
#[derive(Debug, Clone)]
pub struct DocumentSynopsis {
    per_slide: Vec<String>,
    overall: String,
}

impl DocumentSynopsis {
    /// Assembles a synopsis from per-slide condensed strings.
    ///
    /// Blank slides contribute an empty string, so they add nothing to the
    /// overall synopsis beyond the [`SLIDE_MARKER`] separating their
    /// neighbors.
    pub fn from_per_slide(per_slide: Vec<String>) -> Self {
        let overall = per_slide.join(SLIDE_MARKER);
        Self { per_slide, overall }
    }

    /// Per-slide synopses, in slide order.
    pub fn per_slide(&self) -> &[String] {
        &self.per_slide
    }

    /// The whole-document synopsis.
    pub fn overall(&self) -> &str {
        &self.overall
    }

    /// Number of slides this synopsis was derived from.
    pub fn slide_count(&self) -> usize {
        self.per_slide.len()
    }

    /// Returns `true` if no slide produced any synopsis text.
    pub fn is_blank(&self) -> bool {
        self.per_slide.iter().all(|s| s.is_empty())
    }
}
