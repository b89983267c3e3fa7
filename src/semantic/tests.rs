use std::sync::Arc;

use super::{RelevanceSignal, SemanticScorer, cosine_similarity, map_cosine_to_score};
use crate::backend::mock::MockEmbedBackend;
use crate::slides::DocumentSynopsis;

fn scorer() -> SemanticScorer<MockEmbedBackend> {
    SemanticScorer::new(Arc::new(MockEmbedBackend::new()))
}

#[test]
fn test_relevance_signal_clamps_on_construction() {
    assert_eq!(RelevanceSignal::new(-2.0).value(), 0.0);
    assert_eq!(RelevanceSignal::new(12.0).value(), 10.0);
    assert_eq!(RelevanceSignal::new(f64::NAN).value(), 0.0);
    assert_eq!(RelevanceSignal::new(7.5).value(), 7.5);
}

#[test]
fn test_cosine_mapping_endpoints() {
    assert_eq!(map_cosine_to_score(-1.0), 0.0);
    assert_eq!(map_cosine_to_score(1.0), 10.0);
    assert!((map_cosine_to_score(0.0) - 5.0).abs() < 1e-9);
}

#[test]
fn test_cosine_mapping_clamps_overshoot() {
    assert_eq!(map_cosine_to_score(1.0001), 10.0);
    assert_eq!(map_cosine_to_score(-1.0001), 0.0);
}

#[test]
fn test_cosine_mapping_is_monotonic() {
    let inputs = [-1.0, -0.6, -0.2, 0.0, 0.3, 0.7, 0.95, 1.0];
    let scores: Vec<f64> = inputs.iter().map(|&c| map_cosine_to_score(c)).collect();

    for window in scores.windows(2) {
        assert!(window[1] >= window[0], "mapping must be non-decreasing");
    }
}

#[test]
fn test_cosine_similarity_basics() {
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), -1.0);
}

#[test]
fn test_cosine_similarity_degenerate_inputs() {
    assert_eq!(cosine_similarity(&[], &[]), 0.0);
    assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
}

#[test]
fn test_empty_synopsis_scores_zero() {
    let scorer = scorer();
    assert_eq!(scorer.score("any problem", "").value(), 0.0);
    assert_eq!(scorer.score("any problem", "   ").value(), 0.0);
}

#[test]
fn test_all_blank_slide_synopsis_scores_zero() {
    // Joining blank per-slide synopses leaves only the slide markers
    // in the overall text. That still counts as an empty document.
    let scorer = scorer();
    let synopsis = DocumentSynopsis::from_per_slide(vec![String::new(), String::new()]);

    assert!(!synopsis.overall().is_empty());
    assert_eq!(scorer.score("any problem", synopsis.overall()).value(), 0.0);
}

#[test]
fn test_scoring_is_deterministic() {
    let scorer = scorer();
    let a = scorer.score("build a web scraper", "scraper for online shops");
    let b = scorer.score("build a web scraper", "scraper for online shops");
    assert_eq!(a.value(), b.value());
}

#[test]
fn test_related_content_outranks_unrelated() {
    let scorer = scorer();
    let problem = "build a web scraper for e-commerce sites";

    let related = scorer.score(problem, "our scraper crawls e-commerce sites nightly");
    let unrelated = scorer.score(problem, "a musical about singing cats");

    assert!(related.value() > unrelated.value());
}
