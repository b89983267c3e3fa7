//! End-to-end evaluation pipeline tests over mock backends.

#![cfg(feature = "mock")]

use std::sync::Arc;
use std::time::Duration;

use podium::backend::mock::{MockCondenseBackend, MockEmbedBackend, MockGenerateBackend};
use podium::backend::{GenerationLimits, ModelTier};
use podium::condense::CondensationStage;
use podium::orchestrator::Orchestrator;
use podium::payload::{EvaluationResult, MAX_OVERALL_SCORE};
use podium::reasoning::{DEFAULT_RETRY_BUDGET, ReasoningEvaluator};
use podium::semantic::SemanticScorer;
use podium::slides::SlideRecord;

fn slide(position: usize, title: &str, body: &[&str]) -> SlideRecord {
    SlideRecord::new(
        position,
        Some(title.to_string()),
        body.iter().map(|s| s.to_string()).collect(),
        None,
    )
}

fn scripted_document() -> String {
    serde_json::json!({
        "scores": {
            "relevance": 9.0,
            "clarity": 8.0,
            "technical_accuracy": 7.0,
            "structure": 8.0,
            "completeness": 6.0
        },
        "overall_score": 38.0,
        "strengths": ["clear architecture diagram"],
        "weaknesses": ["no failure-mode discussion"],
        "missing_elements": ["capacity planning"],
        "summary_evaluation": "Thorough treatment of the problem."
    })
    .to_string()
}

fn build_orchestrator(
    generator: Arc<MockGenerateBackend>,
) -> Orchestrator<MockCondenseBackend, MockEmbedBackend, MockGenerateBackend> {
    Orchestrator::new(
        CondensationStage::new(
            Arc::new(MockCondenseBackend::new()),
            GenerationLimits::for_condensation(),
            Duration::from_secs(5),
            4,
        ),
        Arc::new(SemanticScorer::new(Arc::new(MockEmbedBackend::new()))),
        ReasoningEvaluator::new(
            generator,
            GenerationLimits::for_tier(ModelTier::Lightweight),
            DEFAULT_RETRY_BUDGET,
            Duration::from_secs(5),
        ),
    )
}

fn assert_contract_holds(result: &EvaluationResult) {
    assert!(result.scores.in_bounds());
    assert_eq!(result.overall_score, result.scores.total());
    assert!(result.overall_score >= 0.0 && result.overall_score <= MAX_OVERALL_SCORE);
    assert!(result.metadata.semantic_relevance_score >= 0.0);
    assert!(result.metadata.semantic_relevance_score <= 10.0);
    assert!(result.metadata.adjusted_relevance_score >= 0.0);
    assert!(result.metadata.adjusted_relevance_score <= 10.0);
}

#[tokio::test]
async fn test_full_pipeline_with_scripted_judge() {
    let orchestrator = build_orchestrator(Arc::new(MockGenerateBackend::always(
        &scripted_document(),
    )));

    let slides = [
        slide(0, "Problem", &["event ingestion loses records under load"]),
        slide(1, "Design", &["a write ahead log absorbs ingestion bursts"]),
        slide(2, "Rollout", &["shadow traffic before the cutover"]),
    ];

    let result = orchestrator
        .evaluate("design a lossless event ingestion pipeline", &slides)
        .await
        .unwrap();

    assert_contract_holds(&result);
    assert_eq!(result.metadata.slide_count, 3);
    assert_eq!(result.metadata.llm_relevance_score, 9.0);
    assert_eq!(result.strengths, vec!["clear architecture diagram".to_string()]);
    assert_eq!(result.summary_evaluation, "Thorough treatment of the problem.");

    // the blended relevance replaces the raw generative value
    let blended = 0.7 * 9.0 + 0.3 * result.metadata.semantic_relevance_score;
    assert!((result.metadata.adjusted_relevance_score - blended).abs() < 1e-6);
    assert!((result.scores.relevance - blended).abs() < 1e-6);
}

#[tokio::test]
async fn test_judge_recovers_after_malformed_reply() {
    let generator = Arc::new(MockGenerateBackend::new());
    generator.push_ok("I think the deck is pretty good overall!");
    generator.push_ok(&scripted_document());

    let orchestrator = build_orchestrator(Arc::clone(&generator));
    let result = orchestrator
        .evaluate("judge this deck", &[slide(0, "Only", &["one slide"])])
        .await
        .unwrap();

    assert_contract_holds(&result);
    assert_eq!(result.metadata.llm_relevance_score, 9.0);
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn test_judge_never_recovering_yields_neutral_result() {
    let orchestrator = build_orchestrator(Arc::new(MockGenerateBackend::always("nope")));

    let result = orchestrator
        .evaluate("judge this deck", &[slide(0, "Only", &["one slide"])])
        .await
        .unwrap();

    assert_contract_holds(&result);
    assert_eq!(result.metadata.llm_relevance_score, 5.0);
    assert!(result.strengths.is_empty());
}

#[tokio::test]
async fn test_empty_document_is_all_zeros() {
    let orchestrator = build_orchestrator(Arc::new(MockGenerateBackend::always(
        &scripted_document(),
    )));

    let result = orchestrator.evaluate("judge nothing", &[]).await.unwrap();

    assert_contract_holds(&result);
    assert_eq!(result.overall_score, 0.0);
    assert_eq!(result.metadata.slide_count, 0);
    assert_eq!(result.metadata.semantic_relevance_score, 0.0);
}

#[tokio::test]
async fn test_topically_related_deck_ranks_higher() {
    let problem = "reduce cold start latency in serverless functions";

    let related = [
        slide(0, "Latency", &["serverless cold start latency hurts users"]),
        slide(1, "Warm pools", &["pre warmed functions cut cold start latency"]),
    ];
    let unrelated = [
        slide(0, "Vineyard", &["harvest timing decides the vintage"]),
        slide(1, "Fermentation", &["native yeasts ferment slowly in cold cellars"]),
    ];

    let related_result = build_orchestrator(Arc::new(MockGenerateBackend::always(
        &scripted_document(),
    )))
    .evaluate(problem, &related)
    .await
    .unwrap();

    let unrelated_result = build_orchestrator(Arc::new(MockGenerateBackend::always(
        &scripted_document(),
    )))
    .evaluate(problem, &unrelated)
    .await
    .unwrap();

    assert!(
        related_result.metadata.adjusted_relevance_score
            > unrelated_result.metadata.adjusted_relevance_score
    );
    assert!(related_result.overall_score > unrelated_result.overall_score);
}
