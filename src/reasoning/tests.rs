use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::parse::{extract_json_object, validate_payload};
use super::{DEFAULT_RETRY_BUDGET, ReasoningEvaluator, fallback_payload};
use crate::backend::GenerationLimits;
use crate::backend::mock::MockGenerateBackend;

fn valid_document() -> String {
    json!({
        "scores": {
            "relevance": 8.0,
            "clarity": 7.0,
            "technical_accuracy": 6.5,
            "structure": 7.5,
            "completeness": 5.0
        },
        "overall_score": 34.0,
        "strengths": ["clear problem framing"],
        "weaknesses": ["no deployment story"],
        "missing_elements": ["cost model"],
        "summary_evaluation": "A solid deck with room to grow."
    })
    .to_string()
}

fn evaluator(backend: Arc<MockGenerateBackend>) -> ReasoningEvaluator<MockGenerateBackend> {
    ReasoningEvaluator::new(
        backend,
        GenerationLimits {
            max_input_chars: 8_000,
            max_output_tokens: 512,
        },
        DEFAULT_RETRY_BUDGET,
        Duration::from_secs(5),
    )
}

#[test]
fn test_extract_plain_object() {
    let doc = extract_json_object(r#"{"a": 1}"#).unwrap();
    assert_eq!(doc, r#"{"a": 1}"#);
}

#[test]
fn test_extract_object_surrounded_by_prose_and_fences() {
    let text = "Sure! Here is the evaluation:\n```json\n{\"a\": {\"b\": 2}}\n```\nHope it helps.";
    assert_eq!(extract_json_object(text).unwrap(), r#"{"a": {"b": 2}}"#);
}

#[test]
fn test_extract_ignores_braces_inside_strings() {
    let text = r#"{"note": "unbalanced } brace { inside"}"#;
    assert_eq!(extract_json_object(text).unwrap(), text);
}

#[test]
fn test_extract_handles_escaped_quotes() {
    let text = r#"{"note": "she said \"hi\" {"}"#;
    assert_eq!(extract_json_object(text).unwrap(), text);
}

#[test]
fn test_extract_rejects_unbalanced_text() {
    assert!(extract_json_object("no json here").is_none());
    assert!(extract_json_object(r#"{"truncated": "#).is_none());
}

#[test]
fn test_validate_accepts_conforming_document() {
    let value: serde_json::Value = serde_json::from_str(&valid_document()).unwrap();
    let payload = validate_payload(&value).unwrap();
    assert_eq!(payload.scores.relevance, 8.0);
    assert_eq!(payload.strengths, vec!["clear problem framing".to_string()]);
}

#[test]
fn test_validate_rejects_missing_score() {
    let value = json!({
        "scores": {"relevance": 8.0},
        "strengths": [], "weaknesses": [], "missing_elements": [],
        "summary_evaluation": "x"
    });
    let reason = validate_payload(&value).unwrap_err();
    assert!(reason.contains("clarity"), "got: {reason}");
}

#[test]
fn test_validate_rejects_out_of_range_score() {
    let mut value: serde_json::Value = serde_json::from_str(&valid_document()).unwrap();
    value["scores"]["relevance"] = json!(11.0);
    let reason = validate_payload(&value).unwrap_err();
    assert!(reason.contains("outside the allowed range"), "got: {reason}");
}

#[test]
fn test_validate_rejects_non_string_list_items() {
    let mut value: serde_json::Value = serde_json::from_str(&valid_document()).unwrap();
    value["weaknesses"] = json!(["ok", 42]);
    let reason = validate_payload(&value).unwrap_err();
    assert!(reason.contains("weaknesses"), "got: {reason}");
}

#[test]
fn test_validate_rejects_missing_summary() {
    let mut value: serde_json::Value = serde_json::from_str(&valid_document()).unwrap();
    value.as_object_mut().unwrap().remove("summary_evaluation");
    assert!(validate_payload(&value).is_err());
}

#[tokio::test]
async fn test_first_attempt_success() {
    let backend = Arc::new(MockGenerateBackend::always(&valid_document()));
    let outcome = evaluator(Arc::clone(&backend))
        .evaluate("problem", "synopsis")
        .await;

    assert!(!outcome.fell_back);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.payload.scores.clarity, 7.0);
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_repair_prompt_carries_previous_output() {
    let backend = Arc::new(MockGenerateBackend::new());
    backend.push_ok("garbage with no json at all");
    backend.push_ok(&valid_document());

    let outcome = evaluator(Arc::clone(&backend))
        .evaluate("problem", "synopsis")
        .await;

    assert!(!outcome.fell_back);
    assert_eq!(outcome.attempts, 2);

    let prompts = backend.recorded_prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("garbage with no json at all"));
    assert!(prompts[1].contains("rejected"));
}

#[tokio::test]
async fn test_out_of_range_output_triggers_repair() {
    let backend = Arc::new(MockGenerateBackend::new());
    let mut bad: serde_json::Value = serde_json::from_str(&valid_document()).unwrap();
    bad["scores"]["structure"] = json!(42.0);
    backend.push_ok(&bad.to_string());
    backend.push_ok(&valid_document());

    let outcome = evaluator(Arc::clone(&backend))
        .evaluate("problem", "synopsis")
        .await;

    assert!(!outcome.fell_back);
    assert_eq!(outcome.attempts, 2);
    assert!(backend.recorded_prompts()[1].contains("outside the allowed range"));
}

#[tokio::test]
async fn test_all_attempts_malformed_falls_back() {
    let backend = Arc::new(MockGenerateBackend::always("still not json"));
    let outcome = evaluator(Arc::clone(&backend))
        .evaluate("problem", "synopsis")
        .await;

    assert!(outcome.fell_back);
    assert_eq!(outcome.attempts, DEFAULT_RETRY_BUDGET);
    assert_eq!(backend.call_count() as u32, DEFAULT_RETRY_BUDGET);
    assert!(outcome.payload.scores.in_bounds());
    assert_eq!(outcome.payload.scores.relevance, 5.0);
}

#[tokio::test]
async fn test_backend_errors_exhaust_budget_then_fall_back() {
    let backend = Arc::new(MockGenerateBackend::new());
    backend.push_err("connection refused");

    let outcome = evaluator(Arc::clone(&backend))
        .evaluate("problem", "synopsis")
        .await;

    assert!(outcome.fell_back);
    assert_eq!(outcome.attempts, DEFAULT_RETRY_BUDGET);
}

#[test]
fn test_fallback_payload_is_neutral_and_in_bounds() {
    let payload = fallback_payload();
    assert!(payload.scores.in_bounds());
    assert_eq!(payload.scores.total(), 25.0);
    assert!(payload.strengths.is_empty());
    assert!(payload.weaknesses.is_empty());
    assert!(payload.missing_elements.is_empty());
    assert!(!payload.summary_evaluation.is_empty());
}
