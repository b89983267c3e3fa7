//! Tolerant extraction and validation of the generative payload.

use serde_json::Value;

use crate::payload::{GenerativePayload, MAX_SCORE, MIN_SCORE};

/// Dimension fields required under `scores`.
pub const SCORE_FIELDS: [&str; 5] = [
    "relevance",
    "clarity",
    "technical_accuracy",
    "structure",
    "completeness",
];

const LIST_FIELDS: [&str; 3] = ["strengths", "weaknesses", "missing_elements"];

/// Locates the outermost balanced JSON object within `text`.
///
/// Tolerates surrounding prose and code fences: everything before the first
/// `{` and after its matching close is ignored. String-aware, so braces
/// inside quoted values do not confuse the balance count.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Checks the decoded document against the schema: every required field
/// present, every numeric field a number in `[0, 10]`, every list field a
/// list of strings.
///
/// Returns the reason for rejection, phrased for inclusion in the repair
/// prompt.
pub fn validate_payload(value: &Value) -> Result<GenerativePayload, String> {
    let scores = value
        .get("scores")
        .ok_or("missing required field 'scores'")?
        .as_object()
        .ok_or("'scores' must be a JSON object")?;

    for field in SCORE_FIELDS {
        let number = scores
            .get(field)
            .ok_or_else(|| format!("missing required score '{field}'"))?
            .as_f64()
            .ok_or_else(|| format!("score '{field}' must be a number"))?;

        if !(MIN_SCORE..=MAX_SCORE).contains(&number) {
            return Err(format!(
                "score '{field}' is {number}, outside the allowed range [0, 10]"
            ));
        }
    }

    for field in LIST_FIELDS {
        let list = value
            .get(field)
            .ok_or_else(|| format!("missing required field '{field}'"))?
            .as_array()
            .ok_or_else(|| format!("'{field}' must be a list"))?;

        if list.iter().any(|item| !item.is_string()) {
            return Err(format!("'{field}' must contain only strings"));
        }
    }

    let summary = value
        .get("summary_evaluation")
        .ok_or("missing required field 'summary_evaluation'")?;
    if !summary.is_string() {
        return Err("'summary_evaluation' must be a string".to_string());
    }

    serde_json::from_value(value.clone()).map_err(|e| format!("payload failed to decode: {e}"))
}
