//! Deterministic prompt construction for the reasoning evaluator.

use crate::backend::GenerationLimits;
use crate::condense::truncate_tail;

const SCHEMA: &str = r#"{
  "scores": {
    "relevance": <0-10>,
    "clarity": <0-10>,
    "technical_accuracy": <0-10>,
    "structure": <0-10>,
    "completeness": <0-10>
  },
  "overall_score": <sum of the five scores>,
  "strengths": [<specific strengths, each a string>],
  "weaknesses": [<specific weaknesses, each a string>],
  "missing_elements": [<missing essentials, each a string>],
  "summary_evaluation": "<3-5 sentence verdict>"
}"#;

const INSTRUCTIONS: &str = "You are a strict judge at a technical competition. Evaluate the \
     following slide deck against the problem statement. Demand concrete \
     evidence: implementation detail, feasibility, and a complete narrative.\n\
     \n\
     Score each criterion from 0 to 10:\n\
     1. relevance: does the deck address the stated problem?\n\
     2. clarity: is the story easy to follow and the value clear?\n\
     3. technical_accuracy: is the approach sound and correctly described?\n\
     4. structure: does the deck flow logically from problem to ask?\n\
     5. completeness: is the solution fully worked, with evidence it runs?\n\
     \n\
     Return ONLY the following JSON document, with no additional text:";

/// Builds the evaluation prompt, truncating the synopsis to fit the input
/// budget. Deterministic for identical inputs.
pub fn build_prompt(problem_statement: &str, synopsis: &str, limits: &GenerationLimits) -> String {
    let fixed_len = INSTRUCTIONS.len() + SCHEMA.len() + problem_statement.len() + 128;
    let synopsis_budget = limits.max_input_chars.saturating_sub(fixed_len).max(256);
    let synopsis = truncate_tail(synopsis, synopsis_budget);

    format!(
        "{INSTRUCTIONS}\n{SCHEMA}\n\nPROBLEM STATEMENT:\n{problem_statement}\n\nPRESENTATION CONTENT:\n{synopsis}\n"
    )
}

/// Builds the correction prompt used by the REPAIR state: the original task
/// plus the invalid output and the reason it was rejected.
pub fn build_repair_prompt(base_prompt: &str, previous_output: &str, reason: &str, limits: &GenerationLimits) -> String {
    // Keep the tail budget honest: the previous output can be arbitrarily
    // long garbage.
    let previous_budget = limits
        .max_input_chars
        .saturating_sub(base_prompt.len() + reason.len() + 256)
        .max(256);
    let previous = truncate_tail(previous_output, previous_budget);

    format!(
        "{base_prompt}\n\nYour previous reply was rejected: {reason}.\n\
         Previous reply:\n{previous}\n\n\
         Reply again with ONLY the requested JSON document, exactly matching \
         the schema and its numeric bounds."
    )
}
