//! Result interpretation: the only stage whose output the user reads as prose

use super::prompts;
use super::sampler::ContentSample;
use crate::llm::{LlmError, LlmStage};
use crate::store::RowSet;
use crate::utils::text::truncate_chars;

pub struct InterpretationInput<'a> {
    pub question: &'a str,
    pub query: &'a str,
    pub table: &'a str,
    pub sample: &'a ContentSample,
    pub rows: &'a RowSet,
}

/// Compact JSON of the rows, cut to `char_budget` characters
pub fn render_results(rows: &RowSet, char_budget: usize) -> String {
    let json = serde_json::to_string(rows).unwrap_or_else(|_| "[]".to_string());
    truncate_chars(&json, char_budget).to_string()
}

pub async fn interpret_results(
    stage: LlmStage<'_>,
    input: InterpretationInput<'_>,
    result_char_budget: usize,
) -> Result<String, LlmError> {
    let results = render_results(input.rows, result_char_budget);
    let answer = stage
        .complete(
            prompts::INTERPRETATION_SYSTEM.to_string(),
            prompts::interpretation_user(
                input.question,
                input.query,
                input.table,
                &input.sample.text,
                &results,
            ),
        )
        .await?;
    Ok(answer.trim().to_string())
}
