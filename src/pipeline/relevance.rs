//! Relevance selection: pick the one table most likely to answer the question

use super::identity::Identity;
use super::prompts;
use super::schema::SchemaMap;
use crate::llm::{LlmError, LlmStage};

/// Ask the model for the most relevant table.
///
/// Returns `None` only when the model answers with empty text; the answer is
/// otherwise returned trimmed and unvalidated.
pub async fn select_relevant_table(
    stage: LlmStage<'_>,
    question: &str,
    schema: &SchemaMap,
    identity: &Identity,
) -> Result<Option<String>, LlmError> {
    let answer = stage
        .complete(
            prompts::relevance_system(identity),
            prompts::relevance_user(&schema.describe(), question),
        )
        .await?;

    let answer = answer.trim();
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer.to_string()))
    }
}

/// Map the model's answer onto a real table of `schema`.
///
/// Tolerates surrounding quotes or backticks, a trailing period and a
/// `database.` qualifier; the catalog only lists the current database.
pub fn resolve_table_name<'s>(raw: &str, schema: &'s SchemaMap) -> Option<&'s str> {
    let first_line = raw.lines().next().unwrap_or_default();
    let cleaned = first_line
        .trim()
        .trim_end_matches('.')
        .trim_matches(|c| c == '`' || c == '"' || c == '\'')
        .trim();

    if cleaned.is_empty() {
        return None;
    }

    schema.resolve_table(cleaned).or_else(|| {
        let (_, unqualified) = cleaned.rsplit_once('.')?;
        let unqualified = unqualified.trim_matches(|c| c == '`' || c == '"');
        schema.resolve_table(unqualified)
    })
}
