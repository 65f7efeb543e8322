//! Query synthesis: question + table context → raw (unsanitized) query text

use super::identity::Identity;
use super::prompts;
use super::sampler::ContentSample;
use super::schema::SchemaMap;
use crate::llm::{LlmError, LlmStage};

pub async fn synthesize_query(
    stage: LlmStage<'_>,
    question: &str,
    schema: &SchemaMap,
    table: &str,
    sample: &ContentSample,
    identity: &Identity,
) -> Result<String, LlmError> {
    let columns = schema.describe_table(table).unwrap_or_default();
    stage
        .complete(
            prompts::synthesis_system(table, &columns, &sample.text, identity),
            question.to_string(),
        )
        .await
}
