use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::errors::{PipelineError, Stage};
use super::identity::Identity;
use super::interpreter::{interpret_results, InterpretationInput};
use super::query_guard::check_read_only;
use super::relevance::{resolve_table_name, select_relevant_table};
use super::sampler::sample_table;
use super::sanitizer::sanitize_query;
use super::schema::introspect;
use super::synthesizer::synthesize_query;
use crate::config::{PipelineConfig, StageSettings};
use crate::graph::hint::request_graph_hint;
use crate::graph::{detect_graph_intent, select_graph_configuration, GraphHint, GraphPayload};
use crate::llm::{LlmClient, LlmStage};
use crate::store::{RowSet, Store};

/// Successful answer to one question
#[derive(Debug, Clone, Serialize)]
pub struct PipelineAnswer {
    /// The question as asked
    pub query: String,
    /// The query text that was executed
    pub sql: String,
    pub raw_results: RowSet,
    pub interpretation: String,
    pub table_used: String,
    pub graph: GraphPayload,
}

/// Shared across requests; holds no per-request state.
pub struct Pipeline {
    store: Arc<dyn Store>,
    llm: Arc<dyn LlmClient>,
    model: String,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn Store>,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            llm,
            model: model.into(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn stage(&self, settings: StageSettings) -> LlmStage<'_> {
        LlmStage::new(self.llm.as_ref(), &self.model, settings)
    }

    /// Answer `prompt` for `identity`.
    ///
    /// Identity and prompt are checked before anything touches the store or
    /// the model. Any stage failure aborts the request; only graph building
    /// degrades softly.
    pub async fn answer(
        &self,
        identity: Option<&Identity>,
        prompt: &str,
    ) -> Result<PipelineAnswer, PipelineError> {
        let identity = identity.ok_or(PipelineError::AuthenticationMissing)?;
        let question = prompt.trim();
        if question.is_empty() {
            return Err(PipelineError::EmptyPrompt);
        }

        let request_id = Uuid::new_v4();
        log::info!(
            "[{}] {} user={} prompt={:?}",
            request_id,
            Stage::Received,
            identity.user_id,
            question
        );

        let wants_graph = detect_graph_intent(question);
        log::debug!("[{}] {} graph={}", request_id, Stage::IntentChecked, wants_graph);

        let store = self.store.as_ref();

        let schema = introspect(store)
            .await
            .map_err(|e| PipelineError::upstream(Stage::SchemaLoaded, e))?;
        log::debug!("[{}] {} tables={}", request_id, Stage::SchemaLoaded, schema.len());

        let raw_table = select_relevant_table(
            self.stage(self.config.relevance),
            question,
            &schema,
            identity,
        )
        .await
        .map_err(|e| PipelineError::upstream(Stage::TableSelected, e))?
        .ok_or(PipelineError::RelevanceUnresolved)?;

        let table = resolve_table_name(&raw_table, &schema)
            .ok_or_else(|| PipelineError::UnknownTable {
                name: raw_table.clone(),
            })?
            .to_string();
        log::debug!("[{}] {} table={}", request_id, Stage::TableSelected, table);

        let sample = sample_table(
            store,
            &table,
            self.config.sample_rows,
            self.config.sample_char_budget,
        )
        .await
        .map_err(|e| PipelineError::upstream(Stage::ContentSampled, e))?;
        log::debug!(
            "[{}] {} rows={}",
            request_id,
            Stage::ContentSampled,
            sample.rows.len()
        );

        let generated = synthesize_query(
            self.stage(self.config.synthesis),
            question,
            &schema,
            &table,
            &sample,
            identity,
        )
        .await
        .map_err(|e| PipelineError::upstream(Stage::QuerySynthesized, e))?;
        log::debug!("[{}] {}:\n{}", request_id, Stage::QuerySynthesized, generated);

        let sql = sanitize_query(&generated);
        log::debug!("[{}] {}:\n{}", request_id, Stage::QuerySanitized, sql);

        if let Err(violation) = check_read_only(&sql) {
            if self.config.enforce_read_only {
                log::warn!("[{}] Rejected generated query: {}", request_id, violation);
                return Err(PipelineError::UnsafeQuery {
                    query: sql,
                    violation,
                });
            }
            log::warn!(
                "[{}] Executing query that failed the read-only check ({}); enforcement is off",
                request_id,
                violation
            );
        }

        let rows = store
            .execute_query(&sql)
            .await
            .map_err(|e| PipelineError::upstream(Stage::QueryExecuted, e))?;
        log::debug!("[{}] {} rows={}", request_id, Stage::QueryExecuted, rows.len());

        let interpretation = interpret_results(
            self.stage(self.config.interpretation),
            InterpretationInput {
                question,
                query: &sql,
                table: &table,
                sample: &sample,
                rows: &rows,
            },
            self.config.result_char_budget,
        )
        .await
        .map_err(|e| PipelineError::upstream(Stage::ResultInterpreted, e))?;
        log::debug!("[{}] {}", request_id, Stage::ResultInterpreted);

        let graph = if wants_graph {
            let graph = self.evaluate_graph(request_id, question, &rows).await;
            log::debug!(
                "[{}] {} required={}",
                request_id,
                Stage::GraphEvaluated,
                graph.required
            );
            graph
        } else {
            GraphPayload::not_required()
        };

        log::info!(
            "[{}] {} table={} rows={}",
            request_id,
            Stage::Responded,
            table,
            rows.len()
        );

        Ok(PipelineAnswer {
            query: question.to_string(),
            sql,
            raw_results: rows,
            interpretation,
            table_used: table,
            graph,
        })
    }

    /// Never fails: a hint or selection problem yields `required: false`.
    async fn evaluate_graph(&self, request_id: Uuid, question: &str, rows: &RowSet) -> GraphPayload {
        let hint = if self.config.llm_graph_hints {
            match request_graph_hint(self.stage(self.config.graph_hint), question, rows).await {
                Ok(hint) => hint,
                Err(e) => {
                    log::warn!("[{}] Graph hint unavailable, using heuristics: {}", request_id, e);
                    GraphHint::default()
                }
            }
        } else {
            GraphHint::default()
        };

        match select_graph_configuration(question, rows, &hint) {
            Ok(decision) => GraphPayload::from_decision(decision, rows.clone()),
            Err(e) => {
                log::warn!("[{}] Graph preparation failed: {}", request_id, e);
                GraphPayload::not_required()
            }
        }
    }
}
