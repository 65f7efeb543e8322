use super::{ChatMessage, CompletionRequest, LlmClient, LlmError};
use crate::config::StageSettings;

/// A completion client bound to one stage's model and sampling settings.
///
/// Every LLM-backed stage makes exactly one call of the same shape: a system
/// instruction, one user message, the stage's temperature and output budget.
#[derive(Clone, Copy)]
pub struct LlmStage<'a> {
    pub llm: &'a dyn LlmClient,
    pub model: &'a str,
    pub settings: StageSettings,
}

impl<'a> LlmStage<'a> {
    pub fn new(llm: &'a dyn LlmClient, model: &'a str, settings: StageSettings) -> Self {
        Self {
            llm,
            model,
            settings,
        }
    }

    pub fn request(&self, system: String, user: String) -> CompletionRequest {
        CompletionRequest {
            model: self.model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    pub async fn complete(&self, system: String, user: String) -> Result<String, LlmError> {
        self.llm.complete(self.request(system, user)).await
    }
}
