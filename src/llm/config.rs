use std::env;

/// Supported API providers
#[derive(Debug, Clone, PartialEq)]
pub enum LlmProvider {
    /// OpenAI chat-completions wire format (OpenAI, Groq, Ollama, vLLM, LiteLLM, ...)
    OpenAI,
    Anthropic,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "openai",
            LlmProvider::Anthropic => "anthropic",
        }
    }
}

/// LLM configuration loaded from environment variables
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub provider: LlmProvider,
}

// Keeps the API key out of logs
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("api_url", &self.api_url)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl LlmConfig {
    /// Load config from environment. Returns None if no API key is set.
    ///
    /// Checks `ASKDB_LLM_PROVIDER` to determine the provider:
    /// - `"anthropic"` → Anthropic messages API (`ANTHROPIC_API_KEY`)
    /// - `"openai"` or unset → OpenAI-compatible mode (`OPENAI_API_KEY`, then `GROQ_API_KEY`)
    pub fn from_env() -> Option<Self> {
        let provider_str = env::var("ASKDB_LLM_PROVIDER")
            .unwrap_or_default()
            .to_lowercase();

        let (provider, api_key, default_model, default_url) = match provider_str.as_str() {
            "anthropic" => {
                let key = env::var("ANTHROPIC_API_KEY").ok()?;
                (
                    LlmProvider::Anthropic,
                    key,
                    "claude-sonnet-4-20250514".to_string(),
                    "https://api.anthropic.com/v1/messages".to_string(),
                )
            }
            _ => {
                if let Ok(key) = env::var("OPENAI_API_KEY") {
                    (
                        LlmProvider::OpenAI,
                        key,
                        "gpt-4o-mini".to_string(),
                        "https://api.openai.com/v1/chat/completions".to_string(),
                    )
                } else {
                    let key = env::var("GROQ_API_KEY").ok()?;
                    (
                        LlmProvider::OpenAI,
                        key,
                        "llama-3.1-8b-instant".to_string(),
                        "https://api.groq.com/openai/v1/chat/completions".to_string(),
                    )
                }
            }
        };

        if api_key.is_empty() {
            return None;
        }

        Some(Self {
            api_key,
            model: env::var("ASKDB_LLM_MODEL").unwrap_or(default_model),
            api_url: env::var("ASKDB_LLM_API_URL").unwrap_or(default_url),
            provider,
        })
    }
}
