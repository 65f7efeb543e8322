use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Sampling temperature and output budget for one LLM-backed stage
#[derive(Clone, Copy, Debug, PartialEq, Validate, Serialize, Deserialize)]
pub struct StageSettings {
    #[validate(range(min = 0.0, max = 2.0, message = "Temperature must be between 0 and 2"))]
    pub temperature: f32,

    #[validate(range(min = 1, max = 32768, message = "Max tokens must be between 1 and 32768"))]
    pub max_tokens: u32,
}

impl StageSettings {
    pub const fn new(temperature: f32, max_tokens: u32) -> Self {
        Self {
            temperature,
            max_tokens,
        }
    }
}

/// Tuning of the question-answering pipeline
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rows fetched from the selected table for grounding
    #[validate(range(min = 1, max = 10000, message = "Sample rows must be between 1 and 10000"))]
    pub sample_rows: u32,

    /// Character budget of the sampled rows once rendered as text
    #[validate(range(min = 1, message = "Sample character budget must be positive"))]
    pub sample_char_budget: usize,

    /// Character budget of the result rows handed to the interpreter
    #[validate(range(min = 1, message = "Result character budget must be positive"))]
    pub result_char_budget: usize,

    /// Reject generated SQL that is not a single read statement
    pub enforce_read_only: bool,

    /// Ask the model for a coarse chart hint before the heuristics run
    pub llm_graph_hints: bool,

    #[validate(nested)]
    pub relevance: StageSettings,

    #[validate(nested)]
    pub synthesis: StageSettings,

    #[validate(nested)]
    pub interpretation: StageSettings,

    #[validate(nested)]
    pub graph_hint: StageSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rows: 100,
            sample_char_budget: 1000,
            result_char_budget: 12_000,
            enforce_read_only: true,
            llm_graph_hints: false,
            relevance: StageSettings::new(0.1, 50),
            synthesis: StageSettings::new(0.2, 512),
            interpretation: StageSettings::new(0.3, 150),
            graph_hint: StageSettings::new(0.1, 200),
        }
    }
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// Largest accepted request body in bytes
    #[serde(default = "default_body_limit")]
    #[validate(range(min = 1024, message = "Body limit must be at least 1024 bytes"))]
    pub body_limit_bytes: usize,

    /// Requests running longer than this are aborted with 408
    #[serde(default)]
    #[validate(range(min = 1, message = "Request timeout must be at least one second"))]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    #[validate(nested)]
    pub pipeline: PipelineConfig,
}

fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 4000,
            body_limit_bytes: default_body_limit(),
            request_timeout_secs: None,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            http_host: cli.http_host,
            http_port: cli.http_port,
            body_limit_bytes: cli.body_limit_bytes,
            request_timeout_secs: cli.request_timeout_secs,
            pipeline: PipelineConfig {
                sample_rows: cli.sample_rows,
                sample_char_budget: cli.sample_chars,
                result_char_budget: cli.result_chars,
                enforce_read_only: cli.enforce_read_only,
                llm_graph_hints: cli.llm_graph_hints,
                ..PipelineConfig::default()
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub http_host: String,
    pub http_port: u16,
    pub body_limit_bytes: usize,
    pub sample_rows: u32,
    pub sample_chars: usize,
    pub result_chars: usize,
    pub request_timeout_secs: Option<u64>,
    pub enforce_read_only: bool,
    pub llm_graph_hints: bool,
}
