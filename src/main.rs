use std::path::PathBuf;

use askdb::{config, server};
use clap::Parser;

/// AskDB - ask questions about your own records in ClickHouse
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP server host address
    #[arg(long, env = "ASKDB_HOST", default_value = "0.0.0.0")]
    http_host: String,

    /// HTTP server port
    #[arg(long, env = "ASKDB_PORT", default_value_t = 4000)]
    http_port: u16,

    /// Largest accepted request body in bytes
    #[arg(long, env = "ASKDB_BODY_LIMIT_BYTES", default_value_t = 64 * 1024)]
    body_limit_bytes: usize,

    /// Load the full server configuration from a YAML file instead
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of rows fetched from the selected table to ground query synthesis
    #[arg(long, env = "ASKDB_SAMPLE_ROWS", default_value_t = 100)]
    sample_rows: u32,

    /// Character budget for the sampled rows embedded in prompts
    #[arg(long, env = "ASKDB_SAMPLE_CHARS", default_value_t = 1000)]
    sample_chars: usize,

    /// Character budget for the result rows handed to the interpreter
    #[arg(long, env = "ASKDB_RESULT_CHARS", default_value_t = 12_000)]
    result_chars: usize,

    /// Abort requests that run longer than this many seconds
    #[arg(long, env = "ASKDB_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Execute generated SQL without the read-only statement guard
    #[arg(long, env = "ASKDB_ALLOW_UNGUARDED_QUERIES")]
    allow_unguarded_queries: bool,

    /// Ask the model for a coarse chart hint before the heuristics run
    #[arg(long, env = "ASKDB_LLM_GRAPH_HINTS")]
    llm_graph_hints: bool,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host,
            http_port: cli.http_port,
            body_limit_bytes: cli.body_limit_bytes,
            sample_rows: cli.sample_rows,
            sample_chars: cli.sample_chars,
            result_chars: cli.result_chars,
            request_timeout_secs: cli.request_timeout_secs,
            enforce_read_only: !cli.allow_unguarded_queries, // Invert the flag
            llm_graph_hints: cli.llm_graph_hints,
        }
    }
}

#[tokio::main]
async fn main() {
    // Defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // `.env` must be loaded before clap reads the environment
    dotenvy::dotenv().ok();
    let mut cli = Cli::parse();

    println!("\nAskDB v{}\n", env!("CARGO_PKG_VERSION"));

    let config = match cli.config.take() {
        Some(path) => config::ServerConfig::from_yaml_file(path),
        None => config::ServerConfig::from_cli(cli.into()),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    server::run_with_config(config).await;
}
