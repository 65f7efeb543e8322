mod render;

use clap::Parser;
use reqwest::Client;
use rustyline::{error::ReadlineError, DefaultEditor};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(author, version, about = "Ask questions about your own records", long_about = None)]
struct Args {
    #[arg(short, long, env = "ASKDB_URL", default_value = "http://localhost:4000")]
    url: String,

    /// Identity forwarded as x-user-id
    #[arg(long, env = "ASKDB_USER_ID")]
    user_id: String,

    /// Identity forwarded as x-user-email
    #[arg(long, env = "ASKDB_USER_EMAIL", default_value = "")]
    email: String,
}

fn print_usage() {
    println!("AskDB Client Commands:");
    println!("  <question>  - Ask a question about your data (default)");
    println!("  :raw        - Toggle printing of the raw result rows");
    println!("  :help       - Show this help");
    println!("  :quit       - Exit");
    println!();
    println!("Examples:");
    println!("  how much did I spend last month?");
    println!("  bar chart of my holdings by company");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let client = Client::new();
    let mut show_raw = false;

    println!(
        "\nConnected to AskDB server at {} as user {}.",
        args.url, args.user_id
    );
    println!("Type :help for commands.\n");

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline("askdb :) ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                rl.add_history_entry(input)?;

                match input {
                    ":help" | ":h" => print_usage(),
                    ":raw" => {
                        show_raw = !show_raw;
                        println!("Raw rows {}", if show_raw { "on" } else { "off" });
                    }
                    ":quit" | ":q" => break,
                    cmd if cmd.starts_with(':') => {
                        println!(
                            "Unknown command: {}. Type :help for available commands.",
                            cmd
                        );
                    }
                    question => match ask(&client, &args, question).await {
                        Ok(response) => print_answer(&response, show_raw),
                        Err(e) => eprintln!("Error: {}", e),
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    println!("\nBye");
    Ok(())
}

async fn ask(client: &Client, args: &Args, question: &str) -> Result<Value, String> {
    let endpoint = format!("{}/api/ai/process", args.url.trim_end_matches('/'));

    let response = client
        .post(&endpoint)
        .header("x-user-id", &args.user_id)
        .header("x-user-email", &args.email)
        .json(&json!({ "prompt": question }))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(|e| e.to_string());
    }

    let text = response.text().await.unwrap_or_default();
    Err(describe_error(status.as_u16(), &text))
}

/// `{error, details?}` bodies become "error (details)"; anything else is shown raw.
fn describe_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("request failed");
            match value.get("details").and_then(Value::as_str) {
                Some(details) => format!("{} ({}): {}", error, status, details),
                None => format!("{} ({})", error, status),
            }
        }
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}

fn print_answer(response: &Value, show_raw: bool) {
    let interpretation = response
        .get("interpretation")
        .and_then(Value::as_str)
        .unwrap_or("");
    println!("\n{}\n", interpretation);

    let table = response
        .get("table_used")
        .and_then(Value::as_str)
        .unwrap_or("?");
    let sql = response.get("sql").and_then(Value::as_str).unwrap_or("");
    println!("  table: {}", table);
    println!("  query: {}", sql.replace('\n', " "));

    if show_raw {
        if let Some(rows) = response.get("raw_results") {
            println!(
                "\n{}",
                serde_json::to_string_pretty(rows).unwrap_or_default()
            );
        }
    }

    if let Some(chart) = response.get("graph").and_then(render::render_chart) {
        println!("\n{}", chart);
    }
    println!();
}
