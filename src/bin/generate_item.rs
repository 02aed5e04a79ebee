//! Stage (a): write today's article to `item.json` (OpenAI, or an offline fallback).

use std::process::ExitCode;

use chrono::Local;
use daily_nugget_feed::config::GenerateConfig;
use daily_nugget_feed::logging::init_tracing;
use daily_nugget_feed::stages::{build_source, generate_item};
use daily_nugget_feed::Result;

async fn run() -> Result<String> {
    let cfg = GenerateConfig::from_env()?;
    let source = build_source(&cfg)?;
    let today = Local::now().date_naive();
    let acquired = generate_item(&cfg, source.as_ref(), today).await?;
    Ok(acquired.article.topic)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local runs; no-op in CI.
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(topic) => {
            println!("[INFO] Article for topic '{topic}' generated.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[ERROR] {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
