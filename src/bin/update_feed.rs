//! Stage (b): merge `item.json` into `feed.xml`.

use std::process::ExitCode;

use chrono::Utc;
use daily_nugget_feed::config::FeedConfig;
use daily_nugget_feed::logging::init_tracing;
use daily_nugget_feed::stages::update_feed;

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    let result = FeedConfig::from_env().and_then(|cfg| {
        update_feed(&cfg, Utc::now())?;
        Ok(cfg)
    });
    match result {
        Ok(cfg) => {
            println!(
                "[INFO] {} updated (max {} items).",
                cfg.feed_path.display(),
                cfg.max_items
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[ERROR] {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
