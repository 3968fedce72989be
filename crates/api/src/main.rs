//! Blinkmeter - Main Entry Point
//!
//! `blinkmeter` serves the HTTP API; `blinkmeter replay <frames.jsonl>`
//! runs a recorded session offline and prints the summary as JSON.

use api::{init_logging, replay_file, run_server, ServiceConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::load()?;
    init_logging(&config.log_level)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, path] if cmd == "replay" => {
            let summary = replay_file(path, config.detector)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        [] => {
            info!("=== Blinkmeter v{} ===", env!("CARGO_PKG_VERSION"));
            run_server(config).await?;
        }
        _ => {
            eprintln!("usage: blinkmeter [replay <frames.jsonl>]");
            std::process::exit(2);
        }
    }

    Ok(())
}
