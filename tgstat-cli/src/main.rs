//! tgstat CLI: analyze a channel dump, list its channels. Config from env and CLI args.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tgstat_cli::{emit_reports, run_analyze, run_channels, AppConfig, Cli, Commands};
use tgstat_core::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.log_file)?;

    match cli.command {
        Commands::Analyze(args) => {
            let analysis = run_analyze(&args, &config, Utc::now()).await?;
            if let Some(path) = emit_reports(&analysis, &args, &config)? {
                println!("Exported {} records to {}", analysis.records.len(), path.display());
            }
            if let Some(reason) = &analysis.partial {
                println!("Scan ended early ({:?}); results are partial", reason);
            }
            Ok(())
        }
        Commands::Channels { input } => run_channels(&input),
    }
}
