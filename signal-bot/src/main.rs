use anyhow::Result;
use clap::Parser;
use signal_bot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { number } => {
            let config = load_config(number)?;
            run_bot(config).await
        }
    }
}
