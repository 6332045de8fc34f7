use anyhow::Result;
use clap::Parser;

use compte_cli::settings::init_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = compte_cli::cli::Cli::parse();
    init_logger(cli.verbose)?;
    compte_cli::run(cli).await?;
    Ok(())
}
