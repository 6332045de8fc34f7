use anyhow::Result;

pub mod cli;
mod commands;
pub mod settings;

use cli::{Cli, Commands};
use settings::{FileSettingsStore, JsonFileSettingsStore, SettingsStore};

pub struct AppCtx {
    pub settings_store: Box<dyn SettingsStore>,
}

#[cfg(not(tarpaulin_include))]
pub async fn run(cli: Cli) -> Result<()> {
    let settings_store: Box<dyn SettingsStore> = match cli.settings {
        Some(path) => Box::new(JsonFileSettingsStore::new(path)),
        None => Box::new(FileSettingsStore::new()?),
    };
    let ctx = AppCtx { settings_store };

    match cli.command {
        Commands::Config(args) => commands::config::handle(args, &ctx),
        Commands::List(args) => commands::accounts::list(args, &ctx).await,
        Commands::Create(args) => commands::accounts::create(args, &ctx).await,
        Commands::Delete(args) => commands::accounts::delete(args, &ctx).await,
    }
}
