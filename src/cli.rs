use std::path::PathBuf;

use clap::{value_parser, Args, Parser, Subcommand};
use compte_api::account::AccountType;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Optional path to a settings JSON file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub settings: Option<PathBuf>,

    /// Show request and response dumps
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure where the account service lives
    Config(ConfigArgs),

    /// List the accounts
    List(ListArgs),

    /// Open a new account
    Create(CreateArgs),

    /// Delete an account
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Service endpoint (e.g: "http://10.0.2.2:8080/services/ws")
    #[arg(long, value_name = "URL", value_parser = parse_endpoint)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Forget every saved value before applying the others
    #[arg(long)]
    pub reset: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list accounts of this type
    #[arg(long, value_enum)]
    pub kind: Option<AccountType>,

    /// Print the accounts as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Initial balance of the account
    #[arg(short, long, allow_negative_numbers = true)]
    pub balance: f64,

    /// Type of account
    #[arg(short, long, value_enum, default_value = "current")]
    pub kind: AccountType,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Account ID, you can get it with the `list` command
    #[arg(long)]
    pub id: i64,
}

fn parse_endpoint(s: &str) -> Result<String, String> {
    let t = s.trim();
    if (t.starts_with("http://") || t.starts_with("https://")) && !t.contains(char::is_whitespace) {
        Ok(t.to_owned())
    } else {
        Err("Endpoint must be an http:// or https:// URL".into())
    }
}
