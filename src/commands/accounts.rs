use anyhow::{bail, Result};
use tracing::info;

use crate::{
    cli::{CreateArgs, DeleteArgs, ListArgs},
    AppCtx,
};

use compte_api::{account::Account, client::AccountServiceClient};

fn get_client(ctx: &AppCtx) -> Result<AccountServiceClient> {
    let settings = ctx.settings_store.load()?;
    Ok(AccountServiceClient::with_config(settings.service_config()))
}

pub async fn list(args: ListArgs, ctx: &AppCtx) -> Result<()> {
    let client = get_client(ctx)?;

    let accounts: Vec<Account> = client
        .list_accounts()
        .await
        .into_iter()
        .filter(|account| args.kind.map_or(true, |kind| account.kind() == kind))
        .collect();
    info!("Found {} accounts", accounts.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&accounts)?);
    } else {
        for account in &accounts {
            println!("{}", format_account(account));
        }
    }
    Ok(())
}

pub async fn create(args: CreateArgs, ctx: &AppCtx) -> Result<()> {
    let client = get_client(ctx)?;

    if !client.create(&Account::draft(args.balance, args.kind)).await {
        bail!("Could not create the account, run with --verbose for details");
    }
    info!("Account created ✅");
    Ok(())
}

pub async fn delete(args: DeleteArgs, ctx: &AppCtx) -> Result<()> {
    let client = get_client(ctx)?;

    if !client.delete_account(args.id).await {
        bail!("Account {} was not deleted", args.id);
    }
    info!("Account {} deleted ✅", args.id);
    Ok(())
}

fn format_account(account: &Account) -> String {
    let id = account
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{:<6} {:<8} {:>14.2}  opened {}",
        id,
        account.kind(),
        account.balance(),
        account.creation_date()
    )
}
