use anyhow::Result;
use tracing::info;

use crate::{cli::ConfigArgs, settings::Settings, AppCtx};

pub fn handle(args: ConfigArgs, ctx: &AppCtx) -> Result<()> {
    let mut settings = if args.reset {
        Settings::default()
    } else {
        ctx.settings_store.load()?
    };

    if let Some(endpoint) = args.endpoint {
        settings.endpoint = Some(endpoint);
    }
    if let Some(timeout) = args.timeout {
        settings.timeout_secs = Some(timeout);
    }
    ctx.settings_store.save(&settings)?;

    let config = settings.service_config();
    info!(
        "Configuration saved ✅ endpoint: {}, timeout: {}s",
        config.endpoint,
        config.timeout.as_secs()
    );
    Ok(())
}
