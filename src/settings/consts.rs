pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "tp";
pub const APP_NAME: &str = "compte-cli";

pub const SETTINGS_FILE: &str = "settings.json";
pub const LOG_FILE: &str = "compte-cli.log";

/// Console directives when `RUST_LOG` is unset. HTTP internals stay quiet.
pub const CONSOLE_LOG_DIRECTIVES: &str = "info,hyper_util=warn,reqwest=warn";
/// `--verbose`: SOAP envelope dumps from the client and the CLI, still no HTTP internals.
pub const ENVELOPE_DUMP_DIRECTIVES: &str =
    "info,compte_api=debug,compte_cli=debug,hyper_util=warn,reqwest=warn";
