mod consts;
mod logging;
mod settings;
mod store;

pub use logging::init_logger;
pub use settings::Settings;
pub use store::{FileSettingsStore, JsonFileSettingsStore, SettingsStore};
