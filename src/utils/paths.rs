use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

use vaad_config::Config;
use vaad_storage_json::StoragePaths;

pub const HOME_ENV: &str = "VAAD_LEDGER_HOME";
const DEFAULT_DIR_NAME: &str = ".vaad_ledger";

/// Returns the application data directory: `$VAAD_LEDGER_HOME`, else `~/.vaad_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Snapshot and backup directories for `config`, rooted at `app_dir` unless overridden.
pub fn storage_paths(config: &Config, app_dir: &Path) -> StoragePaths {
    StoragePaths::under(
        &config.resolve_data_root(app_dir),
        &config.resolve_backup_root(app_dir),
    )
}
