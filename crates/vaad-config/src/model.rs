use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use vaad_domain::Labels;

/// Stores committee preferences used by the report tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_currency_precision")]
    pub currency_precision: u8,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_snapshot: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for snapshots. Defaults to the application data directory.
    pub data_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `<data root>/backups`.
    pub backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            currency_symbol: Self::default_currency_symbol(),
            currency_precision: Self::default_currency_precision(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            default_snapshot: None,
            data_root: None,
            backup_root: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "he-IL".into()
    }

    pub fn default_currency() -> String {
        "ILS".into()
    }

    pub fn default_currency_symbol() -> String {
        "₪".into()
    }

    pub fn default_currency_precision() -> u8 {
        2
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Month names and category labels for the configured locale.
    pub fn labels(&self) -> Labels {
        Labels::for_locale(&self.locale)
    }

    /// Snapshot root, falling back to the application data directory.
    pub fn resolve_data_root(&self, app_dir: &Path) -> PathBuf {
        self.data_root
            .clone()
            .unwrap_or_else(|| app_dir.to_path_buf())
    }

    pub fn resolve_backup_root(&self, app_dir: &Path) -> PathBuf {
        match &self.backup_root {
            Some(path) => path.clone(),
            None => self.resolve_data_root(app_dir).join("backups"),
        }
    }
}
