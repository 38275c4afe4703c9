use std::{env, path::Path};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;
use vaad_config::{Config, ConfigManager};
use vaad_core::{
    format::{CurrencyFormatter, DateFormatter, DayFirstDateFormatter, SymbolCurrencyFormatter},
    storage::SnapshotStorage,
    time::{Clock, FixedClock, SystemClock},
    CoreError, SnapshotReader,
};
use vaad_domain::{Labels, LedgerSnapshot};
use vaad_storage_json::JsonSnapshotStorage;

use crate::{
    errors::AppError,
    utils::paths::{app_data_dir, storage_paths},
};

/// Pins "today" for every command, as `YYYY-MM-DD`.
pub const TODAY_ENV: &str = "VAAD_LEDGER_TODAY";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    App(#[from] AppError),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::App(AppError::Core(err))
    }
}

pub type CommandResult = Result<(), CommandError>;

/// Everything a command needs: preferences, storage, the selected snapshot and a clock.
pub struct CliContext {
    pub config: Config,
    storage: JsonSnapshotStorage,
    snapshot_name: Option<String>,
    clock: Box<dyn Clock>,
    currency: SymbolCurrencyFormatter,
    pub running: bool,
}

impl CliContext {
    pub fn new(
        config: Config,
        storage: JsonSnapshotStorage,
        snapshot_name: Option<String>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let currency =
            SymbolCurrencyFormatter::new(config.currency_symbol.clone(), config.currency_precision);
        Self {
            config,
            storage,
            snapshot_name,
            clock,
            currency,
            running: true,
        }
    }

    /// Loads config and storage from the application data directory.
    pub fn from_env(snapshot_name: Option<String>) -> Result<Self, AppError> {
        Self::from_dir(&app_data_dir(), snapshot_name)
    }

    pub fn from_dir(app_dir: &Path, snapshot_name: Option<String>) -> Result<Self, AppError> {
        let config = ConfigManager::with_base_dir(app_dir.to_path_buf())?.load()?;
        let storage = JsonSnapshotStorage::new(storage_paths(&config, app_dir))?;
        let clock: Box<dyn Clock> = match env::var(TODAY_ENV) {
            Ok(raw) => Box::new(FixedClock::new(parse_date(&raw).map_err(|_| {
                AppError::input(format!("{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`"))
            })?)),
            Err(_) => Box::new(SystemClock),
        };
        debug!(app_dir = %app_dir.display(), locale = %config.locale, "cli context ready");
        Ok(Self::new(config, storage, snapshot_name, clock))
    }

    pub fn storage(&self) -> &JsonSnapshotStorage {
        &self.storage
    }

    pub fn labels(&self) -> Labels {
        self.config.labels()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn money(&self, amount: f64) -> String {
        self.currency.format_amount(amount)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        DayFirstDateFormatter.format_date(date)
    }

    /// `--snapshot`, then the configured default, then the only stored snapshot.
    pub fn snapshot_name(&self) -> Result<String, AppError> {
        if let Some(name) = self
            .snapshot_name
            .clone()
            .or_else(|| self.config.default_snapshot.clone())
        {
            return Ok(name);
        }
        let mut stored = self.storage.list_snapshots()?;
        match stored.len() {
            1 => Ok(stored.remove(0)),
            0 => Err(AppError::input("no snapshots stored yet")),
            _ => Err(AppError::input(
                "several snapshots stored; pass --snapshot <name>",
            )),
        }
    }

    pub fn load_snapshot(&self) -> Result<LedgerSnapshot, AppError> {
        let name = self.snapshot_name()?;
        Ok(self.storage.load_snapshot(&name)?)
    }

    pub fn reader(&self) -> Result<SnapshotReader, AppError> {
        Ok(SnapshotReader::new(self.load_snapshot()?))
    }

    /// Backs up the stored copy, then overwrites it.
    pub fn save_snapshot(&self, snapshot: &mut LedgerSnapshot, note: &str) -> Result<(), AppError> {
        let name = self.snapshot_name()?;
        let current = self.storage.load_snapshot(&name)?;
        self.storage.backup_snapshot(&name, &current, Some(note))?;
        snapshot.touch();
        self.storage.save_snapshot(&name, snapshot)?;
        Ok(())
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM-DD date"))
    })
}
