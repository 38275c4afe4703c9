use thiserror::Error;
use vaad_config::ConfigError;
use vaad_core::CoreError;

/// Shown for any failure that leaves the reports without their data.
pub const DATA_UNAVAILABLE: &str = "could not load financial data";

/// Top-level error for the report tooling.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Input(String),
}

impl AppError {
    pub fn input(message: impl Into<String>) -> Self {
        AppError::Input(message.into())
    }

    /// The message a committee member sees. Every data-loading failure
    /// collapses into [`DATA_UNAVAILABLE`].
    pub fn user_message(&self) -> String {
        match self {
            AppError::Core(err) if err.is_data_failure() => DATA_UNAVAILABLE.to_string(),
            AppError::Core(CoreError::Io(_)) => DATA_UNAVAILABLE.to_string(),
            other => other.to_string(),
        }
    }
}
