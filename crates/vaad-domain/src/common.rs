//! Shared traits, billing periods, and amount decoding for committee records.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the ledgers.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Largest absolute amount, in shekels, that a record may carry.
pub const MAX_AMOUNT: f64 = 1e15;

/// Finite and below [`MAX_AMOUNT`] in magnitude.
pub fn is_usable_amount(amount: f64) -> bool {
    amount.is_finite() && amount.abs() < MAX_AMOUNT
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> f64;

    /// Whether the stored amount can take part in a running total.
    fn has_valid_amount(&self) -> bool {
        is_usable_amount(self.amount())
    }
}

/// Records that belong to a reporting category.
pub trait Categorized {
    fn category(&self) -> &str;
}

/// The (month, year) a fee or meter-reading charge applies to.
///
/// Months are 1-indexed. Values are not validated on deserialization since
/// stored documents may carry anything; callers check [`BillingPeriod::is_valid`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BillingPeriod {
    pub month: u32,
    pub year: i32,
}

impl BillingPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, BillingPeriodError> {
        let period = Self { month, year };
        if !period.is_valid() {
            return Err(BillingPeriodError::MonthOutOfRange(month));
        }
        Ok(period)
    }

    /// The period the supplied date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// True once `today` has reached the period. The current month counts in
    /// full from its first day.
    pub fn has_arrived(&self, today: NaiveDate) -> bool {
        self.year < today.year() || (self.year == today.year() && self.month <= today.month())
    }

    /// True when `date` falls inside this calendar month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Monotonic index usable for ordering periods.
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`BillingPeriod`] values.
pub enum BillingPeriodError {
    MonthOutOfRange(u32),
}

impl fmt::Display for BillingPeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingPeriodError::MonthOutOfRange(month) => {
                write!(f, "month {month} is outside 1..=12")
            }
        }
    }
}

impl std::error::Error for BillingPeriodError {}

/// Serde helpers for monetary fields.
///
/// Stored documents hold amounts either as numbers or as numeric strings.
/// Anything that cannot be read as a number decodes to `NaN`, which the
/// aggregation layer skips instead of summing.
pub mod amount {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawAmount>::deserialize(deserializer).unwrap_or(None);
        Ok(match raw {
            Some(RawAmount::Number(value)) => value,
            Some(RawAmount::Text(text)) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
            None => f64::NAN,
        })
    }

    /// Default used when the field is missing entirely.
    pub fn missing() -> f64 {
        f64::NAN
    }
}
