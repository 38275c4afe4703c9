//! Exact accumulation of shekel amounts.
//!
//! Totals are kept in agorot (1/100 ₪) so that sums do not depend on the
//! order in which records arrive.

use tracing::warn;
use uuid::Uuid;
use vaad_domain::{is_usable_amount, Amounted, Identifiable};

pub use vaad_domain::MAX_AMOUNT;

/// Converts to agorot. Callers pass amounts already checked by [`is_summable`].
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_minor_units(units: i64) -> f64 {
    units as f64 / 100.0
}

/// The amount as it is counted in totals: rounded to whole agorot.
pub fn round_to_minor(amount: f64) -> f64 {
    from_minor_units(to_minor_units(amount))
}

/// Finite and small enough to be held in agorot without saturating.
pub fn is_summable(amount: f64) -> bool {
    is_usable_amount(amount)
}

/// Running total in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoneyTotal {
    minor: i64,
}

impl MoneyTotal {
    pub fn from_amount(amount: f64) -> Self {
        let mut total = Self::default();
        total.add(amount);
        total
    }

    /// Adds `amount`; amounts outside the summable range are logged and ignored.
    pub fn add(&mut self, amount: f64) {
        if let Some(units) = checked_units(amount) {
            self.minor = combine(self.minor.checked_add(units), self.minor);
        }
    }

    pub fn subtract(&mut self, amount: f64) {
        if let Some(units) = checked_units(amount) {
            self.minor = combine(self.minor.checked_sub(units), self.minor);
        }
    }

    pub fn minor_units(&self) -> i64 {
        self.minor
    }

    pub fn value(&self) -> f64 {
        from_minor_units(self.minor)
    }

    pub fn is_positive(&self) -> bool {
        self.minor > 0
    }

    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }
}

impl std::ops::Add for MoneyTotal {
    type Output = MoneyTotal;

    fn add(self, rhs: MoneyTotal) -> MoneyTotal {
        MoneyTotal {
            minor: combine(self.minor.checked_add(rhs.minor), self.minor),
        }
    }
}

impl std::ops::Sub for MoneyTotal {
    type Output = MoneyTotal;

    fn sub(self, rhs: MoneyTotal) -> MoneyTotal {
        MoneyTotal {
            minor: combine(self.minor.checked_sub(rhs.minor), self.minor),
        }
    }
}

impl std::iter::Sum for MoneyTotal {
    fn sum<I: Iterator<Item = MoneyTotal>>(iter: I) -> Self {
        iter.fold(MoneyTotal::default(), |acc, total| acc + total)
    }
}

fn checked_units(amount: f64) -> Option<i64> {
    if is_summable(amount) {
        Some(to_minor_units(amount))
    } else {
        warn!(amount, "amount outside the summable range; ignoring it");
        None
    }
}

/// Keeps the previous total when an operation would overflow.
fn combine(result: Option<i64>, previous: i64) -> i64 {
    result.unwrap_or_else(|| {
        warn!(total = previous, "money total overflowed; keeping the previous value");
        previous
    })
}

/// Returns the record's amount, or `None` (logged) when it cannot be summed.
pub fn usable_amount<T>(record: &T, collection: &'static str) -> Option<f64>
where
    T: Amounted + Identifiable,
{
    let amount = record.amount();
    if record.has_valid_amount() {
        Some(amount)
    } else if amount.is_finite() {
        skip_record(collection, record.id(), "amount is too large");
        None
    } else {
        skip_record(collection, record.id(), "amount is not a number");
        None
    }
}

/// Sums the usable amounts of `records`.
pub fn total_of<'a, T, I>(records: I, collection: &'static str) -> MoneyTotal
where
    T: Amounted + Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut total = MoneyTotal::default();
    for record in records {
        if let Some(amount) = usable_amount(record, collection) {
            total.add(amount);
        }
    }
    total
}

pub(crate) fn skip_record(collection: &'static str, id: Uuid, reason: &str) {
    warn!(collection, record = %id, reason, "skipping record");
}
