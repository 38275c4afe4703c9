//! Localized month names and fixed report labels.

use crate::common::BillingPeriod;

const HEBREW_MONTHS: [&str; 12] = [
    "ינואר",
    "פברואר",
    "מרץ",
    "אפריל",
    "מאי",
    "יוני",
    "יולי",
    "אוגוסט",
    "ספטמבר",
    "אוקטובר",
    "נובמבר",
    "דצמבר",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Labels used when itemizing debts and naming synthetic income categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    months: &'static [&'static str; 12],
    /// Category under which paid committee fees are reported.
    pub committee_fees: &'static str,
    /// Category under which paid charging bills are reported.
    pub charging: &'static str,
    /// Fallback label for a pending payment without a description.
    pub pending_payment: &'static str,
    /// Category used for entries stored with a blank category.
    pub uncategorized: &'static str,
}

impl Labels {
    pub fn hebrew() -> Self {
        Self {
            months: &HEBREW_MONTHS,
            committee_fees: "דמי ועד",
            charging: "טעינת רכב חשמלי",
            pending_payment: "תשלום ממתין",
            uncategorized: "ללא קטגוריה",
        }
    }

    pub fn english() -> Self {
        Self {
            months: &ENGLISH_MONTHS,
            committee_fees: "Committee fees",
            charging: "EV charging",
            pending_payment: "Pending payment",
            uncategorized: "Uncategorized",
        }
    }

    /// Picks the table for a locale tag such as `he-IL` or `en-US`.
    pub fn for_locale(locale: &str) -> Self {
        if locale.trim().to_ascii_lowercase().starts_with("en") {
            Self::english()
        } else {
            Self::hebrew()
        }
    }

    /// Month name for a 1-indexed month; `None` outside 1..=12.
    pub fn month_name(&self, month: u32) -> Option<&'static str> {
        let index = usize::try_from(month).ok()?.checked_sub(1)?;
        self.months.get(index).copied()
    }

    pub fn period_label(&self, period: BillingPeriod) -> Option<String> {
        self.month_name(period.month)
            .map(|name| format!("{} {}", name, period.year))
    }

    pub fn charging_label(&self, period: BillingPeriod) -> Option<String> {
        self.period_label(period)
            .map(|label| format!("{} {}", self.charging, label))
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::hebrew()
    }
}
