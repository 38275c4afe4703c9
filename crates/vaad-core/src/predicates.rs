//! Inclusion rules for every ledger.
//!
//! Each income source decides "belongs to month X" from a different field,
//! so every source has its own rule.

use chrono::NaiveDate;
use vaad_domain::{
    BillingPeriod, CommitteeExpense, CommitteeIncome, FeePayment, MeterReading, PendingPayment,
};

// Debt rules.

/// An unpaid fee is owed once its obligation month has arrived.
pub fn fee_is_outstanding(fee: &FeePayment, today: NaiveDate) -> bool {
    !fee.is_paid && fee.period.has_arrived(today)
}

/// An unpaid pending payment is owed when it has no due date or the due date has passed.
pub fn pending_is_outstanding(payment: &PendingPayment, today: NaiveDate) -> bool {
    !payment.is_paid && payment.due_date.map_or(true, |due| due <= today)
}

/// An unpaid charging bill follows the same month rule as fees.
pub fn charging_bill_is_outstanding(reading: &MeterReading, today: NaiveDate) -> bool {
    !reading.is_paid && reading.period.has_arrived(today)
}

// Monthly income and expense rules.

/// Paid committee income counts in the month of its own `date`.
pub fn income_received_in(income: &CommitteeIncome, period: BillingPeriod) -> bool {
    income.is_paid && period.contains(income.date)
}

/// Paid fees count in the month they were paid, not the month they are for.
pub fn fee_collected_in(fee: &FeePayment, period: BillingPeriod) -> bool {
    fee.is_paid && fee.payment_date.is_some_and(|paid_on| period.contains(paid_on))
}

/// Paid charging bills count in their billing month; no payment date is kept.
pub fn charging_collected_in(reading: &MeterReading, period: BillingPeriod) -> bool {
    reading.is_paid && reading.period == period
}

/// Expenses count in the month of their date, with no paid-state check.
pub fn expense_incurred_in(expense: &CommitteeExpense, period: BillingPeriod) -> bool {
    period.contains(expense.date)
}
