//! Monthly summaries, cumulative cash balance and category rollups.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use vaad_domain::{
    BillingPeriod, Categorized, CommitteeExpense, CommitteeIncome, FeePayment, Labels,
    MeterReading, Settings,
};

use crate::{
    money::{is_summable, total_of, usable_amount, MoneyTotal},
    predicates::{
        charging_collected_in, expense_incurred_in, fee_collected_in, income_received_in,
    },
    CoreError, LedgerReader,
};

/// Income for one month, split by source.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncomeBySource {
    pub committee_income: f64,
    pub fee_payments: f64,
    pub charging_payments: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub period: BillingPeriod,
    pub income: IncomeBySource,
    pub total_income: f64,
    pub total_expense: f64,
    pub monthly_balance: f64,
}

/// One category's share of a month's income or expense.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRollup {
    pub category: String,
    pub amount: f64,
    /// Rounded independently per category; a breakdown may sum to 99 or 101.
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub period: BillingPeriod,
    pub income: Vec<CategoryRollup>,
    pub expense: Vec<CategoryRollup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearSummary {
    pub year: i32,
    pub months: Vec<MonthlySummary>,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

/// Ledgers the balance computations read, fetched once per call.
#[derive(Debug, Clone, Default)]
pub struct BalanceInputs {
    pub settings: Settings,
    pub paid_income: Vec<CommitteeIncome>,
    pub paid_fees: Vec<FeePayment>,
    pub paid_readings: Vec<MeterReading>,
    pub expenses: Vec<CommitteeExpense>,
}

impl BalanceInputs {
    /// Fetches every input; the first failing fetch aborts the whole load.
    pub fn fetch(reader: &dyn LedgerReader) -> Result<Self, CoreError> {
        Ok(Self {
            settings: reader.settings()?,
            paid_income: reader.paid_committee_income()?,
            paid_fees: reader.paid_fee_payments()?,
            paid_readings: reader.paid_meter_readings()?,
            expenses: reader.committee_expenses()?,
        })
    }
}

pub struct BalanceService;

impl BalanceService {
    pub fn compute_monthly(
        reader: &dyn LedgerReader,
        month: u32,
        year: i32,
    ) -> Result<MonthlySummary, CoreError> {
        let period = checked_period(month, year)?;
        let inputs = BalanceInputs::fetch(reader)?;
        Ok(Self::summarize_month(&inputs, period))
    }

    /// Opening balance plus all-time paid income minus every expense ever recorded.
    pub fn compute_cumulative(reader: &dyn LedgerReader) -> Result<f64, CoreError> {
        let inputs = BalanceInputs::fetch(reader)?;
        Ok(Self::cumulative(&inputs))
    }

    pub fn compute_category_breakdown(
        reader: &dyn LedgerReader,
        month: u32,
        year: i32,
        labels: &Labels,
    ) -> Result<CategoryBreakdown, CoreError> {
        let period = checked_period(month, year)?;
        let inputs = BalanceInputs::fetch(reader)?;
        Ok(Self::breakdown(&inputs, period, labels))
    }

    /// Twelve monthly summaries for `year` plus their totals.
    pub fn compute_year(reader: &dyn LedgerReader, year: i32) -> Result<YearSummary, CoreError> {
        let inputs = BalanceInputs::fetch(reader)?;
        Ok(Self::summarize_year(&inputs, year))
    }

    pub fn summarize_month(inputs: &BalanceInputs, period: BillingPeriod) -> MonthlySummary {
        let committee_income = total_of(
            inputs
                .paid_income
                .iter()
                .filter(|income| income_received_in(income, period)),
            "committee_income",
        );
        let fee_payments = total_of(
            inputs
                .paid_fees
                .iter()
                .filter(|fee| fee_collected_in(fee, period)),
            "fee_payments",
        );
        let charging_payments = total_of(
            inputs
                .paid_readings
                .iter()
                .filter(|reading| charging_collected_in(reading, period)),
            "meter_readings",
        );
        let expense = total_of(
            inputs
                .expenses
                .iter()
                .filter(|expense| expense_incurred_in(expense, period)),
            "committee_expenses",
        );

        let income = committee_income + fee_payments + charging_payments;
        MonthlySummary {
            period,
            income: IncomeBySource {
                committee_income: committee_income.value(),
                fee_payments: fee_payments.value(),
                charging_payments: charging_payments.value(),
            },
            total_income: income.value(),
            total_expense: expense.value(),
            monthly_balance: (income - expense).value(),
        }
    }

    pub fn cumulative(inputs: &BalanceInputs) -> f64 {
        let mut balance = MoneyTotal::default();
        let opening = inputs.settings.personal_balance;
        if is_summable(opening) {
            balance.add(opening);
        } else {
            warn!(opening, "opening balance is not a usable amount; treating it as zero");
        }

        let income = total_of(
            inputs.paid_income.iter().filter(|income| income.is_paid),
            "committee_income",
        );
        let fees = total_of(inputs.paid_fees.iter().filter(|fee| fee.is_paid), "fee_payments");
        let charging = total_of(
            inputs.paid_readings.iter().filter(|reading| reading.is_paid),
            "meter_readings",
        );
        let expenses = total_of(inputs.expenses.iter(), "committee_expenses");

        let balance = balance + income + fees + charging - expenses;
        debug!(
            income = income.value(),
            fees = fees.value(),
            charging = charging.value(),
            expenses = expenses.value(),
            balance = balance.value(),
            "computed cumulative balance"
        );
        balance.value()
    }

    pub fn breakdown(
        inputs: &BalanceInputs,
        period: BillingPeriod,
        labels: &Labels,
    ) -> CategoryBreakdown {
        let mut income = CategoryTotals::new(labels);
        for entry in inputs
            .paid_income
            .iter()
            .filter(|income| income_received_in(income, period))
        {
            if let Some(amount) = usable_amount(entry, "committee_income") {
                income.add(entry.category(), amount);
            }
        }
        for fee in inputs.paid_fees.iter().filter(|fee| fee_collected_in(fee, period)) {
            if let Some(amount) = usable_amount(fee, "fee_payments") {
                income.add(labels.committee_fees, amount);
            }
        }
        for reading in inputs
            .paid_readings
            .iter()
            .filter(|reading| charging_collected_in(reading, period))
        {
            if let Some(amount) = usable_amount(reading, "meter_readings") {
                income.add(labels.charging, amount);
            }
        }

        let mut expense = CategoryTotals::new(labels);
        for entry in inputs
            .expenses
            .iter()
            .filter(|expense| expense_incurred_in(expense, period))
        {
            if let Some(amount) = usable_amount(entry, "committee_expenses") {
                expense.add(entry.category(), amount);
            }
        }

        CategoryBreakdown {
            period,
            income: income.into_rollups(),
            expense: expense.into_rollups(),
        }
    }

    pub fn summarize_year(inputs: &BalanceInputs, year: i32) -> YearSummary {
        let months: Vec<MonthlySummary> = (1..=12)
            .map(|month| Self::summarize_month(inputs, BillingPeriod { month, year }))
            .collect();

        let mut income = MoneyTotal::default();
        let mut expense = MoneyTotal::default();
        for summary in &months {
            income.add(summary.total_income);
            expense.add(summary.total_expense);
        }
        YearSummary {
            year,
            months,
            total_income: income.value(),
            total_expense: expense.value(),
            balance: (income - expense).value(),
        }
    }
}

fn checked_period(month: u32, year: i32) -> Result<BillingPeriod, CoreError> {
    BillingPeriod::new(month, year).map_err(|_| CoreError::InvalidPeriod { month, year })
}

/// Sums per category, keyed by trimmed category name.
struct CategoryTotals<'l> {
    labels: &'l Labels,
    totals: BTreeMap<String, MoneyTotal>,
}

impl<'l> CategoryTotals<'l> {
    fn new(labels: &'l Labels) -> Self {
        Self {
            labels,
            totals: BTreeMap::new(),
        }
    }

    fn add(&mut self, category: &str, amount: f64) {
        let key = match category.trim() {
            "" => self.labels.uncategorized,
            trimmed => trimmed,
        };
        self.totals.entry(key.to_string()).or_default().add(amount);
    }

    /// Largest first; ties by name.
    fn into_rollups(self) -> Vec<CategoryRollup> {
        let total: MoneyTotal = self.totals.values().copied().sum();
        let mut rollups: Vec<CategoryRollup> = self
            .totals
            .into_iter()
            .map(|(category, amount)| CategoryRollup {
                percentage: percentage_of(amount, total),
                amount: amount.value(),
                category,
            })
            .collect();
        rollups.sort_by(|a, b| {
            b.amount
                .total_cmp(&a.amount)
                .then_with(|| a.category.cmp(&b.category))
        });
        rollups
    }
}

/// `round(part / whole * 100)`, or 0 when the whole is zero.
pub fn percentage_of(part: MoneyTotal, whole: MoneyTotal) -> i64 {
    if whole.is_zero() {
        return 0;
    }
    (part.minor_units() as f64 / whole.minor_units() as f64 * 100.0).round() as i64
}
