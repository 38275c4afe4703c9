//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! Report screens, export generators and the reminder job call these instead
//! of stitching services together. Each call either returns every figure or
//! fails as a whole.

use chrono::NaiveDate;
use vaad_domain::{BillingPeriod, Labels, PeriodicMaintenance};

use crate::{
    balance_service::{BalanceInputs, BalanceService, CategoryBreakdown, MonthlySummary},
    debt_service::{DebtInputs, DebtService, ReminderRecipient, ResidentDebt},
    maintenance_service::MaintenanceService,
    CoreError, LedgerReader,
};

/// Every figure shown on the financial dashboard for one month.
#[derive(Debug, Clone)]
pub struct ApiFinancialReport {
    pub today: NaiveDate,
    pub debts: Vec<ResidentDebt>,
    pub total_outstanding: f64,
    pub monthly: MonthlySummary,
    pub breakdown: CategoryBreakdown,
    pub cumulative_balance: f64,
}

/// Builds the dashboard report for `period`, with debts evaluated on `today`.
pub fn api_financial_report(
    reader: &dyn LedgerReader,
    today: NaiveDate,
    period: BillingPeriod,
    labels: &Labels,
) -> Result<ApiFinancialReport, CoreError> {
    if !period.is_valid() {
        return Err(CoreError::InvalidPeriod {
            month: period.month,
            year: period.year,
        });
    }
    let debt_inputs = DebtInputs::fetch(reader)?;
    let balance_inputs = BalanceInputs::fetch(reader)?;

    let debts = DebtService::aggregate(&debt_inputs, today, labels);
    let total_outstanding = DebtService::total_outstanding(&debts);
    Ok(ApiFinancialReport {
        today,
        total_outstanding,
        debts,
        monthly: BalanceService::summarize_month(&balance_inputs, period),
        breakdown: BalanceService::breakdown(&balance_inputs, period, labels),
        cumulative_balance: BalanceService::cumulative(&balance_inputs),
    })
}

/// Residents to remind about their debt on `today`.
pub fn api_reminder_recipients(
    reader: &dyn LedgerReader,
    today: NaiveDate,
    labels: &Labels,
) -> Result<Vec<ReminderRecipient>, CoreError> {
    let inputs = DebtInputs::fetch(reader)?;
    let debts = DebtService::aggregate(&inputs, today, labels);
    Ok(DebtService::reminder_recipients(&debts, &inputs.residents))
}

/// Tasks for the upcoming-maintenance alert banner.
pub fn api_upcoming_maintenance(
    reader: &dyn LedgerReader,
    now: NaiveDate,
) -> Result<Vec<PeriodicMaintenance>, CoreError> {
    let tasks = reader.maintenance_tasks()?;
    Ok(MaintenanceService::upcoming(&tasks, now)
        .into_iter()
        .cloned()
        .collect())
}
