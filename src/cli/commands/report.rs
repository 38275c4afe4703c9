use vaad_core::{
    public_api::{api_financial_report, api_reminder_recipients},
    storage::snapshot_warnings,
    BalanceService, CategoryRollup, DebtService, MonthlySummary, ResidentDebt,
};
use vaad_domain::BillingPeriod;

use super::too_many;
use crate::cli::context::{parse_date, CliContext, CommandError, CommandResult};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "debts",
            "Outstanding debt per resident",
            "debts [YYYY-MM-DD]",
            cmd_debts,
        ),
        CommandEntry::new(
            "reminders",
            "Residents to email about their debt",
            "reminders [YYYY-MM-DD]",
            cmd_reminders,
        ),
        CommandEntry::new(
            "month",
            "Income, expenses and categories for one month",
            "month <month> <year>",
            cmd_month,
        ),
        CommandEntry::new("year", "Month-by-month totals for a year", "year <year>", cmd_year),
        CommandEntry::new("balance", "Cumulative cash balance", "balance", cmd_balance),
        CommandEntry::new(
            "report",
            "Dashboard figures for the month containing a date",
            "report [YYYY-MM-DD]",
            cmd_report,
        ),
        CommandEntry::new(
            "warnings",
            "Records the reports skip or resolve by guesswork",
            "warnings",
            cmd_warnings,
        ),
    ]
}

fn date_arg(context: &CliContext, args: &[&str], usage: &str) -> Result<chrono::NaiveDate, CommandError> {
    too_many(args, 1, usage)?;
    match args.first() {
        Some(raw) => parse_date(raw),
        None => Ok(context.today()),
    }
}

fn period_args(args: &[&str]) -> Result<BillingPeriod, CommandError> {
    let usage = || CommandError::InvalidArguments("usage: month <month> <year>".into());
    let [month, year] = args else {
        return Err(usage());
    };
    let month: u32 = month.parse().map_err(|_| usage())?;
    let year: i32 = year.parse().map_err(|_| usage())?;
    BillingPeriod::new(month, year)
        .map_err(|_| CommandError::InvalidArguments("month must be between 1 and 12".into()))
}

fn print_debt(context: &CliContext, debt: &ResidentDebt) {
    output::row(
        format!("{} (apt {})", debt.resident_name, debt.apartment_number),
        context.money(debt.total_debt),
    );
    for item in debt.items() {
        output::detail(&item.label, context.money(item.amount));
    }
}

fn cmd_debts(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let today = date_arg(context, args, "debts [YYYY-MM-DD]")?;
    let reader = context.reader()?;
    let debts = DebtService::compute_debts(&reader, today, &context.labels())?;

    output::section(format!("Outstanding debts ({})", context.date(today)));
    if debts.is_empty() {
        output::success("No outstanding debts.");
        return Ok(());
    }
    for debt in &debts {
        print_debt(context, debt);
    }
    let total = DebtService::total_outstanding(&debts);
    output::row(
        format!("Total ({} residents)", debts.len()),
        context.money(total),
    );
    Ok(())
}

fn cmd_reminders(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let today = date_arg(context, args, "reminders [YYYY-MM-DD]")?;
    let reader = context.reader()?;
    let recipients = api_reminder_recipients(&reader, today, &context.labels())?;

    output::section("Debt reminders");
    if recipients.is_empty() {
        output::info("Nobody to remind.");
    }
    for recipient in &recipients {
        output::row(
            format!("{} <{}>", recipient.name, recipient.email),
            context.money(recipient.total_debt),
        );
    }
    Ok(())
}

fn print_summary(context: &CliContext, summary: &MonthlySummary) {
    let labels = context.labels();
    output::row("Committee income", context.money(summary.income.committee_income));
    output::row(labels.committee_fees, context.money(summary.income.fee_payments));
    output::row(labels.charging, context.money(summary.income.charging_payments));
    output::row("Total income", context.money(summary.total_income));
    output::row("Total expense", context.money(summary.total_expense));
    output::row("Balance", context.money(summary.monthly_balance));
}

fn print_rollups(context: &CliContext, title: &str, rollups: &[CategoryRollup]) {
    output::info(format!("  {title}:"));
    if rollups.is_empty() {
        output::detail("-", context.money(0.0));
    }
    for rollup in rollups {
        output::detail(
            &rollup.category,
            format!("{}  ({}%)", context.money(rollup.amount), rollup.percentage),
        );
    }
}

fn cmd_month(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let period = period_args(args)?;
    let labels = context.labels();
    let reader = context.reader()?;
    let summary = BalanceService::compute_monthly(&reader, period.month, period.year)?;
    let breakdown =
        BalanceService::compute_category_breakdown(&reader, period.month, period.year, &labels)?;

    output::section(labels.period_label(period).unwrap_or_else(|| period.to_string()));
    print_summary(context, &summary);
    print_rollups(context, "Income by category", &breakdown.income);
    print_rollups(context, "Expense by category", &breakdown.expense);
    Ok(())
}

fn cmd_year(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let year: i32 = match args {
        [raw] => raw
            .parse()
            .map_err(|_| CommandError::InvalidArguments("usage: year <year>".into()))?,
        _ => return Err(CommandError::InvalidArguments("usage: year <year>".into())),
    };
    let labels = context.labels();
    let reader = context.reader()?;
    let summary = BalanceService::compute_year(&reader, year)?;

    output::section(format!("Year {year}"));
    for month in &summary.months {
        let name = labels.month_name(month.period.month).unwrap_or("?");
        output::row(
            name,
            format!(
                "{} in / {} out / {}",
                context.money(month.total_income),
                context.money(month.total_expense),
                context.money(month.monthly_balance)
            ),
        );
    }
    output::row("Total income", context.money(summary.total_income));
    output::row("Total expense", context.money(summary.total_expense));
    output::row("Balance", context.money(summary.balance));
    Ok(())
}

fn cmd_balance(context: &mut CliContext, args: &[&str]) -> CommandResult {
    too_many(args, 0, "balance")?;
    let reader = context.reader()?;
    let balance = BalanceService::compute_cumulative(&reader)?;
    output::section("Cumulative balance");
    output::row("Cash on hand", context.money(balance));
    Ok(())
}

fn cmd_report(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let today = date_arg(context, args, "report [YYYY-MM-DD]")?;
    let labels = context.labels();
    let reader = context.reader()?;
    let report = api_financial_report(&reader, today, BillingPeriod::containing(today), &labels)?;

    output::section(format!("Financial report ({})", context.date(report.today)));
    output::row("Outstanding debt", context.money(report.total_outstanding));
    output::row("Residents in debt", report.debts.len());
    print_summary(context, &report.monthly);
    print_rollups(context, "Income by category", &report.breakdown.income);
    print_rollups(context, "Expense by category", &report.breakdown.expense);
    output::row("Cash on hand", context.money(report.cumulative_balance));
    Ok(())
}

fn cmd_warnings(context: &mut CliContext, args: &[&str]) -> CommandResult {
    too_many(args, 0, "warnings")?;
    let reader = context.reader()?;
    let warnings = snapshot_warnings(reader.snapshot());
    output::section("Data warnings");
    if warnings.is_empty() {
        output::success("No data problems found.");
    }
    for warning in warnings {
        output::warning(warning);
    }
    Ok(())
}
