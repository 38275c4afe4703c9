use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    balance_service::{BalanceInputs, BalanceService},
    debt_service::{DebtInputs, DebtItem, DebtService, ResidentDebt},
    money::MoneyTotal,
    public_api::{api_financial_report, api_reminder_recipients, api_upcoming_maintenance},
    CoreError, LedgerReader, SnapshotReader,
};
use vaad_domain::{
    BillingPeriod, ChargingStation, CommitteeExpense, CommitteeIncome, FeePayment, Labels,
    LedgerSnapshot, MaintenanceFrequency, MeterReading, PendingPayment, PeriodicMaintenance,
    Resident, Settings,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn period(month: u32, year: i32) -> BillingPeriod {
    BillingPeriod::new(month, year).unwrap()
}

fn dana_snapshot() -> (LedgerSnapshot, Uuid) {
    let mut snapshot = LedgerSnapshot::new("Herzl 5");
    let dana = Resident::new("Dana", "12", 450.0);
    let dana_id = dana.id;
    snapshot.residents.push(dana);
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(dana_id, period(2, 2024), 450.0));
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(dana_id, period(3, 2024), 450.0));
    (snapshot, dana_id)
}

#[test]
fn dana_owes_two_months_in_march() {
    let (snapshot, dana_id) = dana_snapshot();
    let reader = SnapshotReader::new(snapshot);
    let debts = DebtService::compute_debts(&reader, date(2024, 3, 15), &Labels::english())
        .expect("compute debts");

    assert_eq!(debts.len(), 1);
    let dana = &debts[0];
    assert_eq!(dana.resident_id, dana_id);
    assert_eq!(dana.total_debt, 900.0);
    assert_eq!(dana.committee_fees.len(), 2);
    assert_eq!(dana.committee_fees[0].label, "February 2024");
    assert_eq!(dana.committee_fees[1].label, "March 2024");
    assert!(dana.pending_payments.is_empty());
    assert!(dana.charging_bills.is_empty());
}

#[test]
fn future_fees_are_not_yet_debt() {
    let (snapshot, _) = dana_snapshot();
    let reader = SnapshotReader::new(snapshot);
    let debts = DebtService::compute_debts(&reader, date(2024, 2, 10), &Labels::english())
        .expect("compute debts");
    assert_eq!(debts[0].total_debt, 450.0);

    let none = DebtService::compute_debts(&reader, date(2024, 1, 31), &Labels::english())
        .expect("compute debts");
    assert!(none.is_empty());
}

#[test]
fn total_debt_is_sum_of_all_buckets() {
    let (mut snapshot, dana_id) = dana_snapshot();
    snapshot.pending_payments.push(
        PendingPayment::new(dana_id, "Elevator repair share", 120.5).due_on(date(2024, 3, 1)),
    );
    snapshot
        .pending_payments
        .push(PendingPayment::new(dana_id, "Roof", 999.0).due_on(date(2024, 6, 1)));
    let station = ChargingStation::new(" 12", "Dana L.");
    snapshot.meter_readings.push(MeterReading::record(
        station.id,
        period(3, 2024),
        100.0,
        180.0,
        0.65,
    ));
    snapshot.meter_readings.push(MeterReading::record(
        station.id,
        period(4, 2024),
        180.0,
        200.0,
        0.65,
    ));
    snapshot.charging_stations.push(station);

    let reader = SnapshotReader::new(snapshot);
    let debts = DebtService::compute_debts(&reader, date(2024, 3, 15), &Labels::english())
        .expect("compute debts");
    let dana = &debts[0];

    assert_eq!(dana.pending_payments.len(), 1);
    assert_eq!(dana.charging_bills.len(), 1);
    assert_eq!(dana.charging_bills[0].label, "EV charging March 2024");
    assert_eq!(dana.charging_bills[0].amount, 52.0);
    let items: MoneyTotal = dana
        .items()
        .map(|item| MoneyTotal::from_amount(item.amount))
        .sum();
    assert_eq!(items.value(), dana.total_debt);
    assert_eq!(dana.total_debt, 1072.5);
}

#[test]
fn residents_without_debt_are_omitted() {
    let (mut snapshot, _) = dana_snapshot();
    let paid_up = Resident::new("Avi", "3", 450.0);
    snapshot.residents.push(paid_up.clone());
    snapshot.fee_payments.push(
        FeePayment::unpaid(paid_up.id, period(2, 2024), 450.0).paid_on(date(2024, 2, 3)),
    );
    let mut inactive = Resident::new("Former", "4", 450.0);
    inactive.is_active = false;
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(inactive.id, period(1, 2024), 450.0));
    snapshot.residents.push(inactive);

    let reader = SnapshotReader::new(snapshot);
    let debts = DebtService::compute_debts(&reader, date(2024, 3, 15), &Labels::english())
        .expect("compute debts");
    let names: Vec<&str> = debts.iter().map(|d| d.resident_name.as_str()).collect();
    assert_eq!(names, vec!["Dana"]);
}

#[test]
fn malformed_records_are_skipped_not_summed() {
    let (mut snapshot, dana_id) = dana_snapshot();
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(dana_id, BillingPeriod { month: 13, year: 2023 }, 450.0));
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(dana_id, period(1, 2024), f64::NAN));

    let reader = SnapshotReader::new(snapshot);
    let debts = DebtService::compute_debts(&reader, date(2024, 3, 15), &Labels::english())
        .expect("compute debts");
    assert_eq!(debts[0].committee_fees.len(), 2);
    assert_eq!(debts[0].total_debt, 900.0);
}

#[test]
fn fractional_charging_costs_are_itemized_in_agorot() {
    let mut snapshot = LedgerSnapshot::new("Fractions");
    let noa = Resident::new("Noa", "7", 450.0);
    let station = ChargingStation::new("7", "Noa");
    for month in 1..=3 {
        snapshot.meter_readings.push(MeterReading::record(
            station.id,
            period(month, 2024),
            10.0,
            11.0,
            0.333,
        ));
    }
    snapshot.charging_stations.push(station);
    snapshot.residents.push(noa);

    let reader = SnapshotReader::new(snapshot);
    let debts = DebtService::compute_debts(&reader, date(2024, 3, 15), &Labels::english())
        .expect("compute debts");
    let noa = &debts[0];

    assert_eq!(noa.charging_bills.len(), 3);
    assert!(noa.charging_bills.iter().all(|bill| bill.amount == 0.33));
    assert_eq!(noa.total_debt, 0.99);
    let items: MoneyTotal = noa
        .items()
        .map(|item| MoneyTotal::from_amount(item.amount))
        .sum();
    assert_eq!(items.value(), noa.total_debt);
}

#[test]
fn oversized_amounts_are_skipped_like_malformed_ones() {
    let (mut snapshot, dana_id) = dana_snapshot();
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(dana_id, period(1, 2024), 1e300));
    snapshot
        .pending_payments
        .push(PendingPayment::new(dana_id, "Typo", 6e16));

    let reader = SnapshotReader::new(snapshot);
    let debts = DebtService::compute_debts(&reader, date(2024, 3, 15), &Labels::english())
        .expect("compute debts");
    assert_eq!(debts[0].committee_fees.len(), 2);
    assert!(debts[0].pending_payments.is_empty());
    assert_eq!(debts[0].total_debt, 900.0);

    let mut ledger = LedgerSnapshot::new("Oversized");
    ledger.settings.personal_balance = 1e300;
    ledger
        .committee_income
        .push(CommitteeIncome::new("Donation", 500.0, date(2024, 1, 5)).paid());
    ledger
        .committee_income
        .push(CommitteeIncome::new("Typo", 1e18, date(2024, 1, 6)).paid());
    ledger
        .committee_expenses
        .push(CommitteeExpense::new("Typo", 6e16, date(2024, 1, 7)));
    let reader = SnapshotReader::new(ledger);
    assert_eq!(BalanceService::compute_cumulative(&reader).expect("cumulative"), 500.0);
    let january = BalanceService::compute_monthly(&reader, 1, 2024).expect("monthly");
    assert_eq!(january.total_income, 500.0);
    assert_eq!(january.total_expense, 0.0);
}

#[test]
fn total_outstanding_adds_in_agorot() {
    let debt = |name: &str, amount: f64| ResidentDebt {
        resident_id: Uuid::new_v4(),
        resident_name: name.to_string(),
        apartment_number: "1".into(),
        committee_fees: vec![DebtItem::new("January 2024".into(), amount)],
        pending_payments: Vec::new(),
        charging_bills: Vec::new(),
        total_debt: amount,
    };
    let debts = vec![debt("Dana", 0.1), debt("Avi", 0.2)];
    assert_eq!(DebtService::total_outstanding(&debts), 0.3);
    assert_eq!(DebtService::total_outstanding(&[]), 0.0);
}

#[test]
fn charging_bill_goes_to_first_resident_of_shared_apartment() {
    let mut snapshot = LedgerSnapshot::new("Shared");
    let first = Resident::new("Owner", "8", 400.0);
    let second = Resident::new("Tenant", "8 ", 400.0);
    let station = ChargingStation::new("8", "Owner");
    snapshot.meter_readings.push(MeterReading::record(
        station.id,
        period(1, 2024),
        0.0,
        100.0,
        0.5,
    ));
    snapshot.charging_stations.push(station);
    snapshot.residents.push(first.clone());
    snapshot.residents.push(second);

    let inputs = DebtInputs::fetch(&SnapshotReader::new(snapshot)).expect("fetch");
    let debts = DebtService::aggregate(&inputs, date(2024, 2, 1), &Labels::english());
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].resident_id, first.id);
    assert_eq!(debts[0].total_debt, 50.0);
}

#[test]
fn april_expense_without_income_gives_negative_balance() {
    let mut snapshot = LedgerSnapshot::new("Expenses");
    snapshot
        .committee_expenses
        .push(CommitteeExpense::new("Cleaning", 1000.0, date(2024, 4, 12)));
    snapshot
        .committee_income
        .push(CommitteeIncome::new("Donation", 300.0, date(2024, 4, 2)));
    let reader = SnapshotReader::new(snapshot);

    let april = BalanceService::compute_monthly(&reader, 4, 2024).expect("monthly");
    assert_eq!(april.total_income, 0.0);
    assert_eq!(april.total_expense, 1000.0);
    assert_eq!(april.monthly_balance, -1000.0);
}

#[test]
fn monthly_income_uses_each_source_rule() {
    let mut snapshot = LedgerSnapshot::new("Sources");
    let resident = Resident::new("Dana", "12", 450.0);
    snapshot.fee_payments.push(
        FeePayment::unpaid(resident.id, period(3, 2024), 450.0).paid_on(date(2024, 5, 4)),
    );
    snapshot.fee_payments.push(
        FeePayment::unpaid(resident.id, period(5, 2024), 450.0).paid_on(date(2024, 6, 1)),
    );
    snapshot.meter_readings.push(
        MeterReading::record(Uuid::new_v4(), period(5, 2024), 0.0, 100.0, 0.7).paid(),
    );
    snapshot
        .committee_income
        .push(CommitteeIncome::new("Antenna rent", 250.0, date(2024, 5, 20)).paid());
    snapshot.residents.push(resident);
    let reader = SnapshotReader::new(snapshot);

    let may = BalanceService::compute_monthly(&reader, 5, 2024).expect("monthly");
    assert_eq!(may.income.fee_payments, 450.0);
    assert_eq!(may.income.charging_payments, 70.0);
    assert_eq!(may.income.committee_income, 250.0);
    assert_eq!(may.total_income, 770.0);
    assert_eq!(may.monthly_balance, 770.0);
}

#[test]
fn invalid_month_is_rejected() {
    let reader = SnapshotReader::new(LedgerSnapshot::new("Empty"));
    let err = BalanceService::compute_monthly(&reader, 0, 2024).unwrap_err();
    assert!(matches!(err, CoreError::InvalidPeriod { month: 0, year: 2024 }));
}

#[test]
fn cumulative_includes_opening_balance_and_every_expense() {
    let mut snapshot = LedgerSnapshot::new("Cumulative");
    snapshot.settings = Settings {
        personal_balance: 5000.0,
        kwh_price: 0.6,
    };
    let resident = Resident::new("Dana", "12", 450.0);
    snapshot.fee_payments.push(
        FeePayment::unpaid(resident.id, period(1, 2023), 450.0).paid_on(date(2023, 1, 3)),
    );
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(resident.id, period(2, 2023), 450.0));
    snapshot
        .committee_income
        .push(CommitteeIncome::new("Donation", 200.0, date(2022, 7, 1)).paid());
    snapshot
        .committee_income
        .push(CommitteeIncome::new("Pledge", 999.0, date(2022, 7, 1)));
    snapshot.meter_readings.push(
        MeterReading::record(Uuid::new_v4(), period(3, 2023), 0.0, 50.0, 1.0).paid(),
    );
    snapshot
        .committee_expenses
        .push(CommitteeExpense::new("Gardening", 700.0, date(2019, 1, 1)));
    snapshot
        .committee_expenses
        .push(CommitteeExpense::new("Insurance", 1200.0, date(2030, 1, 1)));
    snapshot.residents.push(resident);

    let reader = SnapshotReader::new(snapshot);
    let balance = BalanceService::compute_cumulative(&reader).expect("cumulative");
    assert_eq!(balance, 5000.0 + 450.0 + 200.0 + 50.0 - 700.0 - 1200.0);
}

#[test]
fn cumulative_ignores_record_order() {
    let mut inputs = BalanceInputs::default();
    inputs.settings.personal_balance = 10.01;
    for (idx, amount) in [0.1, 0.2, 0.3, 1e6, 33.33, 0.07].into_iter().enumerate() {
        inputs.paid_income.push(
            CommitteeIncome::new("Misc", amount, date(2024, 1, 1 + idx as u32)).paid(),
        );
        inputs
            .expenses
            .push(CommitteeExpense::new("Misc", amount / 3.0, date(2024, 2, 1)));
    }
    let forward = BalanceService::cumulative(&inputs);
    inputs.paid_income.reverse();
    inputs.expenses.rotate_left(2);
    let shuffled = BalanceService::cumulative(&inputs);
    assert_eq!(forward, shuffled);
}

#[test]
fn breakdown_percentages_are_rounded_per_category() {
    let mut inputs = BalanceInputs::default();
    inputs
        .paid_income
        .push(CommitteeIncome::new("A", 60.0, date(2024, 5, 1)).paid());
    inputs
        .paid_income
        .push(CommitteeIncome::new("B", 40.0, date(2024, 5, 2)).paid());
    let breakdown = BalanceService::breakdown(&inputs, period(5, 2024), &Labels::english());
    let total: i64 = breakdown.income.iter().map(|r| r.percentage).sum();
    assert_eq!(total, 100);
    assert_eq!(breakdown.income[0].category, "A");
    assert_eq!(breakdown.income[0].percentage, 60);
    assert!(breakdown.expense.is_empty());

    let mut thirds = BalanceInputs::default();
    for (category, amount) in [("A", 33.33), ("B", 33.33), ("B2", 33.34)] {
        thirds
            .paid_income
            .push(CommitteeIncome::new(category, amount, date(2024, 5, 1)).paid());
    }
    let breakdown = BalanceService::breakdown(&thirds, period(5, 2024), &Labels::english());
    let total: i64 = breakdown.income.iter().map(|r| r.percentage).sum();
    assert!((99..=101).contains(&total));
}

#[test]
fn breakdown_names_fee_and_charging_categories() {
    let mut inputs = BalanceInputs::default();
    let resident_id = Uuid::new_v4();
    inputs.paid_fees.push(
        FeePayment::unpaid(resident_id, period(4, 2024), 450.0).paid_on(date(2024, 5, 1)),
    );
    inputs
        .paid_readings
        .push(MeterReading::record(Uuid::new_v4(), period(5, 2024), 0.0, 100.0, 0.5).paid());
    inputs
        .expenses
        .push(CommitteeExpense::new("Cleaning", 100.0, date(2024, 5, 9)));
    let breakdown = BalanceService::breakdown(&inputs, period(5, 2024), &Labels::english());
    let categories: Vec<&str> = breakdown.income.iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, vec!["Committee fees", "EV charging"]);
    assert_eq!(breakdown.income[0].percentage, 90);
    assert_eq!(breakdown.expense[0].percentage, 100);
}

#[test]
fn year_summary_adds_up_months() {
    let mut inputs = BalanceInputs::default();
    inputs
        .paid_income
        .push(CommitteeIncome::new("Rent", 100.0, date(2024, 1, 1)).paid());
    inputs
        .paid_income
        .push(CommitteeIncome::new("Rent", 100.0, date(2024, 12, 31)).paid());
    inputs
        .paid_income
        .push(CommitteeIncome::new("Rent", 100.0, date(2025, 1, 1)).paid());
    inputs
        .expenses
        .push(CommitteeExpense::new("Repairs", 50.0, date(2024, 6, 6)));
    let year = BalanceService::summarize_year(&inputs, 2024);
    assert_eq!(year.months.len(), 12);
    assert_eq!(year.total_income, 200.0);
    assert_eq!(year.total_expense, 50.0);
    assert_eq!(year.balance, 150.0);
    assert_eq!(year.months[5].monthly_balance, -50.0);
}

struct FailingReader {
    inner: SnapshotReader,
}

impl LedgerReader for FailingReader {
    fn active_residents(&self) -> Result<Vec<Resident>, CoreError> {
        self.inner.active_residents()
    }
    fn unpaid_fee_payments(&self) -> Result<Vec<FeePayment>, CoreError> {
        self.inner.unpaid_fee_payments()
    }
    fn unpaid_pending_payments(&self) -> Result<Vec<PendingPayment>, CoreError> {
        Err(CoreError::fetch("pending_payments", "connection reset"))
    }
    fn unpaid_meter_readings(&self) -> Result<Vec<MeterReading>, CoreError> {
        self.inner.unpaid_meter_readings()
    }
    fn charging_stations(&self) -> Result<Vec<ChargingStation>, CoreError> {
        self.inner.charging_stations()
    }
    fn paid_committee_income(&self) -> Result<Vec<CommitteeIncome>, CoreError> {
        self.inner.paid_committee_income()
    }
    fn paid_fee_payments(&self) -> Result<Vec<FeePayment>, CoreError> {
        self.inner.paid_fee_payments()
    }
    fn paid_meter_readings(&self) -> Result<Vec<MeterReading>, CoreError> {
        Err(CoreError::fetch("meter_readings", "timeout"))
    }
    fn committee_expenses(&self) -> Result<Vec<CommitteeExpense>, CoreError> {
        self.inner.committee_expenses()
    }
    fn settings(&self) -> Result<Settings, CoreError> {
        self.inner.settings()
    }
    fn maintenance_tasks(&self) -> Result<Vec<PeriodicMaintenance>, CoreError> {
        self.inner.maintenance_tasks()
    }
}

#[test]
fn any_fetch_failure_aborts_the_computation() {
    let (snapshot, _) = dana_snapshot();
    let reader = FailingReader {
        inner: SnapshotReader::new(snapshot),
    };
    let err = DebtService::compute_debts(&reader, date(2024, 3, 15), &Labels::english())
        .unwrap_err();
    assert!(matches!(err, CoreError::Fetch { collection: "pending_payments", .. }));
    assert!(err.is_data_failure());

    let err = BalanceService::compute_cumulative(&reader).unwrap_err();
    assert!(matches!(err, CoreError::Fetch { collection: "meter_readings", .. }));

    assert!(api_financial_report(&reader, date(2024, 3, 15), period(3, 2024), &Labels::english())
        .is_err());
}

#[test]
fn financial_report_combines_every_figure() {
    let (mut snapshot, _) = dana_snapshot();
    snapshot.settings.personal_balance = 1000.0;
    snapshot
        .committee_expenses
        .push(CommitteeExpense::new("Cleaning", 250.0, date(2024, 3, 3)));
    let reader = SnapshotReader::new(snapshot);

    let report = api_financial_report(&reader, date(2024, 3, 15), period(3, 2024), &Labels::english())
        .expect("report");
    assert_eq!(report.total_outstanding, 900.0);
    assert_eq!(report.monthly.monthly_balance, -250.0);
    assert_eq!(report.cumulative_balance, 750.0);
    assert_eq!(report.breakdown.expense.len(), 1);
}

#[test]
fn reminders_need_debt_and_email() {
    let (mut snapshot, _) = dana_snapshot();
    snapshot.residents[0].email = Some("dana@example.com".into());
    let silent = Resident::new("NoMail", "2", 450.0);
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(silent.id, period(1, 2024), 450.0));
    snapshot.residents.push(silent);
    snapshot
        .residents
        .push(Resident::new("Clear", "3", 450.0).with_email("clear@example.com"));

    let reader = SnapshotReader::new(snapshot);
    let recipients = api_reminder_recipients(&reader, date(2024, 3, 15), &Labels::english())
        .expect("recipients");
    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].email, "dana@example.com");
    assert_eq!(recipients[0].total_debt, 900.0);
}

#[test]
fn upcoming_maintenance_comes_from_reader() {
    let mut snapshot = LedgerSnapshot::new("Tasks");
    snapshot.maintenance.push(PeriodicMaintenance::new(
        "Elevator inspection",
        MaintenanceFrequency::SemiAnnual,
        date(2024, 2, 10),
    ));
    snapshot.maintenance.push(PeriodicMaintenance::new(
        "Water tank",
        MaintenanceFrequency::Annual,
        date(2024, 8, 1),
    ));
    let reader = SnapshotReader::new(snapshot);
    let upcoming = api_upcoming_maintenance(&reader, date(2024, 1, 15)).expect("upcoming");
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].title, "Elevator inspection");
}

#[test]
fn snapshot_warnings_flag_skipped_records() {
    let (mut snapshot, dana_id) = dana_snapshot();
    snapshot.residents.push(Resident::new("Roommate", "12", 450.0));
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(dana_id, BillingPeriod { month: 0, year: 2024 }, 450.0));
    snapshot
        .fee_payments
        .push(FeePayment::unpaid(Uuid::new_v4(), period(1, 2024), f64::NAN));
    snapshot
        .committee_expenses
        .push(CommitteeExpense::new("Typo", 6e16, date(2024, 1, 7)));
    snapshot.charging_stations.push(ChargingStation::new("99", "Nobody"));

    let warnings = crate::storage::snapshot_warnings(&snapshot);
    assert!(warnings.iter().any(|w| w.contains("apartment 12 is shared")));
    assert!(warnings.iter().any(|w| w.contains("outside 1..=12")));
    assert!(warnings.iter().any(|w| w.contains("unknown resident")));
    assert!(warnings.iter().any(|w| w.starts_with("fee payment") && w.contains("unusable amount")));
    assert!(warnings.iter().any(|w| w.starts_with("expense") && w.contains("unusable amount")));
    assert!(warnings.iter().any(|w| w.contains("has no active resident")));

    let (clean, _) = dana_snapshot();
    assert!(crate::storage::snapshot_warnings(&clean).is_empty());
}
