#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;
use vaad_config::{Config, ConfigManager};
use vaad_core::storage::SnapshotStorage;
use vaad_domain::{
    BillingPeriod, ChargingStation, CommitteeExpense, CommitteeIncome, FeePayment,
    LedgerSnapshot, MaintenanceFrequency, MeterReading, PendingPayment, PeriodicMaintenance,
    Resident,
};
use vaad_ledger::utils::paths::storage_paths;
use vaad_storage_json::JsonSnapshotStorage;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn period(month: u32, year: i32) -> BillingPeriod {
    BillingPeriod::new(month, year).expect("valid period")
}

/// Creates an isolated application directory with an English, colorless config.
pub fn setup_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let home = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let manager = ConfigManager::with_base_dir(home.clone()).expect("config manager");
    let config = Config {
        locale: "en-US".into(),
        ui_color_enabled: false,
        ..Config::default()
    };
    manager.save(&config).expect("save config");
    home
}

pub fn storage_for(home: &Path) -> JsonSnapshotStorage {
    let config = ConfigManager::with_base_dir(home.to_path_buf())
        .expect("config manager")
        .load()
        .expect("load config");
    JsonSnapshotStorage::new(storage_paths(&config, home)).expect("storage")
}

pub fn seed_snapshot(home: &Path, name: &str, snapshot: &LedgerSnapshot) {
    storage_for(home)
        .save_snapshot(name, snapshot)
        .expect("seed snapshot");
}

/// Two residents, one charger, a month of committee activity and two tasks.
///
/// On 2024-03-15 Dana owes ₪900 in fees plus ₪52 of charging; Avi is paid up.
/// March nets -₪950; the cumulative balance is ₪9,565.
pub fn sample_building() -> LedgerSnapshot {
    let mut snapshot = LedgerSnapshot::new("Herzl 5");
    snapshot.settings.personal_balance = 10_000.0;
    snapshot.settings.kwh_price = 0.65;

    let dana = Resident::new("Dana", "12", 450.0).with_email("dana@example.com");
    let avi = Resident::new("Avi", "3", 450.0).with_email("avi@example.com");

    for month in [2, 3] {
        snapshot
            .fee_payments
            .push(FeePayment::unpaid(dana.id, period(month, 2024), 450.0));
    }
    snapshot.fee_payments.push(
        FeePayment::unpaid(avi.id, period(3, 2024), 450.0).paid_on(date(2024, 3, 2)),
    );
    snapshot.fee_payments.push(
        FeePayment::unpaid(avi.id, period(2, 2024), 450.0).paid_on(date(2024, 2, 4)),
    );
    snapshot.pending_payments.push(
        PendingPayment::new(dana.id, "Lobby renovation", 300.0).due_on(date(2024, 5, 1)),
    );

    let station = ChargingStation::new("12", "Dana");
    snapshot.meter_readings.push(MeterReading::record(
        station.id,
        period(3, 2024),
        1000.0,
        1080.0,
        0.65,
    ));
    snapshot.meter_readings.push(
        MeterReading::record(station.id, period(2, 2024), 900.0, 1000.0, 0.65).paid(),
    );
    snapshot.charging_stations.push(station);

    snapshot
        .committee_income
        .push(CommitteeIncome::new("Antenna rent", 600.0, date(2024, 3, 10)).paid());
    snapshot
        .committee_expenses
        .push(CommitteeExpense::new("Cleaning", 800.0, date(2024, 3, 5)));
    snapshot
        .committee_expenses
        .push(CommitteeExpense::new("Elevator", 1200.0, date(2024, 3, 20)));

    snapshot.maintenance.push(PeriodicMaintenance::new(
        "Elevator inspection",
        MaintenanceFrequency::SemiAnnual,
        date(2024, 3, 30),
    ));
    snapshot.maintenance.push(PeriodicMaintenance::new(
        "Water tank cleaning",
        MaintenanceFrequency::Annual,
        date(2024, 9, 1),
    ));

    snapshot.residents.push(dana);
    snapshot.residents.push(avi);
    snapshot
}
