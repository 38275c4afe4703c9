use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use vaad_domain::{Amounted, LedgerSnapshot};

use crate::{directory::ResidentDirectory, CoreError};

/// Describes a persisted backup artifact for a snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotBackupInfo {
    pub snapshot: String,
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing ledger snapshots and backups.
pub trait SnapshotStorage: Send + Sync {
    fn save_snapshot(&self, name: &str, snapshot: &LedgerSnapshot) -> Result<(), CoreError>;
    fn load_snapshot(&self, name: &str) -> Result<LedgerSnapshot, CoreError>;
    fn list_snapshots(&self) -> Result<Vec<String>, CoreError>;
    fn delete_snapshot(&self, name: &str) -> Result<(), CoreError>;
    fn load_snapshot_from_path(&self, path: &Path) -> Result<LedgerSnapshot, CoreError>;
    fn backup_snapshot(
        &self,
        name: &str,
        snapshot: &LedgerSnapshot,
        note: Option<&str>,
    ) -> Result<SnapshotBackupInfo, CoreError>;
    fn list_backups(&self, name: &str) -> Result<Vec<SnapshotBackupInfo>, CoreError>;
    fn restore_backup(&self, backup: &SnapshotBackupInfo) -> Result<LedgerSnapshot, CoreError>;
}

/// Detects records the reconciliation engine will skip or resolve by guesswork.
pub fn snapshot_warnings(snapshot: &LedgerSnapshot) -> Vec<String> {
    let resident_ids: HashSet<_> = snapshot.residents.iter().map(|r| r.id).collect();
    let station_ids: HashSet<_> = snapshot.charging_stations.iter().map(|s| s.id).collect();
    let active: Vec<_> = snapshot
        .residents
        .iter()
        .filter(|r| r.is_active)
        .cloned()
        .collect();
    let directory = ResidentDirectory::new(&active);
    let mut warnings = Vec::new();

    for apartment in directory.shared_apartments() {
        warnings.push(format!(
            "apartment {} is shared by several active residents",
            apartment
        ));
    }

    for fee in &snapshot.fee_payments {
        if !resident_ids.contains(&fee.resident_id) {
            warnings.push(format!(
                "fee payment {} references unknown resident {}",
                fee.id, fee.resident_id
            ));
        }
        if !fee.period.is_valid() {
            warnings.push(format!(
                "fee payment {} has month {} outside 1..=12",
                fee.id, fee.period.month
            ));
        }
        if !fee.has_valid_amount() {
            warnings.push(format!("fee payment {} has a unusable amount", fee.id));
        }
        if fee.is_paid && fee.payment_date.is_none() {
            warnings.push(format!(
                "fee payment {} is paid but has no payment date",
                fee.id
            ));
        }
    }

    for payment in &snapshot.pending_payments {
        if !resident_ids.contains(&payment.resident_id) {
            warnings.push(format!(
                "pending payment {} references unknown resident {}",
                payment.id, payment.resident_id
            ));
        }
        if !payment.has_valid_amount() {
            warnings.push(format!(
                "pending payment {} has a unusable amount",
                payment.id
            ));
        }
    }

    for station in &snapshot.charging_stations {
        if directory.lookup(&station.apartment_number).first().is_none() {
            warnings.push(format!(
                "charging station {} (apartment {}) has no active resident",
                station.id,
                station.apartment_key()
            ));
        }
    }

    for reading in &snapshot.meter_readings {
        if !station_ids.contains(&reading.station_id) {
            warnings.push(format!(
                "meter reading {} references unknown station {}",
                reading.id, reading.station_id
            ));
        }
        if !reading.period.is_valid() {
            warnings.push(format!(
                "meter reading {} has month {} outside 1..=12",
                reading.id, reading.period.month
            ));
        }
        if !reading.has_valid_amount() {
            warnings.push(format!(
                "meter reading {} has a unusable total cost",
                reading.id
            ));
        }
    }

    for income in &snapshot.committee_income {
        if !income.has_valid_amount() {
            warnings.push(format!("income {} has a unusable amount", income.id));
        }
    }
    for expense in &snapshot.committee_expenses {
        if !expense.has_valid_amount() {
            warnings.push(format!("expense {} has a unusable amount", expense.id));
        }
    }
    if !snapshot.settings.personal_balance.is_finite() {
        warnings.push("opening balance is not a number".to_string());
    }
    warnings
}
