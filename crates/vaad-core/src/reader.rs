//! Read-only access to the committee ledgers.

use vaad_domain::{
    ChargingStation, CommitteeExpense, CommitteeIncome, FeePayment, LedgerSnapshot,
    MeterReading, PendingPayment, PeriodicMaintenance, Resident, Settings,
};

use crate::CoreError;

/// Persistence collaborator consumed by the reconciliation services.
///
/// Every method returns the full collection, pre-filtered by the equality
/// predicate in its name. Implementations may fetch concurrently; services
/// call each method at most once per computation and abort on the first error.
pub trait LedgerReader: Send + Sync {
    fn active_residents(&self) -> Result<Vec<Resident>, CoreError>;
    fn unpaid_fee_payments(&self) -> Result<Vec<FeePayment>, CoreError>;
    fn unpaid_pending_payments(&self) -> Result<Vec<PendingPayment>, CoreError>;
    fn unpaid_meter_readings(&self) -> Result<Vec<MeterReading>, CoreError>;
    fn charging_stations(&self) -> Result<Vec<ChargingStation>, CoreError>;
    fn paid_committee_income(&self) -> Result<Vec<CommitteeIncome>, CoreError>;
    fn paid_fee_payments(&self) -> Result<Vec<FeePayment>, CoreError>;
    fn paid_meter_readings(&self) -> Result<Vec<MeterReading>, CoreError>;
    /// All expenses, with no time or paid-state filter.
    fn committee_expenses(&self) -> Result<Vec<CommitteeExpense>, CoreError>;
    fn settings(&self) -> Result<Settings, CoreError>;
    fn maintenance_tasks(&self) -> Result<Vec<PeriodicMaintenance>, CoreError>;
}

/// [`LedgerReader`] over an in-memory [`LedgerSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    snapshot: LedgerSnapshot,
}

impl SnapshotReader {
    pub fn new(snapshot: LedgerSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> LedgerSnapshot {
        self.snapshot
    }
}

impl From<LedgerSnapshot> for SnapshotReader {
    fn from(snapshot: LedgerSnapshot) -> Self {
        Self::new(snapshot)
    }
}

fn filtered<T: Clone>(items: &[T], keep: impl Fn(&T) -> bool) -> Vec<T> {
    items.iter().filter(|item| keep(item)).cloned().collect()
}

impl LedgerReader for SnapshotReader {
    fn active_residents(&self) -> Result<Vec<Resident>, CoreError> {
        Ok(filtered(&self.snapshot.residents, |r| r.is_active))
    }

    fn unpaid_fee_payments(&self) -> Result<Vec<FeePayment>, CoreError> {
        Ok(filtered(&self.snapshot.fee_payments, |f| !f.is_paid))
    }

    fn unpaid_pending_payments(&self) -> Result<Vec<PendingPayment>, CoreError> {
        Ok(filtered(&self.snapshot.pending_payments, |p| !p.is_paid))
    }

    fn unpaid_meter_readings(&self) -> Result<Vec<MeterReading>, CoreError> {
        Ok(filtered(&self.snapshot.meter_readings, |m| !m.is_paid))
    }

    fn charging_stations(&self) -> Result<Vec<ChargingStation>, CoreError> {
        Ok(self.snapshot.charging_stations.clone())
    }

    fn paid_committee_income(&self) -> Result<Vec<CommitteeIncome>, CoreError> {
        Ok(filtered(&self.snapshot.committee_income, |i| i.is_paid))
    }

    fn paid_fee_payments(&self) -> Result<Vec<FeePayment>, CoreError> {
        Ok(filtered(&self.snapshot.fee_payments, |f| f.is_paid))
    }

    fn paid_meter_readings(&self) -> Result<Vec<MeterReading>, CoreError> {
        Ok(filtered(&self.snapshot.meter_readings, |m| m.is_paid))
    }

    fn committee_expenses(&self) -> Result<Vec<CommitteeExpense>, CoreError> {
        Ok(self.snapshot.committee_expenses.clone())
    }

    fn settings(&self) -> Result<Settings, CoreError> {
        Ok(self.snapshot.settings)
    }

    fn maintenance_tasks(&self) -> Result<Vec<PeriodicMaintenance>, CoreError> {
        Ok(self.snapshot.maintenance.clone())
    }
}
