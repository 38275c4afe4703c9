//! A point-in-time copy of every committee ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ChargingStation, CommitteeExpense, CommitteeIncome, FeePayment, MeterReading,
    PendingPayment, PeriodicMaintenance, Resident, Settings,
};

/// All collections of one building, as exported from the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub building: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub residents: Vec<Resident>,
    #[serde(default)]
    pub fee_payments: Vec<FeePayment>,
    #[serde(default)]
    pub pending_payments: Vec<PendingPayment>,
    #[serde(default)]
    pub charging_stations: Vec<ChargingStation>,
    #[serde(default)]
    pub meter_readings: Vec<MeterReading>,
    #[serde(default)]
    pub committee_income: Vec<CommitteeIncome>,
    #[serde(default)]
    pub committee_expenses: Vec<CommitteeExpense>,
    #[serde(default)]
    pub maintenance: Vec<PeriodicMaintenance>,
}

impl LedgerSnapshot {
    pub fn new(building: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            building: building.into(),
            created_at: now,
            updated_at: now,
            settings: Settings::default(),
            residents: Vec::new(),
            fee_payments: Vec::new(),
            pending_payments: Vec::new(),
            charging_stations: Vec::new(),
            meter_readings: Vec::new(),
            committee_income: Vec::new(),
            committee_expenses: Vec::new(),
            maintenance: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn resident(&self, id: uuid::Uuid) -> Option<&Resident> {
        self.residents.iter().find(|resident| resident.id == id)
    }

    pub fn record_count(&self) -> usize {
        self.residents.len()
            + self.fee_payments.len()
            + self.pending_payments.len()
            + self.charging_stations.len()
            + self.meter_readings.len()
            + self.committee_income.len()
            + self.committee_expenses.len()
            + self.maintenance.len()
    }
}
