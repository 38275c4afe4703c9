//! Per-resident outstanding debt across fees, pending payments and charging bills.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;
use vaad_domain::{
    ChargingStation, FeePayment, Labels, MeterReading, PendingPayment, Resident,
};

use crate::{
    directory::{ApartmentMatch, ResidentDirectory},
    money::{round_to_minor, skip_record, usable_amount, MoneyTotal},
    predicates::{charging_bill_is_outstanding, fee_is_outstanding, pending_is_outstanding},
    CoreError, LedgerReader,
};

/// One itemized line of a resident's debt.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtItem {
    pub label: String,
    /// Rounded to whole agorot, as counted in `total_debt`.
    pub amount: f64,
}

impl DebtItem {
    pub fn new(label: String, amount: f64) -> Self {
        Self {
            label,
            amount: round_to_minor(amount),
        }
    }
}

/// Outstanding obligations of one active resident.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidentDebt {
    pub resident_id: Uuid,
    pub resident_name: String,
    pub apartment_number: String,
    pub committee_fees: Vec<DebtItem>,
    pub pending_payments: Vec<DebtItem>,
    pub charging_bills: Vec<DebtItem>,
    pub total_debt: f64,
}

impl ResidentDebt {
    pub fn item_count(&self) -> usize {
        self.committee_fees.len() + self.pending_payments.len() + self.charging_bills.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &DebtItem> {
        self.committee_fees
            .iter()
            .chain(&self.pending_payments)
            .chain(&self.charging_bills)
    }
}

/// Collections the debt computation reads, fetched once per call.
#[derive(Debug, Clone, Default)]
pub struct DebtInputs {
    pub residents: Vec<Resident>,
    pub unpaid_fees: Vec<FeePayment>,
    pub unpaid_pending: Vec<PendingPayment>,
    pub stations: Vec<ChargingStation>,
    pub unpaid_readings: Vec<MeterReading>,
}

impl DebtInputs {
    /// Fetches every input; the first failing fetch aborts the whole load.
    pub fn fetch(reader: &dyn LedgerReader) -> Result<Self, CoreError> {
        Ok(Self {
            residents: reader.active_residents()?,
            unpaid_fees: reader.unpaid_fee_payments()?,
            unpaid_pending: reader.unpaid_pending_payments()?,
            stations: reader.charging_stations()?,
            unpaid_readings: reader.unpaid_meter_readings()?,
        })
    }
}

/// A resident selected for a debt reminder email.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRecipient {
    pub resident_id: Uuid,
    pub name: String,
    pub email: String,
    pub total_debt: f64,
}

pub struct DebtService;

impl DebtService {
    /// Reads the ledgers and computes every active resident's outstanding debt.
    pub fn compute_debts(
        reader: &dyn LedgerReader,
        today: NaiveDate,
        labels: &Labels,
    ) -> Result<Vec<ResidentDebt>, CoreError> {
        let inputs = DebtInputs::fetch(reader)?;
        Ok(Self::aggregate(&inputs, today, labels))
    }

    /// Pure aggregation over already-fetched inputs.
    ///
    /// Residents appear in input order; residents owing nothing are omitted.
    pub fn aggregate(inputs: &DebtInputs, today: NaiveDate, labels: &Labels) -> Vec<ResidentDebt> {
        let mut fees_by_resident: HashMap<Uuid, Vec<&FeePayment>> = HashMap::new();
        for fee in inputs.unpaid_fees.iter().filter(|fee| fee_is_outstanding(fee, today)) {
            fees_by_resident.entry(fee.resident_id).or_default().push(fee);
        }

        let mut pending_by_resident: HashMap<Uuid, Vec<&PendingPayment>> = HashMap::new();
        for payment in inputs
            .unpaid_pending
            .iter()
            .filter(|payment| pending_is_outstanding(payment, today))
        {
            pending_by_resident
                .entry(payment.resident_id)
                .or_default()
                .push(payment);
        }

        let station_owners = station_owners(&inputs.residents, &inputs.stations);
        let mut bills_by_resident: HashMap<Uuid, Vec<&MeterReading>> = HashMap::new();
        for reading in inputs
            .unpaid_readings
            .iter()
            .filter(|reading| charging_bill_is_outstanding(reading, today))
        {
            match station_owners.get(&reading.station_id) {
                Some(owner) => bills_by_resident.entry(*owner).or_default().push(reading),
                None => debug!(
                    reading = %reading.id,
                    station = %reading.station_id,
                    "charging bill has no resident"
                ),
            }
        }

        let debts: Vec<ResidentDebt> = inputs
            .residents
            .iter()
            .filter_map(|resident| {
                let committee_fees = fee_items(
                    fees_by_resident.remove(&resident.id).unwrap_or_default(),
                    labels,
                );
                let pending_payments = pending_items(
                    pending_by_resident.remove(&resident.id).unwrap_or_default(),
                    labels,
                );
                let charging_bills = charging_items(
                    bills_by_resident.remove(&resident.id).unwrap_or_default(),
                    labels,
                );
                build_debt(resident, committee_fees, pending_payments, charging_bills)
            })
            .collect();

        debug!(
            residents = inputs.residents.len(),
            in_debt = debts.len(),
            "computed resident debts"
        );
        debts
    }

    /// Sum of every resident's `total_debt`, in whole agorot.
    pub fn total_outstanding(debts: &[ResidentDebt]) -> f64 {
        debts
            .iter()
            .map(|debt| MoneyTotal::from_amount(debt.total_debt))
            .sum::<MoneyTotal>()
            .value()
    }

    /// Residents with a positive debt and a usable email address.
    pub fn reminder_recipients(
        debts: &[ResidentDebt],
        residents: &[Resident],
    ) -> Vec<ReminderRecipient> {
        let by_id: HashMap<Uuid, &Resident> =
            residents.iter().map(|resident| (resident.id, resident)).collect();
        debts
            .iter()
            .filter(|debt| debt.total_debt > 0.0)
            .filter_map(|debt| {
                let resident = by_id.get(&debt.resident_id)?;
                let email = resident.contact_email()?;
                Some(ReminderRecipient {
                    resident_id: resident.id,
                    name: resident.name.clone(),
                    email: email.to_string(),
                    total_debt: debt.total_debt,
                })
            })
            .collect()
    }
}

/// Maps each charging station to the resident billed for it.
fn station_owners(residents: &[Resident], stations: &[ChargingStation]) -> HashMap<Uuid, Uuid> {
    let directory = ResidentDirectory::new(residents);
    let mut owners = HashMap::new();
    for station in stations {
        let found = directory.lookup(&station.apartment_number);
        if let ApartmentMatch::Ambiguous { first, candidates } = found {
            warn!(
                station = %station.id,
                apartment = station.apartment_key(),
                candidates,
                billed = %first.id,
                "apartment shared by several residents; billing the first"
            );
        }
        match found.first() {
            Some(resident) => {
                owners.insert(station.id, resident.id);
            }
            None => warn!(
                station = %station.id,
                apartment = station.apartment_key(),
                "no active resident for charging station"
            ),
        }
    }
    owners
}

fn fee_items(mut fees: Vec<&FeePayment>, labels: &Labels) -> Vec<DebtItem> {
    fees.sort_by_key(|fee| fee.period.ordinal());
    fees.into_iter()
        .filter_map(|fee| {
            let Some(label) = labels.period_label(fee.period) else {
                skip_record("fee_payments", fee.id, "month outside 1..=12");
                return None;
            };
            let amount = usable_amount(fee, "fee_payments")?;
            Some(DebtItem::new(label, amount))
        })
        .collect()
}

fn pending_items(payments: Vec<&PendingPayment>, labels: &Labels) -> Vec<DebtItem> {
    payments
        .into_iter()
        .filter_map(|payment| {
            let amount = usable_amount(payment, "pending_payments")?;
            let description = payment.description.trim();
            let label = if description.is_empty() {
                labels.pending_payment.to_string()
            } else {
                description.to_string()
            };
            Some(DebtItem::new(label, amount))
        })
        .collect()
}

fn charging_items(mut readings: Vec<&MeterReading>, labels: &Labels) -> Vec<DebtItem> {
    readings.sort_by_key(|reading| reading.period.ordinal());
    readings
        .into_iter()
        .filter_map(|reading| {
            let Some(label) = labels.charging_label(reading.period) else {
                skip_record("meter_readings", reading.id, "month outside 1..=12");
                return None;
            };
            let amount = usable_amount(reading, "meter_readings")?;
            Some(DebtItem::new(label, amount))
        })
        .collect()
}

fn build_debt(
    resident: &Resident,
    committee_fees: Vec<DebtItem>,
    pending_payments: Vec<DebtItem>,
    charging_bills: Vec<DebtItem>,
) -> Option<ResidentDebt> {
    let mut total = MoneyTotal::default();
    for item in committee_fees
        .iter()
        .chain(&pending_payments)
        .chain(&charging_bills)
    {
        total.add(item.amount);
    }
    if !total.is_positive() {
        return None;
    }
    Some(ResidentDebt {
        resident_id: resident.id,
        resident_name: resident.name.clone(),
        apartment_number: resident.apartment_key().to_string(),
        committee_fees,
        pending_payments,
        charging_bills,
        total_debt: total.value(),
    })
}
