//! EV-charging sub-metering: stations bound to apartments and monthly readings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::resident::apartment_key;

/// A charger installed in the parking lot and billed to an apartment.
///
/// `resident_name` is a display copy and may drift from the resident record;
/// the apartment number is the join key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStation {
    pub id: Uuid,
    pub apartment_number: String,
    #[serde(default)]
    pub resident_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ChargingStation {
    pub fn new(apartment_number: impl Into<String>, resident_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            apartment_number: apartment_number.into(),
            resident_name: resident_name.into(),
            label: None,
        }
    }

    pub fn apartment_key(&self) -> &str {
        apartment_key(&self.apartment_number)
    }
}

impl Identifiable for ChargingStation {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// One billing-month reading of a charging station's meter.
///
/// `total_cost` is the billed amount; [`MeterReading::computed_cost`] recomputes
/// it from the readings for display and anomaly checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MeterReading {
    pub id: Uuid,
    pub station_id: Uuid,
    #[serde(flatten)]
    pub period: BillingPeriod,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub previous_reading: f64,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub current_reading: f64,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub consumption: f64,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub price_per_kwh: f64,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub total_cost: f64,
    #[serde(default)]
    pub is_paid: bool,
}

impl MeterReading {
    /// Builds a reading and derives consumption and cost from the meter values.
    pub fn record(
        station_id: Uuid,
        period: BillingPeriod,
        previous_reading: f64,
        current_reading: f64,
        price_per_kwh: f64,
    ) -> Self {
        let consumption = current_reading - previous_reading;
        Self {
            id: Uuid::new_v4(),
            station_id,
            period,
            previous_reading,
            current_reading,
            consumption,
            price_per_kwh,
            total_cost: consumption * price_per_kwh,
            is_paid: false,
        }
    }

    pub fn paid(mut self) -> Self {
        self.is_paid = true;
        self
    }

    pub fn computed_consumption(&self) -> f64 {
        self.current_reading - self.previous_reading
    }

    pub fn computed_cost(&self) -> f64 {
        self.computed_consumption() * self.price_per_kwh
    }
}

impl Identifiable for MeterReading {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for MeterReading {
    fn amount(&self) -> f64 {
        self.total_cost
    }
}
