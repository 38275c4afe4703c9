//! Resident obligations: monthly committee fees and ad-hoc pending payments.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A monthly committee fee obligation for one resident.
///
/// `period` is the month the fee is for; `payment_date` is when it was
/// actually paid, which may be a different calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeePayment {
    pub id: Uuid,
    pub resident_id: Uuid,
    #[serde(flatten)]
    pub period: BillingPeriod,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub amount: f64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

impl FeePayment {
    pub fn unpaid(resident_id: Uuid, period: BillingPeriod, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            resident_id,
            period,
            amount,
            is_paid: false,
            payment_date: None,
        }
    }

    pub fn mark_paid(&mut self, payment_date: NaiveDate) {
        self.is_paid = true;
        self.payment_date = Some(payment_date);
    }

    pub fn paid_on(mut self, payment_date: NaiveDate) -> Self {
        self.mark_paid(payment_date);
        self
    }
}

impl Identifiable for FeePayment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for FeePayment {
    fn amount(&self) -> f64 {
        self.amount
    }
}

/// An ad-hoc obligation charged to a resident, with an explicit paid flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingPayment {
    pub id: Uuid,
    pub resident_id: Uuid,
    #[serde(default)]
    pub description: String,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_paid: bool,
}

impl PendingPayment {
    pub fn new(resident_id: Uuid, description: impl Into<String>, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            resident_id,
            description: description.into(),
            amount,
            due_date: None,
            is_paid: false,
        }
    }

    pub fn due_on(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

impl Identifiable for PendingPayment {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for PendingPayment {
    fn amount(&self) -> f64 {
        self.amount
    }
}
