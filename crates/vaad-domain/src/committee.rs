//! Committee-level income and expense ledgers plus global settings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Free-form income recorded by the committee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeIncome {
    pub id: Uuid,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_paid: bool,
}

impl CommitteeIncome {
    pub fn new(category: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: String::new(),
            category: category.into(),
            amount,
            date,
            is_paid: false,
        }
    }

    pub fn paid(mut self) -> Self {
        self.is_paid = true;
        self
    }
}

impl Identifiable for CommitteeIncome {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for CommitteeIncome {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Categorized for CommitteeIncome {
    fn category(&self) -> &str {
        &self.category
    }
}

/// An expense paid by the committee. Expenses carry no paid/unpaid state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeExpense {
    pub id: Uuid,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub amount: f64,
    pub date: NaiveDate,
}

impl CommitteeExpense {
    pub fn new(category: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: String::new(),
            category: category.into(),
            amount,
            date,
        }
    }
}

impl Identifiable for CommitteeExpense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for CommitteeExpense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Categorized for CommitteeExpense {
    fn category(&self) -> &str {
        &self.category
    }
}

/// Committee-wide settings document.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Opening balance applied once at the base of the cumulative balance.
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub personal_balance: f64,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub kwh_price: f64,
}
