//! Residents of the building and the apartment-number join key.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A resident billed by the committee.
///
/// Residents are never deleted; they are soft-disabled through `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: Uuid,
    pub name: String,
    pub apartment_number: String,
    #[serde(default = "amount::missing", deserialize_with = "amount::deserialize")]
    pub monthly_fee: f64,
    #[serde(default = "Resident::default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Resident {
    pub fn new(name: impl Into<String>, apartment_number: impl Into<String>, monthly_fee: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            apartment_number: apartment_number.into(),
            monthly_fee,
            is_active: true,
            phone: None,
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    fn default_active() -> bool {
        true
    }

    /// The apartment number as used for joins.
    pub fn apartment_key(&self) -> &str {
        apartment_key(&self.apartment_number)
    }

    /// A usable email address, if one is on file.
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

impl Identifiable for Resident {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Normalizes an apartment number for comparison.
pub fn apartment_key(raw: &str) -> &str {
    raw.trim()
}
