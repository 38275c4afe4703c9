//! Periodic maintenance tasks and their fixed day-count recurrence.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;

/// Tasks due within this many days (or overdue) are flagged as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Enumerates maintenance cadences.
pub enum MaintenanceFrequency {
    Weekly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl MaintenanceFrequency {
    /// Fixed day count between performances.
    ///
    /// Months are approximated as 30 days; stored due dates depend on it.
    pub fn days(self) -> i64 {
        match self {
            MaintenanceFrequency::Weekly => 7,
            MaintenanceFrequency::Monthly => 30,
            MaintenanceFrequency::Quarterly => 90,
            MaintenanceFrequency::SemiAnnual => 180,
            MaintenanceFrequency::Annual => 365,
        }
    }

    pub fn next_due_from(self, performed: NaiveDate) -> NaiveDate {
        performed + Duration::days(self.days())
    }
}

impl fmt::Display for MaintenanceFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MaintenanceFrequency::Weekly => "Weekly",
            MaintenanceFrequency::Monthly => "Monthly",
            MaintenanceFrequency::Quarterly => "Quarterly",
            MaintenanceFrequency::SemiAnnual => "Semi-annual",
            MaintenanceFrequency::Annual => "Annual",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodicMaintenance {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: MaintenanceFrequency,
    pub next_due: NaiveDate,
    #[serde(default)]
    pub last_performed: Option<NaiveDate>,
    #[serde(default = "PeriodicMaintenance::default_active")]
    pub is_active: bool,
}

impl PeriodicMaintenance {
    pub fn new(title: impl Into<String>, frequency: MaintenanceFrequency, next_due: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            frequency,
            next_due,
            last_performed: None,
            is_active: true,
        }
    }

    fn default_active() -> bool {
        true
    }

    /// Records a performance on `now` and schedules the next one.
    pub fn mark_performed(&mut self, now: NaiveDate) {
        self.last_performed = Some(now);
        self.next_due = self.frequency.next_due_from(now);
    }

    /// Signed day count until the task is due; negative when overdue.
    pub fn days_until_due(&self, now: NaiveDate) -> i64 {
        (self.next_due - now).num_days()
    }

    pub fn is_upcoming(&self, now: NaiveDate) -> bool {
        self.is_active && self.days_until_due(now) <= UPCOMING_WINDOW_DAYS
    }
}

impl Identifiable for PeriodicMaintenance {
    fn id(&self) -> Uuid {
        self.id
    }
}
