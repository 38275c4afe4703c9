//! Services related to periodic maintenance scheduling.

use std::fmt;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;
use vaad_domain::{PeriodicMaintenance, UPCOMING_WINDOW_DAYS};

use crate::{CoreError, LedgerReader};

/// Where a task stands relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceStatus {
    Inactive,
    Overdue { days: i64 },
    DueSoon { days: i64 },
    Scheduled { days: i64 },
}

impl MaintenanceStatus {
    /// Matches [`PeriodicMaintenance::is_upcoming`].
    pub fn is_upcoming(&self) -> bool {
        matches!(
            self,
            MaintenanceStatus::Overdue { .. } | MaintenanceStatus::DueSoon { .. }
        )
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceStatus::Inactive => f.write_str("Inactive"),
            MaintenanceStatus::Overdue { days } => write!(f, "Overdue by {days} days"),
            MaintenanceStatus::DueSoon { days: 0 } => f.write_str("Due today"),
            MaintenanceStatus::DueSoon { days } => write!(f, "Due in {days} days"),
            MaintenanceStatus::Scheduled { days } => write!(f, "Scheduled in {days} days"),
        }
    }
}

/// A task paired with its derived scheduling signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceView {
    pub task: PeriodicMaintenance,
    pub status: MaintenanceStatus,
    pub is_upcoming: bool,
}

/// Provides helpers for reading and advancing maintenance schedules.
pub struct MaintenanceService;

impl MaintenanceService {
    /// Loads every task with its status, ordered by due date.
    pub fn list(
        reader: &dyn LedgerReader,
        now: NaiveDate,
    ) -> Result<Vec<MaintenanceView>, CoreError> {
        let mut tasks = reader.maintenance_tasks()?;
        tasks.sort_by(|a, b| a.next_due.cmp(&b.next_due).then_with(|| a.title.cmp(&b.title)));
        Ok(tasks
            .into_iter()
            .map(|task| {
                let status = Self::status(&task, now);
                MaintenanceView {
                    is_upcoming: task.is_upcoming(now),
                    status,
                    task,
                }
            })
            .collect())
    }

    /// Records that the task was performed on `now` and returns the updated task.
    pub fn mark_as_performed(
        tasks: &mut [PeriodicMaintenance],
        id: Uuid,
        now: NaiveDate,
    ) -> Result<&PeriodicMaintenance, CoreError> {
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(CoreError::TaskNotFound(id))?;
        task.mark_performed(now);
        info!(task = %task.id, next_due = %task.next_due, "maintenance performed");
        Ok(&*task)
    }

    /// Toggles the active flag. The due date is left untouched.
    pub fn set_active(
        tasks: &mut [PeriodicMaintenance],
        id: Uuid,
        active: bool,
    ) -> Result<bool, CoreError> {
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(CoreError::TaskNotFound(id))?;
        let changed = task.is_active != active;
        task.is_active = active;
        Ok(changed)
    }

    pub fn status(task: &PeriodicMaintenance, now: NaiveDate) -> MaintenanceStatus {
        if !task.is_active {
            return MaintenanceStatus::Inactive;
        }
        let days = task.days_until_due(now);
        if days < 0 {
            MaintenanceStatus::Overdue { days: -days }
        } else if days <= UPCOMING_WINDOW_DAYS {
            MaintenanceStatus::DueSoon { days }
        } else {
            MaintenanceStatus::Scheduled { days }
        }
    }

    /// Active tasks due within the alert window (including overdue), soonest first.
    pub fn upcoming<'a>(
        tasks: &'a [PeriodicMaintenance],
        now: NaiveDate,
    ) -> Vec<&'a PeriodicMaintenance> {
        let mut upcoming: Vec<&PeriodicMaintenance> =
            tasks.iter().filter(|task| task.is_upcoming(now)).collect();
        upcoming.sort_by_key(|task| task.next_due);
        upcoming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaad_domain::MaintenanceFrequency;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_task_advances_seven_days() {
        let mut tasks = vec![PeriodicMaintenance::new(
            "Stairwell cleaning",
            MaintenanceFrequency::Weekly,
            date(2023, 12, 30),
        )];
        let id = tasks[0].id;
        let task = MaintenanceService::mark_as_performed(&mut tasks, id, date(2024, 1, 1)).unwrap();
        assert_eq!(task.next_due, date(2024, 1, 8));
        assert_eq!(task.last_performed, Some(date(2024, 1, 1)));
    }

    #[test]
    fn unknown_task_is_an_error() {
        let mut tasks: Vec<PeriodicMaintenance> = Vec::new();
        let id = Uuid::new_v4();
        let err = MaintenanceService::mark_as_performed(&mut tasks, id, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, CoreError::TaskNotFound(found) if found == id));
    }

    #[test]
    fn deactivating_keeps_due_date() {
        let mut tasks = vec![PeriodicMaintenance::new(
            "Fire extinguishers",
            MaintenanceFrequency::Annual,
            date(2024, 6, 1),
        )];
        let id = tasks[0].id;
        assert!(MaintenanceService::set_active(&mut tasks, id, false).unwrap());
        assert_eq!(tasks[0].next_due, date(2024, 6, 1));
        assert!(!MaintenanceService::set_active(&mut tasks, id, false).unwrap());
        assert_eq!(
            MaintenanceService::status(&tasks[0], date(2024, 5, 20)),
            MaintenanceStatus::Inactive
        );
        assert!(!tasks[0].is_upcoming(date(2024, 5, 20)));
    }

    #[test]
    fn status_boundaries_follow_thirty_day_window() {
        let task = PeriodicMaintenance::new("Pump", MaintenanceFrequency::Monthly, date(2024, 3, 31));
        assert_eq!(
            MaintenanceService::status(&task, date(2024, 3, 1)),
            MaintenanceStatus::DueSoon { days: 30 }
        );
        assert_eq!(
            MaintenanceService::status(&task, date(2024, 2, 29)),
            MaintenanceStatus::Scheduled { days: 31 }
        );
        assert_eq!(
            MaintenanceService::status(&task, date(2024, 4, 2)),
            MaintenanceStatus::Overdue { days: 2 }
        );
    }

    #[test]
    fn upcoming_is_sorted_and_skips_inactive() {
        let mut late = PeriodicMaintenance::new("Roof", MaintenanceFrequency::Annual, date(2024, 1, 20));
        let soon = PeriodicMaintenance::new("Gate", MaintenanceFrequency::Monthly, date(2024, 1, 5));
        let far = PeriodicMaintenance::new("Paint", MaintenanceFrequency::Annual, date(2024, 9, 1));
        let overdue = PeriodicMaintenance::new("Drain", MaintenanceFrequency::Quarterly, date(2023, 12, 1));
        let tasks = vec![late.clone(), soon, far, overdue];
        let titles: Vec<&str> = MaintenanceService::upcoming(&tasks, date(2024, 1, 1))
            .into_iter()
            .map(|task| task.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Drain", "Gate", "Roof"]);

        late.is_active = false;
        assert!(!late.is_upcoming(date(2024, 1, 1)));
    }
}
