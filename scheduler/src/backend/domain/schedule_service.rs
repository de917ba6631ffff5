//! The date-indexed schedule: per-date and per-store queries over the
//! schedule mapping, and mutation of single entries.
//!
//! The whole mapping is read, modified and written back on every mutation.
//! Entry references are not checked against the catalogs; readers that join
//! entries with their shift and employee skip the ones that dangle.

use chrono::NaiveDate;
use log::{debug, info, warn};
use shared::{Assignment, Employee, Schedule, ScheduleEntry, Shift, Store, StoreFilter};
use std::collections::HashMap;

use crate::backend::domain::calendar::{format_date_key, parse_date_key};
use crate::backend::domain::models::{generate_id, NewScheduleEntry, ScheduleEntryPatch};
use crate::backend::storage::{
    CollectionRepository, CollectionStorage, ScheduleRepository, ScheduleStorage, StorageConnection,
};
use crate::error::Result;

#[derive(Clone)]
pub struct ScheduleService {
    schedule_repository: ScheduleRepository,
    store_repository: CollectionRepository<Store>,
    employee_repository: CollectionRepository<Employee>,
    shift_repository: CollectionRepository<Shift>,
}

impl ScheduleService {
    pub fn new(connection: StorageConnection) -> Self {
        Self {
            schedule_repository: ScheduleRepository::new(connection.clone()),
            store_repository: CollectionRepository::new(connection.clone()),
            employee_repository: CollectionRepository::new(connection.clone()),
            shift_repository: CollectionRepository::new(connection),
        }
    }

    /// The whole mapping, dates ascending
    pub fn get_all(&self) -> Schedule {
        self.schedule_repository.load()
    }

    /// Entries on `date` in insertion order; empty if there are none
    pub fn get_by_date(&self, date: &str) -> Vec<ScheduleEntry> {
        let mut schedule = self.schedule_repository.load();
        let entries = schedule.remove(date).unwrap_or_default();
        debug!("Found {} schedule entries on {}", entries.len(), date);
        entries
    }

    pub fn get_by_date_and_store(&self, date: &str, filter: &StoreFilter) -> Vec<ScheduleEntry> {
        self.get_by_date(date)
            .into_iter()
            .filter(|entry| filter.matches(&entry.store_id))
            .collect()
    }

    /// Entries for every date in `start..=end` that has any
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Schedule {
        if start > end {
            return Schedule::new();
        }
        let (start_key, end_key) = (format_date_key(start), format_date_key(end));
        self.schedule_repository
            .load()
            .range(start_key..=end_key)
            .map(|(date, entries)| (date.clone(), entries.clone()))
            .collect()
    }

    /// Entries on `date` joined with their shift, employee and store.
    /// Entries whose shift or employee no longer exists are left out.
    pub fn get_assignments(&self, date: &str, filter: &StoreFilter) -> Vec<Assignment> {
        let entries = self.get_by_date_and_store(date, filter);
        if entries.is_empty() {
            return Vec::new();
        }

        let shifts: HashMap<String, Shift> = self
            .shift_repository
            .list()
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();
        let employees: HashMap<String, Employee> = self
            .employee_repository
            .list()
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();
        let stores: HashMap<String, Store> = self
            .store_repository
            .list()
            .into_iter()
            .map(|s| (s.id.clone(), s))
            .collect();

        entries
            .into_iter()
            .filter_map(|entry| {
                let (Some(shift), Some(employee)) =
                    (shifts.get(&entry.shift_id), employees.get(&entry.employee_id))
                else {
                    debug!("Skipping entry {} with dangling reference", entry.id);
                    return None;
                };
                Some(Assignment {
                    date: date.to_string(),
                    shift: shift.clone(),
                    employee: employee.clone(),
                    store: stores.get(&entry.store_id).cloned(),
                    entry,
                })
            })
            .collect()
    }

    /// Append a new entry to `date` under a fresh id
    pub fn add_entry(&self, date: &str, new_entry: NewScheduleEntry) -> Result<ScheduleEntry> {
        parse_date_key(date)?;
        new_entry.validate()?;

        let entry = new_entry.into_entry(generate_id());
        let mut schedule = self.schedule_repository.load();
        schedule.entry(date.to_string()).or_default().push(entry.clone());
        self.schedule_repository.save(&schedule)?;

        info!(
            "Assigned employee {} to shift {} at {} on {} (entry {})",
            entry.employee_id, entry.shift_id, entry.store_id, date, entry.id
        );
        Ok(entry)
    }

    /// Remove one entry. Returns false, writing nothing, if the date or id is unknown.
    pub fn delete_entry(&self, date: &str, entry_id: &str) -> Result<bool> {
        parse_date_key(date)?;

        let mut schedule = self.schedule_repository.load();
        let Some(entries) = schedule.get_mut(date) else {
            warn!("Cannot delete entry {}: no schedule on {}", entry_id, date);
            return Ok(false);
        };

        let before = entries.len();
        entries.retain(|entry| entry.id != entry_id);
        if entries.len() == before {
            warn!("Cannot delete entry {}: not found on {}", entry_id, date);
            return Ok(false);
        }
        if entries.is_empty() {
            schedule.remove(date);
        }

        self.schedule_repository.save(&schedule)?;
        info!("Removed schedule entry {} from {}", entry_id, date);
        Ok(true)
    }

    /// Merge `patch` into one entry. Returns false if the date or id is unknown.
    pub fn update_entry(&self, date: &str, entry_id: &str, patch: ScheduleEntryPatch) -> Result<bool> {
        parse_date_key(date)?;
        patch.validate()?;

        let mut schedule = self.schedule_repository.load();
        let Some(entry) = schedule
            .get_mut(date)
            .and_then(|entries| entries.iter_mut().find(|entry| entry.id == entry_id))
        else {
            warn!("Cannot update entry {}: not found on {}", entry_id, date);
            return Ok(false);
        };

        patch.apply(entry);
        self.schedule_repository.save(&schedule)?;
        info!("Updated schedule entry {} on {}", entry_id, date);
        Ok(true)
    }

    /// Overwrite the whole mapping, used by import
    pub fn replace_all(&self, schedule: &Schedule) -> Result<()> {
        self.schedule_repository.save(schedule)?;
        info!("Replaced schedule with {} dates", schedule.len());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.schedule_repository.clear()?;
        Ok(())
    }
}
