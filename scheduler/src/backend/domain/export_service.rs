//! Import and export of the full dataset as one versioned JSON document.
//!
//! Import writes only the collections present in the document, in the order
//! employees, shifts, schedules, stores. It is not atomic: if a later
//! collection is malformed, the ones before it stay written.

use chrono::NaiveDate;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::{Dataset, Employee, Schedule, Shift, Store, DATASET_VERSION};
use std::sync::Arc;

use crate::backend::domain::calendar::{format_date_key, parse_date_key};
use crate::backend::domain::clock::Clock;
use crate::backend::domain::entity_service::{EmployeeService, ShiftService, StoreService};
use crate::backend::domain::schedule_service::ScheduleService;
use crate::backend::storage::StorageConnection;
use crate::error::{Result, SchedulerError};

/// Counts of what an import wrote. `None` means the collection was absent
/// from the document and left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub version: Option<String>,
    pub employees: Option<usize>,
    pub shifts: Option<usize>,
    /// Number of dates
    pub schedules: Option<usize>,
    pub stores: Option<usize>,
}

#[derive(Clone)]
pub struct ExportService {
    stores: StoreService,
    employees: EmployeeService,
    shifts: ShiftService,
    schedule: ScheduleService,
    clock: Arc<dyn Clock>,
}

impl ExportService {
    pub fn new(connection: StorageConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            stores: StoreService::new(connection.clone(), Arc::clone(&clock)),
            employees: EmployeeService::new(connection.clone(), Arc::clone(&clock)),
            shifts: ShiftService::new(connection.clone(), Arc::clone(&clock)),
            schedule: ScheduleService::new(connection),
            clock,
        }
    }

    /// Snapshot every collection, stamped with the current time
    pub fn export(&self) -> Dataset {
        Dataset {
            version: DATASET_VERSION.to_string(),
            export_date: self.clock.now(),
            employees: self.employees.get_all(),
            shifts: self.shifts.get_all(),
            schedules: self.schedule.get_all(),
            stores: self.stores.get_all(),
        }
    }

    pub fn export_json(&self, pretty: bool) -> Result<String> {
        let dataset = self.export();
        info!(
            "📤 Exporting {} stores, {} employees, {} shifts, {} schedule dates",
            dataset.stores.len(),
            dataset.employees.len(),
            dataset.shifts.len(),
            dataset.schedules.len()
        );
        let json = if pretty {
            serde_json::to_string_pretty(&dataset)?
        } else {
            serde_json::to_string(&dataset)?
        };
        Ok(json)
    }

    /// Replace every collection present in `document`
    pub fn import(&self, document: &Value) -> Result<ImportSummary> {
        let Some(fields) = document.as_object() else {
            return Err(SchedulerError::invalid_document("expected a JSON object"));
        };

        let version = fields.get("version").and_then(Value::as_str).map(str::to_string);
        match version.as_deref() {
            Some(DATASET_VERSION) => {}
            Some(other) => warn!("⚠️ Importing dataset version {} (expected {})", other, DATASET_VERSION),
            None => warn!("⚠️ Importing dataset without a version"),
        }

        let mut summary = ImportSummary {
            version,
            ..ImportSummary::default()
        };

        if let Some(employees) = collection::<Vec<Employee>>(fields.get("employees"), "employees")? {
            self.employees.replace_all(&employees)?;
            summary.employees = Some(employees.len());
        }

        if let Some(shifts) = collection::<Vec<Shift>>(fields.get("shifts"), "shifts")? {
            self.shifts.replace_all(&shifts)?;
            summary.shifts = Some(shifts.len());
        }

        if let Some(schedules) = collection::<Schedule>(fields.get("schedules"), "schedules")? {
            if let Some(bad) = schedules.keys().find(|date| parse_date_key(date).is_err()) {
                return Err(SchedulerError::invalid_document(format!(
                    "schedules: invalid date key '{bad}'"
                )));
            }
            self.schedule.replace_all(&schedules)?;
            summary.schedules = Some(schedules.len());
        }

        if let Some(stores) = collection::<Vec<Store>>(fields.get("stores"), "stores")? {
            self.stores.replace_all(&stores)?;
            summary.stores = Some(stores.len());
        }

        info!("📥 Import finished: {:?}", summary);
        Ok(summary)
    }

    pub fn import_json(&self, text: &str) -> Result<ImportSummary> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| SchedulerError::invalid_document(format!("not valid JSON: {e}")))?;
        self.import(&document)
    }
}

/// Interpret one optional collection of the document. JSON `null` counts as absent.
fn collection<T: DeserializeOwned>(value: Option<&Value>, name: &str) -> Result<Option<T>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| SchedulerError::invalid_document(format!("{name}: {e}"))),
    }
}

/// File name offered when saving an export made on `date`
pub fn suggested_file_name(date: NaiveDate) -> String {
    format!("coffee-shop-schedule-{}.json", format_date_key(date))
}
