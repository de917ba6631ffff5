//! # Backend
//!
//! Wires every service over one shared storage connection. Callers build a
//! [`Backend`] once and reach the individual services through it.

pub mod domain;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

use log::{error, info};
use serde::Serialize;
use std::sync::Arc;

use domain::{
    BackupService, Clock, EmployeeService, ExportService, ReconcileOutcome, ScheduleService,
    SeedOutcome, SeedService, ShiftService, StoreService,
};
use storage::StorageConnection;

use crate::error::Result;

/// What [`Backend::initialize`] did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeReport {
    pub reconcile: ReconcileOutcome,
    pub seed: SeedOutcome,
}

#[derive(Clone)]
pub struct Backend {
    connection: StorageConnection,
    store_service: StoreService,
    employee_service: EmployeeService,
    shift_service: ShiftService,
    schedule_service: ScheduleService,
    seed_service: SeedService,
    export_service: ExportService,
    backup_service: BackupService,
}

impl Backend {
    pub fn new(connection: StorageConnection, clock: Arc<dyn Clock>) -> Self {
        let store_service = StoreService::new(connection.clone(), Arc::clone(&clock));
        let employee_service = EmployeeService::new(connection.clone(), Arc::clone(&clock));
        let shift_service = ShiftService::new(connection.clone(), Arc::clone(&clock));
        let schedule_service = ScheduleService::new(connection.clone());
        let seed_service = SeedService::new(connection.clone(), Arc::clone(&clock));
        let export_service = ExportService::new(connection.clone(), clock);
        let backup_service = BackupService::new(connection.clone(), export_service.clone());

        Self {
            connection,
            store_service,
            employee_service,
            shift_service,
            schedule_service,
            seed_service,
            export_service,
            backup_service,
        }
    }

    /// Load sequence: reconcile with the backup first, then seed if the catalogs are empty.
    /// A failed reconciliation is logged and reported, never fatal.
    pub fn initialize(&self) -> Result<InitializeReport> {
        info!("🚀 Initializing scheduler data in {}", self.connection.location());
        let reconcile = match self.backup_service.reconcile() {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("❌ Backup reconciliation failed, continuing with live data: {}", e);
                ReconcileOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        let seed = self.seed_service.seed_if_empty()?;
        info!("🚀 Initialized: {:?}, {:?}", reconcile, seed);
        Ok(InitializeReport { reconcile, seed })
    }

    /// Remove every collection, the init flag and the backup, then seed the defaults again
    pub fn reset(&self) -> Result<SeedOutcome> {
        self.connection.clear_all()?;
        info!("🧹 All scheduler data cleared");
        self.seed_service.seed_if_empty()
    }

    pub fn connection(&self) -> &StorageConnection {
        &self.connection
    }

    pub fn stores(&self) -> &StoreService {
        &self.store_service
    }

    pub fn employees(&self) -> &EmployeeService {
        &self.employee_service
    }

    pub fn shifts(&self) -> &ShiftService {
        &self.shift_service
    }

    pub fn schedule(&self) -> &ScheduleService {
        &self.schedule_service
    }

    pub fn seeder(&self) -> &SeedService {
        &self.seed_service
    }

    pub fn exporter(&self) -> &ExportService {
        &self.export_service
    }

    pub fn backup(&self) -> &BackupService {
        &self.backup_service
    }
}
