//! Domain layer: the services that implement the scheduling operations on
//! top of the storage repositories.

pub mod backup_service;
pub mod calendar;
pub mod clock;
pub mod entity_service;
pub mod export_service;
pub mod models;
pub mod schedule_service;
pub mod seed_service;

pub use backup_service::{BackupService, ReconcileOutcome, SnapshotHandle};
pub use calendar::ScheduleView;
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;
pub use entity_service::{EmployeeService, EntityService, ShiftService, StoreService};
pub use export_service::{suggested_file_name, ExportService, ImportSummary};
pub use schedule_service::ScheduleService;
pub use seed_service::{SeedOutcome, SeedService};
