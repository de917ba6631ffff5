//! # File Storage
//!
//! Persists each key as its own JSON file inside the data directory, next to
//! the YAML configuration file.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── config.yaml
//! ├── coffee_shop_employees.json
//! ├── coffee_shop_shifts.json
//! ├── coffee_shop_schedules.json
//! ├── coffee_shop_stores.json
//! ├── coffee_shop_initialized.json
//! └── coffee_shop_backup_data.json
//! ```

pub mod config_repository;
pub mod file_store;

pub use config_repository::{ConfigRepository, SchedulerConfig};
pub use file_store::FileStore;
