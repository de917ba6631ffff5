//! CLI argument definitions for the shift scheduler.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shift scheduling for a chain of stores, kept in a local data directory.
///
/// Every command first reconciles with the backup snapshot and seeds the
/// default catalogs if they are empty. Results are printed as JSON.
#[derive(Parser, Debug)]
#[command(name = "shift-scheduler")]
#[command(author, version, about = "Multi-store employee shift scheduling", long_about = None)]
pub struct Cli {
    /// Data directory. Defaults to <platform data dir>/shift-scheduler.
    #[arg(short = 'd', long = "data-dir", global = true, env = "SHIFT_SCHEDULER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile with the backup, seed defaults if empty, and print collection sizes
    Init,

    /// List one catalog
    List {
        #[arg(value_enum)]
        kind: CatalogKind,
    },

    /// Store management
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },

    /// Employee management
    Employee {
        #[command(subcommand)]
        command: EmployeeCommands,
    },

    /// Shift definitions
    Shift {
        #[command(subcommand)]
        command: ShiftCommands,
    },

    /// Daily and weekly assignments
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },

    /// Export the full dataset as JSON
    Export {
        /// File or directory to write to. Prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace collections with those present in an exported JSON file
    Import {
        file: PathBuf,
    },

    /// Reconcile with the backup snapshot, then write a fresh one
    Backup,

    /// Write a backup snapshot on the configured interval until Ctrl-C
    Watch,

    /// Delete all data, including the backup, and seed the defaults again
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogKind {
    Stores,
    Employees,
    Shifts,
}

#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// Add a store
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Update a store. Omitted optional fields keep their current value.
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a store. Its schedule entries are kept.
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommands {
    /// Add an employee
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "咖啡师")]
        position: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Display color, e.g. "#3498db"
        #[arg(long)]
        color: Option<String>,
    },
    /// Update an employee. Omitted optional fields keep their current value.
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an employee
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShiftCommands {
    /// Add a shift definition
    Add {
        #[arg(long)]
        name: String,
        /// Start time, HH:MM
        #[arg(long)]
        start: String,
        /// End time, HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Update a shift definition
    Update {
        id: String,
        #[arg(long)]
        name: String,
        /// Start time, HH:MM
        #[arg(long)]
        start: String,
        /// End time, HH:MM
        #[arg(long)]
        end: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a shift definition. Assignments using it are hidden, not deleted.
    Remove {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// Assignments on one day
    Show {
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Store id, or "all"
        #[arg(long, default_value = "all")]
        store: String,
    },
    /// Assignments for the Monday-based week containing a date
    Week {
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Store id, or "all"
        #[arg(long, default_value = "all")]
        store: String,
    },
    /// Assign an employee to a shift at a store
    Assign {
        #[arg(long)]
        date: String,
        #[arg(long)]
        store: String,
        #[arg(long)]
        shift: String,
        #[arg(long)]
        employee: String,
        #[arg(long)]
        status: Option<String>,
    },
    /// Change fields of one assignment
    Update {
        #[arg(long)]
        date: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        store: Option<String>,
        #[arg(long)]
        shift: Option<String>,
        #[arg(long)]
        employee: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Remove one assignment
    Remove {
        #[arg(long)]
        date: String,
        #[arg(long)]
        id: String,
    },
}
