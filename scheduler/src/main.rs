use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;
use serde_json::json;
use shared::StoreFilter;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use shift_scheduler::backend::domain::calendar::{format_date_key, parse_date_key};
use shift_scheduler::backend::domain::models::{
    EmployeeDraft, NewScheduleEntry, ScheduleEntryPatch, ShiftDraft, StoreDraft,
};
use shift_scheduler::backend::domain::{suggested_file_name, Clock, ScheduleView, SystemClock};
use shift_scheduler::backend::storage::{ConfigRepository, StorageConnection};
use shift_scheduler::Backend;

mod cli;

use cli::{
    CatalogKind, Cli, Commands, EmployeeCommands, ScheduleCommands, ShiftCommands, StoreCommands,
};

const APP_DIR_NAME: &str = "shift-scheduler";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(cli.data_dir)?;
    let config = ConfigRepository::new(&data_dir).load_or_create()?;
    let connection = StorageConnection::open_directory(
        &data_dir,
        config.storage_keys(),
        config.storage_quota_bytes,
    )
    .with_context(|| format!("Failed to open data directory {:?}", data_dir))?;

    let clock = Arc::new(SystemClock);
    let backend = Backend::new(connection, clock.clone());
    let report = backend.initialize()?;

    match cli.command {
        Commands::Init => print_json(&json!({
            "dataDir": data_dir,
            "initialize": report,
            "stores": backend.stores().count(),
            "employees": backend.employees().count(),
            "shifts": backend.shifts().count(),
            "scheduleDates": backend.schedule().get_all().len(),
        })),

        Commands::List { kind } => match kind {
            CatalogKind::Stores => print_json(&backend.stores().get_all()),
            CatalogKind::Employees => print_json(&backend.employees().get_all()),
            CatalogKind::Shifts => {
                let shifts: Vec<_> = backend
                    .shifts()
                    .get_all()
                    .into_iter()
                    .map(|shift| {
                        let duration = shift.duration().map(|d| d.to_string());
                        json!({ "shift": shift, "duration": duration })
                    })
                    .collect();
                print_json(&shifts)
            }
        },

        Commands::Store { command } => match command {
            StoreCommands::Add { name, address, phone } => {
                let store = backend.stores().add(StoreDraft { name, address, phone })?;
                print_json(&store)
            }
            StoreCommands::Update {
                id,
                name,
                address,
                phone,
            } => {
                let updated = backend
                    .stores()
                    .update(&id, StoreDraft { name, address, phone })?;
                print_json(&json!({ "updated": updated }))
            }
            StoreCommands::Remove { id } => {
                let deleted = backend.stores().delete(&id)?;
                print_json(&json!({ "deleted": deleted }))
            }
        },

        Commands::Employee { command } => match command {
            EmployeeCommands::Add {
                name,
                position,
                phone,
                email,
                color,
            } => {
                let employee = backend.employees().add(EmployeeDraft {
                    name,
                    position,
                    phone,
                    email,
                    color,
                })?;
                print_json(&employee)
            }
            EmployeeCommands::Update {
                id,
                name,
                position,
                phone,
                email,
                color,
            } => {
                let Some(existing) = backend.employees().get_by_id(&id) else {
                    return print_json(&json!({ "updated": null }));
                };
                let updated = backend.employees().update(
                    &id,
                    EmployeeDraft {
                        name,
                        position: position.unwrap_or(existing.position),
                        phone,
                        email,
                        color,
                    },
                )?;
                print_json(&json!({ "updated": updated }))
            }
            EmployeeCommands::Remove { id } => {
                let deleted = backend.employees().delete(&id)?;
                print_json(&json!({ "deleted": deleted }))
            }
        },

        Commands::Shift { command } => match command {
            ShiftCommands::Add { name, start, end, color } => {
                let shift = backend.shifts().add(ShiftDraft {
                    name,
                    start_time: start,
                    end_time: end,
                    color,
                })?;
                print_json(&shift)
            }
            ShiftCommands::Update {
                id,
                name,
                start,
                end,
                color,
            } => {
                let updated = backend.shifts().update(
                    &id,
                    ShiftDraft {
                        name,
                        start_time: start,
                        end_time: end,
                        color,
                    },
                )?;
                print_json(&json!({ "updated": updated }))
            }
            ShiftCommands::Remove { id } => {
                let deleted = backend.shifts().delete(&id)?;
                print_json(&json!({ "deleted": deleted }))
            }
        },

        Commands::Schedule { command } => run_schedule(&backend, clock.as_ref(), command),

        Commands::Export { output } => {
            let json = backend.exporter().export_json(true)?;
            match output {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(suggested_file_name(clock.today()))
                    } else {
                        path
                    };
                    fs::write(&path, json)
                        .with_context(|| format!("Failed to write export to {:?}", path))?;
                    info!("📤 Exported dataset to {:?}", path);
                    print_json(&json!({ "written": path }))
                }
                None => {
                    println!("{json}");
                    Ok(())
                }
            }
        }

        Commands::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file {:?}", file))?;
            let summary = backend.exporter().import_json(&text)?;
            print_json(&summary)
        }

        Commands::Backup => {
            let reconcile = backend.backup().reconcile()?;
            let snapshot = backend.backup().snapshot()?;
            print_json(&json!({
                "reconcile": reconcile,
                "snapshotDate": snapshot.export_date,
            }))
        }

        Commands::Watch => {
            let handle = backend.backup().spawn_periodic(config.backup_interval());
            info!("Press Ctrl-C to stop");
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl-C")?;
            handle.stop().await;
            Ok(())
        }

        Commands::Reset => {
            let outcome = backend.reset()?;
            print_json(&outcome)
        }
    }
}

fn run_schedule(backend: &Backend, clock: &dyn Clock, command: ScheduleCommands) -> Result<()> {
    match command {
        ScheduleCommands::Show { date, store } => {
            let date = match date {
                Some(date) => format_date_key(parse_date_key(&date)?),
                None => format_date_key(clock.today()),
            };
            let filter = StoreFilter::from(store.as_str());
            print_json(&json!({
                "date": date,
                "store": filter,
                "assignments": backend.schedule().get_assignments(&date, &filter),
            }))
        }

        ScheduleCommands::Week { date, store } => {
            let anchor = match date {
                Some(date) => parse_date_key(&date)?,
                None => clock.today(),
            };
            let mut view = ScheduleView::new(anchor);
            view.switch_store(StoreFilter::from(store.as_str()));

            let days: BTreeMap<String, _> = view
                .dates()
                .into_iter()
                .map(|day| {
                    let key = format_date_key(day);
                    let assignments = backend.schedule().get_assignments(&key, &view.store_filter);
                    (key, assignments)
                })
                .collect();
            print_json(&json!({ "view": view, "days": days }))
        }

        ScheduleCommands::Assign {
            date,
            store,
            shift,
            employee,
            status,
        } => {
            let entry = backend.schedule().add_entry(
                &date,
                NewScheduleEntry {
                    store_id: store,
                    shift_id: shift,
                    employee_id: employee,
                    status,
                },
            )?;
            print_json(&entry)
        }

        ScheduleCommands::Update {
            date,
            id,
            store,
            shift,
            employee,
            status,
        } => {
            let patch = ScheduleEntryPatch {
                store_id: store,
                shift_id: shift,
                employee_id: employee,
                status,
            };
            let updated = backend.schedule().update_entry(&date, &id, patch)?;
            print_json(&json!({ "updated": updated }))
        }

        ScheduleCommands::Remove { date, id } => {
            let deleted = backend.schedule().delete_entry(&date, &id)?;
            print_json(&json!({ "deleted": deleted }))
        }
    }
}

/// --data-dir / SHIFT_SCHEDULER_DATA_DIR, else the platform data directory
fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    let base = dirs::data_dir().context("Could not determine the platform data directory")?;
    Ok(base.join(APP_DIR_NAME))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
