//! # Backup Reconciler
//!
//! Keeps a secondary copy of the exported dataset under the backup key and
//! resolves divergence between it and the live collections by comparing
//! export timestamps. The newer whole snapshot wins; there is no field-level
//! merge.
//!
//! The live side is exported at the moment of reconciliation, so the backup
//! is only adopted when its `exportDate` lies ahead of this clock.

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use shared::Dataset;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::backend::domain::export_service::ExportService;
use crate::backend::storage::{SnapshotRepository, StorageConnection, StoredSnapshot};
use crate::error::Result;

/// What a reconciliation pass did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ReconcileOutcome {
    /// No backup stored yet
    NoSnapshot,
    /// The backup could not be parsed; it is left for the next snapshot to overwrite
    SnapshotUnreadable,
    /// The backup was newer and replaced the live collections
    AdoptedSnapshot { snapshot_date: DateTime<Utc> },
    /// The live data was newer and was written to the backup
    RefreshedSnapshot,
    /// Both carried the same timestamp
    InSync,
    /// Reconciliation could not complete; live data was left as it was
    Failed { reason: String },
}

#[derive(Clone)]
pub struct BackupService {
    exporter: ExportService,
    snapshots: SnapshotRepository,
}

impl BackupService {
    pub fn new(connection: StorageConnection, exporter: ExportService) -> Self {
        Self {
            exporter,
            snapshots: SnapshotRepository::new(connection),
        }
    }

    /// Compare the live dataset with the backup and copy the newer one over the older
    pub fn reconcile(&self) -> Result<ReconcileOutcome> {
        let snapshot = match self.snapshots.load() {
            StoredSnapshot::Missing => {
                debug!("No backup snapshot to reconcile against");
                return Ok(ReconcileOutcome::NoSnapshot);
            }
            StoredSnapshot::Unreadable(reason) => {
                warn!("⚠️ Backup snapshot is unreadable, leaving it alone: {}", reason);
                return Ok(ReconcileOutcome::SnapshotUnreadable);
            }
            StoredSnapshot::Present(value) => value,
        };

        let primary = self.exporter.export();
        let snapshot_date = export_date_of(&snapshot);

        if snapshot_date > primary.export_date {
            info!(
                "🔄 Backup from {} is newer than live data ({}), restoring it",
                snapshot_date, primary.export_date
            );
            self.exporter.import(&snapshot)?;
            Ok(ReconcileOutcome::AdoptedSnapshot { snapshot_date })
        } else if primary.export_date > snapshot_date {
            debug!("Live data is newer than backup from {}, refreshing backup", snapshot_date);
            self.snapshots.save(&primary)?;
            Ok(ReconcileOutcome::RefreshedSnapshot)
        } else {
            Ok(ReconcileOutcome::InSync)
        }
    }

    /// Overwrite the backup with the current export
    pub fn snapshot(&self) -> Result<Dataset> {
        let dataset = self.exporter.export();
        self.snapshots.save(&dataset)?;
        debug!("💾 Backup snapshot written at {}", dataset.export_date);
        Ok(dataset)
    }

    /// Take a snapshot every `interval` on the current tokio runtime until the
    /// returned handle is stopped or dropped. The first snapshot happens one
    /// interval after the call. A failed snapshot is logged and the task keeps going.
    pub fn spawn_periodic(&self, interval: Duration) -> SnapshotHandle {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let service = self.clone();

        let task = tokio::spawn(async move {
            info!("💾 Periodic backup started (every {:?})", interval);
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        info!("💾 Periodic backup stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = service.snapshot() {
                            error!("❌ Periodic backup failed: {}", e);
                        }
                    }
                }
            }
        });

        SnapshotHandle {
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }
}

/// `exportDate` of a stored snapshot; absent or unparseable reads as the epoch
fn export_date_of(snapshot: &Value) -> DateTime<Utc> {
    snapshot
        .get("exportDate")
        .and_then(Value::as_str)
        .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Controls a running periodic snapshot task. Dropping the handle also stops it.
#[derive(Debug)]
pub struct SnapshotHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SnapshotHandle {
    /// Signal the task to stop and wait for it to finish
    pub async fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("⚠️ Periodic backup task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SnapshotHandle {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}
