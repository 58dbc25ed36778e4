//! Debounced dual persistence.
//!
//! The bridge is a `ChangeSink` hanging off the canvas controller.
//! Every layout change:
//!
//! 1. writes the local cache synchronously and unconditionally, then
//! 2. (re)starts an 800 ms debounce; only the final change in a quiet
//!    period reaches the remote store, so a drag gesture collapses into
//!    one network round-trip.
//!
//! Remote writes are idempotent full snapshots — overlapping or
//! reordered flushes converge, so in-flight writes are never awaited or
//! cancelled. The pending debounce task IS cancelled when the bridge is
//! dropped (navigating away must not write after the canvas is gone).
//! Remote failures never reach the mutation path: they are logged and
//! surfaced on a non-blocking notification channel.
//!
//! The debounce timer is spawned on the ambient tokio runtime, so the
//! bridge must live inside one.

use crate::cache::LocalCache;
use crate::error::StoreError;
use crate::remote::RemoteStore;
use crate::session::SessionProvider;
use sf_core::tree::Layout;
use sf_core::wire::ProjectSnapshot;
use sf_editor::ChangeSink;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Default quiet period before a remote write.
pub const DEBOUNCE: Duration = Duration::from_millis(800);

/// Non-blocking background save outcomes, for toast/banner surfaces.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreNotification {
    Saved { project_id: String },
    SaveFailed { project_id: String, message: String },
    SaveSkipped { project_id: String },
}

struct BridgeShared {
    project_id: String,
    project_name: String,
    cache: Arc<dyn LocalCache>,
    remote: Arc<dyn RemoteStore>,
    session: Arc<dyn SessionProvider>,
    pending: Mutex<Option<ProjectSnapshot>>,
    notifications: mpsc::UnboundedSender<StoreNotification>,
}

impl BridgeShared {
    fn notify(&self, notification: StoreNotification) {
        // Receiver may be gone; background saves never block on that.
        let _ = self.notifications.send(notification);
    }

    async fn flush(&self) {
        let snapshot = match self.pending.lock() {
            Ok(mut pending) => pending.take(),
            Err(_) => None,
        };
        let Some(snapshot) = snapshot else {
            return;
        };

        if self.session.current_session().is_none() {
            log::debug!("no session; {} stays cache-only", self.project_id);
            self.notify(StoreNotification::SaveSkipped {
                project_id: self.project_id.clone(),
            });
            return;
        }

        let layout = Layout::from_components(snapshot.layout.clone());
        let result = self.write_remote(&snapshot, &layout).await;
        match result {
            Ok(()) => {
                self.notify(StoreNotification::Saved {
                    project_id: self.project_id.clone(),
                });
            }
            Err(err) => {
                // The tree and cache are untouched by a remote failure.
                log::warn!("autosave failed for {}: {err}", self.project_id);
                self.notify(StoreNotification::SaveFailed {
                    project_id: self.project_id.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    async fn write_remote(
        &self,
        snapshot: &ProjectSnapshot,
        layout: &Layout,
    ) -> Result<(), StoreError> {
        // Canonical row sync first, then the compatibility blob that
        // fallback reads use.
        self.remote
            .sync_components(&self.project_id, layout)
            .await?;
        self.remote
            .replace_layout(&self.project_id, &snapshot.layout)
            .await
    }
}

/// Debounced cache + remote writer. One per open project.
pub struct PersistenceBridge {
    shared: Arc<BridgeShared>,
    debounce: Duration,
    timer: Option<JoinHandle<()>>,
}

impl PersistenceBridge {
    /// Returns the bridge plus the receiver for save notifications.
    pub fn new(
        project_id: impl Into<String>,
        project_name: impl Into<String>,
        cache: Arc<dyn LocalCache>,
        remote: Arc<dyn RemoteStore>,
        session: Arc<dyn SessionProvider>,
    ) -> (Self, mpsc::UnboundedReceiver<StoreNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bridge = Self {
            shared: Arc::new(BridgeShared {
                project_id: project_id.into(),
                project_name: project_name.into(),
                cache,
                remote,
                session,
                pending: Mutex::new(None),
                notifications: tx,
            }),
            debounce: DEBOUNCE,
            timer: None,
        };
        (bridge, rx)
    }

    /// Override the debounce window (tests shrink it).
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Load the project: remote first, local cache as fallback when the
    /// remote is unavailable or the project is missing there.
    pub async fn load(
        remote: &dyn RemoteStore,
        cache: &dyn LocalCache,
        project_id: &str,
    ) -> Result<ProjectSnapshot, StoreError> {
        match remote.load_project(project_id).await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                log::warn!("remote load failed for {project_id}: {err}; trying cache");
                cache
                    .read_snapshot(project_id)
                    .ok_or(err)
            }
        }
    }

    /// Flush any pending write immediately, bypassing the debounce.
    /// Used on explicit "save now" and before navigation.
    pub async fn flush_now(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.shared.flush().await;
    }

    fn restart_timer(&mut self) {
        // Every mutation restarts the quiet period.
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        let shared = Arc::clone(&self.shared);
        let debounce = self.debounce;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            shared.flush().await;
        }));
    }
}

impl ChangeSink for PersistenceBridge {
    fn layout_changed(&mut self, layout: &Layout) {
        let snapshot = ProjectSnapshot {
            id: self.shared.project_id.clone(),
            name: self.shared.project_name.clone(),
            layout: layout.components.clone(),
        };

        // Cache write: synchronous, unconditional, never skipped.
        self.shared.cache.write_snapshot(&snapshot);

        if let Ok(mut pending) = self.shared.pending.lock() {
            *pending = Some(snapshot);
        }
        self.restart_timer();
    }
}

impl Drop for PersistenceBridge {
    fn drop(&mut self) {
        // Canvas unmount must not autosave after its lifetime ends.
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
