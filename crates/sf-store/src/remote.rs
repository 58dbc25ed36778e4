//! Remote project store boundary.
//!
//! `RemoteStore` is the project CRUD + sync surface the builder talks
//! to. All write operations are idempotent full snapshots: repeating or
//! reordering them converges on the same stored state, which is what
//! makes overlapping autosaves safe without a lock.
//!
//! `MemoryStore` is the in-process implementation used by tests; it
//! also documents the expected semantics of a real backend.

use crate::error::StoreError;
use crate::sync::plan_sync;
use async_trait::async_trait;
use sf_core::ComponentId;
use sf_core::model::ComponentNode;
use sf_core::tree::Layout;
use sf_core::wire::{ComponentRow, ProjectSnapshot, rebuild_layout};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Everything needed to put a project live on a subdomain.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub project_id: String,
    pub subdomain: String,
    pub layout: Vec<ComponentNode>,
    pub pages: Vec<String>,
    pub title: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSite {
    pub url: String,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn load_project(&self, project_id: &str) -> Result<ProjectSnapshot, StoreError>;

    /// Full-snapshot JSON blob write. Compatibility/fallback path.
    async fn replace_layout(
        &self,
        project_id: &str,
        layout: &[ComponentNode],
    ) -> Result<(), StoreError>;

    /// Canonical path: flatten, diff against the stored id set, delete
    /// the missing ids, upsert the rest.
    async fn sync_components(&self, project_id: &str, layout: &Layout) -> Result<(), StoreError>;

    async fn publish(&self, request: &PublishRequest) -> Result<PublishedSite, StoreError>;

    async fn check_subdomain_available(
        &self,
        subdomain: &str,
        excluding_project: Option<&str>,
    ) -> Result<bool, StoreError>;

    async fn unpublish(&self, project_id: &str) -> Result<(), StoreError>;
}

// ─── In-memory implementation ────────────────────────────────────────────

#[derive(Default)]
struct MemoryState {
    snapshots: HashMap<String, ProjectSnapshot>,
    rows: HashMap<String, HashMap<ComponentId, ComponentRow>>,
    /// subdomain → project id
    published: HashMap<String, String>,
    replace_calls: usize,
    sync_calls: usize,
}

/// In-memory remote store for tests and offline development.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    /// When set, every write fails with this message.
    fail_writes: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, to exercise error paths.
    pub fn fail_writes_with(&self, message: &str) {
        if let Ok(mut fail) = self.fail_writes.lock() {
            *fail = Some(message.to_string());
        }
    }

    pub fn sync_calls(&self) -> usize {
        self.state.lock().map(|s| s.sync_calls).unwrap_or(0)
    }

    pub fn replace_calls(&self) -> usize {
        self.state.lock().map(|s| s.replace_calls).unwrap_or(0)
    }

    /// The rows currently stored for a project, rebuilt into a layout.
    pub fn stored_layout(&self, project_id: &str) -> Option<Layout> {
        let state = self.state.lock().ok()?;
        let rows = state.rows.get(project_id)?;
        Some(rebuild_layout(rows.values().cloned().collect()))
    }

    pub fn seed_project(&self, snapshot: ProjectSnapshot) {
        if let Ok(mut state) = self.state.lock() {
            state.snapshots.insert(snapshot.id.clone(), snapshot);
        }
    }

    fn write_gate(&self) -> Result<(), StoreError> {
        match self.fail_writes.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(message) => Err(StoreError::remote(message.clone())),
                None => Ok(()),
            },
            Err(_) => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn load_project(&self, project_id: &str) -> Result<ProjectSnapshot, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::remote("store lock poisoned"))?
            .snapshots
            .get(project_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(project_id.to_string()))
    }

    async fn replace_layout(
        &self,
        project_id: &str,
        layout: &[ComponentNode],
    ) -> Result<(), StoreError> {
        self.write_gate()?;
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::remote("store lock poisoned"))?;
        state.replace_calls += 1;
        let name = state
            .snapshots
            .get(project_id)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        state.snapshots.insert(project_id.to_string(), ProjectSnapshot {
            id: project_id.to_string(),
            name,
            layout: layout.to_vec(),
        });
        Ok(())
    }

    async fn sync_components(&self, project_id: &str, layout: &Layout) -> Result<(), StoreError> {
        self.write_gate()?;
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::remote("store lock poisoned"))?;
        state.sync_calls += 1;

        let stored = state.rows.entry(project_id.to_string()).or_default();
        let existing: HashSet<ComponentId> = stored.keys().copied().collect();
        let plan = plan_sync(layout, &existing);
        for id in plan.deletes {
            stored.remove(&id);
        }
        for row in plan.upserts {
            stored.insert(row.id, row);
        }
        Ok(())
    }

    async fn publish(&self, request: &PublishRequest) -> Result<PublishedSite, StoreError> {
        self.write_gate()?;
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::remote("store lock poisoned"))?;
        if let Some(owner) = state.published.get(&request.subdomain)
            && owner != &request.project_id
        {
            return Err(StoreError::SubdomainTaken(request.subdomain.clone()));
        }
        // Re-publishing under a new subdomain releases the old one.
        state
            .published
            .retain(|_, project| project != &request.project_id);
        state
            .published
            .insert(request.subdomain.clone(), request.project_id.clone());
        Ok(PublishedSite {
            url: format!("https://{}.siteforge.app", request.subdomain),
        })
    }

    async fn check_subdomain_available(
        &self,
        subdomain: &str,
        excluding_project: Option<&str>,
    ) -> Result<bool, StoreError> {
        let state = self
            .state
            .lock()
            .map_err(|_| StoreError::remote("store lock poisoned"))?;
        Ok(match state.published.get(subdomain) {
            None => true,
            Some(owner) => excluding_project == Some(owner.as_str()),
        })
    }

    async fn unpublish(&self, project_id: &str) -> Result<(), StoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| StoreError::remote("store lock poisoned"))?;
        state.published.retain(|_, owner| owner != project_id);
        Ok(())
    }
}
