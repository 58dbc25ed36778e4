//! Local snapshot cache.
//!
//! The cache write is synchronous and unconditional on every tree
//! mutation — it is cheap, it must never be skipped, and it is the
//! source of truth when a remote write fails or the session ends before
//! the debounce fires. Cache failures are logged, never propagated into
//! the mutation path.

use sf_core::wire::ProjectSnapshot;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

pub trait LocalCache: Send + Sync {
    /// Replace the cached snapshot for this project.
    fn write_snapshot(&self, snapshot: &ProjectSnapshot);

    fn read_snapshot(&self, project_id: &str) -> Option<ProjectSnapshot>;
}

/// In-memory cache, used in tests and as a session-scoped fallback.
#[derive(Default)]
pub struct MemoryCache {
    slots: Mutex<HashMap<String, ProjectSnapshot>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn write_snapshot(&self, snapshot: &ProjectSnapshot) {
        let Ok(mut slots) = self.slots.lock() else {
            return;
        };
        slots.insert(snapshot.id.clone(), snapshot.clone());
    }

    fn read_snapshot(&self, project_id: &str) -> Option<ProjectSnapshot> {
        self.slots.lock().ok()?.get(project_id).cloned()
    }
}

/// JSON-file cache: one `{project_id}.json` blob per project.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, project_id: &str) -> PathBuf {
        self.dir.join(format!("{project_id}.json"))
    }
}

impl LocalCache for FileCache {
    fn write_snapshot(&self, snapshot: &ProjectSnapshot) {
        let path = self.path_for(&snapshot.id);
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("cache serialize failed for {}: {err}", snapshot.id);
                return;
            }
        };
        if let Err(err) = std::fs::create_dir_all(&self.dir) {
            log::warn!("cache dir create failed: {err}");
            return;
        }
        if let Err(err) = std::fs::write(&path, json) {
            log::warn!("cache write failed for {}: {err}", path.display());
        }
    }

    fn read_snapshot(&self, project_id: &str) -> Option<ProjectSnapshot> {
        let json = std::fs::read_to_string(self.path_for(project_id)).ok()?;
        match serde_json::from_str(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                log::warn!("cache parse failed for {project_id}: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::model::{ComponentKind, ComponentNode, Point};

    fn snapshot(id: &str) -> ProjectSnapshot {
        ProjectSnapshot {
            id: id.to_string(),
            name: "Demo".to_string(),
            layout: vec![ComponentNode::new(
                ComponentKind::Hero,
                Point::new(0.0, 0.0),
            )],
        }
    }

    #[test]
    fn memory_cache_roundtrip() {
        let cache = MemoryCache::new();
        assert!(cache.read_snapshot("p1").is_none());

        cache.write_snapshot(&snapshot("p1"));
        let read = cache.read_snapshot("p1").unwrap();
        assert_eq!(read.name, "Demo");
        assert_eq!(read.layout.len(), 1);
    }

    #[test]
    fn memory_cache_write_replaces_whole_snapshot() {
        let cache = MemoryCache::new();
        cache.write_snapshot(&snapshot("p1"));

        let mut next = snapshot("p1");
        next.layout.clear();
        cache.write_snapshot(&next);
        assert!(cache.read_snapshot("p1").unwrap().layout.is_empty());
    }

    #[test]
    fn file_cache_roundtrip() {
        let dir = std::env::temp_dir().join("sf-cache-test");
        let cache = FileCache::new(&dir);
        cache.write_snapshot(&snapshot("p2"));
        let read = cache.read_snapshot("p2").unwrap();
        assert_eq!(read.id, "p2");
        let _ = std::fs::remove_dir_all(dir);
    }
}
