//! Wire format: JSON layout blobs and the flattened component table.
//!
//! Two persisted shapes exist for the same tree:
//!
//! - the JSON blob — the `ComponentNode` array serialized as-is, used by
//!   the local cache and the compatibility/fallback remote path. Must
//!   round-trip exactly (`parse(serialize(x)) == x`).
//! - the flattened row table — one `{id, parent_id, sort_order, ...}`
//!   row per node, keyed by id. This is what the canonical remote sync
//!   path diffs and upserts.

use crate::id::ComponentId;
use crate::model::{ComponentKind, ComponentNode, Point};
use crate::tree::Layout;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One row of the flattened component table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRow {
    pub id: ComponentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ComponentId>,
    pub sort_order: usize,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    pub position: Point,
}

/// Flatten a layout into rows, parents before children, sibling order
/// captured in `sort_order`.
pub fn flatten_layout(layout: &Layout) -> Vec<ComponentRow> {
    let mut rows = Vec::new();
    layout.walk(&mut |node, parent_id, sort_order| {
        rows.push(ComponentRow {
            id: node.id,
            parent_id,
            sort_order,
            kind: node.kind.clone(),
            props: node.props.clone(),
            style: node.style.clone(),
            position: node.position,
        });
    });
    rows
}

/// Rebuild a layout from rows. Orphan rows (parent id that resolves to
/// no row) are lifted to the root rather than dropped.
pub fn rebuild_layout(rows: Vec<ComponentRow>) -> Layout {
    use std::collections::{HashMap, HashSet};

    let known: HashSet<ComponentId> = rows.iter().map(|r| r.id).collect();

    let mut children_of: HashMap<Option<ComponentId>, Vec<ComponentRow>> = HashMap::new();
    for mut row in rows {
        if let Some(parent) = row.parent_id
            && !known.contains(&parent)
        {
            row.parent_id = None;
        }
        children_of.entry(row.parent_id).or_default().push(row);
    }
    for siblings in children_of.values_mut() {
        siblings.sort_by_key(|r| r.sort_order);
    }

    fn build(
        parent: Option<ComponentId>,
        children_of: &std::collections::HashMap<Option<ComponentId>, Vec<ComponentRow>>,
    ) -> Vec<ComponentNode> {
        let Some(rows) = children_of.get(&parent) else {
            return Vec::new();
        };
        rows.iter()
            .map(|row| ComponentNode {
                id: row.id,
                kind: row.kind.clone(),
                props: row.props.clone(),
                style: row.style.clone(),
                position: row.position,
                children: build(Some(row.id), children_of),
            })
            .collect()
    }

    Layout::from_components(build(None, &children_of))
}

/// Serialize the layout as the JSON blob wire format.
pub fn serialize_layout(layout: &Layout) -> serde_json::Result<String> {
    serde_json::to_string(&layout.components)
}

/// Parse the JSON blob wire format.
pub fn parse_layout(json: &str) -> serde_json::Result<Layout> {
    let components: Vec<ComponentNode> = serde_json::from_str(json)?;
    Ok(Layout::from_components(components))
}

// ─── Project envelope ────────────────────────────────────────────────────

/// The unit written to the local cache and the remote blob store.
/// Always a full replacement, never a partial write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub id: String,
    pub name: String,
    pub layout: Vec<ComponentNode>,
}

/// Per-project settings that seed the session view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub zoom_percent: u32,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            zoom_percent: 100,
            canvas_width: 1920.0,
            canvas_height: 1080.0,
        }
    }
}
