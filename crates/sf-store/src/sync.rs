//! Component-table sync planning.
//!
//! The canonical remote path flattens the tree into rows keyed by
//! component id and diffs against the id set already stored for the
//! project: ids that disappeared are deleted, everything else is
//! upserted. Writes stay idempotent full snapshots — safe to repeat or
//! reorder, no locking needed.

use sf_core::ComponentId;
use sf_core::tree::Layout;
use sf_core::wire::{ComponentRow, flatten_layout};
use std::collections::HashSet;

/// What a sync pass will send.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPlan {
    pub upserts: Vec<ComponentRow>,
    pub deletes: Vec<ComponentId>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }
}

/// Diff the current layout against the id set previously stored for the
/// project.
pub fn plan_sync(layout: &Layout, existing: &HashSet<ComponentId>) -> SyncPlan {
    let upserts = flatten_layout(layout);
    let current: HashSet<ComponentId> = upserts.iter().map(|row| row.id).collect();
    let deletes = existing
        .iter()
        .filter(|id| !current.contains(*id))
        .copied()
        .collect();
    SyncPlan { upserts, deletes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sf_core::model::{ComponentKind, ComponentNode, Point};

    #[test]
    fn plan_upserts_everything_and_deletes_missing() {
        let kept = ComponentNode::new(ComponentKind::Button, Point::new(0.0, 0.0));
        let kept_id = kept.id;
        let layout = Layout::from_components(vec![kept]);

        let gone = ComponentId::intern("deleted_node");
        let existing: HashSet<ComponentId> = [kept_id, gone].into_iter().collect();

        let plan = plan_sync(&layout, &existing);
        assert_eq!(plan.upserts.len(), 1);
        assert_eq!(plan.upserts[0].id, kept_id);
        assert_eq!(plan.deletes, vec![gone]);
    }

    #[test]
    fn first_sync_has_no_deletes() {
        let layout = Layout::from_components(vec![ComponentNode::new(
            ComponentKind::Hero,
            Point::new(0.0, 0.0),
        )]);
        let plan = plan_sync(&layout, &HashSet::new());
        assert_eq!(plan.deletes, vec![]);
        assert_eq!(plan.upserts.len(), 1);
    }

    #[test]
    fn nested_children_flatten_into_the_plan() {
        let mut group = ComponentNode::new(ComponentKind::Group, Point::new(10.0, 10.0));
        group.children.push(ComponentNode::new(
            ComponentKind::Text,
            Point::new(0.0, 0.0),
        ));
        let group_id = group.id;
        let layout = Layout::from_components(vec![group]);

        let plan = plan_sync(&layout, &HashSet::new());
        assert_eq!(plan.upserts.len(), 2);
        assert_eq!(plan.upserts[1].parent_id, Some(group_id));
    }
}
