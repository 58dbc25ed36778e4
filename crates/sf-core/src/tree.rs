//! Layout tree operations.
//!
//! `Layout` owns the root component list. Children of `group`/`grid`
//! nodes are owned exclusively by their parent; every operation on a
//! nested node goes through the tree so there is exactly one owner for
//! any subtree at all times. The renderer only ever borrows the layout
//! immutably.

use crate::id::ComponentId;
use crate::model::{ComponentNode, Rect};

/// Where a removed node used to live, so undo can put it back exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalSite {
    /// `None` means the node sat in the root list.
    pub parent: Option<ComponentId>,
    pub index: usize,
}

/// The design document: an ordered list of root components.
/// Root order is z-order — first is painted at the back, last on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub components: Vec<ComponentNode>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components(components: Vec<ComponentNode>) -> Self {
        Self { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Look up a node anywhere in the tree.
    pub fn get(&self, id: ComponentId) -> Option<&ComponentNode> {
        fn find(nodes: &[ComponentNode], id: ComponentId) -> Option<&ComponentNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = find(&node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        find(&self.components, id)
    }

    /// Look up a node mutably anywhere in the tree.
    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut ComponentNode> {
        fn find(nodes: &mut [ComponentNode], id: ComponentId) -> Option<&mut ComponentNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = find(&mut node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        find(&mut self.components, id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    /// Index of a node in the root list, if it sits there.
    pub fn root_index(&self, id: ComponentId) -> Option<usize> {
        self.components.iter().position(|n| n.id == id)
    }

    /// Append to the root list (top of z-order).
    pub fn insert(&mut self, node: ComponentNode) {
        self.components.push(node);
    }

    pub fn insert_at(&mut self, index: usize, node: ComponentNode) {
        let index = index.min(self.components.len());
        self.components.insert(index, node);
    }

    /// Detach a node from wherever it lives, returning it together with
    /// the site it occupied.
    pub fn remove(&mut self, id: ComponentId) -> Option<(ComponentNode, RemovalSite)> {
        if let Some(index) = self.root_index(id) {
            let node = self.components.remove(index);
            return Some((node, RemovalSite {
                parent: None,
                index,
            }));
        }

        fn remove_from(
            nodes: &mut [ComponentNode],
            id: ComponentId,
        ) -> Option<(ComponentNode, RemovalSite)> {
            for parent in nodes {
                if let Some(index) = parent.children.iter().position(|c| c.id == id) {
                    let node = parent.children.remove(index);
                    return Some((node, RemovalSite {
                        parent: Some(parent.id),
                        index,
                    }));
                }
                if let Some(found) = remove_from(&mut parent.children, id) {
                    return Some(found);
                }
            }
            None
        }
        remove_from(&mut self.components, id)
    }

    /// Where a node currently lives, without detaching it.
    pub fn site_of(&self, id: ComponentId) -> Option<RemovalSite> {
        if let Some(index) = self.root_index(id) {
            return Some(RemovalSite {
                parent: None,
                index,
            });
        }

        fn find_in(nodes: &[ComponentNode], id: ComponentId) -> Option<RemovalSite> {
            for parent in nodes {
                if let Some(index) = parent.children.iter().position(|c| c.id == id) {
                    return Some(RemovalSite {
                        parent: Some(parent.id),
                        index,
                    });
                }
                if let Some(found) = find_in(&parent.children, id) {
                    return Some(found);
                }
            }
            None
        }
        find_in(&self.components, id)
    }

    /// Put a node back at the exact site `remove` reported.
    /// Falls back to the root top if the parent no longer exists.
    pub fn restore(&mut self, node: ComponentNode, site: RemovalSite) {
        match site.parent {
            None => self.insert_at(site.index, node),
            Some(parent_id) => {
                if let Some(parent) = self.get_mut(parent_id) {
                    let index = site.index.min(parent.children.len());
                    parent.children.insert(index, node);
                } else {
                    self.insert(node);
                }
            }
        }
    }

    /// Move a root node between z-order slots. Returns false when either
    /// index is out of range.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.components.len() || to >= self.components.len() {
            return false;
        }
        let node = self.components.remove(from);
        self.components.insert(to, node);
        true
    }

    /// Z-order target index for bring-to-front (painted last).
    pub fn front_index(&self) -> usize {
        self.components.len().saturating_sub(1)
    }

    /// Visit every node with its parent id and sibling index, parents
    /// before children. This is the flattening order for the wire table.
    pub fn walk(&self, f: &mut impl FnMut(&ComponentNode, Option<ComponentId>, usize)) {
        fn visit(
            nodes: &[ComponentNode],
            parent: Option<ComponentId>,
            f: &mut impl FnMut(&ComponentNode, Option<ComponentId>, usize),
        ) {
            for (index, node) in nodes.iter().enumerate() {
                f(node, parent, index);
                visit(&node.children, Some(node.id), f);
            }
        }
        visit(&self.components, None, f);
    }

    /// Check the whole-tree id uniqueness invariant. Returns the first
    /// duplicated id found, if any.
    pub fn find_duplicate_id(&self) -> Option<ComponentId> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicate = None;
        self.walk(&mut |node, _, _| {
            if duplicate.is_none() && !seen.insert(node.id) {
                duplicate = Some(node.id);
            }
        });
        duplicate
    }

    /// Bounding box over the effective bounds of the given root nodes.
    /// Ids that don't resolve are ignored; `None` when nothing resolves.
    pub fn bounding_box(&self, ids: &[ComponentId]) -> Option<Rect> {
        let mut bbox: Option<Rect> = None;
        for &id in ids {
            if let Some(node) = self.get(id) {
                let b = node.bounds();
                bbox = Some(match bbox {
                    Some(acc) => acc.union(&b),
                    None => b,
                });
            }
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentKind, Point};
    use pretty_assertions::assert_eq;

    fn node(kind: ComponentKind, x: f64, y: f64) -> ComponentNode {
        ComponentNode::new(kind, Point::new(x, y))
    }

    fn sample_layout() -> (Layout, ComponentId, ComponentId, ComponentId) {
        let mut group = node(ComponentKind::Group, 100.0, 100.0);
        let child = node(ComponentKind::Text, 10.0, 20.0);
        let child_id = child.id;
        group.children.push(child);
        let group_id = group.id;

        let button = node(ComponentKind::Button, 500.0, 300.0);
        let button_id = button.id;

        let layout = Layout::from_components(vec![group, button]);
        (layout, group_id, child_id, button_id)
    }

    #[test]
    fn get_finds_nested_nodes() {
        let (layout, group_id, child_id, button_id) = sample_layout();
        assert!(layout.get(group_id).is_some());
        assert!(layout.get(button_id).is_some());
        assert_eq!(layout.get(child_id).unwrap().kind, ComponentKind::Text);
        assert!(!layout.contains(ComponentId::intern("missing")));
    }

    #[test]
    fn remove_and_restore_nested_child() {
        let (mut layout, group_id, child_id, _) = sample_layout();

        let (removed, site) = layout.remove(child_id).unwrap();
        assert_eq!(site.parent, Some(group_id));
        assert_eq!(site.index, 0);
        assert!(layout.get(child_id).is_none());

        layout.restore(removed, site);
        assert!(layout.get(child_id).is_some());
        assert_eq!(layout.get(group_id).unwrap().children.len(), 1);
    }

    #[test]
    fn remove_and_restore_root_node() {
        let (mut layout, group_id, _, button_id) = sample_layout();

        let (removed, site) = layout.remove(group_id).unwrap();
        assert_eq!(site, RemovalSite {
            parent: None,
            index: 0,
        });
        assert_eq!(layout.root_index(button_id), Some(0));

        layout.restore(removed, site);
        assert_eq!(layout.root_index(group_id), Some(0));
        assert_eq!(layout.root_index(button_id), Some(1));
    }

    #[test]
    fn reorder_moves_z_order() {
        let (mut layout, group_id, _, button_id) = sample_layout();
        assert!(layout.reorder(0, 1));
        assert_eq!(layout.root_index(group_id), Some(1));
        assert_eq!(layout.root_index(button_id), Some(0));
        assert!(!layout.reorder(0, 5));
    }

    #[test]
    fn walk_reports_parents_and_sort_order() {
        let (layout, group_id, child_id, button_id) = sample_layout();
        let mut rows = Vec::new();
        layout.walk(&mut |n, parent, index| rows.push((n.id, parent, index)));
        assert_eq!(rows, vec![
            (group_id, None, 0),
            (child_id, Some(group_id), 0),
            (button_id, None, 1),
        ]);
    }

    #[test]
    fn duplicate_id_detection() {
        let (mut layout, _, child_id, _) = sample_layout();
        assert_eq!(layout.find_duplicate_id(), None);

        let mut rogue = node(ComponentKind::Card, 0.0, 0.0);
        rogue.id = child_id;
        layout.insert(rogue);
        assert_eq!(layout.find_duplicate_id(), Some(child_id));
    }

    #[test]
    fn bounding_box_covers_selection() {
        let mut a = node(ComponentKind::Container, 100.0, 100.0);
        a.set_size(crate::model::Size::new(200.0, 100.0));
        let mut b = node(ComponentKind::Container, 400.0, 300.0);
        b.set_size(crate::model::Size::new(100.0, 50.0));
        let ids = [a.id, b.id];
        let layout = Layout::from_components(vec![a, b]);

        let bbox = layout.bounding_box(&ids).unwrap();
        assert_eq!(bbox.x, 100.0);
        assert_eq!(bbox.y, 100.0);
        assert_eq!(bbox.width, 400.0);
        assert_eq!(bbox.height, 250.0);
    }
}
