//! Reversible edit commands and the linear undo/redo history.
//!
//! Every recorded operation is an `EditCommand` variant carrying exactly
//! the before/after data needed to apply and revert itself against a
//! `Layout`. History is a single vector with a cursor: pushing after an
//! undo discards the redo tail (no branching), and undo/redo past either
//! end are silent no-ops.
//!
//! Drag gestures are batched outside this module: the controller applies
//! live position updates during the gesture and pushes one `Move`
//! command at pointer-up, so a whole drag undoes in a single step.

use sf_core::model::{ComponentNode, Point};
use sf_core::tree::{Layout, RemovalSite};
use sf_core::ComponentId;
use smallvec::SmallVec;

/// A reversible unit of change. Immutable once created.
#[derive(Debug, Clone)]
pub enum EditCommand {
    /// Position change for one or more nodes (one entry per node).
    /// A drag gesture or a keyboard nudge produces one of these.
    Move {
        moves: SmallVec<[(ComponentId, Point, Point); 1]>,
    },
    /// Insert a node into the root list (paste, duplicate).
    Insert { node: ComponentNode, index: usize },
    /// Detach a node (delete, cut), remembering where it lived.
    Remove { node: ComponentNode, site: RemovalSite },
    /// Replace `members` (captured with their root indices, ascending)
    /// with `group`, whose children are the members rebased to the
    /// group origin.
    Group {
        members: Vec<(ComponentNode, usize)>,
        group: ComponentNode,
    },
    /// Dissolve `group` (captured in full, with its root index) back
    /// into root-level nodes at absolute positions.
    Ungroup { group: ComponentNode, root_index: usize },
    /// Root z-order change.
    Reorder {
        id: ComponentId,
        from: usize,
        to: usize,
    },
}

impl EditCommand {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Insert { .. } => "insert",
            Self::Remove { .. } => "delete",
            Self::Group { .. } => "group",
            Self::Ungroup { .. } => "ungroup",
            Self::Reorder { .. } => "reorder",
        }
    }

    /// Apply the forward direction.
    pub fn apply(&self, layout: &mut Layout) {
        match self {
            Self::Move { moves } => {
                for (id, _, to) in moves {
                    if let Some(node) = layout.get_mut(*id) {
                        node.position = *to;
                    }
                }
            }
            Self::Insert { node, index } => {
                layout.insert_at(*index, node.clone());
            }
            Self::Remove { node, .. } => {
                layout.remove(node.id);
            }
            Self::Group { members, group } => {
                for (member, _) in members {
                    layout.remove(member.id);
                }
                layout.insert(group.clone());
            }
            Self::Ungroup { group, .. } => {
                layout.remove(group.id);
                let origin = group.position;
                for child in &group.children {
                    let mut lifted = child.clone();
                    lifted.position = child.position.offset(origin.x, origin.y);
                    layout.insert(lifted);
                }
            }
            Self::Reorder { from, to, .. } => {
                layout.reorder(*from, *to);
            }
        }
    }

    /// Apply the inverse direction.
    pub fn revert(&self, layout: &mut Layout) {
        match self {
            Self::Move { moves } => {
                for (id, from, _) in moves {
                    if let Some(node) = layout.get_mut(*id) {
                        node.position = *from;
                    }
                }
            }
            Self::Insert { node, .. } => {
                layout.remove(node.id);
            }
            Self::Remove { node, site } => {
                layout.restore(node.clone(), *site);
            }
            Self::Group { members, group } => {
                layout.remove(group.id);
                // Indices were captured ascending, so inserting in order
                // lands every member back at its original slot.
                for (member, index) in members {
                    layout.insert_at(*index, member.clone());
                }
            }
            Self::Ungroup { group, root_index } => {
                for child in &group.children {
                    layout.remove(child.id);
                }
                layout.insert_at(*root_index, group.clone());
            }
            Self::Reorder { from, to, .. } => {
                layout.reorder(*to, *from);
            }
        }
    }
}

/// Linear undo/redo history.
pub struct History {
    entries: Vec<EditCommand>,
    /// Index of the last applied command; -1 when nothing is applied.
    cursor: isize,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
            max_depth,
        }
    }

    /// Record an already-applied command. Truncates any redo tail.
    pub fn push(&mut self, cmd: EditCommand) {
        self.entries.truncate((self.cursor + 1) as usize);
        self.entries.push(cmd);
        if self.entries.len() > self.max_depth {
            self.entries.remove(0);
        }
        self.cursor = self.entries.len() as isize - 1;
    }

    /// Apply a command and record it in one step.
    pub fn commit(&mut self, cmd: EditCommand, layout: &mut Layout) {
        log::debug!("commit: {}", cmd.description());
        cmd.apply(layout);
        self.push(cmd);
    }

    /// Revert the command under the cursor. No-op on empty history.
    /// Returns the undone command so callers can react (e.g. restore
    /// selection after a delete is undone).
    pub fn undo(&mut self, layout: &mut Layout) -> Option<&EditCommand> {
        if self.cursor < 0 {
            return None;
        }
        let cmd = &self.entries[self.cursor as usize];
        cmd.revert(layout);
        self.cursor -= 1;
        Some(cmd)
    }

    /// Re-apply the next command past the cursor. No-op at the end.
    pub fn redo(&mut self, layout: &mut Layout) -> Option<&EditCommand> {
        if self.cursor >= self.entries.len() as isize - 1 {
            return None;
        }
        self.cursor += 1;
        let cmd = &self.entries[self.cursor as usize];
        cmd.apply(layout);
        Some(cmd)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len() as isize - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        // Deep enough that real sessions never hit the trim.
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sf_core::model::{ComponentKind, Point};
    use smallvec::smallvec;

    fn layout_with_button() -> (Layout, ComponentId) {
        let node = ComponentNode::new(ComponentKind::Button, Point::new(50.0, 50.0));
        let id = node.id;
        (Layout::from_components(vec![node]), id)
    }

    fn move_cmd(id: ComponentId, from: Point, to: Point) -> EditCommand {
        EditCommand::Move {
            moves: smallvec![(id, from, to)],
        }
    }

    #[test]
    fn undo_restores_position() {
        let (mut layout, id) = layout_with_button();
        let mut history = History::default();

        history.commit(
            move_cmd(id, Point::new(50.0, 50.0), Point::new(120.0, 90.0)),
            &mut layout,
        );
        assert_eq!(layout.get(id).unwrap().position, Point::new(120.0, 90.0));

        history.undo(&mut layout);
        assert_eq!(layout.get(id).unwrap().position, Point::new(50.0, 50.0));

        history.redo(&mut layout);
        assert_eq!(layout.get(id).unwrap().position, Point::new(120.0, 90.0));
    }

    #[test]
    fn undo_redo_at_bounds_are_noops() {
        let (mut layout, id) = layout_with_button();
        let mut history = History::default();

        assert!(history.undo(&mut layout).is_none());
        assert!(history.redo(&mut layout).is_none());

        history.commit(
            move_cmd(id, Point::new(50.0, 50.0), Point::new(60.0, 50.0)),
            &mut layout,
        );
        assert!(history.redo(&mut layout).is_none());
        assert!(history.undo(&mut layout).is_some());
        assert!(history.undo(&mut layout).is_none());
    }

    #[test]
    fn push_after_undo_discards_redo_tail() {
        let (mut layout, id) = layout_with_button();
        let mut history = History::default();
        let start = Point::new(50.0, 50.0);

        history.commit(move_cmd(id, start, Point::new(70.0, 50.0)), &mut layout);
        history.commit(
            move_cmd(id, Point::new(70.0, 50.0), Point::new(90.0, 50.0)),
            &mut layout,
        );
        history.undo(&mut layout);
        assert!(history.can_redo());

        history.commit(
            move_cmd(id, Point::new(70.0, 50.0), Point::new(70.0, 80.0)),
            &mut layout,
        );
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn max_depth_trims_oldest() {
        let (mut layout, id) = layout_with_button();
        let mut history = History::new(3);

        for i in 0..5 {
            let from = Point::new(50.0 + i as f64, 50.0);
            let to = Point::new(51.0 + i as f64, 50.0);
            history.commit(move_cmd(id, from, to), &mut layout);
        }

        let mut undone = 0;
        while history.undo(&mut layout).is_some() {
            undone += 1;
        }
        assert_eq!(undone, 3);
    }

    #[test]
    fn remove_restores_exact_site() {
        let a = ComponentNode::new(ComponentKind::Text, Point::new(0.0, 0.0));
        let b = ComponentNode::new(ComponentKind::Image, Point::new(10.0, 0.0));
        let c = ComponentNode::new(ComponentKind::Card, Point::new(20.0, 0.0));
        let b_id = b.id;
        let mut layout = Layout::from_components(vec![a, b, c]);
        let mut history = History::default();

        let (node, site) = layout.remove(b_id).unwrap();
        layout.restore(node.clone(), site);
        let cmd = EditCommand::Remove { node, site };
        history.commit(cmd, &mut layout);
        assert!(layout.get(b_id).is_none());

        history.undo(&mut layout);
        assert_eq!(layout.root_index(b_id), Some(1));
    }

    #[test]
    fn reorder_is_fully_reversible() {
        let a = ComponentNode::new(ComponentKind::Text, Point::new(0.0, 0.0));
        let b = ComponentNode::new(ComponentKind::Image, Point::new(10.0, 0.0));
        let a_id = a.id;
        let mut layout = Layout::from_components(vec![a, b]);
        let mut history = History::default();

        history.commit(
            EditCommand::Reorder {
                id: a_id,
                from: 0,
                to: 1,
            },
            &mut layout,
        );
        assert_eq!(layout.root_index(a_id), Some(1));

        history.undo(&mut layout);
        assert_eq!(layout.root_index(a_id), Some(0));
    }
}
