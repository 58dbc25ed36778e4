//! Selection state: single active component + multi-select set.
//!
//! The active component drives the properties panel and single-target
//! operations (clipboard, inline edit, nudge). The multi-select set
//! drives group and bulk move. Active is a member of the set whenever
//! non-null, except transiently during group/ungroup.

use sf_core::ComponentId;
use sf_core::tree::Layout;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    active: Option<ComponentId>,
    selected: Vec<ComponentId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<ComponentId> {
        self.active
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, id: ComponentId) -> bool {
        self.selected.contains(&id)
    }

    /// Plain click: the clicked node becomes the whole selection.
    pub fn click(&mut self, id: ComponentId) {
        self.selected = vec![id];
        self.active = Some(id);
    }

    /// Ctrl/Cmd+click: toggle set membership. The clicked node becomes
    /// active either way — including when the toggle just removed it,
    /// matching observed builder behavior (see DESIGN.md).
    pub fn toggle(&mut self, id: ComponentId) {
        if let Some(pos) = self.selected.iter().position(|s| *s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id);
        }
        self.active = Some(id);
    }

    /// Make an already-selected node the active one (click on a member
    /// of a multi-selection keeps the set for bulk move).
    pub fn set_active(&mut self, id: ComponentId) {
        if self.selected.contains(&id) {
            self.active = Some(id);
        }
    }

    /// Click on empty canvas.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.active = None;
    }

    /// Marquee result: replace the set. The topmost node (last in
    /// z-order) becomes active.
    pub fn set_many(&mut self, ids: Vec<ComponentId>) {
        self.active = ids.last().copied();
        self.selected = ids;
    }

    /// Drop ids that no longer resolve in the layout (after undo/redo
    /// or external reloads).
    pub fn prune(&mut self, layout: &Layout) {
        self.selected.retain(|id| layout.contains(*id));
        if let Some(active) = self.active
            && !layout.contains(active)
        {
            self.active = self.selected.last().copied();
        }
    }
}
