//! Canvas controller: the pointer/keyboard state machine that owns the
//! authoritative layout while editing.
//!
//! The controller interprets gestures, converts client coordinates to
//! canvas space through the `CanvasView`, and mutates the layout either
//! directly (live drag frames, resize, drop placement) or through a
//! reversible `EditCommand`. A drag gesture applies every intermediate
//! frame immediately but pushes a single Move command at pointer-up, so
//! the whole gesture is one undo step.
//!
//! Mutation observers register as `ChangeSink`s and are notified after
//! every applied change; the persistence bridge hangs off this rather
//! than any global event bus. In read-only mode every handler is inert
//! and no notifications fire.

use crate::commands::{EditCommand, History};
use crate::input::{InputEvent, Modifiers, PointerButton};
use crate::selection::Selection;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use sf_core::model::{ComponentKind, ComponentNode, Point, Rect, Size};
use sf_core::tree::Layout;
use sf_core::{CanvasView, ComponentId};
use sf_render::{ResizeHandle, hit_test, hit_test_rect};
use smallvec::SmallVec;

/// Offset applied to pasted/duplicated nodes.
const PASTE_OFFSET: f64 = 20.0;
/// Smallest size a resize gesture can reach.
const MIN_RESIZE: f64 = 20.0;

/// Observer for layout mutations. The persistence bridge implements
/// this; tests use it to count writes.
pub trait ChangeSink {
    fn layout_changed(&mut self, layout: &Layout);
}

/// An open right-click menu, positioned in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub target: ComponentId,
    pub x: f64,
    pub y: f64,
}

/// The entries a context menu can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuAction {
    Duplicate,
    Delete,
    Copy,
    Group,
    Ungroup,
    BringToFront,
    SendToBack,
}

#[derive(Debug, Clone)]
enum PointerState {
    Idle,
    Dragging {
        /// Node under the pointer when the gesture began.
        id: ComponentId,
        /// Canvas-space offset from that node's origin to the pointer.
        pointer_offset: Point,
        /// Start position of every node moving with the gesture.
        starts: Vec<(ComponentId, Point)>,
        moved: bool,
    },
    Resizing {
        id: ComponentId,
        handle: ResizeHandle,
        start_bounds: Rect,
        start_pointer: Point,
    },
    Marquee {
        start: Point,
        rect: Rect,
    },
}

pub struct CanvasController {
    layout: Layout,
    pub view: CanvasView,
    history: History,
    selection: Selection,
    clipboard: Option<ComponentNode>,
    pointer: PointerState,
    editing: Option<ComponentId>,
    context_menu: Option<ContextMenu>,
    read_only: bool,
    text_input_focused: bool,
    sinks: Vec<Box<dyn ChangeSink>>,
}

impl CanvasController {
    pub fn new(layout: Layout, view: CanvasView) -> Self {
        Self {
            layout,
            view,
            history: History::default(),
            selection: Selection::new(),
            clipboard: None,
            pointer: PointerState::Idle,
            editing: None,
            context_menu: None,
            read_only: false,
            text_input_focused: false,
            sinks: Vec::new(),
        }
    }

    /// A controller that only ever renders: no gestures, no selection,
    /// no persistence writes.
    pub fn read_only(layout: Layout, view: CanvasView) -> Self {
        let mut controller = Self::new(layout, view);
        controller.read_only = true;
        controller
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active(&self) -> Option<ComponentId> {
        self.selection.active()
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn editing(&self) -> Option<ComponentId> {
        self.editing
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Marquee rectangle to draw, while one is being dragged out.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.pointer {
            PointerState::Marquee { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    pub fn add_change_sink(&mut self, sink: Box<dyn ChangeSink>) {
        self.sinks.push(sink);
    }

    /// The host reports whether focus sits in a text input / textarea /
    /// content-editable element; shortcuts are suppressed while typing.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    /// Called once after the project loads: scroll so the virtual
    /// canvas center sits at the viewport center.
    pub fn center_on_load(&mut self) {
        self.view.center();
    }

    fn notify(&mut self) {
        for sink in &mut self.sinks {
            sink.layout_changed(&self.layout);
        }
    }

    // ─── Event dispatch ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.pointer_down(x, y, button, modifiers),
            InputEvent::PointerMove { x, y, modifiers } => self.pointer_move(x, y, modifiers),
            InputEvent::PointerUp { x, y, modifiers } => self.pointer_up(x, y, modifiers),
            InputEvent::DoubleClick { x, y, .. } => self.double_click(x, y),
            InputEvent::Wheel { delta_y, modifiers } => self.wheel(delta_y, modifiers),
            InputEvent::Key { key, modifiers } => self.key(&key, modifiers),
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f64, y: f64, button: PointerButton, modifiers: Modifiers) {
        if self.read_only {
            return;
        }
        // Any pointer-down lands outside an open menu.
        self.context_menu = None;

        let point = self.view.to_canvas_space(x, y);
        let hit = hit_test(&self.layout, point.x, point.y);

        if button == PointerButton::Secondary {
            if let Some(id) = hit {
                if !self.selection.is_selected(id) {
                    self.selection.click(id);
                }
                self.context_menu = Some(ContextMenu { target: id, x, y });
            }
            return;
        }

        match hit {
            Some(id) => {
                if modifiers.command() {
                    // Toggle membership; no drag starts from a
                    // ctrl/cmd-click.
                    self.selection.toggle(id);
                    return;
                }
                if self.selection.is_selected(id) {
                    self.selection.set_active(id);
                } else {
                    self.selection.click(id);
                }
                let Some(node) = self.layout.get(id) else {
                    return;
                };
                let pointer_offset = Point::new(point.x - node.position.x, point.y - node.position.y);
                let starts = self
                    .selection
                    .ids()
                    .iter()
                    .filter_map(|sid| self.layout.get(*sid).map(|n| (*sid, n.position)))
                    .collect();
                self.pointer = PointerState::Dragging {
                    id,
                    pointer_offset,
                    starts,
                    moved: false,
                };
            }
            None => {
                self.selection.clear();
                self.pointer = PointerState::Marquee {
                    start: point,
                    rect: Rect {
                        x: point.x,
                        y: point.y,
                        width: 0.0,
                        height: 0.0,
                    },
                };
            }
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: Modifiers) {
        if self.read_only {
            return;
        }
        let point = self.view.to_canvas_space(x, y);

        match self.pointer.clone() {
            PointerState::Dragging {
                id,
                pointer_offset,
                starts,
                ..
            } => {
                let Some((_, primary_start)) = starts.iter().find(|(sid, _)| *sid == id) else {
                    return;
                };
                let mut dx = point.x - pointer_offset.x - primary_start.x;
                let mut dy = point.y - pointer_offset.y - primary_start.y;

                // Shift constrains to the dominant axis.
                if modifiers.shift {
                    if dx.abs() > dy.abs() {
                        dy = 0.0;
                    } else {
                        dx = 0.0;
                    }
                }

                for (sid, start) in &starts {
                    if let Some(node) = self.layout.get_mut(*sid) {
                        node.position = start.offset(dx, dy);
                    }
                }
                if let PointerState::Dragging { moved, .. } = &mut self.pointer {
                    *moved = true;
                }
                self.notify();
            }
            PointerState::Resizing {
                id,
                handle,
                start_bounds,
                start_pointer,
            } => {
                let dx = point.x - start_pointer.x;
                let dy = point.y - start_pointer.y;
                let resized = resize_bounds(start_bounds, handle, dx, dy);
                if let Some(node) = self.layout.get_mut(id) {
                    node.position = Point::new(resized.x, resized.y);
                    node.set_size(Size::new(resized.width, resized.height));
                }
                self.notify();
            }
            PointerState::Marquee { start, .. } => {
                let rect = normalized_rect(start, point);
                self.pointer = PointerState::Marquee { start, rect };
            }
            PointerState::Idle => {}
        }
    }

    pub fn pointer_up(&mut self, _x: f64, _y: f64, _modifiers: Modifiers) {
        if self.read_only {
            return;
        }
        match std::mem::replace(&mut self.pointer, PointerState::Idle) {
            PointerState::Dragging { starts, moved, .. } => {
                if !moved {
                    return;
                }
                // One command per gesture, capturing start → final.
                let mut moves: SmallVec<[(ComponentId, Point, Point); 1]> = SmallVec::new();
                for (sid, from) in starts {
                    if let Some(node) = self.layout.get(sid)
                        && node.position != from
                    {
                        moves.push((sid, from, node.position));
                    }
                }
                if !moves.is_empty() {
                    self.history.push(EditCommand::Move { moves });
                }
            }
            PointerState::Marquee { rect, .. } => {
                let ids = hit_test_rect(&self.layout, &rect);
                if !ids.is_empty() {
                    self.selection.set_many(ids);
                }
            }
            _ => {}
        }
    }

    /// The host calls this when pointer-down lands on a resize handle of
    /// a selected node (handles are rendered affordances, so only the
    /// host knows which one was hit).
    pub fn begin_resize(&mut self, id: ComponentId, handle: ResizeHandle, x: f64, y: f64) {
        if self.read_only {
            return;
        }
        let Some(node) = self.layout.get(id) else {
            return;
        };
        self.pointer = PointerState::Resizing {
            id,
            handle,
            start_bounds: node.bounds(),
            start_pointer: self.view.to_canvas_space(x, y),
        };
    }

    pub fn double_click(&mut self, x: f64, y: f64) {
        if self.read_only {
            return;
        }
        let point = self.view.to_canvas_space(x, y);
        if let Some(id) = hit_test(&self.layout, point.x, point.y)
            && let Some(node) = self.layout.get(id)
            && node.kind.editable_text_prop().is_some()
        {
            // Only one node is inline-editable at a time.
            self.editing = Some(id);
        }
    }

    pub fn wheel(&mut self, delta_y: f64, modifiers: Modifiers) {
        if self.read_only {
            return;
        }
        if modifiers.command() {
            let notches = if delta_y < 0.0 { 1 } else { -1 };
            self.view.zoom_by_notches(notches);
        } else {
            self.view.scroll_by(0.0, delta_y);
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    pub fn key(&mut self, key: &str, modifiers: Modifiers) {
        if self.read_only || self.text_input_focused {
            return;
        }
        if self.editing.is_some() {
            // Inline edit owns the keyboard; the host commits on
            // blur/Enter via commit_text_edit.
            if key == "Escape" {
                self.cancel_text_edit();
            }
            return;
        }

        let Some(action) = ShortcutMap::resolve(
            key,
            modifiers.ctrl,
            modifiers.shift,
            modifiers.alt,
            modifiers.meta,
        ) else {
            return;
        };

        let nudge = if modifiers.shift { 10.0 } else { 1.0 };
        match action {
            ShortcutAction::Cut => self.cut(),
            ShortcutAction::Copy => self.copy(),
            ShortcutAction::Paste => self.paste(),
            ShortcutAction::Duplicate => {
                if let Some(id) = self.selection.active() {
                    self.duplicate(id);
                }
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Group => self.group_selection(),
            ShortcutAction::Ungroup => {
                if let Some(id) = self.selection.active() {
                    self.ungroup(id);
                }
            }
            ShortcutAction::Delete => {
                if let Some(id) = self.selection.active() {
                    self.delete(id);
                }
            }
            ShortcutAction::BringToFront => {
                if let Some(id) = self.selection.active() {
                    self.bring_to_front(id);
                }
            }
            ShortcutAction::SendToBack => {
                if let Some(id) = self.selection.active() {
                    self.send_to_back(id);
                }
            }
            ShortcutAction::NudgeLeft => self.nudge(-nudge, 0.0),
            ShortcutAction::NudgeRight => self.nudge(nudge, 0.0),
            ShortcutAction::NudgeUp => self.nudge(0.0, -nudge),
            ShortcutAction::NudgeDown => self.nudge(0.0, nudge),
            ShortcutAction::CloseOverlay => {
                self.context_menu = None;
            }
        }
    }

    /// Arrow-key move: discrete, immediately committed, one undo step
    /// per press. Targets the active component.
    pub fn nudge(&mut self, dx: f64, dy: f64) {
        let Some(id) = self.selection.active() else {
            return;
        };
        let Some(node) = self.layout.get(id) else {
            return;
        };
        let from = node.position;
        let moves: SmallVec<[(ComponentId, Point, Point); 1]> =
            smallvec::smallvec![(id, from, from.offset(dx, dy))];
        self.history.commit(EditCommand::Move { moves }, &mut self.layout);
        self.notify();
    }

    // ─── Clipboard (operates on the active component) ────────────────────

    pub fn cut(&mut self) {
        let Some(id) = self.selection.active() else {
            return;
        };
        let (Some(node), Some(site)) = (self.layout.get(id).cloned(), self.layout.site_of(id))
        else {
            return;
        };
        self.clipboard = Some(node.clone());
        self.history
            .commit(EditCommand::Remove { node, site }, &mut self.layout);
        self.selection.clear();
        self.notify();
    }

    pub fn copy(&mut self) {
        let Some(id) = self.selection.active() else {
            return;
        };
        self.clipboard = self.layout.get(id).cloned();
    }

    /// Clone the clipboard node with fresh ids throughout, offset by
    /// (+20, +20) from the original, insert at the root top, select it.
    pub fn paste(&mut self) {
        let Some(template) = &self.clipboard else {
            return;
        };
        let mut node = template.clone_with_new_ids();
        node.position = template.position.offset(PASTE_OFFSET, PASTE_OFFSET);
        let id = node.id;
        let index = self.layout.len();
        self.history
            .commit(EditCommand::Insert { node, index }, &mut self.layout);
        self.selection.click(id);
        self.notify();
    }

    pub fn duplicate(&mut self, id: ComponentId) {
        let Some(original) = self.layout.get(id) else {
            return;
        };
        let mut node = original.clone_with_new_ids();
        node.position = original.position.offset(PASTE_OFFSET, PASTE_OFFSET);
        let new_id = node.id;
        let index = self.layout.len();
        self.history
            .commit(EditCommand::Insert { node, index }, &mut self.layout);
        self.selection.click(new_id);
        self.notify();
    }

    pub fn delete(&mut self, id: ComponentId) {
        let (Some(node), Some(site)) = (self.layout.get(id).cloned(), self.layout.site_of(id))
        else {
            return;
        };
        self.history
            .commit(EditCommand::Remove { node, site }, &mut self.layout);
        self.selection.prune(&self.layout);
        self.notify();
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) {
        let restored = match self.history.undo(&mut self.layout) {
            None => return,
            Some(EditCommand::Remove { node, .. }) => Some(node.id),
            Some(_) => None,
        };
        self.selection.prune(&self.layout);
        if let Some(id) = restored {
            // Undoing a cut/delete selects the resurrected node.
            self.selection.click(id);
        }
        self.notify();
    }

    pub fn redo(&mut self) {
        if self.history.redo(&mut self.layout).is_none() {
            return;
        }
        self.selection.prune(&self.layout);
        self.notify();
    }

    // ─── Grouping ────────────────────────────────────────────────────────

    /// Group the multi-selection (≥ 2 root-level nodes) into a new
    /// `group` node at the selection's bounding-box origin, children
    /// rebased relative to it.
    pub fn group_selection(&mut self) {
        let mut members: Vec<(ComponentNode, usize)> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| {
                self.layout
                    .root_index(*id)
                    .and_then(|index| self.layout.get(*id).map(|n| (n.clone(), index)))
            })
            .collect();
        if members.len() < 2 {
            return;
        }
        members.sort_by_key(|(_, index)| *index);

        let bbox = members
            .iter()
            .map(|(n, _)| n.bounds())
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default();

        let mut group = ComponentNode::new(ComponentKind::Group, Point::new(bbox.x, bbox.y));
        group.set_size(Size::new(bbox.width, bbox.height));
        for (member, _) in &members {
            let mut child = member.clone();
            child.position = Point::new(member.position.x - bbox.x, member.position.y - bbox.y);
            group.children.push(child);
        }
        let group_id = group.id;

        log::debug!("grouping {} nodes into {group_id}", members.len());
        self.history
            .commit(EditCommand::Group { members, group }, &mut self.layout);
        self.selection.click(group_id);
        self.notify();
    }

    /// Dissolve a group: children return to the root list at absolute
    /// positions (`child + group origin`); selection clears.
    pub fn ungroup(&mut self, id: ComponentId) {
        let Some(root_index) = self.layout.root_index(id) else {
            return;
        };
        let Some(node) = self.layout.get(id) else {
            return;
        };
        if node.kind != ComponentKind::Group {
            return;
        }
        let group = node.clone();
        self.history
            .commit(EditCommand::Ungroup { group, root_index }, &mut self.layout);
        self.selection.clear();
        self.notify();
    }

    // ─── Z-order ─────────────────────────────────────────────────────────

    pub fn bring_to_front(&mut self, id: ComponentId) {
        let Some(from) = self.layout.root_index(id) else {
            return;
        };
        let to = self.layout.front_index();
        if from == to {
            return;
        }
        self.history
            .commit(EditCommand::Reorder { id, from, to }, &mut self.layout);
        self.notify();
    }

    pub fn send_to_back(&mut self, id: ComponentId) {
        let Some(from) = self.layout.root_index(id) else {
            return;
        };
        if from == 0 {
            return;
        }
        self.history
            .commit(EditCommand::Reorder { id, from, to: 0 }, &mut self.layout);
        self.notify();
    }

    // ─── Placement & context menu ────────────────────────────────────────

    /// Drop a new component at a client point. Placement is direct state
    /// (not a history entry) and does not change the selection.
    pub fn drop_component(&mut self, kind: ComponentKind, x: f64, y: f64) -> Option<ComponentId> {
        if self.read_only {
            return None;
        }
        let position = self.view.to_canvas_space(x, y);
        let node = ComponentNode::new(kind, position);
        let id = node.id;
        self.layout.insert(node);
        self.notify();
        Some(id)
    }

    /// Run a context-menu entry against the menu's target, closing the
    /// menu.
    pub fn context_menu_action(&mut self, action: ContextMenuAction) {
        let Some(menu) = self.context_menu.take() else {
            return;
        };
        let target = menu.target;
        match action {
            ContextMenuAction::Duplicate => self.duplicate(target),
            ContextMenuAction::Delete => self.delete(target),
            ContextMenuAction::Copy => {
                self.clipboard = self.layout.get(target).cloned();
            }
            ContextMenuAction::Group => self.group_selection(),
            ContextMenuAction::Ungroup => self.ungroup(target),
            ContextMenuAction::BringToFront => self.bring_to_front(target),
            ContextMenuAction::SendToBack => self.send_to_back(target),
        }
    }

    // ─── Inline text editing ─────────────────────────────────────────────

    /// Commit the inline edit: replace the node's text prop and leave
    /// edit mode. Called by the host on blur/Enter.
    pub fn commit_text_edit(&mut self, text: &str) {
        let Some(id) = self.editing.take() else {
            return;
        };
        if let Some(node) = self.layout.get_mut(id) {
            node.set_text_content(text);
        }
        self.notify();
    }

    pub fn cancel_text_edit(&mut self) {
        self.editing = None;
    }
}

/// Apply a handle drag to a starting rectangle, clamped to a minimum
/// size so a gesture can't invert the node.
fn resize_bounds(start: Rect, handle: ResizeHandle, dx: f64, dy: f64) -> Rect {
    let mut out = start;
    if handle.affects_width() {
        if handle.affects_left() {
            let width = (start.width - dx).max(MIN_RESIZE);
            out.x = start.x + start.width - width;
            out.width = width;
        } else {
            out.width = (start.width + dx).max(MIN_RESIZE);
        }
    }
    if handle.affects_height() {
        if handle.affects_top() {
            let height = (start.height - dy).max(MIN_RESIZE);
            out.y = start.y + start.height - height;
            out.height = height;
        } else {
            out.height = (start.height + dy).max(MIN_RESIZE);
        }
    }
    out
}

fn normalized_rect(a: Point, b: Point) -> Rect {
    Rect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (b.x - a.x).abs(),
        height: (b.y - a.y).abs(),
    }
}
