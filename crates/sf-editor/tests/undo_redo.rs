//! Integration tests: undo/redo through the canvas controller.
//!
//! Exercises the full stack — controller gesture handling, command
//! capture, and history — and checks the inverse law: any recorded
//! sequence fully unwinds back to the starting tree.

use sf_core::model::{ComponentKind, ComponentNode, Point, Size};
use sf_core::tree::Layout;
use sf_core::{CanvasView, ViewportRect};
use sf_editor::{CanvasController, Modifiers, PointerButton};

fn view() -> CanvasView {
    CanvasView::new(ViewportRect {
        left: 0.0,
        top: 0.0,
        width: 1280.0,
        height: 800.0,
    })
}

fn sized(kind: ComponentKind, x: f64, y: f64, w: f64, h: f64) -> ComponentNode {
    let mut node = ComponentNode::new(kind, Point::new(x, y));
    node.set_size(Size::new(w, h));
    node
}

fn select(c: &mut CanvasController, x: f64, y: f64) {
    c.pointer_down(x, y, PointerButton::Primary, Modifiers::NONE);
    c.pointer_up(x, y, Modifiers::NONE);
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ─── Inverse law ────────────────────────────────────────────────────────

#[test]
fn full_command_sequence_unwinds_to_initial_tree() {
    init_logging();
    let a = sized(ComponentKind::Button, 100.0, 100.0, 100.0, 50.0);
    let b = sized(ComponentKind::Card, 400.0, 300.0, 100.0, 50.0);
    let c_node = sized(ComponentKind::Image, 700.0, 100.0, 100.0, 80.0);
    let d = sized(ComponentKind::Hero, 100.0, 600.0, 400.0, 120.0);
    let mut c = CanvasController::new(
        Layout::from_components(vec![a, b, c_node, d]),
        view(),
    );
    let initial = c.layout().clone();

    // 1: drag gesture on the button
    c.pointer_down(110.0, 110.0, PointerButton::Primary, Modifiers::NONE);
    c.pointer_move(180.0, 140.0, Modifiers::NONE);
    c.pointer_up(180.0, 140.0, Modifiers::NONE);
    // 2: nudge it
    c.key("ArrowRight", Modifiers::NONE);
    // 3: delete it
    c.key("Delete", Modifiers::NONE);
    // 4: group the two remaining nodes
    c.pointer_down(410.0, 310.0, PointerButton::Primary, Modifiers::NONE);
    c.pointer_up(410.0, 310.0, Modifiers::NONE);
    c.pointer_down(710.0, 110.0, PointerButton::Primary, Modifiers::CTRL);
    c.key("g", Modifiers::CTRL);
    // 5: z-order shuffle of whatever is active
    let grouped = c.active().unwrap();
    c.send_to_back(grouped);

    let mut undone = 0;
    while c.can_undo() {
        c.undo();
        undone += 1;
    }
    assert_eq!(undone, 5);
    assert_eq!(c.layout(), &initial);
}

#[test]
fn redo_replays_to_the_same_final_tree() {
    init_logging();
    let node = sized(ComponentKind::Button, 100.0, 100.0, 100.0, 50.0);
    let mut c = CanvasController::new(Layout::from_components(vec![node]), view());

    select(&mut c, 110.0, 110.0);
    c.key("ArrowRight", Modifiers::SHIFT);
    c.key("ArrowDown", Modifiers::NONE);
    let final_tree = c.layout().clone();

    c.undo();
    c.undo();
    c.redo();
    c.redo();
    assert_eq!(c.layout(), &final_tree);
}

// ─── Scenario E: cut then undo ──────────────────────────────────────────

#[test]
fn cut_then_undo_resurrects_with_identity_and_selection() {
    init_logging();
    let mut node = sized(ComponentKind::Button, 250.0, 180.0, 120.0, 40.0);
    node.set_text_content("Buy now");
    let id = node.id;
    let props_before = node.props.clone();
    let mut c = CanvasController::new(Layout::from_components(vec![node]), view());

    select(&mut c, 260.0, 190.0);
    c.key("x", Modifiers::CTRL);
    assert!(c.layout().get(id).is_none());
    assert!(c.selection().is_empty());

    c.key("z", Modifiers::CTRL);
    let restored = c.layout().get(id).expect("node resurrected with same id");
    assert_eq!(restored.position, Point::new(250.0, 180.0));
    assert_eq!(restored.props, props_before);
    assert_eq!(c.active(), Some(id));
}

// ─── Clipboard semantics ────────────────────────────────────────────────

#[test]
fn paste_clones_with_fresh_ids_and_offset() {
    let node = sized(ComponentKind::Card, 100.0, 100.0, 150.0, 150.0);
    let id = node.id;
    let mut c = CanvasController::new(Layout::from_components(vec![node]), view());

    select(&mut c, 120.0, 120.0);
    c.key("c", Modifiers::CTRL);
    c.key("v", Modifiers::CTRL);

    assert_eq!(c.layout().len(), 2);
    let pasted_id = c.active().expect("paste selects the clone");
    assert_ne!(pasted_id, id);
    let pasted = c.layout().get(pasted_id).unwrap();
    assert_eq!(pasted.position, Point::new(120.0, 120.0));
    assert_eq!(pasted.kind, ComponentKind::Card);

    // Undo removes only the clone.
    c.key("z", Modifiers::CTRL);
    assert_eq!(c.layout().len(), 1);
    assert!(c.layout().get(id).is_some());
}

#[test]
fn paste_of_group_reassigns_every_nested_id() {
    let a = sized(ComponentKind::Button, 100.0, 100.0, 50.0, 50.0);
    let b = sized(ComponentKind::Text, 200.0, 100.0, 50.0, 50.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut c = CanvasController::new(Layout::from_components(vec![a, b]), view());

    select(&mut c, 110.0, 110.0);
    c.pointer_down(210.0, 110.0, PointerButton::Primary, Modifiers::CTRL);
    c.key("g", Modifiers::CTRL);
    let group_id = c.active().unwrap();

    c.key("c", Modifiers::CTRL);
    c.key("v", Modifiers::CTRL);

    let pasted_id = c.active().unwrap();
    assert_ne!(pasted_id, group_id);
    let pasted = c.layout().get(pasted_id).unwrap();
    assert_eq!(pasted.children.len(), 2);
    for child in &pasted.children {
        assert_ne!(child.id, a_id);
        assert_ne!(child.id, b_id);
    }
    // No duplicate ids anywhere after pasting a subtree.
    assert_eq!(c.layout().find_duplicate_id(), None);
}

#[test]
fn clipboard_targets_active_not_multi_selection() {
    // Cut/copy operate on the single active component even when a
    // multi-selection exists; grouping is the multi-select operation.
    let a = sized(ComponentKind::Button, 100.0, 100.0, 50.0, 50.0);
    let b = sized(ComponentKind::Card, 300.0, 100.0, 50.0, 50.0);
    let b_id = b.id;
    let mut c = CanvasController::new(Layout::from_components(vec![a, b]), view());

    select(&mut c, 110.0, 110.0);
    c.pointer_down(310.0, 110.0, PointerButton::Primary, Modifiers::CTRL);
    assert_eq!(c.selection().len(), 2);
    assert_eq!(c.active(), Some(b_id));

    c.key("c", Modifiers::CTRL);
    c.key("v", Modifiers::CTRL);
    // Only the active card was copied.
    assert_eq!(c.layout().len(), 3);
    assert_eq!(c.layout().get(c.active().unwrap()).unwrap().kind, ComponentKind::Card);
}

// ─── History boundaries ─────────────────────────────────────────────────

#[test]
fn undo_on_empty_history_is_silent() {
    let redo_combo = Modifiers {
        ctrl: true,
        shift: true,
        alt: false,
        meta: false,
    };
    let mut c = CanvasController::new(Layout::new(), view());
    c.key("z", Modifiers::CTRL);
    c.key("z", redo_combo);
    assert!(c.layout().is_empty());
}

#[test]
fn new_command_after_undo_discards_redo_branch() {
    let node = sized(ComponentKind::Button, 100.0, 100.0, 100.0, 50.0);
    let id = node.id;
    let mut c = CanvasController::new(Layout::from_components(vec![node]), view());

    select(&mut c, 110.0, 110.0);
    c.key("ArrowRight", Modifiers::NONE); // (101, 100)
    c.key("ArrowRight", Modifiers::NONE); // (102, 100)
    c.undo(); // back to (101, 100)
    assert!(c.can_redo());

    c.key("ArrowDown", Modifiers::NONE); // (101, 101) — branch discarded
    assert!(!c.can_redo());

    // Redo does nothing now.
    c.key("z", Modifiers { ctrl: true, shift: true, alt: false, meta: false });
    assert_eq!(c.layout().get(id).unwrap().position, Point::new(101.0, 101.0));
}
