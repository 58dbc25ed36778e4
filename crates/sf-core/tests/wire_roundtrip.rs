//! Integration tests: wire-format round trips (sf-core).
//!
//! The JSON blob and the flattened row table are two shapes of the same
//! tree; both must survive a round trip exactly, for every component
//! kind, nested children, absent optional fields, and unknown tags.

use pretty_assertions::assert_eq;
use sf_core::model::ComponentKind;
use sf_core::wire::{flatten_layout, parse_layout, rebuild_layout, serialize_layout};

const FIXTURE: &str = include_str!("fixtures/landing_page.json");

#[test]
fn fixture_parses_and_covers_every_kind() {
    let layout = parse_layout(FIXTURE).expect("fixture parses");
    assert_eq!(layout.len(), 22);
    assert_eq!(layout.find_duplicate_id(), None);

    let mut kinds = std::collections::BTreeSet::new();
    layout.walk(&mut |node, _, _| {
        kinds.insert(node.kind.tag().to_string());
    });
    for tag in [
        "text",
        "heading",
        "paragraph",
        "section-heading",
        "button",
        "image",
        "container",
        "navbar",
        "hero",
        "footer",
        "input",
        "textarea",
        "form",
        "grid",
        "table",
        "card",
        "video",
        "gallery",
        "carousel",
        "group",
        "paymongo-button",
    ] {
        assert!(kinds.contains(tag), "fixture missing kind {tag}");
    }
    // Forward-compatibility: the unrecognized tag parsed as Unknown.
    assert!(kinds.contains("holo-widget"));
}

#[test]
fn json_blob_roundtrip_is_exact() {
    let layout = parse_layout(FIXTURE).unwrap();
    let serialized = serialize_layout(&layout).unwrap();
    let reparsed = parse_layout(&serialized).unwrap();
    assert_eq!(reparsed, layout);
}

#[test]
fn double_roundtrip_is_stable() {
    // serialize ∘ parse reaches a fixed point after one pass.
    let layout = parse_layout(FIXTURE).unwrap();
    let once = serialize_layout(&layout).unwrap();
    let twice = serialize_layout(&parse_layout(&once).unwrap()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn flatten_rebuild_roundtrip_preserves_nesting() {
    let layout = parse_layout(FIXTURE).unwrap();
    let rows = flatten_layout(&layout);
    // 22 roots + 2 grid cards + 2 group children.
    assert_eq!(rows.len(), 26);
    assert_eq!(rebuild_layout(rows), layout);
}

#[test]
fn unknown_kind_survives_both_wire_shapes() {
    let layout = parse_layout(FIXTURE).unwrap();
    let widget = layout
        .get(sf_core::ComponentId::intern("widget_future"))
        .unwrap();
    assert_eq!(widget.kind, ComponentKind::Unknown("holo-widget".into()));

    let rebuilt = rebuild_layout(flatten_layout(&layout));
    let widget = rebuilt
        .get(sf_core::ComponentId::intern("widget_future"))
        .unwrap();
    assert_eq!(widget.kind.tag(), "holo-widget");
}

#[test]
fn nested_group_children_keep_relative_positions() {
    let layout = parse_layout(FIXTURE).unwrap();
    let group = layout
        .get(sf_core::ComponentId::intern("group_footer_cta"))
        .unwrap();
    assert_eq!(group.children.len(), 2);
    assert_eq!(group.children[1].position.x, 240.0);

    let rows = flatten_layout(&layout);
    let child_row = rows
        .iter()
        .find(|r| r.id == sf_core::ComponentId::intern("button_footer_cta"))
        .unwrap();
    assert_eq!(child_row.parent_id, Some(group.id));
    assert_eq!(child_row.sort_order, 1);
    // Positions in the row table stay group-relative.
    assert_eq!(child_row.position.x, 240.0);
}
