//! Component tree → declarative render tree.
//!
//! Walks the layout and emits `RenderNode` values the host shell turns
//! into real UI. The same walk serves both modes: editing adds selection
//! and resize affordances; preview strips them and leaves form controls
//! live. One branch per `ComponentKind` variant — the compiler enforces
//! that every kind has a rendering, and `Unknown` degrades to a visible
//! placeholder instead of taking the canvas down.

use crate::table::{TableBinding, TableState};
use sf_core::ComponentId;
use sf_core::model::{ComponentKind, ComponentNode};
use sf_core::tree::Layout;
use std::collections::{BTreeMap, HashMap};

/// Editing shows affordances and suppresses actions; preview is the
/// published rendering where actions and form controls are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Editing,
    Preview,
}

/// One of the eight resize affordances drawn on a selected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::North => "sf-handle-n",
            Self::South => "sf-handle-s",
            Self::East => "sf-handle-e",
            Self::West => "sf-handle-w",
            Self::NorthEast => "sf-handle-ne",
            Self::NorthWest => "sf-handle-nw",
            Self::SouthEast => "sf-handle-se",
            Self::SouthWest => "sf-handle-sw",
        }
    }

    /// Whether dragging this handle moves the left edge.
    pub fn affects_left(&self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn affects_top(&self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    /// Whether dragging this handle changes width.
    pub fn affects_width(&self) -> bool {
        !matches!(self, Self::North | Self::South)
    }

    /// Whether dragging this handle changes height.
    pub fn affects_height(&self) -> bool {
        !matches!(self, Self::East | Self::West)
    }
}

/// A node of the declarative output tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub tag: &'static str,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    pub fn element(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: BTreeMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn class(&self) -> Option<&str> {
        self.attrs.get("class").map(String::as_str)
    }
}

/// Everything the renderer needs besides the tree itself.
pub struct RenderContext<'a> {
    pub mode: RenderMode,
    /// Currently selected ids; empty in preview.
    pub selected: &'a [ComponentId],
    /// Node in inline text-edit mode, if any.
    pub editing: Option<ComponentId>,
    /// Live table bindings keyed by component id.
    pub tables: Option<&'a HashMap<ComponentId, TableBinding>>,
}

impl RenderContext<'_> {
    pub fn preview() -> RenderContext<'static> {
        RenderContext {
            mode: RenderMode::Preview,
            selected: &[],
            editing: None,
            tables: None,
        }
    }

    fn is_selected(&self, id: ComponentId) -> bool {
        self.mode == RenderMode::Editing && self.selected.contains(&id)
    }
}

/// Render the whole layout into a canvas root node.
pub fn render_layout(layout: &Layout, ctx: &RenderContext<'_>) -> RenderNode {
    let mut root = RenderNode::element("div").attr("class", "sf-canvas");
    for component in &layout.components {
        root.children.push(render_component(component, ctx));
    }
    root
}

/// Render a single component (and, for containers, its children).
pub fn render_component(node: &ComponentNode, ctx: &RenderContext<'_>) -> RenderNode {
    let mut out = match &node.kind {
        ComponentKind::Text => text_element("span", "sf-text", node, ctx),
        ComponentKind::Heading => text_element("h2", "sf-heading", node, ctx),
        ComponentKind::Paragraph => text_element("p", "sf-paragraph", node, ctx),
        ComponentKind::SectionHeading => text_element("h3", "sf-section-heading", node, ctx),
        ComponentKind::Button => text_element("button", "sf-button", node, ctx),
        ComponentKind::PaymongoButton => {
            let mut el = text_element("button", "sf-paymongo-button", node, ctx);
            if let Some(link) = node.prop_str("paymentLink") {
                el = el.attr("data-checkout", link);
            }
            el
        }
        ComponentKind::Image => RenderNode::element("img")
            .attr("class", "sf-image")
            .attr("src", node.prop_str("src").unwrap_or(""))
            .attr("alt", node.prop_str("alt").unwrap_or("")),
        ComponentKind::Video => RenderNode::element("video")
            .attr("class", "sf-video")
            .attr("src", node.prop_str("src").unwrap_or(""))
            .attr("controls", "true"),
        ComponentKind::Container => RenderNode::element("div").attr("class", "sf-container"),
        ComponentKind::Navbar => RenderNode::element("nav").attr("class", "sf-navbar"),
        ComponentKind::Hero => RenderNode::element("section").attr("class", "sf-hero"),
        ComponentKind::Footer => RenderNode::element("footer").attr("class", "sf-footer"),
        ComponentKind::Card => RenderNode::element("div").attr("class", "sf-card"),
        ComponentKind::Gallery => RenderNode::element("div").attr("class", "sf-gallery"),
        ComponentKind::Carousel => RenderNode::element("div").attr("class", "sf-carousel"),
        ComponentKind::Form => RenderNode::element("form").attr("class", "sf-form"),
        ComponentKind::Input => {
            let mut el = RenderNode::element("input")
                .attr("class", "sf-input")
                .attr("placeholder", node.prop_str("placeholder").unwrap_or(""));
            // Form controls are inert while designing, live when published.
            if ctx.mode == RenderMode::Editing {
                el = el.attr("disabled", "true");
            }
            el
        }
        ComponentKind::Textarea => {
            let mut el = RenderNode::element("textarea")
                .attr("class", "sf-textarea")
                .attr("placeholder", node.prop_str("placeholder").unwrap_or(""));
            if ctx.mode == RenderMode::Editing {
                el = el.attr("disabled", "true");
            }
            el
        }
        ComponentKind::Table => render_table(node, ctx),
        ComponentKind::Group => RenderNode::element("div").attr("class", "sf-group"),
        ComponentKind::Grid => RenderNode::element("div").attr("class", "sf-grid"),
        ComponentKind::Unknown(tag) => {
            log::warn!("rendering placeholder for unknown component kind {tag:?}");
            RenderNode::element("div")
                .attr("class", "sf-unknown")
                .text(format!("Unknown component \"{tag}\""))
        }
    };

    out = out
        .attr("id", node.id.as_str())
        .attr("data-kind", node.kind.tag().to_string())
        .attr("style", inline_style(node));

    if node.kind.is_container() {
        for child in &node.children {
            out.children.push(render_component(child, ctx));
        }
    }

    if ctx.mode == RenderMode::Preview {
        let actions = node.actions();
        if !actions.is_empty() {
            out = out.attr("data-actions", actions.len().to_string());
        }
    }

    if ctx.is_selected(node.id) {
        out = out.attr("data-selected", "true");
        // Resize handles exist only while editing.
        for handle in ResizeHandle::ALL {
            out.children.push(
                RenderNode::element("div").attr("class", format!("sf-handle {}", handle.css_class())),
            );
        }
    }

    out
}

fn text_element(
    tag: &'static str,
    class: &str,
    node: &ComponentNode,
    ctx: &RenderContext<'_>,
) -> RenderNode {
    let mut el = RenderNode::element(tag)
        .attr("class", class)
        .text(node.text_content().unwrap_or(""));
    if ctx.mode == RenderMode::Editing && ctx.editing == Some(node.id) {
        el = el.attr("contenteditable", "true");
    }
    el
}

fn render_table(node: &ComponentNode, ctx: &RenderContext<'_>) -> RenderNode {
    let binding = ctx.tables.and_then(|t| t.get(&node.id));
    let mut table = RenderNode::element("table").attr("class", "sf-table");

    let Some(binding) = binding else {
        return table.attr("data-state", "unbound");
    };

    match binding.state() {
        TableState::Unbound => table.attr("data-state", "unbound"),
        TableState::Loading => table.attr("data-state", "loading"),
        TableState::Loaded { .. } | TableState::Error { .. } => {
            let state = if matches!(binding.state(), TableState::Error { .. }) {
                "error"
            } else {
                "loaded"
            };
            table = table.attr("data-state", state);

            let headers = binding.headers();
            let mut head_row = RenderNode::element("tr");
            for header in headers {
                head_row
                    .children
                    .push(RenderNode::element("th").text(header.clone()));
            }
            let mut thead = RenderNode::element("thead");
            thead.children.push(head_row);
            table.children.push(thead);

            let mut tbody = RenderNode::element("tbody");
            for row in binding.rows() {
                let mut tr = RenderNode::element("tr");
                for header in headers {
                    tr.children
                        .push(RenderNode::element("td").text(binding.cell(row, header)));
                }
                tbody.children.push(tr);
            }
            table.children.push(tbody);
            table
        }
    }
}

/// Inline style string: geometry first, then the node's style map
/// (which is ordered, so output is deterministic). `width`/`height`
/// come from the effective size so kind defaults apply.
fn inline_style(node: &ComponentNode) -> String {
    let size = node.size();
    let mut style = format!(
        "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;",
        node.position.x, node.position.y, size.width, size.height
    );
    for (key, value) in &node.style {
        if key == "width" || key == "height" {
            continue;
        }
        style.push_str(key);
        style.push(':');
        style.push_str(value);
        style.push(';');
    }
    style
}
