//! Core component-tree data model for siteforge layouts.
//!
//! A layout is a tree of `ComponentNode` values: each node carries a
//! closed `ComponentKind` tag, an open props map (type-specific
//! configuration), an open style map (CSS-like presentation), a
//! canvas-space position, and — for container kinds — exclusively owned
//! children. The tree is the wire format: it serializes to JSON and must
//! round-trip exactly, including nested children and unknown kinds.

use crate::id::ComponentId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::BTreeMap;

// ─── Geometry ────────────────────────────────────────────────────────────

/// A point in canvas-space (unscaled) coordinates, origin at the
/// top-left of the virtual canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounds in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// AABB overlap check. Used for marquee selection.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);
        Rect {
            x,
            y,
            width: right - x,
            height: bottom - y,
        }
    }
}

// ─── Component kinds ─────────────────────────────────────────────────────

/// The closed set of component tags.
///
/// `Unknown` preserves any unrecognized tag byte-for-byte so a layout
/// written by a newer version still round-trips and renders as a
/// placeholder instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    Text,
    Heading,
    Paragraph,
    SectionHeading,
    Button,
    Image,
    Container,
    Navbar,
    Hero,
    Footer,
    Input,
    Textarea,
    Form,
    Grid,
    Table,
    Card,
    Video,
    Gallery,
    Carousel,
    Group,
    PaymongoButton,
    Unknown(String),
}

impl ComponentKind {
    /// The wire tag for this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::SectionHeading => "section-heading",
            Self::Button => "button",
            Self::Image => "image",
            Self::Container => "container",
            Self::Navbar => "navbar",
            Self::Hero => "hero",
            Self::Footer => "footer",
            Self::Input => "input",
            Self::Textarea => "textarea",
            Self::Form => "form",
            Self::Grid => "grid",
            Self::Table => "table",
            Self::Card => "card",
            Self::Video => "video",
            Self::Gallery => "gallery",
            Self::Carousel => "carousel",
            Self::Group => "group",
            Self::PaymongoButton => "paymongo-button",
            Self::Unknown(tag) => tag,
        }
    }

    /// Parse a wire tag. Never fails — unrecognized tags become
    /// `Unknown` and are carried through unchanged.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "text" => Self::Text,
            "heading" => Self::Heading,
            "paragraph" => Self::Paragraph,
            "section-heading" => Self::SectionHeading,
            "button" => Self::Button,
            "image" => Self::Image,
            "container" => Self::Container,
            "navbar" => Self::Navbar,
            "hero" => Self::Hero,
            "footer" => Self::Footer,
            "input" => Self::Input,
            "textarea" => Self::Textarea,
            "form" => Self::Form,
            "grid" => Self::Grid,
            "table" => Self::Table,
            "card" => Self::Card,
            "video" => Self::Video,
            "gallery" => Self::Gallery,
            "carousel" => Self::Carousel,
            "group" => Self::Group,
            "paymongo-button" => Self::PaymongoButton,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Fallback dimensions applied when the style map sets neither
    /// `width` nor `height`.
    pub fn default_size(&self) -> Size {
        match self {
            Self::Text => Size::new(200.0, 40.0),
            Self::Heading => Size::new(400.0, 60.0),
            Self::Paragraph => Size::new(400.0, 96.0),
            Self::SectionHeading => Size::new(600.0, 52.0),
            Self::Button => Size::new(160.0, 48.0),
            Self::Image => Size::new(320.0, 240.0),
            Self::Container => Size::new(600.0, 400.0),
            Self::Navbar => Size::new(1200.0, 64.0),
            Self::Hero => Size::new(1200.0, 480.0),
            Self::Footer => Size::new(1200.0, 160.0),
            Self::Input => Size::new(280.0, 44.0),
            Self::Textarea => Size::new(320.0, 120.0),
            Self::Form => Size::new(400.0, 360.0),
            Self::Grid => Size::new(600.0, 400.0),
            Self::Table => Size::new(640.0, 320.0),
            Self::Card => Size::new(320.0, 380.0),
            Self::Video => Size::new(480.0, 270.0),
            Self::Gallery => Size::new(640.0, 420.0),
            Self::Carousel => Size::new(800.0, 360.0),
            Self::Group => Size::new(200.0, 200.0),
            Self::PaymongoButton => Size::new(200.0, 56.0),
            Self::Unknown(_) => Size::new(200.0, 120.0),
        }
    }

    /// Whether children are meaningful for this kind.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Group | Self::Grid)
    }

    /// The prop key holding inline-editable text, if this kind has one.
    pub fn editable_text_prop(&self) -> Option<&'static str> {
        match self {
            Self::Text | Self::Heading | Self::Paragraph | Self::SectionHeading => Some("text"),
            Self::Button | Self::PaymongoButton => Some("label"),
            _ => None,
        }
    }
}

impl Serialize for ComponentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ComponentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ComponentKind::from_tag(&s))
    }
}

// ─── Actions ─────────────────────────────────────────────────────────────

/// Event that fires a declarative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionTrigger {
    #[serde(rename = "onClick")]
    Click,
    #[serde(rename = "onHover")]
    Hover,
    #[serde(rename = "onFocus")]
    Focus,
    #[serde(rename = "onBlur")]
    Blur,
}

/// Operation kind for remote-data actions and `DataSource::mutate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOperation {
    Insert,
    Update,
    Delete,
}

/// What a declarative action does, discriminated by `handlerType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "handlerType", rename_all = "kebab-case")]
pub enum ActionHandler {
    Navigate {
        url: String,
    },
    ScrollToElement {
        target: String,
    },
    CopyToClipboard {
        text: String,
    },
    ToggleVisibility {
        target: String,
    },
    RemoteDataOperation {
        table: String,
        operation: DataOperation,
        #[serde(default)]
        record: Value,
    },
    CustomScript {
        code: String,
    },
}

/// A declarative action binding carried in `props["actions"]`.
/// Actions execute only in preview/published mode, never while editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub trigger: ActionTrigger,
    #[serde(flatten)]
    pub handler: ActionHandler,
}

// ─── Component nodes ─────────────────────────────────────────────────────

/// A single node in the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    /// Opaque unique id, stable for the node's lifetime. Map key for
    /// the remote parent-pointer table, so it must be unique across the
    /// entire flattened tree.
    pub id: ComponentId,

    /// Component tag. Determines the rendering/behavior branch.
    #[serde(rename = "type")]
    pub kind: ComponentKind,

    /// Type-specific configuration: text content, image source, action
    /// bindings, data-source bindings. Unique keys, order irrelevant.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, Value>,

    /// Presentational attributes, CSS-like (`width`, `height`, colors,
    /// spacing). Order irrelevant.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,

    /// Canvas-space position, independent of zoom and scroll.
    pub position: Point,

    /// Ordered children, owned exclusively by this node. Only
    /// meaningful for container kinds; empty means leaf.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentNode>,
}

impl ComponentNode {
    /// Create a node with a fresh unique id and the kind's default props.
    pub fn new(kind: ComponentKind, position: Point) -> Self {
        let id = ComponentId::with_prefix(kind.tag());
        let mut props = BTreeMap::new();
        if let Some(key) = kind.editable_text_prop() {
            props.insert(key.to_string(), Value::String(default_text_for(&kind)));
        }
        Self {
            id,
            kind,
            props,
            style: BTreeMap::new(),
            position,
            children: Vec::new(),
        }
    }

    /// Effective size: style `width`/`height` (px values) when present,
    /// else the kind's defaults.
    pub fn size(&self) -> Size {
        let fallback = self.kind.default_size();
        Size {
            width: self
                .style
                .get("width")
                .and_then(|v| parse_px(v))
                .unwrap_or(fallback.width),
            height: self
                .style
                .get("height")
                .and_then(|v| parse_px(v))
                .unwrap_or(fallback.height),
        }
    }

    pub fn bounds(&self) -> Rect {
        let size = self.size();
        Rect {
            x: self.position.x,
            y: self.position.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn set_size(&mut self, size: Size) {
        self.style.insert("width".into(), format_px(size.width));
        self.style.insert("height".into(), format_px(size.height));
    }

    /// String prop lookup.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// The inline-editable text of this node, if its kind has one.
    pub fn text_content(&self) -> Option<&str> {
        self.kind.editable_text_prop().and_then(|k| self.prop_str(k))
    }

    pub fn set_text_content(&mut self, text: &str) {
        if let Some(key) = self.kind.editable_text_prop() {
            self.props
                .insert(key.to_string(), Value::String(text.to_string()));
        }
    }

    /// Parse the declarative action bindings out of `props["actions"]`.
    /// Malformed entries are skipped, not fatal.
    pub fn actions(&self) -> SmallVec<[ActionBinding; 2]> {
        let mut out = SmallVec::new();
        let Some(Value::Array(entries)) = self.props.get("actions") else {
            return out;
        };
        for entry in entries {
            match serde_json::from_value::<ActionBinding>(entry.clone()) {
                Ok(binding) => out.push(binding),
                Err(err) => {
                    log::warn!("skipping malformed action on {}: {err}", self.id);
                }
            }
        }
        out
    }

    /// Deep clone with fresh ids throughout the subtree. Positions,
    /// props, and style are preserved; every id is re-generated so the
    /// clone can live in the same tree as the original.
    pub fn clone_with_new_ids(&self) -> ComponentNode {
        let mut clone = self.clone();
        clone.reassign_ids();
        clone
    }

    fn reassign_ids(&mut self) {
        self.id = ComponentId::with_prefix(self.kind.tag());
        for child in &mut self.children {
            child.reassign_ids();
        }
    }
}

/// Placeholder text for freshly dropped text-bearing components.
fn default_text_for(kind: &ComponentKind) -> String {
    match kind {
        ComponentKind::Heading => "Heading".to_string(),
        ComponentKind::SectionHeading => "Section".to_string(),
        ComponentKind::Paragraph => "Write something here.".to_string(),
        ComponentKind::Button => "Click me".to_string(),
        ComponentKind::PaymongoButton => "Pay now".to_string(),
        _ => "Text".to_string(),
    }
}

/// Parse a CSS-ish pixel value: `"200"`, `"200px"`, `"  120.5px "`.
pub fn parse_px(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

/// Emit a pixel value the way the style map stores them.
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{value}px")
    }
}
