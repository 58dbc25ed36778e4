pub mod id;
pub mod model;
pub mod tree;
pub mod view;
pub mod wire;

pub use id::ComponentId;
pub use model::*;
pub use tree::{Layout, RemovalSite};
pub use view::{CanvasView, MAX_ZOOM, MIN_ZOOM, ViewportRect, ZOOM_STEP};
pub use wire::{
    ComponentRow, ProjectSettings, ProjectSnapshot, flatten_layout, parse_layout, rebuild_layout,
    serialize_layout,
};
