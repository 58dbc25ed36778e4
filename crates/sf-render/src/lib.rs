pub mod actions;
pub mod hit;
pub mod render;
pub mod table;

pub use actions::{Effect, run_actions};
pub use hit::{hit_test, hit_test_rect};
pub use render::{
    RenderContext, RenderMode, RenderNode, ResizeHandle, render_component, render_layout,
};
pub use table::{
    DataChanged, DataEvents, DataSource, QueryOptions, Row, SortConfig, TableBinding, TableState,
    mutate_and_notify,
};
