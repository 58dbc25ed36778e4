pub mod commands;
pub mod controller;
pub mod input;
pub mod selection;
pub mod shortcuts;

pub use commands::{EditCommand, History};
pub use controller::{
    CanvasController, ChangeSink, ContextMenu, ContextMenuAction,
};
pub use input::{InputEvent, Modifiers, PointerButton};
pub use selection::Selection;
pub use shortcuts::{ShortcutAction, ShortcutMap};
