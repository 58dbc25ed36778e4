//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Platform
//! aware: the command role is ⌘ on macOS and Ctrl elsewhere, so either
//! modifier resolves. The controller suppresses all of these while a
//! text input, textarea, or content-editable element has focus.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Clipboard ──
    Cut,
    Copy,
    Paste,
    Duplicate,

    // ── History ──
    Undo,
    Redo,

    // ── Structure ──
    Group,
    Ungroup,
    Delete,

    // ── Z-order ──
    SendToBack,
    BringToFront,

    // ── Nudge (1px, 10px with Shift — magnitude decided by caller) ──
    NudgeLeft,
    NudgeRight,
    NudgeUp,
    NudgeDown,

    // ── UI ──
    /// Escape: closes an open context menu. Does not clear selection.
    CloseOverlay,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"ArrowLeft"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "g" | "G" => Some(ShortcutAction::Ungroup),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "x" | "X" => Some(ShortcutAction::Cut),
                "c" | "C" => Some(ShortcutAction::Copy),
                "v" | "V" => Some(ShortcutAction::Paste),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "g" | "G" => Some(ShortcutAction::Group),
                "[" => Some(ShortcutAction::SendToBack),
                "]" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        // ── Single keys (Shift only changes nudge magnitude) ──
        match key {
            "ArrowLeft" => Some(ShortcutAction::NudgeLeft),
            "ArrowRight" => Some(ShortcutAction::NudgeRight),
            "ArrowUp" => Some(ShortcutAction::NudgeUp),
            "ArrowDown" => Some(ShortcutAction::NudgeDown),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::CloseOverlay),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_undo_redo() {
        // Ctrl+Z and Cmd+Z → Undo
        assert_eq!(
            ShortcutMap::resolve("z", true, false, false, false),
            Some(ShortcutAction::Undo)
        );
        assert_eq!(
            ShortcutMap::resolve("z", false, false, false, true),
            Some(ShortcutAction::Undo)
        );
        // Cmd+Shift+Z and Cmd+Y → Redo
        assert_eq!(
            ShortcutMap::resolve("z", false, true, false, true),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(
            ShortcutMap::resolve("y", true, false, false, false),
            Some(ShortcutAction::Redo)
        );
    }

    #[test]
    fn resolve_clipboard() {
        assert_eq!(
            ShortcutMap::resolve("x", true, false, false, false),
            Some(ShortcutAction::Cut)
        );
        assert_eq!(
            ShortcutMap::resolve("c", false, false, false, true),
            Some(ShortcutAction::Copy)
        );
        assert_eq!(
            ShortcutMap::resolve("v", true, false, false, false),
            Some(ShortcutAction::Paste)
        );
        assert_eq!(
            ShortcutMap::resolve("d", true, false, false, false),
            Some(ShortcutAction::Duplicate)
        );
    }

    #[test]
    fn resolve_grouping() {
        assert_eq!(
            ShortcutMap::resolve("g", true, false, false, false),
            Some(ShortcutAction::Group)
        );
        assert_eq!(
            ShortcutMap::resolve("g", true, true, false, false),
            Some(ShortcutAction::Ungroup)
        );
        assert_eq!(
            ShortcutMap::resolve("G", false, true, false, true),
            Some(ShortcutAction::Ungroup)
        );
    }

    #[test]
    fn resolve_nudges_ignore_shift() {
        // Shift changes magnitude, not the action.
        assert_eq!(
            ShortcutMap::resolve("ArrowRight", false, false, false, false),
            Some(ShortcutAction::NudgeRight)
        );
        assert_eq!(
            ShortcutMap::resolve("ArrowDown", false, true, false, false),
            Some(ShortcutAction::NudgeDown)
        );
    }

    #[test]
    fn resolve_delete_and_escape() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::CloseOverlay)
        );
    }

    #[test]
    fn resolve_unknown_key() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("z", false, false, false, false), None);
    }

    #[test]
    fn resolve_z_order() {
        assert_eq!(
            ShortcutMap::resolve("[", true, false, false, false),
            Some(ShortcutAction::SendToBack)
        );
        assert_eq!(
            ShortcutMap::resolve("]", false, false, false, true),
            Some(ShortcutAction::BringToFront)
        );
    }
}
