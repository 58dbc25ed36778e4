//! Declarative action execution.
//!
//! Action-bearing components carry `ActionBinding`s in their props.
//! Running a trigger produces a list of pure `Effect` values for the
//! host shell to perform — navigation, clipboard, data mutations. The
//! renderer itself never does I/O, and nothing executes in editing mode:
//! actions are a published-site behavior, not a design-time one.

use crate::render::RenderMode;
use serde_json::Value;
use sf_core::model::{ActionHandler, ActionTrigger, ComponentNode, DataOperation};

/// A side effect requested by an executed action.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Navigate(String),
    ScrollTo(String),
    CopyToClipboard(String),
    ToggleVisibility(String),
    Data {
        table: String,
        operation: DataOperation,
        record: Value,
    },
    RunScript(String),
}

/// Execute a node's actions for one trigger. Always empty while editing.
pub fn run_actions(node: &ComponentNode, trigger: ActionTrigger, mode: RenderMode) -> Vec<Effect> {
    if mode == RenderMode::Editing {
        return Vec::new();
    }
    node.actions()
        .into_iter()
        .filter(|binding| binding.trigger == trigger)
        .map(|binding| match binding.handler {
            ActionHandler::Navigate { url } => Effect::Navigate(url),
            ActionHandler::ScrollToElement { target } => Effect::ScrollTo(target),
            ActionHandler::CopyToClipboard { text } => Effect::CopyToClipboard(text),
            ActionHandler::ToggleVisibility { target } => Effect::ToggleVisibility(target),
            ActionHandler::RemoteDataOperation {
                table,
                operation,
                record,
            } => Effect::Data {
                table,
                operation,
                record,
            },
            ActionHandler::CustomScript { code } => Effect::RunScript(code),
        })
        .collect()
}
