//! Elm-style state model for the dashboard.
//!
//! All session state lives in [`DashboardModel`]. Input arrives as
//! [`DashboardMsg`] values; side-effects (mutation hook calls) are described by
//! [`DashboardCmd`] values returned from [`super::update::update`].
//!
//! **Design invariant:** the model is deterministic and testable; no I/O
//! happens here.

use std::ops::Range;

use crate::core::config::DashboardConfig;
use crate::core::parameter::{Parameter, ParameterList};
use crate::tui::window::visible_window;

// ──────────────────── session state ────────────────────

/// Controller lifecycle. `Exiting` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Running,
    Exiting,
}

// ──────────────────── messages ────────────────────

/// Discrete input events the controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardMsg {
    MoveUp,
    MoveDown,
    Decrease,
    Increase,
    /// Set every parameter to zero, clamped into its bounds.
    ResetAll,
    Quit,
    /// Process-level interrupt forwarded by the input feed; handled as quit.
    Interrupt,
    /// Any unrecognized key. Causes a redraw and nothing else.
    Other,
    /// The terminal was resized. Causes a full repaint and nothing else.
    Resized,
}

// ──────────────────── commands ────────────────────

/// A value change the runtime must report through the mutation hook.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub index: usize,
    pub name: String,
    pub value: f64,
}

/// Side-effects requested by the update function.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardCmd {
    None,
    /// Invoke the mutation hook with an already-clamped value.
    Notify(ValueChange),
    /// Execute each command in order.
    Batch(Vec<DashboardCmd>),
}

impl DashboardCmd {
    /// Flatten into the ordered list of hook notifications.
    #[must_use]
    pub fn into_changes(self) -> Vec<ValueChange> {
        match self {
            Self::None => Vec::new(),
            Self::Notify(change) => vec![change],
            Self::Batch(cmds) => cmds.into_iter().flat_map(Self::into_changes).collect(),
        }
    }
}

// ──────────────────── model ────────────────────

/// Everything the controller owns for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct DashboardModel {
    pub params: ParameterList,
    /// `None` when the list is empty; otherwise in `0..params.len()`.
    pub selected: Option<usize>,
    pub flanker_count: usize,
    pub increment: f64,
    pub state: SessionState,
    /// Last mutation hook failure, shown until the next successful call.
    pub hook_error: Option<String>,
    pub events_processed: u64,
    pub hook_calls: u64,
    pub hook_failures: u64,
}

impl DashboardModel {
    #[must_use]
    pub fn new(params: ParameterList, config: &DashboardConfig) -> Self {
        let selected = if params.is_empty() { None } else { Some(0) };
        Self {
            params,
            selected,
            flanker_count: config.flanker_count,
            increment: config.increment,
            state: SessionState::Running,
            hook_error: None,
            events_processed: 0,
            hook_calls: 0,
            hook_failures: 0,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    #[must_use]
    pub fn selected_param(&self) -> Option<&Parameter> {
        self.selected.and_then(|i| self.params.get(i))
    }

    /// Rows currently visible; recomputed from the selection on every call.
    #[must_use]
    pub fn window(&self) -> Range<usize> {
        visible_window(
            self.selected.unwrap_or(0),
            self.flanker_count,
            self.params.len(),
        )
    }

    pub(crate) fn select_prev(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        }
    }

    pub(crate) fn select_next(&mut self) {
        if let Some(i) = self.selected {
            let last = self.params.len().saturating_sub(1);
            self.selected = Some((i + 1).min(last));
        }
    }

    /// Step the selected parameter by `delta` and describe the resulting change.
    pub(crate) fn nudge_selected(&mut self, delta: f64) -> Option<ValueChange> {
        let index = self.selected?;
        let param = self.params.get_mut(index)?;
        param.set_value(param.value() + delta);
        Some(ValueChange {
            index,
            name: param.name().to_string(),
            value: param.value(),
        })
    }

    /// Zero every parameter (clamped) and describe the ones that moved.
    pub(crate) fn reset_all(&mut self) -> Vec<ValueChange> {
        let mut changes = Vec::new();
        for (index, param) in self.params.iter_mut().enumerate() {
            let before = param.value();
            param.set_value(0.0);
            if param.value().to_bits() != before.to_bits() {
                changes.push(ValueChange {
                    index,
                    name: param.name().to_string(),
                    value: param.value(),
                });
            }
        }
        changes
    }

    pub(crate) fn record_hook_success(&mut self) {
        self.hook_calls += 1;
        self.hook_error = None;
    }

    pub(crate) fn record_hook_failure(&mut self, message: String) {
        self.hook_calls += 1;
        self.hook_failures += 1;
        self.hook_error = Some(message);
    }
}
