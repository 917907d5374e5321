//! Pure update function for the Elm-style dashboard.
//!
//! `update()` takes the current model and a message, mutates the model, and
//! returns a command describing the hook calls the runtime should make.
//!
//! **Design invariant:** this module performs zero I/O.

use super::model::{DashboardCmd, DashboardModel, DashboardMsg, SessionState};

/// Apply one input event to the model.
///
/// Messages arriving after the session has left `Running` are ignored.
pub fn update(model: &mut DashboardModel, msg: DashboardMsg) -> DashboardCmd {
    if !model.is_running() {
        return DashboardCmd::None;
    }
    model.events_processed += 1;

    match msg {
        DashboardMsg::MoveUp => {
            model.select_prev();
            DashboardCmd::None
        }
        DashboardMsg::MoveDown => {
            model.select_next();
            DashboardCmd::None
        }
        DashboardMsg::Decrease => {
            let step = -model.increment;
            model
                .nudge_selected(step)
                .map_or(DashboardCmd::None, DashboardCmd::Notify)
        }
        DashboardMsg::Increase => {
            let step = model.increment;
            model
                .nudge_selected(step)
                .map_or(DashboardCmd::None, DashboardCmd::Notify)
        }
        DashboardMsg::ResetAll => {
            let changes = model.reset_all();
            if changes.is_empty() {
                DashboardCmd::None
            } else {
                DashboardCmd::Batch(changes.into_iter().map(DashboardCmd::Notify).collect())
            }
        }
        DashboardMsg::Quit | DashboardMsg::Interrupt => {
            model.state = SessionState::Exiting;
            DashboardCmd::None
        }
        DashboardMsg::Other | DashboardMsg::Resized => DashboardCmd::None,
    }
}
