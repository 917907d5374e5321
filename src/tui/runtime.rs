//! Dashboard controller: the blocking read → update → hook → redraw loop.

#![allow(missing_docs)]

use super::hook::MutationHook;
use super::input::{InputSource, TerminalInput};
use super::model::{DashboardModel, DashboardMsg, SessionState};
use super::render::{CrosstermSurface, Frame, Surface, build_frame};
use super::signals::SignalHandler;
use super::terminal_guard::TerminalGuard;
use super::update::update;
use crate::core::config::{DashboardConfig, HookPolicy};
use crate::core::errors::Result;
use crate::core::parameter::ParameterList;

/// Outcome of a finished session.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub params: ParameterList,
    pub selected: Option<usize>,
    pub state: SessionState,
    pub events_processed: u64,
    pub hook_calls: u64,
    pub hook_failures: u64,
}

/// Owns the parameter list, selection, and mutation hook for one session.
pub struct Dashboard<H> {
    model: DashboardModel,
    config: DashboardConfig,
    policy: HookPolicy,
    hook: H,
}

impl<H: MutationHook> Dashboard<H> {
    pub fn new(
        params: ParameterList,
        config: &DashboardConfig,
        policy: HookPolicy,
        hook: H,
    ) -> Self {
        Self {
            model: DashboardModel::new(params, config),
            config: config.clone(),
            policy,
            hook,
        }
    }

    #[must_use]
    pub fn model(&self) -> &DashboardModel {
        &self.model
    }

    #[must_use]
    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn into_hook(self) -> H {
        self.hook
    }

    /// Describe the panel as it should look right now.
    #[must_use]
    pub fn frame(&self) -> Frame {
        build_frame(&self.model, &self.config)
    }

    /// Apply one message and deliver the resulting value changes to the hook,
    /// in order, before returning.
    ///
    /// Under [`HookPolicy::Continue`] a failing hook is recorded on the model
    /// and the loop carries on. Under [`HookPolicy::Abort`] the session moves
    /// to `Exiting` and the hook's error is returned.
    pub fn handle(&mut self, msg: DashboardMsg) -> Result<()> {
        for change in update(&mut self.model, msg).into_changes() {
            match self.hook.on_change(&change.name, change.value) {
                Ok(()) => self.model.record_hook_success(),
                Err(err) => {
                    self.model.record_hook_failure(err.to_string());
                    if self.policy == HookPolicy::Abort {
                        self.model.state = SessionState::Exiting;
                        return Err(err);
                    }
                }
            }
        }
        Ok(())
    }

    /// Drive the session until a quit or interrupt message arrives.
    ///
    /// Draws once up front, then redraws after every handled message,
    /// including unrecognized keys. Nothing is drawn while waiting for input.
    pub fn run<I, S>(&mut self, input: &mut I, surface: &mut S) -> Result<SessionSummary>
    where
        I: InputSource,
        S: Surface,
    {
        surface.draw(&self.frame())?;
        while self.model.is_running() {
            let msg = input.next_msg()?;
            self.handle(msg)?;
            if !self.model.is_running() {
                break;
            }
            if msg == DashboardMsg::Resized {
                surface.invalidate();
            }
            surface.draw(&self.frame())?;
        }
        Ok(self.summary())
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            params: self.model.params.clone(),
            selected: self.model.selected,
            state: self.model.state,
            events_processed: self.model.events_processed,
            hook_calls: self.model.hook_calls,
            hook_failures: self.model.hook_failures,
        }
    }
}

/// Run a session on the real terminal.
///
/// The terminal is acquired before the first draw and released when this
/// function returns, whether through quit, an error, or SIGINT/SIGTERM.
/// SIGINT/SIGTERM are only intercepted while the session runs; afterwards
/// they take their default action again.
///
/// A panic hook that releases the terminal is chained in front of the
/// caller's hook for the duration of the session and removed on return.
///
/// # Errors
/// Returns terminal I/O errors, or the hook's error under `HookPolicy::Abort`.
pub fn run_dashboard<H: MutationHook>(dashboard: &mut Dashboard<H>) -> Result<SessionSummary> {
    // Declared before the guard so the signals are only handed back after the
    // terminal has been restored.
    let signals = SignalHandler::new();
    let _guard = TerminalGuard::new()?;
    let mut input = TerminalInput::new(signals.clone());
    let mut surface = CrosstermSurface::stdout();
    dashboard.run(&mut input, &mut surface)
}
