//! Input feed for the dashboard: key mapping and blocking event sources.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::model::DashboardMsg;
use super::signals::SignalHandler;
use crate::core::errors::Result;

/// How often the terminal feed checks the shutdown flag while waiting for a key.
const SIGNAL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Route a terminal key event into the dashboard message stream.
#[must_use]
pub fn map_key_event(key: &KeyEvent) -> DashboardMsg {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            DashboardMsg::Quit
        }
        KeyCode::Char('q') | KeyCode::Esc => DashboardMsg::Quit,
        KeyCode::Up | KeyCode::Char('k') => DashboardMsg::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => DashboardMsg::MoveDown,
        KeyCode::Left | KeyCode::Char('h') => DashboardMsg::Decrease,
        KeyCode::Right | KeyCode::Char('l') => DashboardMsg::Increase,
        KeyCode::Char('r') => DashboardMsg::ResetAll,
        _ => DashboardMsg::Other,
    }
}

/// A blocking source of dashboard messages.
pub trait InputSource {
    /// Block until the next message is available.
    fn next_msg(&mut self) -> Result<DashboardMsg>;
}

/// Pre-recorded message feed. Once exhausted it reports `Interrupt`, the same
/// as a feed whose producer went away.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    queue: VecDeque<DashboardMsg>,
}

impl ScriptedInput {
    pub fn new(msgs: impl IntoIterator<Item = DashboardMsg>) -> Self {
        Self {
            queue: msgs.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputSource for ScriptedInput {
    fn next_msg(&mut self) -> Result<DashboardMsg> {
        Ok(self.queue.pop_front().unwrap_or(DashboardMsg::Interrupt))
    }
}

/// Keyboard feed backed by crossterm.
///
/// Waits for a key press without a timeout from the caller's point of view;
/// internally it wakes periodically only to observe SIGINT/SIGTERM, which it
/// reports as [`DashboardMsg::Interrupt`].
pub struct TerminalInput {
    signals: SignalHandler,
}

impl TerminalInput {
    #[must_use]
    pub fn new(signals: SignalHandler) -> Self {
        Self { signals }
    }
}

impl InputSource for TerminalInput {
    fn next_msg(&mut self) -> Result<DashboardMsg> {
        loop {
            if self.signals.should_shutdown() {
                return Ok(DashboardMsg::Interrupt);
            }
            if !event::poll(SIGNAL_POLL_INTERVAL)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(map_key_event(&key));
                }
                Event::Resize(..) => return Ok(DashboardMsg::Resized),
                _ => {}
            }
        }
    }
}
