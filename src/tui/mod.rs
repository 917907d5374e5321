//! Interactive joint-control panel.
//!
//! Split along the same seams as any Elm-style terminal app: `model` holds
//! state, `update` is the pure transition, `render` turns state into a frame,
//! and `runtime` wires input, hooks, and a surface into the blocking loop.

#![allow(missing_docs)]

pub mod bar;
pub mod hook;
pub mod input;
pub mod model;
pub mod render;
pub mod runtime;
pub mod signals;
pub mod terminal_guard;
pub mod update;
pub mod window;

pub use hook::{ChannelHook, MutationHook, NoopHook, RecordingHook, ThrottledHook, ValueUpdate};
pub use input::{InputSource, ScriptedInput, TerminalInput};
pub use model::{DashboardModel, DashboardMsg, SessionState};
pub use render::{CrosstermSurface, Frame, Surface, TextSurface};
pub use runtime::{Dashboard, SessionSummary, run_dashboard};
