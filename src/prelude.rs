//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use joint_dashboard::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, DashboardConfig, HookConfig, HookPolicy};
pub use crate::core::errors::{JdError, Result};
pub use crate::core::parameter::{Parameter, ParameterList, ParameterSpec};

// Logging
pub use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

// Dashboard
pub use crate::tui::hook::{
    ChannelHook, MutationHook, NoopHook, RecordingHook, ThrottledHook, ValueUpdate,
};
pub use crate::tui::input::{InputSource, ScriptedInput, TerminalInput};
pub use crate::tui::model::{DashboardModel, DashboardMsg, SessionState};
pub use crate::tui::render::{CrosstermSurface, Frame, Surface, TextSurface};
pub use crate::tui::runtime::{Dashboard, SessionSummary, run_dashboard};
