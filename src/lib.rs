#![forbid(unsafe_code)]

//! Joint Dashboard (jdash): an interactive terminal panel for inspecting and
//! nudging a list of bounded numeric parameters, such as robot joint targets.
//!
//! Every edit is clamped into the parameter's bounds and handed to a
//! [`MutationHook`](tui::hook::MutationHook) before the panel is redrawn.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use joint_dashboard::prelude::*;
//!
//! let params = ParameterList::from_specs([ParameterSpec::new("knees", 0.0, 3.0, 0.75)])?;
//! let config = Config::load(None)?;
//! let mut dashboard = Dashboard::new(params, &config.dashboard, config.hook.on_error, NoopHook);
//! let summary = run_dashboard(&mut dashboard)?;
//! println!("{:?}", summary.params);
//! # Ok::<(), JdError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod tui;
