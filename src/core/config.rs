//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{JdError, Result};

/// First panel row used by the parameter list (row 0 is the top border).
pub const LIST_START_ROW: u16 = 4;
/// Panel column of the selection marker.
pub const MARKER_COL: u16 = 2;
/// Panel column where parameter names begin.
pub const NAME_COL: u16 = 5;

/// Full dashboard configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub dashboard: DashboardConfig,
    pub hook: HookConfig,
    #[serde(skip)]
    pub config_file: PathBuf,
}

/// Layout and step-size knobs. None of these affect the clamping or
/// windowing invariants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Text drawn on the top border.
    pub title: String,
    /// Heading drawn above the list.
    pub heading: String,
    pub panel_height: u16,
    pub panel_width: u16,
    /// Terminal column of the panel's top-left corner.
    pub origin_col: u16,
    /// Terminal row of the panel's top-left corner.
    pub origin_row: u16,
    /// Rows shown above and below the selection when the list is long enough.
    pub flanker_count: usize,
    /// Fixed step in the parameter's own unit; not scaled by its range.
    pub increment: f64,
    pub bar_track_length: usize,
    pub value_column_width: usize,
    pub name_column_width: usize,
}

/// What the controller does when the mutation hook returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookPolicy {
    /// Keep the change, record the failure, keep running.
    #[default]
    Continue,
    /// Leave the session and surface the hook's error.
    Abort,
}

impl std::str::FromStr for HookPolicy {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(format!("expected \"continue\" or \"abort\", got {other:?}")),
        }
    }
}

/// Mutation hook delivery settings used by the binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HookConfig {
    pub on_error: HookPolicy,
    /// Rate-limit delay applied after each delivered change.
    pub delay_ms: u64,
    /// JSONL activity log that records every delivered change.
    pub activity_log: PathBuf,
    /// Bound of the change queue between the UI and the dispatcher.
    pub channel_capacity: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: " Joint Control ".to_string(),
            heading: "Joints:".to_string(),
            panel_height: 15,
            panel_width: 50,
            origin_col: 5,
            origin_row: 1,
            flanker_count: 3,
            increment: 0.05,
            bar_track_length: 11,
            value_column_width: 6,
            name_column_width: 10,
        }
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            on_error: HookPolicy::Continue,
            delay_ms: 30,
            activity_log: home_dir()
                .join(".local")
                .join("share")
                .join("jdash")
                .join("activity.jsonl"),
            channel_capacity: 64,
        }
    }
}

impl DashboardConfig {
    /// Panel column where the bar (including its left delimiter) begins.
    #[must_use]
    pub fn bar_col(&self) -> usize {
        usize::from(NAME_COL)
            .saturating_add(self.name_column_width)
            .saturating_add(5)
    }

    /// Panel column where the truncated value begins.
    #[must_use]
    pub fn value_col(&self) -> usize {
        self.bar_col()
            .saturating_add(self.bar_track_length)
            .saturating_add(2 + 7)
    }

    /// Maximum number of rows the window can produce.
    #[must_use]
    pub fn window_rows(&self) -> usize {
        self.flanker_count.saturating_mul(2).saturating_add(1)
    }

    fn validate(&self) -> Result<()> {
        if !self.increment.is_finite() || self.increment <= 0.0 {
            return Err(invalid(format!(
                "dashboard.increment must be finite and > 0, got {}",
                self.increment
            )));
        }
        if self.bar_track_length < 2 {
            return Err(invalid(format!(
                "dashboard.bar_track_length must be >= 2, got {}",
                self.bar_track_length
            )));
        }
        if self.value_column_width == 0 {
            return Err(invalid("dashboard.value_column_width must be >= 1"));
        }
        if self.name_column_width == 0 {
            return Err(invalid("dashboard.name_column_width must be >= 1"));
        }

        // Column and row sums saturate, so oversized widths land above any u16 panel.
        let last_row = usize::from(LIST_START_ROW).saturating_add(self.window_rows());
        if last_row > usize::from(self.panel_height).saturating_sub(1) {
            return Err(invalid(format!(
                "dashboard.panel_height {} cannot hold {} rows (flanker_count {})",
                self.panel_height,
                self.window_rows(),
                self.flanker_count
            )));
        }

        let right_edge = self.value_col().saturating_add(self.value_column_width);
        if right_edge > usize::from(self.panel_width).saturating_sub(1) {
            return Err(invalid(format!(
                "dashboard.panel_width {} is too narrow; columns need {}",
                self.panel_width,
                right_edge.saturating_add(1)
            )));
        }

        let footer = crate::tui::render::FOOTER_TEXT.chars().count() + 2;
        if footer > usize::from(self.panel_width) {
            return Err(invalid(format!(
                "dashboard.panel_width {} cannot fit the help footer",
                self.panel_width
            )));
        }

        Ok(())
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        home_dir().join(".config").join("jdash").join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| JdError::Io {
                path: path_buf.clone(),
                source,
            })?;
            toml::from_str::<Self>(&raw)?
        } else if is_explicit_path {
            return Err(JdError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.config_file = path_buf;
        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.dashboard.validate()?;
        if self.hook.channel_capacity == 0 {
            return Err(invalid("hook.channel_capacity must be >= 1"));
        }
        Ok(())
    }

    fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = &mut self.dashboard;
        set_parsed(&lookup, "JD_FLANKER_COUNT", &mut d.flanker_count)?;
        set_parsed(&lookup, "JD_INCREMENT", &mut d.increment)?;
        set_parsed(&lookup, "JD_BAR_TRACK_LENGTH", &mut d.bar_track_length)?;
        set_parsed(&lookup, "JD_VALUE_COLUMN_WIDTH", &mut d.value_column_width)?;
        set_parsed(&lookup, "JD_NAME_COLUMN_WIDTH", &mut d.name_column_width)?;
        set_parsed(&lookup, "JD_PANEL_HEIGHT", &mut d.panel_height)?;
        set_parsed(&lookup, "JD_PANEL_WIDTH", &mut d.panel_width)?;

        let h = &mut self.hook;
        set_parsed(&lookup, "JD_HOOK_ON_ERROR", &mut h.on_error)?;
        set_parsed(&lookup, "JD_HOOK_DELAY_MS", &mut h.delay_ms)?;
        if let Some(raw) = lookup("JD_ACTIVITY_LOG") {
            h.activity_log = PathBuf::from(raw);
        }
        Ok(())
    }
}

fn invalid(details: impl Into<String>) -> JdError {
    JdError::InvalidConfig {
        details: details.into(),
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[JD-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn set_parsed<F, T>(lookup: &F, name: &str, slot: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(name) {
        *slot = raw.trim().parse::<T>().map_err(|error| JdError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })?;
    }
    Ok(())
}
