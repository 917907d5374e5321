//! JSONL activity log: one self-contained JSON object per line.
//!
//! Lines are assembled in memory and written with a single `write_all` so a
//! concurrent `tail -f` never sees half a record.
//!
//! Degradation chain:
//! 1. Primary file path
//! 2. stderr with `[JD-JSONL]` prefix
//! 3. Silent discard (the dashboard never stops because logging failed)
//!
//! While the panel owns the terminal, stderr output would draw over it.
//! [`JsonlWriter::hold_stderr`] parks everything bound for stderr in memory
//! until [`JsonlWriter::release_stderr`] is called after the terminal is
//! restored.

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::core::errors::{JdError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    SessionStart,
    SessionStop,
    ValueChange,
    HookFailure,
}

/// A single activity record. Only `ts`, `event` and `severity` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Position in the session's change stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
    /// Parameter name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New, clamped parameter value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_processed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_calls: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_failures: Option<u64>,
    /// JD error code when something failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a bare entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            seq: None,
            name: None,
            value: None,
            parameter_count: None,
            events_processed: None,
            hook_calls: None,
            hook_failures: None,
            error_code: None,
            error_message: None,
            details: None,
        }
    }

    pub fn session_start(parameter_count: usize) -> Self {
        Self {
            parameter_count: Some(parameter_count),
            ..Self::new(EventType::SessionStart, Severity::Info)
        }
    }

    pub fn session_stop(events_processed: u64, hook_calls: u64, hook_failures: u64) -> Self {
        let severity = if hook_failures > 0 {
            Severity::Warning
        } else {
            Severity::Info
        };
        Self {
            events_processed: Some(events_processed),
            hook_calls: Some(hook_calls),
            hook_failures: Some(hook_failures),
            ..Self::new(EventType::SessionStop, severity)
        }
    }

    pub fn value_change(seq: u64, name: &str, value: f64) -> Self {
        Self {
            seq: Some(seq),
            name: Some(name.to_string()),
            value: Some(value),
            ..Self::new(EventType::ValueChange, Severity::Info)
        }
    }

    pub fn hook_failure(name: Option<&str>, err: &JdError) -> Self {
        Self {
            name: name.map(str::to_string),
            error_code: Some(err.code().to_string()),
            error_message: Some(err.to_string()),
            ..Self::new(EventType::HookFailure, Severity::Error)
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Normal,
    Stderr,
    Discard,
}

#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    /// Maximum file size before rotation (bytes). Default: 10 MiB.
    pub max_size_bytes: u64,
    /// Number of rotated files to keep. Default: 3.
    pub max_rotated_files: u32,
    /// Seconds between forced fsync calls. Default: 10.
    pub fsync_interval_secs: u64,
}

impl JsonlConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("activity.jsonl"),
            max_size_bytes: 10 * 1024 * 1024,
            max_rotated_files: 3,
            fsync_interval_secs: 10,
        }
    }
}

/// Lines parked by [`JsonlWriter::hold_stderr`] before further ones are
/// only counted.
pub const MAX_HELD_LINES: usize = 4096;

/// Append-only JSONL writer with size-based rotation and stderr fallback.
pub struct JsonlWriter {
    config: JsonlConfig,
    writer: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
    last_fsync: SystemTime,
    held: Option<Vec<String>>,
    held_overflow: u64,
}

impl JsonlWriter {
    /// Open the log file, falling through the degradation chain on failure.
    pub fn open(config: JsonlConfig) -> Self {
        let mut w = Self {
            config,
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
            last_fsync: SystemTime::now(),
            held: None,
            held_overflow: 0,
        };
        match open_append(&w.config.path) {
            Ok((file, size)) => {
                w.writer = Some(BufWriter::new(file));
                w.state = WriterState::Normal;
                w.bytes_written = size;
            }
            Err(e) => {
                let _ = writeln!(io::stderr(), "[JD-JSONL] {e}; logging to stderr");
                w.state = WriterState::Stderr;
            }
        }
        w
    }

    /// Writer that drops everything. Used when the activity log is disabled.
    pub fn discard() -> Self {
        Self {
            config: JsonlConfig::default(),
            writer: None,
            state: WriterState::Discard,
            bytes_written: 0,
            last_fsync: SystemTime::now(),
            held: None,
            held_overflow: 0,
        }
    }

    pub fn write_entry(&mut self, entry: &LogEntry) {
        if self.state == WriterState::Discard {
            return;
        }
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                self.emit_stderr(format!("[JD-JSONL] serialize error: {e}\n"));
                return;
            }
        };
        self.write_line(&line);
    }

    pub fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
    }

    pub fn fsync(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
            let _ = w.get_ref().sync_data();
            self.last_fsync = SystemTime::now();
        }
    }

    /// Current degradation state.
    pub fn state(&self) -> &str {
        match self.state {
            WriterState::Normal => "normal",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Keep stderr untouched until [`Self::release_stderr`]. Fallback lines
    /// and diagnostics are parked in memory instead.
    pub fn hold_stderr(&mut self) {
        self.held.get_or_insert_with(Vec::new);
    }

    /// Number of lines currently parked.
    pub fn held_lines(&self) -> usize {
        self.held.as_ref().map_or(0, Vec::len)
    }

    /// Write parked lines to stderr and resume writing there directly.
    pub fn release_stderr(&mut self) {
        let _ = self.release_stderr_to(&mut io::stderr().lock());
    }

    /// Like [`Self::release_stderr`], but into `out`.
    pub fn release_stderr_to<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(lines) = self.held.take() else {
            return Ok(());
        };
        for line in &lines {
            out.write_all(line.as_bytes())?;
        }
        if self.held_overflow > 0 {
            writeln!(
                out,
                "[JD-JSONL] {} more entries were not kept",
                self.held_overflow
            )?;
            self.held_overflow = 0;
        }
        out.flush()
    }

    /// Send `line` to stderr, or park it while held. Returns `false` only if
    /// a direct write failed.
    fn emit_stderr(&mut self, line: String) -> bool {
        match self.held.as_mut() {
            Some(held) if held.len() < MAX_HELD_LINES => {
                held.push(line);
                true
            }
            Some(_) => {
                self.held_overflow += 1;
                true
            }
            None => io::stderr().write_all(line.as_bytes()).is_ok(),
        }
    }

    fn write_line(&mut self, line: &str) {
        if self.state == WriterState::Normal
            && self.bytes_written + line.len() as u64 > self.config.max_size_bytes
        {
            self.rotate();
        }

        match self.state {
            WriterState::Normal => {
                let Some(w) = self.writer.as_mut() else {
                    self.degrade();
                    self.write_line(line);
                    return;
                };
                if w.write_all(line.as_bytes()).is_err() {
                    self.degrade();
                    self.write_line(line);
                    return;
                }
                self.bytes_written += line.len() as u64;
                self.maybe_fsync();
            }
            WriterState::Stderr => {
                if !self.emit_stderr(format!("[JD-JSONL] {line}")) {
                    self.degrade();
                }
            }
            WriterState::Discard => {}
        }
    }

    fn maybe_fsync(&mut self) {
        let elapsed = SystemTime::now()
            .duration_since(self.last_fsync)
            .unwrap_or(Duration::ZERO);
        if elapsed.as_secs() >= self.config.fsync_interval_secs {
            self.fsync();
        }
    }

    fn degrade(&mut self) {
        self.writer = None;
        self.state = match self.state {
            WriterState::Normal => {
                self.emit_stderr("[JD-JSONL] write failed, using stderr\n".to_string());
                WriterState::Stderr
            }
            WriterState::Stderr | WriterState::Discard => WriterState::Discard,
        };
    }

    fn rotate(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            let _ = w.flush();
        }
        self.writer = None;
        let base = self.config.path.clone();

        // .N-1 → .N, …, .1 → .2, then current → .1
        for i in (1..self.config.max_rotated_files).rev() {
            let _ = rename(rotated_name(&base, i), rotated_name(&base, i + 1));
        }
        if self.config.max_rotated_files > 0 {
            let _ = rename(&base, rotated_name(&base, 1));
        } else {
            let _ = fs::remove_file(&base);
        }

        match open_append(&base) {
            Ok((file, _)) => {
                self.writer = Some(BufWriter::new(file));
                self.bytes_written = 0;
            }
            Err(_) => self.degrade(),
        }
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        self.flush();
        self.release_stderr();
    }
}

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| JdError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| JdError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// `activity.jsonl` → `activity.jsonl.2`.
fn rotated_name(base: &Path, index: u32) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
