//! Mutation hook: the seam between the dashboard and whatever consumes edits.
//!
//! The controller calls [`MutationHook::on_change`] synchronously, once per
//! value change, after clamping and before the redraw. A slow hook stalls the
//! whole UI; hooks that need the UI to stay responsive should enqueue and
//! return, which is what [`ChannelHook`] does.

#![allow(missing_docs)]

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded};
use serde::Serialize;

use crate::core::errors::{JdError, Result};

/// Receives every value change made through the dashboard.
pub trait MutationHook {
    /// `value` is the parameter's new, already-clamped value.
    fn on_change(&mut self, name: &str, value: f64) -> Result<()>;
}

impl<F> MutationHook for F
where
    F: FnMut(&str, f64) -> Result<()>,
{
    fn on_change(&mut self, name: &str, value: f64) -> Result<()> {
        self(name, value)
    }
}

/// Hook that does nothing. Lets the controller run without an actuation backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl MutationHook for NoopHook {
    fn on_change(&mut self, _name: &str, _value: f64) -> Result<()> {
        Ok(())
    }
}

/// Hook that remembers every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingHook {
    pub calls: Vec<(String, f64)>,
}

impl MutationHook for RecordingHook {
    fn on_change(&mut self, name: &str, value: f64) -> Result<()> {
        self.calls.push((name.to_string(), value));
        Ok(())
    }
}

/// Wraps a hook with a fixed pause after each call, rate-limiting downstream
/// commands on the UI thread.
#[derive(Debug, Clone)]
pub struct ThrottledHook<H> {
    inner: H,
    delay: Duration,
}

impl<H: MutationHook> ThrottledHook<H> {
    pub fn new(inner: H, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: MutationHook> MutationHook for ThrottledHook<H> {
    fn on_change(&mut self, name: &str, value: f64) -> Result<()> {
        let result = self.inner.on_change(name, value);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        result
    }
}

/// One change as it travels to an out-of-thread consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueUpdate {
    /// Position in the session's change stream, starting at 1.
    pub seq: u64,
    pub name: String,
    pub value: f64,
}

/// Enqueue-and-return hook backed by a bounded channel.
///
/// A full queue blocks the caller rather than dropping the change, so the
/// consumer always sees every change in the order the keys were handled. A
/// disconnected consumer is reported as [`JdError::ChannelClosed`].
#[derive(Debug, Clone)]
pub struct ChannelHook {
    tx: Sender<ValueUpdate>,
    next_seq: u64,
}

impl ChannelHook {
    pub fn new(tx: Sender<ValueUpdate>) -> Self {
        Self { tx, next_seq: 1 }
    }

    /// Build a hook together with the receiving end of a queue of `capacity`.
    #[must_use]
    pub fn bounded(capacity: usize) -> (Self, Receiver<ValueUpdate>) {
        let (tx, rx) = bounded(capacity);
        (Self::new(tx), rx)
    }
}

impl MutationHook for ChannelHook {
    fn on_change(&mut self, name: &str, value: f64) -> Result<()> {
        let update = ValueUpdate {
            seq: self.next_seq,
            name: name.to_string(),
            value,
        };
        self.tx
            .send(update)
            .map_err(|_| JdError::ChannelClosed {
                component: "mutation-hook",
            })?;
        self.next_seq += 1;
        Ok(())
    }
}
