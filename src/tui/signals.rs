//! SIGTERM/SIGINT registration for the interactive session.
//!
//! Uses the `signal-hook` crate for safe signal registration. The terminal
//! input feed polls the flag while it waits for keys rather than blocking on
//! signals, so an interrupt unwinds through the normal quit path and the
//! terminal guard still runs.
//!
//! The registration is scoped: once the last clone of a registered
//! [`SignalHandler`] is dropped its actions are removed and both signals get
//! their default (terminating) action back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use signal_hook::SigId;
use signal_hook::consts::{SIGINT, SIGTERM};

const HANDLED: [i32; 2] = [SIGTERM, SIGINT];

/// Number of live registrations. The default action is re-armed at zero.
static LIVE_REGISTRATIONS: Mutex<usize> = Mutex::new(0);

/// Shutdown flag shared between the OS signal handler and the input feed.
#[derive(Debug, Clone, Default)]
pub struct SignalHandler {
    shutdown_flag: Arc<AtomicBool>,
    registration: Option<Arc<Registration>>,
}

impl SignalHandler {
    /// Create a handler and register SIGTERM/SIGINT for as long as it (or a
    /// clone) is alive.
    ///
    /// Registration is best-effort; failures are logged to stderr but not fatal.
    #[must_use]
    pub fn new() -> Self {
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let registration = Registration::install(&shutdown_flag);
        Self {
            shutdown_flag,
            registration: Some(Arc::new(registration)),
        }
    }

    /// Create a handler without touching process signal disposition.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Check whether a shutdown has been requested.
    #[must_use]
    pub fn should_shutdown(&self) -> bool {
        self.shutdown_flag.load(Ordering::Relaxed)
    }

    /// Programmatically request shutdown.
    pub fn request_shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::Relaxed);
    }
}

/// Flag actions owned by one [`SignalHandler::new`] call.
#[derive(Debug)]
struct Registration {
    ids: Vec<SigId>,
}

impl Registration {
    fn install(flag: &Arc<AtomicBool>) -> Self {
        let restore_default = default_action_armed();
        {
            let mut live = LIVE_REGISTRATIONS
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *live += 1;
            restore_default.store(false, Ordering::SeqCst);
        }

        let ids = HANDLED
            .into_iter()
            .filter_map(|signal| {
                signal_hook::flag::register(signal, Arc::clone(flag))
                    .inspect_err(|e| {
                        eprintln!("[JD-SIGNAL] failed to register signal {signal}: {e}");
                    })
                    .ok()
            })
            .collect();
        Self { ids }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
        let mut live = LIVE_REGISTRATIONS
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *live = live.saturating_sub(1);
        if *live == 0 {
            default_action_armed().store(true, Ordering::SeqCst);
        }
    }
}

/// Condition for the process-wide "behave as default" actions.
///
/// signal-hook keeps its low-level handler installed after the last action is
/// unregistered, which would leave SIGINT/SIGTERM ignored. These conditional
/// actions are registered once and emulate the default disposition whenever
/// no session holds the signals.
fn default_action_armed() -> &'static Arc<AtomicBool> {
    static ARMED: OnceLock<Arc<AtomicBool>> = OnceLock::new();
    ARMED.get_or_init(|| {
        let armed = Arc::new(AtomicBool::new(true));
        for signal in HANDLED {
            let condition = Arc::clone(&armed);
            if let Err(e) = signal_hook::flag::register_conditional_default(signal, condition) {
                eprintln!("[JD-SIGNAL] failed to arm default action for signal {signal}: {e}");
            }
        }
        armed
    })
}
