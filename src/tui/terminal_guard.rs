//! Scoped ownership of the interactive terminal.
//!
//! Creating a [`TerminalGuard`] switches to raw mode, the alternate screen
//! and a hidden cursor. Dropping it switches all three back. A chained panic
//! hook performs the same release before the panic message is printed, which
//! also covers `panic = "abort"` builds where `Drop` never runs. The hook that
//! was installed before the guard is put back when the guard drops.

use std::io::{self, Write};
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};

/// Set while a session holds the terminal. Whoever swaps it back to `false`
/// performs the release.
static TERMINAL_CLAIMED: AtomicBool = AtomicBool::new(false);

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Holds the terminal for the lifetime of one dashboard session.
pub struct TerminalGuard {
    previous_hook: Option<Arc<PanicHook>>,
}

impl std::fmt::Debug for TerminalGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalGuard")
            .field("hook_chained", &self.previous_hook.is_some())
            .finish()
    }
}

impl TerminalGuard {
    /// Claim the terminal and chain a panic hook that releases it.
    ///
    /// Whatever panic hook is current stays in the chain and is reinstalled
    /// on drop. Hooks set by others while the guard is alive are discarded
    /// at that point.
    ///
    /// # Errors
    /// Propagates crossterm I/O errors. If raw mode was already entered when a
    /// later step fails, it is left again before the error is returned.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        TERMINAL_CLAIMED.store(true, Ordering::SeqCst);

        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            release_terminal();
            return Err(err);
        }

        Ok(Self {
            previous_hook: Some(chain_release_hook()),
        })
    }

    /// Whether some guard currently holds the terminal.
    #[must_use]
    pub fn is_claimed() -> bool {
        TERMINAL_CLAIMED.load(Ordering::SeqCst)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        release_terminal();

        if std::thread::panicking() {
            return;
        }
        if let Some(previous) = self.previous_hook.take() {
            reinstall_hook(previous);
        }
    }
}

/// Put a release step in front of the current panic hook. Returns the hook
/// that was current so it can be reinstalled later.
fn chain_release_hook() -> Arc<PanicHook> {
    let previous: Arc<PanicHook> = Arc::new(panic::take_hook());
    let chained = Arc::clone(&previous);
    panic::set_hook(Box::new(move |info| {
        release_terminal();
        chained(info);
    }));
    previous
}

fn reinstall_hook(previous: Arc<PanicHook>) {
    let _ = panic::take_hook();
    panic::set_hook(Box::new(move |info| previous(info)));
}

/// Undo everything [`TerminalGuard::new`] switched on. Runs at most once per
/// claim; later calls are no-ops.
fn release_terminal() {
    if !TERMINAL_CLAIMED.swap(false, Ordering::SeqCst) {
        return;
    }
    let mut stdout = io::stdout();
    let _ = execute!(stdout, Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = stdout.flush();
}
