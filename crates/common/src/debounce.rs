//! Input debouncing as an explicit state machine
//!
//! Raw keystrokes are decoupled from the committed value that drives
//! network queries. The machine moves `Idle -> Typing -> Committed`; every
//! keystroke while typing re-arms the deadline, and only the final pause
//! commits. There is no background timer: the owner polls against the
//! injected clock, so dropping the debouncer abandons any armed deadline
//! and nothing can fire after teardown.

use std::time::{Duration, Instant};

use crate::time::{Clock, SystemClock};

/// Default pause before a pending value commits.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(350);

/// Observable phase of the debounce machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePhase {
    /// No pending input.
    Idle,
    /// Input received, deadline armed.
    Typing,
    /// The last poll committed a value and nothing new arrived since.
    Committed,
}

/// Debounces a text input against an injected clock.
#[derive(Debug)]
pub struct Debouncer<C: Clock = SystemClock> {
    window: Duration,
    phase: DebouncePhase,
    pending: Option<String>,
    committed: String,
    deadline: Option<Instant>,
    clock: C,
}

impl Debouncer<SystemClock> {
    /// Debouncer over the system clock with the default window.
    pub fn new() -> Self {
        Self::with_clock(DEFAULT_DEBOUNCE_WINDOW, SystemClock)
    }
}

impl Default for Debouncer<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Debouncer<C> {
    /// Create a debouncer with an explicit window and clock.
    pub fn with_clock(window: Duration, clock: C) -> Self {
        Self {
            window,
            phase: DebouncePhase::Idle,
            pending: None,
            committed: String::new(),
            deadline: None,
            clock,
        }
    }

    /// Record a keystroke. Re-arms the deadline; nothing commits here.
    pub fn input(&mut self, text: impl Into<String>) {
        self.pending = Some(text.into());
        self.deadline = Some(self.clock.now() + self.window);
        self.phase = DebouncePhase::Typing;
    }

    /// Commit the pending value if the pause window has elapsed.
    ///
    /// Returns the newly committed value exactly once per pause; subsequent
    /// polls return `None` until new input arrives.
    pub fn poll(&mut self) -> Option<&str> {
        let deadline = self.deadline?;
        if self.clock.now() < deadline {
            return None;
        }

        let value = self.pending.take()?;
        self.deadline = None;
        self.committed = value;
        self.phase = DebouncePhase::Committed;
        Some(self.committed.as_str())
    }

    /// Explicit clear affordance: commits the empty value immediately,
    /// without waiting out the window.
    pub fn clear(&mut self) -> &str {
        self.pending = None;
        self.deadline = None;
        self.committed.clear();
        self.phase = DebouncePhase::Committed;
        self.committed.as_str()
    }

    /// The last committed value.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    /// Current phase of the machine.
    pub fn phase(&self) -> DebouncePhase {
        self.phase
    }

    /// Whether a deadline is armed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
