//! Page lifecycle and the auto-save hook
//!
//! Hidden and unload signals ask the [`AutoSave`] hook to persist. Nothing
//! is persisted by default: [`LoggingAutoSave`] only records the request.
//! [`Debounced`] collapses a burst of signals into one call.

use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleSignal {
    VisibilityHidden,
    VisibilityVisible,
    BeforeUnload,
}

impl LifecycleSignal {
    /// Whether this signal should trigger a save.
    pub fn wants_save(self) -> bool {
        !matches!(self, Self::VisibilityVisible)
    }
}

impl fmt::Display for LifecycleSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VisibilityHidden => write!(f, "visibility-hidden"),
            Self::VisibilityVisible => write!(f, "visibility-visible"),
            Self::BeforeUnload => write!(f, "before-unload"),
        }
    }
}

pub trait AutoSave {
    fn persist(&mut self, reason: LifecycleSignal);
}

/// Default hook: logs and keeps nothing.
#[derive(Debug, Default)]
pub struct LoggingAutoSave;

impl AutoSave for LoggingAutoSave {
    fn persist(&mut self, reason: LifecycleSignal) {
        tracing::info!(%reason, "auto-save requested");
    }
}

/// Trailing-edge debounce around another hook.
///
/// Each saving signal restarts the window; [`Debounced::poll`] flushes once
/// the window has passed quietly. `BeforeUnload` flushes immediately since
/// there is no later poll.
#[derive(Debug)]
pub struct Debounced<A> {
    inner: A,
    window: Duration,
    pending: Option<(LifecycleSignal, Instant)>,
}

impl<A: AutoSave> Debounced<A> {
    pub fn new(inner: A, window: Duration) -> Self {
        Self {
            inner,
            window,
            pending: None,
        }
    }

    pub fn signal(&mut self, signal: LifecycleSignal, now: Instant) {
        if !signal.wants_save() {
            return;
        }
        if signal == LifecycleSignal::BeforeUnload {
            self.pending = None;
            self.inner.persist(signal);
            return;
        }
        self.pending = Some((signal, now + self.window));
    }

    /// Flush the pending save if its window has elapsed. Returns true if it did.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some((signal, due)) if now >= due => {
                self.pending = None;
                self.inner.persist(signal);
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: AutoSave> AutoSave for Debounced<A> {
    fn persist(&mut self, reason: LifecycleSignal) {
        self.signal(reason, Instant::now());
    }
}
