//! Top-level client state: splash gate, current route, lifecycle hook

use std::time::{Duration, Instant};

use crate::lifecycle::{AutoSave, LifecycleSignal};
use crate::route::Route;

/// How long the splash stays up when nobody completes it first.
pub const SPLASH_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Splash,
    Main,
}

/// What the shell is showing right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    Splash,
    Page(&'a Route),
}

pub struct Shell<A> {
    phase: Phase,
    route: Route,
    splash_until: Instant,
    autosave: A,
}

impl<A: AutoSave> Shell<A> {
    pub fn new(location: &str, autosave: A, now: Instant) -> Self {
        Self::with_splash(location, autosave, now, SPLASH_DURATION)
    }

    pub fn with_splash(location: &str, autosave: A, now: Instant, splash: Duration) -> Self {
        Self {
            phase: Phase::Splash,
            route: Route::parse(location),
            splash_until: now + splash,
            autosave,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn view(&self) -> View<'_> {
        match self.phase {
            Phase::Splash => View::Splash,
            Phase::Main => View::Page(&self.route),
        }
    }

    /// Splash completion callback. Later calls are no-ops; Main is terminal.
    pub fn complete_splash(&mut self) {
        if self.phase == Phase::Splash {
            tracing::debug!(route = %self.route, "splash complete");
            self.phase = Phase::Main;
        }
    }

    /// Advance the splash timer.
    pub fn tick(&mut self, now: Instant) -> Phase {
        if self.phase == Phase::Splash && now >= self.splash_until {
            self.complete_splash();
        }
        self.phase
    }

    /// Change location. Navigation during the splash is remembered and shown once it ends.
    pub fn navigate(&mut self, location: &str) -> &Route {
        self.route = Route::parse(location);
        if self.route.is_not_found() {
            tracing::debug!(route = %self.route, "no page for location");
        }
        &self.route
    }

    pub fn handle(&mut self, signal: LifecycleSignal) {
        tracing::debug!(%signal, "lifecycle signal");
        if signal.wants_save() {
            self.autosave.persist(signal);
        }
    }

    pub fn autosave(&self) -> &A {
        &self.autosave
    }

    pub fn autosave_mut(&mut self) -> &mut A {
        &mut self.autosave
    }
}
