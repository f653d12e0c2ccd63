// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tether Contributors

//! Connection lifecycle state machine: reconnect scheduling and backoff.
//!
//! The controller is the sole owner of the connection's lifecycle state and
//! backoff delay. Every disconnection takes the same path regardless of
//! cause: enter `Reconnecting`, schedule exactly one retry timer for the
//! current delay, then grow the delay for the next failure cycle.
//!
//! Retry timers are tagged with the connection generation under which they
//! were scheduled. The generation advances whenever a new connection attempt
//! begins, so a timer that fires after its attempt has been superseded is
//! detected as stale and discarded instead of spawning a duplicate attempt.

use std::time::Duration;

/// Lifecycle state of the single logical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A transport connection attempt is in flight.
    Connecting,
    /// The transport is ready; sends go straight to the wire.
    Open,
    /// Disconnected, waiting out the backoff delay before retrying.
    Reconnecting,
    /// Terminal: the client was explicitly disposed.
    Closed,
}

/// Exponential backoff state.
///
/// `next_delay` returns the delay the upcoming attempt should wait, then
/// doubles the stored delay (clamped to the maximum) for the following
/// failure cycle. Growth is applied exactly once per failure, never once
/// per event.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    /// Creates a backoff starting at `base`, bounded above by `max`.
    pub fn new(base: Duration, max: Duration) -> Self {
        Backoff { base, max, current: base }
    }

    /// The delay the next scheduled attempt will wait.
    pub fn current(&self) -> Duration {
        self.current
    }

    /// Consumes the current delay and grows it for the next cycle.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    /// Resets to the base delay after a successful open.
    pub fn reset(&mut self) {
        self.current = self.base;
    }
}

/// A scheduled reconnect attempt.
///
/// `generation` identifies the connection attempt the timer belongs to;
/// `delay` is how long to wait before firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryTimer {
    /// Generation the timer was scheduled under.
    pub generation: u64,
    /// Backoff delay to wait before the attempt.
    pub delay: Duration,
}

/// What the caller should do after a transport error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Schedule the returned retry timer (first failure of this cycle).
    Retry(RetryTimer),
    /// Already reconnecting: force the current transport closed instead of
    /// scheduling a duplicate timer.
    CloseTransport,
    /// Disposed; nothing to do.
    Ignore,
}

/// The reconnect/backoff state machine.
#[derive(Debug)]
pub struct ReconnectController {
    state: ConnectionState,
    backoff: Backoff,
    generation: u64,
    pending: Option<RetryTimer>,
}

impl ReconnectController {
    /// Creates a controller ready to drive its first connection attempt.
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        ReconnectController {
            state: ConnectionState::Connecting,
            backoff: Backoff::new(base_delay, max_delay),
            generation: 1,
            pending: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Current connection generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the transport is considered ready.
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// The retry timer awaiting its delay, if any.
    ///
    /// At most one timer is pending at any time.
    pub fn pending_timer(&self) -> Option<RetryTimer> {
        self.pending
    }

    /// Backoff delay the next failure cycle would wait.
    pub fn current_delay(&self) -> Duration {
        self.backoff.current()
    }

    /// Transport opened: reset backoff, clear any stale timer.
    pub fn on_open(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.state = ConnectionState::Open;
        self.backoff.reset();
        self.pending = None;
    }

    /// Transport closed (or a connect attempt failed).
    ///
    /// Returns the retry timer to schedule, or `None` when a timer is
    /// already pending or the client is disposed. Idempotent under repeated
    /// close events: only the first schedules anything.
    pub fn on_close(&mut self) -> Option<RetryTimer> {
        match self.state {
            ConnectionState::Closed | ConnectionState::Reconnecting => None,
            ConnectionState::Connecting | ConnectionState::Open => {
                self.state = ConnectionState::Reconnecting;
                let timer = RetryTimer {
                    generation: self.generation,
                    delay: self.backoff.next_delay(),
                };
                self.pending = Some(timer);
                Some(timer)
            }
        }
    }

    /// Transport error.
    ///
    /// Same backoff path as a close, except that an error arriving while a
    /// retry is already pending must not schedule a second timer; the
    /// caller force-closes the transport instead.
    pub fn on_error(&mut self) -> ErrorAction {
        match self.state {
            ConnectionState::Closed => ErrorAction::Ignore,
            ConnectionState::Reconnecting => ErrorAction::CloseTransport,
            ConnectionState::Connecting | ConnectionState::Open => match self.on_close() {
                Some(timer) => ErrorAction::Retry(timer),
                None => ErrorAction::Ignore,
            },
        }
    }

    /// A retry timer fired.
    ///
    /// Returns true when the timer is current and a new connection attempt
    /// should begin; false when the timer is stale (superseded generation,
    /// or the state moved on) and must be discarded.
    pub fn retry_elapsed(&mut self, generation: u64) -> bool {
        if self.state != ConnectionState::Reconnecting {
            return false;
        }
        match self.pending {
            Some(timer) if timer.generation == generation => {
                self.pending = None;
                self.generation += 1;
                self.state = ConnectionState::Connecting;
                true
            }
            _ => false,
        }
    }

    /// Explicit disposal: cancel any pending timer and become terminal.
    ///
    /// No further attempts may be scheduled afterwards.
    pub fn dispose(&mut self) {
        self.state = ConnectionState::Closed;
        self.pending = None;
        self.generation += 1;
    }
}
