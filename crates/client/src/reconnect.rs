//! Event stream lifecycle and reconnection policy
//!
//! Every stream attempt gets a generation number. Signals from an older
//! generation belong to a stream that was already replaced and are dropped,
//! so a late error from a discarded stream can never schedule a second timer.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

/// Connection indicator shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Open => "connected",
            Self::Closed => "disconnected",
        };
        write!(f, "{s}")
    }
}

/// Doubling delay bounded by `[floor, ceiling]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    current: Duration,
    floor: Duration,
    ceiling: Duration,
}

impl Backoff {
    pub fn new(floor: Duration, ceiling: Duration) -> Self {
        let floor = floor.max(Duration::from_millis(1));
        let ceiling = ceiling.max(floor);
        Self {
            current: floor,
            floor,
            ceiling,
        }
    }

    pub const fn current(&self) -> Duration {
        self.current
    }

    /// Delay to wait now; the stored delay doubles for the next call
    pub fn advance(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.ceiling);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.floor;
    }
}

/// Connection state machine: `connecting -> open -> closed -> connecting`
#[derive(Debug)]
pub struct ReconnectSupervisor {
    status: ConnectionStatus,
    backoff: Backoff,
    generation: u64,
    retry_at: Option<Instant>,
}

impl ReconnectSupervisor {
    pub fn new(backoff: Backoff) -> Self {
        Self {
            status: ConnectionStatus::Closed,
            backoff,
            generation: 0,
            retry_at: None,
        }
    }

    pub const fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Delay the next fault will schedule
    pub const fn delay(&self) -> Duration {
        self.backoff.current()
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Begin a new attempt, superseding any previous stream and pending timer
    pub fn start(&mut self) -> u64 {
        self.generation += 1;
        self.retry_at = None;
        self.status = ConnectionStatus::Connecting;
        tracing::debug!(generation = self.generation, "Opening event stream");
        self.generation
    }

    /// Stream established; returns `false` for a stale generation
    pub fn on_open(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) || self.status != ConnectionStatus::Connecting {
            return false;
        }
        self.status = ConnectionStatus::Open;
        self.backoff.reset();
        tracing::info!(generation, "Event stream open");
        true
    }

    /// Stream failed or ended
    ///
    /// Returns the delay before the next attempt, or `None` when the signal
    /// is stale or a retry is already scheduled.
    pub fn on_fault(&mut self, generation: u64, now: Instant) -> Option<Duration> {
        if !self.is_current(generation) || self.status == ConnectionStatus::Closed {
            return None;
        }
        let delay = self.backoff.advance();
        self.status = ConnectionStatus::Closed;
        self.retry_at = Some(now + delay);
        tracing::warn!(
            generation,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Event stream lost, reconnecting"
        );
        Some(delay)
    }

    /// Fire the retry timer if due; returns the new generation to open
    pub fn poll_timer(&mut self, now: Instant) -> Option<u64> {
        match self.retry_at {
            Some(at) if at <= now => Some(self.start()),
            _ => None,
        }
    }

    pub const fn next_deadline(&self) -> Option<Instant> {
        self.retry_at
    }
}
