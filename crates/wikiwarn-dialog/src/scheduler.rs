#![forbid(unsafe_code)]

//! Debounced preview scheduling.
//!
//! Free-text edits request a preview refresh on every keystroke, but
//! rendering is expensive, so the scheduler holds the request until a
//! quiet interval has passed since the latest one. Structural edits
//! (template or level changes) request an immediate refresh instead,
//! which supersedes any pending debounce.
//!
//! The scheduler never spawns threads or timers. Callers drive it by
//! polling [`PreviewScheduler::tick_at`] with the current instant;
//! [`PreviewScheduler::time_until_fire`] tells an event loop how long it
//! may sleep first.
//!
//! # Invariants
//!
//! - At most one fire per quiet period: a burst of debounce requests
//!   produces one [`PreviewFire`], timed from the latest request.
//! - An immediate request fires on the next tick, whatever was pending.
//! - After a fire or a cancel the scheduler is idle until the next
//!   request.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | `quiet_interval` of zero | every debounce request fires on the next tick |
//! | tick with the clock behind a request | elapsed time clamps to zero, no fire |
//! | cancel with nothing pending | no-op |
//!
//! # Usage
//!
//! ```
//! use std::time::{Duration, Instant};
//! use wikiwarn_dialog::{PreviewScheduler, SchedulerConfig};
//!
//! let mut scheduler = PreviewScheduler::new(SchedulerConfig::default());
//! let base = Instant::now();
//!
//! scheduler.request_debounced_at(base);
//! assert!(scheduler.tick_at(base + Duration::from_millis(500)).is_none());
//! let fire = scheduler.tick_at(base + Duration::from_secs(2));
//! assert!(fire.is_some());
//! ```

use std::time::{Duration, Instant};

/// Quiet interval a debounced preview waits for after the last edit.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(2000);

/// Tuning for [`PreviewScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// How long the input must stay quiet before a debounced fire.
    pub quiet_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quiet_interval: DEFAULT_QUIET_INTERVAL,
        }
    }
}

impl SchedulerConfig {
    /// Override the quiet interval.
    #[must_use]
    pub fn with_quiet_interval(mut self, quiet_interval: Duration) -> Self {
        self.quiet_interval = quiet_interval;
        self
    }
}

/// Why a fire happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireCause {
    /// A structural edit asked for the next tick.
    Immediate,
    /// The quiet interval elapsed after the last debounce request.
    Debounced,
}

impl FireCause {
    /// Stable name for log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Debounced => "debounced",
        }
    }
}

/// One granted preview refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewFire {
    /// What triggered the fire.
    pub cause: FireCause,
    /// Debounce requests absorbed by this fire.
    pub coalesced: u32,
}

/// Latest-wins debounce with an immediate bypass.
///
/// Only the newest debounce request matters; each one restarts the quiet
/// interval. See the module docs for the polling contract.
#[derive(Debug, Clone)]
pub struct PreviewScheduler {
    config: SchedulerConfig,
    last_request: Option<Instant>,
    coalesced: u32,
    immediate: bool,
}

impl PreviewScheduler {
    /// Scheduler with nothing pending.
    #[must_use]
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            last_request: None,
            coalesced: 0,
            immediate: false,
        }
    }

    /// Ask for a refresh on the next tick.
    ///
    /// Supersedes a pending debounce; its requests count as absorbed by
    /// the coming fire.
    pub fn request_immediate(&mut self) {
        if self.last_request.take().is_some() {
            tracing::trace!(
                target: "wikiwarn.preview",
                absorbed = self.coalesced,
                "debounce_superseded"
            );
        }
        self.immediate = true;
    }

    /// Ask for a refresh once the input has been quiet long enough.
    pub fn request_debounced(&mut self) {
        self.request_debounced_at(Instant::now());
    }

    /// Clock-explicit form of [`request_debounced`](Self::request_debounced).
    pub fn request_debounced_at(&mut self, now: Instant) {
        self.last_request = Some(now);
        self.coalesced = self.coalesced.saturating_add(1);
        tracing::trace!(
            target: "wikiwarn.preview",
            coalesced = self.coalesced,
            "debounce_pending"
        );
    }

    /// Poll for a due refresh.
    pub fn tick(&mut self) -> Option<PreviewFire> {
        self.tick_at(Instant::now())
    }

    /// Clock-explicit form of [`tick`](Self::tick).
    ///
    /// Returns the granted fire, or `None` when nothing is due yet.
    pub fn tick_at(&mut self, now: Instant) -> Option<PreviewFire> {
        if self.immediate {
            return Some(self.fire(FireCause::Immediate));
        }
        let last = self.last_request?;
        if duration_since_or_zero(now, last) >= self.config.quiet_interval {
            return Some(self.fire(FireCause::Debounced));
        }
        None
    }

    /// How long until the next fire would be due, or `None` when idle.
    ///
    /// An event loop may sleep this long before the next
    /// [`tick_at`](Self::tick_at).
    #[must_use]
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        if self.immediate {
            return Some(Duration::ZERO);
        }
        let last = self.last_request?;
        let elapsed = duration_since_or_zero(now, last);
        Some(self.config.quiet_interval.saturating_sub(elapsed))
    }

    /// Whether a fire is scheduled.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.immediate || self.last_request.is_some()
    }

    /// Drop anything pending without firing.
    pub fn cancel(&mut self) {
        if self.has_pending() {
            tracing::debug!(
                target: "wikiwarn.preview",
                dropped = self.coalesced,
                "preview_cancelled"
            );
        }
        self.last_request = None;
        self.coalesced = 0;
        self.immediate = false;
    }

    fn fire(&mut self, cause: FireCause) -> PreviewFire {
        let coalesced = self.coalesced;
        self.last_request = None;
        self.coalesced = 0;
        self.immediate = false;
        tracing::debug!(
            target: "wikiwarn.preview",
            cause = %cause.as_str(),
            coalesced,
            "preview_fire"
        );
        PreviewFire { cause, coalesced }
    }
}

fn duration_since_or_zero(now: Instant, earlier: Instant) -> Duration {
    now.checked_duration_since(earlier).unwrap_or(Duration::ZERO)
}
