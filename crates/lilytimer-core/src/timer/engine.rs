//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads or read the wall clock - the caller delivers one
//! `tick()` per second while a phase is active.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Working -> Break -> Idle
//!           |  ^
//!           |  +-- toggle_pause (self-loop)
//!           +----- request_stop + confirm_stop -> Idle
//! ```
//!
//! ## Usage
//!
//! ```
//! use lilytimer_core::{Phase, TimerEngine};
//!
//! let mut engine = TimerEngine::new();
//! engine.configure(3, 2);
//! engine.start();
//! for _ in 0..3 {
//!     engine.tick();
//! }
//! assert_eq!(engine.phase(), Phase::Break);
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::durations::{DurationLimits, TimerDurations};
use super::stage::{derive_stage, format_remaining, Stage};
use crate::events::Event;
use crate::notify::NotificationRequest;

/// Top-level mode of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Working,
    Break,
}

impl Phase {
    pub fn is_active(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub remaining_secs: u64,
    pub is_paused: bool,
    pub pending_stop_confirmation: bool,
    pub work_secs: u64,
    pub break_secs: u64,
    pub stage: Stage,
    /// `remaining_secs` as `m:ss`.
    pub display: String,
}

/// Core timer engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    durations: TimerDurations,
    limits: DurationLimits,
    phase: Phase,
    remaining_secs: u64,
    is_paused: bool,
    pending_stop_confirmation: bool,
}

impl TimerEngine {
    /// Idle engine with the default 25/5 minute cycle.
    pub fn new() -> Self {
        Self::with_durations(TimerDurations::default(), DurationLimits::default())
    }

    /// Idle engine with the given durations, clamped to `limits`.
    pub fn with_durations(durations: TimerDurations, limits: DurationLimits) -> Self {
        Self {
            durations: limits.clamp(durations),
            limits,
            phase: Phase::Idle,
            remaining_secs: 0,
            is_paused: false,
            pending_stop_confirmation: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn pending_stop_confirmation(&self) -> bool {
        self.pending_stop_confirmation
    }

    pub fn durations(&self) -> TimerDurations {
        self.durations
    }

    pub fn limits(&self) -> DurationLimits {
        self.limits
    }

    /// Whether the clock should be delivering ticks.
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn stage(&self) -> Stage {
        derive_stage(self.durations.work_secs, self.remaining_secs, self.phase)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            is_paused: self.is_paused,
            pending_stop_confirmation: self.pending_stop_confirmation,
            work_secs: self.durations.work_secs,
            break_secs: self.durations.break_secs,
            stage: self.stage(),
            display: format_remaining(self.remaining_secs),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set work and break lengths. Only allowed while idle.
    pub fn configure(&mut self, work_secs: u64, break_secs: u64) -> Option<Event> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.durations = self
            .limits
            .clamp(TimerDurations::new(work_secs, break_secs));
        debug!(
            work_secs = self.durations.work_secs,
            break_secs = self.durations.break_secs,
            "timer configured"
        );
        Some(Event::Configured {
            work_secs: self.durations.work_secs,
            break_secs: self.durations.break_secs,
            at: Utc::now(),
        })
    }

    pub fn start(&mut self) -> Option<Event> {
        if self.phase != Phase::Idle {
            return None;
        }
        self.phase = Phase::Working;
        self.remaining_secs = self.durations.work_secs;
        self.is_paused = false;
        debug!(duration_secs = self.remaining_secs, "work phase started");
        Some(Event::WorkStarted {
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Pause or resume the work countdown. The break cannot be paused.
    pub fn toggle_pause(&mut self) -> Option<Event> {
        if self.phase != Phase::Working {
            return None;
        }
        self.is_paused = !self.is_paused;
        debug!(paused = self.is_paused, remaining_secs = self.remaining_secs, "pause toggled");
        let remaining_secs = self.remaining_secs;
        let at = Utc::now();
        Some(if self.is_paused {
            Event::Paused { remaining_secs, at }
        } else {
            Event::Resumed { remaining_secs, at }
        })
    }

    /// Ask for a stop. The phase keeps running until `confirm_stop`.
    pub fn request_stop(&mut self) -> Option<Event> {
        if self.phase != Phase::Working || self.pending_stop_confirmation {
            return None;
        }
        self.pending_stop_confirmation = true;
        Some(Event::StopRequested {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Abandon the current phase. All progress is lost.
    pub fn confirm_stop(&mut self) -> Option<Event> {
        if self.phase == Phase::Idle {
            self.pending_stop_confirmation = false;
            return None;
        }
        let discarded_secs = self.remaining_secs;
        self.reset_to_idle();
        debug!(discarded_secs, "timer stopped");
        Some(Event::Stopped {
            discarded_secs,
            at: Utc::now(),
        })
    }

    pub fn cancel_stop(&mut self) -> Option<Event> {
        if !self.pending_stop_confirmation {
            return None;
        }
        self.pending_stop_confirmation = false;
        Some(Event::StopCancelled { at: Utc::now() })
    }

    /// Advance by one second.
    ///
    /// Returns `Some(Event::WorkEnded)` or `Some(Event::BreakEnded)` when a
    /// phase completes; both carry the notification request for the
    /// dispatcher. A phase completes on the tick that drains it to zero.
    pub fn tick(&mut self) -> Option<Event> {
        match self.phase {
            Phase::Idle => None,
            Phase::Working if self.is_paused => None,
            Phase::Working => {
                if self.remaining_secs > 0 {
                    self.remaining_secs -= 1;
                    if self.remaining_secs > 0 {
                        return None;
                    }
                }
                Some(self.finish_work())
            }
            Phase::Break => {
                if self.remaining_secs > 0 {
                    self.remaining_secs -= 1;
                    if self.remaining_secs > 0 {
                        return None;
                    }
                }
                Some(self.finish_break())
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish_work(&mut self) -> Event {
        let break_secs = self.durations.break_secs;
        self.phase = Phase::Break;
        self.remaining_secs = break_secs;
        info!(break_secs, "work phase ended");
        Event::WorkEnded {
            break_secs,
            notification: NotificationRequest::work_ended(self.durations.break_minutes()),
            at: Utc::now(),
        }
    }

    fn finish_break(&mut self) -> Event {
        self.reset_to_idle();
        info!("break phase ended");
        Event::BreakEnded {
            notification: NotificationRequest::break_ended(),
            at: Utc::now(),
        }
    }

    fn reset_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.remaining_secs = 0;
        self.is_paused = false;
        self.pending_stop_confirmation = false;
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}
