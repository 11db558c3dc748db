//! # LilyTimer Core Library
//!
//! Core logic for the LilyTimer work/break timer. The presentation layer
//! (terminal, mobile or desktop UI) only reads snapshots and invokes the
//! named transition operations; everything with behaviour lives here.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine (`Idle -> Working -> Break -> Idle`)
//!   that the caller advances by calling `tick()` once per second
//! - **Stages**: pure derivation of the visual stage and `m:ss` display text
//! - **Notifications**: requests emitted on phase completion, delivered by a
//!   pluggable [`NotificationDispatcher`]
//! - **Clock**: injected [`TickSource`] so tests can feed synthetic ticks
//! - **Session**: a single tokio task that serializes commands and ticks
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerSession`]: Serialized actor wrapping the engine
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod session;
pub mod storage;
pub mod timer;

pub use clock::{IntervalTicks, ManualTicks, TickSender, TickSource};
pub use error::{ConfigError, CoreError, NotifyError, SessionError};
pub use events::Event;
pub use notify::{
    LogDispatcher, NotificationDispatcher, NotificationKind, NotificationRequest,
    RecordingDispatcher,
};
pub use session::{Command, SessionHandle, TimerSession};
pub use storage::Config;
pub use timer::{
    derive_stage, format_remaining, DurationLimits, Phase, Stage, TimerDurations, TimerEngine,
    TimerSnapshot,
};
