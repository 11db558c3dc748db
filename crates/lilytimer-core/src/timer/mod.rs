mod durations;
mod engine;
mod stage;

pub use durations::{DurationLimits, TimerDurations};
pub use engine::{Phase, TimerEngine, TimerSnapshot};
pub use stage::{derive_stage, format_remaining, Stage};
