use serde::{Deserialize, Serialize};

/// Work and break lengths for one cycle, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDurations {
    pub work_secs: u64,
    pub break_secs: u64,
}

impl TimerDurations {
    pub fn new(work_secs: u64, break_secs: u64) -> Self {
        Self {
            work_secs,
            break_secs,
        }
    }

    /// Break length in whole minutes, as shown in the work-ended notice.
    pub fn break_minutes(&self) -> u64 {
        self.break_secs / 60
    }
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            break_secs: 5 * 60,
        }
    }
}

/// Upper bounds offered by the duration sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationLimits {
    pub max_work_secs: u64,
    pub max_break_secs: u64,
}

impl DurationLimits {
    pub fn new(max_work_secs: u64, max_break_secs: u64) -> Self {
        Self {
            max_work_secs,
            max_break_secs,
        }
    }

    /// Clamp both durations into `0..=max`.
    pub fn clamp(&self, durations: TimerDurations) -> TimerDurations {
        TimerDurations {
            work_secs: durations.work_secs.min(self.max_work_secs),
            break_secs: durations.break_secs.min(self.max_break_secs),
        }
    }
}

impl Default for DurationLimits {
    fn default() -> Self {
        Self {
            max_work_secs: 60 * 60,
            max_break_secs: 30 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations_are_classic_pomodoro() {
        let d = TimerDurations::default();
        assert_eq!(d.work_secs, 1500);
        assert_eq!(d.break_secs, 300);
        assert_eq!(d.break_minutes(), 5);
    }

    #[test]
    fn clamp_respects_limits() {
        let limits = DurationLimits::new(20, 20);
        let clamped = limits.clamp(TimerDurations::new(3600, 5));
        assert_eq!(clamped, TimerDurations::new(20, 5));
    }

    #[test]
    fn break_minutes_floors() {
        assert_eq!(TimerDurations::new(0, 59).break_minutes(), 0);
        assert_eq!(TimerDurations::new(0, 119).break_minutes(), 1);
    }
}
