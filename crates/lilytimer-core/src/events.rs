use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notify::NotificationRequest;

/// Every state change of the timer produces an Event.
/// The presentation layer may subscribe to them; the two phase completions
/// carry the notification request for the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Configured {
        work_secs: u64,
        break_secs: u64,
        at: DateTime<Utc>,
    },
    WorkStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A stop was requested and is waiting for confirmation.
    StopRequested {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StopCancelled {
        at: DateTime<Utc>,
    },
    /// Confirmed stop; the progress of the current phase was discarded.
    Stopped {
        discarded_secs: u64,
        at: DateTime<Utc>,
    },
    WorkEnded {
        break_secs: u64,
        notification: NotificationRequest,
        at: DateTime<Utc>,
    },
    BreakEnded {
        notification: NotificationRequest,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Notification request attached to this event, if any.
    pub fn notification(&self) -> Option<&NotificationRequest> {
        match self {
            Event::WorkEnded { notification, .. } | Event::BreakEnded { notification, .. } => {
                Some(notification)
            }
            _ => None,
        }
    }

    /// Snake-case name matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Configured { .. } => "configured",
            Event::WorkStarted { .. } => "work_started",
            Event::Paused { .. } => "paused",
            Event::Resumed { .. } => "resumed",
            Event::StopRequested { .. } => "stop_requested",
            Event::StopCancelled { .. } => "stop_cancelled",
            Event::Stopped { .. } => "stopped",
            Event::WorkEnded { .. } => "work_ended",
            Event::BreakEnded { .. } => "break_ended",
        }
    }
}
