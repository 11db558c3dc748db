//! Phase-completion notices and the dispatcher contract.
//!
//! The engine only builds [`NotificationRequest`]s. Permission prompts,
//! delivery timing and platform identifiers belong to the dispatcher.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NotifyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    WorkEnded,
    BreakEnded,
}

/// A notice the user should see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

impl NotificationRequest {
    /// Work phase finished; the body mentions the upcoming break in whole
    /// minutes.
    pub fn work_ended(break_minutes: u64) -> Self {
        Self {
            kind: NotificationKind::WorkEnded,
            title: "Time for a break!".into(),
            body: format!("Work session complete. Enjoy your {break_minutes} minute break."),
        }
    }

    pub fn break_ended() -> Self {
        Self {
            kind: NotificationKind::BreakEnded,
            title: "Break's over".into(),
            body: "Ready to start another work session?".into(),
        }
    }
}

/// Delivers notification requests to the user.
///
/// Implementations must not block the caller for long; failures are
/// reported back but never affect the timer.
pub trait NotificationDispatcher: Send {
    fn dispatch(&mut self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

impl<D: NotificationDispatcher + ?Sized> NotificationDispatcher for Box<D> {
    fn dispatch(&mut self, request: &NotificationRequest) -> Result<(), NotifyError> {
        (**self).dispatch(request)
    }
}

/// Writes requests to the log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDispatcher;

impl NotificationDispatcher for LogDispatcher {
    fn dispatch(&mut self, request: &NotificationRequest) -> Result<(), NotifyError> {
        info!(kind = ?request.kind, title = %request.title, "{}", request.body);
        Ok(())
    }
}

/// Keeps every request in a shared list.
///
/// Clones share the same list, so a test or a polling UI can keep one copy
/// while the session owns the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingDispatcher {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<NotificationRequest>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Requests received so far, oldest first.
    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.log().clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.sent().iter().filter(|r| r.kind == kind).count()
    }

    /// Drain and return everything received so far.
    pub fn take(&self) -> Vec<NotificationRequest> {
        std::mem::take(&mut *self.log())
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&mut self, request: &NotificationRequest) -> Result<(), NotifyError> {
        self.log().push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerDurations;

    #[test]
    fn work_ended_mentions_break_minutes() {
        let req = NotificationRequest::work_ended(5);
        assert_eq!(req.kind, NotificationKind::WorkEnded);
        assert_eq!(req.title, "Time for a break!");
        assert_eq!(req.body, "Work session complete. Enjoy your 5 minute break.");
    }

    #[test]
    fn sub_minute_break_reads_zero_minutes() {
        let req = NotificationRequest::work_ended(TimerDurations::new(60, 20).break_minutes());
        assert!(req.body.contains("your 0 minute break"));
    }

    #[test]
    fn break_ended_is_static() {
        assert_eq!(NotificationRequest::break_ended(), NotificationRequest::break_ended());
        assert_eq!(NotificationRequest::break_ended().title, "Break's over");
    }

    #[test]
    fn recording_dispatcher_shares_log_between_clones() {
        let recorder = RecordingDispatcher::new();
        let mut owned = recorder.clone();
        owned.dispatch(&NotificationRequest::work_ended(2)).unwrap();
        owned.dispatch(&NotificationRequest::break_ended()).unwrap();

        assert_eq!(recorder.count(NotificationKind::WorkEnded), 1);
        assert_eq!(recorder.count(NotificationKind::BreakEnded), 1);
        assert_eq!(recorder.take().len(), 2);
        assert!(recorder.sent().is_empty());
    }

    #[test]
    fn recording_dispatcher_survives_a_poisoned_lock() {
        let recorder = RecordingDispatcher::new();
        let mut owned = recorder.clone();
        owned.dispatch(&NotificationRequest::break_ended()).unwrap();

        let shared = recorder.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.sent.lock().unwrap();
            panic!("poison the recorder");
        })
        .join();
        assert!(recorder.sent.is_poisoned());

        assert_eq!(recorder.sent().len(), 1);
        owned.dispatch(&NotificationRequest::work_ended(5)).unwrap();
        assert_eq!(recorder.take().len(), 2);
        assert!(recorder.sent().is_empty());
    }

    #[test]
    fn log_dispatcher_never_fails() {
        let mut log = LogDispatcher;
        assert!(log.dispatch(&NotificationRequest::break_ended()).is_ok());
    }
}
