//! Serialized timer session.
//!
//! One tokio task owns the [`TimerEngine`]. User intent arrives as
//! [`Command`]s on a queue, ticks arrive from the [`TickSource`], and both
//! are applied strictly one at a time. After every step the task broadcasts
//! the resulting [`Event`], then publishes a fresh [`TimerSnapshot`].

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::clock::TickSource;
use crate::error::SessionError;
use crate::events::Event;
use crate::notify::NotificationDispatcher;
use crate::timer::{TimerEngine, TimerSnapshot};

const COMMAND_QUEUE: usize = 32;
const EVENT_BUFFER: usize = 64;

/// User intent forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Configure { work_secs: u64, break_secs: u64 },
    Start,
    TogglePause,
    RequestStop,
    ConfirmStop,
    CancelStop,
}

enum Message {
    Command(Command),
    Snapshot(oneshot::Sender<TimerSnapshot>),
    Shutdown(oneshot::Sender<TimerEngine>),
}

/// The actor owning the engine. Use [`TimerSession::spawn`].
pub struct TimerSession<T, D> {
    engine: TimerEngine,
    ticks: T,
    dispatcher: D,
    inbox: mpsc::Receiver<Message>,
    snapshots: watch::Sender<TimerSnapshot>,
    events: broadcast::Sender<Event>,
}

impl<T, D> TimerSession<T, D>
where
    T: TickSource + 'static,
    D: NotificationDispatcher + 'static,
{
    /// Start the session task on the current tokio runtime.
    pub fn spawn(engine: TimerEngine, ticks: T, dispatcher: D) -> SessionHandle {
        let (tx, inbox) = mpsc::channel(COMMAND_QUEUE);
        let (snapshots, snapshot_rx) = watch::channel(engine.snapshot());
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let session = TimerSession {
            engine,
            ticks,
            dispatcher,
            inbox,
            snapshots,
            events: events.clone(),
        };
        let task = tokio::spawn(session.run());

        SessionHandle {
            tx,
            snapshots: snapshot_rx,
            events,
            task: Some(task),
        }
    }

    async fn run(mut self) {
        debug!("timer session started");
        loop {
            let active = self.engine.is_active();
            let event = tokio::select! {
                biased;
                msg = self.inbox.recv() => match msg {
                    Some(Message::Command(cmd)) => self.apply(cmd),
                    Some(Message::Snapshot(reply)) => {
                        let _ = reply.send(self.engine.snapshot());
                        None
                    }
                    Some(Message::Shutdown(reply)) => {
                        let _ = reply.send(self.engine.clone());
                        break;
                    }
                    None => break,
                },
                _ = self.ticks.next_tick(), if active => self.engine.tick(),
            };
            self.publish(event);
        }
        debug!("timer session stopped");
    }

    fn apply(&mut self, cmd: Command) -> Option<Event> {
        debug!(?cmd, "applying command");
        match cmd {
            Command::Configure {
                work_secs,
                break_secs,
            } => self.engine.configure(work_secs, break_secs),
            Command::Start => {
                let event = self.engine.start();
                if event.is_some() {
                    self.ticks.restart();
                }
                event
            }
            Command::TogglePause => self.engine.toggle_pause(),
            Command::RequestStop => self.engine.request_stop(),
            Command::ConfirmStop => self.engine.confirm_stop(),
            Command::CancelStop => self.engine.cancel_stop(),
        }
    }

    fn publish(&mut self, event: Option<Event>) {
        if let Some(request) = event.as_ref().and_then(Event::notification) {
            if let Err(e) = self.dispatcher.dispatch(request) {
                warn!(kind = ?request.kind, "notification dispatch failed: {e}");
            }
        }

        if let Some(event) = event {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }

        let snapshot = self.engine.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

/// Handle to a running session.
///
/// Every method maps to one engine operation. Operations that are not
/// allowed in the current phase are silently ignored by the session.
pub struct SessionHandle {
    tx: mpsc::Sender<Message>,
    snapshots: watch::Receiver<TimerSnapshot>,
    events: broadcast::Sender<Event>,
    task: Option<JoinHandle<()>>,
}

impl SessionHandle {
    pub async fn send(&self, cmd: Command) -> Result<(), SessionError> {
        self.tx
            .send(Message::Command(cmd))
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub async fn configure(&self, work_secs: u64, break_secs: u64) -> Result<(), SessionError> {
        self.send(Command::Configure {
            work_secs,
            break_secs,
        })
        .await
    }

    pub async fn start(&self) -> Result<(), SessionError> {
        self.send(Command::Start).await
    }

    pub async fn toggle_pause(&self) -> Result<(), SessionError> {
        self.send(Command::TogglePause).await
    }

    pub async fn request_stop(&self) -> Result<(), SessionError> {
        self.send(Command::RequestStop).await
    }

    pub async fn confirm_stop(&self) -> Result<(), SessionError> {
        self.send(Command::ConfirmStop).await
    }

    pub async fn cancel_stop(&self) -> Result<(), SessionError> {
        self.send(Command::CancelStop).await
    }

    /// Snapshot taken after every command queued before this call.
    pub async fn current_snapshot(&self) -> Result<TimerSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Message::Snapshot(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshots.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Stop the session after all queued commands and return the final engine.
    pub async fn shutdown(mut self) -> Result<TimerEngine, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Message::Shutdown(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        let engine = rx.await.map_err(|_| SessionError::Closed)?;
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("timer session task failed: {e}");
            }
        }
        Ok(engine)
    }
}
