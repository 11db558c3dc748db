//! Interactive terminal session.
//!
//! Reads one command per line from stdin and forwards it to the timer
//! session; every snapshot change is rendered on stdout.

use clap::Args;
use lilytimer_core::error::Result;
use lilytimer_core::{
    Command, Config, Event, IntervalTicks, LogDispatcher, NotificationDispatcher, Phase,
    TimerSession, TimerSnapshot,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::desktop::DesktopDispatcher;

const HELP: &str = "commands: start | pause | stop | yes | no \
    | set <work_secs> <break_secs> | status | help | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Work interval in seconds (overrides config)
    #[arg(long)]
    work: Option<u64>,
    /// Break interval in seconds (overrides config)
    #[arg(long = "break")]
    brk: Option<u64>,
    /// Start the work interval immediately
    #[arg(long)]
    start: bool,
    /// Log notifications instead of showing desktop notifications
    #[arg(long)]
    no_notify: bool,
    /// Print snapshots and events as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Command(Command),
    Status,
    Help,
    Quit,
    Empty,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Input::Empty);
    };

    let input = match head.to_ascii_lowercase().as_str() {
        "start" | "s" => Input::Command(Command::Start),
        "pause" | "resume" | "p" => Input::Command(Command::TogglePause),
        "stop" => Input::Command(Command::RequestStop),
        "yes" | "y" | "confirm" => Input::Command(Command::ConfirmStop),
        "no" | "n" | "cancel" => Input::Command(Command::CancelStop),
        "set" => {
            let mut secs = || -> Result<u64, String> {
                words
                    .next()
                    .ok_or_else(|| "usage: set <work_secs> <break_secs>".to_string())?
                    .parse::<u64>()
                    .map_err(|e| format!("invalid duration: {e}"))
            };
            let work_secs = secs()?;
            let break_secs = secs()?;
            Input::Command(Command::Configure {
                work_secs,
                break_secs,
            })
        }
        "status" => Input::Status,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("unknown command: {other} (type 'help')")),
    };

    if words.next().is_some() {
        return Err(format!("unexpected arguments after '{head}'"));
    }
    Ok(input)
}

fn render_snapshot(snap: &TimerSnapshot) -> String {
    let mut line = match snap.phase {
        Phase::Idle => format!(
            "[idle]    work {} / break {}",
            lilytimer_core::format_remaining(snap.work_secs),
            lilytimer_core::format_remaining(snap.break_secs)
        ),
        Phase::Working => format!("[working] {}  {}", snap.display, snap.stage.asset_name()),
        Phase::Break => format!("[break]   {}  {}", snap.display, snap.stage.asset_name()),
    };
    if snap.is_paused {
        line.push_str("  (paused)");
    }
    if snap.pending_stop_confirmation {
        line.push_str("  stop? yes/no");
    }
    line
}

fn render_event(event: &Event) -> Option<String> {
    match event {
        Event::StopRequested { .. } => Some(
            "Are you sure you want to stop? You will lose all progress. (yes/no)".to_string(),
        ),
        Event::WorkEnded { notification, .. } | Event::BreakEnded { notification, .. } => {
            Some(format!("{} {}", notification.title, notification.body))
        }
        _ => None,
    }
}

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn snapshot(&self, snap: &TimerSnapshot) {
        if self.json {
            self.json_line(snap);
        } else {
            println!("{}", render_snapshot(snap));
        }
    }

    fn event(&self, event: &Event) {
        if self.json {
            self.json_line(event);
        } else if let Some(text) = render_event(event) {
            println!("{text}");
        }
    }

    fn json_line<T: serde::Serialize>(&self, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!("failed to encode output: {e}"),
        }
    }
}

async fn render_loop(
    output: Output,
    mut snapshots: watch::Receiver<TimerSnapshot>,
    mut events: broadcast::Receiver<Event>,
) {
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => output.event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "renderer fell behind on events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = snapshots.borrow_and_update().clone();
                output.snapshot(&snap);
            }
        }
    }
}

async fn interactive(args: RunArgs, config: Config) -> Result<()> {
    let mut engine = config.engine();
    if args.work.is_some() || args.brk.is_some() {
        let current = engine.durations();
        engine.configure(
            args.work.unwrap_or(current.work_secs),
            args.brk.unwrap_or(current.break_secs),
        );
    }

    let dispatcher: Box<dyn NotificationDispatcher> =
        if args.no_notify || !config.notifications.enabled {
            Box::new(LogDispatcher)
        } else {
            Box::new(DesktopDispatcher)
        };

    let output = Output { json: args.json };
    let handle = TimerSession::spawn(engine, IntervalTicks::every_second(), dispatcher);
    let renderer = tokio::spawn(render_loop(
        output,
        handle.subscribe_snapshots(),
        handle.subscribe_events(),
    ));

    if !args.json {
        eprintln!("{HELP}");
    }
    output.snapshot(&handle.snapshot());
    if args.start {
        handle.start().await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Ok(Input::Command(cmd)) => handle.send(cmd).await?,
            Ok(Input::Status) => output.snapshot(&handle.current_snapshot().await?),
            Ok(Input::Help) => eprintln!("{HELP}"),
            Ok(Input::Empty) => {}
            Ok(Input::Quit) => break,
            Err(msg) => eprintln!("{msg}"),
        }
    }

    let engine = handle.shutdown().await?;
    if let Err(e) = renderer.await {
        warn!("renderer task failed: {e}");
    }
    debug!(phase = ?engine.phase(), remaining_secs = engine.remaining_secs(), "session closed");
    Ok(())
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(interactive(args, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lilytimer_core::TimerEngine;

    #[test]
    fn parses_operation_words() {
        assert_eq!(parse_input("start"), Ok(Input::Command(Command::Start)));
        assert_eq!(parse_input("  Pause "), Ok(Input::Command(Command::TogglePause)));
        assert_eq!(parse_input("stop"), Ok(Input::Command(Command::RequestStop)));
        assert_eq!(parse_input("yes"), Ok(Input::Command(Command::ConfirmStop)));
        assert_eq!(parse_input("no"), Ok(Input::Command(Command::CancelStop)));
        assert_eq!(parse_input(""), Ok(Input::Empty));
        assert_eq!(parse_input("quit"), Ok(Input::Quit));
    }

    #[test]
    fn parses_set() {
        assert_eq!(
            parse_input("set 90 30"),
            Ok(Input::Command(Command::Configure {
                work_secs: 90,
                break_secs: 30
            }))
        );
        assert!(parse_input("set 90").is_err());
        assert!(parse_input("set ninety 30").is_err());
        assert!(parse_input("set 1 2 3").is_err());
    }

    #[test]
    fn rejects_unknown_words() {
        assert!(parse_input("launch").is_err());
        assert!(parse_input("start now").is_err());
    }

    #[test]
    fn renders_working_snapshot() {
        let mut engine = TimerEngine::new();
        engine.configure(120, 60);
        engine.start();
        engine.toggle_pause();
        engine.request_stop();
        let line = render_snapshot(&engine.snapshot());
        assert_eq!(line, "[working] 2:00  Stage1  (paused)  stop? yes/no");
    }

    #[test]
    fn renders_idle_snapshot() {
        let line = render_snapshot(&TimerEngine::new().snapshot());
        assert_eq!(line, "[idle]    work 25:00 / break 5:00");
    }

    #[test]
    fn renders_completion_notice() {
        let mut engine = TimerEngine::new();
        engine.configure(1, 300);
        engine.start();
        let event = engine.tick().unwrap();
        assert_eq!(
            render_event(&event).as_deref(),
            Some("Time for a break! Work session complete. Enjoy your 5 minute break.")
        );
    }
}
