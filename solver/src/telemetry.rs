
use std::io::Write;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::watch::{WatchPublisher, WatchSnapshot};

/// Step events are handed to the sink in chunks of this size.
const FLUSH_EVERY: usize = 32;

/// State of a run at one iteration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub iteration: usize,
    pub objective: f64,
    pub best_objective: f64,
    pub temperature: Option<f64>,
    pub acceptance_rate: f64,
    pub proposals: u64,
    pub accepted: u64,
}

impl Progress {
    pub fn new(
        iteration: usize,
        objective: f64,
        best_objective: f64,
        temperature: Option<f64>,
        proposals: u64,
        accepted: u64,
    ) -> Progress {
        let acceptance_rate = if proposals == 0 {
            0.0
        } else {
            accepted as f64 / proposals as f64
        };
        Progress {
            iteration,
            objective,
            best_objective,
            temperature,
            acceptance_rate,
            proposals,
            accepted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TelemetryEvent {
    RunStart {
        run_id: String,
        solver: String,
        scenario: String,
        seed: u64,
        max_iterations: usize,
        #[serde(flatten)]
        progress: Progress,
    },
    Step {
        run_id: String,
        #[serde(flatten)]
        progress: Progress,
    },
    RunFinish {
        run_id: String,
        restarts: u64,
        #[serde(flatten)]
        progress: Progress,
    },
}

impl TelemetryEvent {
    pub fn run_id(&self) -> &str {
        match self {
            TelemetryEvent::RunStart { run_id, .. }
            | TelemetryEvent::Step { run_id, .. }
            | TelemetryEvent::RunFinish { run_id, .. } => run_id,
        }
    }

    pub fn progress(&self) -> &Progress {
        match self {
            TelemetryEvent::RunStart { progress, .. }
            | TelemetryEvent::Step { progress, .. }
            | TelemetryEvent::RunFinish { progress, .. } => progress,
        }
    }
}

/// Receiver of the structured events of a run. Implementations must not block for long; the
/// search hands events over at safe points only.
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, event: TelemetryEvent);

    fn flush(&self) {}
}

/// Drops every event.
#[derive(Default)]
pub struct NoTelemetry;

impl TelemetrySink for NoTelemetry {
    fn emit(&self, _event: TelemetryEvent) {}
}

/// Hands events to another thread through an unbounded channel.
pub struct ChannelTelemetry {
    sender: Mutex<Sender<TelemetryEvent>>,
}

impl ChannelTelemetry {
    pub fn new() -> (ChannelTelemetry, Receiver<TelemetryEvent>) {
        let (sender, receiver) = channel();
        (
            ChannelTelemetry {
                sender: Mutex::new(sender),
            },
            receiver,
        )
    }
}

impl TelemetrySink for ChannelTelemetry {
    fn emit(&self, event: TelemetryEvent) {
        if let Ok(sender) = self.sender.lock() {
            // a dropped receiver only means nobody listens anymore
            let _ = sender.send(event);
        }
    }
}

/// Keeps all events in memory, e.g. to write them as JSON lines after the run.
#[derive(Default)]
pub struct BufferedTelemetry {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl BufferedTelemetry {
    pub fn new() -> BufferedTelemetry {
        BufferedTelemetry::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// One JSON object per line.
    pub fn write_json_lines<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for event in self.events() {
            serde_json::to_writer(&mut writer, &event)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}

impl TelemetrySink for BufferedTelemetry {
    fn emit(&self, event: TelemetryEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Per-run adapter between a search driver and its sinks: throttles snapshots to the
/// configured interval, buffers step events and prints progress in verbose mode.
pub(crate) struct RunRecorder {
    run_id: String,
    solver: &'static str,
    scenario: String,
    max_iterations: usize,
    snapshot_interval: usize,
    sink: Arc<dyn TelemetrySink>,
    watch: Option<WatchPublisher>,
    verbose: bool,
    pending: Vec<TelemetryEvent>,
}

impl RunRecorder {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        run_id: String,
        solver: &'static str,
        scenario: String,
        max_iterations: usize,
        snapshot_interval: usize,
        sink: Arc<dyn TelemetrySink>,
        watch: Option<WatchPublisher>,
        verbose: bool,
    ) -> RunRecorder {
        RunRecorder {
            run_id,
            solver,
            scenario,
            max_iterations,
            snapshot_interval,
            sink,
            watch,
            verbose,
            pending: Vec::new(),
        }
    }

    pub(crate) fn run_id(&self) -> &str {
        &self.run_id
    }

    pub(crate) fn start(&mut self, seed: u64, progress: Progress) {
        if self.verbose {
            println!(
                "\n---------- {} (seed {}, {} iterations) ----------",
                self.run_id, seed, self.max_iterations
            );
            println!("initial objective: {:.2}", progress.objective);
        }
        self.sink.emit(TelemetryEvent::RunStart {
            run_id: self.run_id.clone(),
            solver: self.solver.to_string(),
            scenario: self.scenario.clone(),
            seed,
            max_iterations: self.max_iterations,
            progress,
        });
    }

    /// Records the progress if the iteration is a multiple of the snapshot interval
    /// (0 disables snapshots).
    pub(crate) fn step(&mut self, progress: Progress, restarts: u64, worker_utilisation: f64) {
        if self.snapshot_interval == 0 || progress.iteration % self.snapshot_interval != 0 {
            return;
        }
        if self.verbose {
            println!(
                "{} iteration {}/{}: objective {:.2}, best {:.2}, acceptance {:.2}",
                self.run_id,
                progress.iteration,
                self.max_iterations,
                progress.objective,
                progress.best_objective,
                progress.acceptance_rate
            );
        }
        if let Some(watch) = &self.watch {
            watch.publish(WatchSnapshot {
                scenario: self.scenario.clone(),
                solver: self.solver.to_string(),
                run_id: self.run_id.clone(),
                iteration: progress.iteration,
                max_iterations: self.max_iterations,
                objective: progress.objective,
                best_objective: progress.best_objective,
                temperature: progress.temperature,
                acceptance_rate: progress.acceptance_rate,
                restarts,
                worker_utilisation,
            });
        }
        self.pending.push(TelemetryEvent::Step {
            run_id: self.run_id.clone(),
            progress,
        });
        if self.pending.len() >= FLUSH_EVERY {
            self.flush();
        }
    }

    pub(crate) fn finish(&mut self, progress: Progress, restarts: u64) {
        self.flush();
        if self.verbose {
            println!(
                "{} finished after {} iterations: best objective {:.2} ({} restarts)",
                self.run_id, progress.iteration, progress.best_objective, restarts
            );
        }
        self.sink.emit(TelemetryEvent::RunFinish {
            run_id: self.run_id.clone(),
            restarts,
            progress,
        });
        self.sink.flush();
    }

    fn flush(&mut self) {
        for event in self.pending.drain(..) {
            self.sink.emit(event);
        }
    }
}
