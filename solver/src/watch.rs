use std::sync::mpsc::{sync_channel, Receiver, SyncSender};

use serde::Serialize;

/// Progress of a run for live dashboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchSnapshot {
    pub scenario: String,
    pub solver: String,
    pub run_id: String,
    pub iteration: usize,
    pub max_iterations: usize,
    pub objective: f64,
    pub best_objective: f64,
    pub temperature: Option<f64>,
    pub acceptance_rate: f64,
    pub restarts: u64,
    pub worker_utilisation: f64,
}

/// Sending side of a bounded snapshot queue. Publishing never blocks: when the queue is full
/// the snapshot is dropped.
#[derive(Clone)]
pub struct WatchPublisher {
    sender: SyncSender<WatchSnapshot>,
}

impl WatchPublisher {
    /// Returns false if the snapshot was dropped.
    pub fn publish(&self, snapshot: WatchSnapshot) -> bool {
        self.sender.try_send(snapshot).is_ok()
    }
}

pub fn watch_queue(capacity: usize) -> (WatchPublisher, Receiver<WatchSnapshot>) {
    let (sender, receiver) = sync_channel(capacity);
    (WatchPublisher { sender }, receiver)
}
