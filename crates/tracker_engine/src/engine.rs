use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracker_logging::{tracker_debug, tracker_error, tracker_warn};

use crate::client::ApiClient;
use crate::persist::ArtifactSaver;
use crate::wire::CreateJobRequest;
use crate::{ApiError, EngineEvent, Ticket, TimerId};

enum EngineCommand {
    ListSites,
    CreateJob {
        ticket: Ticket,
        request: CreateJobRequest,
    },
    FetchStatus {
        job_id: String,
    },
    Download {
        job_id: String,
        filename: String,
    },
    StartTimer {
        timer: TimerId,
        period: Duration,
    },
    CancelTimer {
        timer: TimerId,
    },
}

/// Front of the IO thread. Commands are handled in the order they are sent;
/// results come back on the event receiver returned by [`EngineHandle::spawn`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Starts the IO thread. It runs until every handle is dropped.
    pub fn spawn(
        client: Arc<dyn ApiClient>,
        saver: ArtifactSaver,
    ) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    tracker_error!("Could not start IO runtime: {}", err);
                    return;
                }
            };
            let mut timers: HashMap<TimerId, JoinHandle<()>> = HashMap::new();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartTimer { timer, period } => {
                        let task = runtime.spawn(run_timer(timer, period, event_tx.clone()));
                        if let Some(previous) = timers.insert(timer, task) {
                            tracker_warn!("Timer {} restarted while live", timer);
                            previous.abort();
                        }
                    }
                    EngineCommand::CancelTimer { timer } => match timers.remove(&timer) {
                        Some(task) => {
                            tracker_debug!("Timer {} cancelled", timer);
                            task.abort();
                        }
                        None => tracker_debug!("Timer {} already gone", timer),
                    },
                    request => {
                        let client = client.clone();
                        let saver = saver.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_request(client.as_ref(), &saver, request, event_tx).await;
                        });
                    }
                }
            }

            for (_, task) in timers.drain() {
                task.abort();
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn list_sites(&self) {
        self.send(EngineCommand::ListSites);
    }

    pub fn create_job(&self, ticket: Ticket, request: CreateJobRequest) {
        self.send(EngineCommand::CreateJob { ticket, request });
    }

    pub fn fetch_status(&self, job_id: impl Into<String>) {
        self.send(EngineCommand::FetchStatus {
            job_id: job_id.into(),
        });
    }

    pub fn download(&self, job_id: impl Into<String>, filename: impl Into<String>) {
        self.send(EngineCommand::Download {
            job_id: job_id.into(),
            filename: filename.into(),
        });
    }

    /// Emits `TimerFired { timer }` every `period`, first after one period.
    pub fn start_timer(&self, timer: TimerId, period: Duration) {
        self.send(EngineCommand::StartTimer { timer, period });
    }

    pub fn cancel_timer(&self, timer: TimerId) {
        self.send(EngineCommand::CancelTimer { timer });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            tracker_error!("IO thread is gone; command dropped");
        }
    }
}

async fn run_timer(timer: TimerId, period: Duration, event_tx: mpsc::Sender<EngineEvent>) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        if event_tx.send(EngineEvent::TimerFired { timer }).is_err() {
            break;
        }
    }
}

async fn handle_request(
    client: &dyn ApiClient,
    saver: &ArtifactSaver,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::ListSites => EngineEvent::SitesListed(client.list_sites().await),
        EngineCommand::CreateJob { ticket, request } => EngineEvent::JobCreated {
            ticket,
            result: client.create_job(&request).await,
        },
        EngineCommand::FetchStatus { job_id } => {
            let result = client.job_status(&job_id).await;
            EngineEvent::StatusFetched { job_id, result }
        }
        EngineCommand::Download { job_id, filename } => {
            let result = match client.download(&job_id).await {
                Ok(bytes) => saver
                    .save(&filename, &bytes)
                    .map_err(|err| ApiError::Persist(err.to_string())),
                Err(err) => Err(err),
            };
            EngineEvent::ArtifactSaved { job_id, result }
        }
        EngineCommand::StartTimer { .. } | EngineCommand::CancelTimer { .. } => return,
    };
    let _ = event_tx.send(event);
}
