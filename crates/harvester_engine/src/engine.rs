use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Local;
use engine_logging::{engine_error, engine_info};
use tokio_util::sync::CancellationToken;

use crate::controller::{Clock, RunController};
use crate::events::{ChannelEventSink, EventSink};
use crate::extract::MarkupImageExtractor;
use crate::fetch::{FetchSettings, ReqwestFetcher};
use crate::{ClassificationTarget, LogLine, PageRequest, RunError, RunEvent, RunPhase, RunResult};

#[derive(Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub clock: Clock,
}

impl EngineConfig {
    pub fn local_clock() -> Clock {
        Arc::new(|| Local::now().naive_local())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            clock: Self::local_clock(),
        }
    }
}

/// Starts harvesting runs, each on its own worker thread with its own runtime,
/// so the caller never blocks on network I/O.
#[derive(Clone)]
pub struct EngineHandle {
    config: EngineConfig,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn start(&self, request: PageRequest, target: ClassificationTarget) -> RunHandle {
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();
        let config = self.config.clone();

        engine_info!(
            "Starting run url={} class={} dir={}",
            request.url,
            target.label,
            target.directory.display()
        );
        let worker = thread::spawn(move || {
            let sink = ChannelEventSink::new(event_tx);
            run_worker(&config, &request, &target, worker_cancel, &sink)
        });

        RunHandle {
            cancel,
            event_rx,
            worker,
        }
    }
}

fn run_worker(
    config: &EngineConfig,
    request: &PageRequest,
    target: &ClassificationTarget,
    cancel: CancellationToken,
    sink: &dyn EventSink,
) -> RunResult {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => return abort_run(sink, format!("tokio runtime: {err}")),
    };
    let fetcher = match ReqwestFetcher::new(config.fetch.clone()) {
        Ok(fetcher) => fetcher,
        Err(err) => return abort_run(sink, format!("http client: {err}")),
    };
    let extractor = MarkupImageExtractor;

    let controller = RunController::new(&fetcher, &extractor, sink, config.clock.clone(), cancel);
    runtime.block_on(controller.run(request, target))
}

fn abort_run(sink: &dyn EventSink, message: String) -> RunResult {
    engine_error!("Run could not start: {}", message);
    sink.emit(RunEvent::Log(LogLine::error(format!(
        "Run could not start: {message}"
    ))));
    let mut result = RunResult::empty();
    result.phase = RunPhase::Completed;
    result.error = Some(RunError::Startup(message));
    sink.emit(RunEvent::Finished(result.clone()));
    result
}

/// The caller's side of one run: events out, cancellation in.
pub struct RunHandle {
    cancel: CancellationToken,
    event_rx: mpsc::Receiver<RunEvent>,
    worker: thread::JoinHandle<RunResult>,
}

impl RunHandle {
    /// Request cooperative cancellation. Returns `false` once the run has ended,
    /// in which case the request has no effect.
    pub fn cancel(&self) -> bool {
        if self.worker.is_finished() {
            return false;
        }
        self.cancel.cancel();
        true
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    pub fn try_recv(&self) -> Option<RunEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Block for the next event; `None` once the run has ended and all events were read.
    pub fn recv(&self) -> Option<RunEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<RunEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Wait for the worker and return its tally.
    pub fn join(self) -> thread::Result<RunResult> {
        self.worker.join()
    }
}
