//! Background execution of a generation run.
//!
//! The batch runs on a worker thread and streams [`Event`]s over a channel,
//! so a frontend can keep its own loop responsive while files are written.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::processor::{CancelToken, Event, EventSink, Processor, RunOptions, Stats};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

/// Starts generation runs, allowing at most one at a time.
#[derive(Debug, Clone, Default)]
pub struct GenerationService {
    running: Arc<AtomicBool>,
}

impl GenerationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawns a run over `config` on a worker thread.
    ///
    /// The configuration is checked on the worker. Suspicious settings are
    /// reported as [`Event::Warning`] and the run goes on; an unusable
    /// configuration is reported as [`Event::Failed`] and returned from
    /// [`GenerationHandle::join`].
    ///
    /// # Errors
    /// * `Error::AlreadyRunning` if a run started by this service is still active
    /// * `Error::IoError` if the worker thread cannot be spawned
    pub fn start(&self, config: Config, options: RunOptions) -> Result<GenerationHandle> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::AlreadyRunning);
        }

        let (sender, events) = mpsc::channel();
        let cancel = CancelToken::new();
        let guard = RunningGuard(self.running.clone());
        let worker_cancel = cancel.clone();

        // A failed spawn drops the closure, and the guard with it.
        let worker = thread::Builder::new()
            .name("recipegen-worker".to_string())
            .spawn(move || {
                let _guard = guard;
                run_worker(&config, options, &worker_cancel, &sender)
            })?;

        Ok(GenerationHandle { events, cancel, running: self.running.clone(), worker })
    }
}

fn run_worker(
    config: &Config,
    options: RunOptions,
    cancel: &CancelToken,
    sink: &mpsc::Sender<Event>,
) -> Result<Stats> {
    debug!("Generation worker started");
    for warning in config.warnings() {
        sink.emit(Event::Warning(warning));
    }
    if let Err(e) = config.ensure_valid() {
        sink.emit(Event::Failed(e.to_string()));
        return Err(e);
    }
    let stats = Processor::new(config).run(options, cancel, sink);
    debug!("Generation worker finished");
    Ok(stats)
}

/// Clears the running flag when the worker ends, including on panic.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Handle to a run in progress.
#[derive(Debug)]
pub struct GenerationHandle {
    events: mpsc::Receiver<Event>,
    cancel: CancelToken,
    running: Arc<AtomicBool>,
    worker: thread::JoinHandle<Result<Stats>>,
}

impl GenerationHandle {
    /// Events emitted by the run. The channel closes when the worker ends.
    pub fn events(&self) -> &mpsc::Receiver<Event> {
        &self.events
    }

    /// Requests cancellation. The run stops before its next template or file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) && !self.worker.is_finished()
    }

    /// Waits for the worker and returns the final stats.
    pub fn join(self) -> Result<Stats> {
        self.worker.join().map_err(|_| Error::WorkerPanicked)?
    }
}
