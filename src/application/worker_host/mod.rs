//! Worker Host (C8, spec.md §4.8).
//!
//! Multiplexes many [`StationRuntime`]s onto bounded OS threads. Each
//! "worker" here is a dedicated OS thread running its own single-threaded
//! Tokio runtime — a station runtime's own sub-tasks (reader, heartbeat,
//! ATG, meter) are `Send` futures spawned onto that runtime, so several
//! stations share one thread, matching spec.md §4.8's "group of up to
//! elementsPerWorker stations".

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use crate::application::station::StationRuntime;
use crate::support::shutdown::ShutdownSignal;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum WorkerHostMode {
    WorkerSet {
        elements_per_worker: usize,
        worker_start_delay: Duration,
    },
    FixedPool {
        pool_max_size: usize,
    },
    DynamicPool {
        pool_min_size: usize,
        pool_max_size: usize,
    },
}

#[derive(Debug, Clone)]
pub struct WorkerHostConfig {
    pub mode: WorkerHostMode,
    pub element_add_delay: Duration,
    pub element_add_jitter: Duration,
    pub shutdown_deadline_secs: u64,
}

/// `{started, stopped, elementAdded, elementError, error}` (spec.md §4.8).
#[derive(Debug, Clone)]
pub enum WorkerHostEvent {
    Started,
    Stopped,
    ElementAdded { worker_id: usize, station_id: String },
    ElementError { station_id: String, error: String },
    Error(String),
}

struct Worker {
    id: usize,
    shutdown: ShutdownSignal,
    dispatch_tx: mpsc::UnboundedSender<Arc<StationRuntime>>,
    assigned: AtomicUsize,
    thread: StdMutex<Option<std::thread::JoinHandle<()>>>,
}

impl Worker {
    fn spawn(id: usize, events: broadcast::Sender<WorkerHostEvent>) -> Arc<Self> {
        let shutdown = ShutdownSignal::new();
        let (dispatch_tx, mut dispatch_rx) = mpsc::unbounded_channel::<Arc<StationRuntime>>();
        let shutdown_for_thread = shutdown.clone();

        let thread = std::thread::Builder::new()
            .name(format!("station-worker-{id}"))
            .spawn(move || {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed to build worker thread's Tokio runtime");

                rt.block_on(async move {
                    loop {
                        tokio::select! {
                            _ = shutdown_for_thread.notified().wait() => break,
                            next = dispatch_rx.recv() => {
                                match next {
                                    Some(runtime) => {
                                        let station_id = runtime.station_id().to_string();
                                        if let Err(err) = runtime.start().await {
                                            warn!(worker_id = id, station_id, %err, "station failed to start");
                                            let _ = events.send(WorkerHostEvent::ElementError {
                                                station_id,
                                                error: err.to_string(),
                                            });
                                        }
                                    }
                                    None => break,
                                }
                            }
                        }
                    }
                });
            })
            .expect("failed to spawn worker OS thread");

        Arc::new(Self {
            id,
            shutdown,
            dispatch_tx,
            assigned: AtomicUsize::new(0),
            thread: StdMutex::new(Some(thread)),
        })
    }

    fn dispatch(&self, runtime: Arc<StationRuntime>) {
        self.assigned.fetch_add(1, Ordering::SeqCst);
        let _ = self.dispatch_tx.send(runtime);
    }

    fn load(&self) -> usize {
        self.assigned.load(Ordering::SeqCst)
    }

    async fn stop(&self, deadline_secs: u64) {
        self.shutdown.trigger();
        let id = self.id;
        let handle = self.thread.lock().expect("worker thread mutex poisoned").take();
        let Some(handle) = handle else { return };
        let joined = tokio::task::spawn_blocking(move || handle.join());
        match tokio::time::timeout(Duration::from_secs(deadline_secs), joined).await {
            Ok(Ok(Ok(()))) => info!(worker_id = id, "worker thread shut down cleanly"),
            Ok(Ok(Err(_))) => error!(worker_id = id, "worker thread panicked"),
            Ok(Err(_)) => error!(worker_id = id, "worker join task failed"),
            Err(_) => warn!(worker_id = id, deadline_secs, "worker shutdown deadline exceeded, abandoning thread"),
        }
    }
}

/// Spreads [`StationRuntime`]s across a bounded set of OS threads under one
/// of the three modes described in spec.md §4.8.
pub struct WorkerHost {
    config: WorkerHostConfig,
    events_tx: broadcast::Sender<WorkerHostEvent>,
    workers: StdMutex<Vec<Arc<Worker>>>,
    next_worker_id: AtomicUsize,
    round_robin: AtomicUsize,
}

impl WorkerHost {
    pub fn new(config: WorkerHostConfig) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            events_tx,
            workers: StdMutex::new(Vec::new()),
            next_worker_id: AtomicUsize::new(0),
            round_robin: AtomicUsize::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkerHostEvent> {
        self.events_tx.subscribe()
    }

    fn spawn_worker(&self) -> Arc<Worker> {
        let id = self.next_worker_id.fetch_add(1, Ordering::SeqCst);
        let worker = Worker::spawn(id, self.events_tx.clone());
        self.workers.lock().expect("workers mutex poisoned").push(worker.clone());
        worker
    }

    /// Worker Host creation/startup is restricted to the main thread/process
    /// (spec.md §6); for `FixedPool` the full pool is pre-warmed here.
    pub async fn start(&self) {
        if let WorkerHostMode::FixedPool { pool_max_size } = self.config.mode {
            for _ in 0..pool_max_size {
                self.spawn_worker();
            }
        } else if let WorkerHostMode::DynamicPool { pool_min_size, .. } = self.config.mode {
            for _ in 0..pool_min_size {
                self.spawn_worker();
            }
        }
        let _ = self.events_tx.send(WorkerHostEvent::Started);
    }

    /// `addElement(data) → R` (spec.md §4.8): assigns one station runtime to
    /// a worker thread per the configured mode, then sleeps
    /// `elementAddDelay` (± jitter) to serialise startup.
    pub async fn add_element(&self, runtime: Arc<StationRuntime>) {
        let station_id = runtime.station_id().to_string();
        let worker = self.pick_worker_for_new_element();
        let worker_id = worker.id;
        worker.dispatch(runtime);
        let _ = self.events_tx.send(WorkerHostEvent::ElementAdded { worker_id, station_id });

        let delay = self.jittered_add_delay();
        tokio::time::sleep(delay).await;
    }

    fn jittered_add_delay(&self) -> Duration {
        if self.config.element_add_jitter.is_zero() {
            return self.config.element_add_delay;
        }
        let jitter_ms = self.config.element_add_jitter.as_millis() as i64;
        let offset = rand::thread_rng().gen_range(-jitter_ms..=jitter_ms);
        let base_ms = self.config.element_add_delay.as_millis() as i64;
        Duration::from_millis(base_ms.saturating_add(offset).max(0) as u64)
    }

    fn pick_worker_for_new_element(&self) -> Arc<Worker> {
        match self.config.mode {
            WorkerHostMode::WorkerSet { elements_per_worker, .. } => {
                let mut workers = self.workers.lock().expect("workers mutex poisoned");
                if let Some(last) = workers.last() {
                    if last.load() < elements_per_worker {
                        return last.clone();
                    }
                }
                drop(workers);
                // New worker thread: spec.md §4.8 staggers creation by
                // `workerStartDelay` to smooth memory pressure. The delay is
                // applied here rather than before the very first worker.
                let is_first = self.workers.lock().expect("workers mutex poisoned").is_empty();
                if !is_first {
                    if let WorkerHostMode::WorkerSet { worker_start_delay, .. } = self.config.mode {
                        std::thread::sleep(worker_start_delay);
                    }
                }
                self.spawn_worker()
            }
            WorkerHostMode::FixedPool { .. } => self.round_robin_existing(),
            WorkerHostMode::DynamicPool { pool_max_size, .. } => {
                let workers = self.workers.lock().expect("workers mutex poisoned");
                let count = workers.len();
                let all_loaded = workers.iter().all(|w| w.load() >= 1);
                drop(workers);
                if all_loaded && count < pool_max_size {
                    self.spawn_worker()
                } else {
                    self.round_robin_existing()
                }
            }
        }
    }

    fn round_robin_existing(&self) -> Arc<Worker> {
        let workers = self.workers.lock().expect("workers mutex poisoned");
        let idx = self.round_robin.fetch_add(1, Ordering::SeqCst) % workers.len().max(1);
        workers[idx].clone()
    }

    /// `stop()` (spec.md §4.8, §5 shutdown cascade): each worker thread is
    /// given `shutdown_deadline_secs` to drain before being abandoned.
    pub async fn stop(&self) {
        let workers: Vec<Arc<Worker>> = self.workers.lock().expect("workers mutex poisoned").drain(..).collect();
        for worker in &workers {
            worker.stop(self.config.shutdown_deadline_secs).await;
        }
        let _ = self.events_tx.send(WorkerHostEvent::Stopped);
    }

    pub fn worker_count(&self) -> usize {
        self.workers.lock().expect("workers mutex poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(mode: WorkerHostMode) -> WorkerHostConfig {
        WorkerHostConfig {
            mode,
            element_add_delay: Duration::from_millis(1),
            element_add_jitter: Duration::ZERO,
            shutdown_deadline_secs: 5,
        }
    }

    #[tokio::test]
    async fn fixed_pool_pre_warms_all_workers_on_start() {
        let host = WorkerHost::new(test_config(WorkerHostMode::FixedPool { pool_max_size: 3 }));
        host.start().await;
        assert_eq!(host.worker_count(), 3);
        host.stop().await;
    }

    #[tokio::test]
    async fn dynamic_pool_starts_at_minimum_size() {
        let host = WorkerHost::new(test_config(WorkerHostMode::DynamicPool {
            pool_min_size: 1,
            pool_max_size: 4,
        }));
        host.start().await;
        assert_eq!(host.worker_count(), 1);
        host.stop().await;
    }

    #[tokio::test]
    async fn worker_set_groups_elements_before_spawning_a_new_worker() {
        let host = WorkerHost::new(test_config(WorkerHostMode::WorkerSet {
            elements_per_worker: 2,
            worker_start_delay: Duration::from_millis(1),
        }));
        host.start().await;
        assert_eq!(host.worker_count(), 0);
        // pick_worker_for_new_element is exercised indirectly via add_element
        // in integration-style tests once a real StationRuntime is available;
        // here we only assert the pool starts empty until the first element.
    }
}
