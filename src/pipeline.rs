//! Detection pipeline.
//!
//! Single producer, single worker: `submit_frame` runs the enabled check and
//! the frame throttle synchronously on the caller's thread, then hands the
//! frame to a dedicated worker over an mpsc channel. The channel is FIFO and
//! the worker processes strictly one job at a time, so results publish in
//! submission order with no extra synchronization.
//!
//! Phase and stats are written only by the worker (single-writer invariant);
//! callers read clones through the polling accessors or receive push updates
//! through `subscribe`, delivered from the worker thread right after each
//! mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use crate::alert::AlertTrigger;
use crate::detect::{filter_candidates, Detection, InferenceAdapter};
use crate::frame::Frame;
use crate::labels::LabelTable;
use crate::stats::{DetectionStats, StatsAggregator};
use crate::throttle::FrameThrottle;

/// Lifecycle phase of the current detection cycle.
///
/// Exactly one phase is live at a time and transitions are serialized through
/// the worker. Match exhaustively; new phases must not be silently ignored.
#[derive(Clone, Debug)]
pub enum DetectionPhase {
    Idle,
    Processing,
    Success(Vec<Detection>),
    Error(String),
}

impl DetectionPhase {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            DetectionPhase::Idle => "idle",
            DetectionPhase::Processing => "processing",
            DetectionPhase::Success(_) => "success",
            DetectionPhase::Error(_) => "error",
        }
    }
}

/// Push update delivered to subscribers from the worker thread.
#[derive(Clone, Debug)]
pub enum PipelineEvent {
    Phase(DetectionPhase),
    Stats(DetectionStats),
}

enum Command {
    Detect(Frame),
    Reset,
    Subscribe(mpsc::Sender<PipelineEvent>),
    Shutdown,
}

struct SharedState {
    phase: Mutex<DetectionPhase>,
    stats: Mutex<DetectionStats>,
}

/// The frame-to-detection pipeline: throttle, inference, filtering, phase
/// tracking, statistics, and alerting, wired behind one submission entry
/// point. Collaborators are injected at construction.
pub struct DetectionPipeline {
    tx: mpsc::Sender<Command>,
    shared: Arc<SharedState>,
    enabled: Arc<AtomicBool>,
    throttle: FrameThrottle,
    worker: Option<JoinHandle<()>>,
}

impl DetectionPipeline {
    pub fn new(
        adapter: InferenceAdapter,
        labels: LabelTable,
        score_threshold: f32,
        trigger: AlertTrigger,
        target_fps: u32,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let shared = Arc::new(SharedState {
            phase: Mutex::new(DetectionPhase::Idle),
            stats: Mutex::new(DetectionStats::default()),
        });

        let mut worker = Worker {
            adapter,
            labels,
            score_threshold,
            trigger,
            aggregator: StatsAggregator::new(),
            subscribers: Vec::new(),
            shared: shared.clone(),
        };
        let handle = thread::Builder::new()
            .name("detection-worker".to_string())
            .spawn(move || worker.run(rx))
            .context("failed to spawn detection worker")?;

        Ok(Self {
            tx,
            shared,
            enabled: Arc::new(AtomicBool::new(true)),
            throttle: FrameThrottle::new(target_fps),
            worker: Some(handle),
        })
    }

    /// Submit a camera frame. Returns true iff the frame was admitted.
    ///
    /// Frames are discarded with no state transition while detection is
    /// disabled, and discarded without side effect when the throttle rejects
    /// them. Admitted frames run as one ordered unit of work on the worker.
    pub fn submit_frame(&mut self, frame: Frame) -> bool {
        if !self.enabled.load(Ordering::SeqCst) {
            return false;
        }
        if !self.throttle.accept(frame.timestamp_nanos) {
            return false;
        }
        self.tx.send(Command::Detect(frame)).is_ok()
    }

    /// Enable or disable frame admission. Disabling does not cancel an
    /// in-flight detection cycle.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        log::info!("detection {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Reset to `Idle` and zero the statistics. The command is queued behind
    /// any in-flight work, so it serializes with frame processing.
    pub fn reset(&self) {
        let _ = self.tx.send(Command::Reset);
    }

    /// Snapshot of the current phase.
    pub fn current_phase(&self) -> DetectionPhase {
        match self.shared.phase.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Snapshot of the current statistics.
    pub fn current_stats(&self) -> DetectionStats {
        match self.shared.stats.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Register for push updates. Events are sent from the worker thread in
    /// mutation order; a receiver that hangs up is pruned on the next send.
    pub fn subscribe(&self) -> mpsc::Receiver<PipelineEvent> {
        let (tx, rx) = mpsc::channel();
        let _ = self.tx.send(Command::Subscribe(tx));
        rx
    }
}

impl Drop for DetectionPipeline {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

struct Worker {
    adapter: InferenceAdapter,
    labels: LabelTable,
    score_threshold: f32,
    trigger: AlertTrigger,
    aggregator: StatsAggregator,
    subscribers: Vec<mpsc::Sender<PipelineEvent>>,
    shared: Arc<SharedState>,
}

impl Worker {
    fn run(&mut self, rx: mpsc::Receiver<Command>) {
        log::info!(
            "detection worker started (backend: {})",
            self.adapter.backend_name()
        );
        while let Ok(command) = rx.recv() {
            match command {
                Command::Detect(frame) => self.process_frame(frame),
                Command::Reset => self.reset(),
                Command::Subscribe(tx) => self.subscribers.push(tx),
                Command::Shutdown => break,
            }
        }
        log::info!("detection worker stopped");
    }

    /// One ordered, non-interleaved detection cycle.
    fn process_frame(&mut self, frame: Frame) {
        self.set_phase(DetectionPhase::Processing);

        let result = self
            .adapter
            .detect(frame)
            .map(|raw| filter_candidates(&raw, &self.labels, self.score_threshold));

        match result {
            Ok(batch) => {
                self.set_phase(DetectionPhase::Success(batch.clone()));
                self.publish_stats(&batch);
                if self.trigger.evaluate(&batch) {
                    log::info!("safety alert for batch of {} detections", batch.len());
                }
            }
            Err(e) => {
                let message = format!("detection failed: {}", e);
                log::warn!("{}", message);
                self.set_phase(DetectionPhase::Error(message));
            }
        }
    }

    fn reset(&mut self) {
        self.set_phase(DetectionPhase::Idle);
        self.aggregator.reset();
        let stats = self.aggregator.current().clone();
        if let Ok(mut guard) = self.shared.stats.lock() {
            *guard = stats.clone();
        }
        self.notify(PipelineEvent::Stats(stats));
    }

    fn publish_stats(&mut self, batch: &[Detection]) {
        let stats = self.aggregator.update(batch).clone();
        if let Ok(mut guard) = self.shared.stats.lock() {
            *guard = stats.clone();
        }
        self.notify(PipelineEvent::Stats(stats));
    }

    fn set_phase(&mut self, phase: DetectionPhase) {
        if let Ok(mut guard) = self.shared.phase.lock() {
            *guard = phase.clone();
        }
        log::debug!("phase -> {}", phase.name());
        self.notify(PipelineEvent::Phase(phase));
    }

    fn notify(&mut self, event: PipelineEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}
