//! drivewatchd - DriveWatch detection daemon
//!
//! This daemon:
//! 1. Ingests frames from the configured camera source
//! 2. Gates them through the frame throttle at the target fps
//! 3. Runs the inference adapter + detection filter on a single worker
//! 4. Publishes phase and statistics updates
//! 5. Plays an audible alert on safety-critical detections

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;

use drivewatch::{
    AlertPolicy, AlertSink, AlertTrigger, DetectionPhase, DetectionPipeline, FrameSource,
    InferenceAdapter, LabelTable, PipelineConfig, StubBackend, SyntheticConfig, SyntheticSource,
};

/// Labels used when no label file is present, so the daemon runs out of the
/// box against the stub backend.
const BUILTIN_LABELS: [&str; 8] = [
    "person",
    "bicycle",
    "car",
    "motorcycle",
    "bus",
    "truck",
    "traffic light",
    "stop sign",
];

/// Alert sink that logs playback and simulates a fixed-length sound, so
/// overlapping alerts are suppressed the way a real player would.
struct ConsoleAlertSink {
    started: Mutex<Option<Instant>>,
    duration: Duration,
}

impl ConsoleAlertSink {
    fn new(duration: Duration) -> Self {
        Self {
            started: Mutex::new(None),
            duration,
        }
    }
}

impl AlertSink for ConsoleAlertSink {
    fn is_playing(&self) -> bool {
        match self.started.lock() {
            Ok(guard) => guard.map_or(false, |at| at.elapsed() < self.duration),
            Err(_) => false,
        }
    }

    fn start(&mut self) -> Result<()> {
        if let Ok(mut guard) = self.started.lock() {
            *guard = Some(Instant::now());
        }
        log::warn!("ALERT: safety-critical object detected");
        Ok(())
    }
}

fn load_labels(path: &str) -> Result<LabelTable> {
    match LabelTable::load(path) {
        Ok(table) => Ok(table),
        Err(e) => {
            log::warn!("{:#}; falling back to built-in labels", e);
            LabelTable::from_lines(BUILTIN_LABELS)
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = PipelineConfig::load()?;
    let labels = load_labels(&cfg.labels_path)?;

    let backend = Box::new(StubBackend::new(labels.len()));
    let adapter = InferenceAdapter::new(backend, cfg.model.input_size, cfg.model.max_detections);
    let trigger = AlertTrigger::new(
        AlertPolicy::new(cfg.alert.classes.clone(), cfg.alert.min_confidence),
        Box::new(ConsoleAlertSink::new(Duration::from_secs(2))),
    );

    let mut pipeline = DetectionPipeline::new(
        adapter,
        labels,
        cfg.model.score_threshold,
        trigger,
        cfg.camera.target_fps,
    )?;

    let mut source = SyntheticSource::new(SyntheticConfig {
        width: cfg.camera.width,
        height: cfg.camera.height,
        ..SyntheticConfig::default()
    });

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_shutdown = shutdown.clone();
    ctrlc::set_handler(move || {
        handler_shutdown.store(true, Ordering::SeqCst);
    })?;

    log::info!(
        "drivewatchd running: {}x{} camera, {} fps target, threshold {:.2}",
        cfg.camera.width,
        cfg.camera.height,
        cfg.camera.target_fps,
        cfg.model.score_threshold
    );

    // The synthetic camera runs hot (double the target rate) so the throttle
    // has something to reject, as a real camera callback would.
    let camera_interval = Duration::from_secs(1) / (cfg.camera.target_fps * 2);
    let mut last_status = Instant::now();

    while !shutdown.load(Ordering::SeqCst) {
        let frame = source.next_frame()?;
        pipeline.submit_frame(frame);

        if last_status.elapsed() >= Duration::from_secs(2) {
            last_status = Instant::now();
            let stats = pipeline.current_stats();
            let phase = pipeline.current_phase();
            match phase {
                DetectionPhase::Idle => log::info!("phase=idle"),
                DetectionPhase::Processing => log::info!("phase=processing"),
                DetectionPhase::Success(batch) => log::info!(
                    "phase=success batch={} total={} avg_conf={:.2}",
                    batch.len(),
                    stats.total_detections,
                    stats.average_confidence
                ),
                DetectionPhase::Error(message) => log::warn!("phase=error: {}", message),
            }
        }

        std::thread::sleep(camera_interval);
    }

    log::info!("shutting down");
    Ok(())
}
