//! demo - bounded synthetic run of the DriveWatch pipeline
//!
//! Drives the pipeline with synthetic frames for a fixed duration and prints
//! a summary of phases, batches, and alerts.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use clap::Parser;

use drivewatch::{
    AlertPolicy, AlertSink, AlertTrigger, DetectionPhase, DetectionPipeline, FrameSource,
    InferenceAdapter, LabelTable, PipelineEvent, StubBackend, SyntheticConfig, SyntheticSource,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Duration of the synthetic run in seconds.
    #[arg(long, default_value_t = 5)]
    seconds: u64,
    /// Camera delivery rate (frames per second, before throttling).
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Throttle target (accepted frames per second).
    #[arg(long, default_value_t = 15)]
    target_fps: u32,
    /// Frame width.
    #[arg(long, default_value_t = 320)]
    width: u32,
    /// Frame height.
    #[arg(long, default_value_t = 240)]
    height: u32,
}

struct CountingSink {
    playing: AtomicBool,
    starts: Arc<AtomicUsize>,
}

impl AlertSink for CountingSink {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn start(&mut self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if args.fps == 0 || args.target_fps == 0 {
        return Err(anyhow!("fps and target-fps must be >= 1"));
    }

    let labels = LabelTable::from_lines([
        "person",
        "bicycle",
        "car",
        "traffic light",
        "stop sign",
    ])?;

    let alert_starts = Arc::new(AtomicUsize::new(0));
    let trigger = AlertTrigger::new(
        AlertPolicy::default(),
        Box::new(CountingSink {
            playing: AtomicBool::new(false),
            starts: alert_starts.clone(),
        }),
    );

    let adapter = InferenceAdapter::new(Box::new(StubBackend::new(labels.len())), 300, 10);
    let mut pipeline = DetectionPipeline::new(adapter, labels, 0.5, trigger, args.target_fps)?;
    let events = pipeline.subscribe();

    let mut source = SyntheticSource::new(SyntheticConfig {
        width: args.width,
        height: args.height,
        ..SyntheticConfig::default()
    });

    let deadline = Instant::now() + Duration::from_secs(args.seconds);
    let camera_interval = Duration::from_secs(1) / args.fps;
    let mut submitted = 0u64;
    let mut admitted = 0u64;

    while Instant::now() < deadline {
        let frame = source.next_frame()?;
        submitted += 1;
        if pipeline.submit_frame(frame) {
            admitted += 1;
        }
        std::thread::sleep(camera_interval);
    }

    // Let the worker drain, then snapshot final state before shutdown.
    std::thread::sleep(Duration::from_millis(200));
    let stats = pipeline.current_stats();
    let final_phase = pipeline.current_phase();
    drop(pipeline);

    let mut successes = 0u64;
    let mut errors = 0u64;
    let mut stats_updates = 0u64;
    for event in events.try_iter() {
        match event {
            PipelineEvent::Phase(DetectionPhase::Success(_)) => successes += 1,
            PipelineEvent::Phase(DetectionPhase::Error(_)) => errors += 1,
            PipelineEvent::Phase(DetectionPhase::Idle)
            | PipelineEvent::Phase(DetectionPhase::Processing) => {}
            PipelineEvent::Stats(_) => stats_updates += 1,
        }
    }

    println!("submitted frames:   {}", submitted);
    println!("admitted frames:    {}", admitted);
    println!("completed batches:  {}", successes);
    println!("failed cycles:      {}", errors);
    println!("stats updates:      {}", stats_updates);
    println!("alerts started:     {}", alert_starts.load(Ordering::SeqCst));
    println!("final phase:        {}", final_phase.name());
    println!(
        "last batch: {} detections, avg confidence {:.2}",
        stats.total_detections, stats.average_confidence
    );
    for (label, count) in &stats.detections_by_class {
        println!("  {:<16} {}", label, count);
    }

    Ok(())
}
