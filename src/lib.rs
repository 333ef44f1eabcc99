//! DriveWatch core.
//!
//! The frame-to-detection post-processing and alerting pipeline of an
//! on-device driving-safety object detector: raw model output tensors and
//! camera frames in, filtered and rate-limited detection batches with
//! statistics and audible alerts out.
//!
//! Camera capture, UI rendering, and the inference engine are external
//! collaborators behind narrow traits ([`camera::FrameSource`],
//! [`detect::ModelBackend`], [`alert::AlertSink`]), injected into the
//! pipeline at construction.
//!
//! # Module Structure
//!
//! - `throttle`: time-gate admitting frames at a sustainable rate
//! - `detect`: inference adapter, candidate filter, model backend seam
//! - `pipeline`: per-cycle phase machine on a single-worker FIFO queue
//! - `stats`: last-batch statistics aggregation
//! - `alert`: safety-class predicate and audio-sink dedup
//! - `camera`, `frame`, `labels`, `config`: collaborator seams and wiring

pub mod alert;
pub mod camera;
pub mod config;
pub mod detect;
pub mod frame;
pub mod labels;
pub mod pipeline;
pub mod stats;
pub mod throttle;

pub use alert::{should_alert, AlertPolicy, AlertSink, AlertTrigger};
pub use camera::{FrameSource, SyntheticConfig, SyntheticSource};
pub use config::PipelineConfig;
pub use detect::{
    filter_candidates, BoundingBox, DetectError, Detection, InferenceAdapter, ModelBackend,
    RawCandidate, RawOutput, StubBackend, TensorInput,
};
#[cfg(feature = "backend-tract")]
pub use detect::TractBackend;
pub use frame::{Frame, Rotation};
pub use labels::LabelTable;
pub use pipeline::{DetectionPhase, DetectionPipeline, PipelineEvent};
pub use stats::{DetectionStats, StatsAggregator};
pub use throttle::FrameThrottle;
