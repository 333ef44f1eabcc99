//! Detection error taxonomy.
//!
//! Failures are scoped to a single detection cycle: the pipeline absorbs them
//! into an `Error` phase and stays usable for the next frame. The two variants
//! keep preprocessing problems distinguishable from model-side failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    /// Resize/normalize stage failed, e.g. invalid frame dimensions.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// The model call failed or returned malformed output shapes.
    #[error("inference failed: {0}")]
    Inference(String),
}
