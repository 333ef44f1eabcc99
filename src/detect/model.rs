//! Model backend seam.
//!
//! The inference engine is a black box behind this trait: it receives a
//! normalized fixed-size tensor and answers with the raw four-array output of
//! an SSD-style detection head. Everything on the far side of the trait
//! (weights, runtime, acceleration) is a vendor concern.

use anyhow::Result;

/// Normalized model input: HWC RGB f32 data in `[-1, 1]`.
#[derive(Clone, Debug)]
pub struct TensorInput {
    pub data: Vec<f32>,
    pub width: u32,
    pub height: u32,
}

impl TensorInput {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Raw model output: four parallel arrays plus the model-reported count of
/// valid entries.
///
/// Only the first `count` slots of `boxes`/`classes`/`scores` carry data; the
/// rest is padding. `count` is a model output, not a constant, and the adapter
/// must read it rather than assume all slots are populated.
#[derive(Clone, Debug, Default)]
pub struct RawOutput {
    /// Boxes in `[y0, x0, y1, x1]` order, coordinates normalized to `0..1`.
    pub boxes: Vec<[f32; 4]>,
    /// Class indices, encoded as floats by the model.
    pub classes: Vec<f32>,
    /// Confidence scores in `[0, 1]`.
    pub scores: Vec<f32>,
    /// Number of valid leading entries.
    pub count: f32,
}

/// Black-box detection model.
///
/// Implementations must not retain the input tensor beyond the `run` call and
/// must surface a distinguishable error instead of returning partial output.
pub trait ModelBackend: Send {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Run one inference pass.
    fn run(&mut self, input: &TensorInput) -> Result<RawOutput>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
