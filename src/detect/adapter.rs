//! Inference adapter.
//!
//! Wraps the fixed-shape model call: applies the frame's rotation hint,
//! resizes to the model input square with bilinear interpolation, normalizes
//! pixels to `[-1, 1]`, invokes the backend, and interprets the four-array
//! output into raw candidates capped at the fixed slot count.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::detect::error::DetectError;
use crate::detect::model::{ModelBackend, RawOutput, TensorInput};
use crate::detect::result::RawCandidate;
use crate::frame::{Frame, Rotation};

/// Pixel normalization: maps `[0, 255]` to `[-1, 1]`.
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

/// Adapter from camera frames to raw model candidates.
pub struct InferenceAdapter {
    backend: Box<dyn ModelBackend>,
    input_size: u32,
    max_detections: usize,
}

impl InferenceAdapter {
    pub fn new(backend: Box<dyn ModelBackend>, input_size: u32, max_detections: usize) -> Self {
        Self {
            backend,
            input_size,
            max_detections,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run one detection cycle on a frame.
    ///
    /// Preprocessing problems surface as [`DetectError::Preprocessing`]; a
    /// failing model call or malformed output shapes surface as
    /// [`DetectError::Inference`]. Candidates are returned in model output
    /// order, at most `max_detections` of them.
    pub fn detect(&mut self, frame: Frame) -> Result<Vec<RawCandidate>, DetectError> {
        let input = self.preprocess(frame)?;
        let output = self
            .backend
            .run(&input)
            .map_err(|e| DetectError::Inference(format!("{:#}", e)))?;
        self.extract_candidates(output)
    }

    fn preprocess(&self, frame: Frame) -> Result<TensorInput, DetectError> {
        let (width, height, rotation) = (frame.width, frame.height, frame.rotation);
        let rgb = RgbImage::from_raw(width, height, frame.into_pixels()).ok_or_else(|| {
            DetectError::Preprocessing(format!(
                "pixel buffer does not match {}x{} RGB frame",
                width, height
            ))
        })?;

        // Apply the EXIF-style rotation hint before resizing.
        let upright = match rotation {
            Rotation::Deg0 => rgb,
            Rotation::Deg90 => imageops::rotate90(&rgb),
            Rotation::Deg180 => imageops::rotate180(&rgb),
            Rotation::Deg270 => imageops::rotate270(&rgb),
        };

        let resized = imageops::resize(
            &upright,
            self.input_size,
            self.input_size,
            FilterType::Triangle,
        );

        let data: Vec<f32> = resized
            .into_raw()
            .into_iter()
            .map(|p| (p as f32 - NORM_MEAN) / NORM_STD)
            .collect();

        Ok(TensorInput {
            data,
            width: self.input_size,
            height: self.input_size,
        })
    }

    /// Interpret the four parallel output arrays.
    ///
    /// The first `count` slots are valid. A non-finite or negative count, or
    /// arrays shorter than the claimed count, is malformed output. A count
    /// above the fixed slot budget is clamped to it.
    fn extract_candidates(&self, output: RawOutput) -> Result<Vec<RawCandidate>, DetectError> {
        if output.boxes.len() != output.classes.len()
            || output.boxes.len() != output.scores.len()
        {
            return Err(DetectError::Inference(format!(
                "mismatched output arrays: {} boxes, {} classes, {} scores",
                output.boxes.len(),
                output.classes.len(),
                output.scores.len()
            )));
        }
        if !output.count.is_finite() || output.count < 0.0 {
            return Err(DetectError::Inference(format!(
                "model reported invalid detection count {}",
                output.count
            )));
        }

        let reported = output.count as usize;
        let count = reported.min(self.max_detections);
        if count > output.boxes.len() {
            return Err(DetectError::Inference(format!(
                "model reported {} detections but returned {} slots",
                reported,
                output.boxes.len()
            )));
        }

        let candidates = (0..count)
            .map(|i| RawCandidate {
                r#box: output.boxes[i],
                class_index: class_index_from(output.classes[i]),
                score: output.scores[i],
            })
            .collect();
        Ok(candidates)
    }
}

/// Decode a float-encoded class index. Negative or non-finite values map to
/// `usize::MAX`, which the filter drops as out-of-range.
fn class_index_from(value: f32) -> usize {
    if value.is_finite() && value >= 0.0 {
        value as usize
    } else {
        usize::MAX
    }
}
