#![cfg(feature = "backend-tract")]

//! Tract-based ONNX model backend.
//!
//! Loads a local SSD-style model with the standard four-output detection head
//! (boxes, classes, scores, count) and runs it on the normalized NHWC input
//! the adapter produces. No network I/O; disk access is model loading only.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tract_onnx::prelude::*;

use crate::detect::model::{ModelBackend, RawOutput, TensorInput};

pub struct TractBackend {
    model: TypedSimplePlan<TypedModel>,
    input_size: u32,
    max_detections: usize,
}

impl TractBackend {
    /// Load an ONNX model from disk and prepare it for inference.
    pub fn new<P: AsRef<Path>>(model_path: P, input_size: u32, max_detections: usize) -> Result<Self> {
        let model_path = model_path.as_ref();
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, input_size as usize, input_size as usize, 3),
                ),
            )
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        Ok(Self {
            model,
            input_size,
            max_detections,
        })
    }

    fn build_input(&self, input: &TensorInput) -> Result<Tensor> {
        if input.width != self.input_size || input.height != self.input_size {
            return Err(anyhow!(
                "input {}x{} does not match model input {}x{}",
                input.width,
                input.height,
                self.input_size,
                self.input_size
            ));
        }
        let side = self.input_size as usize;
        let expected = side * side * 3;
        if input.data.len() != expected {
            return Err(anyhow!(
                "expected {} input values, received {}",
                expected,
                input.data.len()
            ));
        }

        let tensor = tract_ndarray::Array4::from_shape_vec(
            (1, side, side, 3),
            input.data.clone(),
        )
        .context("failed to shape input tensor")?;
        Ok(tensor.into_tensor())
    }

    fn tensor_values(output: &TValue) -> Result<Vec<f32>> {
        let view = output
            .to_array_view::<f32>()
            .context("model output tensor was not f32")?;
        Ok(view.iter().cloned().collect())
    }
}

impl ModelBackend for TractBackend {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn run(&mut self, input: &TensorInput) -> Result<RawOutput> {
        let tensor = self.build_input(input)?;
        let outputs = self
            .model
            .run(tvec!(tensor.into()))
            .context("ONNX inference failed")?;
        if outputs.len() < 4 {
            return Err(anyhow!(
                "model produced {} outputs, expected boxes/classes/scores/count",
                outputs.len()
            ));
        }

        let flat_boxes = Self::tensor_values(&outputs[0])?;
        let classes = Self::tensor_values(&outputs[1])?;
        let scores = Self::tensor_values(&outputs[2])?;
        let count = Self::tensor_values(&outputs[3])?
            .first()
            .copied()
            .ok_or_else(|| anyhow!("model count output was empty"))?;

        if flat_boxes.len() != self.max_detections * 4
            || classes.len() != self.max_detections
            || scores.len() != self.max_detections
        {
            return Err(anyhow!(
                "unexpected output shapes: {} box values, {} classes, {} scores for {} slots",
                flat_boxes.len(),
                classes.len(),
                scores.len(),
                self.max_detections
            ));
        }

        let boxes = flat_boxes
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();

        Ok(RawOutput {
            boxes,
            classes,
            scores,
            count,
        })
    }
}
