//! Stub model backend for testing and synthetic runs.
//!
//! Derives deterministic pseudo-detections from a hash of the input tensor.
//! An unchanged scene produces no candidates; a changed scene produces a small
//! hash-dependent set, so a given frame sequence always yields the same
//! output.

use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::detect::model::{ModelBackend, RawOutput, TensorInput};

/// Fixed number of output slots, matching the real model head.
const OUTPUT_SLOTS: usize = 10;

pub struct StubBackend {
    num_classes: usize,
    last_hash: Option<[u8; 32]>,
}

impl StubBackend {
    /// `num_classes` bounds the class indices the stub emits, so they resolve
    /// against the label table in use.
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes: num_classes.max(1),
            last_hash: None,
        }
    }
}

impl ModelBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn run(&mut self, input: &TensorInput) -> Result<RawOutput> {
        let mut hasher = Sha256::new();
        for value in &input.data {
            hasher.update(value.to_le_bytes());
        }
        let hash: [u8; 32] = hasher.finalize().into();

        let scene_changed = match self.last_hash {
            Some(prev) => prev != hash,
            None => true,
        };
        self.last_hash = Some(hash);

        let mut output = RawOutput {
            boxes: vec![[0.0; 4]; OUTPUT_SLOTS],
            classes: vec![0.0; OUTPUT_SLOTS],
            scores: vec![0.0; OUTPUT_SLOTS],
            count: 0.0,
        };

        if !scene_changed {
            return Ok(output);
        }

        let count = 1 + (hash[0] as usize % 3);
        for i in 0..count {
            let b = &hash[4 * i..4 * i + 4];
            let y0 = b[0] as f32 / 512.0;
            let x0 = b[1] as f32 / 512.0;
            output.boxes[i] = [y0, x0, y0 + 0.25, x0 + 0.25];
            output.classes[i] = (hash[16 + i] as usize % self.num_classes) as f32;
            output.scores[i] = 0.5 + (hash[24 + i] as f32 / 255.0) * 0.5;
        }
        output.count = count as f32;

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(seed: f32) -> TensorInput {
        TensorInput {
            data: vec![seed; 12],
            width: 2,
            height: 2,
        }
    }

    #[test]
    fn unchanged_scene_yields_no_candidates() {
        let mut backend = StubBackend::new(3);

        let first = backend.run(&input(0.3)).unwrap();
        assert!(first.count >= 1.0);

        let second = backend.run(&input(0.3)).unwrap();
        assert_eq!(second.count, 0.0);

        let third = backend.run(&input(0.7)).unwrap();
        assert!(third.count >= 1.0);
    }

    #[test]
    fn candidates_fit_the_slot_contract() {
        let mut backend = StubBackend::new(5);
        let output = backend.run(&input(0.9)).unwrap();

        assert_eq!(output.boxes.len(), OUTPUT_SLOTS);
        assert_eq!(output.classes.len(), OUTPUT_SLOTS);
        assert_eq!(output.scores.len(), OUTPUT_SLOTS);
        let count = output.count as usize;
        assert!(count <= OUTPUT_SLOTS);
        for i in 0..count {
            assert!((0.0..5.0).contains(&output.classes[i]));
            assert!(output.scores[i] >= 0.5 && output.scores[i] <= 1.0);
            let [y0, x0, y1, x1] = output.boxes[i];
            assert!(y0 < y1 && x0 < x1);
            assert!(y1 <= 1.0 && x1 <= 1.0);
        }
    }

    #[test]
    fn output_is_deterministic_per_scene() {
        let mut a = StubBackend::new(3);
        let mut b = StubBackend::new(3);

        let out_a = a.run(&input(0.42)).unwrap();
        let out_b = b.run(&input(0.42)).unwrap();
        assert_eq!(out_a.count, out_b.count);
        assert_eq!(out_a.scores, out_b.scores);
        assert_eq!(out_a.classes, out_b.classes);
    }
}
