//! Frame sources.
//!
//! The camera is an external collaborator; this module defines the seam it
//! plugs into plus a synthetic source used by the binaries and integration
//! tests. The synthetic source renders a bright rectangle wandering over a
//! noisy background so the stub backend sees a changing scene.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rand::Rng;

use crate::frame::{Frame, Rotation};

/// Camera collaborator seam. Sources deliver decoded RGB frames at their own
/// rate; admission control happens downstream in the pipeline.
pub trait FrameSource {
    /// Capture the next frame.
    fn next_frame(&mut self) -> Result<Frame>;
}

/// Configuration for the synthetic source.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    pub width: u32,
    pub height: u32,
    /// Rotation hint stamped on every frame.
    pub rotation: Rotation,
    /// How many frames the rectangle stays put before moving. Movement is what
    /// makes the stub backend report a changed scene.
    pub hold_frames: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            rotation: Rotation::Deg0,
            hold_frames: 3,
        }
    }
}

/// Synthetic camera producing deterministic scene changes with random noise.
pub struct SyntheticSource {
    config: SyntheticConfig,
    frame_count: u64,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        log::info!(
            "synthetic camera: {}x{}, rotation {} deg",
            config.width,
            config.height,
            config.rotation.degrees()
        );
        Self {
            config,
            frame_count: 0,
        }
    }

    fn render(&self) -> Vec<u8> {
        let width = self.config.width as usize;
        let height = self.config.height as usize;
        let mut rng = rand::thread_rng();

        let mut pixels = vec![0u8; width * height * 3];
        for chunk in pixels.chunks_exact_mut(3) {
            let v: u8 = rng.gen_range(16..48);
            chunk[0] = v;
            chunk[1] = v;
            chunk[2] = v;
        }

        // Rectangle position advances every `hold_frames` frames.
        let step = self.frame_count / self.config.hold_frames.max(1);
        let rect_w = width / 8;
        let rect_h = height / 8;
        let x0 = (step as usize * rect_w / 2) % (width - rect_w);
        let y0 = (step as usize * rect_h / 3) % (height - rect_h);

        for y in y0..y0 + rect_h {
            for x in x0..x0 + rect_w {
                let idx = (y * width + x) * 3;
                pixels[idx] = 220;
                pixels[idx + 1] = 200;
                pixels[idx + 2] = 60;
            }
        }
        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Frame> {
        let pixels = self.render();
        self.frame_count += 1;

        let timestamp_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock before unix epoch")?
            .as_nanos() as i64;

        Frame::from_rgb8(
            pixels,
            self.config.width,
            self.config.height,
            self.config.rotation,
            timestamp_nanos,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_frames_with_configured_shape() {
        let mut source = SyntheticSource::new(SyntheticConfig {
            width: 64,
            height: 48,
            ..SyntheticConfig::default()
        });

        let frame = source.next_frame().unwrap();
        assert_eq!(frame.width, 64);
        assert_eq!(frame.height, 48);
        assert_eq!(frame.pixels().len(), 64 * 48 * 3);
    }

    #[test]
    fn timestamps_do_not_go_backwards() {
        let mut source = SyntheticSource::new(SyntheticConfig::default());
        let a = source.next_frame().unwrap().timestamp_nanos;
        let b = source.next_frame().unwrap().timestamp_nanos;
        assert!(b >= a);
    }
}
