//! Camera frame container.
//!
//! Frames arrive from the camera collaborator as decoded RGB8 buffers together
//! with an EXIF-style rotation hint and a capture timestamp. The rotation hint
//! is carried here but applied later, during inference preprocessing.

use anyhow::{anyhow, Result};

/// EXIF-style rotation hint, restricted to quarter turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parse a rotation hint in degrees. Only the four quarter turns are valid.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(anyhow!("unsupported rotation hint: {} degrees", other)),
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Decoded RGB8 camera frame.
///
/// The pixel buffer is owned and tightly packed (`width * height * 3` bytes).
/// `timestamp_nanos` is the capture time used by the frame throttle; it only
/// needs to be monotonic per source, not wall-clock accurate.
#[derive(Clone, Debug)]
pub struct Frame {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
    pub timestamp_nanos: i64,
}

impl Frame {
    /// Wrap an RGB8 buffer. Rejects buffers whose length does not match the
    /// declared dimensions.
    pub fn from_rgb8(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        rotation: Rotation,
        timestamp_nanos: i64,
    ) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))?;
        if width == 0 || height == 0 {
            return Err(anyhow!("frame dimensions must be non-zero"));
        }
        if pixels.len() != expected {
            return Err(anyhow!(
                "expected {} RGB bytes for {}x{}, received {}",
                expected,
                width,
                height,
                pixels.len()
            ));
        }
        Ok(Self {
            pixels,
            width,
            height,
            rotation,
            timestamp_nanos,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub(crate) fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_from_degrees_accepts_quarter_turns() {
        assert_eq!(Rotation::from_degrees(0).unwrap(), Rotation::Deg0);
        assert_eq!(Rotation::from_degrees(90).unwrap(), Rotation::Deg90);
        assert_eq!(Rotation::from_degrees(180).unwrap(), Rotation::Deg180);
        assert_eq!(Rotation::from_degrees(270).unwrap(), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(-90).unwrap(), Rotation::Deg270);
        assert_eq!(Rotation::from_degrees(450).unwrap(), Rotation::Deg90);
        assert!(Rotation::from_degrees(45).is_err());
    }

    #[test]
    fn frame_rejects_mismatched_buffer() {
        let err = Frame::from_rgb8(vec![0u8; 10], 4, 4, Rotation::Deg0, 0);
        assert!(err.is_err());

        let err = Frame::from_rgb8(vec![], 0, 4, Rotation::Deg0, 0);
        assert!(err.is_err());

        let frame = Frame::from_rgb8(vec![0u8; 4 * 4 * 3], 4, 4, Rotation::Deg0, 7).unwrap();
        assert_eq!(frame.width, 4);
        assert_eq!(frame.timestamp_nanos, 7);
    }
}
