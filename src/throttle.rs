//! Frame admission throttle.
//!
//! Cameras deliver frames far faster than the detector can process them. The
//! throttle is a pure time gate run synchronously on the producer side: it
//! admits at most `target_fps` frames per second and rejects the rest with no
//! side effect. Rejected frames are dropped by the caller, never queued.

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Time-gate limiting accepted frames to a target rate.
#[derive(Debug)]
pub struct FrameThrottle {
    interval_nanos: i64,
    last_accepted: Option<i64>,
}

impl FrameThrottle {
    /// Build a throttle for `target_fps` frames per second.
    ///
    /// A zero fps target is treated as 1 fps rather than dividing by zero;
    /// configuration validation rejects it earlier.
    pub fn new(target_fps: u32) -> Self {
        let fps = target_fps.max(1) as i64;
        Self {
            interval_nanos: NANOS_PER_SEC / fps,
            last_accepted: None,
        }
    }

    /// Admit or reject a frame captured at `now_nanos`.
    ///
    /// Returns true and records the timestamp iff the configured interval has
    /// elapsed since the last accepted frame. The first frame is always
    /// admitted.
    pub fn accept(&mut self, now_nanos: i64) -> bool {
        match self.last_accepted {
            Some(last) if now_nanos - last < self.interval_nanos => false,
            _ => {
                self.last_accepted = Some(now_nanos);
                true
            }
        }
    }

    pub fn interval_nanos(&self) -> i64 {
        self.interval_nanos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_accepted() {
        let mut throttle = FrameThrottle::new(15);
        assert!(throttle.accept(123));
    }

    #[test]
    fn rejects_frames_inside_the_interval() {
        let mut throttle = FrameThrottle::new(15);
        let interval = throttle.interval_nanos();

        assert!(throttle.accept(0));
        assert!(!throttle.accept(interval - 1));
        assert!(throttle.accept(interval));
    }

    #[test]
    fn rejection_does_not_move_the_gate() {
        let mut throttle = FrameThrottle::new(10);
        let interval = throttle.interval_nanos();

        assert!(throttle.accept(0));
        // A burst of rejected frames must not push the window forward.
        assert!(!throttle.accept(interval / 2));
        assert!(!throttle.accept(interval - 1));
        assert!(throttle.accept(interval));
    }

    #[test]
    fn fifteen_fps_interval() {
        let throttle = FrameThrottle::new(15);
        assert_eq!(throttle.interval_nanos(), 1_000_000_000 / 15);
    }
}
