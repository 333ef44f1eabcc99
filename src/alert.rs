//! Audible safety alerts.
//!
//! A completed batch warrants an alert when any detection matches a
//! safety-critical class above the alert confidence bar. The predicate itself
//! is stateless; overlap suppression lives with the audio collaborator, which
//! is asked whether a sound is already playing before a new one starts.

use std::collections::HashSet;

use anyhow::Result;

use crate::detect::Detection;

/// Safety-critical classes and the confidence bar that triggers an alert.
#[derive(Clone, Debug)]
pub struct AlertPolicy {
    classes: HashSet<String>,
    min_confidence: f32,
}

impl AlertPolicy {
    pub fn new<I, S>(classes: I, min_confidence: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
            min_confidence,
        }
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(["person", "traffic light", "stop sign"], 0.7)
    }
}

/// Pure predicate: does this batch warrant an audible alert?
///
/// True iff any detection carries a policy class with confidence strictly
/// above the bar.
pub fn should_alert(policy: &AlertPolicy, batch: &[Detection]) -> bool {
    batch
        .iter()
        .any(|det| det.confidence > policy.min_confidence && policy.classes.contains(&det.label))
}

/// Audio collaborator seam.
pub trait AlertSink: Send {
    /// Is an alert sound currently playing?
    fn is_playing(&self) -> bool;

    /// Start alert playback.
    fn start(&mut self) -> Result<()>;
}

/// Joins the alert predicate with the audio sink, skipping playback while a
/// sound is already in progress.
pub struct AlertTrigger {
    policy: AlertPolicy,
    sink: Box<dyn AlertSink>,
}

impl AlertTrigger {
    pub fn new(policy: AlertPolicy, sink: Box<dyn AlertSink>) -> Self {
        Self { policy, sink }
    }

    /// Evaluate a completed batch. Returns true when the batch warranted an
    /// alert, whether or not playback actually started.
    pub fn evaluate(&mut self, batch: &[Detection]) -> bool {
        if !should_alert(&self.policy, batch) {
            return false;
        }
        if self.sink.is_playing() {
            log::debug!("alert suppressed: playback already in progress");
            return true;
        }
        if let Err(e) = self.sink.start() {
            log::warn!("alert playback failed: {:#}", e);
        }
        true
    }
}
