//! Batch statistics.
//!
//! Stats describe the most recent completed batch only: each update recomputes
//! every field from scratch, discarding the previous batch. Nothing here is
//! session-cumulative.

use std::collections::HashMap;

use crate::detect::Detection;

/// Counters derived from the latest detection batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionStats {
    pub total_detections: usize,
    pub detections_by_class: HashMap<String, usize>,
    pub average_confidence: f32,
}

/// Folds completed batches into [`DetectionStats`].
#[derive(Debug, Default)]
pub struct StatsAggregator {
    current: DetectionStats,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stats with ones computed from `batch`.
    pub fn update(&mut self, batch: &[Detection]) -> &DetectionStats {
        let mut by_class: HashMap<String, usize> = HashMap::new();
        for det in batch {
            *by_class.entry(det.label.clone()).or_insert(0) += 1;
        }

        // Guard the empty batch explicitly; 0/0 must read as zero, not NaN.
        let average_confidence = if batch.is_empty() {
            0.0
        } else {
            batch.iter().map(|d| d.confidence).sum::<f32>() / batch.len() as f32
        };

        self.current = DetectionStats {
            total_detections: batch.len(),
            detections_by_class: by_class,
            average_confidence,
        };
        &self.current
    }

    pub fn current(&self) -> &DetectionStats {
        &self.current
    }

    /// Zero all fields.
    pub fn reset(&mut self) {
        self.current = DetectionStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BoundingBox;

    fn det(label: &str, confidence: f32) -> Detection {
        Detection {
            bounding_box: BoundingBox {
                left: 0.0,
                top: 0.0,
                right: 1.0,
                bottom: 1.0,
            },
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn empty_batch_yields_zeroes() {
        let mut agg = StatsAggregator::new();
        let stats = agg.update(&[]);
        assert_eq!(stats.total_detections, 0);
        assert!(stats.detections_by_class.is_empty());
        assert_eq!(stats.average_confidence, 0.0);
    }

    #[test]
    fn histogram_and_mean_confidence() {
        let mut agg = StatsAggregator::new();
        let stats = agg.update(&[det("person", 0.9), det("person", 0.75), det("dog", 0.6)]);

        assert_eq!(stats.total_detections, 3);
        assert_eq!(stats.detections_by_class["person"], 2);
        assert_eq!(stats.detections_by_class["dog"], 1);
        assert!((stats.average_confidence - 0.75).abs() < 1e-6);
    }

    #[test]
    fn stats_describe_the_latest_batch_only() {
        let mut agg = StatsAggregator::new();
        agg.update(&[det("person", 0.9), det("car", 0.8)]);
        let stats = agg.update(&[det("dog", 0.6)]);

        assert_eq!(stats.total_detections, 1);
        assert!(!stats.detections_by_class.contains_key("person"));
        assert!((stats.average_confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn reset_zeroes_everything() {
        let mut agg = StatsAggregator::new();
        agg.update(&[det("person", 0.9)]);
        agg.reset();
        assert_eq!(*agg.current(), DetectionStats::default());
    }
}
