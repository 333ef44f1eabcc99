//! Detection filter.
//!
//! Turns raw candidates into labeled detections: sub-threshold scores and
//! out-of-range class indices are dropped silently, and the model's
//! `[y0, x0, y1, x1]` axis order is swapped into left/top/right/bottom, which
//! downstream rendering assumes. The filter is stable: output order matches
//! model output order, with no re-sorting by confidence.

use crate::detect::result::{BoundingBox, Detection, RawCandidate};
use crate::labels::LabelTable;

/// Filter and label raw candidates.
///
/// A candidate survives iff `score > threshold` (strict) and its class index
/// resolves in the label table.
pub fn filter_candidates(
    raw: &[RawCandidate],
    labels: &LabelTable,
    threshold: f32,
) -> Vec<Detection> {
    raw.iter()
        .filter(|candidate| candidate.score > threshold)
        .filter_map(|candidate| {
            let label = labels.get(candidate.class_index)?;
            let [y0, x0, y1, x1] = candidate.r#box;
            Some(Detection {
                bounding_box: BoundingBox {
                    left: x0,
                    top: y0,
                    right: x1,
                    bottom: y1,
                },
                label: label.to_string(),
                confidence: candidate.score,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelTable {
        LabelTable::from_lines(["person", "car", "stop sign"]).unwrap()
    }

    fn candidate(class_index: usize, score: f32) -> RawCandidate {
        RawCandidate {
            r#box: [0.1, 0.2, 0.8, 0.9],
            class_index,
            score,
        }
    }

    #[test]
    fn axis_order_is_swapped() {
        let out = filter_candidates(&[candidate(0, 0.9)], &labels(), 0.5);
        assert_eq!(out.len(), 1);
        let bb = out[0].bounding_box;
        assert_eq!(bb.left, 0.2);
        assert_eq!(bb.top, 0.1);
        assert_eq!(bb.right, 0.9);
        assert_eq!(bb.bottom, 0.8);
    }

    #[test]
    fn threshold_is_strict() {
        let out = filter_candidates(
            &[candidate(0, 0.5), candidate(1, 0.500001)],
            &labels(),
            0.5,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "car");
    }

    #[test]
    fn out_of_range_class_is_dropped_silently() {
        let out = filter_candidates(
            &[candidate(7, 0.9), candidate(usize::MAX, 0.9), candidate(2, 0.8)],
            &labels(),
            0.5,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "stop sign");
    }

    #[test]
    fn output_order_matches_input_order() {
        let out = filter_candidates(
            &[candidate(2, 0.6), candidate(0, 0.95), candidate(1, 0.7)],
            &labels(),
            0.5,
        );
        let seen: Vec<&str> = out.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(seen, ["stop sign", "person", "car"]);
    }

    #[test]
    fn every_survivor_is_above_threshold_and_labeled() {
        let raw: Vec<RawCandidate> = (0..10)
            .map(|i| candidate(i % 5, i as f32 / 10.0))
            .collect();
        let table = labels();
        let out = filter_candidates(&raw, &table, 0.5);
        assert!(!out.is_empty());
        for det in &out {
            assert!(det.confidence > 0.5);
            assert!((0..table.len()).any(|i| table.get(i) == Some(det.label.as_str())));
        }
    }
}
