//! Detection value types.

/// Unfiltered candidate straight out of the model.
///
/// `r#box` uses the model's `[y0, x0, y1, x1]` axis order with coordinates
/// normalized to `0..1`. Candidates are ephemeral; the detection filter
/// consumes them immediately.
#[derive(Clone, Copy, Debug)]
pub struct RawCandidate {
    pub r#box: [f32; 4],
    pub class_index: usize,
    pub score: f32,
}

/// Axis-aligned box in left/top/right/bottom order, as downstream rendering
/// expects it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// One filtered, labeled detection. Immutable once created; owned by the batch
/// that produced it and superseded wholesale by the next batch.
#[derive(Clone, Debug)]
pub struct Detection {
    pub bounding_box: BoundingBox,
    pub label: String,
    pub confidence: f32,
}
