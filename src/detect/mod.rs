mod adapter;
mod backends;
mod error;
mod filter;
mod model;
mod result;

pub use adapter::InferenceAdapter;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use error::DetectError;
pub use filter::filter_candidates;
pub use model::{ModelBackend, RawOutput, TensorInput};
pub use result::{BoundingBox, Detection, RawCandidate};
