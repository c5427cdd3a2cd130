//! Region feature extraction
//!
//! Extractors implement [`FeatureExtractor`] and write their results onto
//! regions as typed attributes.

mod spectrum;
mod traits;

pub use spectrum::SpectrumFeatureExtractor;
pub use traits::FeatureExtractor;
