//! Region Spectrum - spectrogram analysis aligned to annotated regions
//!
//! This library computes a Hamming-windowed short-time power spectrum of a
//! waveform and attaches the slice covering each region to that region, for
//! use by prosodic feature classifiers.

pub mod audio;
pub mod error;
pub mod extract;
pub mod model;
pub mod spectrum;

pub use error::{FeatureExtractionError, SpectrumError};
pub use extract::{FeatureExtractor, SpectrumFeatureExtractor};
pub use spectrum::AnalysisParameters;
