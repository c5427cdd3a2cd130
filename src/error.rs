//! Error types for spectral analysis and feature extraction

use thiserror::Error;

/// Failures raised by the analyzer and by spectrogram slicing
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectrumError {
    /// Non-positive step/window, zero sample rate or empty waveform
    #[error("invalid analysis parameter: {0}")]
    InvalidParameter(String),

    /// Slice requested with end before start
    #[error("invalid range: end {end} precedes start {start}")]
    InvalidRange { start: f64, end: f64 },

    /// FFT backend rejected the frame buffers
    #[error("spectral transform failed: {0}")]
    Transform(String),
}

/// Error surfaced to callers of a feature extractor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureExtractionError {
    /// Shared analysis step failed; no region was touched
    #[error("spectral analysis failed for feature '{feature}': {source}")]
    Analysis {
        feature: String,
        #[source]
        source: SpectrumError,
    },

    /// Slicing failed for one region; earlier regions keep their attribute
    #[error("region {index} of feature '{feature}' could not be aligned: {source}")]
    Region {
        feature: String,
        index: usize,
        #[source]
        source: SpectrumError,
    },
}

impl FeatureExtractionError {
    /// The underlying analysis or slicing error
    pub fn cause(&self) -> &SpectrumError {
        match self {
            FeatureExtractionError::Analysis { source, .. } => source,
            FeatureExtractionError::Region { source, .. } => source,
        }
    }
}
