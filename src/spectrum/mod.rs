//! Spectral analysis layer
//!
//! Two phases, usable on their own: [`SpectralAnalysis::analyze`] turns a
//! waveform into a [`Spectrogram`], then [`Spectrogram::slice`] /
//! [`Spectrogram::slice_many`] cut it along region boundaries.

mod analyzer;
mod config;
mod spectrogram;
mod traits;

pub use analyzer::{
    frame_count, hamming_window, window_sample_count, SpectralAnalyzer, MAX_FRAMES,
    MAX_SPECTRUM_VALUES, MAX_WINDOW_SAMPLES,
};
pub use config::{AnalysisParameters, DEFAULT_FRAME_STEP, DEFAULT_WINDOW_DURATION};
pub use spectrogram::{FrequencyAxis, SpectralFrame, SpectralSlice, Spectrogram};
pub use traits::{SpectralAnalysis, SpectralFrames};
