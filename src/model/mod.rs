//! Data model shared by the analyzer and extractors
//!
//! Waveforms come in from a decoder, regions come in from annotation
//! processing. Neither is created by the spectral core itself.

mod region;
mod waveform;

pub use region::{AttributeValue, Region};
pub use waveform::WaveformBuffer;
