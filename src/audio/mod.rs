//! Audio loading
//!
//! Turns audio files into [`WaveformBuffer`](crate::model::WaveformBuffer)s.
//! The spectral core never reads files itself.

mod decode;

pub use decode::load_waveform;
