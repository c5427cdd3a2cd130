//! Short-time power spectrum analysis
//!
//! Framing convention: frames are left-aligned. Frame `i` has timestamp
//! `i * frame_step` and covers the `N` samples starting at that time, where
//! `N = round(window_duration * sample_rate)`. Samples past the end of the
//! signal are read as zero, so the tail of the signal always lands in at
//! least one frame.

use super::config::AnalysisParameters;
use super::spectrogram::{FrequencyAxis, SpectralFrame, Spectrogram};
use super::traits::SpectralAnalysis;
use crate::error::SpectrumError;
use crate::model::WaveformBuffer;
use realfft::RealFftPlanner;
use std::f64::consts::PI;

/// Absorbs binary rounding when dividing duration by step (e.g. 1.0 / 0.01)
const FRAME_COUNT_EPSILON: f64 = 1e-9;

/// Upper bound on frames per analysis (a day of audio at 1 ms steps)
pub const MAX_FRAMES: usize = 86_400_000;

/// Upper bound on samples per analysis window (2^22, ~95 s at 44.1 kHz)
pub const MAX_WINDOW_SAMPLES: usize = 1 << 22;

/// Upper bound on stored power values (frames * bins), 2 GiB of f64
pub const MAX_SPECTRUM_VALUES: usize = 1 << 28;

/// Symmetric Hamming window of `size` points
pub fn hamming_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    let denom = (size - 1) as f64;
    (0..size)
        .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / denom).cos())
        .collect()
}

/// Number of frames produced for a signal: floor(duration / step) + 1
///
/// Fails when the count exceeds [`MAX_FRAMES`].
pub fn frame_count(duration: f64, frame_step: f64) -> Result<usize, SpectrumError> {
    let steps = (duration / frame_step + FRAME_COUNT_EPSILON).floor();
    if !(steps >= 0.0 && steps < MAX_FRAMES as f64) {
        return Err(SpectrumError::InvalidParameter(format!(
            "frame step {} yields too many frames for {}s (limit {})",
            frame_step, duration, MAX_FRAMES
        )));
    }
    (steps as usize)
        .checked_add(1)
        .filter(|&n| n <= MAX_FRAMES)
        .ok_or_else(|| {
            SpectrumError::InvalidParameter(format!("frame count exceeds limit {}", MAX_FRAMES))
        })
}

/// Samples per analysis window: max(1, round(window_duration * sample_rate))
///
/// Fails when the window exceeds [`MAX_WINDOW_SAMPLES`].
pub fn window_sample_count(window_duration: f64, sample_rate: u32) -> Result<usize, SpectrumError> {
    let samples = (window_duration * sample_rate as f64).round();
    if !(samples <= MAX_WINDOW_SAMPLES as f64) {
        return Err(SpectrumError::InvalidParameter(format!(
            "window of {}s at {}Hz exceeds {} samples",
            window_duration, sample_rate, MAX_WINDOW_SAMPLES
        )));
    }
    Ok((samples as usize).max(1))
}

/// Hamming-windowed FFT power spectrum analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralAnalyzer;

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl SpectralAnalysis for SpectralAnalyzer {
    fn analyze(
        &self,
        waveform: &WaveformBuffer,
        params: &AnalysisParameters,
    ) -> Result<Spectrogram, SpectrumError> {
        params.validate()?;
        if waveform.is_empty() {
            return Err(SpectrumError::InvalidParameter(
                "waveform has no samples".to_string(),
            ));
        }
        if waveform.sample_rate() == 0 {
            return Err(SpectrumError::InvalidParameter(
                "waveform sample rate is zero".to_string(),
            ));
        }

        let sample_rate = waveform.sample_rate() as f64;
        let window_samples = window_sample_count(params.window_duration, waveform.sample_rate())?;
        let axis = FrequencyAxis::new(waveform.sample_rate(), window_samples);
        let n_frames = frame_count(waveform.duration(), params.frame_step)?;
        if n_frames.saturating_mul(axis.num_bins) > MAX_SPECTRUM_VALUES {
            return Err(SpectrumError::InvalidParameter(format!(
                "{} frames of {} bins exceeds {} values",
                n_frames, axis.num_bins, MAX_SPECTRUM_VALUES
            )));
        }

        log::debug!(
            "Spectrum analysis: {} samples at {}Hz, {} frames, window={} samples, {} bins ({:.2}Hz/bin)",
            waveform.len(),
            waveform.sample_rate(),
            n_frames,
            window_samples,
            axis.num_bins,
            axis.bin_hz
        );

        let mut planner = RealFftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(window_samples);
        let window = hamming_window(window_samples);

        // Reusable FFT buffers
        let mut input = fft.make_input_vec();
        let mut output = fft.make_output_vec();

        let samples = waveform.samples();
        let mut frames = Vec::with_capacity(n_frames);

        for i in 0..n_frames {
            let time = i as f64 * params.frame_step;
            let offset = (time * sample_rate).round() as usize;

            for (j, (inp, &w)) in input.iter_mut().zip(&window).enumerate() {
                *inp = samples.get(offset + j).copied().unwrap_or(0.0) * w;
            }

            fft.process(&mut input, &mut output)
                .map_err(|e| SpectrumError::Transform(e.to_string()))?;

            frames.push(SpectralFrame {
                time,
                power: output.iter().map(|c| c.norm_sqr()).collect(),
            });
        }

        Spectrogram::from_frames(axis, params.frame_step, frames)
    }
}
