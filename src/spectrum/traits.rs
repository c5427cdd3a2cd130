//! Analysis trait definitions and shared frame accessors

use super::config::AnalysisParameters;
use super::spectrogram::{FrequencyAxis, SpectralFrame, Spectrogram};
use crate::error::SpectrumError;
use crate::model::WaveformBuffer;

/// Floor added before taking logs of power values
const LOG_FLOOR: f64 = 1e-12;

/// Spectral analyzer trait - allows swapping or instrumenting the analysis backend
pub trait SpectralAnalysis {
    /// Compute the framed power spectrum of a waveform
    fn analyze(
        &self,
        waveform: &WaveformBuffer,
        params: &AnalysisParameters,
    ) -> Result<Spectrogram, SpectrumError>;
}

impl<A: SpectralAnalysis + ?Sized> SpectralAnalysis for &A {
    fn analyze(
        &self,
        waveform: &WaveformBuffer,
        params: &AnalysisParameters,
    ) -> Result<Spectrogram, SpectrumError> {
        (**self).analyze(waveform, params)
    }
}

/// Read access to a sequence of spectral frames
///
/// Implemented by full spectrograms and by region slices, so summary
/// measures work the same on either.
pub trait SpectralFrames {
    fn axis(&self) -> &FrequencyAxis;

    fn frames(&self) -> &[SpectralFrame];

    /// Seconds between frame timestamps
    fn frame_step(&self) -> f64;

    fn num_frames(&self) -> usize {
        self.frames().len()
    }

    fn num_bins(&self) -> usize {
        self.axis().num_bins
    }

    fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }

    /// Frame timestamps in seconds
    fn timestamps(&self) -> Vec<f64> {
        self.frames().iter().map(|f| f.time).collect()
    }

    /// Per-frame power summed over bins centred in [low_hz, high_hz)
    fn band_power(&self, low_hz: f64, high_hz: f64) -> Vec<f64> {
        let axis = self.axis();
        let bins: Vec<usize> = (0..axis.num_bins)
            .filter(|&k| {
                let hz = axis.bin_frequency(k);
                hz >= low_hz && hz < high_hz
            })
            .collect();

        self.frames()
            .iter()
            .map(|f| bins.iter().map(|&k| f.power[k]).sum())
            .collect()
    }

    /// Per-frame total power
    fn frame_energy(&self) -> Vec<f64> {
        self.frames().iter().map(|f| f.power.iter().sum()).collect()
    }

    /// Per-frame least-squares slope of log10 power against frequency (per Hz)
    fn spectral_tilt(&self) -> Vec<f64> {
        let axis = self.axis();
        let n = axis.num_bins;
        if n < 2 {
            return vec![0.0; self.num_frames()];
        }

        let freqs: Vec<f64> = (0..n).map(|k| axis.bin_frequency(k)).collect();
        let mean_f = freqs.iter().sum::<f64>() / n as f64;
        let var_f: f64 = freqs.iter().map(|f| (f - mean_f).powi(2)).sum();

        self.frames()
            .iter()
            .map(|frame| {
                let logs: Vec<f64> = frame
                    .power
                    .iter()
                    .map(|p| (p + LOG_FLOOR).log10())
                    .collect();
                let mean_l = logs.iter().sum::<f64>() / n as f64;
                let cov: f64 = freqs
                    .iter()
                    .zip(&logs)
                    .map(|(f, l)| (f - mean_f) * (l - mean_l))
                    .sum();
                cov / var_f
            })
            .collect()
    }

    /// Bin-wise mean power across frames (all zeros when there are no frames)
    fn mean_spectrum(&self) -> Vec<f64> {
        let mut mean = vec![0.0; self.num_bins()];
        let frames = self.frames();
        if frames.is_empty() {
            return mean;
        }

        for frame in frames {
            for (acc, p) in mean.iter_mut().zip(&frame.power) {
                *acc += p;
            }
        }
        let count = frames.len() as f64;
        mean.iter_mut().for_each(|m| *m /= count);
        mean
    }
}
