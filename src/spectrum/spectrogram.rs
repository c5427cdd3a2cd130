//! Framed spectrum representation and time slicing

use super::traits::SpectralFrames;
use crate::error::SpectrumError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Frequency layout shared by every frame of a spectrogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyAxis {
    /// Sample rate of the analysed signal in Hz
    pub sample_rate: u32,

    /// Samples per analysis window (also the FFT length)
    pub window_samples: usize,

    /// Non-negative frequency bins: window_samples / 2 + 1
    pub num_bins: usize,

    /// Width of one bin in Hz: sample_rate / window_samples
    pub bin_hz: f64,
}

impl FrequencyAxis {
    pub fn new(sample_rate: u32, window_samples: usize) -> Self {
        Self {
            sample_rate,
            window_samples,
            num_bins: window_samples / 2 + 1,
            bin_hz: sample_rate as f64 / window_samples as f64,
        }
    }

    /// Centre frequency of bin `k` in Hz
    pub fn bin_frequency(&self, k: usize) -> f64 {
        k as f64 * self.bin_hz
    }

    /// Nearest bin for a frequency, clamped to the available range
    pub fn bin_for_frequency(&self, hz: f64) -> usize {
        if !(hz > 0.0) {
            return 0;
        }
        ((hz / self.bin_hz).round() as usize).min(self.num_bins.saturating_sub(1))
    }

    /// Highest representable frequency
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }
}

/// One analysis frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralFrame {
    /// Frame timestamp in seconds (left edge of the window)
    pub time: f64,

    /// Power |X_k|^2 per frequency bin
    pub power: Vec<f64>,
}

/// Full spectrogram of one waveform
///
/// Immutable once built. Regions are aligned to it with [`Spectrogram::slice`]
/// or, for a batch, [`Spectrogram::slice_many`].
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    axis: FrequencyAxis,
    frame_step: f64,
    frames: Vec<SpectralFrame>,
}

impl Spectrogram {
    /// Assemble a spectrogram from already computed frames
    ///
    /// Every frame must have `axis.num_bins` values and timestamps must not
    /// decrease.
    pub fn from_frames(
        axis: FrequencyAxis,
        frame_step: f64,
        frames: Vec<SpectralFrame>,
    ) -> Result<Self, SpectrumError> {
        if let Some(bad) = frames.iter().position(|f| f.power.len() != axis.num_bins) {
            return Err(SpectrumError::InvalidParameter(format!(
                "frame {} has {} bins, expected {}",
                bad,
                frames[bad].power.len(),
                axis.num_bins
            )));
        }
        if frames.windows(2).any(|w| !(w[0].time <= w[1].time)) {
            return Err(SpectrumError::InvalidParameter(
                "frame timestamps must be non-decreasing".to_string(),
            ));
        }

        Ok(Self {
            axis,
            frame_step,
            frames,
        })
    }

    /// Timestamp of the first and last frame, if any
    pub fn time_range(&self) -> Option<(f64, f64)> {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time)),
            _ => None,
        }
    }

    /// Frames whose timestamp lies in [start, end)
    ///
    /// Bounds outside the spectrogram are clamped, so an interval beyond the
    /// signal yields an empty slice. Frames are never split.
    pub fn slice(&self, start: f64, end: f64) -> Result<SpectralSlice, SpectrumError> {
        // also rejects NaN bounds
        if !(start <= end) {
            return Err(SpectrumError::InvalidRange { start, end });
        }

        let first = self.frames.partition_point(|f| f.time < start);
        let last = self.frames.partition_point(|f| f.time < end).max(first);

        Ok(SpectralSlice {
            axis: self.axis,
            frame_step: self.frame_step,
            start,
            end,
            frames: self.frames[first..last].to_vec(),
        })
    }

    /// Slice once per interval, in parallel
    ///
    /// Returns one result per input interval, in input order.
    pub fn slice_many(&self, bounds: &[(f64, f64)]) -> Vec<Result<SpectralSlice, SpectrumError>> {
        bounds
            .par_iter()
            .map(|&(start, end)| self.slice(start, end))
            .collect()
    }
}

impl SpectralFrames for Spectrogram {
    fn axis(&self) -> &FrequencyAxis {
        &self.axis
    }

    fn frames(&self) -> &[SpectralFrame] {
        &self.frames
    }

    fn frame_step(&self) -> f64 {
        self.frame_step
    }
}

/// Frames of a spectrogram selected for one time interval
///
/// Owns its frames; the parent spectrogram may be dropped afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectralSlice {
    axis: FrequencyAxis,
    frame_step: f64,

    /// Requested interval start in seconds
    start: f64,

    /// Requested interval end in seconds
    end: f64,

    frames: Vec<SpectralFrame>,
}

impl SpectralSlice {
    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }
}

impl SpectralFrames for SpectralSlice {
    fn axis(&self) -> &FrequencyAxis {
        &self.axis
    }

    fn frames(&self) -> &[SpectralFrame] {
        &self.frames
    }

    fn frame_step(&self) -> f64 {
        self.frame_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10 frames at 0.0, 0.1, ..., 0.9 with 3 bins; power encodes the frame index
    fn ramp_spectrogram() -> Spectrogram {
        let axis = FrequencyAxis::new(4, 4);
        let frames = (0..10)
            .map(|i| SpectralFrame {
                time: i as f64 * 0.1,
                power: vec![i as f64, 1.0, 2.0],
            })
            .collect();
        Spectrogram::from_frames(axis, 0.1, frames).unwrap()
    }

    fn frame_ids(slice: &SpectralSlice) -> Vec<usize> {
        slice.frames().iter().map(|f| f.power[0] as usize).collect()
    }

    #[test]
    fn test_axis_layout() {
        let axis = FrequencyAxis::new(16000, 320);
        assert_eq!(axis.num_bins, 161);
        assert!((axis.bin_hz - 50.0).abs() < 1e-12);
        assert!((axis.bin_frequency(160) - axis.nyquist()).abs() < 1e-9);
        assert_eq!(axis.bin_for_frequency(1000.0), 20);
        assert_eq!(axis.bin_for_frequency(1e9), 160);
        assert_eq!(axis.bin_for_frequency(-5.0), 0);
    }

    #[test]
    fn test_bin_lookup_on_empty_axis() {
        let axis = FrequencyAxis {
            sample_rate: 16000,
            window_samples: 0,
            num_bins: 0,
            bin_hz: 50.0,
        };
        assert_eq!(axis.bin_for_frequency(1000.0), 0);
        assert_eq!(axis.bin_for_frequency(0.0), 0);
    }

    #[test]
    fn test_slice_half_open() {
        let spec = ramp_spectrogram();
        let slice = spec.slice(0.2, 0.5).unwrap();
        assert_eq!(frame_ids(&slice), vec![2, 3, 4]);
        assert_eq!(slice.num_bins(), 3);
        assert_eq!(slice.start(), 0.2);
        assert_eq!(slice.end(), 0.5);
    }

    #[test]
    fn test_slice_between_frames() {
        let spec = ramp_spectrogram();
        let slice = spec.slice(0.25, 0.45).unwrap();
        assert_eq!(frame_ids(&slice), vec![3, 4]);
    }

    #[test]
    fn test_slice_clamps_out_of_range() {
        let spec = ramp_spectrogram();
        assert_eq!(spec.slice(-1.0, 0.15).unwrap().num_frames(), 2);
        assert_eq!(spec.slice(0.85, 5.0).unwrap().num_frames(), 1);
        assert!(spec.slice(2.0, 3.0).unwrap().is_empty());
        assert!(spec.slice(-3.0, -2.0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_and_inverted() {
        let spec = ramp_spectrogram();
        assert!(spec.slice(0.3, 0.3).unwrap().is_empty());
        assert_eq!(
            spec.slice(0.5, 0.2),
            Err(SpectrumError::InvalidRange { start: 0.5, end: 0.2 })
        );
        assert!(spec.slice(f64::NAN, 0.2).is_err());
    }

    #[test]
    fn test_slice_many_keeps_order() {
        let spec = ramp_spectrogram();
        let results = spec.slice_many(&[(0.5, 0.7), (0.0, 0.1), (0.9, 0.1), (0.3, 0.3)]);

        assert_eq!(results.len(), 4);
        assert_eq!(frame_ids(results[0].as_ref().unwrap()), vec![5, 6]);
        assert_eq!(frame_ids(results[1].as_ref().unwrap()), vec![0]);
        assert!(results[2].is_err());
        assert!(results[3].as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_slice_outlives_parent() {
        let slice = {
            let spec = ramp_spectrogram();
            spec.slice(0.0, 0.3).unwrap()
        };
        assert_eq!(frame_ids(&slice), vec![0, 1, 2]);
    }

    #[test]
    fn test_from_frames_rejects_mismatched_bins() {
        let axis = FrequencyAxis::new(4, 4);
        let frames = vec![
            SpectralFrame { time: 0.0, power: vec![0.0; 3] },
            SpectralFrame { time: 0.1, power: vec![0.0; 2] },
        ];
        assert!(Spectrogram::from_frames(axis, 0.1, frames).is_err());
    }

    #[test]
    fn test_from_frames_rejects_unordered_times() {
        let axis = FrequencyAxis::new(4, 4);
        let frames = vec![
            SpectralFrame { time: 0.2, power: vec![0.0; 3] },
            SpectralFrame { time: 0.1, power: vec![0.0; 3] },
        ];
        assert!(Spectrogram::from_frames(axis, 0.1, frames).is_err());
    }

    #[test]
    fn test_summaries() {
        let spec = ramp_spectrogram();
        let slice = spec.slice(0.0, 0.2).unwrap();

        // bins at 0, 1, 2 Hz
        assert_eq!(slice.band_power(1.0, 3.0), vec![3.0, 3.0]);
        assert_eq!(slice.frame_energy(), vec![3.0, 4.0]);
        assert_eq!(slice.mean_spectrum(), vec![0.5, 1.0, 2.0]);
        assert_eq!(slice.timestamps(), vec![0.0, 0.1]);

        let empty = spec.slice(5.0, 6.0).unwrap();
        assert_eq!(empty.mean_spectrum(), vec![0.0; 3]);
        assert!(empty.spectral_tilt().is_empty());
    }

    #[test]
    fn test_spectral_tilt_sign() {
        let axis = FrequencyAxis::new(8, 8);
        let falling = SpectralFrame {
            time: 0.0,
            power: vec![1000.0, 100.0, 10.0, 1.0, 0.1],
        };
        let rising = SpectralFrame {
            time: 0.1,
            power: vec![0.1, 1.0, 10.0, 100.0, 1000.0],
        };
        let spec = Spectrogram::from_frames(axis, 0.1, vec![falling, rising]).unwrap();

        let tilt = spec.spectral_tilt();
        // one decade per Hz
        assert!((tilt[0] + 1.0).abs() < 1e-6);
        assert!((tilt[1] - 1.0).abs() < 1e-6);
    }
}
