//! Analysis window configuration

use crate::error::SpectrumError;
use serde::{Deserialize, Serialize};

/// Default spacing between frame timestamps (100 frames per second)
pub const DEFAULT_FRAME_STEP: f64 = 0.01;

/// Default analysis (Hamming) window duration
pub const DEFAULT_WINDOW_DURATION: f64 = 0.02;

/// Framing parameters for a spectral analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    /// Seconds between consecutive frame timestamps
    pub frame_step: f64,

    /// Seconds of signal covered by each frame's window
    ///
    /// May be shorter than `frame_step`, in which case frames do not overlap.
    pub window_duration: f64,
}

impl AnalysisParameters {
    /// Create parameters; values are checked when the analysis runs
    pub fn new(frame_step: f64, window_duration: f64) -> Self {
        Self {
            frame_step,
            window_duration,
        }
    }

    /// Override the frame step
    pub fn with_frame_step(mut self, frame_step: f64) -> Self {
        self.frame_step = frame_step;
        self
    }

    /// Override the window duration
    pub fn with_window_duration(mut self, window_duration: f64) -> Self {
        self.window_duration = window_duration;
        self
    }

    /// Check both durations are finite and strictly positive
    pub fn validate(&self) -> Result<(), SpectrumError> {
        if !(self.frame_step.is_finite() && self.frame_step > 0.0) {
            return Err(SpectrumError::InvalidParameter(format!(
                "frame step must be positive, got {}",
                self.frame_step
            )));
        }
        if !(self.window_duration.is_finite() && self.window_duration > 0.0) {
            return Err(SpectrumError::InvalidParameter(format!(
                "window duration must be positive, got {}",
                self.window_duration
            )));
        }
        Ok(())
    }
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_STEP, DEFAULT_WINDOW_DURATION)
    }
}
