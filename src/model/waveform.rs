/// Decoded mono audio ready for analysis
#[derive(Debug, Clone)]
pub struct WaveformBuffer {
    /// Samples, nominally in [-1.0, 1.0]
    samples: Vec<f64>,

    /// Sample rate in Hz
    sample_rate: u32,
}

impl WaveformBuffer {
    /// Wrap decoded samples
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Build from f32 samples, as produced by most decoders
    pub fn from_f32(samples: &[f32], sample_rate: u32) -> Self {
        Self::new(samples.iter().map(|&s| s as f64).collect(), sample_rate)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0.0 when the sample rate is unknown)
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let wav = WaveformBuffer::new(vec![0.0; 8000], 16000);
        assert!((wav.duration() - 0.5).abs() < 1e-12);
        assert_eq!(wav.len(), 8000);
    }

    #[test]
    fn test_zero_rate_has_no_duration() {
        let wav = WaveformBuffer::new(vec![0.0; 10], 0);
        assert_eq!(wav.duration(), 0.0);
    }
}
