//! Spectrum feature extraction
//!
//! Analyses the waveform once per call and stores the region-aligned slice
//! of the spectrogram on every region under the configured feature name.

use super::traits::FeatureExtractor;
use crate::error::FeatureExtractionError;
use crate::model::{AttributeValue, Region, WaveformBuffer};
use crate::spectrum::{AnalysisParameters, SpectralAnalysis, SpectralAnalyzer};

/// Extracts spectra aligned to regions
pub struct SpectrumFeatureExtractor<'a, A: SpectralAnalysis = SpectralAnalyzer> {
    waveform: &'a WaveformBuffer,
    /// Holds the single feature name; returned by `extracted_features`
    feature_names: Vec<String>,
    params: AnalysisParameters,
    analyzer: A,
}

impl<'a> SpectrumFeatureExtractor<'a> {
    /// Create an extractor with the default 0.01s frame step and 0.02s window
    pub fn new(waveform: &'a WaveformBuffer, feature_name: impl Into<String>) -> Self {
        Self::with_analyzer(waveform, feature_name, SpectralAnalyzer::new())
    }
}

impl<'a, A: SpectralAnalysis> SpectrumFeatureExtractor<'a, A> {
    /// Create an extractor backed by a specific analyzer
    pub fn with_analyzer(
        waveform: &'a WaveformBuffer,
        feature_name: impl Into<String>,
        analyzer: A,
    ) -> Self {
        Self {
            waveform,
            feature_names: vec![feature_name.into()],
            params: AnalysisParameters::default(),
            analyzer,
        }
    }

    /// Override the analysis parameters
    pub fn with_parameters(mut self, params: AnalysisParameters) -> Self {
        self.params = params;
        self
    }

    pub fn feature_name(&self) -> &str {
        &self.feature_names[0]
    }

    pub fn parameters(&self) -> &AnalysisParameters {
        &self.params
    }
}

impl<A: SpectralAnalysis> FeatureExtractor for SpectrumFeatureExtractor<'_, A> {
    fn extracted_features(&self) -> &[String] {
        &self.feature_names
    }

    /// Slices are written in input order. If a region cannot be sliced the
    /// call stops there and returns the error; regions before it keep the
    /// attribute they were just given, nothing is rolled back.
    fn extract_features(&self, regions: &mut [Region]) -> Result<(), FeatureExtractionError> {
        let feature = self.feature_name();

        let spectrogram = self
            .analyzer
            .analyze(self.waveform, &self.params)
            .map_err(|source| FeatureExtractionError::Analysis {
                feature: feature.to_string(),
                source,
            })?;

        let bounds: Vec<(f64, f64)> = regions.iter().map(|r| (r.start(), r.end())).collect();
        let slices = spectrogram.slice_many(&bounds);
        drop(spectrogram);

        log::debug!("Aligning '{}' to {} regions", feature, regions.len());

        for (index, (region, slice)) in regions.iter_mut().zip(slices).enumerate() {
            let slice = slice.map_err(|source| FeatureExtractionError::Region {
                feature: feature.to_string(),
                index,
                source,
            })?;
            region.set_attribute(feature, AttributeValue::Spectrum(slice));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpectrumError;
    use crate::spectrum::SpectralFrames;

    fn noise_waveform() -> WaveformBuffer {
        // deterministic pseudo-noise, 0.5s at 8kHz
        let mut state = 0x2545f491u32;
        let samples = (0..4000)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state as f64 / u32::MAX as f64) * 2.0 - 1.0
            })
            .collect();
        WaveformBuffer::new(samples, 8000)
    }

    #[test]
    fn test_defaults_and_feature_names() {
        let wav = noise_waveform();
        let extractor = SpectrumFeatureExtractor::new(&wav, "spectrum");

        assert_eq!(extractor.feature_name(), "spectrum");
        assert_eq!(extractor.extracted_features(), &["spectrum".to_string()]);
        assert_eq!(*extractor.parameters(), AnalysisParameters::new(0.01, 0.02));
    }

    #[test]
    fn test_overwrites_existing_attribute() {
        let wav = noise_waveform();
        let mut regions = vec![Region::new(0.1, 0.2)];
        regions[0].set_attribute("spectrum", 1.0);
        regions[0].set_attribute("other", true);

        SpectrumFeatureExtractor::new(&wav, "spectrum")
            .extract_features(&mut regions)
            .unwrap();

        let slice = regions[0].attribute("spectrum").unwrap().as_spectrum().unwrap();
        assert!(!slice.is_empty());
        assert_eq!(regions[0].attribute("other"), Some(&AttributeValue::Flag(true)));
    }

    #[test]
    fn test_fails_fast_keeping_earlier_writes() {
        let wav = noise_waveform();
        let mut regions = vec![
            Region::new(0.0, 0.1),
            Region::new(0.3, 0.2),
            Region::new(0.2, 0.3),
        ];

        let err = SpectrumFeatureExtractor::new(&wav, "spectrum")
            .extract_features(&mut regions)
            .unwrap_err();

        match err {
            FeatureExtractionError::Region { index, source, .. } => {
                assert_eq!(index, 1);
                assert_eq!(source, SpectrumError::InvalidRange { start: 0.3, end: 0.2 });
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(regions[0].has_attribute("spectrum"));
        assert!(!regions[1].has_attribute("spectrum"));
        assert!(!regions[2].has_attribute("spectrum"));
    }

    #[test]
    fn test_empty_region_list() {
        let wav = noise_waveform();
        let mut regions: Vec<Region> = Vec::new();
        assert!(SpectrumFeatureExtractor::new(&wav, "spectrum")
            .extract_features(&mut regions)
            .is_ok());
    }
}
