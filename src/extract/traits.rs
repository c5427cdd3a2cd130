//! Feature extractor trait

use crate::error::FeatureExtractionError;
use crate::model::Region;

/// Attaches named features to regions
///
/// An orchestrator runs many extractors over the same regions; each one
/// reports the attribute names it writes so dependencies can be resolved
/// before extraction starts.
pub trait FeatureExtractor {
    /// Attribute names this extractor writes on every region
    fn extracted_features(&self) -> &[String];

    /// Compute features and store them on the regions in place
    fn extract_features(&self, regions: &mut [Region]) -> Result<(), FeatureExtractionError>;
}
