use crate::spectrum::SpectralSlice;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value stored under a region attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// Spectrum frames aligned to the region
    Spectrum(SpectralSlice),

    /// Scalar feature
    Number(f64),

    /// Label or categorical feature
    Text(String),

    /// Boolean feature
    Flag(bool),
}

impl AttributeValue {
    /// Borrow the spectral slice, if this is one
    pub fn as_spectrum(&self) -> Option<&SpectralSlice> {
        match self {
            AttributeValue::Spectrum(slice) => Some(slice),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<SpectralSlice> for AttributeValue {
    fn from(slice: SpectralSlice) -> Self {
        AttributeValue::Spectrum(slice)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Flag(b)
    }
}

/// Time interval [start, end) in seconds carrying named features
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Region {
    start: f64,
    end: f64,

    /// Features attached by extractors, keyed by feature name
    #[serde(skip)]
    attributes: HashMap<String, AttributeValue>,
}

impl Region {
    /// Create a region with no attributes
    ///
    /// Bounds are not validated here; slicing reports inverted ranges.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            attributes: HashMap::new(),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Store a value, replacing any previous value under the same key
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.remove(key)
    }

    /// All attributes (unordered)
    pub fn attributes(&self) -> &HashMap<String, AttributeValue> {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_overwrites() {
        let mut region = Region::new(0.1, 0.3);
        region.set_attribute("f0", 120.0);
        region.set_attribute("f0", 130.0);

        assert_eq!(region.attributes().len(), 1);
        assert_eq!(region.attribute("f0").and_then(|v| v.as_number()), Some(130.0));
    }

    #[test]
    fn test_mixed_attribute_kinds() {
        let mut region = Region::new(0.0, 1.0);
        region.set_attribute("accent", "H*".to_string());
        region.set_attribute("voiced", true);

        assert_eq!(
            region.attribute("accent"),
            Some(&AttributeValue::Text("H*".to_string()))
        );
        assert!(region.attribute("voiced").unwrap().as_spectrum().is_none());
        assert!(region.remove_attribute("voiced").is_some());
        assert!(!region.has_attribute("voiced"));
    }

    #[test]
    fn test_deserialize_bounds_only() {
        let regions: Vec<Region> =
            serde_json::from_str(r#"[{"start": 0.2, "end": 0.4}, {"start": 1.0, "end": 1.5}]"#)
                .unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].start(), 0.2);
        assert_eq!(regions[1].end(), 1.5);
        assert!(regions[0].attributes().is_empty());
    }
}
