use std::fmt;

use crate::{
    error::{feature_error, AppError},
    types::FeatureSet,
};

/// Hash key under which every coefficient of the current model lives.
pub const MODEL_KEY: &str = "model";

pub const DEVICE_EXT_BROWSER_KEY: &str = "deviceExtBrowser";
pub const BANNER_EXT_SIZE_KEY: &str = "bannerExtSize";
pub const DEVICE_LANGUAGE_KEY: &str = "deviceLanguage";
pub const DEVICE_EXT_TYPE_KEY: &str = "deviceExtType";
pub const BIAS_KEY: &str = "bias";

/// Reserved between feature name and value; never allowed inside a value.
pub const KEY_SEPARATOR: char = '=';

/// Number of keys resolved per request: four features plus bias.
pub const KEY_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoefficientKey(String);

impl CoefficientKey {
    fn feature(name: &str, value: &str) -> Result<Self, AppError> {
        if value.is_empty() {
            return Err(feature_error(&format!("{} cannot be empty", name)));
        }
        if value.contains(KEY_SEPARATOR) {
            return Err(feature_error(&format!(
                "{} cannot contain '{}'",
                name, KEY_SEPARATOR
            )));
        }
        Ok(Self(format!("{}{}{}", name, KEY_SEPARATOR, value)))
    }

    pub fn bias() -> Self {
        Self(BIAS_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoefficientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the lookup keys for a request in scoring order:
/// browser, banner size, language, device type, bias.
pub fn build_keys(features: &FeatureSet) -> Result<[CoefficientKey; KEY_COUNT], AppError> {
    Ok([
        CoefficientKey::feature(DEVICE_EXT_BROWSER_KEY, &features.browser)?,
        CoefficientKey::feature(BANNER_EXT_SIZE_KEY, &features.banner_size)?,
        CoefficientKey::feature(DEVICE_LANGUAGE_KEY, &features.language)?,
        CoefficientKey::feature(DEVICE_EXT_TYPE_KEY, &features.device_type)?,
        CoefficientKey::bias(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_follow_scoring_order() {
        let features = FeatureSet::new("Chrome", "300x250", "en", "mobile");
        let keys = build_keys(&features).unwrap();
        let keys: Vec<&str> = keys.iter().map(CoefficientKey::as_str).collect();

        assert_eq!(
            keys,
            vec![
                "deviceExtBrowser=Chrome",
                "bannerExtSize=300x250",
                "deviceLanguage=en",
                "deviceExtType=mobile",
                "bias",
            ]
        );
    }

    #[test]
    fn values_are_not_normalized() {
        let features = FeatureSet::new("chrome ", "300X250", "EN", "Mobile");
        let keys = build_keys(&features).unwrap();
        assert_eq!(keys[0].as_str(), "deviceExtBrowser=chrome ");
        assert_eq!(keys[2].as_str(), "deviceLanguage=EN");
    }

    #[test]
    fn empty_value_is_rejected() {
        let features = FeatureSet::new("Chrome", "", "en", "mobile");
        let err = build_keys(&features).unwrap_err();
        assert!(matches!(err, AppError::InvalidFeature(_)));
    }

    #[test]
    fn separator_in_value_is_rejected() {
        let features = FeatureSet::new("Chrome", "300x250", "en", "type=mobile");
        let err = build_keys(&features).unwrap_err();
        assert!(matches!(err, AppError::InvalidFeature(_)));
    }

    #[test]
    fn keys_are_deterministic() {
        let features = FeatureSet::new("Safari", "728x90", "de", "desktop");
        assert_eq!(build_keys(&features).unwrap(), build_keys(&features).unwrap());
    }
}
