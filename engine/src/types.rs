use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{feature_error, AppError};

/// Wire shape of a bid request. Fields are optional so that a missing value
/// surfaces as `InvalidFeature` instead of a framework rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiddingRequest {
    #[serde(default)]
    pub device_ext_browser: Option<String>,
    #[serde(default)]
    pub banner_ext_size: Option<String>,
    #[serde(default)]
    pub device_language: Option<String>,
    #[serde(default)]
    pub device_ext_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BiddingResponse {
    pub ctr: String,
}

/// The four categorical inputs for one scoring request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    pub browser: String,
    pub banner_size: String,
    pub language: String,
    pub device_type: String,
}

impl FeatureSet {
    pub fn new(
        browser: impl Into<String>,
        banner_size: impl Into<String>,
        language: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            browser: browser.into(),
            banner_size: banner_size.into(),
            language: language.into(),
            device_type: device_type.into(),
        }
    }
}

impl TryFrom<BiddingRequest> for FeatureSet {
    type Error = AppError;

    fn try_from(request: BiddingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            browser: request
                .device_ext_browser
                .ok_or_else(|| feature_error("deviceExtBrowser is required"))?,
            banner_size: request
                .banner_ext_size
                .ok_or_else(|| feature_error("bannerExtSize is required"))?,
            language: request
                .device_language
                .ok_or_else(|| feature_error("deviceLanguage is required"))?,
            device_type: request
                .device_ext_type
                .ok_or_else(|| feature_error("deviceExtType is required"))?,
        })
    }
}

/// Logistic-regression coefficients in scoring order: the four features, then bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientVector(pub [f64; 5]);

impl CoefficientVector {
    /// Log-odds sum. The model is additive, so this is a plain sum.
    pub fn log_odds(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Predicted click-through probability.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CtrPrediction(f64);

impl CtrPrediction {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

// f64's Display is the shortest string that parses back to the same value.
impl fmt::Display for CtrPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
