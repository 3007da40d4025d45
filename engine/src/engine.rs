use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    error::AppError,
    keys::build_keys,
    resolver::CoefficientResolver,
    scorer::{calculate_ctr, convert_coefficients},
    storage::CoefficientStore,
    types::{CtrPrediction, FeatureSet},
};

/// Per-request scoring pipeline: key builder, resolver, scorer.
///
/// Holds no mutable state, so one instance is shared across all requests.
pub struct BiddingEngine {
    resolver: CoefficientResolver,
}

impl BiddingEngine {
    pub fn new(store: Arc<dyn CoefficientStore>) -> Self {
        let resolver = CoefficientResolver::new(store);
        info!("Bidding engine initialized for model '{}'", resolver.model());
        Self { resolver }
    }

    pub async fn predict(&self, features: &FeatureSet) -> Result<CtrPrediction, AppError> {
        let keys = build_keys(features)?;
        let values = self.resolver.resolve_all(&keys).await?;
        let coefficients = convert_coefficients(&keys, values)?;
        let prediction = calculate_ctr(&coefficients);

        debug!(
            "Predicted ctr {} (log-odds {}) for {:?}",
            prediction,
            coefficients.log_odds(),
            features
        );
        Ok(prediction)
    }

    pub async fn is_healthy(&self) -> bool {
        self.resolver.health_check().await
    }
}
