use futures::future::try_join_all;
use std::sync::Arc;
use tracing::debug;

use crate::{
    error::AppError,
    keys::{CoefficientKey, MODEL_KEY},
    storage::CoefficientStore,
};

/// Resolves coefficient keys against the store under a single model identifier.
#[derive(Clone)]
pub struct CoefficientResolver {
    store: Arc<dyn CoefficientStore>,
    model: String,
}

impl CoefficientResolver {
    pub fn new(store: Arc<dyn CoefficientStore>) -> Self {
        Self::with_model(store, MODEL_KEY)
    }

    pub fn with_model(store: Arc<dyn CoefficientStore>, model: &str) -> Self {
        Self {
            store,
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn resolve(&self, key: &CoefficientKey) -> Result<Option<String>, AppError> {
        self.store.hget(&self.model, key.as_str()).await
    }

    /// Issues every lookup concurrently; results keep the order of `keys`.
    /// A single store failure fails the whole batch.
    pub async fn resolve_all(
        &self,
        keys: &[CoefficientKey],
    ) -> Result<Vec<Option<String>>, AppError> {
        let values = try_join_all(keys.iter().map(|key| self.resolve(key))).await?;
        debug!(
            "Resolved {}/{} coefficients from {}",
            values.iter().filter(|v| v.is_some()).count(),
            keys.len(),
            self.model
        );
        Ok(values)
    }

    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}
