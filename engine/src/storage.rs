use futures::future::{self, BoxFuture};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use tracing::{debug, info};

use crate::error::AppError;

/// Read side of a hash-shaped coefficient table.
///
/// `hget` returns `Ok(None)` when the field was never published and
/// `Err(AppError::StoreUnavailable)` when the store cannot answer.
pub trait CoefficientStore: Send + Sync {
    fn hget<'a>(
        &'a self,
        model: &'a str,
        field: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, AppError>>;

    fn health_check(&self) -> BoxFuture<'_, bool> {
        Box::pin(future::ready(true))
    }
}

/// Coefficients held in process memory, keyed by model then field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct InMemoryCoefficientStore {
    tables: HashMap<String, HashMap<String, String>>,
}

impl InMemoryCoefficientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coefficient(mut self, model: &str, field: &str, value: &str) -> Self {
        self.insert(model, field, value);
        self
    }

    pub fn insert(&mut self, model: &str, field: &str, value: &str) {
        self.tables
            .entry(model.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }

    /// Loads `{"<model>": {"<field>": "<coefficient>", ...}}` from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::StoreUnavailable(format!("failed to read {}: {}", path.display(), e))
        })?;
        let store: Self = serde_json::from_str(&content).map_err(|e| {
            AppError::Unexpected(format!("failed to parse {}: {}", path.display(), e))
        })?;

        let fields: usize = store.tables.values().map(HashMap::len).sum();
        info!(
            "Loaded {} coefficients across {} models from {}",
            fields,
            store.tables.len(),
            path.display()
        );
        Ok(store)
    }
}

impl CoefficientStore for InMemoryCoefficientStore {
    fn hget<'a>(
        &'a self,
        model: &'a str,
        field: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, AppError>> {
        let value = self
            .tables
            .get(model)
            .and_then(|table| table.get(field))
            .cloned();
        if value.is_none() {
            debug!("No coefficient for {} in {}", field, model);
        }
        Box::pin(future::ready(Ok(value)))
    }
}


#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Store whose every lookup fails as if Redis were down.
    pub(crate) struct UnreachableStore;

    impl CoefficientStore for UnreachableStore {
        fn hget<'a>(
            &'a self,
            _model: &'a str,
            _field: &'a str,
        ) -> BoxFuture<'a, Result<Option<String>, AppError>> {
            Box::pin(future::ready(Err(AppError::StoreUnavailable(
                "connection refused".to_string(),
            ))))
        }

        fn health_check(&self) -> BoxFuture<'_, bool> {
            Box::pin(future::ready(false))
        }
    }

    /// The coefficient table used throughout the scoring examples.
    pub(crate) fn example_store() -> InMemoryCoefficientStore {
        InMemoryCoefficientStore::new()
            .with_coefficient("model", "deviceExtBrowser=Chrome", "0.5")
            .with_coefficient("model", "bannerExtSize=300x250", "0.2")
            .with_coefficient("model", "deviceLanguage=en", "0.1")
            .with_coefficient("model", "deviceExtType=mobile", "-0.3")
            .with_coefficient("model", "bias", "0.0")
    }
}
