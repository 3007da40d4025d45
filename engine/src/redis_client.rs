use futures::future::BoxFuture;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use std::{future::Future, time::Duration};
use tracing::{debug, error, info};

use crate::{error::AppError, storage::CoefficientStore};

/// Coefficient table backed by a Redis hash (`HGET <model> <field>`).
#[derive(Clone)]
pub struct RedisCoefficientStore {
    manager: ConnectionManager,
    timeout: Duration,
}

impl RedisCoefficientStore {
    pub async fn new(redis_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = redis::Client::open(redis_url)?;
        let manager = bounded(timeout, "connect", ConnectionManager::new(client)).await?;

        info!("Redis coefficient store initialized successfully");
        Ok(RedisCoefficientStore { manager, timeout })
    }
}

/// Runs a Redis call under `timeout`; an elapsed timer counts as the store being down.
async fn bounded<T, F>(timeout: Duration, op: &str, fut: F) -> Result<T, AppError>
where
    F: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(AppError::StoreUnavailable(format!(
            "{} timed out after {:?}",
            op, timeout
        ))),
    }
}

impl CoefficientStore for RedisCoefficientStore {
    fn hget<'a>(
        &'a self,
        model: &'a str,
        field: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, AppError>> {
        Box::pin(async move {
            // ConnectionManager is a cheap handle onto the shared multiplexed connection.
            let mut conn = self.manager.clone();
            let result: Option<String> =
                bounded(self.timeout, "HGET", conn.hget(model, field)).await?;

            match &result {
                Some(_) => debug!("Coefficient hit for field: {}", field),
                None => debug!("Coefficient miss for field: {}", field),
            }
            Ok(result)
        })
    }

    fn health_check(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            let mut conn = self.manager.clone();
            match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
                Ok(_) => {
                    debug!("Redis health check passed");
                    true
                }
                Err(e) => {
                    error!("Redis health check failed: {}", e);
                    false
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn stalled_call_becomes_store_unavailable() {
        let err = assert_err!(
            bounded(
                Duration::from_millis(20),
                "HGET",
                future::pending::<RedisResult<Option<String>>>()
            )
            .await
        );
        assert!(matches!(err, AppError::StoreUnavailable(_)));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn redis_error_within_deadline_becomes_store_unavailable() {
        let failed: RedisResult<Option<String>> =
            Err((redis::ErrorKind::IoError, "connection reset").into());
        let err = assert_err!(bounded(Duration::from_secs(1), "HGET", future::ready(failed)).await);
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn answer_within_deadline_passes_through() {
        let value = assert_ok!(
            bounded(
                Duration::from_secs(1),
                "HGET",
                future::ready(Ok::<_, redis::RedisError>(Some("0.5".to_string())))
            )
            .await
        );
        assert_eq!(value.as_deref(), Some("0.5"));
    }

    #[tokio::test]
    async fn unreachable_server_fails_to_connect_in_time() {
        // Port 1 is reserved and refuses connections on test hosts.
        let result = RedisCoefficientStore::new("redis://127.0.0.1:1", Duration::from_millis(500)).await;
        let err = assert_err!(result.map(|_| ()));
        assert!(matches!(err, AppError::StoreUnavailable(_)));
    }
}
