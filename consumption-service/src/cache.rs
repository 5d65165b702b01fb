use std::time::Duration;

use redis::{aio::ConnectionManager, AsyncCommands};

use crate::{
    config::{redact_credentials, CacheConfig},
    error::ServiceError,
};

/// Key holding the serialized list of every record.
pub const CONSUMPTION_LIST_KEY: &str = "consumoData";

/// Absolute expiry applied whenever the list is written.
pub const CONSUMPTION_LIST_TTL: Duration = Duration::from_secs(5 * 60);

#[async_trait::async_trait]
pub trait ConsumptionCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;

    async fn set_with_expiry(&self, key: &str, blob: &str, ttl: Duration) -> Result<(), ServiceError>;
}

/// Redis-backed cache. The connection manager is cloned per call and
/// reconnects on its own after a dropped connection.
#[derive(Clone)]
pub struct RedisConsumptionCache {
    conn: ConnectionManager,
}

impl RedisConsumptionCache {
    pub async fn connect(cfg: &CacheConfig) -> anyhow::Result<Self> {
        let client = redis::Client::open(cfg.connection_string.as_str())?;
        let conn = ConnectionManager::new(client).await?;

        tracing::info!(uri = %redact_credentials(&cfg.connection_string), "connected to cache");
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl ConsumptionCache for RedisConsumptionCache {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| ServiceError::Cache(e.to_string()))
    }

    async fn set_with_expiry(&self, key: &str, blob: &str, ttl: Duration) -> Result<(), ServiceError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, blob, ttl.as_secs())
            .await
            .map_err(|e| ServiceError::Cache(e.to_string()))
    }
}
