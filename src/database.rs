//! # Redis
//!
//! Document store for the board.
//!
//! ## Requirements
//!
//! - Insert-only message collection, read back newest first
//! - One small counter document per submitting IP
//! - Low traffic, so one connection manager with short timeouts is enough
//!
//! ## Implementation
//!
//! - `quotes:<id>`: JSON message document
//! - `quotes:by_created`: sorted set of ids scored by `created_at` millis,
//!   walked with ZREVRANGE for the newest-first listing; equal scores fall
//!   back to member ordering, so ties stay consistent within one read
//! - `quotes:next_id`: INCR id sequence
//! - `rateLimits:<ip>`: JSON [`RateLimitRecord`], rewritten wholesale on
//!   every allowed submission
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use crate::{
    error::AppError,
    models::{Quote, RateLimitRecord},
};

pub const QUOTE_PREFIX: &str = "quotes:";
pub const QUOTE_SEQUENCE: &str = "quotes:next_id";
pub const QUOTE_INDEX: &str = "quotes:by_created";
pub const RATE_LIMIT_PREFIX: &str = "rateLimits:";

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, AppError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url).map_err(|_| AppError::Misconfigured("REDIS_URL"))?;

    Ok(client.get_connection_manager_with_config(config).await?)
}

/// Storage gateway over the `quotes` and `rateLimits` collections. The
/// pipeline and query service only ever talk to storage through this.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Persists a new message and returns its storage-assigned id.
    async fn insert_quote(
        &self,
        text: &str,
        recipient_label: &str,
        created_at: DateTime<Utc>,
    ) -> Result<String, AppError>;

    /// Every message, ordered by creation time descending.
    async fn list_quotes(&self) -> Result<Vec<Quote>, AppError>;

    async fn get_rate_limit(&self, source_ip: &str) -> Result<Option<RateLimitRecord>, AppError>;

    async fn put_rate_limit(
        &self,
        source_ip: &str,
        record: &RateLimitRecord,
    ) -> Result<(), AppError>;
}

/// Redis-backed [`BoardStore`]. Cloning is cheap and every clone shares the
/// same underlying connection manager.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl BoardStore for RedisStore {
    async fn insert_quote(
        &self,
        text: &str,
        recipient_label: &str,
        created_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let mut connection = self.connection.clone();

        let id: u64 = connection.incr(QUOTE_SEQUENCE, 1).await?;
        let id = id.to_string();

        let quote = Quote {
            id: id.clone(),
            text: text.to_string(),
            recipient_label: recipient_label.to_string(),
            created_at,
        };

        let _: () = connection
            .set(format!("{QUOTE_PREFIX}{id}"), serde_json::to_string(&quote)?)
            .await?;
        let _: () = connection
            .zadd(QUOTE_INDEX, &id, created_at.timestamp_millis())
            .await?;

        Ok(id)
    }

    async fn list_quotes(&self) -> Result<Vec<Quote>, AppError> {
        let mut connection = self.connection.clone();

        let ids: Vec<String> = connection.zrevrange(QUOTE_INDEX, 0, -1).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids.iter().map(|id| format!("{QUOTE_PREFIX}{id}")).collect();
        let payloads: Vec<Option<String>> = connection.mget(keys).await?;

        let mut quotes = Vec::with_capacity(payloads.len());
        for payload in payloads.into_iter().flatten() {
            quotes.push(serde_json::from_str(&payload)?);
        }

        Ok(quotes)
    }

    async fn get_rate_limit(&self, source_ip: &str) -> Result<Option<RateLimitRecord>, AppError> {
        let mut connection = self.connection.clone();

        let payload: Option<String> = connection
            .get(format!("{RATE_LIMIT_PREFIX}{source_ip}"))
            .await?;

        Ok(match payload {
            Some(payload) => Some(serde_json::from_str(&payload)?),
            None => None,
        })
    }

    async fn put_rate_limit(
        &self,
        source_ip: &str,
        record: &RateLimitRecord,
    ) -> Result<(), AppError> {
        let mut connection = self.connection.clone();

        let _: () = connection
            .set(
                format!("{RATE_LIMIT_PREFIX}{source_ip}"),
                serde_json::to_string(record)?,
            )
            .await?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{testing::MemoryStore, *};

    #[tokio::test]
    async fn cloned_handles_share_the_store() {
        let store = Arc::new(MemoryStore::default());
        let handle = Arc::clone(&store);

        handle
            .insert_quote("hello", "Anonymous", Utc::now())
            .await
            .unwrap();

        assert_eq!(store.list_quotes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn offline_store_fails_every_operation() {
        let store = MemoryStore::default();
        store
            .offline
            .store(true, std::sync::atomic::Ordering::SeqCst);

        assert!(store.list_quotes().await.is_err());
        assert!(store.get_rate_limit("1.2.3.4").await.is_err());
    }
}
