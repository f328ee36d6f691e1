//! Key-value state shared across webhook deliveries.
//!
//! Two interchangeable backends implement [`StateStore`]: a process-local
//! map for development and a Redis-backed store for multi-instance
//! deployments. The backend is chosen once at startup from
//! [`StateConfig`](crate::config::StateConfig).

pub mod memory;
pub mod redis_store;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{StateBackend, StateConfig};
use crate::{AppError, Result};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Boxed future returned by [`StateStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Shared state store handle.
pub type SharedStateStore = Arc<dyn StateStore>;

/// Get/set persistence for framework state.
///
/// The full key-value surface (`get`, `set`, `delete`) is the state store
/// contract a chat-state backend offers; the webhook path itself only
/// needs `set_if_absent` for delivery de-duplication.
pub trait StateStore: Send + Sync {
    /// Read a value; expired or missing keys yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::State` if the backend is unreachable.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `AppError::State` if the backend is unreachable.
    fn set<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StoreFuture<'a, ()>;

    /// Write a value only when the key is absent. Returns `true` when written.
    ///
    /// # Errors
    ///
    /// Returns `AppError::State` if the backend is unreachable.
    fn set_if_absent<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StoreFuture<'a, bool>;

    /// Remove a key. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AppError::State` if the backend is unreachable.
    fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;

    /// Which backend this is.
    fn backend(&self) -> StateBackend;
}

/// Build the configured state store.
///
/// The Redis store connects lazily, so this never blocks on the network.
///
/// # Errors
///
/// Returns `AppError::Config` if Redis is selected without a URL, or
/// `AppError::State` if the URL is not a valid Redis connection string.
pub fn build_store(config: &StateConfig) -> Result<SharedStateStore> {
    match config.backend {
        StateBackend::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                AppError::Config("redis backend selected without redis_url".into())
            })?;
            let store = RedisStore::open(url, &config.key_prefix)?;
            info!("using redis state store");
            Ok(Arc::new(store))
        }
        StateBackend::Memory => {
            warn!("using in-memory state store (development only)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Record a webhook delivery id; returns `true` the first time it is seen.
///
/// Store failures are logged and treated as first delivery so an outage
/// never drops events.
pub async fn first_delivery(store: &dyn StateStore, dedup_key: &str, ttl: Duration) -> bool {
    let key = format!("dedup:{dedup_key}");
    match store.set_if_absent(&key, "1", Some(ttl)).await {
        Ok(first) => first,
        Err(err) => {
            warn!(%err, dedup_key, "dedup check failed; processing delivery");
            true
        }
    }
}
