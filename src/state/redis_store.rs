//! Redis-backed state store.

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::OnceCell;

use super::{StateStore, StoreFuture};
use crate::config::StateBackend;
use crate::Result;

/// [`StateStore`] backed by Redis; keys are namespaced by a prefix.
///
/// The connection is established on first use and then shared; the
/// connection manager reconnects on its own after failures.
pub struct RedisStore {
    client: redis::Client,
    namespace: String,
    connection: OnceCell<ConnectionManager>,
}

impl RedisStore {
    /// Validate the URL and prepare a lazily-connected store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::State` if `url` is not a valid Redis URL.
    pub fn open(url: &str, namespace: impl Into<String>) -> Result<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            namespace: namespace.into(),
            connection: OnceCell::new(),
        })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await?;
        Ok(manager.clone())
    }
}

/// Redis expiry in whole seconds, never zero.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

impl StateStore for RedisStore {
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            let value: Option<String> = conn.get(self.key(key)).await?;
            Ok(value)
        })
    }

    fn set<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            let key = self.key(key);
            match ttl {
                Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl)).await?,
                None => conn.set::<_, _, ()>(key, value).await?,
            }
            Ok(())
        })
    }

    fn set_if_absent<'a>(
        &'a self,
        key: &'a str,
        value: &'a str,
        ttl: Option<Duration>,
    ) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            let mut cmd = redis::cmd("SET");
            cmd.arg(self.key(key)).arg(value).arg("NX");
            if let Some(ttl) = ttl {
                cmd.arg("EX").arg(ttl_seconds(ttl));
            }
            // SET NX replies OK when written and nil when the key exists.
            let reply: Option<String> = cmd.query_async(&mut conn).await?;
            Ok(reply.is_some())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            conn.del::<_, ()>(self.key(key)).await?;
            Ok(())
        })
    }

    fn backend(&self) -> StateBackend {
        StateBackend::Redis
    }
}
