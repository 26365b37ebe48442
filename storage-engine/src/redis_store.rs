use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::{ConnectionLike, ConnectionManager};
use redis::RedisError;
use shared::{Error, Result, TtlSecs};
use stash::ports::CacheStore;
use std::fmt::Debug;
use tracing::info;

fn store_error(e: RedisError) -> Error {
    Error::Store(e.to_string())
}

/// Redis-backed store. Entries are written with `SET key value EX ttl`, so
/// expiry is enforced by the server.
#[derive(Clone)]
pub struct RedisStore<C = ConnectionManager> {
    conn: C,
    prefix: Option<String>,
}

impl RedisStore<ConnectionManager> {
    /// Connect to `url` with an auto-reconnecting connection manager
    pub async fn connect(url: &str, prefix: Option<String>) -> Result<Self> {
        let client = redis::Client::open(url).map_err(store_error)?;
        let conn = ConnectionManager::new(client).await.map_err(store_error)?;
        info!("Connected to Redis at {}", client_host(url));
        Ok(Self::with_connection(conn, prefix))
    }
}

impl<C> RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    pub fn with_connection(conn: C, prefix: Option<String>) -> Self {
        // An empty prefix would produce keys like ":user:id:1"
        let prefix = prefix.filter(|p| !p.is_empty());
        Self { conn, prefix }
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{key}"),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl<C> CacheStore for RedisStore<C>
where
    C: ConnectionLike + Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(self.full_key(key))
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(value.map(Bytes::from))
    }

    async fn put(&self, key: &str, value: Bytes, ttl: TtlSecs) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("SET")
            .arg(self.full_key(key))
            .arg(&value[..])
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async::<()>(&mut conn)
            .await
            .map_err(store_error)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.conn.clone();
        let removed: i64 = redis::cmd("DEL")
            .arg(self.full_key(key))
            .query_async(&mut conn)
            .await
            .map_err(store_error)?;
        Ok(removed > 0)
    }
}

impl<C> Debug for RedisStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Host part of a redis url, without credentials
fn client_host(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.rsplit_once('@').map_or(rest, |(_, host)| host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::{ErrorKind, Value};
    use redis_test::{MockCmd, MockRedisConnection};

    fn ttl(secs: u64) -> TtlSecs {
        TtlSecs::new(secs).unwrap()
    }

    fn store(commands: Vec<MockCmd>, prefix: Option<&str>) -> RedisStore<MockRedisConnection> {
        RedisStore::with_connection(
            MockRedisConnection::new(commands),
            prefix.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_get_hit_and_miss() {
        let store = store(
            vec![
                MockCmd::new(redis::cmd("GET").arg("user:id:1"), Ok(br#"{"a":1}"#.to_vec())),
                MockCmd::new(redis::cmd("GET").arg("user:id:2"), Ok(Value::Nil)),
            ],
            None,
        );

        let hit = store.get("user:id:1").await.unwrap();
        assert_eq!(hit, Some(Bytes::from_static(br#"{"a":1}"#)));
        assert_eq!(store.get("user:id:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_sets_expiry_in_seconds() {
        let store = store(
            vec![MockCmd::new(
                redis::cmd("SET")
                    .arg("user:id:1")
                    .arg(&b"null"[..])
                    .arg("EX")
                    .arg(60u64),
                Ok("OK"),
            )],
            None,
        );

        store
            .put("user:id:1", Bytes::from_static(b"null"), ttl(60))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_prefix_is_applied_to_every_command() {
        let store = store(
            vec![
                MockCmd::new(
                    redis::cmd("SET")
                        .arg("bench:user:id:1")
                        .arg(&b"1"[..])
                        .arg("EX")
                        .arg(5u64),
                    Ok("OK"),
                ),
                MockCmd::new(redis::cmd("GET").arg("bench:user:id:1"), Ok(b"1".to_vec())),
                MockCmd::new(redis::cmd("DEL").arg("bench:user:id:1"), Ok(1i64)),
            ],
            Some("bench"),
        );

        store.put("user:id:1", Bytes::from_static(b"1"), ttl(5)).await.unwrap();
        assert!(store.get("user:id:1").await.unwrap().is_some());
        assert!(store.delete("user:id:1").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_prefix_is_ignored() {
        let store = store(
            vec![MockCmd::new(redis::cmd("DEL").arg("k"), Ok(0i64))],
            Some(""),
        );

        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_redis_errors_map_to_store_error() {
        let store = store(
            vec![MockCmd::new(
                redis::cmd("GET").arg("k"),
                Err::<Value, _>(RedisError::from((ErrorKind::IoError, "connection refused"))),
            )],
            None,
        );

        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_client_host_hides_credentials() {
        assert_eq!(client_host("redis://:secret@cache:6379/0"), "cache:6379/0");
        assert_eq!(client_host("redis://localhost:6379/0"), "localhost:6379/0");
    }
}
