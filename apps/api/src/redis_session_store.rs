//! Redis-backed session records, for running more than one API instance.

use async_trait::async_trait;
use chrono::Utc;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tower_sessions::SessionStore;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, Error as SessionStoreError};

/// Attempts at drawing an unused session id before giving up.
const CREATE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisSessionStore {
    #[must_use]
    pub fn new(client: redis::Client, key_prefix: impl Into<String>) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
        }
    }

    fn key_for(&self, session_id: &Id) -> String {
        format!("{}:{}", self.key_prefix, session_id)
    }

    async fn connection(&self) -> session_store::Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(backend_error)
    }
}

/// Seconds until `record` expires, or `None` when it already has.
fn remaining_ttl(record: &Record, now_unix: i64) -> Option<u64> {
    let remaining = record.expiry_date.unix_timestamp() - now_unix;
    u64::try_from(remaining).ok().filter(|seconds| *seconds > 0)
}

fn encode(record: &Record) -> session_store::Result<String> {
    serde_json::to_string(record).map_err(|error| SessionStoreError::Encode(error.to_string()))
}

fn backend_error(error: redis::RedisError) -> SessionStoreError {
    SessionStoreError::Backend(error.to_string())
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, session_record: &mut Record) -> session_store::Result<()> {
        let Some(ttl_seconds) = remaining_ttl(session_record, Utc::now().timestamp()) else {
            return Ok(());
        };
        let mut connection = self.connection().await?;

        for _ in 0..CREATE_ATTEMPTS {
            let stored: Option<String> = redis::cmd("SET")
                .arg(self.key_for(&session_record.id))
                .arg(encode(session_record)?)
                .arg("NX")
                .arg("EX")
                .arg(ttl_seconds)
                .query_async(&mut connection)
                .await
                .map_err(backend_error)?;

            if stored.is_some() {
                return Ok(());
            }
            session_record.id = Id::default();
        }

        Err(SessionStoreError::Backend(
            "could not allocate a unique session id".to_owned(),
        ))
    }

    async fn save(&self, session_record: &Record) -> session_store::Result<()> {
        let key = self.key_for(&session_record.id);
        let mut connection = self.connection().await?;

        match remaining_ttl(session_record, Utc::now().timestamp()) {
            Some(ttl_seconds) => connection
                .set_ex::<_, _, ()>(key, encode(session_record)?, ttl_seconds)
                .await
                .map_err(backend_error),
            None => connection
                .del::<_, i64>(key)
                .await
                .map(|_| ())
                .map_err(backend_error),
        }
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let mut connection = self.connection().await?;
        let encoded_record: Option<String> = connection
            .get(self.key_for(session_id))
            .await
            .map_err(backend_error)?;

        encoded_record
            .as_deref()
            .map(|value| {
                serde_json::from_str::<Record>(value)
                    .map_err(|error| SessionStoreError::Decode(error.to_string()))
            })
            .transpose()
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let mut connection = self.connection().await?;
        connection
            .del::<_, i64>(self.key_for(session_id))
            .await
            .map_err(backend_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::{RedisSessionStore, remaining_ttl};

    fn record_expiring_in(seconds: i64) -> (Record, i64) {
        let now = OffsetDateTime::now_utc();
        let record = Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: now + Duration::seconds(seconds),
        };
        (record, now.unix_timestamp())
    }

    #[test]
    fn ttl_counts_down_to_expiry() {
        let (record, now) = record_expiring_in(1800);
        assert_eq!(remaining_ttl(&record, now), Some(1800));
    }

    #[test]
    fn expired_record_has_no_ttl() {
        let (record, now) = record_expiring_in(-5);
        assert_eq!(remaining_ttl(&record, now), None);
        let (record, now) = record_expiring_in(0);
        assert_eq!(remaining_ttl(&record, now), None);
    }

    #[test]
    fn keys_are_namespaced_by_prefix() {
        let client = redis::Client::open("redis://127.0.0.1/")
            .unwrap_or_else(|error| panic!("client should build: {error}"));
        let store = RedisSessionStore::new(client, "rolegate:session");
        let id = Id::default();

        assert_eq!(store.key_for(&id), format!("rolegate:session:{id}"));
    }
}
