//! Redis-backed room store.
//!
//! Documents are stored as JSON strings under a namespaced key and written
//! with an `EX` expiry, so idle rooms vanish without any janitor process.
//! An unparseable payload is logged and treated as an absent room rather
//! than failing the request.

use async_trait::async_trait;
use fred::interfaces::{ClientLike, KeysInterface};
use fred::types::{Expiration, RedisConfig};

use crate::room::{Room, now_ms};
use crate::store::{ROOM_TTL_SECS, RoomStore, StoreError};

const ROOM_PREFIX: &str = "typeracing:rooms:";

#[derive(Clone)]
pub struct RedisStore {
    client: fred::clients::RedisClient,
}

impl RedisStore {
    /// Connect to the Redis instance at `url` and wait for the connection
    /// to come up before accepting traffic.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let config = RedisConfig::from_url(url)?;
        let client = fred::clients::RedisClient::new(config, None, None, None);
        client.connect();
        client.wait_for_connect().await?;
        Ok(Self { client })
    }

    fn key(code: &str) -> String {
        format!("{ROOM_PREFIX}{code}")
    }
}

#[async_trait]
impl RoomStore for RedisStore {
    async fn get(&self, code: &str) -> Result<Option<Room>, StoreError> {
        let payload: Option<String> = self.client.get(Self::key(code)).await?;
        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<Room>(&payload) {
            Ok(room) => Ok(Some(room)),
            Err(error) => {
                tracing::error!(code, %error, "failed to parse stored room payload");
                Ok(None)
            }
        }
    }

    async fn set(&self, mut room: Room) -> Result<(), StoreError> {
        room.updated_at = now_ms();
        let payload = serde_json::to_string(&room)?;
        self.client
            .set::<(), _, _>(
                Self::key(&room.code),
                payload,
                Some(Expiration::EX(ROOM_TTL_SECS as i64)),
                None,
                false,
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.client.del::<u64, _>(Self::key(code)).await?;
        Ok(())
    }

    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        let count: i64 = self.client.exists(Self::key(code)).await?;
        Ok(count > 0)
    }
}
