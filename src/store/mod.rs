//! Room storage — keyed documents with a one-hour idle TTL.
//!
//! DESIGN
//! ======
//! Two implementations sit behind one trait object chosen at startup: an
//! in-memory map with explicit deadlines and a periodic sweep, and a Redis
//! store that leans on native key expiry. Handlers receive the store by
//! injection; there is no process-global handle.
//!
//! TRADE-OFFS
//! ==========
//! Read-modify-write across the trait is not atomic. Concurrent writers race
//! and the later write wins whole-document; `progress` actions only rewrite
//! the acting player's entry, which bounds — but does not eliminate — lost
//! updates. This is a deliberate design choice, not a gap; the store stays
//! lock-free and revision-free.

pub mod memory;
pub mod redis;

pub use memory::MemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;
use rand::Rng;

use crate::room::{Room, now_ms};

/// Rooms vanish after one hour without a write.
pub const ROOM_TTL_SECS: u64 = 60 * 60;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const CODE_LENGTH: usize = 5;
const MAX_CODE_ATTEMPTS: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] fred::error::RedisError),
    #[error("failed to encode room: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Keyed room storage. `set` is an upsert that refreshes the TTL and the
/// room's `updatedAt`; invariants on the document itself are the action
/// layer's job, applied before every write.
#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn get(&self, code: &str) -> Result<Option<Room>, StoreError>;
    async fn set(&self, room: Room) -> Result<(), StoreError>;
    async fn delete(&self, code: &str) -> Result<(), StoreError>;
    async fn exists(&self, code: &str) -> Result<bool, StoreError>;
}

fn random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Last three digits of the base-36 encoded timestamp, uppercased.
fn base36_suffix(timestamp: i64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut value = u64::try_from(timestamp).unwrap_or(0);
    let mut encoded = Vec::new();
    loop {
        encoded.push(DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    encoded.reverse();
    let skip = encoded.len().saturating_sub(3);
    encoded[skip..].iter().map(|b| *b as char).collect()
}

/// Draw a fresh five-letter room code not currently live in the store.
///
/// Uniform A–Z draws with a bounded number of collision retries; on
/// sustained collision the code embeds a base-36 timestamp suffix so the
/// call always terminates, trading the uniqueness check away.
pub async fn generate_unique_code(store: &dyn RoomStore) -> Result<String, StoreError> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = random_code(CODE_LENGTH);
        if !store.exists(&code).await? {
            return Ok(code);
        }
    }

    Ok(format!("{}{}", random_code(2), base36_suffix(now_ms())))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
