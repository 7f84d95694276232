//! In-memory room store for single-process deployments and tests.
//!
//! Entries carry explicit deadlines. Expired rooms are treated as absent on
//! every read (lazy eviction) and physically removed by a periodic sweep
//! task, so the observable contract matches the Redis store's native expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::room::{Room, now_ms};
use crate::store::{ROOM_TTL_SECS, RoomStore, StoreError};

struct Entry {
    room: Room,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct MemoryStore {
    rooms: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(ROOM_TTL_SECS))
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { rooms: Arc::new(RwLock::new(HashMap::new())), ttl }
    }

    async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut rooms = self.rooms.write().await;
        let before = rooms.len();
        rooms.retain(|_, entry| entry.expires_at > now);
        before - rooms.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomStore for MemoryStore {
    async fn get(&self, code: &str) -> Result<Option<Room>, StoreError> {
        let rooms = self.rooms.read().await;
        let room = rooms
            .get(code)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.room.clone());
        Ok(room)
    }

    async fn set(&self, mut room: Room) -> Result<(), StoreError> {
        room.updated_at = now_ms();
        let entry = Entry { room, expires_at: Instant::now() + self.ttl };
        let mut rooms = self.rooms.write().await;
        rooms.insert(entry.room.code.clone(), entry);
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.rooms.write().await.remove(code);
        Ok(())
    }

    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.get(code).await?.is_some())
    }
}

/// Spawn the background expiry sweep. Returns a handle so callers can abort
/// it on shutdown; the task itself never exits on its own.
pub fn spawn_sweep_task(store: MemoryStore, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = store.sweep().await;
            if evicted > 0 {
                tracing::debug!(evicted, "swept expired rooms");
            }
        }
    })
}
