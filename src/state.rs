//! Shared application state.
//!
//! `AppState` is injected into axum handlers via the `State` extractor. It
//! carries only the room store, as an explicitly constructed trait object —
//! the implementation is chosen once at startup, never looked up lazily.

use std::sync::Arc;

use crate::store::{MemoryStore, RoomStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RoomStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// State backed by a fresh in-memory store. Used when no Redis URL is
    /// configured, and by tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }
}
