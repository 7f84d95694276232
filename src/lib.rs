//! Multiplayer typing-race synchronization engine.
//!
//! ARCHITECTURE
//! ============
//! Rooms are short-lived shared documents keyed by a five-letter code. The
//! server holds no per-room runtime state: every request reads the full room
//! document from the store, normalizes it against wall-clock time, applies
//! one action, and writes the whole document back. Clients observe each
//! other purely by polling — there is no push channel.
//!
//! The typing session engine ([`session`]) runs client-side and is shared by
//! solo practice and multiplayer races; in a race it additionally reports
//! derived progress back through the same room endpoint ([`client`]).

pub mod actions;
pub mod client;
pub mod prompts;
pub mod room;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
