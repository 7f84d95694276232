//! Router assembly.
//!
//! One resource per room code, mutated through a single action envelope.
//! The API is poll-friendly by construction: every response carries the full
//! normalized room document, so clients need nothing beyond a fixed-interval
//! GET to observe each other.

pub mod rooms;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[must_use]
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/rooms", post(rooms::create_room))
        .route(
            "/api/rooms/{code}",
            get(rooms::fetch_room)
                .patch(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
