//! JSON REST API for Songbook.
//!
//! Exposes an axum [`Router`] backed by any [`songbook_core::store::SongStore`].
//! Transport concerns (binding, tracing layers, health checks) are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", songbook_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod songs;


use std::sync::Arc;

use axum::{Router, routing::get};
use songbook_core::store::SongStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SongStore + 'static,
{
  Router::new()
    .route(
      "/songs",
      get(songs::list::<S>)
        .post(songs::create::<S>)
        .put(songs::update::<S>)
        .delete(songs::delete::<S>),
    )
    .route("/songs/info", get(songs::info::<S>))
    .route("/songs/text", get(songs::text::<S>))
    .with_state(store)
}
