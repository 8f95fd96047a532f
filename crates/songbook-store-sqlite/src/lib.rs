//! SQLite backend for the Songbook lyrics store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each store operation is a single
//! closure on that thread; multi-row writes are one SQLite transaction.

mod cancel;
mod encode;
mod predicate;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
