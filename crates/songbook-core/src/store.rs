//! The `SongStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `songbook-store-sqlite`).
//! Higher layers (`songbook-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  error::Classify,
  query::{Page, SongFilter},
  song::{NewSong, SongDetail, SongKey, SongSummary},
};

/// Abstraction over a Songbook storage backend.
///
/// A song is three kinds of row: identity, detail and verses. Every write
/// touches all of them atomically; a failed write leaves the store exactly as
/// it was before the call, including when the returned future is dropped
/// before completion.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait SongStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  /// Persist a new song with its detail and verses.
  ///
  /// Fails with [`ErrorKind::AlreadyExists`](crate::ErrorKind::AlreadyExists)
  /// if a song with the same key exists; nothing is written in that case.
  fn create_song(
    &self,
    song: NewSong,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List songs joined with their details, narrowed by `filter`.
  ///
  /// Row order is whatever the backend's scan produces. No matches is an empty
  /// vector, never an error.
  fn list_songs(
    &self,
    page: Page,
    filter: SongFilter,
  ) -> impl Future<Output = Result<Vec<SongSummary>, Self::Error>> + Send + '_;

  /// Fetch the release detail of one song.
  fn get_detail(
    &self,
    key: SongKey,
  ) -> impl Future<Output = Result<SongDetail, Self::Error>> + Send + '_;

  /// Fetch a page of a song's verses in verse order.
  ///
  /// Fails with `NotFound` if the song does not exist. A page past the last
  /// verse of an existing song is an empty vector.
  fn get_verses(
    &self,
    key: SongKey,
    page: Page,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// Replace the song addressed by `key`.
  ///
  /// `song.key` may differ from `key`, which renames the song. The detail is
  /// overwritten and the verses are replaced wholesale. Fails with `NotFound`
  /// if `key` matches nothing and with `AlreadyExists` if the new key belongs
  /// to another song.
  fn update_song(
    &self,
    key: SongKey,
    song: NewSong,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove a song together with its detail and verses.
  fn delete_song(
    &self,
    key: SongKey,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
