//! Error type for `songbook-store-sqlite`.

use std::time::Duration;

use songbook_core::{Classify, ErrorKind, song::SongKey};
use thiserror::Error;

use crate::cancel::Cancelled;

#[derive(Debug, Error)]
pub enum Error {
  #[error("song not found: {0}")]
  NotFound(SongKey),

  #[error("song already exists: {0}")]
  AlreadyExists(SongKey),

  #[error("database error: {0}")]
  Database(#[source] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// The caller abandoned the operation before it committed.
  #[error("operation cancelled before commit")]
  Cancelled,

  #[error("operation exceeded its deadline of {0:?}")]
  TimedOut(Duration),
}

impl Error {
  /// Promote a uniqueness violation on the `songs` table to
  /// [`Error::AlreadyExists`] for `key`; any other error is returned as-is.
  pub(crate) fn on_conflict(self, key: &SongKey) -> Self {
    match self {
      Self::Database(ref err) if is_unique_violation(err) => {
        Self::AlreadyExists(key.clone())
      }
      other => other,
    }
  }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::Other(e) if e.is::<Cancelled>() => Self::Cancelled,
      other => Self::Database(other),
    }
  }
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
      Self::Database(_)
      | Self::DateParse(_)
      | Self::Cancelled
      | Self::TimedOut(_) => ErrorKind::Internal,
    }
  }
}

fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
