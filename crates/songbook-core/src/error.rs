//! The error taxonomy shared by every storage backend.
//!
//! Backends keep their own error enums (with whatever opaque causes they need
//! for logging) and classify each value into one of three [`ErrorKind`]s. The
//! boundary layer only ever branches on the kind.

use serde::Serialize;

/// The three classes of failure a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  /// A keyed read, update or delete matched no song.
  NotFound,
  /// A write collided with the `(group, song)` uniqueness constraint.
  AlreadyExists,
  /// Anything else: connectivity, malformed SQL, cancellation, decoding.
  Internal,
}

/// Implemented by backend error types so callers can branch on the failure
/// class without knowing the backend.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

impl Classify for ErrorKind {
  fn kind(&self) -> ErrorKind { *self }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_compare_structurally() {
    assert_eq!(ErrorKind::NotFound.kind(), ErrorKind::NotFound);
    assert_ne!(ErrorKind::NotFound, ErrorKind::AlreadyExists);
  }

  #[test]
  fn kind_serializes_as_snake_case() {
    let json = serde_json::to_string(&ErrorKind::AlreadyExists).unwrap();
    assert_eq!(json, "\"already_exists\"");
  }
}
