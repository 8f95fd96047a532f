//! Parameters for multi-song reads: optional filters and mandatory paging.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Optional predicates narrowing a listing. Set fields are combined with AND;
/// unset fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongFilter {
  /// Exact match on the group name.
  pub group:           Option<String>,
  /// Exact match on the song name.
  pub song:            Option<String>,
  /// Inclusive lower bound on the release date.
  pub released_after:  Option<NaiveDate>,
  /// Inclusive upper bound on the release date.
  pub released_before: Option<NaiveDate>,
}

/// A window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
  pub limit:  u32,
  pub offset: u32,
}

impl Page {
  pub fn new(limit: u32, offset: u32) -> Self { Self { limit, offset } }
}
