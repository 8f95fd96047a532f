//! Song identity, release details, and the write payloads built from them.
//!
//! A song is addressed only by its natural key, `(group_name, song_name)`.
//! Backends relate the detail and verse rows through a surrogate id of their
//! own, which never leaves the backend.

use std::fmt;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::text::split_text;

// ─── Identity ────────────────────────────────────────────────────────────────

/// The natural key of a song.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongKey {
  #[serde(rename = "group")]
  pub group_name: String,
  #[serde(rename = "song")]
  pub song_name:  String,
}

impl SongKey {
  pub fn new(group_name: impl Into<String>, song_name: impl Into<String>) -> Self {
    Self { group_name: group_name.into(), song_name: song_name.into() }
  }
}

impl fmt::Display for SongKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:?} by {:?}", self.song_name, self.group_name)
  }
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// Release metadata; exactly one per song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetail {
  pub release_date: NaiveDate,
  pub link:         String,
}

/// Whether `date` has a four-digit, non-negative year.
///
/// Backends that store dates as `YYYY-MM-DD` text rely on this for range
/// comparisons to order chronologically; chrono writes other years with a
/// sign (`+10000-01-01`, `-0001-01-01`).
pub fn release_date_in_range(date: NaiveDate) -> bool { (0..=9999).contains(&date.year()) }

// ─── Read model ──────────────────────────────────────────────────────────────

/// One row of a filtered listing: identity joined with its detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
  #[serde(flatten)]
  pub key:    SongKey,
  #[serde(flatten)]
  pub detail: SongDetail,
}

// ─── Write payloads ──────────────────────────────────────────────────────────

/// A song as the store persists it: lyrics already split into verses.
///
/// `verses[i]` is stored with verse index `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
  pub key:    SongKey,
  pub detail: SongDetail,
  pub verses: Vec<String>,
}

/// A song as callers submit it: lyrics as one plain-text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongWithText {
  #[serde(flatten)]
  pub key:    SongKey,
  #[serde(flatten)]
  pub detail: SongDetail,
  pub text:   String,
}

impl SongWithText {
  /// Split the lyrics into verses, one per line.
  pub fn into_new_song(self) -> NewSong {
    let verses = split_text(&self.text);
    NewSong { key: self.key, detail: self.detail, verses }
  }
}
