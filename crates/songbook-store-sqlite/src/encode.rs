//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Release dates are stored as `YYYY-MM-DD` so that text comparison in SQL
//! orders them chronologically. Surrogate ids are hyphenated lowercase UUIDs.

use chrono::NaiveDate;
use songbook_core::song::{SongDetail, SongKey, SongSummary};
use uuid::Uuid;

use crate::{Error, Result};

/// Sorts chronologically only for years 0 through 9999; callers reject other
/// dates with [`songbook_core::song::release_date_in_range`].
const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw rows ─────────────────────────────────────────────────────────────────

/// A `songs ⋈ song_details` row as read from SQLite.
pub struct RawSummary {
  pub group_name:  String,
  pub song_name:   String,
  pub released_at: String,
  pub link:        String,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<SongSummary> {
    Ok(SongSummary {
      key:    SongKey { group_name: self.group_name, song_name: self.song_name },
      detail: SongDetail {
        release_date: decode_date(&self.released_at)?,
        link:         self.link,
      },
    })
  }
}

/// A `song_details` row as read from SQLite.
pub struct RawDetail {
  pub released_at: String,
  pub link:        String,
}

impl RawDetail {
  pub fn into_detail(self) -> Result<SongDetail> {
    Ok(SongDetail { release_date: decode_date(&self.released_at)?, link: self.link })
  }
}
