//! Handlers for `/songs` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/songs` | Optional `group`, `song`, `releasedAfter`, `releasedBefore`; required `limit`, `offset` |
//! | `GET`    | `/songs/info` | `?group&song`; release date and link |
//! | `GET`    | `/songs/text` | `?group&song&limit&offset`; a page of verses joined into text |
//! | `POST`   | `/songs` | Body: [`SongWithText`]; returns 201 |
//! | `PUT`    | `/songs` | `?group&song` names the song to replace; body: [`SongWithText`] |
//! | `DELETE` | `/songs` | `?group&song`; returns 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use songbook_core::{
  query::{Page, SongFilter},
  song::{SongDetail, SongKey, SongSummary, SongWithText, release_date_in_range},
  store::SongStore,
  text::assemble_text,
};

use crate::error::ApiError;

fn check_date(field: &str, date: Option<NaiveDate>) -> Result<(), ApiError> {
  match date {
    Some(date) if !release_date_in_range(date) => Err(ApiError::BadRequest(format!(
      "{field} {date} is outside years 0000 to 9999"
    ))),
    _ => Ok(()),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub group:           Option<String>,
  pub song:            Option<String>,
  /// Inclusive, `YYYY-MM-DD`.
  pub released_after:  Option<NaiveDate>,
  /// Inclusive, `YYYY-MM-DD`.
  pub released_before: Option<NaiveDate>,
  pub limit:           u32,
  pub offset:          u32,
}

/// `GET /songs?limit=..&offset=..[&group=..][&song=..][&releasedAfter=..][&releasedBefore=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<SongSummary>>, ApiError>
where
  S: SongStore,
{
  check_date("releasedAfter", params.released_after)?;
  check_date("releasedBefore", params.released_before)?;

  let page = Page::new(params.limit, params.offset);
  let filter = SongFilter {
    group:           params.group,
    song:            params.song,
    released_after:  params.released_after,
    released_before: params.released_before,
  };

  let songs = store
    .list_songs(page, filter)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(songs))
}

// ─── Info ─────────────────────────────────────────────────────────────────────

/// `GET /songs/info?group=..&song=..`
pub async fn info<S>(
  State(store): State<Arc<S>>,
  Query(key): Query<SongKey>,
) -> Result<Json<SongDetail>, ApiError>
where
  S: SongStore,
{
  let detail = store.get_detail(key).await.map_err(ApiError::from_store)?;
  Ok(Json(detail))
}

// ─── Text ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextParams {
  pub group:  String,
  pub song:   String,
  pub limit:  u32,
  pub offset: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TextBody {
  pub text: String,
}

/// `GET /songs/text?group=..&song=..&limit=..&offset=..`
///
/// `limit` and `offset` count verses, not characters.
pub async fn text<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<TextParams>,
) -> Result<Json<TextBody>, ApiError>
where
  S: SongStore,
{
  let key = SongKey::new(params.group, params.song);
  let verses = store
    .get_verses(key, Page::new(params.limit, params.offset))
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(TextBody { text: assemble_text(&verses) }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /songs` — returns 201 + the key of the stored song.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<SongWithText>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SongStore,
{
  check_date("releaseDate", Some(body.detail.release_date))?;

  let key = body.key.clone();
  store
    .create_song(body.into_new_song())
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(key)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /songs?group=..&song=..` — body is the full replacement song, which
/// may carry a new group or song name.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Query(key): Query<SongKey>,
  Json(body): Json<SongWithText>,
) -> Result<Json<SongKey>, ApiError>
where
  S: SongStore,
{
  check_date("releaseDate", Some(body.detail.release_date))?;

  let new_key = body.key.clone();
  store
    .update_song(key, body.into_new_song())
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(new_key))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /songs?group=..&song=..`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Query(key): Query<SongKey>,
) -> Result<StatusCode, ApiError>
where
  S: SongStore,
{
  store.delete_song(key).await.map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
