//! [`SqliteStore`] — the SQLite implementation of [`SongStore`].

use std::{path::Path, time::Duration};

use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use songbook_core::{
  query::{Page, SongFilter},
  song::{NewSong, SongDetail, SongKey, SongSummary},
  store::SongStore,
};

use crate::{
  Error, Result,
  cancel::{CancelFlag, CancelOnDrop, Checkpoint},
  encode::{RawDetail, RawSummary, encode_date, encode_uuid},
  predicate::Predicate,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Songbook store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  op_timeout:      Option<Duration>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, op_timeout: None };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, op_timeout: None };
    store.init_schema().await?;
    Ok(store)
  }

  /// Abort any operation still running after `timeout`. An operation that
  /// hits the deadline before committing is rolled back and reported as
  /// [`Error::TimedOut`].
  pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
    self.op_timeout = Some(timeout);
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `f` on the database thread with a fresh cancellation flag.
  ///
  /// The flag is raised if this future is dropped or the deadline passes
  /// before `f` returns. After a deadline the closure is still awaited so the
  /// caller learns whether it committed or rolled back.
  async fn run<T, F>(&self, op: &'static str, f: F) -> Result<T>
  where
    F: FnOnce(&mut rusqlite::Connection, &CancelFlag) -> tokio_rusqlite::Result<T>
      + Send
      + 'static,
    T: Send + 'static,
  {
    let flag = CancelFlag::default();
    let guard = CancelOnDrop::new(flag.clone());

    let closure_flag = flag.clone();
    let call = self.conn.call(move |conn| f(conn, &closure_flag));
    tokio::pin!(call);

    let result = match self.op_timeout {
      None => call.await.map_err(Error::from),
      Some(limit) => match tokio::time::timeout(limit, call.as_mut()).await {
        Ok(result) => result.map_err(Error::from),
        Err(_) => {
          flag.raise();
          tracing::warn!(op, ?limit, "store operation hit its deadline");
          match call.await.map_err(Error::from) {
            Err(Error::Cancelled) => Err(Error::TimedOut(limit)),
            settled => settled,
          }
        }
      },
    };

    guard.disarm();
    result
  }
}

// ─── Statements ──────────────────────────────────────────────────────────────
//
// Each function below runs on the database thread. Write paths open an
// IMMEDIATE transaction and only commit at the very end; returning early for
// any reason drops the `Transaction`, which rolls it back.

const INSERT_VERSE: &str =
  "INSERT INTO song_verses (song_id, verse_index, verse) VALUES (?1, ?2, ?3)";

fn insert_verses(
  tx:      &rusqlite::Transaction<'_>,
  song_id: &str,
  verses:  &[String],
  cancel:  &impl Checkpoint,
) -> tokio_rusqlite::Result<()> {
  let mut stmt = tx.prepare_cached(INSERT_VERSE)?;
  for (i, verse) in verses.iter().enumerate() {
    cancel.check()?;
    stmt.execute(rusqlite::params![song_id, i + 1, verse])?;
  }
  Ok(())
}

pub(crate) fn insert_song(
  conn:   &mut rusqlite::Connection,
  song:   &NewSong,
  cancel: &impl Checkpoint,
) -> tokio_rusqlite::Result<()> {
  cancel.check()?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
  let song_id = encode_uuid(Uuid::new_v4());

  tx.execute(
    "INSERT INTO songs (song_id, group_name, song_name) VALUES (?1, ?2, ?3)",
    rusqlite::params![song_id, song.key.group_name, song.key.song_name],
  )?;

  cancel.check()?;
  tx.execute(
    "INSERT INTO song_details (song_id, released_at, link) VALUES (?1, ?2, ?3)",
    rusqlite::params![song_id, encode_date(song.detail.release_date), song.detail.link],
  )?;

  insert_verses(&tx, &song_id, &song.verses, cancel)?;

  cancel.check()?;
  tx.commit()?;
  Ok(())
}

/// Returns `false` if `old` matched no song; nothing is changed in that case.
pub(crate) fn replace_song(
  conn:   &mut rusqlite::Connection,
  old:    &SongKey,
  song:   &NewSong,
  cancel: &impl Checkpoint,
) -> tokio_rusqlite::Result<bool> {
  cancel.check()?;
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let song_id: Option<String> = tx
    .query_row(
      "UPDATE songs SET group_name = ?1, song_name = ?2
       WHERE group_name = ?3 AND song_name = ?4
       RETURNING song_id",
      rusqlite::params![
        song.key.group_name,
        song.key.song_name,
        old.group_name,
        old.song_name,
      ],
      |row| row.get(0),
    )
    .optional()?;
  let Some(song_id) = song_id else {
    return Ok(false);
  };

  cancel.check()?;
  tx.execute(
    "UPDATE song_details SET released_at = ?1, link = ?2 WHERE song_id = ?3",
    rusqlite::params![encode_date(song.detail.release_date), song.detail.link, song_id],
  )?;

  cancel.check()?;
  tx.execute("DELETE FROM song_verses WHERE song_id = ?1", rusqlite::params![song_id])?;

  insert_verses(&tx, &song_id, &song.verses, cancel)?;

  cancel.check()?;
  tx.commit()?;
  Ok(true)
}

/// `None` if the song does not exist; an empty page of an existing song is
/// `Some(vec![])`.
fn select_verses(
  conn:   &mut rusqlite::Connection,
  key:    &SongKey,
  page:   Page,
  cancel: &CancelFlag,
) -> tokio_rusqlite::Result<Option<Vec<String>>> {
  cancel.check()?;
  let tx = conn.transaction()?;

  let verses = {
    let mut stmt = tx.prepare(
      "SELECT v.verse
       FROM songs s
       JOIN song_verses v ON v.song_id = s.song_id
       WHERE s.group_name = ?1 AND s.song_name = ?2
       ORDER BY v.verse_index
       LIMIT ?3 OFFSET ?4",
    )?;
    stmt
      .query_map(
        rusqlite::params![key.group_name, key.song_name, page.limit, page.offset],
        |row| row.get::<_, String>(0),
      )?
      .collect::<rusqlite::Result<Vec<_>>>()?
  };

  if !verses.is_empty() {
    return Ok(Some(verses));
  }

  let exists = tx
    .query_row(
      "SELECT 1 FROM songs WHERE group_name = ?1 AND song_name = ?2",
      rusqlite::params![key.group_name, key.song_name],
      |_| Ok(()),
    )
    .optional()?
    .is_some();

  Ok(exists.then_some(verses))
}

// ─── SongStore impl ──────────────────────────────────────────────────────────

impl SongStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_song(&self, song: NewSong) -> Result<()> {
    let key = song.key.clone();
    let verse_count = song.verses.len();

    self
      .run("create_song", move |conn, cancel| insert_song(conn, &song, cancel))
      .await
      .map_err(|e| e.on_conflict(&key))?;

    tracing::debug!(%key, verse_count, "created song");
    Ok(())
  }

  async fn update_song(&self, key: SongKey, song: NewSong) -> Result<()> {
    let new_key = song.key.clone();
    let verse_count = song.verses.len();

    let old_key = key.clone();
    let updated = self
      .run("update_song", move |conn, cancel| replace_song(conn, &old_key, &song, cancel))
      .await
      .map_err(|e| e.on_conflict(&new_key))?;

    if !updated {
      return Err(Error::NotFound(key));
    }

    tracing::debug!(old = %key, new = %new_key, verse_count, "updated song");
    Ok(())
  }

  async fn delete_song(&self, key: SongKey) -> Result<()> {
    let target = key.clone();
    let affected = self
      .run("delete_song", move |conn, cancel| {
        cancel.check()?;
        Ok(conn.execute(
          "DELETE FROM songs WHERE group_name = ?1 AND song_name = ?2",
          rusqlite::params![target.group_name, target.song_name],
        )?)
      })
      .await?;

    tracing::debug!(%key, affected, "deleted song");
    if affected == 0 {
      return Err(Error::NotFound(key));
    }
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_songs(&self, page: Page, filter: SongFilter) -> Result<Vec<SongSummary>> {
    let predicate = Predicate::for_listing(&filter, page);
    let terms = predicate.terms().len();
    let rendered = predicate.render();

    let raws: Vec<RawSummary> = self
      .run("list_songs", move |conn, cancel| {
        cancel.check()?;
        let sql = format!(
          "SELECT s.group_name, s.song_name, d.released_at, d.link
           FROM songs s
           JOIN song_details d ON d.song_id = s.song_id
           {}",
          rendered.sql
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(rendered.params), |row| {
            Ok(RawSummary {
              group_name:  row.get(0)?,
              song_name:   row.get(1)?,
              released_at: row.get(2)?,
              link:        row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    tracing::debug!(?filter, ?page, terms, rows = raws.len(), "listed songs");
    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn get_detail(&self, key: SongKey) -> Result<SongDetail> {
    let target = key.clone();
    let raw: Option<RawDetail> = self
      .run("get_detail", move |conn, cancel| {
        cancel.check()?;
        Ok(
          conn
            .query_row(
              "SELECT d.released_at, d.link
               FROM songs s
               JOIN song_details d ON d.song_id = s.song_id
               WHERE s.group_name = ?1 AND s.song_name = ?2",
              rusqlite::params![target.group_name, target.song_name],
              |row| {
                Ok(RawDetail {
                  released_at: row.get(0)?,
                  link:        row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::NotFound(key))?.into_detail()
  }

  async fn get_verses(&self, key: SongKey, page: Page) -> Result<Vec<String>> {
    let target = key.clone();
    let verses = self
      .run("get_verses", move |conn, cancel| select_verses(conn, &target, page, cancel))
      .await?;

    verses.ok_or(Error::NotFound(key))
  }
}
